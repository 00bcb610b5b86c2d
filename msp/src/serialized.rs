//! Wire format of identities. An identity is `(msp_id, id_bytes)` and for an Idemix identity `id_bytes`
//! encodes `(nym_x, nym_y, ou, role, proof)` in this order.

use crate::error::MspError;
use ark_ec::short_weierstrass::{Affine, SWCurveConfig};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SerializedIdentity {
    pub msp_id: String,
    pub id_bytes: Vec<u8>,
}

#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SerializedIdemixIdentity {
    pub nym_x: Vec<u8>,
    pub nym_y: Vec<u8>,
    /// Organizational unit as UTF-8
    pub ou: Vec<u8>,
    /// Role mask as 4 big-endian bytes
    pub role: Vec<u8>,
    /// Signature of possession over the empty message disclosing `ou` and `role`
    pub proof: Vec<u8>,
}

impl SerializedIdentity {
    pub fn to_bytes(&self) -> Result<Vec<u8>, MspError> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MspError> {
        Ok(Self::deserialize_compressed(bytes)?)
    }
}

impl SerializedIdemixIdentity {
    pub fn to_bytes(&self) -> Result<Vec<u8>, MspError> {
        let mut bytes = Vec::new();
        self.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MspError> {
        Ok(Self::deserialize_compressed(bytes)?)
    }

    pub fn role_mask(&self) -> Result<u32, MspError> {
        let role: [u8; 4] = self
            .role
            .as_slice()
            .try_into()
            .map_err(|_| MspError::InvalidRoleLength(self.role.len()))?;
        Ok(u32::from_be_bytes(role))
    }

    pub fn organizational_unit(&self) -> Result<String, MspError> {
        String::from_utf8(self.ou.clone()).map_err(|_| MspError::InvalidOrganizationalUnit)
    }
}

/// Pseudonyms travel as their affine coordinates
pub trait NymCoordinates: Sized {
    fn to_coordinates(&self) -> Result<(Vec<u8>, Vec<u8>), MspError>;

    /// Rejects points not on the curve or not in the prime order subgroup
    fn from_coordinates(x: &[u8], y: &[u8]) -> Result<Self, MspError>;
}

impl<P: SWCurveConfig> NymCoordinates for Affine<P> {
    fn to_coordinates(&self) -> Result<(Vec<u8>, Vec<u8>), MspError> {
        if self.infinity {
            return Err(MspError::NymNotOnCurve);
        }
        let mut x = Vec::new();
        let mut y = Vec::new();
        self.x.serialize_compressed(&mut x)?;
        self.y.serialize_compressed(&mut y)?;
        Ok((x, y))
    }

    fn from_coordinates(x: &[u8], y: &[u8]) -> Result<Self, MspError> {
        let x = P::BaseField::deserialize_compressed(x)?;
        let y = P::BaseField::deserialize_compressed(y)?;
        let point = Affine::<P>::new_unchecked(x, y);
        if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(MspError::NymNotOnCurve);
        }
        Ok(point)
    }
}
