//! Identities backed by an Idemix credential.
//!
//! [`IdemixIdentity`] is what a verifier sees: a pseudonym, the disclosed organizational unit and role, and a
//! signature of possession showing the pseudonym belongs to a holder of a credential with those attributes.
//! [`IdemixSigningIdentity`] is the holder's side and additionally keeps the secret key, the credential and the
//! opening of the pseudonym.
//!
//! Construction validates everything up front and fails with [`MspError::IdentityConstruction`] so an
//! identity that exists is always valid.

use crate::{
    attributes::{expected_revealed, identity_attributes},
    error::MspError,
    role::{mask_to_roles, validate_role_mask, MspRole},
    serialized::{NymCoordinates, SerializedIdemixIdentity, SerializedIdentity},
    ATTRIBUTE_NAMES, OU_INDEX, ROLE_INDEX,
};
use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use digest::Digest;
use idemix::{
    credential::Credential,
    nym::Pseudonym,
    nym_signature::NymSignature,
    setup::{IssuerPublicKey, UserSecretKey},
    signature::Signature,
};
use std::sync::Arc;

/// Both the organizational unit and the role are disclosed by an identity's proof
pub const IDENTITY_DISCLOSURE: [bool; 2] = [true, true];

/// The verifier side of an Idemix identity
#[derive(Clone, Debug)]
pub struct IdemixIdentity<E: Pairing> {
    msp_id: String,
    ipk: Arc<IssuerPublicKey<E>>,
    nym: E::G1Affine,
    ou: String,
    role_mask: u32,
    proof: Signature<E>,
}

/// The holder side of an Idemix identity
#[derive(Clone, Debug)]
pub struct IdemixSigningIdentity<E: Pairing> {
    identity: IdemixIdentity<E>,
    sk: UserSecretKey<E::ScalarField>,
    pseudonym: Pseudonym<E>,
    credential: Credential<E>,
}

impl<E: Pairing> IdemixIdentity<E>
where
    E::G1Affine: NymCoordinates,
{
    /// Parse an identity received from another party and validate it against the issuer key of its MSP
    pub fn from_serialized<D: Digest>(
        serialized: &SerializedIdentity,
        ipk: Arc<IssuerPublicKey<E>>,
    ) -> Result<Self, MspError> {
        let id = SerializedIdemixIdentity::from_bytes(&serialized.id_bytes)?;
        let identity = Self {
            msp_id: serialized.msp_id.clone(),
            nym: E::G1Affine::from_coordinates(&id.nym_x, &id.nym_y)?,
            ou: id.organizational_unit()?,
            role_mask: id.role_mask()?,
            proof: Signature::deserialize_compressed(id.proof.as_slice())?,
            ipk,
        };
        identity.validate::<D>()?;
        Ok(identity)
    }

    /// Checks the issuer key and that the proof is for this identity's pseudonym and discloses its
    /// organizational unit and role
    pub fn validate<D: Digest>(&self) -> Result<(), MspError> {
        if self.msp_id.is_empty() {
            return Err(MspError::EmptyMspId);
        }
        validate_role_mask(self.role_mask)?;
        check_issuer_key::<E, D>(&self.ipk)?;
        if self.proof.nym != self.nym {
            return Err(MspError::PseudonymMismatch);
        }
        self.proof.verify::<D>(
            &IDENTITY_DISCLOSURE,
            &self.ipk,
            &[],
            &expected_revealed::<E::ScalarField, D>(&self.ou, self.role_mask),
        )?;
        Ok(())
    }

    /// `signature` is a serialized [`NymSignature`]
    pub fn verify_signature<D: Digest>(
        &self,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), MspError> {
        let signature = NymSignature::<E>::deserialize_compressed(signature)?;
        signature.verify::<D>(&self.nym, &self.ipk, message)?;
        Ok(())
    }

    pub fn serialize(&self) -> Result<SerializedIdentity, MspError> {
        let (nym_x, nym_y) = self.nym.to_coordinates()?;
        let mut proof = Vec::new();
        self.proof.serialize_compressed(&mut proof)?;
        let id = SerializedIdemixIdentity {
            nym_x,
            nym_y,
            ou: self.ou.as_bytes().to_vec(),
            role: self.role_mask.to_be_bytes().to_vec(),
            proof,
        };
        Ok(SerializedIdentity {
            msp_id: self.msp_id.clone(),
            id_bytes: id.to_bytes()?,
        })
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    pub fn ou(&self) -> &str {
        &self.ou
    }

    pub fn role_mask(&self) -> u32 {
        self.role_mask
    }

    pub fn roles(&self) -> Vec<MspRole> {
        mask_to_roles(self.role_mask)
    }

    pub fn nym(&self) -> &E::G1Affine {
        &self.nym
    }

    pub fn issuer_public_key(&self) -> &Arc<IssuerPublicKey<E>> {
        &self.ipk
    }
}

impl<E: Pairing> IdemixSigningIdentity<E>
where
    E::G1Affine: NymCoordinates,
{
    /// Create an identity with a fresh pseudonym and proof
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        msp_id: &str,
        ipk: Arc<IssuerPublicKey<E>>,
        credential: Credential<E>,
        sk: UserSecretKey<E::ScalarField>,
        ou: &str,
        role_mask: u32,
    ) -> Result<Self, MspError> {
        let pseudonym = Pseudonym::new(rng, &sk, &ipk);
        Self::with_pseudonym::<R, D>(rng, msp_id, ipk, credential, sk, pseudonym, ou, role_mask)
    }

    /// Create an identity for an existing pseudonym with a fresh proof
    #[allow(clippy::too_many_arguments)]
    pub fn with_pseudonym<R: RngCore, D: Digest>(
        rng: &mut R,
        msp_id: &str,
        ipk: Arc<IssuerPublicKey<E>>,
        credential: Credential<E>,
        sk: UserSecretKey<E::ScalarField>,
        pseudonym: Pseudonym<E>,
        ou: &str,
        role_mask: u32,
    ) -> Result<Self, MspError> {
        let build = |rng: &mut R| -> Result<Signature<E>, MspError> {
            check_holder_inputs::<E, D>(msp_id, &ipk, &credential, &sk, &pseudonym, ou, role_mask)?;
            let proof = Signature::new::<R, D>(
                rng,
                &credential,
                &sk,
                &pseudonym,
                &ipk,
                &IDENTITY_DISCLOSURE,
                &[],
            )?;
            Ok(proof)
        };
        let proof = build(rng).map_err(MspError::construction)?;
        Self::assemble::<D>(msp_id, ipk, credential, sk, pseudonym, proof, ou, role_mask)
    }

    /// Create an identity from an existing pseudonym and proof, like one restored from storage. The
    /// proof must be for the pseudonym.
    #[allow(clippy::too_many_arguments)]
    pub fn with_proof<D: Digest>(
        msp_id: &str,
        ipk: Arc<IssuerPublicKey<E>>,
        credential: Credential<E>,
        sk: UserSecretKey<E::ScalarField>,
        pseudonym: Pseudonym<E>,
        proof: Signature<E>,
        ou: &str,
        role_mask: u32,
    ) -> Result<Self, MspError> {
        check_holder_inputs::<E, D>(msp_id, &ipk, &credential, &sk, &pseudonym, ou, role_mask)
            .map_err(MspError::construction)?;
        if proof.nym != pseudonym.nym {
            return Err(MspError::PseudonymMismatch.construction());
        }
        Self::assemble::<D>(msp_id, ipk, credential, sk, pseudonym, proof, ou, role_mask)
    }

    /// Serialized [`NymSignature`] on `message` under this identity's pseudonym
    pub fn sign<R: RngCore, D: Digest>(
        &self,
        rng: &mut R,
        message: &[u8],
    ) -> Result<Vec<u8>, MspError> {
        let signature = NymSignature::new::<R, D>(
            rng,
            &self.sk,
            &self.pseudonym,
            &self.identity.ipk,
            message,
        )?;
        let mut bytes = Vec::new();
        signature.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn verify_signature<D: Digest>(
        &self,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), MspError> {
        self.identity.verify_signature::<D>(message, signature)
    }

    pub fn serialize(&self) -> Result<SerializedIdentity, MspError> {
        self.identity.serialize()
    }

    pub fn identity(&self) -> &IdemixIdentity<E> {
        &self.identity
    }

    pub fn pseudonym(&self) -> &Pseudonym<E> {
        &self.pseudonym
    }

    pub fn proof(&self) -> &Signature<E> {
        &self.identity.proof
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble<D: Digest>(
        msp_id: &str,
        ipk: Arc<IssuerPublicKey<E>>,
        credential: Credential<E>,
        sk: UserSecretKey<E::ScalarField>,
        pseudonym: Pseudonym<E>,
        proof: Signature<E>,
        ou: &str,
        role_mask: u32,
    ) -> Result<Self, MspError> {
        let identity = IdemixIdentity {
            msp_id: msp_id.to_string(),
            ipk,
            nym: pseudonym.nym,
            ou: ou.to_string(),
            role_mask,
            proof,
        };
        identity
            .validate::<D>()
            .map_err(MspError::construction)?;
        Ok(Self {
            identity,
            sk,
            pseudonym,
            credential,
        })
    }
}

impl<E: Pairing> IdemixSigningIdentity<E> {
    pub fn credential(&self) -> &Credential<E> {
        &self.credential
    }
}

fn check_issuer_key<E: Pairing, D: Digest>(ipk: &IssuerPublicKey<E>) -> Result<(), MspError> {
    ipk.check::<D>()?;
    if ipk.attribute_names.len() != ATTRIBUTE_NAMES.len()
        || ipk
            .attribute_names
            .iter()
            .zip(ATTRIBUTE_NAMES)
            .any(|(a, b)| a != b)
    {
        return Err(MspError::UnexpectedAttributeNames);
    }
    Ok(())
}

fn check_holder_inputs<E: Pairing, D: Digest>(
    msp_id: &str,
    ipk: &IssuerPublicKey<E>,
    credential: &Credential<E>,
    sk: &UserSecretKey<E::ScalarField>,
    pseudonym: &Pseudonym<E>,
    ou: &str,
    role_mask: u32,
) -> Result<(), MspError> {
    if msp_id.is_empty() {
        return Err(MspError::EmptyMspId);
    }
    validate_role_mask(role_mask)?;
    check_issuer_key::<E, D>(ipk)?;
    credential.verify(sk, ipk)?;
    let expected = identity_attributes::<E::ScalarField, D>(ou, role_mask);
    if credential.attributes[OU_INDEX] != expected[OU_INDEX] {
        return Err(MspError::OrganizationalUnitMismatch);
    }
    if credential.attributes[ROLE_INDEX] != expected[ROLE_INDEX] {
        return Err(MspError::RoleMismatch);
    }
    pseudonym.check_opening(sk, ipk)?;
    Ok(())
}
