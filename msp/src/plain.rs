//! Signing identity with a long-term public key. Its signatures are linkable and reveal the key, which
//! is the payload of its serialized form.

use crate::{error::MspError, serialized::SerializedIdentity};
use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use digest::Digest;
use idemix_utils::schnorr_signature::{Signature, SigningKey};

#[derive(Clone, Debug)]
pub struct PlainKeySigner<G: AffineRepr> {
    msp_id: String,
    signing_key: SigningKey<G>,
    public_key: G,
}

impl<G: AffineRepr> PlainKeySigner<G> {
    pub fn new<R: RngCore>(rng: &mut R, msp_id: &str) -> Result<Self, MspError> {
        Self::from_signing_key(msp_id, SigningKey::new(rng))
    }

    pub fn from_signing_key(msp_id: &str, signing_key: SigningKey<G>) -> Result<Self, MspError> {
        if msp_id.is_empty() {
            return Err(MspError::EmptyMspId.construction());
        }
        Ok(Self {
            msp_id: msp_id.to_string(),
            public_key: signing_key.public_key(&G::generator()),
            signing_key,
        })
    }

    pub fn sign<R: RngCore, D: Digest>(
        &self,
        rng: &mut R,
        message: &[u8],
    ) -> Result<Vec<u8>, MspError> {
        let signature =
            Signature::new::<R, D>(rng, message, &self.signing_key, &G::generator())?;
        let mut bytes = Vec::new();
        signature.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn verify_signature<D: Digest>(
        &self,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), MspError> {
        verify_with_public_key::<G, D>(&self.public_key, message, signature)
    }

    pub fn serialize(&self) -> Result<SerializedIdentity, MspError> {
        let mut id_bytes = Vec::new();
        self.public_key.serialize_compressed(&mut id_bytes)?;
        Ok(SerializedIdentity {
            msp_id: self.msp_id.clone(),
            id_bytes,
        })
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    pub fn public_key(&self) -> &G {
        &self.public_key
    }
}

/// Verify a signature of a plain identity received in serialized form
pub fn verify_serialized<G: AffineRepr, D: Digest>(
    identity: &SerializedIdentity,
    message: &[u8],
    signature: &[u8],
) -> Result<(), MspError> {
    let public_key = G::deserialize_compressed(identity.id_bytes.as_slice())?;
    verify_with_public_key::<G, D>(&public_key, message, signature)
}

fn verify_with_public_key<G: AffineRepr, D: Digest>(
    public_key: &G,
    message: &[u8],
    signature: &[u8],
) -> Result<(), MspError> {
    let signature = Signature::<G>::deserialize_compressed(signature)?;
    if !signature.verify::<D>(message, public_key, &G::generator())? {
        return Err(MspError::InvalidPlainSignature);
    }
    Ok(())
}
