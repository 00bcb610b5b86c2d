//! Plain (non-anonymous) Schnorr signature in any prime order group. Used by identities that sign with a
//! long-term public key instead of an anonymous credential.

use crate::{hashing_utils::hash_to_field, serde_utils::ArkObjectBytes};
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

const SCHNORR_SIGNATURE_DST: &[u8] = b"IDEMIX-PLAIN-SCHNORR-SIG";

/// Long-term signing key of a plain signer
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct SigningKey<G: AffineRepr>(#[serde_as(as = "ArkObjectBytes")] pub G::ScalarField);

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Signature<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub response: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: G::ScalarField,
}

impl<G: AffineRepr> SigningKey<G> {
    pub fn new<R: RngCore>(rng: &mut R) -> Self {
        Self(G::ScalarField::rand(rng))
    }

    /// `gen * sk`
    pub fn public_key(&self, gen: &G) -> G {
        (*gen * self.0).into_affine()
    }
}

impl<G: AffineRepr> Signature<G> {
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        message: &[u8],
        signing_key: &SigningKey<G>,
        gen: &G,
    ) -> Result<Self, SerializationError> {
        let r = G::ScalarField::rand(rng);
        let t = (*gen * r).into_affine();
        let public_key = signing_key.public_key(gen);
        let challenge = Self::compute_challenge::<D>(&t, &public_key, gen, message)?;
        let response = r + challenge * signing_key.0;
        Ok(Self {
            response,
            challenge,
        })
    }

    /// Recomputes `t = gen * response - public_key * challenge` and compares the challenge derived
    /// from it with the one in the signature.
    pub fn verify<D: Digest>(
        &self,
        message: &[u8],
        public_key: &G,
        gen: &G,
    ) -> Result<bool, SerializationError> {
        let t = (*gen * self.response - *public_key * self.challenge).into_affine();
        Ok(Self::compute_challenge::<D>(&t, public_key, gen, message)? == self.challenge)
    }

    /// Hash of `t`, the public key, the generator and the message
    pub fn compute_challenge<D: Digest>(
        t: &G,
        public_key: &G,
        gen: &G,
        message: &[u8],
    ) -> Result<G::ScalarField, SerializationError> {
        let mut challenge_bytes = Vec::with_capacity(t.compressed_size() * 3 + message.len());
        t.serialize_compressed(&mut challenge_bytes)?;
        public_key.serialize_compressed(&mut challenge_bytes)?;
        gen.serialize_compressed(&mut challenge_bytes)?;
        challenge_bytes.extend_from_slice(message);
        Ok(hash_to_field::<G::ScalarField, D>(
            SCHNORR_SIGNATURE_DST,
            &challenge_bytes,
        ))
    }
}
