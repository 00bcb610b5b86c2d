//! Signature on a message by the owner of a pseudonym: a Schnorr proof of knowledge of `(sk, r)` in
//! `nym = h_sk*sk + h_rand*r` with the message in the challenge. Much cheaper than a
//! [`Signature`](crate::signature::Signature) of possession as it says nothing about the credential.

use crate::{
    error::IdemixError,
    nym::Pseudonym,
    schnorr::{compute_random_oracle_challenge, SchnorrCommitment, SchnorrResponse},
    setup::{IssuerPublicKey, UserSecretKey},
};
use ark_ec::{pairing::Pairing, AffineRepr};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{rand::RngCore, vec, vec::Vec, UniformRand};
use digest::Digest;
use idemix_utils::{serde_utils::ArkObjectBytes, serialize_all};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

const NYM_SIGNATURE_LABEL: &[u8] = b"IDEMIX-NYM-SIGNATURE";

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct NymSignature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub nonce: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: E::ScalarField,
    /// `[sk, r]`
    pub response: SchnorrResponse<E::G1Affine>,
}

impl<E: Pairing> NymSignature<E> {
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        sk: &UserSecretKey<E::ScalarField>,
        pseudonym: &Pseudonym<E>,
        ipk: &IssuerPublicKey<E>,
        message: &[u8],
    ) -> Result<Self, IdemixError> {
        pseudonym.check_opening(sk, ipk)?;
        let comm = SchnorrCommitment::new(
            &[ipk.h_sk, ipk.h_rand],
            vec![E::ScalarField::rand(rng), E::ScalarField::rand(rng)],
        );
        let nonce = E::ScalarField::rand(rng);
        let challenge = Self::compute_challenge::<D>(&comm.t, &pseudonym.nym, ipk, &nonce, message)?;
        let response = comm.response(&[sk.0, pseudonym.randomness], &challenge)?;
        Ok(Self {
            nonce,
            challenge,
            response,
        })
    }

    pub fn verify<D: Digest>(
        &self,
        nym: &E::G1Affine,
        ipk: &IssuerPublicKey<E>,
        message: &[u8],
    ) -> Result<(), IdemixError> {
        if nym.is_zero() {
            return Err(IdemixError::ZeroNym);
        }
        if self.response.len() != 2 {
            return Err(IdemixError::InvalidNymSignature);
        }
        let t = self
            .response
            .commitment(&[ipk.h_sk, ipk.h_rand], nym, &self.challenge)?;
        if Self::compute_challenge::<D>(&t, nym, ipk, &self.nonce, message)? != self.challenge {
            return Err(IdemixError::InvalidNymSignature);
        }
        Ok(())
    }

    fn compute_challenge<D: Digest>(
        t: &E::G1Affine,
        nym: &E::G1Affine,
        ipk: &IssuerPublicKey<E>,
        nonce: &E::ScalarField,
        message: &[u8],
    ) -> Result<E::ScalarField, SerializationError> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(NYM_SIGNATURE_LABEL);
        serialize_all!(bytes, t, &ipk.h_sk, &ipk.h_rand, nym);
        bytes.extend_from_slice(&ipk.hash);
        serialize_all!(bytes, nonce);
        bytes.extend_from_slice(message);
        Ok(compute_random_oracle_challenge::<E::ScalarField, D>(&bytes))
    }
}
