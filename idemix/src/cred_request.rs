//! Request for a credential. The user commits to its secret key as `nym = h_sk*sk` and proves knowledge of
//! `sk` with a Schnorr proof whose challenge includes the nonce the issuer handed out, so a request can't be
//! replayed to the same or another issuer.

use crate::{
    error::IdemixError,
    schnorr::compute_random_oracle_challenge,
    setup::{IssuerPublicKey, UserSecretKey},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use digest::Digest;
use idemix_utils::{serde_utils::ArkObjectBytes, serialize_all};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

const CREDENTIAL_REQUEST_LABEL: &[u8] = b"IDEMIX-CREDENTIAL-REQUEST";

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct CredentialRequest<E: Pairing> {
    /// `h_sk*sk`
    #[serde_as(as = "ArkObjectBytes")]
    pub nym: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub issuer_nonce: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub response: E::ScalarField,
}

impl<E: Pairing> CredentialRequest<E> {
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        sk: &UserSecretKey<E::ScalarField>,
        issuer_nonce: E::ScalarField,
        ipk: &IssuerPublicKey<E>,
    ) -> Result<Self, IdemixError> {
        let nym = (ipk.h_sk * sk.0).into_affine();
        let blinding = E::ScalarField::rand(rng);
        let t = (ipk.h_sk * blinding).into_affine();
        let challenge = Self::compute_challenge::<D>(&t, &nym, &issuer_nonce, ipk)?;
        Ok(Self {
            nym,
            issuer_nonce,
            challenge,
            response: blinding + challenge * sk.0,
        })
    }

    /// Called by the issuer with the nonce it gave to this user before issuing a credential
    pub fn verify<D: Digest>(
        &self,
        expected_issuer_nonce: &E::ScalarField,
        ipk: &IssuerPublicKey<E>,
    ) -> Result<(), IdemixError> {
        if self.issuer_nonce != *expected_issuer_nonce {
            return Err(IdemixError::IssuerNonceMismatch);
        }
        if self.nym.is_zero() {
            return Err(IdemixError::ZeroNym);
        }
        let t = (ipk.h_sk * self.response - self.nym * self.challenge).into_affine();
        if Self::compute_challenge::<D>(&t, &self.nym, &self.issuer_nonce, ipk)? != self.challenge {
            return Err(IdemixError::InvalidCredentialRequest);
        }
        Ok(())
    }

    fn compute_challenge<D: Digest>(
        t: &E::G1Affine,
        nym: &E::G1Affine,
        issuer_nonce: &E::ScalarField,
        ipk: &IssuerPublicKey<E>,
    ) -> Result<E::ScalarField, SerializationError> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(CREDENTIAL_REQUEST_LABEL);
        serialize_all!(bytes, t, &ipk.h_sk, nym, issuer_nonce);
        bytes.extend_from_slice(&ipk.hash);
        Ok(compute_random_oracle_challenge::<E::ScalarField, D>(&bytes))
    }
}
