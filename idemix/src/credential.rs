//! Credential issued by the issuer. It is a BBS+ signature `(A, e, s)` where
//! `B = g1 + h_sk*sk + h_rand*s + h_attrs[0]*a_0 + ... + h_attrs[n-1]*a_{n-1}` and `A = B * 1/(e+x)`.
//! The issuer only sees `h_sk*sk` from the [`CredentialRequest`], never `sk`.
//!
//! Before use in a proof the credential is randomized to `(A', A_bar, B')` which is unlinkable to `(A, B)`
//! but still verifiable.

use crate::{
    cred_request::CredentialRequest,
    error::IdemixError,
    setup::{IssuerPublicKey, IssuerSecretKey, UserSecretKey},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, rand::RngCore, start_timer, vec::Vec, UniformRand, Zero};
use idemix_utils::{expect_equality, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

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
pub struct Credential<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub A: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub B: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub e: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s: E::ScalarField,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub attributes: Vec<E::ScalarField>,
}

/// A credential randomized for one proof. `A_prime`, `A_bar` and `B_prime` go into the proof while the
/// rest are witnesses and must not leave the prover.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize, ZeroizeOnDrop)]
pub struct RandomizedCredential<E: Pairing> {
    /// `A * r1`
    pub A_prime: E::G1Affine,
    /// `B * r1 - A' * e`, equal to `A' * x`
    pub A_bar: E::G1Affine,
    /// `B * r1 - h_rand * r2`
    pub B_prime: E::G1Affine,
    pub r2: E::ScalarField,
    /// `1 / r1`
    pub r3: E::ScalarField,
    /// `s - r2 * r3`
    pub s_prime: E::ScalarField,
    pub e: E::ScalarField,
    pub attributes: Vec<E::ScalarField>,
}

impl<E: Pairing> Credential<E> {
    /// Called by the issuer after it has verified `request` with
    /// [`CredentialRequest::verify`]. `attributes` must be in the order of the issuer key's attribute names.
    pub fn issue<R: RngCore>(
        rng: &mut R,
        isk: &IssuerSecretKey<E::ScalarField>,
        ipk: &IssuerPublicKey<E>,
        request: &CredentialRequest<E>,
        attributes: &[E::ScalarField],
    ) -> Result<Self, IdemixError> {
        let issue_time = start_timer!(|| "Credential issuance");
        expect_equality!(
            attributes.len(),
            ipk.attribute_count(),
            IdemixError::AttributeCountMismatch
        );
        if request.nym.is_zero() {
            return Err(IdemixError::ZeroNym);
        }
        let s = E::ScalarField::rand(rng);
        let B = ipk.b_from_nym(&request.nym, &s, attributes)?;
        let (e, e_plus_x_inv) = loop {
            let e = E::ScalarField::rand(rng);
            if let Some(inv) = (e + isk.0).inverse() {
                break (e, inv);
            }
        };
        let points = E::G1::normalize_batch(&[B * e_plus_x_inv, B]);
        end_timer!(issue_time);
        Ok(Self {
            A: points[0],
            B: points[1],
            e,
            s,
            attributes: attributes.to_vec(),
        })
    }

    /// Called by the user on receiving the credential. Recomputes `B` from `sk` and the attributes, which
    /// catches a credential issued for another user, and checks `e(A, w + g2*e) = e(B, g2)`.
    pub fn verify(
        &self,
        sk: &UserSecretKey<E::ScalarField>,
        ipk: &IssuerPublicKey<E>,
    ) -> Result<(), IdemixError> {
        if self.A.is_zero() {
            return Err(IdemixError::ZeroSignature);
        }
        let B = ipk.b(sk, &self.s, &self.attributes)?.into_affine();
        if B != self.B {
            return Err(IdemixError::InvalidCredential);
        }
        let g2 = E::G2Affine::generator();
        let w_plus_g2_e = (g2 * self.e + ipk.w).into_affine();
        let minus_B = (-self.B.into_group()).into_affine();
        if !E::multi_pairing([self.A, minus_B], [w_plus_g2_e, g2]).is_zero() {
            return Err(IdemixError::PairingCheckFailed);
        }
        Ok(())
    }

    /// Randomize with fresh `r1` and `r2`. Two randomizations of the same credential have nothing in common.
    pub fn randomize<R: RngCore>(
        &self,
        rng: &mut R,
        ipk: &IssuerPublicKey<E>,
    ) -> RandomizedCredential<E> {
        let (r1, r3) = loop {
            let r1 = E::ScalarField::rand(rng);
            if let Some(r3) = r1.inverse() {
                break (r1, r3);
            }
        };
        let r2 = E::ScalarField::rand(rng);
        let A_prime = self.A * r1;
        let B_r1 = self.B * r1;
        let points =
            E::G1::normalize_batch(&[A_prime, B_r1 - A_prime * self.e, B_r1 - ipk.h_rand * r2]);
        RandomizedCredential {
            A_prime: points[0],
            A_bar: points[1],
            B_prime: points[2],
            r2,
            r3,
            s_prime: self.s - r2 * r3,
            e: self.e,
            attributes: self.attributes.clone(),
        }
    }
}

impl<E: Pairing> RandomizedCredential<E> {
    /// `e(A', w) = e(A_bar, g2)` and `B' * r3 = g1 + h_sk*sk + h_rand*s' + sum(h_attrs[i]*a_i)`
    pub fn verify(
        &self,
        sk: &UserSecretKey<E::ScalarField>,
        ipk: &IssuerPublicKey<E>,
    ) -> Result<(), IdemixError> {
        if self.A_prime.is_zero() {
            return Err(IdemixError::ZeroSignature);
        }
        if !E::multi_pairing(
            [self.A_prime, (-self.A_bar.into_group()).into_affine()],
            [ipk.w, E::G2Affine::generator()],
        )
        .is_zero()
        {
            return Err(IdemixError::PairingCheckFailed);
        }
        if (self.B_prime * self.r3) != ipk.b(sk, &self.s_prime, &self.attributes)? {
            return Err(IdemixError::InvalidCredential);
        }
        Ok(())
    }
}
