//! Pseudonym of a user, a Pedersen commitment `nym = h_sk*sk + h_rand*r` to its secret key. A fresh one is
//! created per session and pseudonyms of the same user can't be linked to each other.

use crate::{
    error::IdemixError,
    setup::{IssuerPublicKey, UserSecretKey},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use idemix_utils::serde_utils::ArkObjectBytes;
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
pub struct Pseudonym<E: Pairing> {
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub nym: E::G1Affine,
    /// Opening of the commitment, known only to the user
    #[serde_as(as = "ArkObjectBytes")]
    pub randomness: E::ScalarField,
}

impl<E: Pairing> Pseudonym<E> {
    pub fn new<R: RngCore>(
        rng: &mut R,
        sk: &UserSecretKey<E::ScalarField>,
        ipk: &IssuerPublicKey<E>,
    ) -> Self {
        let randomness = E::ScalarField::rand(rng);
        Self {
            nym: Self::commit(sk, &randomness, ipk),
            randomness,
        }
    }

    /// Check that this pseudonym opens to `sk`. Used when a stored pseudonym is handed back to the user.
    pub fn check_opening(
        &self,
        sk: &UserSecretKey<E::ScalarField>,
        ipk: &IssuerPublicKey<E>,
    ) -> Result<(), IdemixError> {
        if self.nym.is_zero() {
            return Err(IdemixError::ZeroNym);
        }
        if Self::commit(sk, &self.randomness, ipk) != self.nym {
            return Err(IdemixError::InvalidPseudonym);
        }
        Ok(())
    }

    fn commit(
        sk: &UserSecretKey<E::ScalarField>,
        randomness: &E::ScalarField,
        ipk: &IssuerPublicKey<E>,
    ) -> E::G1Affine {
        (ipk.h_sk * sk.0 + ipk.h_rand * *randomness).into_affine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{setup_issuer, Fr};
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn fresh_pseudonyms_differ() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let keypair = setup_issuer(&mut rng, &["OU", "Role"]);
        let ipk = &keypair.public_key;
        let sk = UserSecretKey::<Fr>::new(&mut rng);

        let nym1 = Pseudonym::new(&mut rng, &sk, ipk);
        let nym2 = Pseudonym::new(&mut rng, &sk, ipk);
        assert_ne!(nym1.nym, nym2.nym);
        assert_ne!(nym1.nym, (ipk.h_sk * sk.0).into_affine());

        nym1.check_opening(&sk, ipk).unwrap();
        nym2.check_opening(&sk, ipk).unwrap();
        assert!(nym1
            .check_opening(&UserSecretKey::<Fr>::new(&mut rng), ipk)
            .is_err());

        let mut mixed = nym1.clone();
        mixed.randomness = nym2.randomness;
        assert!(mixed.check_opening(&sk, ipk).is_err());

        test_serialization!(Pseudonym<Bls12_381>, nym1);
    }
}
