//! Issuer and user keys
//!
//! The issuer's secret key is a single scalar `x`. Its public key fixes the ordered list of attribute names
//! and holds one generator per attribute plus `h_sk` (for the user's secret key) and `h_rand` (for the
//! credential's blinding). `w = g2*x` is used in the pairing checks and `(bar_g1, bar_g2 = bar_g1*x)`
//! together with `(proof_c, proof_s)` is a proof that the issuer knows `x`. `hash` is a digest of all other
//! fields and is mixed into every challenge so that proofs are bound to one issuer key.
//!
//! ```ignore
//! use ark_bls12_381::Bls12_381;
//! use blake2::Blake2b512;
//! use idemix::setup::IssuerKeypair;
//!
//! let keypair = IssuerKeypair::<Bls12_381>::generate_using_rng::<_, Blake2b512>(&mut rng, &["OU", "Role"]).unwrap();
//! keypair.public_key.check::<Blake2b512>().unwrap();
//! ```

use crate::{error::IdemixError, schnorr::compute_random_oracle_challenge};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{
    collections::BTreeSet,
    end_timer,
    rand::RngCore,
    start_timer,
    string::{String, ToString},
    vec::Vec,
    UniformRand,
};
use digest::Digest;
use idemix_utils::{
    concat_slices, expect_equality, hashing_utils::affine_group_elem_from_try_and_incr,
    serde_utils::ArkObjectBytes, serialize_all,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

const ISSUER_KEY_LABEL: &[u8] = b"IDEMIX-ISSUER-KEY";
const ISSUER_KEY_PROOF_LABEL: &[u8] = b"IDEMIX-ISSUER-KEY-POK";

/// Secret key of the issuer, `x`
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
pub struct IssuerSecretKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

/// Secret key of the user. Every pseudonym and every proof the user creates is derived from it.
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
pub struct UserSecretKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct IssuerPublicKey<E: Pairing> {
    pub attribute_names: Vec<String>,
    #[serde_as(as = "ArkObjectBytes")]
    pub h_sk: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub h_rand: E::G1Affine,
    /// One per attribute, in the order of `attribute_names`
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub h_attrs: Vec<E::G1Affine>,
    #[serde_as(as = "ArkObjectBytes")]
    pub w: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub bar_g1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub bar_g2: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub proof_c: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub proof_s: E::ScalarField,
    pub hash: Vec<u8>,
}

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
pub struct IssuerKeypair<E: Pairing> {
    pub secret_key: IssuerSecretKey<E::ScalarField>,
    #[zeroize(skip)]
    pub public_key: IssuerPublicKey<E>,
}

impl<F: PrimeField> IssuerSecretKey<F> {
    pub fn new<R: RngCore>(rng: &mut R) -> Self {
        Self(F::rand(rng))
    }
}

impl<F: PrimeField> UserSecretKey<F> {
    pub fn new<R: RngCore>(rng: &mut R) -> Self {
        Self(F::rand(rng))
    }
}

impl<E: Pairing> IssuerKeypair<E> {
    /// Create a new issuer key for the given ordered attribute names. Generators are hashed from a
    /// random seed so nobody knows discrete log relations between them.
    pub fn generate_using_rng<R: RngCore, D: Digest>(
        rng: &mut R,
        attribute_names: &[&str],
    ) -> Result<Self, IdemixError> {
        let keygen_time = start_timer!(|| "Issuer key generation");
        check_attribute_names(attribute_names.iter().copied())?;

        let secret_key = IssuerSecretKey::<E::ScalarField>::new(rng);
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let gen = |tag: &[u8]| {
            affine_group_elem_from_try_and_incr::<E::G1Affine, D>(&concat_slices!(
                ISSUER_KEY_LABEL,
                seed,
                tag
            ))
        };
        let h_sk = gen(b"h_sk");
        let h_rand = gen(b"h_rand");
        let bar_g1 = gen(b"bar_g1");
        let h_attrs = (0..attribute_names.len())
            .map(|i| gen(&concat_slices!(b"h_attr", (i as u64).to_le_bytes())))
            .collect::<Vec<_>>();

        let w = (E::G2Affine::generator() * secret_key.0).into_affine();
        let bar_g2 = (bar_g1 * secret_key.0).into_affine();

        // Proof of knowledge of `x` in both `w = g2*x` and `bar_g2 = bar_g1*x`
        let r = E::ScalarField::rand(rng);
        let t1 = (E::G2Affine::generator() * r).into_affine();
        let t2 = (bar_g1 * r).into_affine();
        let proof_c =
            IssuerPublicKey::<E>::key_proof_challenge::<D>(&t1, &t2, &bar_g1, &w, &bar_g2)?;
        let proof_s = r + proof_c * secret_key.0;

        let mut public_key = IssuerPublicKey {
            attribute_names: attribute_names.iter().map(|n| n.to_string()).collect(),
            h_sk,
            h_rand,
            h_attrs,
            w,
            bar_g1,
            bar_g2,
            proof_c,
            proof_s,
            hash: Vec::new(),
        };
        public_key.hash = public_key.compute_hash::<D>()?;
        end_timer!(keygen_time);
        Ok(Self {
            secret_key,
            public_key,
        })
    }
}

impl<E: Pairing> IssuerPublicKey<E> {
    /// Check that the key is well formed and that the issuer knows its secret key. Every consumer must
    /// call this (or [`Self::is_valid`]) before trusting a key, including after deserialization.
    pub fn check<D: Digest>(&self) -> Result<(), IdemixError> {
        check_attribute_names(self.attribute_names.iter().map(|n| n.as_str()))?;
        expect_equality!(
            self.h_attrs.len(),
            self.attribute_names.len(),
            IdemixError::AttributeCountMismatch
        );
        if self.h_sk.is_zero()
            || self.h_rand.is_zero()
            || self.bar_g1.is_zero()
            || self.bar_g2.is_zero()
            || self.w.is_zero()
            || self.h_attrs.iter().any(|h| h.is_zero())
        {
            return Err(IdemixError::InvalidIssuerKey);
        }

        let t1 = (E::G2Affine::generator() * self.proof_s - self.w * self.proof_c).into_affine();
        let t2 = (self.bar_g1 * self.proof_s - self.bar_g2 * self.proof_c).into_affine();
        let c = Self::key_proof_challenge::<D>(&t1, &t2, &self.bar_g1, &self.w, &self.bar_g2)?;
        if c != self.proof_c {
            return Err(IdemixError::InvalidIssuerKey);
        }

        if self.compute_hash::<D>()? != self.hash {
            return Err(IdemixError::IssuerKeyHashMismatch);
        }
        Ok(())
    }

    pub fn is_valid<D: Digest>(&self) -> bool {
        self.check::<D>().is_ok()
    }

    pub fn attribute_count(&self) -> usize {
        self.attribute_names.len()
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attribute_names.iter().position(|n| n == name)
    }

    /// Digest of every field except `hash`
    pub fn compute_hash<D: Digest>(&self) -> Result<Vec<u8>, SerializationError> {
        let mut bytes = Vec::new();
        serialize_all!(
            bytes,
            &self.attribute_names,
            &self.h_sk,
            &self.h_rand,
            &self.h_attrs,
            &self.w,
            &self.bar_g1,
            &self.bar_g2,
            &self.proof_c,
            &self.proof_s
        );
        Ok(D::digest(&bytes).to_vec())
    }

    /// `g1 + nym + h_rand*s + h_attrs[0]*attributes[0] + ... + h_attrs[n-1]*attributes[n-1]` where `nym`
    /// is the commitment `h_sk*sk` to the user's secret key.
    pub fn b_from_nym(
        &self,
        nym: &E::G1Affine,
        s: &E::ScalarField,
        attributes: &[E::ScalarField],
    ) -> Result<E::G1, IdemixError> {
        expect_equality!(
            attributes.len(),
            self.attribute_count(),
            IdemixError::AttributeCountMismatch
        );
        let mut bases = Vec::with_capacity(attributes.len() + 1);
        bases.push(self.h_rand);
        bases.extend_from_slice(&self.h_attrs);
        let mut scalars = Vec::with_capacity(attributes.len() + 1);
        scalars.push(*s);
        scalars.extend_from_slice(attributes);
        Ok(E::G1::msm_unchecked(&bases, &scalars) + E::G1Affine::generator() + nym)
    }

    /// Same as [`Self::b_from_nym`] with the nym computed from the user's secret key
    pub fn b(
        &self,
        sk: &UserSecretKey<E::ScalarField>,
        s: &E::ScalarField,
        attributes: &[E::ScalarField],
    ) -> Result<E::G1, IdemixError> {
        self.b_from_nym(&(self.h_sk * sk.0).into_affine(), s, attributes)
    }

    fn key_proof_challenge<D: Digest>(
        t1: &E::G2Affine,
        t2: &E::G1Affine,
        bar_g1: &E::G1Affine,
        w: &E::G2Affine,
        bar_g2: &E::G1Affine,
    ) -> Result<E::ScalarField, SerializationError> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(ISSUER_KEY_PROOF_LABEL);
        serialize_all!(
            bytes,
            t1,
            t2,
            &E::G2Affine::generator(),
            bar_g1,
            w,
            bar_g2
        );
        Ok(compute_random_oracle_challenge::<E::ScalarField, D>(&bytes))
    }
}

fn check_attribute_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), IdemixError> {
    let mut seen = BTreeSet::new();
    for (i, name) in names.enumerate() {
        if !seen.insert(name) {
            return Err(IdemixError::DuplicateAttributeName(i));
        }
    }
    if seen.is_empty() {
        return Err(IdemixError::NoAttributeNames);
    }
    Ok(())
}
