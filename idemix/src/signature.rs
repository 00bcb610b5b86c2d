//! Signature of possession: a non-interactive proof that the signer holds a credential from the issuer
//! whose secret key is the one committed in a pseudonym, revealing some of the credential's attributes
//! and bound to a message.
//!
//! The credential `(A, B, e, s)` is randomized to `(A', A_bar, B')` with `r1`, `r2`, `r3 = 1/r1` and
//! `s' = s - r2*r3` (see [`RandomizedCredential`]). The verifier checks `e(A', w) = e(A_bar, g2)` which
//! holds for any well-formed randomization, and the signer proves knowledge of the openings of the
//! following 3 relations with Schnorr protocols under a single challenge:
//!
//! 1. `A_bar - B' = A' * -e + h_rand * r2`
//! 2. `-(g1 + sum(h_attrs[i] * a_i for disclosed i)) = B' * -r3 + h_sk * sk + h_rand * s' + sum(h_attrs[j] * a_j for hidden j)`
//! 3. `nym = h_sk * sk + h_rand * r_nym`
//!
//! The same blinding is used for `sk` in relations 2 and 3 so equal responses show the credential and the
//! pseudonym are for the same secret key.
//!
//! The challenge covers the commitments, the randomized credential, the pseudonym, the issuer key hash,
//! the disclosure, the revealed values, a fresh nonce and the message.

use crate::{
    credential::Credential,
    error::IdemixError,
    nym::Pseudonym,
    schnorr::{compute_random_oracle_challenge, SchnorrCommitment, SchnorrResponse},
    setup::{IssuerPublicKey, UserSecretKey},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    end_timer,
    rand::RngCore,
    start_timer, vec,
    vec::Vec,
    UniformRand, Zero,
};
use digest::Digest;
use idemix_utils::{expect_equality, serde_utils::ArkObjectBytes, serialize_all};
use itertools::multiunzip;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

const SIGNATURE_LABEL: &[u8] = b"IDEMIX-SIGNATURE-OF-POSSESSION";

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Signature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub A_prime: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub A_bar: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub B_prime: E::G1Affine,
    /// Pseudonym the signature is for
    #[serde_as(as = "ArkObjectBytes")]
    pub nym: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub nonce: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: E::ScalarField,
    /// Responses for relation 1, `[-e, r2]`
    pub sc_resp_1: SchnorrResponse<E::G1Affine>,
    /// Responses for relation 2, `[-r3, sk, s', hidden attributes in increasing index order]`
    pub sc_resp_2: SchnorrResponse<E::G1Affine>,
    /// Responses for relation 3, `[sk, r_nym]`
    pub sc_resp_3: SchnorrResponse<E::G1Affine>,
    /// Attribute index -> value for the disclosed attributes
    #[serde_as(as = "BTreeMap<_, ArkObjectBytes>")]
    pub revealed_attributes: BTreeMap<usize, E::ScalarField>,
}

impl<E: Pairing> Signature<E> {
    /// Create a signature of possession of `credential` for `pseudonym`. `disclosure[i]` decides whether the
    /// `i`-th attribute is revealed. Fails if the credential or the pseudonym isn't for `sk`.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        credential: &Credential<E>,
        sk: &UserSecretKey<E::ScalarField>,
        pseudonym: &Pseudonym<E>,
        ipk: &IssuerPublicKey<E>,
        disclosure: &[bool],
        message: &[u8],
    ) -> Result<Self, IdemixError> {
        let sign_time = start_timer!(|| "Signature of possession");
        let attribute_count = ipk.attribute_count();
        expect_equality!(
            disclosure.len(),
            attribute_count,
            IdemixError::DisclosureLengthMismatch
        );
        expect_equality!(
            credential.attributes.len(),
            attribute_count,
            IdemixError::AttributeCountMismatch
        );
        if ipk.h_attrs.len() != attribute_count {
            return Err(IdemixError::InvalidIssuerKey);
        }
        if pseudonym.nym.is_zero() {
            return Err(IdemixError::ZeroNym);
        }
        pseudonym.check_opening(sk, ipk)?;
        if ipk
            .b(sk, &credential.s, &credential.attributes)?
            .into_affine()
            != credential.B
        {
            return Err(IdemixError::InvalidCredential);
        }

        let cred = credential.randomize(rng, ipk);
        let revealed_attributes = disclosure
            .iter()
            .enumerate()
            .filter(|(_, d)| **d)
            .map(|(i, _)| (i, cred.attributes[i]))
            .collect::<BTreeMap<_, _>>();
        let (hidden_bases, hidden_attrs, hidden_blindings): (Vec<_>, Vec<_>, Vec<_>) = multiunzip(
            disclosure
                .iter()
                .enumerate()
                .filter(|(_, d)| !**d)
                .map(|(i, _)| {
                    (
                        ipk.h_attrs[i],
                        cred.attributes[i],
                        E::ScalarField::rand(rng),
                    )
                }),
        );

        let sk_blinding = E::ScalarField::rand(rng);

        // Relation 1
        let bases_1 = [cred.A_prime, ipk.h_rand];
        let sc_comm_1 = SchnorrCommitment::new(
            &bases_1,
            vec![E::ScalarField::rand(rng), E::ScalarField::rand(rng)],
        );
        let wits_1 = [-cred.e, cred.r2];

        // Relation 2
        let mut bases_2 = vec![cred.B_prime, ipk.h_sk, ipk.h_rand];
        bases_2.extend_from_slice(&hidden_bases);
        let mut blindings_2 = vec![
            E::ScalarField::rand(rng),
            sk_blinding,
            E::ScalarField::rand(rng),
        ];
        blindings_2.extend_from_slice(&hidden_blindings);
        let sc_comm_2 = SchnorrCommitment::new(&bases_2, blindings_2);
        let mut wits_2 = vec![-cred.r3, sk.0, cred.s_prime];
        wits_2.extend_from_slice(&hidden_attrs);

        // Relation 3
        let bases_3 = [ipk.h_sk, ipk.h_rand];
        let sc_comm_3 =
            SchnorrCommitment::new(&bases_3, vec![sk_blinding, E::ScalarField::rand(rng)]);
        let wits_3 = [sk.0, pseudonym.randomness];

        let nonce = E::ScalarField::rand(rng);
        let challenge_bytes = Self::compute_challenge_contribution(
            &sc_comm_1.t,
            &sc_comm_2.t,
            &sc_comm_3.t,
            &cred.A_prime,
            &cred.A_bar,
            &cred.B_prime,
            &pseudonym.nym,
            ipk,
            disclosure,
            &revealed_attributes,
            &nonce,
            message,
        )?;
        let challenge = compute_random_oracle_challenge::<E::ScalarField, D>(&challenge_bytes);

        let sc_resp_1 = sc_comm_1.response(&wits_1, &challenge)?;
        let sc_resp_2 = sc_comm_2.response(&wits_2, &challenge)?;
        let sc_resp_3 = sc_comm_3.response(&wits_3, &challenge)?;
        end_timer!(sign_time);
        Ok(Self {
            A_prime: cred.A_prime,
            A_bar: cred.A_bar,
            B_prime: cred.B_prime,
            nym: pseudonym.nym,
            nonce,
            challenge,
            sc_resp_1,
            sc_resp_2,
            sc_resp_3,
            revealed_attributes,
        })
    }

    /// Verify the signature for `message` with the given disclosure. `expected_revealed` must contain
    /// exactly the disclosed attribute indices mapped to the values the verifier expects.
    pub fn verify<D: Digest>(
        &self,
        disclosure: &[bool],
        ipk: &IssuerPublicKey<E>,
        message: &[u8],
        expected_revealed: &BTreeMap<usize, E::ScalarField>,
    ) -> Result<(), IdemixError> {
        let verify_time = start_timer!(|| "Verify signature of possession");
        expect_equality!(
            disclosure.len(),
            ipk.attribute_count(),
            IdemixError::DisclosureLengthMismatch
        );
        let disclosed = disclosure
            .iter()
            .enumerate()
            .filter(|(_, d)| **d)
            .map(|(i, _)| i)
            .collect::<BTreeSet<_>>();
        if !self.revealed_attributes.keys().eq(disclosed.iter())
            || !expected_revealed.keys().eq(disclosed.iter())
        {
            return Err(IdemixError::RevealedAttributesMismatch);
        }
        for (i, v) in &self.revealed_attributes {
            if expected_revealed.get(i) != Some(v) {
                return Err(IdemixError::RevealedAttributeMismatch(*i));
            }
        }

        if self.A_prime.is_zero() {
            return Err(IdemixError::ZeroSignature);
        }
        if self.nym.is_zero() {
            return Err(IdemixError::ZeroNym);
        }
        // e(A', w) = e(A_bar, g2)
        if !E::multi_pairing(
            [self.A_prime, (-self.A_bar.into_group()).into_affine()],
            [ipk.w, E::G2Affine::generator()],
        )
        .is_zero()
        {
            return Err(IdemixError::PairingCheckFailed);
        }

        let hidden_count = disclosure.len() - disclosed.len();
        if self.sc_resp_1.len() != 2
            || self.sc_resp_2.len() != 3 + hidden_count
            || self.sc_resp_3.len() != 2
        {
            return Err(IdemixError::InvalidProof);
        }
        // Same secret key in the credential and the pseudonym
        if self.sc_resp_2.get_response(1)? != self.sc_resp_3.get_response(0)? {
            return Err(IdemixError::InvalidProof);
        }

        let t1 = self.sc_resp_1.commitment(
            &[self.A_prime, ipk.h_rand],
            &(self.A_bar.into_group() - self.B_prime).into_affine(),
            &self.challenge,
        )?;

        let mut bases_2 = vec![self.B_prime, ipk.h_sk, ipk.h_rand];
        let mut disclosed_bases = Vec::with_capacity(disclosed.len());
        let mut disclosed_values = Vec::with_capacity(disclosed.len());
        for (i, h) in ipk.h_attrs.iter().enumerate() {
            match self.revealed_attributes.get(&i) {
                Some(v) => {
                    disclosed_bases.push(*h);
                    disclosed_values.push(*v);
                }
                None => bases_2.push(*h),
            }
        }
        let y_2 = -(E::G1::msm_unchecked(&disclosed_bases, &disclosed_values)
            + E::G1Affine::generator());
        let t2 = self
            .sc_resp_2
            .commitment(&bases_2, &y_2.into_affine(), &self.challenge)?;

        let t3 =
            self.sc_resp_3
                .commitment(&[ipk.h_sk, ipk.h_rand], &self.nym, &self.challenge)?;

        let challenge_bytes = Self::compute_challenge_contribution(
            &t1,
            &t2,
            &t3,
            &self.A_prime,
            &self.A_bar,
            &self.B_prime,
            &self.nym,
            ipk,
            disclosure,
            &self.revealed_attributes,
            &self.nonce,
            message,
        )?;
        let challenge = compute_random_oracle_challenge::<E::ScalarField, D>(&challenge_bytes);
        end_timer!(verify_time);
        if challenge != self.challenge {
            return Err(IdemixError::InvalidProof);
        }
        Ok(())
    }

    /// Disclosed attribute values, by attribute index
    pub fn revealed_attributes(&self) -> &BTreeMap<usize, E::ScalarField> {
        &self.revealed_attributes
    }

    #[allow(clippy::too_many_arguments)]
    fn compute_challenge_contribution(
        t1: &E::G1Affine,
        t2: &E::G1Affine,
        t3: &E::G1Affine,
        A_prime: &E::G1Affine,
        A_bar: &E::G1Affine,
        B_prime: &E::G1Affine,
        nym: &E::G1Affine,
        ipk: &IssuerPublicKey<E>,
        disclosure: &[bool],
        revealed_attributes: &BTreeMap<usize, E::ScalarField>,
        nonce: &E::ScalarField,
        message: &[u8],
    ) -> Result<Vec<u8>, SerializationError> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(SIGNATURE_LABEL);
        serialize_all!(bytes, t1, t2, t3, A_prime, A_bar, B_prime, nym);
        bytes.extend_from_slice(&ipk.hash);
        bytes.extend(disclosure.iter().map(|d| *d as u8));
        serialize_all!(bytes, revealed_attributes, nonce);
        bytes.extend_from_slice(message);
        Ok(bytes)
    }
}
