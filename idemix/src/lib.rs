#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Identity Mixer (Idemix) anonymous credentials over a pairing friendly curve.
//!
//! The credential is a BBS+ signature by the issuer over the user's secret key and an ordered list of
//! attributes. The user never reveals the secret key or the credential itself. Instead it
//!
//! - derives a fresh, unlinkable [`Pseudonym`](nym::Pseudonym) for each session,
//! - proves possession of a credential consistent with that pseudonym while disclosing any subset of the
//!   attributes, with a [`Signature`](signature::Signature) of possession,
//! - signs messages under the pseudonym with a [`NymSignature`](nym_signature::NymSignature).
//!
//! Issuance is blind: the user sends a [`CredentialRequest`](cred_request::CredentialRequest) holding a
//! commitment to its secret key and a proof of knowledge bound to a nonce chosen by the issuer, and the
//! issuer returns a [`Credential`](credential::Credential).
//!
//! Every operation needing randomness takes an explicit `rng` and every operation deriving a challenge
//! takes the hash function as a type parameter.


pub mod cred_request;
pub mod credential;
pub mod error;
pub mod nym;
pub mod nym_signature;
pub mod schnorr;
pub mod setup;
pub mod signature;

pub mod prelude {
    pub use crate::{
        cred_request::CredentialRequest,
        credential::{Credential, RandomizedCredential},
        error::IdemixError,
        nym::Pseudonym,
        nym_signature::NymSignature,
        setup::{IssuerKeypair, IssuerPublicKey, IssuerSecretKey, UserSecretKey},
        signature::Signature,
    };
}
