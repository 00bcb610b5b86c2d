//! Signing identities of a membership service provider (MSP).
//!
//! An identity is either a plain key ([`PlainKeySigner`]) or an anonymous credential
//! ([`IdemixSigningIdentity`]). Idemix identities use credentials over the attributes
//! [`ATTRIBUTE_NAMES`]: the organizational unit and the role bitmask of [`role`]. They sign with nym
//! signatures under a fresh pseudonym and their serialized form carries a signature of possession
//! disclosing both attributes, so verifiers learn the organization and role but nothing that links two
//! identities of the same user.

pub mod attributes;
pub mod error;
pub mod identity;
pub mod plain;
pub mod role;
pub mod serialized;

use ark_ec::pairing::Pairing;
use ark_std::rand::RngCore;
use digest::Digest;
use error::MspError;
use serialized::{NymCoordinates, SerializedIdentity};

pub use identity::{IdemixIdentity, IdemixSigningIdentity};
pub use plain::PlainKeySigner;

/// Attributes of credentials behind identities, in order
pub const ATTRIBUTE_NAMES: [&str; 2] = ["OU", "Role"];
pub const OU_INDEX: usize = 0;
pub const ROLE_INDEX: usize = 1;

/// The closed set of schemes an identity can sign with
#[derive(Clone, Debug)]
pub enum SigningIdentity<E: Pairing> {
    PlainKey(PlainKeySigner<E::G1Affine>),
    AnonymousCredential(IdemixSigningIdentity<E>),
}

impl<E: Pairing> SigningIdentity<E>
where
    E::G1Affine: NymCoordinates,
{
    pub fn sign<R: RngCore, D: Digest>(
        &self,
        rng: &mut R,
        message: &[u8],
    ) -> Result<Vec<u8>, MspError> {
        match self {
            Self::PlainKey(s) => s.sign::<R, D>(rng, message),
            Self::AnonymousCredential(s) => s.sign::<R, D>(rng, message),
        }
    }

    pub fn verify_signature<D: Digest>(
        &self,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), MspError> {
        match self {
            Self::PlainKey(s) => s.verify_signature::<D>(message, signature),
            Self::AnonymousCredential(s) => s.verify_signature::<D>(message, signature),
        }
    }

    pub fn serialize(&self) -> Result<SerializedIdentity, MspError> {
        match self {
            Self::PlainKey(s) => s.serialize(),
            Self::AnonymousCredential(s) => s.serialize(),
        }
    }

    pub fn msp_id(&self) -> &str {
        match self {
            Self::PlainKey(s) => s.msp_id(),
            Self::AnonymousCredential(s) => s.identity().msp_id(),
        }
    }
}

impl<E: Pairing> From<PlainKeySigner<E::G1Affine>> for SigningIdentity<E> {
    fn from(s: PlainKeySigner<E::G1Affine>) -> Self {
        Self::PlainKey(s)
    }
}

impl<E: Pairing> From<IdemixSigningIdentity<E>> for SigningIdentity<E> {
    fn from(s: IdemixSigningIdentity<E>) -> Self {
        Self::AnonymousCredential(s)
    }
}
