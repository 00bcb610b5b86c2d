use crate::schnorr::SchnorrError;
use ark_serialize::SerializationError;
use ark_std::fmt::Debug;
use idemix_utils::serde_utils::ArkSerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum IdemixError {
    /// Issuer key generation was asked for zero attributes
    NoAttributeNames,
    DuplicateAttributeName(usize),
    /// Issuer public key failed its consistency check
    InvalidIssuerKey,
    IssuerKeyHashMismatch,
    /// `(given, expected)`
    AttributeCountMismatch(usize, usize),
    /// `(given, expected)`
    DisclosureLengthMismatch(usize, usize),
    /// Revealed attributes of a proof are not exactly the ones marked as disclosed
    RevealedAttributesMismatch,
    /// Revealed attribute at this index is different from what the verifier expected
    RevealedAttributeMismatch(usize),
    ZeroNym,
    /// Pseudonym doesn't open to the given secret key
    InvalidPseudonym,
    ZeroSignature,
    IssuerNonceMismatch,
    InvalidCredentialRequest,
    InvalidCredential,
    PairingCheckFailed,
    InvalidProof,
    InvalidNymSignature,
    SchnorrError(SchnorrError),
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<SchnorrError> for IdemixError {
    fn from(e: SchnorrError) -> Self {
        Self::SchnorrError(e)
    }
}

impl From<SerializationError> for IdemixError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_serialize_for_reporting() {
        let json = serde_json::to_string(&IdemixError::RevealedAttributeMismatch(1)).unwrap();
        assert_eq!(json, r#"{"RevealedAttributeMismatch":1}"#);

        let json = serde_json::to_string(&IdemixError::from(SchnorrError::IndexOutOfBounds(5, 3)))
            .unwrap();
        assert_eq!(json, r#"{"SchnorrError":{"IndexOutOfBounds":[5,3]}}"#);

        let json =
            serde_json::to_string(&IdemixError::from(SerializationError::InvalidData)).unwrap();
        assert_eq!(json, r#"{"Serialization":"InvalidData"}"#);
    }
}
