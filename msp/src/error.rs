use ark_serialize::SerializationError;
use idemix::error::IdemixError;
use idemix_utils::serde_utils::ArkSerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum MspError {
    /// An identity could not be created. Holds the reason.
    IdentityConstruction(Box<MspError>),
    Idemix(IdemixError),
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
    EmptyMspId,
    /// Issuer key isn't for the attributes `["OU", "Role"]`
    UnexpectedAttributeNames,
    OrganizationalUnitMismatch,
    RoleMismatch,
    InvalidRoleMask(u32),
    /// Role in a serialized identity isn't 4 bytes. Holds the length found.
    InvalidRoleLength(usize),
    /// Organizational unit in a serialized identity isn't UTF-8
    InvalidOrganizationalUnit,
    PseudonymMismatch,
    NymNotOnCurve,
    InvalidPlainSignature,
}

impl MspError {
    pub(crate) fn construction(self) -> Self {
        match self {
            e @ Self::IdentityConstruction(_) => e,
            e => Self::IdentityConstruction(Box::new(e)),
        }
    }
}

impl From<IdemixError> for MspError {
    fn from(e: IdemixError) -> Self {
        Self::Idemix(e)
    }
}

impl From<SerializationError> for MspError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
