//! Roles are carried in a credential as one attribute holding a bitmask so a single credential can grant
//! several roles.

use crate::error::MspError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum MspRole {
    Member = 1,
    Admin = 2,
    Client = 4,
    Peer = 8,
}

impl MspRole {
    pub const ALL: [MspRole; 4] = [
        MspRole::Member,
        MspRole::Admin,
        MspRole::Client,
        MspRole::Peer,
    ];

    pub fn mask(self) -> u32 {
        self as u32
    }

    /// Only masks with a single known bit set map to a role
    pub fn from_mask(mask: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.mask() == mask)
    }
}

impl TryFrom<u32> for MspRole {
    type Error = MspError;

    fn try_from(mask: u32) -> Result<Self, Self::Error> {
        Self::from_mask(mask).ok_or(MspError::InvalidRoleMask(mask))
    }
}

const ALL_ROLES_MASK: u32 = 1 | 2 | 4 | 8;

pub fn role_to_mask(roles: &[MspRole]) -> u32 {
    roles.iter().fold(0, |mask, r| mask | r.mask())
}

pub fn mask_to_roles(mask: u32) -> Vec<MspRole> {
    MspRole::ALL
        .into_iter()
        .filter(|r| check_role(mask, *r))
        .collect()
}

pub fn check_role(mask: u32, role: MspRole) -> bool {
    mask & role.mask() == role.mask()
}

/// A mask must grant at least one role and nothing else
pub fn validate_role_mask(mask: u32) -> Result<u32, MspError> {
    if mask == 0 || mask & !ALL_ROLES_MASK != 0 {
        return Err(MspError::InvalidRoleMask(mask));
    }
    Ok(mask)
}
