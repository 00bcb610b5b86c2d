//! Attribute values of the credentials behind identities. The organizational unit is hashed to a field
//! element and the role mask is used as is.

use crate::{OU_INDEX, ROLE_INDEX};
use ark_ff::PrimeField;
use digest::Digest;
use idemix_utils::hashing_utils::field_elem_from_try_and_incr;
use std::collections::BTreeMap;

pub fn ou_attribute<F: PrimeField, D: Digest>(ou: &str) -> F {
    field_elem_from_try_and_incr::<F, D>(ou.as_bytes())
}

pub fn role_attribute<F: PrimeField>(role_mask: u32) -> F {
    F::from(role_mask as u64)
}

/// Attributes in the order of [`crate::ATTRIBUTE_NAMES`]
pub fn identity_attributes<F: PrimeField, D: Digest>(ou: &str, role_mask: u32) -> [F; 2] {
    let mut attributes = [F::zero(); 2];
    attributes[OU_INDEX] = ou_attribute::<F, D>(ou);
    attributes[ROLE_INDEX] = role_attribute::<F>(role_mask);
    attributes
}

/// What a verifier expects an identity's proof to reveal
pub fn expected_revealed<F: PrimeField, D: Digest>(
    ou: &str,
    role_mask: u32,
) -> BTreeMap<usize, F> {
    identity_attributes::<F, D>(ou, role_mask)
        .into_iter()
        .enumerate()
        .collect()
}
