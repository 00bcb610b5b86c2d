//! Hashing arbitrary bytes to field elements. Everything here is variable time and must only be
//! fed public data (labels, attribute values, Fiat-Shamir transcripts).

use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use digest::Digest;

/// Hash bytes to a point of the prime order subgroup by try-and-increment followed by cofactor
/// clearing. Nobody knows the discrete log of the output relative to any other point so this is how
/// public generators are created.
pub fn affine_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G {
    let mut attempt = 0u64;
    loop {
        let hash = if attempt == 0 {
            D::digest(bytes)
        } else {
            D::digest(concat_slices!(bytes, b"-attempt-", attempt.to_le_bytes()))
        };
        if let Some(g) = G::from_random_bytes(&hash) {
            let g = g.mul_by_cofactor();
            if !g.is_zero() {
                return g;
            }
        }
        attempt += 1;
    }
}

/// Hash bytes to a field element by try-and-increment: the digest output is interpreted as a field
/// element and, if it falls outside the field, the input is re-hashed with an attempt counter.
pub fn field_elem_from_try_and_incr<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let hash = D::digest(bytes);
    if let Some(f) = F::from_random_bytes(&hash) {
        return f;
    }
    let mut attempt = 1u64;
    loop {
        let hash = D::digest(concat_slices!(bytes, b"-attempt-", attempt.to_le_bytes()));
        if let Some(f) = F::from_random_bytes(&hash) {
            return f;
        }
        attempt += 1;
    }
}

/// Hash `bytes` under the domain separation tag `dst`. Different tags give independent outputs for the
/// same input which is how the challenges of different protocols are kept apart.
pub fn hash_to_field<F: PrimeField, D: Digest>(dst: &[u8], bytes: &[u8]) -> F {
    let dst_len = (dst.len() as u32).to_le_bytes();
    field_elem_from_try_and_incr::<F, D>(&concat_slices!(dst_len, dst, bytes))
}
