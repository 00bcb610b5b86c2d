#![cfg_attr(not(feature = "std"), no_std)]

//! Code shared by the Idemix crates
//!
//! - [`serde_utils`]: serde adapters for `arkworks-rs` objects which don't implement serde themselves
//! - [`hashing_utils`]: hashing arbitrary bytes to field elements and group elements
//! - [`schnorr_signature`]: a plain Schnorr signature over any prime order group
//! - [`macros`]: small helper macros
//!
//! [`serde_utils`]: crate::serde_utils
//! [`hashing_utils`]: crate::hashing_utils
//! [`schnorr_signature`]: crate::schnorr_signature
//! [`macros`]: crate::macros

#[macro_use]
pub mod macros;
pub mod hashing_utils;
pub mod schnorr_signature;
pub mod serde_utils;
