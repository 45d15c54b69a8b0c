//! Fairlock contract toolkit - cryptographic primitives, hashing, and utilities.
//!
//! This crate provides the foundational building blocks for the toolkit:
//! - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
//! - Elliptic curve cryptography (secp256k1 keys and ECDSA signatures)
//! - Wire serialization helpers (VarInt, reader/writer)

pub mod ec;
pub mod hash;
pub mod wire;

mod error;
pub use error::PrimitivesError;
