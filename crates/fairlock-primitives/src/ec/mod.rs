//! Elliptic curve cryptography for the fairlock toolkit.
//!
//! secp256k1 keys and ECDSA signatures as consumed by the contract layer:
//! key generation, RFC6979 deterministic signing, DER serialization, and
//! verification.

mod private_key;
mod public_key;
mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
