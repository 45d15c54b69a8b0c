//! Digest functions shared across the toolkit.
//!
//! Locking scripts compare Hash160 digests, transaction identifiers and
//! signature preimages use double SHA-256. Everything here is a thin
//! wrapper over the `sha2` and `ripemd` crates returning fixed-size
//! arrays.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Double SHA-256: `SHA256(SHA256(data))`.
///
/// The ledger's workhorse hash, applied to serialized transactions for
/// their identifier and to signature preimages before ECDSA.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160 digest of `data`.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Hash160: `RIPEMD160(SHA256(data))`.
///
/// The 20-byte digest embedded in locking scripts, both for public keys
/// and for coin-toss commitments.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &[u8] = b"the quick brown fox jumps over the lazy dog";
    const SHORT: &[u8] = b"fairlock digest check";

    #[test]
    fn test_sha256_vectors() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex::encode(sha256(PHRASE)),
            "05c6e08f1d9fdafa03147fcb8f82f124c76d2f70e3d989dc8aadb5e7d7450bec"
        );
    }

    #[test]
    fn test_sha256d_vectors() {
        assert_eq!(
            hex::encode(sha256d(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
        assert_eq!(
            hex::encode(sha256d(SHORT)),
            "6d46635f8e0f98e8df4e224fb7170247129c2fcc2f77d00091591d6b0e1176cc"
        );
    }

    #[test]
    fn test_ripemd160_vectors() {
        assert_eq!(
            hex::encode(ripemd160(b"")),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
        assert_eq!(
            hex::encode(ripemd160(PHRASE)),
            "704f5bd0a04f44c1f8e5aced93c381db13f1af5b"
        );
    }

    #[test]
    fn test_hash160_vectors() {
        assert_eq!(
            hex::encode(hash160(b"")),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
        assert_eq!(
            hex::encode(hash160(SHORT)),
            "0037b15be9ec1c9ea6363eaf01495b754dd69c75"
        );
    }

    #[test]
    fn test_hash160_is_composed() {
        assert_eq!(hash160(PHRASE), ripemd160(&sha256(PHRASE)));
    }
}
