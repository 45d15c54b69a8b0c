//! secp256k1 public key.
//!
//! The half of a keypair that scripts may carry: SEC1 serialization in
//! both widths, the Hash160 digest locking scripts embed, and ECDSA
//! verification.

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use std::fmt;

use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// A secp256k1 verification key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse SEC1 bytes, compressed (33) or uncompressed (65).
    ///
    /// # Returns
    /// The key, or `PrimitivesError::InvalidPublicKey` when the bytes do
    /// not name a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPublicKey(
                "no key bytes".to_string(),
            ));
        }
        VerifyingKey::from_sec1_bytes(bytes)
            .map(|inner| PublicKey { inner })
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))
    }

    /// Parse a hex-encoded SEC1 key.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    /// Compressed SEC1 form: a parity prefix (0x02/0x03) and the X
    /// coordinate. This is the form scripts push.
    pub fn to_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out.copy_from_slice(self.inner.to_encoded_point(true).as_bytes());
        out
    }

    /// Uncompressed SEC1 form: 0x04 prefix, X, then Y.
    pub fn to_uncompressed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out.copy_from_slice(self.inner.to_encoded_point(false).as_bytes());
        out
    }

    /// Hash160 of the compressed serialization.
    ///
    /// This digest is what a pay-to-pubkey-hash predicate commits to.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Check an ECDSA signature over `hash` against this key.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }

    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: *vk }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_compressed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::PrivateKey;

    #[test]
    fn test_both_sec1_widths_round_trip() {
        let key = PrivateKey::new().pub_key();

        let short = key.to_compressed();
        assert!(matches!(short[0], 0x02 | 0x03));
        assert_eq!(PublicKey::from_bytes(&short).unwrap(), key);

        let long = key.to_uncompressed();
        assert_eq!(long[0], 0x04);
        assert_eq!(PublicKey::from_bytes(&long).unwrap(), key);
    }

    #[test]
    fn test_display_is_compressed_hex() {
        let key = PrivateKey::new().pub_key();
        assert_eq!(key.to_string(), hex::encode(key.to_compressed()));
    }

    #[test]
    fn test_rejects_non_points() {
        assert!(PublicKey::from_bytes(&[]).is_err());
        // 0x05 is not a valid SEC1 prefix.
        assert!(PublicKey::from_bytes(&[0x05; 33]).is_err());
        assert!(PublicKey::from_hex("zz").is_err());
    }

    #[test]
    fn test_hash160_matches_manual_composition() {
        let key = PrivateKey::new().pub_key();
        assert_eq!(key.hash160(), crate::hash::hash160(&key.to_compressed()));
    }
}
