//! secp256k1 private key.
//!
//! A protocol instance owns its keys exclusively. The secret half only
//! ever feeds the signing adapter; scripts embed the public half or its
//! Hash160, never this type.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// Serialized scalar length.
const SCALAR_LEN: usize = 32;

/// A secp256k1 signing key.
///
/// The scalar bytes are wiped when the value is dropped.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a fresh key from the operating system RNG.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Build a key from a raw 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - The scalar; must be non-zero and below the curve order.
    ///
    /// # Returns
    /// The key, or `PrimitivesError::InvalidPrivateKey` for a bad scalar
    /// or wrong length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != SCALAR_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "scalar must be {} bytes, got {}",
                SCALAR_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_bytes(bytes.into())
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Build a key from a 64-character hex scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "empty hex string".to_string(),
            ));
        }
        let bytes =
            hex::decode(hex_str).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// The scalar as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// The matching public key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte message hash.
    ///
    /// Nonces are deterministic (RFC6979) and the resulting S value is
    /// normalized to the low half of the curve order.
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        // SigningKey keeps the scalar private; wipe our copy of it.
        let mut bytes: [u8; 32] = self.inner.to_bytes().into();
        bytes.zeroize();
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}
