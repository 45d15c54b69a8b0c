//! Hash commitment scheme for the coin-toss protocol.
//!
//! A party commits to a choice bit by sampling 16 random bytes and
//! appending one extra random byte iff the bit is 1. The hash160 digest
//! of the result is published; the bit is later recovered purely from the
//! revealed length. Hiding comes from the digest, binding from the hash
//! function's collision resistance.

use rand::{CryptoRng, RngCore};

use fairlock_primitives::hash::hash160;

use crate::ContractError;

/// Base commitment length; the choice bit is encoded as 0 or 1 extra bytes.
pub const COMMITMENT_BASE_LEN: usize = 16;

/// A committed choice bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TossChoice {
    /// Choice bit 0 (16-byte commitment).
    Zero,
    /// Choice bit 1 (17-byte commitment).
    One,
}

impl TossChoice {
    /// Return the choice as a bit value.
    pub fn bit(&self) -> u8 {
        match self {
            TossChoice::Zero => 0,
            TossChoice::One => 1,
        }
    }
}

/// A hiding, binding commitment to a [`TossChoice`].
///
/// Invariant: the byte length is always 16 or 17; both constructors
/// uphold it, so decoding never fails. Nonces must never be reused
/// across protocol instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    bytes: Vec<u8>,
}

impl Commitment {
    /// Sample a fresh commitment to `choice` from the given CSPRNG.
    ///
    /// The randomness source is injected explicitly so commitment
    /// generation stays reproducible under a seeded generator in tests.
    ///
    /// # Arguments
    /// * `choice` - The choice bit to commit to.
    /// * `rng` - A cryptographically secure random number generator.
    ///
    /// # Returns
    /// A commitment of length `16 + choice.bit()`.
    pub fn random<R: RngCore + CryptoRng>(choice: TossChoice, rng: &mut R) -> Self {
        let mut bytes = vec![0u8; COMMITMENT_BASE_LEN + choice.bit() as usize];
        rng.fill_bytes(&mut bytes);
        Commitment { bytes }
    }

    /// Reconstruct a commitment from revealed bytes.
    ///
    /// # Arguments
    /// * `bytes` - The revealed commitment bytes.
    ///
    /// # Returns
    /// `Ok(Commitment)` if the length is 16 or 17, or
    /// `ContractError::CommitmentLength` for any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContractError> {
        match bytes.len() {
            16 | 17 => Ok(Commitment {
                bytes: bytes.to_vec(),
            }),
            n => Err(ContractError::CommitmentLength(n)),
        }
    }

    /// The committed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The byte length (16 or 17).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; commitments are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The hash160 digest suitable for embedding in a locking script.
    pub fn digest(&self) -> [u8; 20] {
        hash160(&self.bytes)
    }

    /// Decode the committed choice bit from the length.
    pub fn choice(&self) -> TossChoice {
        if self.bytes.len() == COMMITMENT_BASE_LEN {
            TossChoice::Zero
        } else {
            TossChoice::One
        }
    }
}
