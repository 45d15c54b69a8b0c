//! Pay-to-pubkey-hash contract.
//!
//! The canonical single-key redemption: the locking script commits to the
//! hash160 of a public key, the unlocking script reveals the key and a
//! signature over the spending transaction.

use fairlock_primitives::ec::PrivateKey;
use fairlock_script::opcodes::*;
use fairlock_script::{Script, ScriptBuilder};
use fairlock_transaction::sighash::SighashMode;
use fairlock_transaction::Transaction;

use crate::contract::{sign_input, ScriptContract};
use crate::ContractError;

/// A pay-to-pubkey-hash contract instance holding its redemption key.
pub struct PayToPubKeyHash {
    key: PrivateKey,
}

impl PayToPubKeyHash {
    /// Create an instance with a freshly generated key.
    pub fn new() -> Self {
        PayToPubKeyHash {
            key: PrivateKey::new(),
        }
    }

    /// Create an instance redeeming with the given key.
    pub fn from_key(key: PrivateKey) -> Self {
        PayToPubKeyHash { key }
    }

    /// The redemption key.
    pub fn key(&self) -> &PrivateKey {
        &self.key
    }
}

impl Default for PayToPubKeyHash {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptContract for PayToPubKeyHash {
    fn locking_script(&self) -> Result<Script, ContractError> {
        let script = ScriptBuilder::new()             // Stack = | pubKey, signature |
            .op(OP_DUP)                               // Stack = | pubKey, pubKey, signature |
            .op(OP_HASH160)                           // Stack = | pubKeyHash, pubKey, signature |
            .data(&self.key.pub_key().hash160())      // Stack = | targetHash, pubKeyHash, pubKey, signature |
            .op(OP_EQUALVERIFY)                       // Stack = | pubKey, signature |
            .op(OP_CHECKSIG)                          // Stack = | true |
            .build()?;
        Ok(script)
    }

    fn unlocking_script(
        &self,
        tx: &Transaction,
        input_index: u32,
    ) -> Result<Script, ContractError> {
        let signature = sign_input(
            tx,
            input_index,
            &self.locking_script()?,
            &self.key,
            SighashMode::All,
        )?;
        let script = ScriptBuilder::new()
            .data(&signature)                         // Stack = | signature |
            .data(&self.key.pub_key().to_compressed()) // Stack = | pubKey, signature |
            .build()?;
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The locking script has the canonical 25-byte P2PKH shape.
    #[test]
    fn test_locking_script_shape() {
        let contract = PayToPubKeyHash::new();
        let locking = contract.locking_script().unwrap();
        assert_eq!(locking.len(), 25);
        assert!(locking.is_p2pkh());
        assert_eq!(
            locking.public_key_hash().unwrap(),
            contract.key().pub_key().hash160().to_vec()
        );
    }

    /// Locking script generation is deterministic per instance.
    #[test]
    fn test_locking_script_deterministic() {
        let contract = PayToPubKeyHash::new();
        assert_eq!(
            contract.locking_script().unwrap(),
            contract.locking_script().unwrap()
        );
    }
}
