//! The contract capability trait and the transaction-signing adapter.

use fairlock_primitives::ec::PrivateKey;
use fairlock_script::Script;
use fairlock_transaction::sighash::{self, SighashMode};
use fairlock_transaction::Transaction;

use crate::ContractError;

/// A script contract: one funded output predicate plus the ability to
/// produce a satisfying input script.
///
/// Each protocol variant implements this trait; shared signing lives in
/// the free function [`sign_input`] rather than base-type state.
pub trait ScriptContract {
    /// Produce the locking script installed on the funding output.
    ///
    /// Deterministic given the instance's keys and commitments.
    ///
    /// # Returns
    /// The locking script, or a construction-time error.
    fn locking_script(&self) -> Result<Script, ContractError>;

    /// Produce the unlocking script for one input of the spending
    /// transaction.
    ///
    /// Success means a syntactically well-formed attempt was produced;
    /// whether the spend is accepted is decided by the interpreter, an
    /// external step this crate never runs.
    ///
    /// # Arguments
    /// * `tx` - The spending transaction skeleton. The input must carry
    ///   its source output (for the value the signature commits to).
    /// * `input_index` - The input to produce a script for.
    ///
    /// # Returns
    /// The unlocking script, or a signing error.
    fn unlocking_script(&self, tx: &Transaction, input_index: u32)
        -> Result<Script, ContractError>;
}

/// Sign one transaction input against the locking script being satisfied.
///
/// Computes the value-committing signature hash over `locking_script`,
/// signs it with deterministic ECDSA, and returns the DER bytes with the
/// sighash flag byte appended, the exact byte string scripts push.
///
/// Signing is not retried: a failure is fatal to this redemption attempt.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - The index of the input to sign.
/// * `locking_script` - The predicate the signature must be valid against.
/// * `key` - The private key to sign with.
/// * `mode` - How much of the transaction the signature covers.
///
/// # Returns
/// The serialized signature with trailing sighash byte, or an error.
pub fn sign_input(
    tx: &Transaction,
    input_index: u32,
    locking_script: &Script,
    key: &PrivateKey,
    mode: SighashMode,
) -> Result<Vec<u8>, ContractError> {
    let idx = input_index as usize;

    let input = tx.inputs.get(idx).ok_or_else(|| {
        ContractError::Signing(format!(
            "input index {} out of range (tx has {} inputs)",
            idx,
            tx.inputs.len()
        ))
    })?;
    let value = input.source_tx_value().ok_or_else(|| {
        ContractError::Signing("missing source output on input (no previous tx info)".to_string())
    })?;

    let hash = sighash::signature_hash(
        tx,
        idx,
        locking_script.to_bytes(),
        mode.flag(),
        value,
    )?;

    let signature = key.sign(&hash)?;

    let der = signature.to_der();
    let mut buf = Vec::with_capacity(der.len() + 1);
    buf.extend_from_slice(&der);
    buf.push(mode.flag() as u8);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairlock_script::opcodes::OP_1;
    use fairlock_transaction::TransactionOutput;

    fn skeleton(locking: &Script) -> Transaction {
        let mut tx = Transaction::new();
        tx.add_input_from([0x33; 32], 0, locking.clone(), 10_000);
        tx.add_output(TransactionOutput {
            value: 9_000,
            locking_script: Script::from_bytes(&[OP_1]),
        });
        tx
    }

    /// The produced blob is DER plus exactly one sighash byte.
    #[test]
    fn test_sign_input_appends_flag_byte() {
        let key = PrivateKey::new();
        let locking = Script::from_bytes(&[OP_1]);
        let tx = skeleton(&locking);

        let sig = sign_input(&tx, 0, &locking, &key, SighashMode::All).unwrap();
        assert_eq!(*sig.last().unwrap() as u32, SighashMode::All.flag());
        assert_eq!(sig[0], 0x30);

        let hash = tx.calc_input_signature_hash(0, SighashMode::All.flag()).unwrap();
        let parsed =
            fairlock_primitives::ec::Signature::from_der(&sig[..sig.len() - 1]).unwrap();
        assert!(parsed.verify(&hash, &key.pub_key()));
    }

    /// Signing requires the input's source output to be attached.
    #[test]
    fn test_sign_input_missing_source_output() {
        let key = PrivateKey::new();
        let locking = Script::from_bytes(&[OP_1]);
        let mut tx = skeleton(&locking);
        tx.inputs[0].set_source_output(None);

        assert!(sign_input(&tx, 0, &locking, &key, SighashMode::All).is_err());
    }

    /// Out-of-range input indexes are a signing error.
    #[test]
    fn test_sign_input_index_bounds() {
        let key = PrivateKey::new();
        let locking = Script::from_bytes(&[OP_1]);
        let tx = skeleton(&locking);

        assert!(sign_input(&tx, 3, &locking, &key, SighashMode::All).is_err());
    }
}
