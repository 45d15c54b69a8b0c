//! Spend context binding a transaction to the script interpreter.
//!
//! Implements the interpreter's [`TxContext`] trait over a
//! [`Transaction`], supplying signature verification against the
//! value-committing sighash plus the locktime and sequence data
//! OP_CHECKLOCKTIMEVERIFY reads.

use fairlock_primitives::ec::{PublicKey, Signature};
use fairlock_script::interpreter::{
    Engine, InterpreterError, InterpreterErrorCode, ScriptFlags, TxContext,
};
use fairlock_script::Script;

use crate::sighash;
use crate::transaction::Transaction;

/// Interpreter context for verifying the inputs of one transaction.
///
/// Each input to be verified must carry its source output (locking script
/// and value), attached via `TransactionInput::set_source_output` or
/// `Transaction::add_input_from`.
pub struct SpendContext<'a> {
    tx: &'a Transaction,
}

impl<'a> SpendContext<'a> {
    /// Create a spend context over the given transaction.
    ///
    /// # Arguments
    /// * `tx` - The spending transaction being verified.
    ///
    /// # Returns
    /// A `SpendContext` borrowing the transaction.
    pub fn new(tx: &'a Transaction) -> Self {
        SpendContext { tx }
    }
}

impl TxContext for SpendContext<'_> {
    fn verify_signature(
        &self,
        full_sig: &[u8],
        pub_key: &[u8],
        sub_script: &Script,
        input_idx: usize,
        sighash_flag: u32,
    ) -> Result<bool, InterpreterError> {
        if full_sig.len() < 2 {
            return Ok(false);
        }
        let der = &full_sig[..full_sig.len() - 1];

        let input = self.tx.inputs.get(input_idx).ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                format!("input index {} out of range", input_idx),
            )
        })?;
        let value = input.source_tx_value().ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                "missing source output on input".to_string(),
            )
        })?;

        let hash = sighash::signature_hash(
            self.tx,
            input_idx,
            sub_script.to_bytes(),
            sighash_flag,
            value,
        )
        .map_err(|e| {
            InterpreterError::new(InterpreterErrorCode::InvalidParams, e.to_string())
        })?;

        let signature = match Signature::from_der(der) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };
        let key = match PublicKey::from_bytes(pub_key) {
            Ok(key) => key,
            Err(_) => return Ok(false),
        };

        Ok(signature.verify(&hash, &key))
    }

    fn lock_time(&self) -> u32 {
        self.tx.lock_time
    }

    fn input_sequence(&self, input_idx: usize) -> u32 {
        self.tx
            .inputs
            .get(input_idx)
            .map(|i| i.sequence_number)
            .unwrap_or(crate::input::DEFAULT_SEQUENCE_NUMBER)
    }
}

/// Verify one input of a transaction against its source locking script.
///
/// Runs the interpreter over the input's unlocking script and the source
/// output's locking script with this transaction as context.
///
/// # Arguments
/// * `tx` - The spending transaction. The input must carry both its
///   unlocking script and its source output.
/// * `input_idx` - The input to verify.
/// * `flags` - Interpreter verification flags.
///
/// # Returns
/// `Ok(())` if the spend is accepted, or the interpreter's rejection.
pub fn verify_input(
    tx: &Transaction,
    input_idx: usize,
    flags: ScriptFlags,
) -> Result<(), InterpreterError> {
    let input = tx.inputs.get(input_idx).ok_or_else(|| {
        InterpreterError::new(
            InterpreterErrorCode::InvalidParams,
            format!("input index {} out of range", input_idx),
        )
    })?;
    let unlocking = input.unlocking_script.clone().unwrap_or_default();
    let locking = input
        .source_tx_script()
        .cloned()
        .ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                "missing source output on input".to_string(),
            )
        })?;

    let ctx = SpendContext::new(tx);
    Engine::new().execute(&unlocking, &locking, flags, Some(&ctx), input_idx)
}
