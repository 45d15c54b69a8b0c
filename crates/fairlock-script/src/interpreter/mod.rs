//! Stack-machine script engine.
//!
//! Verifies a spend by executing the unlocking script and then the
//! locking script over one shared stack, accepting when the final entry
//! is true. The contract layer never calls this itself; it exists so
//! callers and tests can evaluate the script pairs the contracts emit.
//!
//! Transaction-dependent opcodes (signature checks, locktime) reach the
//! spending transaction through the [`TxContext`] trait. The binding
//! implementation lives in the transaction crate, keeping this crate
//! free of a circular dependency.
//!
//! ```ignore
//! use fairlock_script::interpreter::{Engine, ScriptFlags};
//!
//! Engine::new().execute(&unlocking, &locking, ScriptFlags::standard(), Some(&ctx), 0)?;
//! ```

pub mod config;
pub mod error;
pub mod flags;
pub mod parsed_opcode;
pub mod scriptnum;
pub mod stack;
pub mod thread;

mod ops_arithmetic;
mod ops_crypto;
mod ops_data;
mod ops_flow;
mod ops_stack;

pub use config::Config;
pub use error::{InterpreterError, InterpreterErrorCode};
pub use flags::ScriptFlags;
pub use parsed_opcode::{ParsedOpcode, ParsedScript};
pub use scriptnum::ScriptNumber;
pub use stack::Stack;

use crate::Script;
use thread::Thread;

/// Transaction data the engine needs but does not own.
///
/// Implementors supply signature verification over the value-committing
/// sighash plus the locktime fields OP_CHECKLOCKTIMEVERIFY consults.
pub trait TxContext {
    /// Verify `full_sig` (DER plus trailing sighash byte) by `pub_key`
    /// over the sighash of `sub_script` for input `input_idx`.
    ///
    /// `Ok(false)` means a well-formed but wrong signature; `Err` means
    /// the sighash could not even be computed.
    fn verify_signature(
        &self,
        full_sig: &[u8],
        pub_key: &[u8],
        sub_script: &Script,
        input_idx: usize,
        sighash_flag: u32,
    ) -> Result<bool, InterpreterError>;

    /// The spending transaction's locktime field.
    fn lock_time(&self) -> u32;

    /// The sequence number of input `input_idx`.
    fn input_sequence(&self, input_idx: usize) -> u32;
}

/// The script execution engine.
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Engine
    }

    /// Evaluate an unlocking/locking script pair.
    ///
    /// # Arguments
    /// * `unlocking_script` - The spender's input script.
    /// * `locking_script` - The predicate installed on the output.
    /// * `flags` - Verification rules to enforce.
    /// * `tx_context` - Transaction binding; required for signature and
    ///   locktime opcodes.
    /// * `input_idx` - The input under verification.
    pub fn execute(
        &self,
        unlocking_script: &Script,
        locking_script: &Script,
        flags: ScriptFlags,
        tx_context: Option<&dyn TxContext>,
        input_idx: usize,
    ) -> Result<(), InterpreterError> {
        Thread::new(unlocking_script, locking_script, flags, tx_context, input_idx)?.execute()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
