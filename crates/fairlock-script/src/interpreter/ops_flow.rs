//! Flow control and locktime opcodes.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::flags::ScriptFlags;
use super::parsed_opcode::ParsedOpcode;
use super::scriptnum::ScriptNumber;
use super::thread::Thread;

/// Conditional-stack states.
const OP_COND_FALSE: i32 = 0;
const OP_COND_TRUE: i32 = 1;
const OP_COND_SKIP: i32 = 2;

/// Locktime values below this are block heights, at or above it they are
/// Unix timestamps.
const LOCK_TIME_THRESHOLD: i64 = 500_000_000;

/// Sequence value that opts an input out of locktime semantics.
const MAX_TX_IN_SEQUENCE_NUM: u32 = 0xffffffff;

impl<'a> Thread<'a> {
    pub(crate) fn op_reserved(&self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        Err(InterpreterError::new(
            InterpreterErrorCode::ReservedOpcode,
            format!("reserved opcode {}", pop.name()),
        ))
    }

    /// Open a conditional. Inside a skipped branch the condition operand
    /// is not consumed and the new frame is marked skip.
    fn open_conditional(&mut self, invert: bool) -> Result<(), InterpreterError> {
        let state = if self.is_branch_executing() {
            let taken = self.dstack.pop_bool()? != invert;
            if taken {
                OP_COND_TRUE
            } else {
                OP_COND_FALSE
            }
        } else {
            OP_COND_SKIP
        };
        self.cond_stack.push(state);
        self.else_stack.push_bool(false);
        Ok(())
    }

    pub(crate) fn op_if(&mut self) -> Result<(), InterpreterError> {
        self.open_conditional(false)
    }

    pub(crate) fn op_notif(&mut self) -> Result<(), InterpreterError> {
        self.open_conditional(true)
    }

    pub(crate) fn op_else(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        let unbalanced = || {
            InterpreterError::new(
                InterpreterErrorCode::UnbalancedConditional,
                format!("{} without a matching OP_IF", pop.name()),
            )
        };

        if self.cond_stack.is_empty() {
            return Err(unbalanced());
        }
        // Only one ELSE per IF.
        if self.else_stack.pop_bool()? {
            return Err(unbalanced());
        }

        let top = self.cond_stack.len() - 1;
        self.cond_stack[top] = match self.cond_stack[top] {
            OP_COND_TRUE => OP_COND_FALSE,
            OP_COND_FALSE => OP_COND_TRUE,
            skip => skip,
        };

        self.else_stack.push_bool(true);
        Ok(())
    }

    pub(crate) fn op_endif(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        if self.cond_stack.pop().is_none() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnbalancedConditional,
                format!("{} without a matching OP_IF", pop.name()),
            ));
        }
        self.else_stack.pop_bool()?;
        Ok(())
    }

    pub(crate) fn op_verify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.abstract_verify(pop, InterpreterErrorCode::Verify)
    }

    /// Shared tail of the VERIFY-family opcodes: pop the result and fail
    /// with `code` when it is false.
    pub(crate) fn abstract_verify(
        &mut self,
        pop: &ParsedOpcode,
        code: InterpreterErrorCode,
    ) -> Result<(), InterpreterError> {
        if self.dstack.pop_bool()? {
            Ok(())
        } else {
            Err(InterpreterError::new(code, format!("{} failed", pop.name())))
        }
    }

    pub(crate) fn op_return(&mut self) -> Result<(), InterpreterError> {
        Err(InterpreterError::new(
            InterpreterErrorCode::EarlyReturn,
            "OP_RETURN executed".to_string(),
        ))
    }

    /// OP_CHECKLOCKTIMEVERIFY.
    ///
    /// Peeks (never pops) a locktime from the stack and requires the
    /// spending transaction's locktime to be of the same kind and at
    /// least as large, with a non-final input sequence.
    pub(crate) fn op_check_locktime_verify(&mut self) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_CHECKLOCKTIMEVERIFY) {
            if self.has_flag(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS) {
                return Err(InterpreterError::new(
                    InterpreterErrorCode::DiscourageUpgradableNOPs,
                    "OP_NOP2 is reserved for upgrades".to_string(),
                ));
            }
            return Ok(());
        }

        let ctx = self.tx_context.ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                "OP_CHECKLOCKTIMEVERIFY needs a transaction context".to_string(),
            )
        })?;

        // Locktime operands get a widened 5-byte window.
        let raw = self.dstack.peek_byte_array(0)?;
        let stack_lock_time =
            ScriptNumber::from_bytes(&raw, 5, self.dstack.verify_minimal_data)?.to_i64();

        if stack_lock_time < 0 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NegativeLockTime,
                format!("negative locktime {}", stack_lock_time),
            ));
        }

        verify_lock_time(ctx.lock_time() as i64, LOCK_TIME_THRESHOLD, stack_lock_time)?;

        if ctx.input_sequence(self.input_idx) == MAX_TX_IN_SEQUENCE_NUM {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnsatisfiedLockTime,
                "input sequence is final, locktime is disabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Compare a required locktime against the transaction's.
///
/// Both values must sit on the same side of `threshold` (heights cannot
/// satisfy timestamp deadlines or vice versa), and the requirement must
/// not exceed the transaction's locktime.
pub(crate) fn verify_lock_time(
    tx_lock_time: i64,
    threshold: i64,
    lock_time: i64,
) -> Result<(), InterpreterError> {
    if (tx_lock_time < threshold) != (lock_time < threshold) {
        return Err(InterpreterError::new(
            InterpreterErrorCode::UnsatisfiedLockTime,
            format!(
                "locktime kind mismatch: transaction {}, requirement {}",
                tx_lock_time, lock_time
            ),
        ));
    }
    if lock_time > tx_lock_time {
        return Err(InterpreterError::new(
            InterpreterErrorCode::UnsatisfiedLockTime,
            format!(
                "required locktime {} is past the transaction locktime {}",
                lock_time, tx_lock_time
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_lock_time_rules() {
        // Same kind, satisfied.
        assert!(verify_lock_time(1_500_000_000, LOCK_TIME_THRESHOLD, 1_412_114_400).is_ok());
        assert!(verify_lock_time(1_412_114_400, LOCK_TIME_THRESHOLD, 1_412_114_400).is_ok());
        assert!(verify_lock_time(500_000, LOCK_TIME_THRESHOLD, 400_000).is_ok());

        // Same kind, not yet reached.
        assert!(verify_lock_time(1_412_114_399, LOCK_TIME_THRESHOLD, 1_412_114_400).is_err());

        // Height cannot satisfy a timestamp and vice versa.
        assert!(verify_lock_time(400_000, LOCK_TIME_THRESHOLD, 1_412_114_400).is_err());
        assert!(verify_lock_time(1_412_114_400, LOCK_TIME_THRESHOLD, 400_000).is_err());
    }
}
