//! The execution thread driving one unlocking/locking script pair.

use crate::opcodes::*;
use crate::Script;

use super::config::Config;
use super::error::{InterpreterError, InterpreterErrorCode};
use super::flags::ScriptFlags;
use super::ops_crypto::HashType;
use super::parsed_opcode::*;
use super::scriptnum::*;
use super::stack::*;
use super::TxContext;

/// Conditional-stack marker for an executing branch.
const OP_COND_TRUE: i32 = 1;

/// Execution state for one spend verification.
///
/// The unlocking script runs first over a shared data stack, then the
/// locking script; the spend is accepted when the final stack entry is
/// true. Opcode handlers live in the `ops_*` sibling modules as further
/// impl blocks on this type.
pub struct Thread<'a> {
    /// The shared data stack.
    pub dstack: Stack,
    /// The alternate stack (OP_TOALTSTACK / OP_FROMALTSTACK).
    pub astack: Stack,
    /// Tracks whether each open IF already saw its ELSE.
    pub else_stack: BoolStack,
    /// Engine resource limits.
    pub cfg: Config,
    /// Parsed unlocking and locking scripts, in execution order.
    pub scripts: Vec<ParsedScript>,
    /// Nested conditional state (true / false / skip per open IF).
    pub cond_stack: Vec<i32>,
    /// Which script is executing.
    pub script_idx: usize,
    /// Offset of the next opcode in the current script.
    pub script_off: usize,
    /// Offset just past the latest OP_CODESEPARATOR.
    pub last_code_sep: usize,
    /// Non-push opcodes executed so far in the current script.
    pub num_ops: usize,
    /// Active verification flags.
    pub flags: ScriptFlags,
    /// Transaction context for signature and locktime opcodes.
    pub tx_context: Option<&'a dyn TxContext>,
    /// The input under verification.
    pub input_idx: usize,
}

impl<'a> Thread<'a> {
    /// Parse both script halves and set up the execution state.
    ///
    /// Size limits and the push-only rule are enforced here, before any
    /// opcode runs.
    pub fn new(
        unlocking_script: &Script,
        locking_script: &Script,
        flags: ScriptFlags,
        tx_context: Option<&'a dyn TxContext>,
        input_idx: usize,
    ) -> Result<Self, InterpreterError> {
        let cfg = Config::new();

        for (name, script) in [("unlocking", unlocking_script), ("locking", locking_script)] {
            if script.len() > cfg.max_script_size() {
                return Err(InterpreterError::new(
                    InterpreterErrorCode::ScriptTooBig,
                    format!(
                        "{} script is {} bytes, limit is {}",
                        name,
                        script.len(),
                        cfg.max_script_size()
                    ),
                ));
            }
        }

        // Two empty halves leave nothing on the stack: reject up front.
        if unlocking_script.is_empty() && locking_script.is_empty() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EvalFalse,
                "both script halves are empty".to_string(),
            ));
        }

        let error_on_checksig = tx_context.is_none();
        let uscript = parse_script(unlocking_script, error_on_checksig)?;
        let lscript = parse_script(locking_script, error_on_checksig)?;

        if flags.has_flag(ScriptFlags::VERIFY_SIG_PUSH_ONLY) && !is_push_only(&uscript) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NotPushOnly,
                "unlocking script contains non-push opcodes".to_string(),
            ));
        }

        // Begin at the locking script when the unlocking half is empty.
        let script_idx = usize::from(unlocking_script.is_empty());

        let minimal = flags.has_flag(ScriptFlags::VERIFY_MINIMAL_DATA);
        let num_len = cfg.max_script_number_length();

        Ok(Thread {
            dstack: Stack::new(num_len, minimal),
            astack: Stack::new(num_len, minimal),
            else_stack: BoolStack::new(),
            cfg,
            scripts: vec![uscript, lscript],
            cond_stack: Vec::new(),
            script_idx,
            script_off: 0,
            last_code_sep: 0,
            num_ops: 0,
            flags,
            tx_context,
            input_idx,
        })
    }

    /// Whether `flag` is active.
    pub fn has_flag(&self, flag: ScriptFlags) -> bool {
        self.flags.has_flag(flag)
    }

    /// Whether any of `flags` is active.
    pub fn has_any(&self, flags: &[ScriptFlags]) -> bool {
        self.flags.has_any(flags)
    }

    /// Whether the innermost conditional branch is executing.
    pub fn is_branch_executing(&self) -> bool {
        match self.cond_stack.last() {
            Some(&state) => state == OP_COND_TRUE,
            None => true,
        }
    }

    /// Run both scripts to completion and judge the final stack.
    pub fn execute(&mut self) -> Result<(), InterpreterError> {
        while !self.step()? {}
        self.check_error_condition()
    }

    /// Execute one opcode. Returns true once all scripts have finished.
    pub fn step(&mut self) -> Result<bool, InterpreterError> {
        let opcode = self
            .scripts
            .get(self.script_idx)
            .and_then(|s| s.get(self.script_off))
            .cloned()
            .ok_or_else(|| {
                InterpreterError::new(
                    InterpreterErrorCode::InvalidProgramCounter,
                    format!(
                        "program counter {}:{} out of range",
                        self.script_idx, self.script_off
                    ),
                )
            })?;

        self.execute_opcode(&opcode)?;
        self.script_off += 1;

        let combined = self.dstack.depth() + self.astack.depth();
        if combined > self.cfg.max_stack_size() as i32 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::StackOverflow,
                format!(
                    "stacks hold {} entries, limit is {}",
                    combined,
                    self.cfg.max_stack_size()
                ),
            ));
        }

        if self.script_off < self.scripts[self.script_idx].len() {
            return Ok(false);
        }

        // A script may not end inside an open conditional.
        if !self.cond_stack.is_empty() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnbalancedConditional,
                "script ended inside an IF block".to_string(),
            ));
        }

        // Only the data stack crosses the boundary between halves.
        self.astack.clear();
        self.num_ops = 0;
        self.script_off = 0;
        self.last_code_sep = 0;
        self.script_idx += 1;

        // Step over empty halves.
        while self.script_idx < self.scripts.len() && self.scripts[self.script_idx].is_empty() {
            self.script_idx += 1;
        }

        Ok(self.script_idx >= self.scripts.len())
    }

    /// Judge the stack after the final script: exactly one true entry
    /// under CLEAN_STACK, a true top entry otherwise.
    fn check_error_condition(&mut self) -> Result<(), InterpreterError> {
        if self.dstack.depth() < 1 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EmptyStack,
                "no entries left after execution".to_string(),
            ));
        }

        if self.has_flag(ScriptFlags::VERIFY_CLEAN_STACK) && self.dstack.depth() != 1 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::CleanStack,
                format!("{} extra entries left on the stack", self.dstack.depth() - 1),
            ));
        }

        if !self.dstack.pop_bool()? {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EvalFalse,
                "final stack entry is false".to_string(),
            ));
        }

        Ok(())
    }

    fn execute_opcode(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        if pop.data.len() > self.cfg.max_script_element_size() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ElementTooBig,
                format!(
                    "push of {} bytes, element limit is {}",
                    pop.data.len(),
                    self.cfg.max_script_element_size()
                ),
            ));
        }

        // Disabled and reserved opcodes fail wherever they appear, taken
        // branch or not.
        if pop.is_disabled() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::DisabledOpcode,
                format!("disabled opcode {}", pop.name()),
            ));
        }
        if pop.always_illegal() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ReservedOpcode,
                format!("illegal opcode {}", pop.name()),
            ));
        }

        if pop.opcode > OP_16 {
            self.num_ops += 1;
            if self.num_ops > self.cfg.max_ops() {
                return Err(InterpreterError::new(
                    InterpreterErrorCode::TooManyOperations,
                    format!("more than {} operations", self.cfg.max_ops()),
                ));
            }
        }

        // Inside an untaken branch only flow control executes.
        if !self.is_branch_executing() && !pop.is_conditional() {
            return Ok(());
        }

        if self.dstack.verify_minimal_data
            && self.is_branch_executing()
            && pop.opcode <= OP_PUSHDATA4
        {
            pop.enforce_minimum_data_push()?;
        }

        self.dispatch_opcode(pop)
    }

    fn dispatch_opcode(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        match pop.opcode {
            // Pushes.
            OP_FALSE => {
                self.dstack.push_byte_array(vec![]);
                Ok(())
            }
            op if (OP_DATA_1..=OP_DATA_75).contains(&op) => {
                self.dstack.push_byte_array(pop.data.clone());
                Ok(())
            }
            OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4 => {
                self.dstack.push_byte_array(pop.data.clone());
                Ok(())
            }
            OP_1NEGATE => {
                self.dstack.push_int(&ScriptNumber::new(-1));
                Ok(())
            }
            op if (OP_1..=OP_16).contains(&op) => {
                self.dstack.push_byte_array(vec![op - (OP_1 - 1)]);
                Ok(())
            }

            // Flow control.
            OP_NOP => Ok(()),
            OP_RESERVED | OP_VER | OP_RESERVED1 | OP_RESERVED2 => self.op_reserved(pop),
            OP_IF => self.op_if(),
            OP_NOTIF => self.op_notif(),
            OP_ELSE => self.op_else(pop),
            OP_ENDIF => self.op_endif(pop),
            OP_VERIFY => self.op_verify(pop),
            OP_RETURN => self.op_return(),
            OP_CHECKLOCKTIMEVERIFY => self.op_check_locktime_verify(),

            // Stack shuffling.
            OP_TOALTSTACK => self.op_to_alt_stack(),
            OP_FROMALTSTACK => self.op_from_alt_stack(),
            OP_2DROP => self.dstack.drop_n(2),
            OP_2DUP => self.dstack.dup_n(2),
            OP_3DUP => self.dstack.dup_n(3),
            OP_2OVER => self.dstack.over_n(2),
            OP_2ROT => self.dstack.rot_n(2),
            OP_2SWAP => self.dstack.swap_n(2),
            OP_IFDUP => self.op_ifdup(),
            OP_DEPTH => {
                let depth = self.dstack.depth();
                self.dstack.push_int(&ScriptNumber::new(depth as i64));
                Ok(())
            }
            OP_DROP => self.dstack.drop_n(1),
            OP_DUP => self.dstack.dup_n(1),
            OP_NIP => self.dstack.nip_n_discard(1),
            OP_OVER => self.dstack.over_n(1),
            OP_PICK => self.op_pick(),
            OP_ROLL => self.op_roll(),
            OP_ROT => self.dstack.rot_n(1),
            OP_SWAP => self.dstack.swap_n(1),
            OP_TUCK => self.dstack.tuck(),

            // Data inspection.
            OP_SIZE => self.op_size(),
            OP_EQUAL => self.op_equal(),
            OP_EQUALVERIFY => self.op_equalverify(pop),

            // Arithmetic and comparisons.
            OP_1ADD => self.op_unary_int(|m| {
                m.incr();
            }),
            OP_1SUB => self.op_unary_int(|m| {
                m.decr();
            }),
            OP_NEGATE => self.op_unary_int(|m| {
                m.neg();
            }),
            OP_ABS => self.op_unary_int(|m| {
                m.abs();
            }),
            OP_NOT => self.op_not(),
            OP_0NOTEQUAL => self.op_0notequal(),
            OP_ADD => self.op_add(),
            OP_SUB => self.op_sub(),
            OP_BOOLAND => self.op_bool_binop(|a, b| !a.is_zero() && !b.is_zero()),
            OP_BOOLOR => self.op_bool_binop(|a, b| !a.is_zero() || !b.is_zero()),
            OP_NUMEQUAL => self.op_bool_binop(|a, b| a.equal(b)),
            OP_NUMEQUALVERIFY => self.op_numequalverify(pop),
            OP_NUMNOTEQUAL => self.op_bool_binop(|a, b| !a.equal(b)),
            OP_LESSTHAN => self.op_bool_binop(|a, b| a.less_than(b)),
            OP_GREATERTHAN => self.op_bool_binop(|a, b| a.greater_than(b)),
            OP_LESSTHANOREQUAL => self.op_bool_binop(|a, b| a.less_than_or_equal(b)),
            OP_GREATERTHANOREQUAL => self.op_bool_binop(|a, b| a.greater_than_or_equal(b)),
            OP_MIN => self.op_min(),
            OP_MAX => self.op_max(),
            OP_WITHIN => self.op_within(),

            // Hashing and signatures.
            OP_RIPEMD160 => self.op_hash(HashType::Ripemd160),
            OP_SHA1 => self.op_hash(HashType::Sha1),
            OP_SHA256 => self.op_hash(HashType::Sha256),
            OP_HASH160 => self.op_hash(HashType::Hash160),
            OP_HASH256 => self.op_hash(HashType::Hash256),
            OP_CODESEPARATOR => {
                self.last_code_sep = self.script_off;
                Ok(())
            }
            OP_CHECKSIG => self.op_checksig(),
            OP_CHECKSIGVERIFY => self.op_checksigverify(pop),
            OP_CHECKMULTISIG => self.op_checkmultisig(),
            OP_CHECKMULTISIGVERIFY => self.op_checkmultisigverify(pop),

            // Reserved NOP range.
            OP_NOP1 | OP_NOP3 | OP_NOP4 | OP_NOP5 | OP_NOP6 | OP_NOP7 | OP_NOP8 | OP_NOP9
            | OP_NOP10 => {
                if self.has_flag(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS) {
                    return Err(InterpreterError::new(
                        InterpreterErrorCode::DiscourageUpgradableNOPs,
                        format!("{} is reserved for upgrades", pop.name()),
                    ));
                }
                Ok(())
            }

            _ => Err(InterpreterError::new(
                InterpreterErrorCode::ReservedOpcode,
                format!("invalid opcode {}", pop.name()),
            )),
        }
    }
}
