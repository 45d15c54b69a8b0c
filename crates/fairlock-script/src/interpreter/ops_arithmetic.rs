//! Numeric opcodes.
//!
//! Operands pop through `Stack::pop_int`, which enforces the 4-byte
//! width and, under MINIMAL_DATA, the minimal encoding. Binary opcodes
//! receive their operands as (second-from-top, top).

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::scriptnum::ScriptNumber;
use super::thread::Thread;

impl<'a> Thread<'a> {
    /// Shared shape of OP_1ADD / OP_1SUB / OP_NEGATE / OP_ABS.
    pub(crate) fn op_unary_int(
        &mut self,
        f: impl FnOnce(&mut ScriptNumber),
    ) -> Result<(), InterpreterError> {
        let mut operand = self.dstack.pop_int()?;
        f(&mut operand);
        self.dstack.push_int(&operand);
        Ok(())
    }

    pub(crate) fn op_not(&mut self) -> Result<(), InterpreterError> {
        let operand = self.dstack.pop_int()?;
        self.dstack
            .push_int(&ScriptNumber::new(operand.is_zero() as i64));
        Ok(())
    }

    pub(crate) fn op_0notequal(&mut self) -> Result<(), InterpreterError> {
        let mut operand = self.dstack.pop_int()?;
        if !operand.is_zero() {
            operand.set(1);
        }
        self.dstack.push_int(&operand);
        Ok(())
    }

    pub(crate) fn op_add(&mut self) -> Result<(), InterpreterError> {
        let top = self.dstack.pop_int()?;
        let mut below = self.dstack.pop_int()?;
        below.add(&top);
        self.dstack.push_int(&below);
        Ok(())
    }

    pub(crate) fn op_sub(&mut self) -> Result<(), InterpreterError> {
        let top = self.dstack.pop_int()?;
        let mut below = self.dstack.pop_int()?;
        below.sub(&top);
        self.dstack.push_int(&below);
        Ok(())
    }

    /// Shared shape of the boolean and comparison binops: pop two, push
    /// the predicate result as 0 or 1.
    pub(crate) fn op_bool_binop(
        &mut self,
        f: impl FnOnce(&ScriptNumber, &ScriptNumber) -> bool,
    ) -> Result<(), InterpreterError> {
        let top = self.dstack.pop_int()?;
        let below = self.dstack.pop_int()?;
        self.dstack
            .push_int(&ScriptNumber::new(f(&below, &top) as i64));
        Ok(())
    }

    pub(crate) fn op_numequalverify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.op_bool_binop(|a, b| a.equal(b))?;
        self.abstract_verify(pop, InterpreterErrorCode::NumEqualVerify)
    }

    pub(crate) fn op_min(&mut self) -> Result<(), InterpreterError> {
        let top = self.dstack.pop_int()?;
        let below = self.dstack.pop_int()?;
        let min = if below.less_than(&top) { below } else { top };
        self.dstack.push_int(&min);
        Ok(())
    }

    pub(crate) fn op_max(&mut self) -> Result<(), InterpreterError> {
        let top = self.dstack.pop_int()?;
        let below = self.dstack.pop_int()?;
        let max = if below.greater_than(&top) { below } else { top };
        self.dstack.push_int(&max);
        Ok(())
    }

    /// OP_WITHIN: x is in the half-open range [min, max).
    pub(crate) fn op_within(&mut self) -> Result<(), InterpreterError> {
        let max = self.dstack.pop_int()?;
        let min = self.dstack.pop_int()?;
        let x = self.dstack.pop_int()?;
        let inside = min.less_than_or_equal(&x) && x.less_than(&max);
        self.dstack.push_int(&ScriptNumber::new(inside as i64));
        Ok(())
    }
}
