//! Byte-inspection opcodes.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::scriptnum::ScriptNumber;
use super::thread::Thread;

impl<'a> Thread<'a> {
    /// OP_SIZE pushes the length of the top entry without consuming it.
    /// The coin-toss predicate leans on this to read commitment lengths.
    pub(crate) fn op_size(&mut self) -> Result<(), InterpreterError> {
        let top = self.dstack.peek_byte_array(0)?;
        self.dstack.push_int(&ScriptNumber::new(top.len() as i64));
        Ok(())
    }

    /// OP_EQUAL compares two entries byte for byte.
    pub(crate) fn op_equal(&mut self) -> Result<(), InterpreterError> {
        let a = self.dstack.pop_byte_array()?;
        let b = self.dstack.pop_byte_array()?;
        self.dstack.push_bool(a == b);
        Ok(())
    }

    pub(crate) fn op_equalverify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.op_equal()?;
        self.abstract_verify(pop, InterpreterErrorCode::EqualVerify)
    }
}
