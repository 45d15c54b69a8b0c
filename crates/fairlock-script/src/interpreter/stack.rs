//! Data and alt stacks for script execution.
//!
//! Stack entries are raw byte arrays; numeric and boolean views are
//! decoded on demand. Index arguments count down from the top of the
//! stack, so index 0 is the most recently pushed entry.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::scriptnum::ScriptNumber;

/// Truthiness of a stack entry under consensus rules: any non-zero byte
/// makes it true, except a lone sign bit in the last position (negative
/// zero), which is false.
pub fn as_bool(t: &[u8]) -> bool {
    for (i, &b) in t.iter().enumerate() {
        if b != 0 {
            return !(i == t.len() - 1 && b == 0x80);
        }
    }
    false
}

/// Canonical byte form of a boolean: `[1]` or the empty array.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        vec![]
    }
}

/// One of the interpreter's two stacks.
pub struct Stack {
    entries: Vec<Vec<u8>>,
    /// Longest numeric operand `pop_int` accepts.
    pub max_num_length: usize,
    /// Whether popped numbers must be minimally encoded.
    pub verify_minimal_data: bool,
}

impl Stack {
    pub fn new(max_num_length: usize, verify_minimal_data: bool) -> Self {
        Stack {
            entries: Vec::new(),
            max_num_length,
            verify_minimal_data,
        }
    }

    pub fn depth(&self) -> i32 {
        self.entries.len() as i32
    }

    pub fn push_byte_array(&mut self, data: Vec<u8>) {
        self.entries.push(data);
    }

    pub fn push_int(&mut self, n: &ScriptNumber) {
        self.push_byte_array(n.to_bytes());
    }

    pub fn push_bool(&mut self, val: bool) {
        self.push_byte_array(from_bool(val));
    }

    pub fn pop_byte_array(&mut self) -> Result<Vec<u8>, InterpreterError> {
        self.remove_at(0)
    }

    pub fn pop_int(&mut self) -> Result<ScriptNumber, InterpreterError> {
        let data = self.pop_byte_array()?;
        ScriptNumber::from_bytes(&data, self.max_num_length, self.verify_minimal_data)
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        Ok(as_bool(&self.pop_byte_array()?))
    }

    /// Copy of the entry `idx` positions below the top.
    pub fn peek_byte_array(&self, idx: i32) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position_of(idx)?;
        Ok(self.entries[pos].clone())
    }

    /// Remove and return the entry `idx` positions below the top.
    fn remove_at(&mut self, idx: i32) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position_of(idx)?;
        Ok(self.entries.remove(pos))
    }

    /// Translate a from-the-top index into a vector position.
    fn position_of(&self, idx: i32) -> Result<usize, InterpreterError> {
        let depth = self.entries.len() as i32;
        if idx < 0 || idx >= depth {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                format!("index {} out of range for stack depth {}", idx, depth),
            ));
        }
        Ok((depth - idx - 1) as usize)
    }

    /// OP_NIP family: discard the entry `idx` below the top.
    pub fn nip_n_discard(&mut self, idx: i32) -> Result<(), InterpreterError> {
        self.remove_at(idx).map(|_| ())
    }

    /// OP_TUCK: copy the top entry in below the second.
    pub fn tuck(&mut self) -> Result<(), InterpreterError> {
        let top = self.pop_byte_array()?;
        let below = self.pop_byte_array()?;
        self.push_byte_array(top.clone());
        self.push_byte_array(below);
        self.push_byte_array(top);
        Ok(())
    }

    /// Drop the top `n` entries.
    pub fn drop_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        self.expect_positive(n, "drop")?;
        for _ in 0..n {
            self.pop_byte_array()?;
        }
        Ok(())
    }

    /// Duplicate the top `n` entries as a block.
    pub fn dup_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        self.expect_positive(n, "dup")?;
        for _ in 0..n {
            let entry = self.peek_byte_array(n - 1)?;
            self.push_byte_array(entry);
        }
        Ok(())
    }

    /// Rotate the third `n`-block to the top (OP_ROT / OP_2ROT).
    pub fn rot_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        self.expect_positive(n, "rotate")?;
        for _ in 0..n {
            let entry = self.remove_at(3 * n - 1)?;
            self.push_byte_array(entry);
        }
        Ok(())
    }

    /// Swap the top two `n`-blocks (OP_SWAP / OP_2SWAP).
    pub fn swap_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        self.expect_positive(n, "swap")?;
        for _ in 0..n {
            let entry = self.remove_at(2 * n - 1)?;
            self.push_byte_array(entry);
        }
        Ok(())
    }

    /// Copy the second `n`-block over the top (OP_OVER / OP_2OVER).
    pub fn over_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        self.expect_positive(n, "over")?;
        for _ in 0..n {
            let entry = self.peek_byte_array(2 * n - 1)?;
            self.push_byte_array(entry);
        }
        Ok(())
    }

    /// OP_PICK: copy the entry `n` below the top to the top.
    pub fn pick_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        let entry = self.peek_byte_array(n)?;
        self.push_byte_array(entry);
        Ok(())
    }

    /// OP_ROLL: move the entry `n` below the top to the top.
    pub fn roll_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        let entry = self.remove_at(n)?;
        self.push_byte_array(entry);
        Ok(())
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn expect_positive(&self, n: i32, what: &str) -> Result<(), InterpreterError> {
        if n < 1 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                format!("cannot {} {} stack entries", what, n),
            ));
        }
        Ok(())
    }
}

/// Plain boolean stack tracking which IF arm has seen its ELSE.
pub struct BoolStack {
    entries: Vec<bool>,
}

impl BoolStack {
    pub fn new() -> Self {
        BoolStack {
            entries: Vec::new(),
        }
    }

    pub fn push_bool(&mut self, b: bool) {
        self.entries.push(b);
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        self.entries.pop().ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                "conditional bookkeeping stack is empty".to_string(),
            )
        })
    }
}

impl Default for BoolStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(items: &[&[u8]]) -> Stack {
        let mut s = Stack::new(4, false);
        for item in items {
            s.push_byte_array(item.to_vec());
        }
        s
    }

    #[test]
    fn test_truthiness_rules() {
        assert!(!as_bool(&[]));
        assert!(!as_bool(&[0x00]));
        assert!(!as_bool(&[0x00, 0x00]));
        // Negative zero in both widths.
        assert!(!as_bool(&[0x80]));
        assert!(!as_bool(&[0x00, 0x80]));
        // Anything else non-zero.
        assert!(as_bool(&[0x01]));
        assert!(as_bool(&[0x80, 0x00]));
        assert!(as_bool(&[0x00, 0x01]));
    }

    #[test]
    fn test_push_pop_order() {
        let mut s = stack_of(&[&[1, 2, 3], &[4, 5]]);
        assert_eq!(s.depth(), 2);
        assert_eq!(s.pop_byte_array().unwrap(), vec![4, 5]);
        assert_eq!(s.pop_byte_array().unwrap(), vec![1, 2, 3]);
        assert!(s.pop_byte_array().is_err());
    }

    #[test]
    fn test_block_dup() {
        let mut s = stack_of(&[&[1], &[2]]);
        s.dup_n(2).unwrap();
        assert_eq!(s.depth(), 4);
        assert_eq!(s.pop_byte_array().unwrap(), vec![2]);
        assert_eq!(s.pop_byte_array().unwrap(), vec![1]);
        assert_eq!(s.pop_byte_array().unwrap(), vec![2]);
    }

    #[test]
    fn test_swap_and_nip() {
        let mut s = stack_of(&[&[1], &[2]]);
        s.swap_n(1).unwrap();
        assert_eq!(s.pop_byte_array().unwrap(), vec![1]);

        let mut s = stack_of(&[&[1], &[2], &[3]]);
        s.nip_n_discard(1).unwrap();
        assert_eq!(s.pop_byte_array().unwrap(), vec![3]);
        assert_eq!(s.pop_byte_array().unwrap(), vec![1]);
    }

    #[test]
    fn test_rot_moves_third_to_top() {
        let mut s = stack_of(&[&[1], &[2], &[3]]);
        s.rot_n(1).unwrap();
        assert_eq!(s.pop_byte_array().unwrap(), vec![1]);
        assert_eq!(s.pop_byte_array().unwrap(), vec![3]);
        assert_eq!(s.pop_byte_array().unwrap(), vec![2]);
    }

    #[test]
    fn test_bad_counts_rejected() {
        let mut s = stack_of(&[&[1]]);
        assert!(s.dup_n(0).is_err());
        assert!(s.drop_n(-1).is_err());
        assert!(s.peek_byte_array(5).is_err());
    }
}
