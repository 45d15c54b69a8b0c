//! Fluent script builder.
//!
//! An ordered accumulator over the script instruction stream: opcodes,
//! raw data pushes, and small integers. Nothing is encoded until
//! `build()`, which freezes the sequence into an immutable [`Script`]
//! with minimal push prefixes and canonical small-integer encoding.

use crate::chunk::push_data_prefix;
use crate::opcodes::*;
use crate::{Script, ScriptError};

/// One pending instruction in the builder.
///
/// The closed union the builder accumulates; `build()` lowers each
/// variant to its byte-exact encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Instruction {
    /// A bare opcode.
    Opcode(u8),
    /// A raw data push, length-prefixed at encode time.
    DataPush(Vec<u8>),
    /// An integer, encoded canonically at encode time.
    Number(i64),
}

/// A fluent, ordered emitter for script instructions.
///
/// Accumulation never fails; `build()` returns an error only for data
/// pushes too large to encode.
///
/// ```
/// use fairlock_script::{opcodes::*, ScriptBuilder};
///
/// let script = ScriptBuilder::new()
///     .op(OP_DUP)
///     .op(OP_HASH160)
///     .data(&[0u8; 20])
///     .op(OP_EQUALVERIFY)
///     .op(OP_CHECKSIG)
///     .build()
///     .unwrap();
/// assert_eq!(script.len(), 25);
/// ```
#[derive(Default)]
pub struct ScriptBuilder {
    instructions: Vec<Instruction>,
}

impl ScriptBuilder {
    /// Create an empty builder.
    ///
    /// # Returns
    /// A `ScriptBuilder` with no instructions.
    pub fn new() -> Self {
        ScriptBuilder {
            instructions: Vec::new(),
        }
    }

    /// Append a bare opcode.
    ///
    /// # Arguments
    /// * `opcode` - The opcode byte to append.
    ///
    /// # Returns
    /// The builder, for chaining.
    pub fn op(mut self, opcode: u8) -> Self {
        self.instructions.push(Instruction::Opcode(opcode));
        self
    }

    /// Append a raw data push.
    ///
    /// The minimal length prefix (direct push or OP_PUSHDATA1/2/4) is
    /// chosen at `build()` time.
    ///
    /// # Arguments
    /// * `data` - The bytes to push.
    ///
    /// # Returns
    /// The builder, for chaining.
    pub fn data(mut self, data: &[u8]) -> Self {
        self.instructions.push(Instruction::DataPush(data.to_vec()));
        self
    }

    /// Append an integer with canonical encoding.
    ///
    /// Zero becomes OP_0, 1..=16 become OP_1..OP_16, -1 becomes
    /// OP_1NEGATE; anything else is pushed as a minimal little-endian
    /// script number with sign bit.
    ///
    /// # Arguments
    /// * `value` - The integer to push.
    ///
    /// # Returns
    /// The builder, for chaining.
    pub fn num(mut self, value: i64) -> Self {
        self.instructions.push(Instruction::Number(value));
        self
    }

    /// Freeze the accumulated instructions into an immutable script.
    ///
    /// # Returns
    /// The encoded `Script`, or an error if a data push exceeds the
    /// encodable size.
    pub fn build(self) -> Result<Script, ScriptError> {
        let mut bytes = Vec::new();
        for instruction in &self.instructions {
            match instruction {
                Instruction::Opcode(op) => bytes.push(*op),
                Instruction::DataPush(data) => {
                    let prefix = push_data_prefix(data.len())?;
                    bytes.extend_from_slice(&prefix);
                    bytes.extend_from_slice(data);
                }
                Instruction::Number(value) => match *value {
                    0 => bytes.push(OP_0),
                    -1 => bytes.push(OP_1NEGATE),
                    1..=16 => bytes.push(OP_1 + (*value as u8) - 1),
                    v => {
                        let data = encode_number(v);
                        let prefix = push_data_prefix(data.len())?;
                        bytes.extend_from_slice(&prefix);
                        bytes.extend_from_slice(&data);
                    }
                },
            }
        }
        Ok(Script::from_bytes(&bytes))
    }
}

/// Encode an integer as a minimal little-endian script number.
///
/// The sign lives in the most significant bit of the last byte; an extra
/// byte is appended when the magnitude already uses that bit.
fn encode_number(value: i64) -> Vec<u8> {
    let negative = value < 0;
    let mut abs = value.unsigned_abs();

    let mut result = Vec::new();
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        result[last] |= 0x80;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Opcode-only sequences encode byte for byte.
    #[test]
    fn test_opcode_sequence() {
        let script = ScriptBuilder::new()
            .op(OP_DUP)
            .op(OP_HASH160)
            .op(OP_EQUALVERIFY)
            .build()
            .unwrap();
        assert_eq!(script.to_bytes(), &[OP_DUP, OP_HASH160, OP_EQUALVERIFY]);
    }

    /// Data pushes get the minimal length prefix.
    #[test]
    fn test_data_push_prefixes() {
        let script = ScriptBuilder::new().data(&[0xAA; 20]).build().unwrap();
        assert_eq!(script.to_bytes()[0], 20);
        assert_eq!(script.len(), 21);

        let script = ScriptBuilder::new().data(&[0xBB; 80]).build().unwrap();
        assert_eq!(script.to_bytes()[0], OP_PUSHDATA1);
        assert_eq!(script.to_bytes()[1], 80);
        assert_eq!(script.len(), 82);
    }

    /// Small integers use the dedicated opcodes.
    #[test]
    fn test_small_int_encoding() {
        let script = ScriptBuilder::new()
            .num(0)
            .num(1)
            .num(16)
            .num(-1)
            .build()
            .unwrap();
        assert_eq!(script.to_bytes(), &[OP_0, OP_1, OP_16, OP_1NEGATE]);
    }

    /// Larger integers are pushed as minimal script numbers.
    #[test]
    fn test_number_encoding() {
        let script = ScriptBuilder::new().num(17).build().unwrap();
        assert_eq!(script.to_bytes(), &[0x01, 0x11]);

        let script = ScriptBuilder::new().num(-17).build().unwrap();
        assert_eq!(script.to_bytes(), &[0x01, 0x91]);

        // 128 needs a padding byte for the sign bit
        let script = ScriptBuilder::new().num(128).build().unwrap();
        assert_eq!(script.to_bytes(), &[0x02, 0x80, 0x00]);

        let script = ScriptBuilder::new().num(-128).build().unwrap();
        assert_eq!(script.to_bytes(), &[0x02, 0x80, 0x80]);

        // The escrow deadline used throughout the protocol tests
        let script = ScriptBuilder::new().num(1412114400).build().unwrap();
        assert_eq!(hex::encode(script.to_bytes()), "04e0272b54");
    }

    /// Ordering is preserved: instructions encode in append order.
    #[test]
    fn test_ordering_preserved() {
        let script = ScriptBuilder::new()
            .data(&[0x01])
            .op(OP_DUP)
            .num(2)
            .op(OP_ADD)
            .build()
            .unwrap();
        assert_eq!(script.to_asm(), "01 OP_DUP OP_2 OP_ADD");
    }

    /// Built scripts decode back to the same chunks they were built from.
    #[test]
    fn test_chunks_roundtrip() {
        let payload = vec![0xCD; 33];
        let script = ScriptBuilder::new()
            .op(OP_IF)
            .data(&payload)
            .op(OP_CHECKSIG)
            .op(OP_ENDIF)
            .build()
            .unwrap();
        let chunks = script.chunks().unwrap();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[1].data.as_ref().unwrap(), &payload);
    }
}
