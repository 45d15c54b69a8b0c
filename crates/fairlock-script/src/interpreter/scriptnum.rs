//! Numeric operands and their consensus encoding.
//!
//! Stack numbers are little-endian with a sign bit in the top bit of the
//! final byte. Arithmetic opcodes only accept operands up to 4 bytes
//! (CHECKLOCKTIMEVERIFY reads 5), so an i64 holds every operand and every
//! intermediate result without overflow.

use super::error::{InterpreterError, InterpreterErrorCode};

/// A decoded script number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptNumber {
    /// The numeric value.
    pub val: i64,
}

impl ScriptNumber {
    /// Wrap an i64.
    pub fn new(val: i64) -> Self {
        ScriptNumber { val }
    }

    /// Decode a stack entry.
    ///
    /// # Arguments
    /// * `bb` - The raw entry bytes.
    /// * `script_num_len` - Longest accepted encoding.
    /// * `require_minimal` - Reject non-minimal encodings.
    pub fn from_bytes(
        bb: &[u8],
        script_num_len: usize,
        require_minimal: bool,
    ) -> Result<Self, InterpreterError> {
        if bb.len() > script_num_len {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NumberTooBig,
                format!(
                    "operand {:02x?} spans {} bytes, limit is {}",
                    bb,
                    bb.len(),
                    script_num_len
                ),
            ));
        }

        if require_minimal {
            check_minimal_data_encoding(bb)?;
        }

        let last = match bb.last() {
            Some(&b) => b,
            None => return Ok(ScriptNumber { val: 0 }),
        };

        let mut magnitude: i64 = 0;
        for (i, &b) in bb.iter().enumerate() {
            magnitude |= (b as i64) << (8 * i);
        }

        // The encoding stores sign-and-magnitude, not two's complement.
        let val = if last & 0x80 != 0 {
            let sign_bit = 0x80_i64 << (8 * (bb.len() - 1));
            -(magnitude & !sign_bit)
        } else {
            magnitude
        };

        Ok(ScriptNumber { val })
    }

    /// Encode to the minimal little-endian sign-and-magnitude form.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.val == 0 {
            return Vec::new();
        }

        let negative = self.val < 0;
        let mut magnitude = self.val.unsigned_abs();
        let mut out = Vec::new();
        while magnitude > 0 {
            out.push((magnitude & 0xff) as u8);
            magnitude >>= 8;
        }

        let top = out.len() - 1;
        if out[top] & 0x80 != 0 {
            // The sign bit is occupied; spill it into an extra byte.
            out.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            out[top] |= 0x80;
        }

        out
    }

    // Mutating arithmetic, chainable.

    pub fn add(&mut self, other: &ScriptNumber) -> &mut Self {
        self.val += other.val;
        self
    }

    pub fn sub(&mut self, other: &ScriptNumber) -> &mut Self {
        self.val -= other.val;
        self
    }

    pub fn incr(&mut self) -> &mut Self {
        self.val += 1;
        self
    }

    pub fn decr(&mut self) -> &mut Self {
        self.val -= 1;
        self
    }

    pub fn neg(&mut self) -> &mut Self {
        self.val = -self.val;
        self
    }

    pub fn abs(&mut self) -> &mut Self {
        self.val = self.val.abs();
        self
    }

    pub fn set(&mut self, i: i64) -> &mut Self {
        self.val = i;
        self
    }

    // Predicates.

    pub fn is_zero(&self) -> bool {
        self.val == 0
    }

    pub fn less_than(&self, other: &ScriptNumber) -> bool {
        self.val < other.val
    }

    pub fn less_than_int(&self, i: i64) -> bool {
        self.val < i
    }

    pub fn less_than_or_equal(&self, other: &ScriptNumber) -> bool {
        self.val <= other.val
    }

    pub fn greater_than(&self, other: &ScriptNumber) -> bool {
        self.val > other.val
    }

    pub fn greater_than_or_equal(&self, other: &ScriptNumber) -> bool {
        self.val >= other.val
    }

    pub fn equal(&self, other: &ScriptNumber) -> bool {
        self.val == other.val
    }

    // Conversions.

    /// Saturating i32 view, used for stack indexes and key counts.
    pub fn to_i32(&self) -> i32 {
        self.val.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    pub fn to_i64(&self) -> i64 {
        self.val
    }
}

/// Reject encodings with a redundant trailing byte.
///
/// The final byte may be a bare sign byte (0x00 or 0x80) only when the
/// byte before it already uses its own top bit.
pub fn check_minimal_data_encoding(v: &[u8]) -> Result<(), InterpreterError> {
    let last = match v.last() {
        Some(&b) => b,
        None => return Ok(()),
    };

    if last & 0x7f == 0 && (v.len() == 1 || v[v.len() - 2] & 0x80 == 0) {
        return Err(InterpreterError::new(
            InterpreterErrorCode::MinimalData,
            format!("operand {:02x?} is not minimally encoded", v),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        let cases: &[(i64, &str)] = &[
            (0, ""),
            (1, "01"),
            (-1, "81"),
            (16, "10"),
            (17, "11"),
            (127, "7f"),
            (-127, "ff"),
            (128, "8000"),
            (-128, "8080"),
            (255, "ff00"),
            (256, "0001"),
            (-256, "0081"),
            (32767, "ff7f"),
            (-32767, "ffff"),
            (32768, "008000"),
            (8388608, "00008000"),
            (2147483647, "ffffff7f"),
            (-2147483647, "ffffffff"),
            // Wider than 4 bytes: legal as intermediate results.
            (2147483648, "0000008000"),
            (-2147483648, "0000008080"),
            (4294967295, "ffffffff00"),
            // The canonical escrow deadline.
            (1412114400, "e0272b54"),
        ];
        for &(num, want) in cases {
            assert_eq!(
                hex::encode(ScriptNumber::new(num).to_bytes()),
                want,
                "encoding of {}",
                num
            );
        }
    }

    #[test]
    fn test_decode_strict_and_lax() {
        // (bytes, max len, minimal, expected result)
        let accept: &[(&str, usize, bool, i64)] = &[
            ("", 4, true, 0),
            ("01", 4, true, 1),
            ("81", 4, true, -1),
            ("7f", 4, true, 127),
            ("8000", 4, true, 128),
            ("0001", 4, true, 256),
            ("ffffff7f", 4, true, 2147483647),
            ("ffffffff", 4, true, -2147483647),
            // 5-byte window used by CHECKLOCKTIMEVERIFY.
            ("ffffffff7f", 5, true, 549755813887),
            // Redundant bytes pass without the minimal flag.
            ("00", 4, false, 0),
            ("0100", 4, false, 1),
        ];
        for &(bytes, max, minimal, want) in accept {
            let decoded =
                ScriptNumber::from_bytes(&hex::decode(bytes).unwrap(), max, minimal).unwrap();
            assert_eq!(decoded.to_i64(), want, "decoding of {:?}", bytes);
        }

        let reject: &[(&str, usize, bool)] = &[
            // Negative zero is never minimal.
            ("80", 4, true),
            // Redundant trailing bytes.
            ("00", 4, true),
            ("0100", 4, true),
            ("ff0000", 4, true),
            // Too wide for the operand window.
            ("0000008000", 4, true),
            ("0000008000", 4, false),
        ];
        for &(bytes, max, minimal) in reject {
            assert!(
                ScriptNumber::from_bytes(&hex::decode(bytes).unwrap(), max, minimal).is_err(),
                "decoding of {:?} should fail",
                bytes
            );
        }
    }

    #[test]
    fn test_round_trip_through_bytes() {
        for v in [
            -0x7fffffff_i64,
            -70000,
            -129,
            -1,
            0,
            1,
            16,
            17,
            127,
            128,
            1412114400,
        ] {
            let encoded = ScriptNumber::new(v).to_bytes();
            let back = ScriptNumber::from_bytes(&encoded, 5, true).unwrap();
            assert_eq!(back.to_i64(), v, "round trip of {}", v);
        }
    }

    #[test]
    fn test_i32_view_saturates() {
        assert_eq!(ScriptNumber::new(5).to_i32(), 5);
        assert_eq!(ScriptNumber::new(i64::MAX).to_i32(), i32::MAX);
        assert_eq!(ScriptNumber::new(i64::MIN).to_i32(), i32::MIN);
    }
}
