//! Transaction output.

use fairlock_primitives::wire::{VarInt, WireReader, WireWriter};
use fairlock_script::Script;

use crate::TransactionError;

/// An output: a value and the locking script guarding it.
///
/// Wire form: value as 8 little-endian bytes, then the VarInt-prefixed
/// locking script. The same layout appears inside signature preimages,
/// so [`TransactionOutput::to_bytes`] serves both.
#[derive(Clone, Debug)]
pub struct TransactionOutput {
    /// Amount in base ledger units.
    pub value: u64,

    /// The spending predicate installed on this output.
    pub locking_script: Script,
}

impl TransactionOutput {
    /// A zero-value output with an empty script.
    pub fn new() -> Self {
        TransactionOutput {
            value: 0,
            locking_script: Script::new(),
        }
    }

    /// Read one output from the wire.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let value = reader
            .read_u64_le()
            .map_err(|e| TransactionError::SerializationError(format!("output value: {}", e)))?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("locking script length: {}", e))
        })?;
        let script_bytes = reader
            .read_bytes(script_len.value() as usize)
            .map_err(|e| {
                TransactionError::SerializationError(format!("locking script bytes: {}", e))
            })?;

        Ok(TransactionOutput {
            value,
            locking_script: Script::from_bytes(script_bytes),
        })
    }

    /// Append this output's wire form to `writer`.
    pub fn write_to(&self, writer: &mut WireWriter) {
        writer.write_u64_le(self.value);
        writer.write_varint(VarInt::from(self.locking_script.len()));
        writer.write_bytes(self.locking_script.to_bytes());
    }

    /// This output's wire form as a fresh vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(9 + self.locking_script.len());
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}

impl Default for TransactionOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        let out = TransactionOutput {
            value: 21_000,
            locking_script: Script::from_bytes(&[0x51, 0x87]),
        };
        let bytes = out.to_bytes();

        let mut reader = WireReader::new(&bytes);
        let back = TransactionOutput::read_from(&mut reader).unwrap();
        assert_eq!(back.value, 21_000);
        assert_eq!(back.locking_script, out.locking_script);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_truncated_input_rejected() {
        let out = TransactionOutput {
            value: 1,
            locking_script: Script::from_bytes(&[0x51; 10]),
        };
        let bytes = out.to_bytes();
        let mut reader = WireReader::new(&bytes[..bytes.len() - 1]);
        assert!(TransactionOutput::read_from(&mut reader).is_err());
    }
}
