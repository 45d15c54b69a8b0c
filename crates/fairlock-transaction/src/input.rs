//! Transaction input.

use fairlock_primitives::wire::{VarInt, WireReader, WireWriter};
use fairlock_script::Script;

use crate::output::TransactionOutput;
use crate::TransactionError;

/// Sequence value for a finalized input. Locktime semantics only apply
/// to inputs whose sequence is below this.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// An input spending one output of an earlier transaction.
///
/// The outpoint is the source transaction id plus output index; the
/// unlocking script proves the spend. Because the signature hash commits
/// to the spent output's value and locking script, the source output
/// must be attached through [`TransactionInput::set_source_output`]
/// before this input can be signed or verified.
///
/// Wire form: 32-byte txid, 4-byte output index, VarInt-prefixed
/// unlocking script, 4-byte sequence, all little-endian.
#[derive(Clone, Debug)]
pub struct TransactionInput {
    /// Source transaction id in internal byte order.
    pub source_txid: [u8; 32],

    /// Which output of the source transaction is spent.
    pub source_tx_out_index: u32,

    /// Sequence number; defaults to finalized.
    pub sequence_number: u32,

    /// The witness satisfying the source locking script, once signed.
    pub unlocking_script: Option<Script>,

    /// The spent output, attached out-of-band for signing.
    source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// An input with a zeroed outpoint and no scripts.
    pub fn new() -> Self {
        TransactionInput {
            source_txid: [0u8; 32],
            source_tx_out_index: 0,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: None,
            source_output: None,
        }
    }

    /// Read one input from the wire. The source output is not part of
    /// the wire form and starts out unattached.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let wire = |field: &str| {
            let field = field.to_string();
            move |e| TransactionError::SerializationError(format!("input {}: {}", field, e))
        };

        let mut source_txid = [0u8; 32];
        source_txid.copy_from_slice(reader.read_bytes(32).map_err(wire("txid"))?);

        let source_tx_out_index = reader.read_u32_le().map_err(wire("output index"))?;

        let script_len = reader.read_varint().map_err(wire("script length"))?;
        let script_bytes = reader
            .read_bytes(script_len.value() as usize)
            .map_err(wire("script bytes"))?;

        let sequence_number = reader.read_u32_le().map_err(wire("sequence"))?;

        Ok(TransactionInput {
            source_txid,
            source_tx_out_index,
            sequence_number,
            unlocking_script: (!script_bytes.is_empty()).then(|| Script::from_bytes(script_bytes)),
            source_output: None,
        })
    }

    /// Append this input's wire form to `writer`.
    pub fn write_to(&self, writer: &mut WireWriter) {
        writer.write_bytes(&self.source_txid);
        writer.write_u32_le(self.source_tx_out_index);

        let script_bytes = self
            .unlocking_script
            .as_ref()
            .map(|s| s.to_bytes())
            .unwrap_or_default();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);

        writer.write_u32_le(self.sequence_number);
    }

    /// Attach (or clear) the output this input spends.
    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    /// The attached source output, if any.
    pub fn source_tx_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }

    /// The value of the attached source output.
    pub fn source_tx_value(&self) -> Option<u64> {
        self.source_tx_output().map(|o| o.value)
    }

    /// The locking script of the attached source output.
    pub fn source_tx_script(&self) -> Option<&Script> {
        self.source_tx_output().map(|o| &o.locking_script)
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        let mut input = TransactionInput::new();
        input.source_txid = [0x42; 32];
        input.source_tx_out_index = 3;
        input.sequence_number = 0xFFFF_FFFE;
        input.unlocking_script = Some(Script::from_bytes(&[0x51, 0x51]));

        let mut writer = WireWriter::new();
        input.write_to(&mut writer);
        let bytes = writer.into_bytes();

        let mut reader = WireReader::new(&bytes);
        let back = TransactionInput::read_from(&mut reader).unwrap();
        assert_eq!(back.source_txid, [0x42; 32]);
        assert_eq!(back.source_tx_out_index, 3);
        assert_eq!(back.sequence_number, 0xFFFF_FFFE);
        assert_eq!(back.unlocking_script, input.unlocking_script);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_empty_script_reads_back_as_none() {
        let mut writer = WireWriter::new();
        TransactionInput::new().write_to(&mut writer);
        let bytes = writer.into_bytes();

        let mut reader = WireReader::new(&bytes);
        let back = TransactionInput::read_from(&mut reader).unwrap();
        assert!(back.unlocking_script.is_none());
        assert!(back.source_tx_output().is_none());
    }

    #[test]
    fn test_source_output_accessors() {
        let mut input = TransactionInput::new();
        assert_eq!(input.source_tx_value(), None);

        input.set_source_output(Some(TransactionOutput {
            value: 777,
            locking_script: Script::from_bytes(&[0x51]),
        }));
        assert_eq!(input.source_tx_value(), Some(777));
        assert_eq!(
            input.source_tx_script().map(|s| s.to_bytes().to_vec()),
            Some(vec![0x51])
        );
    }
}
