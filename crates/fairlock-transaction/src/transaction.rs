//! The transaction skeleton.
//!
//! A transaction here is the unsigned structure a wallet hands over for
//! signing: version, inputs, outputs, locktime. This crate serializes
//! it, derives its identifier, and computes the signature hash each
//! input is signed against; funding and broadcast stay with external
//! collaborators.

use fairlock_primitives::hash::sha256d;
use fairlock_primitives::wire::{VarInt, WireReader, WireWriter};
use fairlock_script::Script;

use crate::input::{TransactionInput, DEFAULT_SEQUENCE_NUMBER};
use crate::output::TransactionOutput;
use crate::sighash;
use crate::TransactionError;

/// A transaction: version, inputs, outputs, locktime.
///
/// Wire form: 4-byte version, VarInt input count and inputs, VarInt
/// output count and outputs, 4-byte locktime, all little-endian.
#[derive(Clone, Debug)]
pub struct Transaction {
    /// Format version.
    pub version: u32,

    /// Inputs, in signing order.
    pub inputs: Vec<TransactionInput>,

    /// Outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Earliest block height or Unix time at which the transaction is
    /// valid; zero disables the constraint.
    pub lock_time: u32,
}

impl Transaction {
    /// A version-1 transaction with no inputs, outputs, or locktime.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------

    /// Parse a hex-encoded transaction.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::SerializationError(format!("bad hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse exactly one transaction; trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = WireReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        match reader.remaining() {
            0 => Ok(tx),
            n => Err(TransactionError::SerializationError(format!(
                "{} trailing bytes after transaction",
                n
            ))),
        }
    }

    /// Read one transaction from the wire.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let wire_err =
            |field: &str, e| TransactionError::SerializationError(format!("{}: {}", field, e));

        let version = reader.read_u32_le().map_err(|e| wire_err("version", e))?;

        let input_count = reader.read_varint().map_err(|e| wire_err("input count", e))?;
        let mut inputs = Vec::with_capacity(input_count.value() as usize);
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader
            .read_varint()
            .map_err(|e| wire_err("output count", e))?;
        let mut outputs = Vec::with_capacity(output_count.value() as usize);
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(|e| wire_err("locktime", e))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------

    /// Serialize to wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(256);
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------

    /// The transaction id: double SHA-256 of the wire bytes, in internal
    /// byte order.
    pub fn tx_id(&self) -> [u8; 32] {
        sha256d(&self.to_bytes())
    }

    /// The transaction id in display form (byte-reversed hex).
    pub fn tx_id_hex(&self) -> String {
        let mut id = self.tx_id();
        id.reverse();
        hex::encode(id)
    }

    // -----------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------

    /// Append an input.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append an input spending `vout` of `source_txid`, with the spent
    /// output attached so the input can be signed later.
    ///
    /// # Arguments
    /// * `source_txid` - Source transaction id, internal byte order.
    /// * `vout` - Output index within the source transaction.
    /// * `locking_script` - The spent output's predicate.
    /// * `value` - The spent output's value.
    pub fn add_input_from(
        &mut self,
        source_txid: [u8; 32],
        vout: u32,
        locking_script: Script,
        value: u64,
    ) {
        let mut input = TransactionInput::new();
        input.source_txid = source_txid;
        input.source_tx_out_index = vout;
        input.sequence_number = DEFAULT_SEQUENCE_NUMBER;
        input.set_source_output(Some(TransactionOutput {
            value,
            locking_script,
        }));
        self.inputs.push(input);
    }

    /// Append an output.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    // -----------------------------------------------------------------
    // Signing support
    // -----------------------------------------------------------------

    /// The signature hash for one input, taking the script code and
    /// value from the input's attached source output.
    ///
    /// # Arguments
    /// * `input_index` - The input being signed.
    /// * `sighash_flag` - Combined sighash flags, e.g. `SIGHASH_ALL`.
    pub fn calc_input_signature_hash(
        &self,
        input_index: usize,
        sighash_flag: u32,
    ) -> Result<[u8; 32], TransactionError> {
        let input = self.inputs.get(input_index).ok_or_else(|| {
            TransactionError::InvalidTransaction(format!(
                "input {} of {} does not exist",
                input_index,
                self.inputs.len()
            ))
        })?;

        let source = input.source_tx_output().ok_or_else(|| {
            TransactionError::SigningError("input has no source output attached".to_string())
        })?;

        sighash::signature_hash(
            self,
            input_index,
            source.locking_script.to_bytes(),
            sighash_flag,
            source.value,
        )
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
