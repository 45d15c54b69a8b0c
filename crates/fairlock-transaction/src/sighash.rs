//! Signature hash computation.
//!
//! The hash an input signature commits to. The preimage includes the
//! spent output's value and exact locking script along with the sighash
//! mode, so a signature binds to one predicate on one transaction and
//! cannot be replayed against anything else.

use fairlock_primitives::hash::sha256d;
use fairlock_primitives::wire::{VarInt, WireWriter};

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Flag constants
// -----------------------------------------------------------------------

/// Commit to every input and output.
pub const SIGHASH_ALL: u32 = 0x01;

/// Commit to the inputs only; outputs stay malleable.
pub const SIGHASH_NONE: u32 = 0x02;

/// Commit to the inputs and the output paired with the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Modifier: commit only to the signed input, not its siblings.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask selecting the base mode out of a combined flag.
pub const SIGHASH_MASK: u32 = 0x1f;

/// How much of the spending transaction a signature covers.
///
/// Every contract in this toolkit signs with [`SighashMode::All`]; the
/// remaining modes complete the tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashMode {
    /// Cover every input and output.
    All,
    /// Cover inputs only.
    None,
    /// Cover inputs and the matching output.
    Single,
}

impl SighashMode {
    /// The wire flag for this mode.
    pub fn flag(&self) -> u32 {
        match self {
            SighashMode::All => SIGHASH_ALL,
            SighashMode::None => SIGHASH_NONE,
            SighashMode::Single => SIGHASH_SINGLE,
        }
    }
}

// -----------------------------------------------------------------------
// Hash computation
// -----------------------------------------------------------------------

/// The signature hash for one input: double SHA-256 of the preimage.
///
/// # Arguments
/// * `tx` - The spending transaction.
/// * `input_index` - The input being signed.
/// * `prev_output_script` - Script code of the output being spent.
/// * `sighash_type` - Combined sighash flags.
/// * `value` - Value of the output being spent.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    value: u64,
) -> Result<[u8; 32], TransactionError> {
    let preimage = calc_preimage(tx, input_index, prev_output_script, sighash_type, value)?;
    Ok(sha256d(&preimage))
}

/// The raw preimage the signature hash is computed over.
///
/// Layout, all little-endian:
///
/// | Field          | Size          | Notes                                  |
/// |----------------|---------------|----------------------------------------|
/// | version        | 4             |                                        |
/// | hash_prevouts  | 32            | zeroed under ANYONECANPAY              |
/// | hash_sequence  | 32            | zeroed under ANYONECANPAY/NONE/SINGLE  |
/// | outpoint       | 36            | txid + vout of the signed input        |
/// | script code    | VarInt + n    | the locking script being satisfied     |
/// | value          | 8             | value of the spent output              |
/// | sequence       | 4             | of the signed input                    |
/// | hash_outputs   | 32            | all, one, or zeroed by base mode       |
/// | locktime       | 4             |                                        |
/// | sighash type   | 4             |                                        |
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    value: u64,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        TransactionError::InvalidTransaction(format!(
            "input {} of {} does not exist",
            input_index,
            tx.inputs.len()
        ))
    })?;

    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;
    let base_type = sighash_type & SIGHASH_MASK;

    let hash_prevouts = if anyone_can_pay {
        [0u8; 32]
    } else {
        prevouts_hash(tx)
    };

    let covers_sequences =
        !anyone_can_pay && base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE;
    let hash_sequence = if covers_sequences {
        sequences_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_outputs = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        outputs_hash(tx, None)
    } else if base_type == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        outputs_hash(tx, Some(input_index))
    } else {
        [0u8; 32]
    };

    let mut writer = WireWriter::with_capacity(156 + prev_output_script.len());
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    writer.write_bytes(&input.source_txid);
    writer.write_u32_le(input.source_tx_out_index);
    writer.write_varint(VarInt::from(prev_output_script.len()));
    writer.write_bytes(prev_output_script);
    writer.write_u64_le(value);
    writer.write_u32_le(input.sequence_number);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);

    Ok(writer.into_bytes())
}

/// Double SHA-256 over every input's outpoint.
fn prevouts_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = WireWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        writer.write_bytes(&input.source_txid);
        writer.write_u32_le(input.source_tx_out_index);
    }
    sha256d(writer.as_bytes())
}

/// Double SHA-256 over every input's sequence number.
fn sequences_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = WireWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence_number);
    }
    sha256d(writer.as_bytes())
}

/// Double SHA-256 over all outputs, or over just `only` for
/// SIGHASH_SINGLE.
fn outputs_hash(tx: &Transaction, only: Option<usize>) -> [u8; 32] {
    let mut writer = WireWriter::new();
    match only {
        Some(idx) => writer.write_bytes(&tx.outputs[idx].to_bytes()),
        None => {
            for output in &tx.outputs {
                writer.write_bytes(&output.to_bytes());
            }
        }
    }
    sha256d(writer.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TransactionOutput;
    use fairlock_script::Script;

    fn two_output_tx() -> Transaction {
        let mut tx = Transaction::new();
        tx.add_input_from([0x01; 32], 0, Script::from_bytes(&[0x51]), 10_000);
        tx.add_output(TransactionOutput {
            value: 4_000,
            locking_script: Script::from_bytes(&[0x51]),
        });
        tx.add_output(TransactionOutput {
            value: 5_000,
            locking_script: Script::from_bytes(&[0x52]),
        });
        tx
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(SighashMode::All.flag(), SIGHASH_ALL);
        assert_eq!(SighashMode::None.flag(), SIGHASH_NONE);
        assert_eq!(SighashMode::Single.flag(), SIGHASH_SINGLE);
    }

    #[test]
    fn test_commits_to_script_code_and_value() {
        let tx = two_output_tx();
        let base = signature_hash(&tx, 0, &[0x51], SIGHASH_ALL, 10_000).unwrap();

        assert_ne!(
            base,
            signature_hash(&tx, 0, &[0x52], SIGHASH_ALL, 10_000).unwrap()
        );
        assert_ne!(
            base,
            signature_hash(&tx, 0, &[0x51], SIGHASH_ALL, 10_001).unwrap()
        );
    }

    #[test]
    fn test_all_covers_every_output() {
        let base = signature_hash(&two_output_tx(), 0, &[0x51], SIGHASH_ALL, 10_000).unwrap();

        let mut modified = two_output_tx();
        modified.outputs[1].value += 1;
        let changed = signature_hash(&modified, 0, &[0x51], SIGHASH_ALL, 10_000).unwrap();
        assert_ne!(base, changed);
    }

    #[test]
    fn test_none_ignores_outputs() {
        let base = signature_hash(&two_output_tx(), 0, &[0x51], SIGHASH_NONE, 10_000).unwrap();

        let mut modified = two_output_tx();
        modified.outputs[1].value += 1;
        let unchanged = signature_hash(&modified, 0, &[0x51], SIGHASH_NONE, 10_000).unwrap();
        assert_eq!(base, unchanged);
    }

    #[test]
    fn test_single_covers_paired_output() {
        let base = signature_hash(&two_output_tx(), 0, &[0x51], SIGHASH_SINGLE, 10_000).unwrap();

        // Output 1 is not paired with input 0: free to change.
        let mut other = two_output_tx();
        other.outputs[1].value += 1;
        assert_eq!(
            base,
            signature_hash(&other, 0, &[0x51], SIGHASH_SINGLE, 10_000).unwrap()
        );

        // Output 0 is paired: committed.
        let mut paired = two_output_tx();
        paired.outputs[0].value += 1;
        assert_ne!(
            base,
            signature_hash(&paired, 0, &[0x51], SIGHASH_SINGLE, 10_000).unwrap()
        );
    }

    #[test]
    fn test_input_index_bounds() {
        assert!(signature_hash(&two_output_tx(), 5, &[0x51], SIGHASH_ALL, 10_000).is_err());
    }
}
