use proptest::prelude::*;

use fairlock_script::Script;
use fairlock_transaction::{Transaction, TransactionInput, TransactionOutput};

fn arb_input() -> impl Strategy<Value = TransactionInput> {
    (
        prop::array::uniform32(any::<u8>()),
        any::<u32>(),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(txid, vout, sequence, script)| {
            let mut input = TransactionInput::new();
            input.source_txid = txid;
            input.source_tx_out_index = vout;
            input.sequence_number = sequence;
            input.unlocking_script = if script.is_empty() {
                None
            } else {
                Some(Script::from_bytes(&script))
            };
            input
        })
}

fn arb_output() -> impl Strategy<Value = TransactionOutput> {
    (any::<u64>(), prop::collection::vec(any::<u8>(), 0..64)).prop_map(|(value, script)| {
        TransactionOutput {
            value,
            locking_script: Script::from_bytes(&script),
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Wire serialization round-trips for arbitrary transactions.
    #[test]
    fn transaction_bytes_roundtrip(
        version in any::<u32>(),
        lock_time in any::<u32>(),
        inputs in prop::collection::vec(arb_input(), 0..4),
        outputs in prop::collection::vec(arb_output(), 0..4),
    ) {
        let tx = Transaction { version, inputs, outputs, lock_time };
        let bytes = tx.to_bytes();
        let parsed = Transaction::from_bytes(&bytes).unwrap();
        prop_assert_eq!(parsed.to_bytes(), bytes);
        prop_assert_eq!(parsed.version, tx.version);
        prop_assert_eq!(parsed.lock_time, tx.lock_time);
        prop_assert_eq!(parsed.inputs.len(), tx.inputs.len());
        prop_assert_eq!(parsed.outputs.len(), tx.outputs.len());
    }
}
