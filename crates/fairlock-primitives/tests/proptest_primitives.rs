use proptest::prelude::*;

use fairlock_primitives::ec::{PrivateKey, Signature};
use fairlock_primitives::hash::sha256;
use fairlock_primitives::wire::{VarInt, WireReader, WireWriter};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// VarInt values survive a write/read cycle.
    #[test]
    fn varint_roundtrip(value in any::<u64>()) {
        let mut writer = WireWriter::new();
        writer.write_varint(VarInt(value));
        let bytes = writer.into_bytes();
        let mut reader = WireReader::new(&bytes);
        prop_assert_eq!(reader.read_varint().unwrap(), VarInt(value));
        prop_assert_eq!(reader.remaining(), 0);
    }

    /// Signatures over arbitrary messages DER-roundtrip and verify.
    #[test]
    fn signature_der_roundtrip(key_seed in prop::array::uniform32(1u8..), msg in prop::collection::vec(any::<u8>(), 0..128)) {
        // Not every 32-byte string is a valid scalar; skip the ones that
        // fall outside the curve order.
        let key = match PrivateKey::from_bytes(&key_seed) {
            Ok(key) => key,
            Err(_) => return Ok(()),
        };
        let hash = sha256(&msg);
        let sig = key.sign(&hash).unwrap();
        let parsed = Signature::from_der(&sig.to_der()).unwrap();
        prop_assert!(parsed.verify(&hash, &key.pub_key()));
    }
}
