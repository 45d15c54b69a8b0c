use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use fairlock_contracts::commitment::{Commitment, TossChoice};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Reveals are accepted exactly when the length is 16 or 17, and the
    /// decoded bit is the length minus 16.
    #[test]
    fn commitment_accepts_exactly_valid_lengths(data in prop::collection::vec(any::<u8>(), 0..64)) {
        match Commitment::from_bytes(&data) {
            Ok(c) => {
                prop_assert!(data.len() == 16 || data.len() == 17);
                prop_assert_eq!(c.choice().bit() as usize, data.len() - 16);
            }
            Err(_) => prop_assert!(data.len() != 16 && data.len() != 17),
        }
    }

    /// Sampled commitments always decode back to the committed bit.
    #[test]
    fn commitment_decodes_to_committed_bit(seed in any::<u64>(), bit in 0u8..=1) {
        let choice = if bit == 0 { TossChoice::Zero } else { TossChoice::One };
        let mut rng = StdRng::seed_from_u64(seed);
        let c = Commitment::random(choice, &mut rng);
        prop_assert_eq!(c.choice(), choice);
    }
}
