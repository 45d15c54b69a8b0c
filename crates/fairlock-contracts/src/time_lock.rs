//! Time-locked three-party escrow contract.
//!
//! Alice and Bob can settle together at any time with a 2-of-2
//! co-signature. Once an absolute deadline has passed, the escrow agent
//! Eve can instead settle with either single party: her signature plus a
//! 1-of-2 multisig over the same two keys.

use fairlock_primitives::ec::PrivateKey;
use fairlock_script::opcodes::*;
use fairlock_script::{Script, ScriptBuilder};
use fairlock_transaction::sighash::SighashMode;
use fairlock_transaction::Transaction;

use crate::contract::{sign_input, ScriptContract};
use crate::ContractError;

/// Locktime values below this are block heights, not Unix timestamps.
const LOCK_TIME_THRESHOLD: u32 = 500_000_000;

/// Which pair of signatures the unlocking script carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendRoute {
    /// 2-of-2 mutual settlement; valid at any time.
    AliceAndBob,
    /// Escrow settlement by Alice and Eve; valid once the deadline passed.
    AliceAndEve,
    /// Escrow settlement by Bob and Eve; valid once the deadline passed.
    BobAndEve,
}

/// A time-locked escrow contract instance.
#[derive(Debug)]
pub struct TimeLockEscrow {
    alice_key: PrivateKey,
    bob_key: PrivateKey,
    eve_key: PrivateKey,
    /// Absolute deadline as a Unix timestamp.
    deadline: u32,
    route: SpendRoute,
}

impl TimeLockEscrow {
    /// Create an instance with fresh keys for all three parties.
    ///
    /// # Arguments
    /// * `deadline` - Absolute Unix timestamp after which the escrow
    ///   branch becomes spendable. Values below the locktime timestamp
    ///   threshold (500,000,000) are rejected so a block height cannot be
    ///   installed as a deadline by mistake.
    /// * `route` - Which signature pair this instance will spend with.
    ///
    /// # Returns
    /// `Ok(TimeLockEscrow)`, or `ContractError::InvalidDeadline`.
    pub fn new(deadline: u32, route: SpendRoute) -> Result<Self, ContractError> {
        if deadline < LOCK_TIME_THRESHOLD {
            return Err(ContractError::InvalidDeadline(deadline));
        }
        Ok(TimeLockEscrow {
            alice_key: PrivateKey::new(),
            bob_key: PrivateKey::new(),
            eve_key: PrivateKey::new(),
            deadline,
            route,
        })
    }

    /// The escrow deadline.
    pub fn deadline(&self) -> u32 {
        self.deadline
    }

    /// The configured spend route.
    pub fn route(&self) -> SpendRoute {
        self.route
    }
}

impl ScriptContract for TimeLockEscrow {
    fn locking_script(&self) -> Result<Script, ContractError> {
        let script = ScriptBuilder::new()
            .op(OP_IF)
            // Escrow path: unreachable before the deadline, then gated on
            // Eve's key.
            .num(self.deadline as i64)
            .op(OP_CHECKLOCKTIMEVERIFY)
            .op(OP_DROP)
            .op(OP_DUP)
            .op(OP_HASH160)
            .data(&self.eve_key.pub_key().hash160())
            .op(OP_EQUALVERIFY)
            .op(OP_CHECKSIGVERIFY)
            .num(1)
            .op(OP_ELSE)
            // Mutual path: both principals co-sign.
            .num(2)
            .op(OP_ENDIF)
            .data(&self.alice_key.pub_key().to_compressed())
            .data(&self.bob_key.pub_key().to_compressed())
            .num(2)
            .op(OP_CHECKMULTISIG)
            .build()?;
        Ok(script)
    }

    fn unlocking_script(
        &self,
        tx: &Transaction,
        input_index: u32,
    ) -> Result<Script, ContractError> {
        let locking = self.locking_script()?;
        let builder = ScriptBuilder::new().num(0);
        let builder = match self.route {
            SpendRoute::AliceAndBob => builder
                .data(&sign_input(tx, input_index, &locking, &self.alice_key, SighashMode::All)?)
                .data(&sign_input(tx, input_index, &locking, &self.bob_key, SighashMode::All)?)
                .num(0),
            SpendRoute::AliceAndEve => builder
                .data(&sign_input(tx, input_index, &locking, &self.alice_key, SighashMode::All)?)
                .data(&sign_input(tx, input_index, &locking, &self.eve_key, SighashMode::All)?)
                .data(&self.eve_key.pub_key().to_compressed())
                .num(1),
            SpendRoute::BobAndEve => builder
                .data(&sign_input(tx, input_index, &locking, &self.bob_key, SighashMode::All)?)
                .data(&sign_input(tx, input_index, &locking, &self.eve_key, SighashMode::All)?)
                .data(&self.eve_key.pub_key().to_compressed())
                .num(1),
        };
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deadlines below the timestamp threshold are rejected at build time.
    #[test]
    fn test_deadline_validation() {
        assert!(matches!(
            TimeLockEscrow::new(0, SpendRoute::AliceAndBob).unwrap_err(),
            ContractError::InvalidDeadline(0)
        ));
        assert!(TimeLockEscrow::new(499_999_999, SpendRoute::AliceAndEve).is_err());
        assert!(TimeLockEscrow::new(500_000_000, SpendRoute::AliceAndEve).is_ok());
        assert!(TimeLockEscrow::new(1_412_114_400, SpendRoute::BobAndEve).is_ok());
    }

    /// The predicate ends in the shared 2-key multisig tail and embeds
    /// the deadline as a canonical script number.
    #[test]
    fn test_locking_script_shape() {
        let escrow = TimeLockEscrow::new(1_412_114_400, SpendRoute::AliceAndBob).unwrap();
        let locking = escrow.locking_script().unwrap();
        let chunks = locking.chunks().unwrap();

        assert_eq!(chunks.first().unwrap().op, OP_IF);
        assert_eq!(chunks.last().unwrap().op, OP_CHECKMULTISIG);
        // Deadline 1412114400 encodes as e0272b54.
        assert_eq!(
            chunks[1].data.as_deref(),
            Some(&hex::decode("e0272b54").unwrap()[..])
        );
        assert_eq!(chunks[2].op, OP_CHECKLOCKTIMEVERIFY);
    }
}
