//! Fairlock contract toolkit - multi-party script contracts.
//!
//! Provides the commitment scheme, the `ScriptContract` capability trait,
//! the transaction-signing adapter, and the three contract generators:
//! pay-to-pubkey-hash, the two-party fair coin toss, and the time-locked
//! three-party escrow.

pub mod coin_toss;
pub mod commitment;
pub mod contract;
pub mod p2pkh;
pub mod time_lock;

mod error;
pub use coin_toss::{CoinToss, Player, TossOutcome};
pub use commitment::{Commitment, TossChoice};
pub use contract::{sign_input, ScriptContract};
pub use error::ContractError;
pub use p2pkh::PayToPubKeyHash;
pub use time_lock::{SpendRoute, TimeLockEscrow};
