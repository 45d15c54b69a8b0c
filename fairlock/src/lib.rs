#![deny(missing_docs)]

//! Fairlock contract toolkit - complete toolkit.
//!
//! Re-exports all fairlock components for convenient single-crate usage.

pub use fairlock_contracts as contracts;
pub use fairlock_primitives as primitives;
pub use fairlock_script as script;
pub use fairlock_transaction as transaction;
