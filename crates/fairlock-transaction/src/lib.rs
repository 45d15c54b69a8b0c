//! Fairlock contract toolkit - transaction skeletons and signature hashing.
//!
//! Provides the Transaction type with inputs, outputs, and locktime,
//! signature hash computation, wire serialization, and the spend context
//! binding transactions to the script interpreter.

pub mod context;
pub mod input;
pub mod output;
pub mod sighash;
pub mod transaction;

mod error;
pub use context::SpendContext;
pub use error::TransactionError;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use transaction::Transaction;
