/// Error types for contract construction and signing.
///
/// Construction errors surface from constructors and are fatal to that
/// instance; signing errors propagate from the primitives layer and are
/// fatal to that redemption attempt. Predicate rejection is not an error
/// here at all: it only exists as the interpreter's verdict.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// A commitment was not 16 or 17 bytes long.
    #[error("commitment must be 16 or 17 bytes, got {0}")]
    CommitmentLength(usize),

    /// An escrow deadline below the timestamp threshold was supplied.
    #[error("deadline {0} is below the timestamp threshold")]
    InvalidDeadline(u32),

    /// An error occurred while producing a signature.
    #[error("signing error: {0}")]
    Signing(String),

    /// An underlying script error (forwarded from `fairlock-script`).
    #[error("script error: {0}")]
    Script(#[from] fairlock_script::ScriptError),

    /// An underlying transaction error (forwarded from `fairlock-transaction`).
    #[error("transaction error: {0}")]
    Transaction(#[from] fairlock_transaction::TransactionError),

    /// An underlying primitives error (forwarded from `fairlock-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] fairlock_primitives::PrimitivesError),
}
