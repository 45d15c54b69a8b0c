/// Errors from transaction assembly, serialization, and signing.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Structural problem, e.g. an input index past the end.
    #[error("bad transaction: {0}")]
    InvalidTransaction(String),
    /// Input signing could not proceed, e.g. no source output attached.
    #[error("signing failed: {0}")]
    SigningError(String),
    /// Wire or hex decoding failed.
    #[error("serialization failed: {0}")]
    SerializationError(String),
    /// Error from the script crate.
    #[error("script error: {0}")]
    Script(#[from] fairlock_script::ScriptError),
    /// Error from the primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] fairlock_primitives::PrimitivesError),
}
