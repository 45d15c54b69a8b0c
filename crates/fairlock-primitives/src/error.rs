/// Errors surfaced by the primitives layer.
///
/// Key and signature parsing reject malformed input here; the script and
/// transaction crates wrap this type with `#[from]` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// The bytes do not form a usable secp256k1 scalar.
    #[error("bad private key: {0}")]
    InvalidPrivateKey(String),

    /// The bytes do not form a curve point in SEC1 form.
    #[error("bad public key: {0}")]
    InvalidPublicKey(String),

    /// DER parsing or scalar validation of a signature failed.
    #[error("bad signature: {0}")]
    InvalidSignature(String),

    /// A hex string could not be decoded.
    #[error("bad hex input: {0}")]
    InvalidHex(String),

    /// A wire-format read ran past the end of the buffer.
    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
