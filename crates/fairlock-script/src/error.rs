/// Errors from script construction and parsing.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// An ASM token was neither a known opcode nor valid hex.
    #[error("unparseable ASM token")]
    InvalidOpcodeData,

    /// A push-data opcode was fed through the bare-opcode path.
    #[error("{0} must go through a data push")]
    InvalidOpcodeType(String),

    /// A hex string could not be decoded.
    #[error("bad hex input: {0}")]
    InvalidHex(String),

    /// Hex decoding failure carried through from the `hex` crate.
    #[error("hex decode failed: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// An operation needed a non-empty script.
    #[error("script is empty")]
    EmptyScript,

    /// The script does not match the pay-to-pubkey-hash pattern.
    #[error("not a pay-to-pubkey-hash script")]
    NotP2PKH,

    /// A push prefix promised more bytes than the script holds.
    #[error("push runs past the end of the script")]
    DataTooSmall,

    /// A push payload is too large for any prefix encoding.
    #[error("push payload too large to encode")]
    DataTooBig,

    /// Error from the primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] fairlock_primitives::PrimitivesError),
}
