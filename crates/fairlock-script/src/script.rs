//! The byte-backed `Script` type.
//!
//! A script is an ordered instruction sequence stored in its wire form.
//! Locking scripts sit on outputs, unlocking scripts on inputs; the
//! interpreter evaluates the unlocking half first. Construction goes
//! through [`crate::ScriptBuilder`] or the append methods here; once a
//! contract hands a script out it is never mutated again.

use std::fmt;

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::opcodes::*;
use crate::ScriptError;

/// A script in wire form.
#[derive(Clone, PartialEq, Eq)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// An empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Wrap a copy of raw script bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Decode a hex-encoded script.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        hex::decode(hex_str)
            .map(Script)
            .map_err(|e| ScriptError::InvalidHex(e.to_string()))
    }

    /// Parse a space-separated ASM string.
    ///
    /// Tokens that name opcodes ("OP_DUP") are appended as opcodes;
    /// anything else must be hex and becomes a push.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        if asm.is_empty() {
            return Ok(script);
        }
        for token in asm.split(' ') {
            match string_to_opcode(token) {
                Some(opcode) => script.append_opcodes(&[opcode])?,
                None => {
                    let data =
                        hex::decode(token).map_err(|_| ScriptError::InvalidOpcodeData)?;
                    script.append_push_data(&data)?;
                }
            }
        }
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// The raw script bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex of the script bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Space-separated ASM rendering.
    ///
    /// Pushes render as payload hex, opcodes by name. Undecodable
    /// scripts render as the empty string.
    pub fn to_asm(&self) -> String {
        match self.chunks() {
            Ok(chunks) if !self.0.is_empty() => chunks
                .iter()
                .map(ScriptChunk::to_asm_string)
                .collect::<Vec<_>>()
                .join(" "),
            _ => String::new(),
        }
    }

    /// Byte length of the script.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode into chunks.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    /// Whether this is the 25-byte pay-to-pubkey-hash pattern
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn is_p2pkh(&self) -> bool {
        matches!(
            self.0.as_slice(),
            [OP_DUP, OP_HASH160, OP_DATA_20, .., OP_EQUALVERIFY, OP_CHECKSIG]
                if self.0.len() == 25
        )
    }

    /// Whether this is a bare multisig output
    /// `OP_M <key>... OP_N OP_CHECKMULTISIG`.
    pub fn is_multisig_out(&self) -> bool {
        let chunks = match self.chunks() {
            Ok(chunks) => chunks,
            Err(_) => return false,
        };
        if chunks.len() < 3 {
            return false;
        }

        let threshold_ok = is_small_int_op(chunks[0].op);
        let keys_ok = chunks[1..chunks.len() - 2]
            .iter()
            .all(|c| matches!(&c.data, Some(d) if !d.is_empty()));
        let tail_ok = is_small_int_op(chunks[chunks.len() - 2].op)
            && chunks[chunks.len() - 1].op == OP_CHECKMULTISIG;

        threshold_ok && keys_ok && tail_ok
    }

    /// The 20-byte hash committed to by a pay-to-pubkey-hash script.
    pub fn public_key_hash(&self) -> Result<Vec<u8>, ScriptError> {
        if self.0.is_empty() {
            return Err(ScriptError::EmptyScript);
        }
        if self.0.len() <= 2 || self.0[0] != OP_DUP || self.0[1] != OP_HASH160 {
            return Err(ScriptError::NotP2PKH);
        }
        decode_script(&self.0[2..])?
            .first()
            .and_then(|chunk| chunk.data.clone())
            .ok_or(ScriptError::NotP2PKH)
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append a payload with its minimal push prefix.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append bare opcodes.
    ///
    /// Push-data opcodes are rejected here; their payloads must come
    /// through [`Script::append_push_data`] so the prefix stays
    /// consistent.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&bad) = opcodes
            .iter()
            .find(|&&op| (OP_DATA_1..=OP_PUSHDATA4).contains(&op))
        {
            return Err(ScriptError::InvalidOpcodeType(
                opcode_to_string(bad).to_string(),
            ));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2PKH_HEX: &str = "76a9143c9a278ad5c2131f637d59e4a14c3491ca3de52b88ac";
    const P2PKH_ASM: &str =
        "OP_DUP OP_HASH160 3c9a278ad5c2131f637d59e4a14c3491ca3de52b OP_EQUALVERIFY OP_CHECKSIG";

    #[test]
    fn test_hex_round_trip() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(script.to_hex(), P2PKH_HEX);
        assert_eq!(script.len(), 25);

        let empty = Script::from_hex("").unwrap();
        assert!(empty.is_empty());

        assert!(Script::from_hex("ZZZZ").is_err());
    }

    #[test]
    fn test_asm_round_trip() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(script.to_asm(), P2PKH_ASM);

        let reparsed = Script::from_asm(P2PKH_ASM).unwrap();
        assert_eq!(reparsed.to_hex(), P2PKH_HEX);

        assert!(Script::from_asm("").unwrap().is_empty());
        assert!(Script::from_asm("OP_DUP nothex!").is_err());
    }

    #[test]
    fn test_p2pkh_classification() {
        assert!(Script::from_hex(P2PKH_HEX).unwrap().is_p2pkh());

        // A pay-to-script-hash pattern is not P2PKH.
        let p2sh = Script::from_hex("a9143c9a278ad5c2131f637d59e4a14c3491ca3de52b87").unwrap();
        assert!(!p2sh.is_p2pkh());

        // One byte short.
        let truncated = Script::from_hex(&P2PKH_HEX[..P2PKH_HEX.len() - 2]).unwrap();
        assert!(!truncated.is_p2pkh());
    }

    #[test]
    fn test_multisig_classification() {
        // OP_2 <k1> <k2> <k3> OP_3 OP_CHECKMULTISIG with 1-byte stand-in keys.
        let multisig = Script::from_hex("5201110122013353ae").unwrap();
        assert!(multisig.is_multisig_out());

        assert!(!Script::from_hex(P2PKH_HEX).unwrap().is_multisig_out());
        assert!(!Script::from_bytes(&[OP_1, OP_CHECKMULTISIG]).is_multisig_out());
    }

    #[test]
    fn test_public_key_hash_extraction() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(
            hex::encode(script.public_key_hash().unwrap()),
            "3c9a278ad5c2131f637d59e4a14c3491ca3de52b"
        );

        assert!(matches!(
            Script::new().public_key_hash(),
            Err(ScriptError::EmptyScript)
        ));
        assert!(Script::from_hex("76").unwrap().public_key_hash().is_err());
    }

    #[test]
    fn test_append_push_data_prefixes() {
        let mut script = Script::new();
        script.append_push_data(&[0x01, 0x02, 0x03, 0x04, 0x05]).unwrap();
        assert_eq!(script.to_hex(), "050102030405");

        let mut script = Script::new();
        script.append_push_data(&[0xAA; 80]).unwrap();
        // OP_PUSHDATA1, length 80, then the payload.
        assert_eq!(script.to_bytes()[..2], [0x4c, 80]);
        assert_eq!(script.len(), 82);
    }

    #[test]
    fn test_append_opcodes_rejects_pushes() {
        let mut script = Script::from_asm("OP_2 OP_2 OP_ADD").unwrap();
        script.append_opcodes(&[OP_EQUALVERIFY]).unwrap();
        assert_eq!(script.to_asm(), "OP_2 OP_2 OP_ADD OP_EQUALVERIFY");

        assert!(script.append_opcodes(&[OP_PUSHDATA1]).is_err());
        assert!(script.append_opcodes(&[OP_DATA_20]).is_err());
    }

    #[test]
    fn test_serde_hex_string_form() {
        let script = Script::from_asm("OP_2 OP_2 OP_ADD OP_4 OP_EQUALVERIFY").unwrap();
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, r#""5252935488""#);

        let parsed: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, script);
    }

    #[test]
    fn test_display_and_debug() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(script.to_string(), P2PKH_HEX);
        assert_eq!(format!("{:?}", script), format!("Script({})", P2PKH_HEX));
    }
}
