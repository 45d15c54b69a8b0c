//! Script chunk decoding and push-prefix encoding.
//!
//! A chunk is one decoded script element: a bare opcode, or a push
//! opcode together with its payload. This is the tagged instruction
//! union the rest of the crate works in terms of; raw byte scripts are
//! decoded into chunks and push payloads are encoded back with their
//! minimal length prefix.

use crate::opcodes::*;
use crate::ScriptError;

/// One decoded script element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes this doubles as the payload
    /// length.
    pub op: u8,
    /// The payload of a push chunk, `None` for bare opcodes.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Render this chunk for ASM output: payload hex for pushes, the
    /// canonical OP_ name otherwise.
    pub fn to_asm_string(&self) -> String {
        if self.op > OP_0 && self.op <= OP_PUSHDATA4 {
            if let Some(ref data) = self.data {
                return hex::encode(data);
            }
        }
        opcode_to_string(self.op).to_string()
    }
}

/// Decode raw script bytes into chunks.
///
/// # Arguments
/// * `bytes` - The raw script.
///
/// # Returns
/// The decoded chunks, or [`ScriptError::DataTooSmall`] when a push
/// prefix promises more bytes than remain.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        pos += 1;

        // Length-prefix width and payload length for push opcodes.
        let payload_len = match op {
            0x01..=0x4b => Some(op as usize),
            OP_PUSHDATA1 => {
                let n = *bytes.get(pos).ok_or(ScriptError::DataTooSmall)? as usize;
                pos += 1;
                Some(n)
            }
            OP_PUSHDATA2 => {
                let prefix = bytes.get(pos..pos + 2).ok_or(ScriptError::DataTooSmall)?;
                pos += 2;
                Some(u16::from_le_bytes([prefix[0], prefix[1]]) as usize)
            }
            OP_PUSHDATA4 => {
                let prefix = bytes.get(pos..pos + 4).ok_or(ScriptError::DataTooSmall)?;
                pos += 4;
                Some(u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize)
            }
            _ => None,
        };

        let data = match payload_len {
            Some(n) => {
                let payload = bytes.get(pos..pos + n).ok_or(ScriptError::DataTooSmall)?;
                pos += n;
                Some(payload.to_vec())
            }
            None => None,
        };

        chunks.push(ScriptChunk { op, data });
    }

    Ok(chunks)
}

/// The minimal push prefix for a payload of `data_len` bytes.
///
/// Direct push up to 75 bytes, then OP_PUSHDATA1/2/4 as the length
/// grows.
///
/// # Returns
/// The prefix bytes, or [`ScriptError::DataTooBig`] past the 4-byte
/// length range.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    let prefix = if data_len <= 75 {
        vec![data_len as u8]
    } else if data_len <= 0xFF {
        vec![OP_PUSHDATA1, data_len as u8]
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        buf
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        buf
    } else {
        return Err(ScriptError::DataTooBig);
    };
    Ok(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mixed_pushes() {
        let bytes = hex::decode("05000102030401FF02ABCD").unwrap();
        let chunks = decode_script(&bytes).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].data.as_deref(), Some(&[0x00, 0x01, 0x02, 0x03, 0x04][..]));
        assert_eq!(chunks[1].data.as_deref(), Some(&[0xFF][..]));
        assert_eq!(chunks[2].data.as_deref(), Some(&[0xAB, 0xCD][..]));
    }

    #[test]
    fn test_decode_empty_and_bare_opcodes() {
        assert!(decode_script(&[]).unwrap().is_empty());

        let chunks = decode_script(&[OP_DUP, OP_HASH160, OP_EQUALVERIFY]).unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.data.is_none()));
    }

    #[test]
    fn test_decode_pushdata1() {
        let payload = b"testing";
        let mut bytes = vec![OP_PUSHDATA1, payload.len() as u8];
        bytes.extend_from_slice(payload);

        let chunks = decode_script(&bytes).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].op, OP_PUSHDATA1);
        assert_eq!(chunks[0].data.as_deref(), Some(&payload[..]));
    }

    #[test]
    fn test_decode_truncation_errors() {
        // Direct push promising more than remains.
        assert!(decode_script(&hex::decode("05000000").unwrap()).is_err());
        // PUSHDATA1 claiming 5 bytes with 4 present.
        assert!(decode_script(&hex::decode("4c05000000").unwrap()).is_err());
        // Prefixes with no length bytes at all.
        for op in [OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4] {
            assert!(decode_script(&[op]).is_err());
        }
    }

    #[test]
    fn test_prefix_boundaries() {
        assert_eq!(push_data_prefix(20).unwrap(), vec![20u8]);
        assert_eq!(push_data_prefix(75).unwrap(), vec![75u8]);
        assert_eq!(push_data_prefix(76).unwrap(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(push_data_prefix(255).unwrap(), vec![OP_PUSHDATA1, 255]);
        assert_eq!(push_data_prefix(256).unwrap(), vec![OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(push_data_prefix(65535).unwrap(), vec![OP_PUSHDATA2, 0xFF, 0xFF]);
        assert_eq!(
            push_data_prefix(65536).unwrap(),
            vec![OP_PUSHDATA4, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn test_asm_rendering() {
        let push = ScriptChunk {
            op: OP_DATA_20,
            data: Some(vec![0xAB; 20]),
        };
        assert_eq!(push.to_asm_string(), "ab".repeat(20));

        let bare = ScriptChunk {
            op: OP_DUP,
            data: None,
        };
        assert_eq!(bare.to_asm_string(), "OP_DUP");
    }
}
