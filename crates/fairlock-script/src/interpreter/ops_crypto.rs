//! Hashing and signature opcodes.
//!
//! Signature verification itself is delegated to the [`TxContext`]
//! implementor; this module owns the stack protocol, the signed-subscript
//! computation, and the encoding policy checks. A failed signature check
//! pushes false rather than aborting, which the coin-toss payout gate
//! relies on to probe both participant keys with one signature.
//!
//! [`TxContext`]: super::TxContext

use super::error::{InterpreterError, InterpreterErrorCode};
use super::flags::ScriptFlags;
use super::parsed_opcode::*;
use super::thread::Thread;
use crate::opcodes::OP_CODESEPARATOR;

/// Sighash bit excluding the other inputs from the preimage.
const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Half the secp256k1 group order, big-endian.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

pub(crate) enum HashType {
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
}

impl<'a> Thread<'a> {
    /// Shared body of the five hash opcodes.
    pub(crate) fn op_hash(&mut self, hash_type: HashType) -> Result<(), InterpreterError> {
        let input = self.dstack.pop_byte_array()?;
        let digest = match hash_type {
            HashType::Ripemd160 => {
                use ripemd::{Digest, Ripemd160};
                Ripemd160::digest(&input).to_vec()
            }
            HashType::Sha1 => {
                use sha1::{Digest, Sha1};
                Sha1::digest(&input).to_vec()
            }
            HashType::Sha256 => {
                use sha2::{Digest, Sha256};
                Sha256::digest(&input).to_vec()
            }
            HashType::Hash160 => fairlock_primitives::hash::hash160(&input).to_vec(),
            HashType::Hash256 => fairlock_primitives::hash::sha256d(&input).to_vec(),
        };
        self.dstack.push_byte_array(digest);
        Ok(())
    }

    /// The script tail signatures commit to: everything after the latest
    /// OP_CODESEPARATOR in the executing script.
    pub(crate) fn sub_script(&self) -> ParsedScript {
        let from = if self.last_code_sep > 0 {
            self.last_code_sep + 1
        } else {
            0
        };
        self.scripts[self.script_idx][from..].to_vec()
    }

    /// Signed subscript with `sigs` pushes and code separators scrubbed.
    fn scrubbed_sub_script(&self, sigs: &[&[u8]]) -> crate::Script {
        let mut tail = self.sub_script();
        for sig in sigs {
            tail = remove_opcode_by_data(&tail, sig);
            tail = remove_opcode(&tail, OP_CODESEPARATOR);
        }
        unparse(&tail)
    }

    pub(crate) fn op_checksig(&mut self) -> Result<(), InterpreterError> {
        let pk_bytes = self.dstack.pop_byte_array()?;
        let full_sig = self.dstack.pop_byte_array()?;

        if full_sig.is_empty() {
            self.dstack.push_bool(false);
            return Ok(());
        }

        let ctx = self.tx_context.ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                "OP_CHECKSIG needs a transaction context".to_string(),
            )
        })?;

        // The final byte selects the sighash mode; the rest is DER.
        let (der, flag_byte) = full_sig.split_at(full_sig.len() - 1);
        let shf = flag_byte[0] as u32;

        self.check_hash_type_encoding(shf)?;
        self.check_signature_encoding(der)?;
        self.check_pub_key_encoding(&pk_bytes)?;

        let script_code = self.scrubbed_sub_script(&[&full_sig]);

        let valid = ctx
            .verify_signature(&full_sig, &pk_bytes, &script_code, self.input_idx, shf)
            .unwrap_or(false);
        self.dstack.push_bool(valid);
        Ok(())
    }

    pub(crate) fn op_checksigverify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.op_checksig()?;
        self.abstract_verify(pop, InterpreterErrorCode::CheckSigVerify)
    }

    pub(crate) fn op_checkmultisig(&mut self) -> Result<(), InterpreterError> {
        let num_pub_keys = self.dstack.pop_int()?.to_i32();
        if num_pub_keys < 0 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidPubKeyCount,
                format!("negative key count {}", num_pub_keys),
            ));
        }
        if num_pub_keys as usize > self.cfg.max_pub_keys_per_multisig() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidPubKeyCount,
                format!(
                    "{} keys, limit is {}",
                    num_pub_keys,
                    self.cfg.max_pub_keys_per_multisig()
                ),
            ));
        }

        // Each key counts against the operation budget.
        self.num_ops += num_pub_keys as usize;
        if self.num_ops > self.cfg.max_ops() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::TooManyOperations,
                format!("more than {} operations", self.cfg.max_ops()),
            ));
        }

        let mut pub_keys = Vec::with_capacity(num_pub_keys as usize);
        for _ in 0..num_pub_keys {
            pub_keys.push(self.dstack.pop_byte_array()?);
        }

        let num_signatures = self.dstack.pop_int()?.to_i32();
        if num_signatures < 0 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidSignatureCount,
                format!("negative signature count {}", num_signatures),
            ));
        }
        if num_signatures > num_pub_keys {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidSignatureCount,
                format!("{} signatures for {} keys", num_signatures, num_pub_keys),
            ));
        }

        let mut signatures = Vec::with_capacity(num_signatures as usize);
        for _ in 0..num_signatures {
            signatures.push(self.dstack.pop_byte_array()?);
        }

        // Dummy element (Satoshi bug); must be empty under strict rules.
        let dummy = self.dstack.pop_byte_array()?;
        if self.has_flag(ScriptFlags::STRICT_MULTI_SIG) && !dummy.is_empty() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::SigNullDummy,
                format!("multisig dummy holds {} bytes", dummy.len()),
            ));
        }

        let ctx = match self.tx_context {
            Some(ctx) => ctx,
            None => {
                self.dstack.push_bool(false);
                return Ok(());
            }
        };

        let sig_refs: Vec<&[u8]> = signatures.iter().map(|s| s.as_slice()).collect();
        let script_code = self.scrubbed_sub_script(&sig_refs);

        // Signatures must match keys in stack order; every mismatch burns
        // one key, so running out of keys fails the check.
        let mut success = true;
        let mut key_idx = 0usize;
        let mut sig_idx = 0usize;
        while sig_idx < signatures.len() {
            let sigs_left = (signatures.len() - sig_idx) as i32;
            let keys_left = num_pub_keys - key_idx as i32;
            if sigs_left > keys_left {
                success = false;
                break;
            }

            let sig = &signatures[sig_idx];
            let key = &pub_keys[key_idx];
            key_idx += 1;

            if sig.is_empty() {
                continue;
            }

            let (der, flag_byte) = sig.split_at(sig.len() - 1);
            let shf = flag_byte[0] as u32;

            self.check_hash_type_encoding(shf)?;
            self.check_signature_encoding(der)?;
            self.check_pub_key_encoding(key)?;

            if let Ok(true) = ctx.verify_signature(sig, key, &script_code, self.input_idx, shf) {
                sig_idx += 1;
            }
        }

        self.dstack.push_bool(success);
        Ok(())
    }

    pub(crate) fn op_checkmultisigverify(
        &mut self,
        pop: &ParsedOpcode,
    ) -> Result<(), InterpreterError> {
        self.op_checkmultisig()?;
        self.abstract_verify(pop, InterpreterErrorCode::CheckMultiSigVerify)
    }

    /// STRICT_ENCODING: the sighash flag must name a real mode.
    pub(crate) fn check_hash_type_encoding(&self, shf: u32) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_STRICT_ENCODING) {
            return Ok(());
        }
        let base = shf & !SIGHASH_ANYONECANPAY;
        if !(1..=3).contains(&base) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidSigHashType,
                format!("sighash type 0x{:x} is not defined", shf),
            ));
        }
        Ok(())
    }

    /// STRICT_ENCODING: the key must be SEC1, either width.
    pub(crate) fn check_pub_key_encoding(&self, pub_key: &[u8]) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_STRICT_ENCODING) {
            return Ok(());
        }
        let well_formed = match pub_key.first() {
            Some(0x02) | Some(0x03) => pub_key.len() == 33,
            Some(0x04) => pub_key.len() == 65,
            _ => false,
        };
        if well_formed {
            Ok(())
        } else {
            Err(InterpreterError::new(
                InterpreterErrorCode::PubKeyType,
                "public key is not in SEC1 form".to_string(),
            ))
        }
    }

    /// DER / LOW_S / STRICT_ENCODING: structural signature checks.
    ///
    /// An empty signature is exempt; it is the conventional way to make a
    /// CHECKSIG push false.
    pub(crate) fn check_signature_encoding(&self, sig: &[u8]) -> Result<(), InterpreterError> {
        if !self.has_any(&[
            ScriptFlags::VERIFY_DER_SIGNATURES,
            ScriptFlags::VERIFY_LOW_S,
            ScriptFlags::VERIFY_STRICT_ENCODING,
        ]) {
            return Ok(());
        }
        if sig.is_empty() {
            return Ok(());
        }

        let fail = |code: InterpreterErrorCode, detail: &str| {
            Err(InterpreterError::new(code, format!("malformed signature: {}", detail)))
        };

        let sig_len = sig.len();
        if sig_len < 8 {
            return fail(InterpreterErrorCode::SigTooShort, "fewer than 8 bytes");
        }
        if sig_len > 72 {
            return fail(InterpreterErrorCode::SigTooLong, "more than 72 bytes");
        }
        if sig[0] != 0x30 {
            return fail(InterpreterErrorCode::SigInvalidSeqID, "no sequence tag");
        }
        if sig[1] as usize != sig_len - 2 {
            return fail(InterpreterErrorCode::SigInvalidDataLen, "wrong length byte");
        }

        let r_len = sig[3] as usize;
        let s_type_offset = 4 + r_len;
        let s_len_offset = s_type_offset + 1;
        if s_type_offset >= sig_len {
            return fail(InterpreterErrorCode::SigMissingSTypeID, "S tag missing");
        }
        if s_len_offset >= sig_len {
            return fail(InterpreterErrorCode::SigMissingSLen, "S length missing");
        }

        let s_offset = s_len_offset + 1;
        let s_len = sig[s_len_offset] as usize;
        if s_offset + s_len != sig_len {
            return fail(InterpreterErrorCode::SigInvalidSLen, "S length mismatch");
        }

        if sig[2] != 0x02 {
            return fail(InterpreterErrorCode::SigInvalidRIntID, "R tag is not 0x02");
        }
        if r_len == 0 {
            return fail(InterpreterErrorCode::SigZeroRLen, "R is empty");
        }
        if sig[4] & 0x80 != 0 {
            return fail(InterpreterErrorCode::SigNegativeR, "R reads as negative");
        }
        if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
            return fail(InterpreterErrorCode::SigTooMuchRPadding, "R over-padded");
        }

        if sig[s_type_offset] != 0x02 {
            return fail(InterpreterErrorCode::SigInvalidSIntID, "S tag is not 0x02");
        }
        if s_len == 0 {
            return fail(InterpreterErrorCode::SigZeroSLen, "S is empty");
        }
        if sig[s_offset] & 0x80 != 0 {
            return fail(InterpreterErrorCode::SigNegativeS, "S reads as negative");
        }
        if s_len > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
            return fail(InterpreterErrorCode::SigTooMuchSPadding, "S over-padded");
        }

        if self.has_flag(ScriptFlags::VERIFY_LOW_S)
            && exceeds_half_order(&sig[s_offset..s_offset + s_len])
        {
            return fail(InterpreterErrorCode::SigHighS, "S is in the high half");
        }

        Ok(())
    }
}

/// Whether a big-endian S value (with possible DER padding) exceeds N/2.
fn exceeds_half_order(s: &[u8]) -> bool {
    let mut s = s;
    while s.len() > 1 && s[0] == 0 {
        s = &s[1..];
    }
    if s.len() > 32 {
        return true;
    }
    let mut padded = [0u8; 32];
    padded[32 - s.len()..].copy_from_slice(s);

    match padded.iter().zip(HALF_ORDER.iter()).find(|(a, b)| a != b) {
        Some((a, b)) => a > b,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds_half_order() {
        assert!(!exceeds_half_order(&[0x01]));
        assert!(!exceeds_half_order(&HALF_ORDER));

        let mut above = HALF_ORDER;
        above[31] += 1;
        assert!(exceeds_half_order(&above));

        // DER zero-padding is ignored.
        let mut padded = vec![0x00];
        padded.extend_from_slice(&above);
        assert!(exceeds_half_order(&padded));

        // Wider than a scalar is always high.
        assert!(exceeds_half_order(&[0x01; 33]));
    }
}
