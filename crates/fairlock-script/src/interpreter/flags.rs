//! Verification flag bitmask.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitmask of verification rules the engine enforces on top of the
/// consensus semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    /// Consensus rules only.
    pub const NONE: ScriptFlags = ScriptFlags(0);
    /// Fail on the reserved NOP range instead of ignoring it.
    pub const DISCOURAGE_UPGRADABLE_NOPS: ScriptFlags = ScriptFlags(1 << 0);
    /// Give OP_CHECKLOCKTIMEVERIFY its locktime semantics.
    pub const VERIFY_CHECKLOCKTIMEVERIFY: ScriptFlags = ScriptFlags(1 << 1);
    /// Require exactly one item left after evaluation.
    pub const VERIFY_CLEAN_STACK: ScriptFlags = ScriptFlags(1 << 2);
    /// Require strict DER signature encoding.
    pub const VERIFY_DER_SIGNATURES: ScriptFlags = ScriptFlags(1 << 3);
    /// Reject S values above half the group order.
    pub const VERIFY_LOW_S: ScriptFlags = ScriptFlags(1 << 4);
    /// Require minimal push and number encodings.
    pub const VERIFY_MINIMAL_DATA: ScriptFlags = ScriptFlags(1 << 5);
    /// Unlocking scripts may contain only pushes.
    pub const VERIFY_SIG_PUSH_ONLY: ScriptFlags = ScriptFlags(1 << 6);
    /// Require canonical pubkey and sighash-type encodings.
    pub const VERIFY_STRICT_ENCODING: ScriptFlags = ScriptFlags(1 << 7);
    /// Require the multisig dummy element to be empty.
    pub const STRICT_MULTI_SIG: ScriptFlags = ScriptFlags(1 << 8);

    /// The rule set contract spends are verified under: every encoding
    /// rule, locktime enforcement, push-only inputs, and a clean final
    /// stack.
    pub fn standard() -> ScriptFlags {
        Self::VERIFY_CHECKLOCKTIMEVERIFY
            | Self::VERIFY_CLEAN_STACK
            | Self::VERIFY_DER_SIGNATURES
            | Self::VERIFY_LOW_S
            | Self::VERIFY_MINIMAL_DATA
            | Self::VERIFY_SIG_PUSH_ONLY
            | Self::VERIFY_STRICT_ENCODING
            | Self::STRICT_MULTI_SIG
    }

    /// True when every bit of `flag` is set.
    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// True when at least one of `flags` is set.
    pub fn has_any(self, flags: &[ScriptFlags]) -> bool {
        flags.iter().any(|f| self.has_flag(*f))
    }

    /// Set every bit of `flag`.
    pub fn add_flag(&mut self, flag: ScriptFlags) {
        self.0 |= flag.0;
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScriptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ScriptFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        ScriptFlags(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_queries() {
        let flags = ScriptFlags::VERIFY_LOW_S | ScriptFlags::VERIFY_CLEAN_STACK;
        assert!(flags.has_flag(ScriptFlags::VERIFY_LOW_S));
        assert!(!flags.has_flag(ScriptFlags::VERIFY_MINIMAL_DATA));
        assert!(flags.has_any(&[
            ScriptFlags::VERIFY_MINIMAL_DATA,
            ScriptFlags::VERIFY_CLEAN_STACK
        ]));
        assert!(!ScriptFlags::NONE.has_any(&[ScriptFlags::VERIFY_LOW_S]));
    }

    #[test]
    fn test_standard_includes_encoding_rules() {
        let std = ScriptFlags::standard();
        for rule in [
            ScriptFlags::VERIFY_CHECKLOCKTIMEVERIFY,
            ScriptFlags::VERIFY_CLEAN_STACK,
            ScriptFlags::VERIFY_DER_SIGNATURES,
            ScriptFlags::VERIFY_LOW_S,
            ScriptFlags::VERIFY_MINIMAL_DATA,
            ScriptFlags::VERIFY_SIG_PUSH_ONLY,
            ScriptFlags::VERIFY_STRICT_ENCODING,
            ScriptFlags::STRICT_MULTI_SIG,
        ] {
            assert!(std.has_flag(rule));
        }
        assert!(!std.has_flag(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS));
    }
}
