//! Script opcode definitions.
//!
//! Byte values for every script opcode, plus name lookups used by ASM
//! rendering and parsing. The byte layout is fixed by the external
//! interpreter's encoding; any divergence breaks redemption.

/// Push an empty byte array onto the stack.
pub const OP_0: u8 = 0x00;
/// Alias for OP_0.
pub const OP_FALSE: u8 = 0x00;
/// Push the next 1 byte of data.
pub const OP_DATA_1: u8 = 0x01;
/// Push the next 20 bytes of data (hash-sized push).
pub const OP_DATA_20: u8 = 0x14;
/// Push the next 33 bytes of data (compressed-pubkey-sized push).
pub const OP_DATA_33: u8 = 0x21;
/// Push the next 75 bytes of data (largest direct push).
pub const OP_DATA_75: u8 = 0x4b;
/// The next byte gives the number of bytes to push.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// The next 2 bytes (LE) give the number of bytes to push.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// The next 4 bytes (LE) give the number of bytes to push.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1 onto the stack.
pub const OP_1NEGATE: u8 = 0x4f;
/// Reserved opcode.
pub const OP_RESERVED: u8 = 0x50;
/// Push the number 1 onto the stack.
pub const OP_1: u8 = 0x51;
/// Alias for OP_1.
pub const OP_TRUE: u8 = 0x51;
/// Push the number 2.
pub const OP_2: u8 = 0x52;
/// Push the number 3.
pub const OP_3: u8 = 0x53;
/// Push the number 4.
pub const OP_4: u8 = 0x54;
/// Push the number 5.
pub const OP_5: u8 = 0x55;
/// Push the number 6.
pub const OP_6: u8 = 0x56;
/// Push the number 7.
pub const OP_7: u8 = 0x57;
/// Push the number 8.
pub const OP_8: u8 = 0x58;
/// Push the number 9.
pub const OP_9: u8 = 0x59;
/// Push the number 10.
pub const OP_10: u8 = 0x5a;
/// Push the number 11.
pub const OP_11: u8 = 0x5b;
/// Push the number 12.
pub const OP_12: u8 = 0x5c;
/// Push the number 13.
pub const OP_13: u8 = 0x5d;
/// Push the number 14.
pub const OP_14: u8 = 0x5e;
/// Push the number 15.
pub const OP_15: u8 = 0x5f;
/// Push the number 16.
pub const OP_16: u8 = 0x60;
/// Do nothing.
pub const OP_NOP: u8 = 0x61;
/// Reserved opcode.
pub const OP_VER: u8 = 0x62;
/// Execute the following statements if the top stack value is true.
pub const OP_IF: u8 = 0x63;
/// Execute the following statements if the top stack value is false.
pub const OP_NOTIF: u8 = 0x64;
/// Always-illegal conditional.
pub const OP_VERIF: u8 = 0x65;
/// Always-illegal conditional.
pub const OP_VERNOTIF: u8 = 0x66;
/// Execute if the preceding IF/NOTIF branch was not taken.
pub const OP_ELSE: u8 = 0x67;
/// End a conditional block.
pub const OP_ENDIF: u8 = 0x68;
/// Fail the script if the top stack value is false; consume it.
pub const OP_VERIFY: u8 = 0x69;
/// Fail the script immediately.
pub const OP_RETURN: u8 = 0x6a;
/// Move the top stack item to the alt stack.
pub const OP_TOALTSTACK: u8 = 0x6b;
/// Move the top alt stack item to the main stack.
pub const OP_FROMALTSTACK: u8 = 0x6c;
/// Drop the top two stack items.
pub const OP_2DROP: u8 = 0x6d;
/// Duplicate the top two stack items.
pub const OP_2DUP: u8 = 0x6e;
/// Duplicate the top three stack items.
pub const OP_3DUP: u8 = 0x6f;
/// Copy the 3rd and 4th items to the top.
pub const OP_2OVER: u8 = 0x70;
/// Move the 5th and 6th items to the top.
pub const OP_2ROT: u8 = 0x71;
/// Swap the top two pairs of items.
pub const OP_2SWAP: u8 = 0x72;
/// Duplicate the top item if it is truthy.
pub const OP_IFDUP: u8 = 0x73;
/// Push the current stack depth.
pub const OP_DEPTH: u8 = 0x74;
/// Drop the top stack item.
pub const OP_DROP: u8 = 0x75;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Remove the second-from-top stack item.
pub const OP_NIP: u8 = 0x77;
/// Copy the second-from-top item to the top.
pub const OP_OVER: u8 = 0x78;
/// Copy the item n back in the stack to the top.
pub const OP_PICK: u8 = 0x79;
/// Move the item n back in the stack to the top.
pub const OP_ROLL: u8 = 0x7a;
/// Rotate the top three items.
pub const OP_ROT: u8 = 0x7b;
/// Swap the top two items.
pub const OP_SWAP: u8 = 0x7c;
/// Copy the top item below the second item.
pub const OP_TUCK: u8 = 0x7d;
/// Concatenate two byte arrays (disabled).
pub const OP_CAT: u8 = 0x7e;
/// Split a byte array (disabled).
pub const OP_SPLIT: u8 = 0x7f;
/// Convert a number to a sized byte array (disabled).
pub const OP_NUM2BIN: u8 = 0x80;
/// Convert a byte array to a number (disabled).
pub const OP_BIN2NUM: u8 = 0x81;
/// Push the byte length of the top stack item.
pub const OP_SIZE: u8 = 0x82;
/// Bitwise invert (disabled).
pub const OP_INVERT: u8 = 0x83;
/// Bitwise and (disabled).
pub const OP_AND: u8 = 0x84;
/// Bitwise or (disabled).
pub const OP_OR: u8 = 0x85;
/// Bitwise xor (disabled).
pub const OP_XOR: u8 = 0x86;
/// Push whether the top two items are byte-equal.
pub const OP_EQUAL: u8 = 0x87;
/// OP_EQUAL followed by OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// Reserved opcode.
pub const OP_RESERVED1: u8 = 0x89;
/// Reserved opcode.
pub const OP_RESERVED2: u8 = 0x8a;
/// Increment the top number.
pub const OP_1ADD: u8 = 0x8b;
/// Decrement the top number.
pub const OP_1SUB: u8 = 0x8c;
/// Multiply by two (disabled).
pub const OP_2MUL: u8 = 0x8d;
/// Divide by two (disabled).
pub const OP_2DIV: u8 = 0x8e;
/// Negate the top number.
pub const OP_NEGATE: u8 = 0x8f;
/// Absolute value of the top number.
pub const OP_ABS: u8 = 0x90;
/// Boolean not of the top number.
pub const OP_NOT: u8 = 0x91;
/// Push whether the top number is non-zero.
pub const OP_0NOTEQUAL: u8 = 0x92;
/// Add the top two numbers.
pub const OP_ADD: u8 = 0x93;
/// Subtract the top number from the second.
pub const OP_SUB: u8 = 0x94;
/// Multiply (disabled).
pub const OP_MUL: u8 = 0x95;
/// Divide (disabled).
pub const OP_DIV: u8 = 0x96;
/// Modulo (disabled).
pub const OP_MOD: u8 = 0x97;
/// Left shift (disabled).
pub const OP_LSHIFT: u8 = 0x98;
/// Right shift (disabled).
pub const OP_RSHIFT: u8 = 0x99;
/// Boolean and of the top two numbers.
pub const OP_BOOLAND: u8 = 0x9a;
/// Boolean or of the top two numbers.
pub const OP_BOOLOR: u8 = 0x9b;
/// Push whether the top two numbers are equal.
pub const OP_NUMEQUAL: u8 = 0x9c;
/// OP_NUMEQUAL followed by OP_VERIFY.
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
/// Push whether the top two numbers differ.
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
/// Numeric less-than.
pub const OP_LESSTHAN: u8 = 0x9f;
/// Numeric greater-than.
pub const OP_GREATERTHAN: u8 = 0xa0;
/// Numeric less-than-or-equal.
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
/// Numeric greater-than-or-equal.
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
/// Minimum of the top two numbers.
pub const OP_MIN: u8 = 0xa3;
/// Maximum of the top two numbers.
pub const OP_MAX: u8 = 0xa4;
/// Push whether x is within [min, max).
pub const OP_WITHIN: u8 = 0xa5;
/// RIPEMD-160 hash of the top item.
pub const OP_RIPEMD160: u8 = 0xa6;
/// SHA-1 hash of the top item.
pub const OP_SHA1: u8 = 0xa7;
/// SHA-256 hash of the top item.
pub const OP_SHA256: u8 = 0xa8;
/// RIPEMD-160(SHA-256(x)) of the top item.
pub const OP_HASH160: u8 = 0xa9;
/// SHA-256d of the top item.
pub const OP_HASH256: u8 = 0xaa;
/// Mark the start of the signed subscript.
pub const OP_CODESEPARATOR: u8 = 0xab;
/// Verify a signature against a public key and the spending transaction.
pub const OP_CHECKSIG: u8 = 0xac;
/// OP_CHECKSIG followed by OP_VERIFY.
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
/// Verify m-of-n signatures against a key set.
pub const OP_CHECKMULTISIG: u8 = 0xae;
/// OP_CHECKMULTISIG followed by OP_VERIFY.
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;
/// Reserved no-op.
pub const OP_NOP1: u8 = 0xb0;
/// Require the spending transaction's locktime to be past a threshold.
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
/// Reserved no-op (relative locktime on other ledgers).
pub const OP_NOP3: u8 = 0xb2;
/// Reserved no-op.
pub const OP_NOP4: u8 = 0xb3;
/// Reserved no-op.
pub const OP_NOP5: u8 = 0xb4;
/// Reserved no-op.
pub const OP_NOP6: u8 = 0xb5;
/// Reserved no-op.
pub const OP_NOP7: u8 = 0xb6;
/// Reserved no-op.
pub const OP_NOP8: u8 = 0xb7;
/// Reserved no-op.
pub const OP_NOP9: u8 = 0xb8;
/// Reserved no-op.
pub const OP_NOP10: u8 = 0xb9;

/// Return the canonical name of an opcode.
///
/// Data pushes in the 0x01..=0x4b range are rendered as `OP_DATA_n`.
/// Unknown bytes render as `OP_UNKNOWN`.
///
/// # Arguments
/// * `op` - The opcode byte.
///
/// # Returns
/// A static string with the opcode's name.
pub fn opcode_to_string(op: u8) -> &'static str {
    match op {
        OP_0 => "OP_0",
        0x01..=0x4b => "OP_DATA",
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_RESERVED => "OP_RESERVED",
        OP_1 => "OP_1",
        OP_2 => "OP_2",
        OP_3 => "OP_3",
        OP_4 => "OP_4",
        OP_5 => "OP_5",
        OP_6 => "OP_6",
        OP_7 => "OP_7",
        OP_8 => "OP_8",
        OP_9 => "OP_9",
        OP_10 => "OP_10",
        OP_11 => "OP_11",
        OP_12 => "OP_12",
        OP_13 => "OP_13",
        OP_14 => "OP_14",
        OP_15 => "OP_15",
        OP_16 => "OP_16",
        OP_NOP => "OP_NOP",
        OP_VER => "OP_VER",
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
        OP_VERIF => "OP_VERIF",
        OP_VERNOTIF => "OP_VERNOTIF",
        OP_ELSE => "OP_ELSE",
        OP_ENDIF => "OP_ENDIF",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_TOALTSTACK => "OP_TOALTSTACK",
        OP_FROMALTSTACK => "OP_FROMALTSTACK",
        OP_2DROP => "OP_2DROP",
        OP_2DUP => "OP_2DUP",
        OP_3DUP => "OP_3DUP",
        OP_2OVER => "OP_2OVER",
        OP_2ROT => "OP_2ROT",
        OP_2SWAP => "OP_2SWAP",
        OP_IFDUP => "OP_IFDUP",
        OP_DEPTH => "OP_DEPTH",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_NIP => "OP_NIP",
        OP_OVER => "OP_OVER",
        OP_PICK => "OP_PICK",
        OP_ROLL => "OP_ROLL",
        OP_ROT => "OP_ROT",
        OP_SWAP => "OP_SWAP",
        OP_TUCK => "OP_TUCK",
        OP_CAT => "OP_CAT",
        OP_SPLIT => "OP_SPLIT",
        OP_NUM2BIN => "OP_NUM2BIN",
        OP_BIN2NUM => "OP_BIN2NUM",
        OP_SIZE => "OP_SIZE",
        OP_INVERT => "OP_INVERT",
        OP_AND => "OP_AND",
        OP_OR => "OP_OR",
        OP_XOR => "OP_XOR",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_RESERVED1 => "OP_RESERVED1",
        OP_RESERVED2 => "OP_RESERVED2",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_2MUL => "OP_2MUL",
        OP_2DIV => "OP_2DIV",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_0NOTEQUAL => "OP_0NOTEQUAL",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_MUL => "OP_MUL",
        OP_DIV => "OP_DIV",
        OP_MOD => "OP_MOD",
        OP_LSHIFT => "OP_LSHIFT",
        OP_RSHIFT => "OP_RSHIFT",
        OP_BOOLAND => "OP_BOOLAND",
        OP_BOOLOR => "OP_BOOLOR",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_NUMEQUALVERIFY => "OP_NUMEQUALVERIFY",
        OP_NUMNOTEQUAL => "OP_NUMNOTEQUAL",
        OP_LESSTHAN => "OP_LESSTHAN",
        OP_GREATERTHAN => "OP_GREATERTHAN",
        OP_LESSTHANOREQUAL => "OP_LESSTHANOREQUAL",
        OP_GREATERTHANOREQUAL => "OP_GREATERTHANOREQUAL",
        OP_MIN => "OP_MIN",
        OP_MAX => "OP_MAX",
        OP_WITHIN => "OP_WITHIN",
        OP_RIPEMD160 => "OP_RIPEMD160",
        OP_SHA1 => "OP_SHA1",
        OP_SHA256 => "OP_SHA256",
        OP_HASH160 => "OP_HASH160",
        OP_HASH256 => "OP_HASH256",
        OP_CODESEPARATOR => "OP_CODESEPARATOR",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "OP_CHECKMULTISIGVERIFY",
        OP_NOP1 => "OP_NOP1",
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_NOP3 => "OP_NOP3",
        OP_NOP4 => "OP_NOP4",
        OP_NOP5 => "OP_NOP5",
        OP_NOP6 => "OP_NOP6",
        OP_NOP7 => "OP_NOP7",
        OP_NOP8 => "OP_NOP8",
        OP_NOP9 => "OP_NOP9",
        OP_NOP10 => "OP_NOP10",
        _ => "OP_UNKNOWN",
    }
}

/// Look up an opcode byte by its canonical name.
///
/// Accepts the `OP_FALSE` / `OP_TRUE` aliases. Data push opcodes are not
/// resolvable by name; push data directly instead.
///
/// # Arguments
/// * `name` - An opcode name such as "OP_DUP".
///
/// # Returns
/// `Some(opcode)` if the name is known, `None` otherwise.
pub fn string_to_opcode(name: &str) -> Option<u8> {
    let op = match name {
        "OP_0" | "OP_FALSE" => OP_0,
        "OP_PUSHDATA1" => OP_PUSHDATA1,
        "OP_PUSHDATA2" => OP_PUSHDATA2,
        "OP_PUSHDATA4" => OP_PUSHDATA4,
        "OP_1NEGATE" => OP_1NEGATE,
        "OP_RESERVED" => OP_RESERVED,
        "OP_1" | "OP_TRUE" => OP_1,
        "OP_2" => OP_2,
        "OP_3" => OP_3,
        "OP_4" => OP_4,
        "OP_5" => OP_5,
        "OP_6" => OP_6,
        "OP_7" => OP_7,
        "OP_8" => OP_8,
        "OP_9" => OP_9,
        "OP_10" => OP_10,
        "OP_11" => OP_11,
        "OP_12" => OP_12,
        "OP_13" => OP_13,
        "OP_14" => OP_14,
        "OP_15" => OP_15,
        "OP_16" => OP_16,
        "OP_NOP" => OP_NOP,
        "OP_VER" => OP_VER,
        "OP_IF" => OP_IF,
        "OP_NOTIF" => OP_NOTIF,
        "OP_VERIF" => OP_VERIF,
        "OP_VERNOTIF" => OP_VERNOTIF,
        "OP_ELSE" => OP_ELSE,
        "OP_ENDIF" => OP_ENDIF,
        "OP_VERIFY" => OP_VERIFY,
        "OP_RETURN" => OP_RETURN,
        "OP_TOALTSTACK" => OP_TOALTSTACK,
        "OP_FROMALTSTACK" => OP_FROMALTSTACK,
        "OP_2DROP" => OP_2DROP,
        "OP_2DUP" => OP_2DUP,
        "OP_3DUP" => OP_3DUP,
        "OP_2OVER" => OP_2OVER,
        "OP_2ROT" => OP_2ROT,
        "OP_2SWAP" => OP_2SWAP,
        "OP_IFDUP" => OP_IFDUP,
        "OP_DEPTH" => OP_DEPTH,
        "OP_DROP" => OP_DROP,
        "OP_DUP" => OP_DUP,
        "OP_NIP" => OP_NIP,
        "OP_OVER" => OP_OVER,
        "OP_PICK" => OP_PICK,
        "OP_ROLL" => OP_ROLL,
        "OP_ROT" => OP_ROT,
        "OP_SWAP" => OP_SWAP,
        "OP_TUCK" => OP_TUCK,
        "OP_CAT" => OP_CAT,
        "OP_SPLIT" => OP_SPLIT,
        "OP_NUM2BIN" => OP_NUM2BIN,
        "OP_BIN2NUM" => OP_BIN2NUM,
        "OP_SIZE" => OP_SIZE,
        "OP_INVERT" => OP_INVERT,
        "OP_AND" => OP_AND,
        "OP_OR" => OP_OR,
        "OP_XOR" => OP_XOR,
        "OP_EQUAL" => OP_EQUAL,
        "OP_EQUALVERIFY" => OP_EQUALVERIFY,
        "OP_RESERVED1" => OP_RESERVED1,
        "OP_RESERVED2" => OP_RESERVED2,
        "OP_1ADD" => OP_1ADD,
        "OP_1SUB" => OP_1SUB,
        "OP_2MUL" => OP_2MUL,
        "OP_2DIV" => OP_2DIV,
        "OP_NEGATE" => OP_NEGATE,
        "OP_ABS" => OP_ABS,
        "OP_NOT" => OP_NOT,
        "OP_0NOTEQUAL" => OP_0NOTEQUAL,
        "OP_ADD" => OP_ADD,
        "OP_SUB" => OP_SUB,
        "OP_MUL" => OP_MUL,
        "OP_DIV" => OP_DIV,
        "OP_MOD" => OP_MOD,
        "OP_LSHIFT" => OP_LSHIFT,
        "OP_RSHIFT" => OP_RSHIFT,
        "OP_BOOLAND" => OP_BOOLAND,
        "OP_BOOLOR" => OP_BOOLOR,
        "OP_NUMEQUAL" => OP_NUMEQUAL,
        "OP_NUMEQUALVERIFY" => OP_NUMEQUALVERIFY,
        "OP_NUMNOTEQUAL" => OP_NUMNOTEQUAL,
        "OP_LESSTHAN" => OP_LESSTHAN,
        "OP_GREATERTHAN" => OP_GREATERTHAN,
        "OP_LESSTHANOREQUAL" => OP_LESSTHANOREQUAL,
        "OP_GREATERTHANOREQUAL" => OP_GREATERTHANOREQUAL,
        "OP_MIN" => OP_MIN,
        "OP_MAX" => OP_MAX,
        "OP_WITHIN" => OP_WITHIN,
        "OP_RIPEMD160" => OP_RIPEMD160,
        "OP_SHA1" => OP_SHA1,
        "OP_SHA256" => OP_SHA256,
        "OP_HASH160" => OP_HASH160,
        "OP_HASH256" => OP_HASH256,
        "OP_CODESEPARATOR" => OP_CODESEPARATOR,
        "OP_CHECKSIG" => OP_CHECKSIG,
        "OP_CHECKSIGVERIFY" => OP_CHECKSIGVERIFY,
        "OP_CHECKMULTISIG" => OP_CHECKMULTISIG,
        "OP_CHECKMULTISIGVERIFY" => OP_CHECKMULTISIGVERIFY,
        "OP_NOP1" => OP_NOP1,
        "OP_CHECKLOCKTIMEVERIFY" => OP_CHECKLOCKTIMEVERIFY,
        "OP_NOP3" => OP_NOP3,
        "OP_NOP4" => OP_NOP4,
        "OP_NOP5" => OP_NOP5,
        "OP_NOP6" => OP_NOP6,
        "OP_NOP7" => OP_NOP7,
        "OP_NOP8" => OP_NOP8,
        "OP_NOP9" => OP_NOP9,
        "OP_NOP10" => OP_NOP10,
        _ => return None,
    };
    Some(op)
}

/// Return true if the opcode pushes a small integer (OP_0 or OP_1..OP_16).
///
/// # Arguments
/// * `op` - The opcode byte.
///
/// # Returns
/// `true` for OP_0 and OP_1 through OP_16.
pub fn is_small_int_op(op: u8) -> bool {
    op == OP_0 || (OP_1..=OP_16).contains(&op)
}
