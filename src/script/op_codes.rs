//! Script opcodes recognized by the serializer and template matcher.
//!
//! Constants grouped by category. This crate serializes and pattern-matches
//! scripts; it does not execute them.
//!
//! # Examples
//! ```
//! use sigil::script::op_codes::*;
//! assert_eq!(OP_DUP, 118);
//! ```

// Pushdata and Constants
/// Pushes empty array (0/false) onto the stack.
pub const OP_0: u8 = 0;
/// Alias of [`OP_0`].
pub const OP_FALSE: u8 = 0;
/// Offset to push n bytes (n: 1-75).
pub const OP_PUSH: u8 = 0;

/// Next byte is push length (up to 255 bytes).
pub const OP_PUSHDATA1: u8 = 76;
/// Next two bytes are push length (up to 65535 bytes).
pub const OP_PUSHDATA2: u8 = 77;
/// Next four bytes are push length (up to 4GB).
pub const OP_PUSHDATA4: u8 = 78;

/// Pushes -1 onto the stack.
pub const OP_1NEGATE: u8 = 79;

/// Pushes 1 (true) onto the stack.
pub const OP_1: u8 = 81;
/// Alias of [`OP_1`].
pub const OP_TRUE: u8 = 81;

// Numeric constants (2-16)
/// Pushes 2 onto the stack.
pub const OP_2: u8 = 82;
/// Pushes 3 onto the stack.
pub const OP_3: u8 = 83;
/// Pushes 4 onto the stack.
pub const OP_4: u8 = 84;
/// Pushes 5 onto the stack.
pub const OP_5: u8 = 85;
/// Pushes 6 onto the stack.
pub const OP_6: u8 = 86;
/// Pushes 7 onto the stack.
pub const OP_7: u8 = 87;
/// Pushes 8 onto the stack.
pub const OP_8: u8 = 88;
/// Pushes 9 onto the stack.
pub const OP_9: u8 = 89;
/// Pushes 10 onto the stack.
pub const OP_10: u8 = 90;
/// Pushes 11 onto the stack.
pub const OP_11: u8 = 91;
/// Pushes 12 onto the stack.
pub const OP_12: u8 = 92;
/// Pushes 13 onto the stack.
pub const OP_13: u8 = 93;
/// Pushes 14 onto the stack.
pub const OP_14: u8 = 94;
/// Pushes 15 onto the stack.
pub const OP_15: u8 = 95;
/// Pushes 16 onto the stack.
pub const OP_16: u8 = 96;

// Flow Control
/// Does nothing.
pub const OP_NOP: u8 = 97;
/// If top stack is true, execute block (pops bool).
pub const OP_IF: u8 = 99;
/// If top stack is false, execute block (pops bool).
pub const OP_NOTIF: u8 = 100;
/// Inverts preceding IF/NOTIF execution.
pub const OP_ELSE: u8 = 103;
/// Ends IF/ELSE block.
pub const OP_ENDIF: u8 = 104;
/// Fails if top stack false (pops bool).
pub const OP_VERIFY: u8 = 105;
/// Ends execution, marking the output unspendable.
pub const OP_RETURN: u8 = 106;

// Stack Operations
/// Moves top item to alt stack.
pub const OP_TOALTSTACK: u8 = 107;
/// Moves top alt stack item to main stack.
pub const OP_FROMALTSTACK: u8 = 108;
/// Drops top two items.
pub const OP_2DROP: u8 = 109;
/// Duplicates top two items.
pub const OP_2DUP: u8 = 110;
/// Duplicates top three items.
pub const OP_3DUP: u8 = 111;
/// Copies third and fourth items to the top.
pub const OP_2OVER: u8 = 112;
/// Moves fifth and sixth items to the top.
pub const OP_2ROT: u8 = 113;
/// Swaps the top two pairs.
pub const OP_2SWAP: u8 = 114;
/// Duplicates top if non-zero.
pub const OP_IFDUP: u8 = 115;
/// Pushes stack depth.
pub const OP_DEPTH: u8 = 116;
/// Drops top item.
pub const OP_DROP: u8 = 117;
/// Duplicates top item.
pub const OP_DUP: u8 = 118;
/// Removes second item.
pub const OP_NIP: u8 = 119;
/// Copies second item to the top.
pub const OP_OVER: u8 = 120;
/// Copies nth item to the top.
pub const OP_PICK: u8 = 121;
/// Moves nth item to the top.
pub const OP_ROLL: u8 = 122;
/// Rotates top three items.
pub const OP_ROT: u8 = 123;
/// Swaps top two items.
pub const OP_SWAP: u8 = 124;
/// Copies top item below the second.
pub const OP_TUCK: u8 = 125;

// Data and Comparison
/// Pushes the length of the top item.
pub const OP_SIZE: u8 = 130;
/// Pushes whether the top two items are equal.
pub const OP_EQUAL: u8 = 135;
/// OP_EQUAL then OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 136;

// Arithmetic
/// Adds 1 to the top item.
pub const OP_1ADD: u8 = 139;
/// Subtracts 1 from the top item.
pub const OP_1SUB: u8 = 140;
/// Negates the top item.
pub const OP_NEGATE: u8 = 143;
/// Absolute value of the top item.
pub const OP_ABS: u8 = 144;
/// Top item becomes 1 if zero, else 0.
pub const OP_NOT: u8 = 145;
/// Top item becomes 0 if zero, else 1.
pub const OP_0NOTEQUAL: u8 = 146;
/// Adds top two items.
pub const OP_ADD: u8 = 147;
/// Subtracts top item from second.
pub const OP_SUB: u8 = 148;
/// Boolean and of top two items.
pub const OP_BOOLAND: u8 = 154;
/// Boolean or of top two items.
pub const OP_BOOLOR: u8 = 155;
/// Numeric equality of top two items.
pub const OP_NUMEQUAL: u8 = 156;
/// OP_NUMEQUAL then OP_VERIFY.
pub const OP_NUMEQUALVERIFY: u8 = 157;
/// Numeric inequality of top two items.
pub const OP_NUMNOTEQUAL: u8 = 158;
/// Second item less than top.
pub const OP_LESSTHAN: u8 = 159;
/// Second item greater than top.
pub const OP_GREATERTHAN: u8 = 160;
/// Second item less than or equal to top.
pub const OP_LESSTHANOREQUAL: u8 = 161;
/// Second item greater than or equal to top.
pub const OP_GREATERTHANOREQUAL: u8 = 162;
/// Smaller of top two items.
pub const OP_MIN: u8 = 163;
/// Larger of top two items.
pub const OP_MAX: u8 = 164;
/// Whether third item is within [second, top).
pub const OP_WITHIN: u8 = 165;

// Cryptography
/// RIPEMD160 of top item.
pub const OP_RIPEMD160: u8 = 166;
/// SHA1 of top item.
pub const OP_SHA1: u8 = 167;
/// SHA256 of top item.
pub const OP_SHA256: u8 = 168;
/// SHA256 then RIPEMD160 of top item.
pub const OP_HASH160: u8 = 169;
/// Double SHA256 of top item.
pub const OP_HASH256: u8 = 170;
/// Marks the start of signed script data.
pub const OP_CODESEPARATOR: u8 = 171;
/// Checks a transaction signature.
pub const OP_CHECKSIG: u8 = 172;
/// OP_CHECKSIG then OP_VERIFY.
pub const OP_CHECKSIGVERIFY: u8 = 173;
/// Checks m-of-n transaction signatures.
pub const OP_CHECKMULTISIG: u8 = 174;
/// OP_CHECKMULTISIG then OP_VERIFY.
pub const OP_CHECKMULTISIGVERIFY: u8 = 175;

// Locktime
/// Originally OP_NOP2; now checks an absolute locktime (BIP-65).
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 177;
/// Originally OP_NOP3; now checks a relative locktime (BIP-112).
pub const OP_CHECKSEQUENCEVERIFY: u8 = 178;

/// Returns the name of a known opcode, or None for push lengths and
/// undefined bytes.
#[must_use]
pub fn name(op: u8) -> Option<&'static str> {
    let n = match op {
        OP_0 => "OP_0",
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
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
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
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
        OP_SIZE => "OP_SIZE",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_0NOTEQUAL => "OP_0NOTEQUAL",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
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
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_CHECKSEQUENCEVERIFY => "OP_CHECKSEQUENCEVERIFY",
        _ => return None,
    };
    Some(n)
}

/// Whether the byte names an opcode in the fixed table (push lengths are
/// not opcodes).
#[must_use]
#[inline]
pub fn is_defined(op: u8) -> bool {
    name(op).is_some()
}

/// Gets the next operation index in a raw script, or the script length if
/// at the end.
#[must_use]
pub fn next_op(i: usize, script: &[u8]) -> usize {
    if i >= script.len() {
        return script.len();
    }
    let op = script[i];
    match op {
        len @ 1..=75 => i + 1 + len as usize,
        OP_PUSHDATA1 => {
            if i + 2 > script.len() {
                script.len()
            } else {
                i + 2 + script[i + 1] as usize
            }
        }
        OP_PUSHDATA2 => {
            if i + 3 > script.len() {
                script.len()
            } else {
                i + 3 + u16::from_le_bytes([script[i + 1], script[i + 2]]) as usize
            }
        }
        OP_PUSHDATA4 => {
            if i + 5 > script.len() {
                script.len()
            } else {
                i + 5 + u32::from_le_bytes([script[i + 1], script[i + 2], script[i + 3], script[i + 4]]) as usize
            }
        }
        _ => i + 1,
    }
}
