//! Bitcoin script serialization, parsing and output-template matching.
//!
//! A [`Script`] is an ordered list of opcodes and data pushes. This module
//! encodes the list to consensus bytes using minimal push forms (BIP-62),
//! parses raw bytes back into elements, and recognizes the standard
//! locking-script templates. Script execution is out of scope.

use crate::util::{hash160, sha256, tagged_hash, var_int, Hash160, Hash256, Result};
use std::fmt;

pub mod op_codes;

pub use self::op_codes::{is_defined, name, next_op};
use self::op_codes::{
    OP_0, OP_1, OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160, OP_PUSHDATA1,
    OP_PUSHDATA2, OP_PUSHDATA4,
};

/// Leaf version byte for tapscript leaves (BIP-341).
pub const LEAF_VERSION_TAPSCRIPT: u8 = 0xc0;

/// A single script token: an opcode, a data push, or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptElement {
    /// A named opcode from the fixed table in [`op_codes`].
    Op(u8),
    /// A byte-string push, encoded with the shortest valid push form.
    Data(Vec<u8>),
    /// A non-negative integer; 0-16 encode via OP_0..OP_16, larger values
    /// as minimal little-endian bytes with a sign byte when the top bit
    /// is set.
    Num(u32),
}

/// Standard locking-script templates recognized by [`Script::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptTemplate {
    /// Pay to public key hash.
    P2pkh,
    /// Pay to script hash.
    P2sh,
    /// Pay to witness public key hash (segwit v0).
    P2wpkh,
    /// Pay to witness script hash (segwit v0).
    P2wsh,
    /// Pay to public key.
    P2pk,
    /// Pay to taproot (segwit v1).
    P2tr,
    /// No recognized template.
    Unknown,
}

/// An ordered sequence of script elements.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Script(pub Vec<ScriptElement>);

impl Script {
    /// Creates an empty script.
    #[must_use]
    #[inline]
    pub fn new() -> Script {
        Script(vec![])
    }

    /// Appends an element, preserving insertion order.
    #[inline]
    pub fn append(&mut self, elem: ScriptElement) {
        self.0.push(elem);
    }

    /// Serializes the script to consensus bytes.
    ///
    /// Opcodes map through the fixed table; data uses the shortest valid
    /// push form; numbers 0-16 use their dedicated opcodes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for elem in &self.0 {
            match elem {
                ScriptElement::Op(op) => bytes.push(*op),
                ScriptElement::Data(data) => push_data(data, &mut bytes),
                ScriptElement::Num(n) => push_integer(*n, &mut bytes),
            }
        }
        bytes
    }

    /// Serializes the script to a hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parses raw script bytes into elements.
    ///
    /// With `witness_template` set the pushdata opcodes are kept as bare
    /// opcodes, as inside witness-program templates; otherwise their
    /// length-prefixed payload is consumed. A malformed tail truncates at
    /// the last fully-parseable element rather than failing.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], witness_template: bool) -> Script {
        let mut elements = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if !witness_template && (b == OP_PUSHDATA1 || b == OP_PUSHDATA2 || b == OP_PUSHDATA4) {
                let len_size = match b {
                    OP_PUSHDATA1 => 1,
                    OP_PUSHDATA2 => 2,
                    _ => 4,
                };
                if i + 1 + len_size > bytes.len() {
                    break;
                }
                let mut data_len = 0usize;
                for (k, byte) in bytes[i + 1..i + 1 + len_size].iter().enumerate() {
                    data_len |= (*byte as usize) << (8 * k);
                }
                let start = i + 1 + len_size;
                if start + data_len > bytes.len() {
                    break;
                }
                elements.push(ScriptElement::Data(bytes[start..start + data_len].to_vec()));
                i = start + data_len;
            } else if is_defined(b) {
                elements.push(ScriptElement::Op(b));
                i += 1;
            } else if (1..=75).contains(&b) {
                let start = i + 1;
                let data_len = b as usize;
                if start + data_len > bytes.len() {
                    break;
                }
                elements.push(ScriptElement::Data(bytes[start..start + data_len].to_vec()));
                i = start + data_len;
            } else {
                // Undefined byte: consume as a varint-prefixed push, the
                // same way witness stack items are length-prefixed.
                let (data_len, prefix) = match b {
                    0xfd => {
                        if i + 3 > bytes.len() {
                            break;
                        }
                        (u16::from_le_bytes([bytes[i + 1], bytes[i + 2]]) as usize, 3)
                    }
                    0xfe => {
                        if i + 5 > bytes.len() {
                            break;
                        }
                        (
                            u32::from_le_bytes([bytes[i + 1], bytes[i + 2], bytes[i + 3], bytes[i + 4]])
                                as usize,
                            5,
                        )
                    }
                    0xff => {
                        if i + 9 > bytes.len() {
                            break;
                        }
                        let mut len_bytes = [0u8; 8];
                        len_bytes.copy_from_slice(&bytes[i + 1..i + 9]);
                        (u64::from_le_bytes(len_bytes) as usize, 9)
                    }
                    _ => (b as usize, 1),
                };
                let start = i + prefix;
                if start + data_len > bytes.len() {
                    break;
                }
                elements.push(ScriptElement::Data(bytes[start..start + data_len].to_vec()));
                i = start + data_len;
            }
        }
        Script(elements)
    }

    /// Parses a hex string into a script.
    ///
    /// # Errors
    /// `Error::FromHexError` for invalid hex.
    pub fn from_hex(s: &str, witness_template: bool) -> Result<Script> {
        let bytes = hex::decode(s)?;
        Ok(Script::from_bytes(&bytes, witness_template))
    }

    /// Recognizes the standard locking-script template of this script.
    #[must_use]
    pub fn classify(&self) -> ScriptTemplate {
        use ScriptElement::{Data, Op};
        match self.0.as_slice() {
            [Op(OP_DUP), Op(OP_HASH160), Data(h), Op(OP_EQUALVERIFY), Op(OP_CHECKSIG)]
                if h.len() == 20 =>
            {
                ScriptTemplate::P2pkh
            }
            [Op(OP_HASH160), Data(h), Op(OP_EQUAL)] if h.len() == 20 => ScriptTemplate::P2sh,
            [Op(OP_0), Data(p)] if p.len() == 20 => ScriptTemplate::P2wpkh,
            [Op(OP_0), Data(p)] if p.len() == 32 => ScriptTemplate::P2wsh,
            [Op(OP_1), Data(p)] if p.len() == 32 => ScriptTemplate::P2tr,
            [Data(k), Op(OP_CHECKSIG)] if k.len() == 33 || k.len() == 65 => ScriptTemplate::P2pk,
            _ => ScriptTemplate::Unknown,
        }
    }

    /// Builds the P2SH locking script committing to this script
    /// (HASH160 of the serialized bytes).
    #[must_use]
    pub fn to_p2sh_lock_script(&self) -> Script {
        let h160 = hash160(&self.to_bytes());
        p2sh_lock_script(&h160)
    }

    /// Builds the P2WSH locking script committing to this script
    /// (single SHA256 witness program).
    #[must_use]
    pub fn to_p2wsh_lock_script(&self) -> Script {
        let program = sha256(&self.to_bytes());
        Script(vec![ScriptElement::Op(OP_0), ScriptElement::Data(program.0.to_vec())])
    }

    /// Computes the BIP-341 tapleaf hash: leaf version, varint-prefixed
    /// script bytes, tagged "TapLeaf".
    #[must_use]
    pub fn tapleaf_hash(&self) -> Hash256 {
        let mut buf = vec![LEAF_VERSION_TAPSCRIPT];
        buf.extend_from_slice(&var_int::prepend(&self.to_bytes()));
        tagged_hash("TapLeaf", &buf)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut parts = Vec::with_capacity(self.0.len());
        for elem in &self.0 {
            match elem {
                ScriptElement::Op(op) => match name(*op) {
                    Some(n) => parts.push(n.to_string()),
                    None => parts.push(format!("OP_UNKNOWN({})", op)),
                },
                ScriptElement::Data(data) => parts.push(hex::encode(data)),
                ScriptElement::Num(n) => parts.push(n.to_string()),
            }
        }
        write!(f, "Script[{}]", parts.join(" "))
    }
}

/// Creates the P2PKH locking script for a public key hash
/// (DUP HASH160 [hash] EQUALVERIFY CHECKSIG).
#[must_use]
pub fn p2pkh_lock_script(hash: &Hash160) -> Script {
    Script(vec![
        ScriptElement::Op(OP_DUP),
        ScriptElement::Op(OP_HASH160),
        ScriptElement::Data(hash.0.to_vec()),
        ScriptElement::Op(OP_EQUALVERIFY),
        ScriptElement::Op(OP_CHECKSIG),
    ])
}

/// Creates the P2PKH unlocking script (push sig + pubkey).
#[must_use]
pub fn p2pkh_unlock_script(sig: &[u8], public_key: &[u8]) -> Script {
    Script(vec![
        ScriptElement::Data(sig.to_vec()),
        ScriptElement::Data(public_key.to_vec()),
    ])
}

/// Creates the P2PK locking script ([pubkey] CHECKSIG).
#[must_use]
pub fn p2pk_lock_script(public_key: &[u8]) -> Script {
    Script(vec![
        ScriptElement::Data(public_key.to_vec()),
        ScriptElement::Op(OP_CHECKSIG),
    ])
}

/// Creates the P2SH locking script for a script hash
/// (HASH160 [hash] EQUAL).
#[must_use]
pub fn p2sh_lock_script(hash: &Hash160) -> Script {
    Script(vec![
        ScriptElement::Op(OP_HASH160),
        ScriptElement::Data(hash.0.to_vec()),
        ScriptElement::Op(OP_EQUAL),
    ])
}

/// Creates the P2WPKH locking script (version 0 witness program).
#[must_use]
pub fn p2wpkh_lock_script(hash: &Hash160) -> Script {
    Script(vec![ScriptElement::Op(OP_0), ScriptElement::Data(hash.0.to_vec())])
}

/// Creates the P2TR locking script (version 1 witness program) for a
/// tweaked x-only output key.
#[must_use]
pub fn p2tr_lock_script(output_key: &[u8; 32]) -> Script {
    Script(vec![ScriptElement::Op(OP_1), ScriptElement::Data(output_key.to_vec())])
}

// Shortest valid push form per BIP-62.
fn push_data(data: &[u8], out: &mut Vec<u8>) {
    let n = data.len();
    if n < 0x4c {
        out.push(n as u8);
    } else if n < 0x100 {
        out.push(OP_PUSHDATA1);
        out.push(n as u8);
    } else if n < 0x10000 {
        out.push(OP_PUSHDATA2);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else {
        out.push(OP_PUSHDATA4);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    }
    out.extend_from_slice(data);
}

// 0-16 use the dedicated opcodes; larger integers are minimal
// little-endian with a sign byte when the top bit is set.
fn push_integer(n: u32, out: &mut Vec<u8>) {
    if n == 0 {
        out.push(OP_0);
        return;
    }
    if n <= 16 {
        out.push(OP_1 + (n as u8 - 1));
        return;
    }
    let mut bytes = Vec::new();
    let mut v = n;
    while v > 0 {
        bytes.push((v & 0xff) as u8);
        v >>= 8;
    }
    if bytes[bytes.len() - 1] & 0x80 != 0 {
        bytes.push(0x00);
    }
    out.push(bytes.len() as u8);
    out.extend_from_slice(&bytes);
}
