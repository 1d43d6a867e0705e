//! 160-bit hash used for public key and script hashes.

use bitcoin_hashes::{hash160 as bh_hash160, Hash};
use std::fmt;

/// 160-bit hash of a public key or script (SHA256 then RIPEMD160).
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash160(pub [u8; 20]);

/// Hashes a data array with SHA256 and then RIPEMD160.
#[must_use]
#[inline]
pub fn hash160(data: &[u8]) -> Hash160 {
    Hash160(bh_hash160::Hash::hash(data).to_byte_array())
}

impl fmt::Debug for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
