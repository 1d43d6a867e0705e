//! Control block for taproot script-path spends.

use crate::script::LEAF_VERSION_TAPSCRIPT;
use crate::util::Hash256;

/// The script-path proof revealed in a taproot witness: leaf version, the
/// x-only internal public key and the concatenated merkle-path hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBlock {
    /// Tapscript leaf version byte.
    pub leaf_version: u8,
    /// X-only internal public key.
    pub internal_key: [u8; 32],
    /// Sibling hashes from the revealed leaf up to the merkle root.
    pub merkle_path: Vec<Hash256>,
}

impl ControlBlock {
    /// Creates a control block for the default tapscript leaf version.
    #[must_use]
    pub fn new(internal_key: [u8; 32], merkle_path: Vec<Hash256>) -> ControlBlock {
        ControlBlock {
            leaf_version: LEAF_VERSION_TAPSCRIPT,
            internal_key,
            merkle_path,
        }
    }

    /// Serializes the control block for the witness stack.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(33 + 32 * self.merkle_path.len());
        bytes.push(self.leaf_version);
        bytes.extend_from_slice(&self.internal_key);
        for hash in &self.merkle_path {
            bytes.extend_from_slice(&hash.0);
        }
        bytes
    }

    /// Serializes the control block to a hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_path_only() {
        let cb = ControlBlock::new([5; 32], vec![]);
        let bytes = cb.to_bytes();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], LEAF_VERSION_TAPSCRIPT);
        assert_eq!(&bytes[1..], &[5; 32]);
    }

    #[test]
    fn with_merkle_path() {
        let cb = ControlBlock::new([5; 32], vec![Hash256([7; 32]), Hash256([9; 32])]);
        let bytes = cb.to_bytes();
        assert_eq!(bytes.len(), 97);
        assert_eq!(&bytes[33..65], &[7; 32]);
        assert_eq!(&bytes[65..97], &[9; 32]);
    }
}
