//! Elliptic-curve primitives over secp256k1: curve arithmetic,
//! deterministic ECDSA (RFC 6979), BIP-340 Schnorr and taproot tweaking.

pub mod curve;
pub mod ecdsa;
pub mod rfc6979;
pub mod schnorr;
pub mod taproot;

pub use self::curve::{is_point, is_valid_private_key, Point};
pub use self::taproot::ScriptTree;
