//! Miscellaneous helpers: hashes, varints, serialization, errors.

pub mod var_int;

mod hash160;
mod hash256;
mod result;
mod serdes;

pub use self::hash160::{hash160, Hash160};
pub use self::hash256::{sha256, sha256d, tagged_hash, Hash256};
pub use self::result::{Error, Result};
pub use self::serdes::Serializable;
