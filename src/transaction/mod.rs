//! Transaction model: inputs, outputs, witnesses, serialization and the
//! sighash engine.

pub mod fee;
pub mod sighash;

mod control_block;
mod out_point;
mod sequence;
mod tx;
mod tx_in;
mod tx_out;
mod witness;

pub use self::control_block::ControlBlock;
pub use self::out_point::OutPoint;
pub use self::sequence::{
    Sequence, ABSOLUTE_TIMELOCK_SEQUENCE, REPLACE_BY_FEE_SEQUENCE,
};
pub use self::tx::{Tx, DEFAULT_VERSION};
pub use self::tx_in::{TxIn, DEFAULT_SEQUENCE};
pub use self::tx_out::{TxOut, MAX_SATOSHIS};
pub use self::witness::TxWitness;
