//! Transaction input.

use crate::script::Script;
use crate::transaction::out_point::OutPoint;
use crate::util::{var_int, Error, Result, Serializable};
use std::io;
use std::io::{Read, Write};

/// Default input sequence: final, no timelock semantics.
pub const DEFAULT_SEQUENCE: u32 = 0xffffffff;

/// Transaction input.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxIn {
    /// The previous output being spent.
    pub prev_output: OutPoint,
    /// Script satisfying the locking conditions; empty for segwit inputs
    /// until the witness is finalized.
    pub unlock_script: Script,
    /// The input sequence (timelocks, RBF).
    pub sequence: u32,
}

impl TxIn {
    /// Creates an input spending the given outpoint with an empty unlock
    /// script and the default sequence.
    #[must_use]
    pub fn new(prev_output: OutPoint) -> TxIn {
        TxIn {
            prev_output,
            unlock_script: Script::new(),
            sequence: DEFAULT_SEQUENCE,
        }
    }

    /// Returns the size of the serialized input in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        let script_len = self.unlock_script.to_bytes().len();
        OutPoint::SIZE + var_int::size(script_len as u64) + script_len + 4
    }
}

impl Serializable<TxIn> for TxIn {
    fn read(reader: &mut dyn Read) -> Result<TxIn> {
        let prev_output = OutPoint::read(reader)?;
        let script_len = var_int::read(reader)? as usize;
        let mut script_bytes = vec![0; script_len];
        reader.read_exact(&mut script_bytes).map_err(Error::IOError)?;
        let mut sequence = [0u8; 4];
        reader.read_exact(&mut sequence).map_err(Error::IOError)?;
        let sequence = u32::from_le_bytes(sequence);
        Ok(TxIn {
            prev_output,
            unlock_script: Script::from_bytes(&script_bytes, false),
            sequence,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.prev_output.write(writer)?;
        let script_bytes = self.unlock_script.to_bytes();
        var_int::write(script_bytes.len() as u64, writer)?;
        writer.write_all(&script_bytes)?;
        writer.write_all(&self.sequence.to_le_bytes())?;
        Ok(())
    }
}
