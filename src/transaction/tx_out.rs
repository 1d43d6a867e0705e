//! Transaction output.

use crate::script::Script;
use crate::util::{var_int, Error, Result, Serializable};
use std::io;
use std::io::{Read, Write};

/// Maximum number of satoshis possible (21M BTC).
pub const MAX_SATOSHIS: i64 = 21_000_000 * 100_000_000;

/// Transaction output.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxOut {
    /// Number of satoshis locked by this output. `-1` is reserved for the
    /// SIGHASH_SINGLE placeholder outputs hashed by the legacy digest.
    pub satoshis: i64,
    /// The script locking this amount.
    pub lock_script: Script,
}

impl TxOut {
    /// Creates an output paying the given amount to a locking script.
    #[must_use]
    pub fn new(satoshis: i64, lock_script: Script) -> TxOut {
        TxOut { satoshis, lock_script }
    }

    /// Returns the size of the serialized output in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        let script_len = self.lock_script.to_bytes().len();
        8 + var_int::size(script_len as u64) + script_len
    }

    /// Validates the output for inclusion in a transaction.
    ///
    /// # Errors
    /// `Error::BadData` for a negative amount or one above the coin cap.
    pub fn validate(&self) -> Result<()> {
        if self.satoshis < 0 {
            return Err(Error::BadData("Negative satoshis".to_string()));
        }
        if self.satoshis > MAX_SATOSHIS {
            return Err(Error::BadData("Satoshis exceeds max".to_string()));
        }
        Ok(())
    }
}

impl Serializable<TxOut> for TxOut {
    fn read(reader: &mut dyn Read) -> Result<TxOut> {
        let mut satoshis = [0u8; 8];
        reader.read_exact(&mut satoshis).map_err(Error::IOError)?;
        let satoshis = i64::from_le_bytes(satoshis);
        let script_len = var_int::read(reader)? as usize;
        let mut script_bytes = vec![0; script_len];
        reader.read_exact(&mut script_bytes).map_err(Error::IOError)?;
        Ok(TxOut {
            satoshis,
            lock_script: Script::from_bytes(&script_bytes, false),
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&self.satoshis.to_le_bytes())?;
        let script_bytes = self.lock_script.to_bytes();
        var_int::write(script_bytes.len() as u64, writer)?;
        writer.write_all(&script_bytes)?;
        Ok(())
    }
}
