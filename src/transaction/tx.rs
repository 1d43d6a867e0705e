//! Bitcoin transaction with optional segwit encoding.

use crate::script::Script;
use crate::transaction::tx_in::TxIn;
use crate::transaction::tx_out::{TxOut, MAX_SATOSHIS};
use crate::transaction::witness::TxWitness;
use crate::util::{sha256d, var_int, Error, Hash256, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io;
use std::io::{Read, Write};

/// Default transaction version.
pub const DEFAULT_VERSION: u32 = 2;
/// Segwit serialization marker byte.
const SEGWIT_MARKER: u8 = 0x00;
/// Segwit serialization flag byte.
const SEGWIT_FLAG: u8 = 0x01;

/// Bitcoin transaction.
#[derive(Default, PartialEq, Eq, Hash, Clone)]
pub struct Tx {
    /// Transaction version.
    pub version: u32,
    /// Transaction inputs.
    pub inputs: Vec<TxIn>,
    /// Transaction outputs.
    pub outputs: Vec<TxOut>,
    /// The block number or timestamp at which this transaction is unlocked.
    pub lock_time: u32,
    /// Whether the transaction serializes with the segwit marker and
    /// witness section.
    pub segwit: bool,
    /// Witness stacks aligned by input index. Must match the input count
    /// when `segwit` is set at serialization time.
    pub witnesses: Vec<TxWitness>,
}

impl Tx {
    /// Creates a transaction skeleton with the default version and a zero
    /// locktime.
    #[must_use]
    pub fn new(inputs: Vec<TxIn>, outputs: Vec<TxOut>, segwit: bool) -> Tx {
        Tx {
            version: DEFAULT_VERSION,
            inputs,
            outputs,
            lock_time: 0,
            segwit,
            witnesses: vec![],
        }
    }

    /// Sets the unlock script of the input at the given index, the single
    /// mutation point for writing computed signatures back.
    ///
    /// # Errors
    /// `Error::BadArgument` for an out-of-range index.
    pub fn set_unlock_script(&mut self, index: usize, script: Script) -> Result<()> {
        let input = self
            .inputs
            .get_mut(index)
            .ok_or_else(|| Error::BadArgument(format!("Input index out of range: {}", index)))?;
        input.unlock_script = script;
        Ok(())
    }

    /// Appends a witness stack for the next input.
    #[inline]
    pub fn add_witness(&mut self, witness: TxWitness) {
        self.witnesses.push(witness);
    }

    /// Validates structure: witness alignment and output amounts.
    ///
    /// # Errors
    /// `Error::BadData` on a witness/input count mismatch or an invalid
    /// output amount.
    pub fn validate(&self) -> Result<()> {
        if self.segwit && self.witnesses.len() != self.inputs.len() {
            return Err(Error::BadData(format!(
                "Witness count {} does not match input count {}",
                self.witnesses.len(),
                self.inputs.len()
            )));
        }
        let mut total = 0i64;
        for tx_out in &self.outputs {
            tx_out.validate()?;
            total = total
                .checked_add(tx_out.satoshis)
                .ok_or_else(|| Error::BadData("Total out overflow".to_string()))?;
        }
        if total > MAX_SATOSHIS {
            return Err(Error::BadData("Total out exceeds max satoshis".to_string()));
        }
        Ok(())
    }

    /// Serializes the transaction, with the witness section when
    /// `include_witness` is set and the transaction is segwit.
    ///
    /// # Errors
    /// `Error::BadData` if the witness list is misaligned with the inputs.
    pub fn to_bytes(&self, include_witness: bool) -> Result<Vec<u8>> {
        let with_witness = include_witness && self.segwit;
        if with_witness && self.witnesses.len() != self.inputs.len() {
            return Err(Error::BadData(format!(
                "Witness count {} does not match input count {}",
                self.witnesses.len(),
                self.inputs.len()
            )));
        }
        let mut bytes = Vec::new();
        self.write_serialized(&mut bytes, with_witness)?;
        Ok(bytes)
    }

    /// Serializes the transaction to hex in its native encoding.
    ///
    /// # Errors
    /// `Error::BadData` if the witness list is misaligned with the inputs.
    pub fn to_hex(&self) -> Result<String> {
        Ok(hex::encode(self.to_bytes(true)?))
    }

    /// Parses a transaction from hex, detecting segwit encoding.
    ///
    /// # Errors
    /// `Error::FromHexError` for invalid hex, `Error::BadData` or
    /// `Error::IOError` for malformed or truncated structure.
    pub fn from_hex(s: &str) -> Result<Tx> {
        let bytes = hex::decode(s)?;
        Tx::read(&mut io::Cursor::new(&bytes))
    }

    /// Calculates the transaction id: the double SHA256 of the
    /// witness-stripped serialization, displayed reversed.
    #[must_use]
    pub fn txid(&self) -> Hash256 {
        let mut bytes = Vec::new();
        // Writing to a Vec cannot fail and no witness data is involved
        self.write_serialized(&mut bytes, false).unwrap();
        sha256d(&bytes)
    }

    /// Calculates the witness transaction id: the double SHA256 of the
    /// full serialization.
    ///
    /// # Errors
    /// `Error::BadData` if the witness list is misaligned with the inputs.
    pub fn wtxid(&self) -> Result<Hash256> {
        Ok(sha256d(&self.to_bytes(true)?))
    }

    /// The byte length of the witness-inclusive serialization.
    ///
    /// # Errors
    /// `Error::BadData` if the witness list is misaligned with the inputs.
    pub fn size(&self) -> Result<usize> {
        Ok(self.to_bytes(true)?.len())
    }

    /// The virtual size: marker, flag and witness bytes are discounted to
    /// a quarter weight, rounded up.
    ///
    /// # Errors
    /// `Error::BadData` if the witness list is misaligned with the inputs.
    pub fn virtual_size(&self) -> Result<u64> {
        let size = self.size()? as u64;
        if !self.segwit {
            return Ok(size);
        }
        let witness_bytes = 2 + self.witnesses.iter().map(|w| w.size() as u64).sum::<u64>();
        Ok(size - witness_bytes + (witness_bytes + 3) / 4)
    }

    fn write_serialized(&self, writer: &mut dyn Write, with_witness: bool) -> io::Result<()> {
        writer.write_all(&self.version.to_le_bytes())?;
        if with_witness {
            writer.write_all(&[SEGWIT_MARKER, SEGWIT_FLAG])?;
        }
        var_int::write(self.inputs.len() as u64, writer)?;
        for tx_in in &self.inputs {
            tx_in.write(writer)?;
        }
        var_int::write(self.outputs.len() as u64, writer)?;
        for tx_out in &self.outputs {
            tx_out.write(writer)?;
        }
        if with_witness {
            for witness in &self.witnesses {
                witness.write(writer)?;
            }
        }
        writer.write_all(&self.lock_time.to_le_bytes())?;
        Ok(())
    }
}

impl Serializable<Tx> for Tx {
    fn read(reader: &mut dyn Read) -> Result<Tx> {
        let version = reader.read_u32::<LittleEndian>().map_err(Error::IOError)?;
        let mut first = reader.read_u8().map_err(Error::IOError)?;
        let segwit = first == SEGWIT_MARKER;
        if segwit {
            let flag = reader.read_u8().map_err(Error::IOError)?;
            if flag != SEGWIT_FLAG {
                return Err(Error::BadData(format!("Invalid segwit flag: {}", flag)));
            }
            first = reader.read_u8().map_err(Error::IOError)?;
        }
        let n_inputs = read_var_int_tail(first, reader)?;
        let mut inputs = Vec::with_capacity(n_inputs as usize);
        for _ in 0..n_inputs {
            inputs.push(TxIn::read(reader)?);
        }
        let n_outputs = var_int::read(reader).map_err(Error::IOError)?;
        let mut outputs = Vec::with_capacity(n_outputs as usize);
        for _ in 0..n_outputs {
            outputs.push(TxOut::read(reader)?);
        }
        let mut witnesses = Vec::new();
        if segwit {
            for _ in 0..n_inputs {
                witnesses.push(TxWitness::read(reader)?);
            }
        }
        let lock_time = reader.read_u32::<LittleEndian>().map_err(Error::IOError)?;
        Ok(Tx {
            version,
            inputs,
            outputs,
            lock_time,
            segwit,
            witnesses,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        if self.segwit && self.witnesses.len() != self.inputs.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Witness count does not match input count",
            ));
        }
        self.write_serialized(writer, self.segwit)
    }
}

// Completes a varint whose first byte has already been consumed.
fn read_var_int_tail(first: u8, reader: &mut dyn Read) -> Result<u64> {
    let n = match first {
        0xff => reader.read_u64::<LittleEndian>().map_err(Error::IOError)?,
        0xfe => u64::from(reader.read_u32::<LittleEndian>().map_err(Error::IOError)?),
        0xfd => u64::from(reader.read_u16::<LittleEndian>().map_err(Error::IOError)?),
        b => u64::from(b),
    };
    Ok(n)
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inputs_str = format!("[<{} inputs>]", self.inputs.len());
        let outputs_str = format!("[<{} outputs>]", self.outputs.len());
        f.debug_struct("Tx")
            .field("version", &self.version)
            .field("inputs", if self.inputs.len() <= 3 { &self.inputs } else { &inputs_str })
            .field("outputs", if self.outputs.len() <= 3 { &self.outputs } else { &outputs_str })
            .field("lock_time", &self.lock_time)
            .field("segwit", &self.segwit)
            .finish()
    }
}
