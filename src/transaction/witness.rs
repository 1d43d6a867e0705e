//! Witness stack for a segwit input.

use crate::util::{var_int, Error, Result, Serializable};
use std::io;
use std::io::{Read, Write};

/// The ordered list of byte strings satisfying a segwit input's spending
/// conditions. An empty stack is a valid placeholder for non-segwit
/// inputs inside a segwit transaction.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxWitness(pub Vec<Vec<u8>>);

impl TxWitness {
    /// Creates an empty witness stack.
    #[must_use]
    #[inline]
    pub fn new() -> TxWitness {
        TxWitness(vec![])
    }

    /// Pushes an item onto the stack.
    #[inline]
    pub fn push(&mut self, item: Vec<u8>) {
        self.0.push(item);
    }

    /// Returns the size of the serialized witness in bytes, including the
    /// stack count.
    #[must_use]
    pub fn size(&self) -> usize {
        var_int::size(self.0.len() as u64)
            + self
                .0
                .iter()
                .map(|item| var_int::size(item.len() as u64) + item.len())
                .sum::<usize>()
    }
}

impl Serializable<TxWitness> for TxWitness {
    fn read(reader: &mut dyn Read) -> Result<TxWitness> {
        let count = var_int::read(reader)? as usize;
        let mut stack = Vec::with_capacity(count);
        for _ in 0..count {
            let len = var_int::read(reader)? as usize;
            let mut item = vec![0; len];
            reader.read_exact(&mut item).map_err(Error::IOError)?;
            stack.push(item);
        }
        Ok(TxWitness(stack))
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        var_int::write(self.0.len() as u64, writer)?;
        for item in &self.0 {
            var_int::write(item.len() as u64, writer)?;
            writer.write_all(item)?;
        }
        Ok(())
    }
}
