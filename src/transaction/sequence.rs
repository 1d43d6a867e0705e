//! Typed input-sequence values for RBF and timelocks.

use crate::util::{Error, Result};

/// Sequence value opting in to absolute locktime enforcement (BIP-65).
pub const ABSOLUTE_TIMELOCK_SEQUENCE: u32 = 0xfffffffe;
/// Sequence value signalling replace-by-fee (BIP-125).
pub const REPLACE_BY_FEE_SEQUENCE: u32 = 0x00000001;

// BIP-68: bit 22 selects 512-second units over block heights.
const TIME_UNIT_FLAG: u32 = 1 << 22;

/// A typed input sequence, replacing raw magic values at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    /// Opt in to OP_CHECKLOCKTIMEVERIFY-style absolute locktimes.
    AbsoluteTimelock,
    /// Signal replace-by-fee.
    ReplaceByFee,
    /// Relative timelock in blocks (BIP-68).
    RelativeBlocks(u16),
    /// Relative timelock in 512-second increments (BIP-68).
    RelativeTime(u16),
}

impl Sequence {
    /// The raw sequence value to place in a transaction input.
    ///
    /// # Errors
    /// `Error::BadArgument` for a relative value outside 1..=0xffff.
    pub fn for_input(&self) -> Result<u32> {
        match self {
            Sequence::AbsoluteTimelock => Ok(ABSOLUTE_TIMELOCK_SEQUENCE),
            Sequence::ReplaceByFee => Ok(REPLACE_BY_FEE_SEQUENCE),
            Sequence::RelativeBlocks(value) => {
                check_relative(*value)?;
                Ok(u32::from(*value))
            }
            Sequence::RelativeTime(value) => {
                check_relative(*value)?;
                Ok(u32::from(*value) | TIME_UNIT_FLAG)
            }
        }
    }

    /// The integer to push in a script for OP_CHECKSEQUENCEVERIFY.
    ///
    /// # Errors
    /// `Error::BadArgument` for RBF (not a script value) or an
    /// out-of-range relative value.
    pub fn for_script(&self) -> Result<u32> {
        match self {
            Sequence::ReplaceByFee => {
                Err(Error::BadArgument("RBF is not to be included in a script".to_string()))
            }
            Sequence::AbsoluteTimelock => Ok(ABSOLUTE_TIMELOCK_SEQUENCE),
            Sequence::RelativeBlocks(value) => {
                check_relative(*value)?;
                Ok(u32::from(*value))
            }
            Sequence::RelativeTime(value) => {
                check_relative(*value)?;
                Ok(u32::from(*value) | TIME_UNIT_FLAG)
            }
        }
    }
}

fn check_relative(value: u16) -> Result<()> {
    if value < 1 {
        return Err(Error::BadArgument("Sequence should be between 1 and 65535".to_string()));
    }
    Ok(())
}
