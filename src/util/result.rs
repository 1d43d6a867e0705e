//! Standard error and result types for the library.
use hex::FromHexError;
use std::io;

/// Standard error type used in the library
#[derive(Debug)]
pub enum Error {
    /// An argument provided is invalid
    BadArgument(String),
    /// The data given is not valid
    BadData(String),
    /// Hex string could not be decoded
    FromHexError(FromHexError),
    /// An internal consistency check failed; a logic bug or a probabilistic
    /// failure that should never occur in practice
    IllegalState(String),
    /// Standard library IO error
    IOError(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadArgument(s) => write!(f, "Bad argument: {}", s),
            Error::BadData(s) => write!(f, "Bad data: {}", s),
            Error::FromHexError(e) => write!(f, "Hex decoding error: {}", e),
            Error::IllegalState(s) => write!(f, "Illegal state: {}", s),
            Error::IOError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FromHexError(e) => Some(e),
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IOError(e)
    }
}

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;
