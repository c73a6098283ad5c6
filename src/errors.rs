//! Errors the caller cannot recover from.
//!
//! Recoverable parse problems (a malformed tag, an overflowed buffer, an
//! unresolved namespace alias) are not represented here — they are
//! [`crate::diagnostics::Diagnostic`]s, printed and counted while parsing
//! continues. `Error` covers the smaller set of conditions that stop a
//! document dead: the input couldn't be opened, or the reader hit a state
//! it refuses to trust any further.

use std::fmt;
use std::io;

/// The result type returned by fallible, non-parsing operations (opening a
/// file, constructing a [`crate::reader::Reader`]).
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Propagated from the underlying byte source.
    Io(io::Error),
    /// The interner could not intern the bootstrap `xmlns` token (or any
    /// other sentinel token a component requires before parsing can start).
    InternerExhausted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InternerExhausted => {
                write!(f, "interner exhausted while interning a bootstrap token")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::InternerExhausted => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
