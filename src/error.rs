//! Crate-level error type.
//!
//! This is distinct from [`crate::error_log::ErrorLog`]: this type covers
//! things that stop a program (I/O failure, a malformed intermediate-code
//! stream, a caller misusing the API), while `ErrorLog` accumulates the
//! recoverable syntax errors a parser keeps going after.

use std::fmt;
use std::io;

/// Something that made continuing impossible. Returned through `Result`,
/// never raised via panic — panics in this crate are reserved for
/// programmer-error invariants (see module docs on individual types).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    pub message: String,
}

impl FatalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FatalError {}

/// The crate's top-level error type.
#[derive(Debug)]
pub enum Error {
    /// The underlying byte stream failed.
    Io(io::Error),
    /// An intermediate-code stream held a value it should never hold
    /// (an unknown opcode category in a context that requires one of the
    /// symbol categories, a payload that ran past the end of the stream).
    Malformed { message: String },
    /// A parser's own `ErrorLog` raised a fatal error and aborted parsing.
    Fatal(FatalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Malformed { message } => write!(f, "malformed stream: {message}"),
            Error::Fatal(e) => write!(f, "fatal error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Fatal(e) => Some(e),
            Error::Malformed { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<FatalError> for Error {
    fn from(e: FatalError) -> Self {
        Error::Fatal(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_and_displays() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let err: Error = io_err.into();
        assert!(err.to_string().starts_with("i/o error:"));
    }

    #[test]
    fn fatal_error_wraps_message() {
        let fatal = FatalError::new("unexpected end of stream");
        let err: Error = fatal.into();
        assert_eq!(err.to_string(), "fatal error: unexpected end of stream");
    }
}
