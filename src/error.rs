use std::error;
use std::fmt;
use std::io;
use std::result;

use dsv_core::{ArgumentError, ParseError, SerializeError};

/// A type alias for `Result<T, dsv::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when reading or writing delimited data.
///
/// Every error is terminal for the call that returned it: a failed read
/// yields no partial table.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading or writing data.
    Io(io::Error),
    /// The input is not valid UTF-8.
    ///
    /// This is never returned when lossy decoding is enabled.
    Utf8 {
        /// The number of leading bytes that are valid UTF-8.
        valid_up_to: usize,
        /// The length of the invalid sequence, or `None` if the input ended
        /// in the middle of a sequence.
        error_len: Option<usize>,
    },
    /// The configured dialect is invalid.
    Argument(ArgumentError),
    /// The input is not valid under the configured dialect.
    Parse(ParseError),
    /// A table cannot be written under the configured dialect.
    Serialize(SerializeError),
    /// A value could not be converted into a record.
    Serde(String),
}

impl Error {
    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        match *self {
            Error::Io(_) => true,
            _ => false,
        }
    }

    /// Returns the parse error, if this is one.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match *self {
            Error::Parse(ref err) => Some(err),
            _ => None,
        }
    }

    /// Returns the serialize error, if this is one.
    pub fn as_serialize_error(&self) -> Option<&SerializeError> {
        match *self {
            Error::Serialize(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ArgumentError> for Error {
    fn from(err: ArgumentError) -> Error {
        Error::Argument(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Error {
        Error::Serialize(err)
    }
}

impl From<bstr::Utf8Error> for Error {
    fn from(err: bstr::Utf8Error) -> Error {
        Error::Utf8 {
            valid_up_to: err.valid_up_to(),
            error_len: err.error_len(),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Argument(ref err) => Some(err),
            Error::Parse(ref err) => Some(err),
            Error::Serialize(ref err) => Some(err),
            Error::Utf8 { .. } | Error::Serde(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Utf8 { valid_up_to, error_len: Some(len) } => write!(
                f,
                "CSV decode error: invalid UTF-8 sequence of {} bytes \
                 at byte {}",
                len, valid_up_to
            ),
            Error::Utf8 { valid_up_to, error_len: None } => write!(
                f,
                "CSV decode error: incomplete UTF-8 sequence at byte {}",
                valid_up_to
            ),
            Error::Argument(ref err) => write!(f, "CSV {}", err),
            Error::Parse(ref err) => write!(f, "CSV parse error: {}", err),
            Error::Serialize(ref err) => write!(f, "CSV write error: {}", err),
            Error::Serde(ref msg) => write!(f, "CSV serialize error: {}", msg),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Error {
        Error::Serde(msg.to_string())
    }
}
