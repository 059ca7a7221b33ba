use std::error;
use std::fmt;

use crate::parser::Position;

/// An error that occurs when a dialect cannot be used.
///
/// This is returned when constructing a `Parser` or `Serializer` from an
/// invalid `Dialect`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArgumentError {
    /// No field separator was configured.
    NoSeparators,
    /// A field separator is `\n` or `\r`, which are reserved as record
    /// terminators.
    NewlineSeparator(char),
    /// The encloser is `\n` or `\r`.
    NewlineEncloser(char),
    /// The encloser is also configured as a field separator.
    EncloserIsSeparator(char),
    /// The record terminator to write is something other than `\n` or `\r`.
    InvalidTerminator(char),
}

impl error::Error for ArgumentError {}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ArgumentError::NoSeparators => {
                write!(f, "dialect error: at least one separator is required")
            }
            ArgumentError::NewlineSeparator(c) => write!(
                f,
                "dialect error: {:?} cannot be a separator since it \
                 terminates records",
                c
            ),
            ArgumentError::NewlineEncloser(c) => write!(
                f,
                "dialect error: {:?} cannot be an encloser since it \
                 terminates records",
                c
            ),
            ArgumentError::EncloserIsSeparator(c) => write!(
                f,
                "dialect error: {:?} cannot be both a separator and \
                 the encloser",
                c
            ),
            ArgumentError::InvalidTerminator(c) => write!(
                f,
                "dialect error: {:?} is not a valid record terminator \
                 (expected '\\n' or '\\r')",
                c
            ),
        }
    }
}

/// A structural violation found while parsing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StructuralError {
    /// The encloser appeared after the field already had content.
    EncloserMidField,
    /// Something other than a separator, record terminator or the end of
    /// input followed a closing encloser.
    ContentAfterQuote {
        /// The character found after the closing encloser.
        found: char,
    },
}

/// The kind of a parse error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// A control character that is not allowed by the dialect.
    InvalidCharacter {
        /// The offending character.
        found: char,
        /// Whether it was found inside a quoted span.
        quoted: bool,
    },
    /// The input ended inside a quoted span.
    UnterminatedQuote {
        /// The position of the opening encloser.
        opened: Position,
    },
    /// The input is not shaped the way the dialect requires.
    Structural(StructuralError),
}

/// An error that occurs when parsing input that is not valid under the
/// configured dialect.
///
/// Parse errors are terminal: no partial table is produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    pos: Position,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, pos: Position) -> ParseError {
        ParseError { kind, pos }
    }

    /// The kind of this error.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// The position at which the error was detected.
    ///
    /// For an unterminated quote, this is the end of the input. The position
    /// of the opening encloser is available on the error kind.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Returns true if this is an `InvalidCharacter` error.
    pub fn is_invalid_character(&self) -> bool {
        match self.kind {
            ParseErrorKind::InvalidCharacter { .. } => true,
            _ => false,
        }
    }

    /// Returns true if this is an `UnterminatedQuote` error.
    pub fn is_unterminated_quote(&self) -> bool {
        match self.kind {
            ParseErrorKind::UnterminatedQuote { .. } => true,
            _ => false,
        }
    }

    /// Returns true if this is a structural error.
    pub fn is_structural(&self) -> bool {
        match self.kind {
            ParseErrorKind::Structural(_) => true,
            _ => false,
        }
    }
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "record {} (byte {}, line {}): ",
            self.pos.record(),
            self.pos.byte(),
            self.pos.line()
        )?;
        match self.kind {
            ParseErrorKind::InvalidCharacter { found, quoted: false } => {
                write!(f, "invalid character {:?}", found)
            }
            ParseErrorKind::InvalidCharacter { found, quoted: true } => {
                write!(f, "invalid character {:?} in quoted value", found)
            }
            ParseErrorKind::UnterminatedQuote { ref opened } => write!(
                f,
                "quoted value opened at byte {} (line {}) is never closed",
                opened.byte(),
                opened.line()
            ),
            ParseErrorKind::Structural(StructuralError::EncloserMidField) => {
                write!(f, "encloser found mid-field")
            }
            ParseErrorKind::Structural(StructuralError::ContentAfterQuote {
                found,
            }) => write!(f, "content {:?} after closing quote", found),
        }
    }
}

/// An error that occurs when a table cannot be written under the configured
/// dialect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SerializeError {
    /// A value needs quoting, but no encloser is configured.
    CannotRepresentValue {
        /// The index of the record containing the value.
        record: u64,
        /// The index of the field within that record.
        field: u64,
        /// The value itself.
        value: String,
    },
    /// A record without any fields was found.
    EmptyRecord {
        /// The index of the empty record.
        record: u64,
    },
    /// The sink refused a write.
    Sink,
}

impl From<fmt::Error> for SerializeError {
    fn from(_: fmt::Error) -> SerializeError {
        SerializeError::Sink
    }
}

impl error::Error for SerializeError {}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SerializeError::CannotRepresentValue {
                record,
                field,
                ref value,
            } => write!(
                f,
                "record {} (field {}): value {:?} requires quoting, \
                 but no encloser is configured",
                record, field, value
            ),
            SerializeError::EmptyRecord { record } => {
                write!(f, "record {}: records must have at least one field", record)
            }
            SerializeError::Sink => write!(f, "the output sink failed"),
        }
    }
}
