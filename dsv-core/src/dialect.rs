use crate::error::ArgumentError;

/// A record terminator to use when writing.
///
/// Parsing always treats `\r` and `\n` as record terminators, regardless of
/// this setting. A written terminator must therefore be built from those two
/// characters, otherwise the output could not be read back.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminator {
    /// Writes `\r\n` as the record terminator.
    CRLF,
    /// Writes the character given as the record terminator.
    Any(char),
}

impl Default for Terminator {
    fn default() -> Terminator {
        Terminator::Any('\n')
    }
}

/// Returns true if `c` is one of the characters that always ends a record.
#[inline]
pub(crate) fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// The configuration of a delimiter-separated dialect.
///
/// A dialect is shared by the parser and the serializer. The parser splits
/// fields on *any* of the configured separators, while the serializer only
/// ever emits the first one (the primary separator).
///
/// The default dialect is RFC 4180 style CSV: fields are separated by `,`,
/// values may be enclosed in `"`, and records are written with `\n`.
///
/// # Example
///
/// ```
/// use dsv_core::Dialect;
///
/// let mut dialect = Dialect::new();
/// dialect.separators(&[';', '\t']).encloser(Some('\''));
/// assert!(dialect.validate().is_ok());
/// assert_eq!(dialect.primary_separator(), Some(';'));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Dialect {
    separators: Vec<char>,
    encloser: Option<char>,
    terminator: Terminator,
}

impl Default for Dialect {
    fn default() -> Dialect {
        Dialect {
            separators: vec![','],
            encloser: Some('"'),
            terminator: Terminator::default(),
        }
    }
}

impl Dialect {
    /// Create a new dialect with the default configuration.
    pub fn new() -> Dialect {
        Dialect::default()
    }

    /// Use a single field separator.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut Dialect {
        self.separators.clear();
        self.separators.push(separator);
        self
    }

    /// Use a set of field separators.
    ///
    /// Any of the given characters ends a field while parsing. Duplicates
    /// are ignored and the order is kept; the first separator is the one
    /// the serializer writes.
    pub fn separators(&mut self, separators: &[char]) -> &mut Dialect {
        self.separators.clear();
        for &c in separators {
            if !self.separators.contains(&c) {
                self.separators.push(c);
            }
        }
        self
    }

    /// The character that encloses (quotes) a value.
    ///
    /// When `None`, quoting is disabled: the parser never enters a quoted
    /// span and the serializer refuses values that would need one.
    ///
    /// The default is `Some('"')`.
    pub fn encloser(&mut self, encloser: Option<char>) -> &mut Dialect {
        self.encloser = encloser;
        self
    }

    /// The record terminator written by the serializer.
    ///
    /// The default is `Terminator::Any('\n')`.
    pub fn terminator(&mut self, term: Terminator) -> &mut Dialect {
        self.terminator = term;
        self
    }

    /// Check that this dialect can be used for parsing and serializing.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.separators.is_empty() {
            return Err(ArgumentError::NoSeparators);
        }
        if let Some(&c) = self.separators.iter().find(|&&c| is_newline(c)) {
            return Err(ArgumentError::NewlineSeparator(c));
        }
        if let Some(q) = self.encloser {
            if is_newline(q) {
                return Err(ArgumentError::NewlineEncloser(q));
            }
            if self.separators.contains(&q) {
                return Err(ArgumentError::EncloserIsSeparator(q));
            }
        }
        match self.terminator {
            Terminator::CRLF => Ok(()),
            Terminator::Any(c) if is_newline(c) => Ok(()),
            Terminator::Any(c) => Err(ArgumentError::InvalidTerminator(c)),
        }
    }

    /// Returns all field separators, in the order they were configured.
    pub fn get_separators(&self) -> &[char] {
        &self.separators
    }

    /// Returns the separator written between fields.
    ///
    /// This is `None` only for a dialect that fails validation.
    pub fn primary_separator(&self) -> Option<char> {
        self.separators.first().copied()
    }

    /// Returns the encloser, if quoting is enabled.
    pub fn get_encloser(&self) -> Option<char> {
        self.encloser
    }

    /// Returns the record terminator used when writing.
    pub fn get_terminator(&self) -> Terminator {
        self.terminator
    }

    #[inline]
    pub(crate) fn is_separator(&self, c: char) -> bool {
        self.separators.contains(&c)
    }
}
