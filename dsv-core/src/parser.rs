use std::mem;

use crate::dialect::{is_newline, Dialect};
use crate::error::{ArgumentError, ParseError, ParseErrorKind, StructuralError};
use crate::source::Source;
use crate::table::{Record, Table};

/// A position in the input being parsed.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Position {
    byte: u64,
    line: u64,
    record: u64,
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl Position {
    /// Returns a position at the start of the input.
    pub fn new() -> Position {
        Position { byte: 0, line: 1, record: 0 }
    }

    /// The byte offset, assuming the input is UTF-8 encoded.
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// The line number, starting at `1`.
    ///
    /// `\n`, `\r` and `\r\n` each count as a single line break.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The index of the record being built, starting at `0`.
    pub fn record(&self) -> u64 {
        self.record
    }
}

/// A parser for delimiter-separated text.
///
/// A parser is built once from a `Dialect` and may then be used any number
/// of times, from any number of threads. Each call to `parse` consumes a
/// complete `Source` and materializes a complete `Table`.
///
/// # Rules
///
/// Outside of a quoted value, each character is classified in order:
///
/// * the encloser starts a quoted value, but only as the first character of
///   a field,
/// * a separator ends the current field,
/// * a printable character or a tab is field content,
/// * `\n` and `\r` end the current record,
/// * anything else is an invalid character.
///
/// Inside a quoted value every character is content, including separators,
/// tabs and line breaks. A doubled encloser is a literal encloser. After the
/// closing encloser, only a separator, a line break or the end of input may
/// follow.
///
/// A line break keeps the current field even when it is empty, as long as
/// it was quoted or follows a separator, so `a,\n` is `["a", ""]` and
/// `""\n` is `[""]`. Blank lines never produce records. Since `\r` and `\n` are independent
/// record terminators, `\r\n` behaves like a record terminator followed by
/// a blank line.
///
/// # Example
///
/// ```
/// use dsv_core::Parser;
///
/// let table = Parser::default()
///     .parse("a,\"b,c\"\r\n\r\nd,e".chars().peekable())
///     .unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table[0].get(1), Some("b,c"));
/// assert_eq!(table[1].get(0), Some("d"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Parser {
    dialect: Dialect,
}

impl Parser {
    /// Create a parser for the given dialect.
    ///
    /// This returns an error if the dialect is invalid.
    pub fn new(dialect: &Dialect) -> Result<Parser, ArgumentError> {
        dialect.validate()?;
        Ok(Parser { dialect: dialect.clone() })
    }

    /// Returns the dialect used by this parser.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Parse all of `source` into a table.
    ///
    /// An empty source produces an empty table. If the input violates the
    /// dialect, the first violation is returned and nothing else.
    pub fn parse<S: Source>(&self, source: S) -> Result<Table, ParseError> {
        Machine::new(&self.dialect, source).run()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// Outside of any quoted span.
    InField,
    /// Inside a quoted span.
    InQuote,
    /// Immediately after the closing encloser of a quoted span.
    JustClosedQuote,
}

/// The state of a single `parse` call.
struct Machine<'d, S> {
    dialect: &'d Dialect,
    encloser: Option<char>,
    src: S,
    state: State,
    /// The position of the next character to read.
    pos: Position,
    /// Where the current quoted span was opened.
    quote_start: Position,
    table: Table,
    record: Record,
    field: String,
    /// Whether the current field was quoted. A quoted field is kept even
    /// when it is empty.
    quoted: bool,
}

impl<'d, S: Source> Machine<'d, S> {
    fn new(dialect: &'d Dialect, src: S) -> Machine<'d, S> {
        Machine {
            dialect,
            encloser: dialect.get_encloser(),
            src,
            state: State::InField,
            pos: Position::new(),
            quote_start: Position::new(),
            table: Table::new(),
            record: Record::new(),
            field: String::new(),
            quoted: false,
        }
    }

    fn run(mut self) -> Result<Table, ParseError> {
        while let Some((c, at)) = self.bump() {
            match self.state {
                State::InField => self.in_field(c, at)?,
                State::InQuote => self.in_quote(c, at)?,
                State::JustClosedQuote => self.after_quote(c, at)?,
            }
        }
        if self.state == State::InQuote {
            let kind = ParseErrorKind::UnterminatedQuote {
                opened: self.quote_start.clone(),
            };
            return Err(ParseError::new(kind, self.pos.clone()));
        }
        self.end_record();
        Ok(self.table)
    }

    /// Read the next character along with the position it was read at.
    fn bump(&mut self) -> Option<(char, Position)> {
        let c = self.src.next_char()?;
        let at = self.pos.clone();
        self.pos.byte += c.len_utf8() as u64;
        if c == '\n' || (c == '\r' && self.src.peek_char() != Some('\n')) {
            self.pos.line += 1;
        }
        Some((c, at))
    }

    fn in_field(&mut self, c: char, at: Position) -> Result<(), ParseError> {
        if self.encloser == Some(c) {
            if !self.field.is_empty() {
                let kind = StructuralError::EncloserMidField;
                return Err(ParseError::new(ParseErrorKind::Structural(kind), at));
            }
            self.quoted = true;
            self.quote_start = at;
            self.state = State::InQuote;
        } else if self.dialect.is_separator(c) {
            self.end_field();
        } else if c >= ' ' || c == '\t' {
            self.field.push(c);
        } else if is_newline(c) {
            self.end_record();
        } else {
            let kind = ParseErrorKind::InvalidCharacter { found: c, quoted: false };
            return Err(ParseError::new(kind, at));
        }
        Ok(())
    }

    fn in_quote(&mut self, c: char, at: Position) -> Result<(), ParseError> {
        if self.encloser == Some(c) {
            if self.src.peek_char() == Some(c) {
                self.bump();
                self.field.push(c);
            } else {
                self.state = State::JustClosedQuote;
            }
        } else if c >= ' ' || c == '\t' || is_newline(c) {
            self.field.push(c);
        } else {
            let kind = ParseErrorKind::InvalidCharacter { found: c, quoted: true };
            return Err(ParseError::new(kind, at));
        }
        Ok(())
    }

    fn after_quote(&mut self, c: char, at: Position) -> Result<(), ParseError> {
        if self.dialect.is_separator(c) {
            self.end_field();
            self.state = State::InField;
        } else if is_newline(c) {
            self.end_record();
        } else {
            let kind = StructuralError::ContentAfterQuote { found: c };
            return Err(ParseError::new(ParseErrorKind::Structural(kind), at));
        }
        Ok(())
    }

    fn end_field(&mut self) {
        let field = mem::replace(&mut self.field, String::new());
        self.record.push_field(field);
        self.quoted = false;
    }

    /// Close the current record, if there is anything to close.
    ///
    /// The current field is only kept if it has content, was quoted, or
    /// follows a separator. A record with no fields is dropped.
    fn end_record(&mut self) {
        if !self.field.is_empty() || self.quoted || !self.record.is_empty() {
            self.end_field();
        }
        if !self.record.is_empty() {
            self.table.push_record(mem::take(&mut self.record));
            self.pos.record += 1;
        }
        self.state = State::InField;
    }
}
