use std::fs::File;
use std::io;
use std::path::Path;

use bstr::ByteSlice;
use dsv_core::{Dialect, Parser, Table};

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Builds a reader with various configuration knobs.
///
/// This builder can be used to tweak the field separators, the encloser and
/// how bytes are decoded. Once a `Reader` is built, its configuration cannot
/// be changed.
#[derive(Clone, Debug)]
pub struct ReaderBuilder {
    dialect: Dialect,
    lossy: bool,
    trim_bom: bool,
}

impl Default for ReaderBuilder {
    fn default() -> ReaderBuilder {
        ReaderBuilder {
            dialect: Dialect::default(),
            lossy: false,
            trim_bom: true,
        }
    }
}

impl ReaderBuilder {
    /// Create a new builder for configuring reading.
    ///
    /// To convert a builder into a reader, call one of the methods starting
    /// with `from_`.
    ///
    /// # Example
    ///
    /// ```
    /// use dsv::ReaderBuilder;
    ///
    /// let data = "city;country;pop\nBoston;United States;4628910\n";
    /// let mut rdr = ReaderBuilder::new()
    ///     .separator(';')
    ///     .from_reader(data.as_bytes())
    ///     .unwrap();
    /// let table = rdr.read_table().unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table[1].get(1), Some("United States"));
    /// ```
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Build a reader from this configuration that reads from `rdr`.
    ///
    /// This returns an error if the configured dialect is invalid.
    pub fn from_reader<R: io::Read>(&self, rdr: R) -> Result<Reader<R>> {
        Ok(Reader::new(self, Parser::new(&self.dialect)?, rdr))
    }

    /// Build a reader from this configuration that reads from the file
    /// at the given path.
    ///
    /// The file is closed when the reader is dropped.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Reader<File>> {
        let parser = Parser::new(&self.dialect)?;
        tracing::trace!(path = %path.as_ref().display(), "opening for read");
        Ok(Reader::new(self, parser, File::open(path)?))
    }

    /// Use a single field separator.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut ReaderBuilder {
        self.dialect.separator(separator);
        self
    }

    /// Use a set of field separators. Any of them ends a field.
    pub fn separators(&mut self, separators: &[char]) -> &mut ReaderBuilder {
        self.dialect.separators(separators);
        self
    }

    /// The encloser to use, or `None` to disable quoting.
    ///
    /// The default is `Some('"')`.
    pub fn encloser(&mut self, encloser: Option<char>) -> &mut ReaderBuilder {
        self.dialect.encloser(encloser);
        self
    }

    /// Replace the whole dialect.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut ReaderBuilder {
        self.dialect = dialect;
        self
    }

    /// Decode invalid UTF-8 lossily.
    ///
    /// When enabled, each invalid UTF-8 sequence is replaced with
    /// `U+FFFD REPLACEMENT CHARACTER`. When disabled (the default), invalid
    /// UTF-8 is an error.
    pub fn utf8_lossy(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.lossy = yes;
        self
    }

    /// Skip a UTF-8 byte order mark at the start of the input.
    ///
    /// This is enabled by default.
    pub fn trim_bom(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.trim_bom = yes;
        self
    }
}

/// A reader that parses all of an `io::Read` into a `Table`.
///
/// The underlying reader is read to the end in one call, then decoded as
/// UTF-8 and handed to the parser. The reader is not buffered since it is
/// always read in full.
///
/// # Example
///
/// ```
/// use dsv::Reader;
///
/// let data = "\
/// city,country,pop
/// \"Boston, MA\",United States,4628910
/// ";
/// let mut rdr = Reader::from_reader(data.as_bytes());
/// let table = rdr.read_table().unwrap();
/// assert_eq!(table[1].get(0), Some("Boston, MA"));
/// ```
#[derive(Debug)]
pub struct Reader<R> {
    rdr: R,
    parser: Parser,
    lossy: bool,
    trim_bom: bool,
}

impl Reader<File> {
    /// Create a new reader using the default dialect for the file at the
    /// given path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<File>> {
        ReaderBuilder::new().from_path(path)
    }
}

impl<R: io::Read> Reader<R> {
    fn new(builder: &ReaderBuilder, parser: Parser, rdr: R) -> Reader<R> {
        Reader {
            rdr,
            parser,
            lossy: builder.lossy,
            trim_bom: builder.trim_bom,
        }
    }

    /// Create a new reader using the default dialect.
    pub fn from_reader(rdr: R) -> Reader<R> {
        Reader::new(&ReaderBuilder::new(), Parser::default(), rdr)
    }

    /// Read and parse the rest of the underlying reader.
    ///
    /// An empty input yields an empty table. Any I/O, decoding or parse
    /// error aborts the read, and no partial table is returned.
    ///
    /// Offsets in UTF-8 errors count from the start of the input. Positions
    /// in parse errors count from just after a trimmed byte order mark.
    pub fn read_table(&mut self) -> Result<Table> {
        let mut buf = vec![];
        self.rdr.read_to_end(&mut buf)?;
        let mut data = &buf[..];
        let mut skipped = 0;
        if self.trim_bom && data.starts_with(UTF8_BOM) {
            skipped = UTF8_BOM.len();
            data = &data[skipped..];
        }
        let res = if self.lossy {
            self.parser.parse(data.chars().peekable())
        } else {
            let text = data.to_str().map_err(|err| Error::Utf8 {
                valid_up_to: skipped + err.valid_up_to(),
                error_len: err.error_len(),
            })?;
            self.parser.parse(text.chars().peekable())
        };
        match res {
            Ok(table) => {
                tracing::debug!(
                    records = table.len(),
                    bytes = data.len(),
                    "read table"
                );
                Ok(table)
            }
            Err(err) => {
                tracing::debug!(error = %err, "failed to parse table");
                Err(err.into())
            }
        }
    }

    /// Returns the parser used by this reader.
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.rdr
    }

    /// Returns a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.rdr
    }

    /// Unwraps this reader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.rdr
    }
}
