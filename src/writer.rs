use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write as IoWrite};
use std::path::Path;

use dsv_core::{Dialect, SerializeError, Serializer, Table, Terminator};

use crate::error::{Error, Result};

/// Builds a writer with various configuration knobs.
///
/// This builder can be used to tweak the field separator, the encloser and
/// the record terminator. Once a `Writer` is built, its configuration cannot
/// be changed.
#[derive(Clone, Debug)]
pub struct WriterBuilder {
    dialect: Dialect,
    capacity: usize,
}

impl Default for WriterBuilder {
    fn default() -> WriterBuilder {
        WriterBuilder { dialect: Dialect::default(), capacity: 8 * (1 << 10) }
    }
}

impl WriterBuilder {
    /// Create a new builder for configuring writing.
    ///
    /// To convert a builder into a writer, call one of the methods starting
    /// with `from_`.
    ///
    /// # Example
    ///
    /// ```
    /// use dsv::{Table, Terminator, WriterBuilder};
    ///
    /// let table = Table::from(vec![vec!["a", "b\tc"], vec!["d", "e"]]);
    /// let mut wtr = WriterBuilder::new()
    ///     .separator('\t')
    ///     .terminator(Terminator::CRLF)
    ///     .from_writer(vec![])
    ///     .unwrap();
    /// wtr.write_table(&table).unwrap();
    ///
    /// let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
    /// assert_eq!(data, "a\t\"b\tc\"\r\nd\te\r\n");
    /// ```
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a writer from this configuration that writes to `wtr`.
    ///
    /// The writer is buffered for you automatically. This returns an error
    /// if the configured dialect is invalid.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> Result<Writer<W>> {
        let ser = Serializer::new(&self.dialect)?;
        Ok(Writer::new(self, ser, wtr))
    }

    /// Build a writer from this configuration that writes to the file at
    /// the given path.
    ///
    /// The file is created if it does not already exist and is truncated
    /// otherwise.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Writer<File>> {
        let ser = Serializer::new(&self.dialect)?;
        tracing::trace!(path = %path.as_ref().display(), "opening for write");
        Ok(Writer::new(self, ser, File::create(path)?))
    }

    /// The field separator to write.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut WriterBuilder {
        self.dialect.separator(separator);
        self
    }

    /// The encloser to use, or `None` to disable quoting.
    ///
    /// When quoting is disabled, writing a value that needs quoting fails.
    ///
    /// The default is `Some('"')`.
    pub fn encloser(&mut self, encloser: Option<char>) -> &mut WriterBuilder {
        self.dialect.encloser(encloser);
        self
    }

    /// The record terminator to write.
    ///
    /// The default is `Terminator::Any('\n')`.
    pub fn terminator(&mut self, term: Terminator) -> &mut WriterBuilder {
        self.dialect.terminator(term);
        self
    }

    /// Replace the whole dialect.
    ///
    /// Only the first separator of the dialect is written, but values that
    /// contain any of its separators are enclosed.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut WriterBuilder {
        self.dialect = dialect;
        self
    }

    /// Set the capacity (in bytes) of the internal buffer.
    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut WriterBuilder {
        self.capacity = capacity;
        self
    }
}

/// A writer that serializes whole tables to an `io::Write`.
///
/// Output is buffered. The buffer is flushed when a table has been written
/// and when `into_inner` is called.
///
/// # Example
///
/// ```
/// use dsv::{Table, Writer};
///
/// let table = Table::from(vec![vec!["name", "quote"], vec!["x", "say \"hi\""]]);
/// let mut wtr = Writer::from_writer(vec![]);
/// wtr.write_table(&table).unwrap();
///
/// let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "name,quote\nx,\"say \"\"hi\"\"\"\n");
/// ```
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    wtr: BufWriter<W>,
    ser: Serializer,
}

impl Writer<File> {
    /// Create a new writer using the default dialect that writes to the file
    /// at the given path.
    ///
    /// The file is created if it does not already exist and is truncated
    /// otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Writer<File>> {
        WriterBuilder::new().from_path(path)
    }
}

impl<W: io::Write> Writer<W> {
    fn new(builder: &WriterBuilder, mut ser: Serializer, wtr: W) -> Writer<W> {
        // Readers skip a leading byte order mark by default.
        ser.enclose_leading_bom(true);
        Writer { wtr: BufWriter::with_capacity(builder.capacity, wtr), ser }
    }

    /// Create a new writer using the default dialect.
    pub fn from_writer(wtr: W) -> Writer<W> {
        Writer::new(&WriterBuilder::new(), Serializer::default(), wtr)
    }

    /// Write every record of `table` and flush.
    ///
    /// A first value that starts with `U+FEFF` is always enclosed, so that
    /// it is not mistaken for a byte order mark when read back.
    ///
    /// If a value cannot be represented under the configured dialect, an
    /// error is returned and the records before it may already have been
    /// written.
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        let mut sink = IoSink { wtr: &mut self.wtr, err: None };
        let res = self.ser.serialize(table, &mut sink);
        match (res, sink.err.take()) {
            (Ok(()), _) => {}
            (Err(SerializeError::Sink), Some(err)) => {
                tracing::debug!(error = %err, "failed to write table");
                return Err(Error::Io(err));
            }
            (Err(err), _) => {
                tracing::debug!(error = %err, "failed to serialize table");
                return Err(Error::Serialize(err));
            }
        }
        self.wtr.flush()?;
        tracing::debug!(records = table.len(), "wrote table");
        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }

    /// Returns the serializer used by this writer.
    pub fn serializer(&self) -> &Serializer {
        &self.ser
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.wtr.get_ref()
    }

    /// Flush the internal buffer and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.wtr.into_inner().map_err(|err| Error::Io(err.into_error()))
    }
}

/// Adapts an `io::Write` to the character sink the serializer writes to.
///
/// `fmt::Error` carries no details, so the I/O error is stashed here.
struct IoSink<'a, W: io::Write> {
    wtr: &'a mut W,
    err: Option<io::Error>,
}

impl<'a, W: io::Write> fmt::Write for IoSink<'a, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.wtr.write_all(s.as_bytes()).map_err(|err| {
            self.err = Some(err);
            fmt::Error
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use dsv_core::{Dialect, Table, Terminator};

    use super::{Writer, WriterBuilder};
    use crate::error::Error;

    fn table(rows: Vec<Vec<&str>>) -> Table {
        Table::from(rows)
    }

    fn written<W: io::Write>(wtr: Writer<W>) -> W {
        wtr.into_inner().unwrap()
    }

    #[test]
    fn default_dialect() {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_table(&table(vec![vec!["a", "b,c"], vec![""]])).unwrap();
        assert_eq!(b"a,\"b,c\"\n\"\"\n".to_vec(), written(wtr));
    }

    #[test]
    fn tables_are_appended() {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_table(&table(vec![vec!["a"]])).unwrap();
        wtr.write_table(&table(vec![vec!["b"]])).unwrap();
        assert_eq!(b"a\nb\n".to_vec(), written(wtr));
    }

    #[test]
    fn whole_dialect() {
        let mut dialect = Dialect::new();
        dialect
            .separators(&['|', ','])
            .encloser(Some('\''))
            .terminator(Terminator::CRLF);
        let mut wtr = WriterBuilder::new().dialect(dialect).from_writer(vec![]).unwrap();
        wtr.write_table(&table(vec![vec!["a,b", "it's", "c"]])).unwrap();
        assert_eq!(b"'a,b'|'it''s'|c\r\n".to_vec(), written(wtr));
    }

    #[test]
    fn small_buffer() {
        let mut wtr =
            WriterBuilder::new().buffer_capacity(1).from_writer(vec![]).unwrap();
        wtr.write_table(&table(vec![vec!["abc", "def"]])).unwrap();
        assert_eq!(b"abc,def\n".to_vec(), written(wtr));
    }

    #[test]
    fn cannot_represent_value() {
        let mut wtr = WriterBuilder::new()
            .encloser(None)
            .from_writer(vec![])
            .unwrap();
        match wtr.write_table(&table(vec![vec!["x,y"]])) {
            Err(Error::Serialize(_)) => {}
            res => panic!("unexpected result: {:?}", res),
        }
    }

    #[test]
    fn invalid_dialect() {
        let res = WriterBuilder::new()
            .terminator(Terminator::Any(';'))
            .from_writer(vec![]);
        match res {
            Err(Error::Argument(_)) => {}
            res => panic!("unexpected result: {:?}", res),
        }
    }

    #[test]
    fn io_error() {
        struct Broken;

        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "broken"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut wtr =
            WriterBuilder::new().buffer_capacity(0).from_writer(Broken).unwrap();
        let err = wtr.write_table(&table(vec![vec!["a"]])).unwrap_err();
        assert!(err.is_io_error());
    }
}
