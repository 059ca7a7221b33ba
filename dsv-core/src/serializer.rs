use std::fmt;

use crate::dialect::{Dialect, Terminator};
use crate::error::{ArgumentError, SerializeError};
use crate::table::Table;

/// How a single value is written.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Quoting {
    /// Write the value as is.
    Plain,
    /// Enclose the value, doubling any encloser inside it.
    Enclosed(char),
    /// The value requires quoting, but no encloser is configured.
    Impossible,
}

/// A serializer for delimiter-separated text.
///
/// A serializer writes a complete table in one pass to any
/// `core::fmt::Write` sink, such as a `String`.
///
/// # Quoting
///
/// Values are only enclosed when necessary. That is, when they contain any
/// of the dialect's separators, a line break (`\n` or `\r`) or the
/// encloser. Enclosers inside an enclosed value are doubled. A record made of
/// a single empty field is written as two enclosers, since an empty line
/// would be skipped when the data is read back.
///
/// If a value needs quoting but quoting is disabled, an error is returned.
///
/// # Example
///
/// ```
/// use dsv_core::{Serializer, Table};
///
/// let table = Table::from(vec![vec!["x,y", "say \"hi\""], vec!["z", ""]]);
/// let mut out = String::new();
/// Serializer::default().serialize(&table, &mut out).unwrap();
/// assert_eq!(out, "\"x,y\",\"say \"\"hi\"\"\"\nz,\n");
/// ```
#[derive(Clone, Debug)]
pub struct Serializer {
    separator: char,
    /// Every separator the dialect reads, so written values survive being
    /// read back with the same dialect.
    separators: Vec<char>,
    encloser: Option<char>,
    term: Terminator,
    enclose_bom: bool,
}

impl Default for Serializer {
    fn default() -> Serializer {
        Serializer {
            separator: ',',
            separators: vec![','],
            encloser: Some('"'),
            term: Terminator::default(),
            enclose_bom: false,
        }
    }
}

impl Serializer {
    /// Create a serializer for the given dialect.
    ///
    /// Only the first separator of the dialect is written, but values
    /// containing any of its separators are enclosed. This returns an error
    /// if the dialect is invalid.
    pub fn new(dialect: &Dialect) -> Result<Serializer, ArgumentError> {
        dialect.validate()?;
        let separator =
            dialect.primary_separator().ok_or(ArgumentError::NoSeparators)?;
        Ok(Serializer {
            separator,
            separators: dialect.get_separators().to_vec(),
            encloser: dialect.get_encloser(),
            term: dialect.get_terminator(),
            enclose_bom: false,
        })
    }

    /// Enclose the very first value of a table when it starts with
    /// `U+FEFF`.
    ///
    /// Readers that skip a leading byte order mark would otherwise drop the
    /// character. Without an encloser, such a value cannot be written.
    ///
    /// This is disabled by default.
    pub fn enclose_leading_bom(&mut self, yes: bool) -> &mut Serializer {
        self.enclose_bom = yes;
        self
    }

    /// The separator written between fields.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Write every record of `table` to `sink`.
    ///
    /// When an error is returned, `sink` may have received a prefix of the
    /// output.
    pub fn serialize<W: fmt::Write + ?Sized>(
        &self,
        table: &Table,
        sink: &mut W,
    ) -> Result<(), SerializeError> {
        for (i, record) in table.iter().enumerate() {
            let nrecord = i as u64;
            if record.is_empty() {
                return Err(SerializeError::EmptyRecord { record: nrecord });
            }
            if record.len() == 1 && record[0].is_empty() {
                match self.encloser {
                    Some(q) => {
                        sink.write_char(q)?;
                        sink.write_char(q)?;
                    }
                    None => {
                        return Err(SerializeError::CannotRepresentValue {
                            record: nrecord,
                            field: 0,
                            value: String::new(),
                        });
                    }
                }
                self.write_term(sink)?;
                continue;
            }
            for (j, field) in record.iter().enumerate() {
                if j > 0 {
                    sink.write_char(self.separator)?;
                }
                let first = i == 0 && j == 0;
                match self.quoting(field, first) {
                    Quoting::Plain => sink.write_str(field)?,
                    Quoting::Enclosed(q) => write_enclosed(sink, field, q)?,
                    Quoting::Impossible => {
                        return Err(SerializeError::CannotRepresentValue {
                            record: nrecord,
                            field: j as u64,
                            value: field.to_string(),
                        });
                    }
                }
            }
            self.write_term(sink)?;
        }
        Ok(())
    }

    fn quoting(&self, field: &str, first: bool) -> Quoting {
        let mut enclose =
            first && self.enclose_bom && field.starts_with('\u{FEFF}');
        for c in field.chars() {
            if c == '\n' || c == '\r' || self.separators.contains(&c) {
                return match self.encloser {
                    Some(q) => Quoting::Enclosed(q),
                    None => Quoting::Impossible,
                };
            }
            enclose = enclose || self.encloser == Some(c);
        }
        match (self.encloser, enclose) {
            (Some(q), true) => Quoting::Enclosed(q),
            (None, true) => Quoting::Impossible,
            (_, false) => Quoting::Plain,
        }
    }

    fn write_term<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        match self.term {
            Terminator::CRLF => sink.write_str("\r\n"),
            Terminator::Any(c) => sink.write_char(c),
        }
    }
}

fn write_enclosed<W: fmt::Write + ?Sized>(
    sink: &mut W,
    field: &str,
    quote: char,
) -> fmt::Result {
    sink.write_char(quote)?;
    let mut rest = field;
    while let Some(i) = rest.find(quote) {
        let end = i + quote.len_utf8();
        sink.write_str(&rest[..end])?;
        sink.write_char(quote)?;
        rest = &rest[end..];
    }
    sink.write_str(rest)?;
    sink.write_char(quote)
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::Serializer;
    use crate::dialect::{Dialect, Terminator};
    use crate::error::SerializeError;
    use crate::table::{Record, Table};

    fn table(rows: Vec<Vec<&str>>) -> Table {
        Table::from(rows)
    }

    fn serialize_with(
        dialect: &Dialect,
        table: &Table,
    ) -> Result<String, SerializeError> {
        let mut out = String::new();
        Serializer::new(dialect).unwrap().serialize(table, &mut out)?;
        Ok(out)
    }

    macro_rules! writes_as {
        ($name:ident, $rows:expr, $expected:expr) => {
            writes_as!($name, $rows, $expected, |_: &mut Dialect| {});
        };
        ($name:ident, $rows:expr, $expected:expr, $config:expr) => {
            #[test]
            fn $name() {
                let mut dialect = Dialect::new();
                $config(&mut dialect);
                let got = serialize_with(&dialect, &table($rows)).unwrap();
                assert_eq!($expected, got);
            }
        };
    }

    macro_rules! write_fails {
        ($name:ident, $rows:expr, $err:pat) => {
            write_fails!($name, $rows, $err, |_: &mut Dialect| {});
        };
        ($name:ident, $rows:expr, $err:pat, $config:expr) => {
            #[test]
            fn $name() {
                let mut dialect = Dialect::new();
                $config(&mut dialect);
                match serialize_with(&dialect, &table($rows)) {
                    Err($err) => {}
                    res => panic!("unexpected result: {:?}", res),
                }
            }
        };
    }

    writes_as!(empty, vec![], "");
    writes_as!(one_field, vec![vec!["a"]], "a\n");
    writes_as!(many_fields, vec![vec!["a", "b", "c"]], "a,b,c\n");
    writes_as!(
        many_records,
        vec![vec!["a", "b"], vec!["x", "y"]],
        "a,b\nx,y\n"
    );
    writes_as!(trailing_empty_field, vec![vec!["a", ""]], "a,\n");
    writes_as!(two_empty_fields, vec![vec!["", ""]], ",\n");
    writes_as!(single_empty_field, vec![vec![""]], "\"\"\n");
    writes_as!(quote_separator, vec![vec!["x,y"]], "\"x,y\"\n");
    writes_as!(quote_encloser, vec![vec!["a\"b"]], "\"a\"\"b\"\n");
    writes_as!(
        quote_encloser_edges,
        vec![vec!["\"", "\"\""]],
        "\"\"\"\",\"\"\"\"\"\"\n"
    );
    writes_as!(quote_lf, vec![vec!["a\nb"]], "\"a\nb\"\n");
    writes_as!(quote_cr, vec![vec!["a\rb"]], "\"a\rb\"\n");
    writes_as!(tab_is_plain, vec![vec!["a\tb"]], "a\tb\n");
    writes_as!(space_is_plain, vec![vec![" a "]], " a \n");
    writes_as!(unicode, vec![vec!["héllo", "日本"]], "héllo,日本\n");
    writes_as!(
        primary_separator_only,
        vec![vec!["a;b", "c,d"]],
        "\"a;b\";\"c,d\"\n",
        |d: &mut Dialect| { d.separators(&[';', ',']); }
    );
    writes_as!(
        separator_tab,
        vec![vec!["a", "b c"], vec!["x\ty", "z"]],
        "a\tb c\n\"x\ty\"\tz\n",
        |d: &mut Dialect| { d.separator('\t'); }
    );
    writes_as!(
        encloser_change,
        vec![vec!["it's", "a\"b"]],
        "'it''s',a\"b\n",
        |d: &mut Dialect| { d.encloser(Some('\'')); }
    );
    writes_as!(
        encloser_disabled_plain,
        vec![vec!["a\"b", "c"]],
        "a\"b,c\n",
        |d: &mut Dialect| { d.encloser(None); }
    );
    writes_as!(
        terminator_crlf,
        vec![vec!["a"], vec!["b"]],
        "a\r\nb\r\n",
        |d: &mut Dialect| { d.terminator(Terminator::CRLF); }
    );
    writes_as!(
        terminator_cr,
        vec![vec!["a"], vec!["b"]],
        "a\rb\r",
        |d: &mut Dialect| { d.terminator(Terminator::Any('\r')); }
    );

    write_fails!(
        separator_without_encloser,
        vec![vec!["x,y"]],
        SerializeError::CannotRepresentValue { record: 0, field: 0, .. },
        |d: &mut Dialect| { d.encloser(None); }
    );
    write_fails!(
        newline_without_encloser,
        vec![vec!["ok"], vec!["a", "b\nc"]],
        SerializeError::CannotRepresentValue { record: 1, field: 1, .. },
        |d: &mut Dialect| { d.encloser(None); }
    );
    write_fails!(
        single_empty_field_without_encloser,
        vec![vec![""]],
        SerializeError::CannotRepresentValue { record: 0, field: 0, .. },
        |d: &mut Dialect| { d.encloser(None); }
    );

    #[test]
    fn empty_record() {
        let mut t = Table::new();
        t.push_record(vec!["a"]);
        t.push_record(Record::new());
        let mut out = String::new();
        let err = Serializer::default().serialize(&t, &mut out).unwrap_err();
        assert_eq!(SerializeError::EmptyRecord { record: 1 }, err);
    }

    #[test]
    fn rejects_invalid_dialect() {
        let mut dialect = Dialect::new();
        dialect.separators(&['\n']);
        assert!(Serializer::new(&dialect).is_err());
    }

    #[test]
    fn leading_bom() {
        let t = table(vec![vec!["\u{FEFF}a", "\u{FEFF}b"], vec!["\u{FEFF}c"]]);
        let mut ser = Serializer::default();

        let mut out = String::new();
        ser.serialize(&t, &mut out).unwrap();
        assert_eq!("\u{FEFF}a,\u{FEFF}b\n\u{FEFF}c\n", out);

        let mut out = String::new();
        ser.enclose_leading_bom(true).serialize(&t, &mut out).unwrap();
        assert_eq!("\"\u{FEFF}a\",\u{FEFF}b\n\u{FEFF}c\n", out);
    }

    #[test]
    fn leading_bom_without_encloser() {
        let mut dialect = Dialect::new();
        dialect.encloser(None);
        let mut ser = Serializer::new(&dialect).unwrap();
        ser.enclose_leading_bom(true);

        let t = table(vec![vec!["\u{FEFF}a"]]);
        let mut out = String::new();
        match ser.serialize(&t, &mut out) {
            Err(SerializeError::CannotRepresentValue { record: 0, field: 0, .. }) => {}
            res => panic!("unexpected result: {:?}", res),
        }
    }

    #[test]
    fn sink_failure() {
        struct Full;

        impl fmt::Write for Full {
            fn write_str(&mut self, _: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let t = table(vec![vec!["a"]]);
        let err = Serializer::default().serialize(&t, &mut Full).unwrap_err();
        assert_eq!(SerializeError::Sink, err);
    }
}
