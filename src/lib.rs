/*!
The `dsv` crate provides strict reading and writing of CSV and other
delimiter-separated values.

A whole input is parsed into a [`Table`] of [`Record`]s, where every field is
a string. Any structural problem in the input (a stray encloser, content after
a closing encloser, a control character, an unterminated quoted field) is an
error that points at the offending position. Nothing is inferred: there is no
header handling, no type conversion and no dialect sniffing.

The character-level machinery lives in the `dsv-core` crate and is re-exported
here. This crate adds readers and writers for `std::io` and, with the `serde`
feature (enabled by default), conversion of Rust values into records.

# Example

```
use dsv::{Reader, Writer};

let data = "\
name,quote
alice,\"hello, world\"
bob,\"say \"\"hi\"\"\"
";
let mut rdr = Reader::from_reader(data.as_bytes());
let table = rdr.read_table().unwrap();
assert_eq!(table[2].get(1), Some("say \"hi\""));

let mut wtr = Writer::from_writer(vec![]);
wtr.write_table(&table).unwrap();
assert_eq!(String::from_utf8(wtr.into_inner().unwrap()).unwrap(), data);
```

# Dialects

Readers accept any number of field separators, and both `\n` and `\r` end a
record. Writers emit the first separator and the configured terminator:

```
use dsv::{ReaderBuilder, Terminator, WriterBuilder};

let mut rdr = ReaderBuilder::new()
    .separators(&[';', '\t'])
    .from_reader("a;b\tc\r\n".as_bytes())
    .unwrap();
let table = rdr.read_table().unwrap();
assert_eq!(table[0], vec!["a", "b", "c"]);

let mut wtr = WriterBuilder::new()
    .separator('|')
    .terminator(Terminator::CRLF)
    .from_writer(vec![])
    .unwrap();
wtr.write_table(&table).unwrap();
assert_eq!(wtr.into_inner().unwrap(), b"a|b|c\r\n");
```
*/

#![deny(missing_docs)]

pub use dsv_core::{
    ArgumentError, Dialect, ParseError, ParseErrorKind, Parser, Position,
    Record, RecordIter, SerializeError, Serializer, Source, StructuralError,
    Table, Terminator,
};

pub use crate::error::{Error, Result};
pub use crate::reader::{Reader, ReaderBuilder};
#[cfg(feature = "serde")]
pub use crate::serializer::{to_header, to_record};
pub use crate::writer::{Writer, WriterBuilder};

mod error;
mod reader;
#[cfg(feature = "serde")]
mod serializer;
mod writer;
