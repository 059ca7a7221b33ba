/*!
`dsv-core` provides the character-level state machines for reading and
writing delimiter-separated values, such as CSV.

This crate does no I/O. The parser consumes any [`Source`] of already
decoded characters and produces a complete [`Table`], while the serializer
writes a complete table to any `core::fmt::Write` sink. If you want to read
from files or `std::io::Read` implementations, use the `dsv` crate, which
is built on top of this one.

# Dialects

Both halves are configured by a [`Dialect`]: a set of field separators, an
optional encloser (quote) character, and the record terminator to write.
The parser always treats `\n` and `\r` as record terminators.

# Example

```
use dsv_core::{Dialect, Parser, Serializer};

let mut dialect = Dialect::new();
dialect.separators(&[';', ',']);

let parser = Parser::new(&dialect).unwrap();
let table = parser.parse("a;b,c\n\"x;y\";z\n".chars().peekable()).unwrap();
assert_eq!(table.len(), 2);
assert_eq!(table[0].len(), 3);
assert_eq!(table[1].get(0), Some("x;y"));

let mut out = String::new();
Serializer::new(&dialect).unwrap().serialize(&table, &mut out).unwrap();
assert_eq!(out, "a;b;c\n\"x;y\";z\n");
```
*/

#![deny(missing_docs)]

pub use crate::dialect::{Dialect, Terminator};
pub use crate::error::{
    ArgumentError, ParseError, ParseErrorKind, SerializeError, StructuralError,
};
pub use crate::parser::{Parser, Position};
pub use crate::serializer::Serializer;
pub use crate::source::Source;
pub use crate::table::{Record, RecordIter, Table};

mod dialect;
mod error;
mod parser;
mod serializer;
mod source;
mod table;
