use std::iter::FromIterator;
use std::ops;
use std::slice;
use std::vec;

/// A single record: an ordered sequence of fields.
///
/// Records produced by the parser always have at least one field.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Record(Vec<String>);

impl Record {
    /// Create a new empty record.
    pub fn new() -> Record {
        Record(Vec::new())
    }

    /// Create a new empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Record {
        Record(Vec::with_capacity(capacity))
    }

    /// Add a field to the end of this record.
    pub fn push_field<S: Into<String>>(&mut self, field: S) {
        self.0.push(field.into());
    }

    /// Return the field at index `i`.
    ///
    /// If no field at index `i` exists, then this returns `None`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(|s| &**s)
    }

    /// Returns true if and only if this record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields in this record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns an iterator over all fields in this record.
    pub fn iter(&self) -> RecordIter {
        RecordIter(self.0.iter())
    }

    /// Returns the fields of this record as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Convert this record into its fields.
    pub fn into_fields(self) -> Vec<String> {
        self.0
    }
}

impl ops::Index<usize> for Record {
    type Output = str;
    fn index(&self, i: usize) -> &str {
        &self.0[i]
    }
}

impl<T: Into<String>> From<Vec<T>> for Record {
    fn from(fields: Vec<T>) -> Record {
        fields.into_iter().collect()
    }
}

impl<T: Into<String>> FromIterator<T> for Record {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Record {
        Record(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>> Extend<T> for Record {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a Record {
    type IntoIter = RecordIter<'a>;
    type Item = &'a str;
    fn into_iter(self) -> RecordIter<'a> {
        self.iter()
    }
}

impl IntoIterator for Record {
    type IntoIter = vec::IntoIter<String>;
    type Item = String;
    fn into_iter(self) -> vec::IntoIter<String> {
        self.0.into_iter()
    }
}

impl<T: AsRef<str>> PartialEq<[T]> for Record {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<T: AsRef<str>> PartialEq<Vec<T>> for Record {
    fn eq(&self, other: &Vec<T>) -> bool {
        self == other.as_slice()
    }
}

/// An iterator over the fields in a record.
#[derive(Clone, Debug)]
pub struct RecordIter<'a>(slice::Iter<'a, String>);

impl<'a> Iterator for RecordIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.0.next().map(|s| &**s)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> DoubleEndedIterator for RecordIter<'a> {
    fn next_back(&mut self) -> Option<&'a str> {
        self.0.next_back().map(|s| &**s)
    }
}

impl<'a> ExactSizeIterator for RecordIter<'a> {}

/// A table: an ordered sequence of records.
///
/// Row order is significant and matches the order in which records appear
/// in the input.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Table(Vec<Record>);

impl Table {
    /// Create a new empty table.
    pub fn new() -> Table {
        Table(Vec::new())
    }

    /// Add a record to the end of this table.
    pub fn push_record<R: Into<Record>>(&mut self, record: R) {
        self.0.push(record.into());
    }

    /// Return the record at index `i`.
    pub fn get(&self, i: usize) -> Option<&Record> {
        self.0.get(i)
    }

    /// Returns true if and only if this table has no records.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of records in this table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns an iterator over all records in this table.
    pub fn iter(&self) -> slice::Iter<Record> {
        self.0.iter()
    }

    /// Returns the records of this table as a slice.
    pub fn records(&self) -> &[Record] {
        &self.0
    }

    /// Convert this table into its records.
    pub fn into_records(self) -> Vec<Record> {
        self.0
    }
}

impl ops::Index<usize> for Table {
    type Output = Record;
    fn index(&self, i: usize) -> &Record {
        &self.0[i]
    }
}

impl<R: Into<Record>> From<Vec<R>> for Table {
    fn from(records: Vec<R>) -> Table {
        records.into_iter().collect()
    }
}

impl<R: Into<Record>> FromIterator<R> for Table {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Table {
        Table(iter.into_iter().map(Into::into).collect())
    }
}

impl<R: Into<Record>> Extend<R> for Table {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a Table {
    type IntoIter = slice::Iter<'a, Record>;
    type Item = &'a Record;
    fn into_iter(self) -> slice::Iter<'a, Record> {
        self.iter()
    }
}

impl IntoIterator for Table {
    type IntoIter = vec::IntoIter<Record>;
    type Item = Record;
    fn into_iter(self) -> vec::IntoIter<Record> {
        self.0.into_iter()
    }
}
