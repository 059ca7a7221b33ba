use std::fmt;

use bstr::ByteSlice;
use dsv_core::Record;
use serde::ser::{
    Error as SerdeError, Serialize, SerializeMap, SerializeSeq,
    SerializeStruct, SerializeStructVariant, SerializeTuple,
    SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

use crate::error::{Error, Result};

/// Convert a value into a single record.
///
/// Structs, tuples and sequences are flattened, in order, into one field per
/// scalar. Integers and floats are written in their shortest round-tripping
/// form, booleans as `true` or `false`, and `None` or `()` as an empty field.
/// Unit enum variants are written by name while newtype variants are written
/// as their inner value.
///
/// Maps and enum tuple or struct variants are not supported.
///
/// # Example
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Row {
///     city: String,
///     pop: u64,
///     area: Option<f64>,
/// }
///
/// let row = Row { city: "Boston".to_string(), pop: 4628910, area: None };
/// let rec = dsv::to_record(&row).unwrap();
/// assert_eq!(rec, vec!["Boston", "4628910", ""]);
/// ```
pub fn to_record<T: Serialize + ?Sized>(value: &T) -> Result<Record> {
    let mut ser = SeRecord { rec: Record::new(), header_only: false };
    value.serialize(&mut ser)?;
    Ok(ser.rec)
}

/// Convert the field names of a struct into a header record.
///
/// Only struct field names are written. If `value` has none (for example,
/// it is a scalar or a vector), an error is returned.
///
/// # Example
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Row {
///     city: String,
///     pop: u64,
/// }
///
/// let row = Row { city: "Boston".to_string(), pop: 4628910 };
/// assert_eq!(dsv::to_header(&row).unwrap(), vec!["city", "pop"]);
/// ```
pub fn to_header<T: Serialize + ?Sized>(value: &T) -> Result<Record> {
    let mut ser = SeRecord { rec: Record::new(), header_only: true };
    value.serialize(&mut ser)?;
    if ser.rec.is_empty() {
        return Err(Error::custom("value has no field names to use as a header"));
    }
    Ok(ser.rec)
}

struct SeRecord {
    rec: Record,
    header_only: bool,
}

impl SeRecord {
    fn field<S: Into<String>>(&mut self, value: S) -> Result<()> {
        if !self.header_only {
            self.rec.push_field(value);
        }
        Ok(())
    }

    fn integer<I: itoa::Integer>(&mut self, v: I) -> Result<()> {
        let mut buf = itoa::Buffer::new();
        self.field(buf.format(v))
    }

    fn float<F: ryu::Float>(&mut self, v: F) -> Result<()> {
        let mut buf = ryu::Buffer::new();
        self.field(buf.format(v))
    }
}

impl<'a> Serializer for &'a mut SeRecord {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.field(if v { "true" } else { "false" })
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.integer(v)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.integer(v)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.integer(v)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.integer(v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.integer(v)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.integer(v)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.integer(v)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.integer(v)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.integer(v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.float(v)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.float(v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0; 4];
        self.field(&*v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, value: &str) -> Result<()> {
        self.field(value)
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<()> {
        self.field(value.to_str()?)
    }

    fn serialize_none(self) -> Result<()> {
        self.field("")
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        None::<()>.serialize(self)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<()> {
        self.field(name)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.field(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self> {
        Err(Error::custom("serializing enum tuple variants is not supported"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self> {
        // Key order is not stable for most map types.
        Err(Error::custom("serializing maps is not supported"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self> {
        Err(Error::custom("serializing enum struct variants is not supported"))
    }

    fn collect_str<T: ?Sized + fmt::Display>(self, value: &T) -> Result<()> {
        self.field(value.to_string())
    }
}

impl<'a> SerializeSeq for &'a mut SeRecord {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> SerializeTuple for &'a mut SeRecord {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> SerializeTupleStruct for &'a mut SeRecord {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

// The remaining compound serializers are never handed out: their
// constructors above always fail.

impl<'a> SerializeTupleVariant for &'a mut SeRecord {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _value: &T,
    ) -> Result<()> {
        unreachable!()
    }

    fn end(self) -> Result<()> {
        unreachable!()
    }
}

impl<'a> SerializeMap for &'a mut SeRecord {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _key: &T) -> Result<()> {
        unreachable!()
    }

    fn serialize_value<T: ?Sized + Serialize>(
        &mut self,
        _value: &T,
    ) -> Result<()> {
        unreachable!()
    }

    fn end(self) -> Result<()> {
        unreachable!()
    }
}

impl<'a> SerializeStruct for &'a mut SeRecord {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        if self.header_only {
            self.rec.push_field(key);
            Ok(())
        } else {
            value.serialize(&mut **self)
        }
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> SerializeStructVariant for &'a mut SeRecord {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<()> {
        unreachable!()
    }

    fn end(self) -> Result<()> {
        unreachable!()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use crate::error::Error;

    use super::{to_header, to_record};

    fn serialize<S: Serialize>(s: S) -> Vec<String> {
        to_record(&s).unwrap().into_fields()
    }

    fn serialize_err<S: Serialize>(s: S) -> Error {
        to_record(&s).unwrap_err()
    }

    #[test]
    fn bool() {
        assert_eq!(serialize(true), vec!["true"]);
        assert_eq!(serialize(false), vec!["false"]);
    }

    #[test]
    fn integer() {
        assert_eq!(serialize(12345), vec!["12345"]);
        assert_eq!(serialize(-7i8), vec!["-7"]);
        assert_eq!(serialize(u64::MAX), vec!["18446744073709551615"]);
        assert_eq!(serialize(i128::MIN), vec![i128::MIN.to_string()]);
    }

    #[test]
    fn float() {
        assert_eq!(serialize(1.23), vec!["1.23"]);
        assert_eq!(serialize(1.0f64), vec!["1.0"]);
        assert_eq!(serialize(0.1f32), vec!["0.1"]);
        assert_eq!(serialize(f64::NAN), vec!["NaN"]);
    }

    #[test]
    fn char() {
        assert_eq!(serialize('☃'), vec!["☃"]);
    }

    #[test]
    fn str() {
        assert_eq!(serialize("how\nare\n\"you\"?"), vec!["how\nare\n\"you\"?"]);
    }

    #[test]
    fn bytes() {
        struct Bytes<'a>(&'a [u8]);

        impl<'a> Serialize for Bytes<'a> {
            fn serialize<S: serde::Serializer>(
                &self,
                s: S,
            ) -> Result<S::Ok, S::Error> {
                s.serialize_bytes(self.0)
            }
        }

        assert_eq!(serialize(Bytes(b"abc")), vec!["abc"]);
        match serialize_err(Bytes(b"a\xFFc")) {
            Error::Utf8 { valid_up_to: 1, .. } => {}
            x => panic!("expected Error::Utf8 but got '{:?}'", x),
        }
    }

    #[test]
    fn option() {
        assert_eq!(serialize(None::<()>), vec![""]);
        assert_eq!(serialize(Some(5)), vec!["5"]);
    }

    #[test]
    fn unit() {
        assert_eq!(serialize(()), vec![""]);
    }

    #[test]
    fn struct_unit() {
        #[derive(Serialize)]
        struct Foo;

        assert_eq!(serialize(Foo), vec!["Foo"]);
    }

    #[test]
    fn struct_newtype() {
        #[derive(Serialize)]
        struct Foo(f64);

        assert_eq!(serialize(Foo(1.5)), vec!["1.5"]);
    }

    #[test]
    fn enum_units() {
        #[derive(Serialize)]
        enum Wat {
            Foo,
            Bar,
        }

        assert_eq!(serialize(Wat::Foo), vec!["Foo"]);
        assert_eq!(serialize(Wat::Bar), vec!["Bar"]);
    }

    #[test]
    fn enum_newtypes() {
        #[derive(Serialize)]
        enum Wat {
            Foo(i32),
            Baz(bool),
        }

        assert_eq!(serialize(Wat::Foo(5)), vec!["5"]);
        assert_eq!(serialize(Wat::Baz(true)), vec!["true"]);
    }

    #[test]
    fn seq() {
        assert_eq!(serialize(vec![1, 2, 3]), vec!["1", "2", "3"]);
        assert!(serialize(Vec::<i32>::new()).is_empty());
    }

    #[test]
    fn tuple() {
        assert_eq!(serialize((true, 1.5, "hi")), vec!["true", "1.5", "hi"]);
        assert_eq!(
            serialize((true, 1.5, vec![1, 2])),
            vec!["true", "1.5", "1", "2"]
        );
    }

    #[test]
    fn tuple_struct() {
        #[derive(Serialize)]
        struct Foo(bool, i32, String);

        assert_eq!(
            serialize(Foo(false, 42, "hi".to_string())),
            vec!["false", "42", "hi"]
        );
    }

    #[test]
    fn tuple_variant() {
        #[derive(Serialize)]
        enum Foo {
            X(bool, i32),
        }

        match serialize_err(Foo::X(false, 42)) {
            Error::Serde(_) => {}
            x => panic!("expected Error::Serde but got '{:?}'", x),
        }
    }

    #[test]
    fn struct_variant() {
        #[derive(Serialize)]
        enum Foo {
            X { a: bool, b: i32 },
        }

        match serialize_err(Foo::X { a: false, b: 1 }) {
            Error::Serde(_) => {}
            x => panic!("expected Error::Serde but got '{:?}'", x),
        }
    }

    #[test]
    fn map() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        match serialize_err(map) {
            Error::Serde(_) => {}
            x => panic!("expected Error::Serde but got '{:?}'", x),
        }
    }

    #[test]
    fn struct_fields() {
        #[derive(Serialize)]
        struct Foo {
            x: bool,
            y: i32,
            z: Option<String>,
        }

        let foo = Foo { x: true, y: 5, z: None };
        assert_eq!(serialize(&foo), vec!["true", "5", ""]);
        assert_eq!(to_header(&foo).unwrap(), vec!["x", "y", "z"]);
    }

    #[test]
    fn header_of_tuple_of_structs() {
        #[derive(Serialize)]
        struct A {
            a: i32,
        }

        #[derive(Serialize)]
        struct B {
            b: i32,
            c: i32,
        }

        let got = to_header(&(A { a: 1 }, B { b: 2, c: 3 })).unwrap();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn header_without_names() {
        match to_header(&(1, "a")).unwrap_err() {
            Error::Serde(_) => {}
            x => panic!("expected Error::Serde but got '{:?}'", x),
        }
    }
}
