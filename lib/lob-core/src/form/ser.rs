//! Serde serializers behind [`super::encode`].
//!
//! - [`RecordSerializer`] accepts the top-level struct or map.
//! - [`FieldSerializer`] applies the per-type inclusion rules to one field.
//! - [`TextSerializer`] accepts only strings (list elements, map keys and values).

use std::fmt;

use serde::Serialize;
use serde::ser::{self, Impossible};

use super::WireForm;
use crate::EncodeError;

/// Serializer methods that every serializer in this module rejects.
macro_rules! reject_unsupported {
    () => {
        fn serialize_i128(self, _v: i128) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("i128"))
        }

        fn serialize_u8(self, _v: u8) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("u8"))
        }

        fn serialize_u16(self, _v: u16) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("u16"))
        }

        fn serialize_u32(self, _v: u32) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("u32"))
        }

        fn serialize_u64(self, _v: u64) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("u64"))
        }

        fn serialize_u128(self, _v: u128) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("u128"))
        }

        fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("f32"))
        }

        fn serialize_char(self, _v: char) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("char"))
        }

        fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
            Err(self.reject("bytes"))
        }

        fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
            Err(self.reject(format!("unit struct {name}")))
        }

        fn serialize_unit_variant(
            self,
            name: &'static str,
            _variant_index: u32,
            variant: &'static str,
        ) -> Result<Self::Ok, Self::Error> {
            Err(self.reject(format!("enum {name}::{variant}")))
        }

        fn serialize_newtype_variant<T: ?Sized + Serialize>(
            self,
            name: &'static str,
            _variant_index: u32,
            variant: &'static str,
            _value: &T,
        ) -> Result<Self::Ok, Self::Error> {
            Err(self.reject(format!("enum {name}::{variant}")))
        }

        fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
            Err(self.reject("tuple"))
        }

        fn serialize_tuple_struct(
            self,
            name: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleStruct, Self::Error> {
            Err(self.reject(format!("tuple struct {name}")))
        }

        fn serialize_tuple_variant(
            self,
            name: &'static str,
            _variant_index: u32,
            variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleVariant, Self::Error> {
            Err(self.reject(format!("enum {name}::{variant}")))
        }

        fn serialize_struct_variant(
            self,
            name: &'static str,
            _variant_index: u32,
            variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeStructVariant, Self::Error> {
            Err(self.reject(format!("enum {name}::{variant}")))
        }
    };
}

// ============================================================================
// Record
// ============================================================================

/// Top-level serializer: only structs and string-keyed maps are records.
pub(super) struct RecordSerializer;

impl RecordSerializer {
    #[allow(clippy::unused_self)]
    fn reject(&self, type_name: impl fmt::Display) -> EncodeError {
        EncodeError::NotARecord {
            type_name: type_name.to_string(),
        }
    }
}

impl ser::Serializer for RecordSerializer {
    type Ok = WireForm;
    type Error = EncodeError;
    type SerializeSeq = Impossible<WireForm, EncodeError>;
    type SerializeTuple = Impossible<WireForm, EncodeError>;
    type SerializeTupleStruct = Impossible<WireForm, EncodeError>;
    type SerializeTupleVariant = Impossible<WireForm, EncodeError>;
    type SerializeMap = RecordFields;
    type SerializeStruct = RecordFields;
    type SerializeStructVariant = Impossible<WireForm, EncodeError>;

    reject_unsupported!();

    fn serialize_bool(self, _v: bool) -> Result<WireForm, EncodeError> {
        Err(self.reject("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<WireForm, EncodeError> {
        Err(self.reject("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<WireForm, EncodeError> {
        Err(self.reject("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<WireForm, EncodeError> {
        Err(self.reject("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<WireForm, EncodeError> {
        Err(self.reject("i64"))
    }

    fn serialize_f64(self, _v: f64) -> Result<WireForm, EncodeError> {
        Err(self.reject("f64"))
    }

    fn serialize_str(self, _v: &str) -> Result<WireForm, EncodeError> {
        Err(self.reject("str"))
    }

    fn serialize_none(self) -> Result<WireForm, EncodeError> {
        Err(self.reject("none"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<WireForm, EncodeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<WireForm, EncodeError> {
        Err(self.reject("unit"))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<WireForm, EncodeError> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(self.reject("sequence"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<RecordFields, EncodeError> {
        Ok(RecordFields::default())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<RecordFields, EncodeError> {
        Ok(RecordFields::default())
    }
}

/// Collects the fields of a record into a form.
#[derive(Default)]
pub(super) struct RecordFields {
    form: WireForm,
    pending_key: Option<String>,
}

impl ser::SerializeStruct for RecordFields {
    type Ok = WireForm;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        value.serialize(FieldSerializer::new(&mut self.form, key))
    }

    fn end(self) -> Result<WireForm, EncodeError> {
        Ok(self.form)
    }
}

impl ser::SerializeMap for RecordFields {
    type Ok = WireForm;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.pending_key = Some(key.serialize(TextSerializer::new("<key>", "record key of type "))?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| EncodeError::Custom("map value serialized before its key".to_string()))?;
        value.serialize(FieldSerializer::new(&mut self.form, &key))
    }

    fn end(self) -> Result<WireForm, EncodeError> {
        Ok(self.form)
    }
}

// ============================================================================
// Field
// ============================================================================

/// Applies the inclusion rule of one field and writes it into the form.
struct FieldSerializer<'a> {
    form: &'a mut WireForm,
    field: &'a str,
    /// Set once the value has been unwrapped from `Some`.
    optional: bool,
}

impl<'a> FieldSerializer<'a> {
    fn new(form: &'a mut WireForm, field: &'a str) -> Self {
        Self {
            form,
            field,
            optional: false,
        }
    }

    fn reject(&self, type_name: impl fmt::Display) -> EncodeError {
        if self.optional {
            EncodeError::unsupported(self.field, format!("optional {type_name}"))
        } else {
            EncodeError::unsupported(self.field, type_name.to_string())
        }
    }

    fn integer(self, value: i64, type_name: &str) -> Result<(), EncodeError> {
        if self.optional {
            return Err(self.reject(type_name));
        }
        if value != 0 {
            self.form.insert(self.field, value.to_string());
        }
        Ok(())
    }
}

impl<'a> ser::Serializer for FieldSerializer<'a> {
    type Ok = ();
    type Error = EncodeError;
    type SerializeSeq = WordList<'a>;
    type SerializeTuple = Impossible<(), EncodeError>;
    type SerializeTupleStruct = Impossible<(), EncodeError>;
    type SerializeTupleVariant = Impossible<(), EncodeError>;
    type SerializeMap = MapEntries<'a>;
    type SerializeStruct = Impossible<(), EncodeError>;
    type SerializeStructVariant = Impossible<(), EncodeError>;

    reject_unsupported!();

    fn serialize_bool(self, v: bool) -> Result<(), EncodeError> {
        // Only `Option<bool>` is part of the wire format.
        if !self.optional {
            return Err(self.reject("bool"));
        }
        self.form.insert(self.field, v.to_string());
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<(), EncodeError> {
        self.integer(v.into(), "i8")
    }

    fn serialize_i16(self, v: i16) -> Result<(), EncodeError> {
        self.integer(v.into(), "i16")
    }

    fn serialize_i32(self, v: i32) -> Result<(), EncodeError> {
        self.integer(v.into(), "i32")
    }

    fn serialize_i64(self, v: i64) -> Result<(), EncodeError> {
        self.integer(v, "i64")
    }

    fn serialize_f64(self, v: f64) -> Result<(), EncodeError> {
        if self.optional {
            return Err(self.reject("f64"));
        }
        self.form.insert(self.field, format!("{v:.2}"));
        Ok(())
    }

    fn serialize_str(self, v: &str) -> Result<(), EncodeError> {
        // A present optional string is sent even when empty.
        if self.optional || !v.is_empty() {
            self.form.insert(self.field, v);
        }
        Ok(())
    }

    fn serialize_none(self) -> Result<(), EncodeError> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), EncodeError> {
        if self.optional {
            return Err(self.reject("option"));
        }
        value.serialize(FieldSerializer {
            optional: true,
            ..self
        })
    }

    fn serialize_unit(self) -> Result<(), EncodeError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<WordList<'a>, EncodeError> {
        if self.optional {
            return Err(self.reject("list"));
        }
        Ok(WordList {
            form: self.form,
            field: self.field,
            words: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapEntries<'a>, EncodeError> {
        if self.optional {
            return Err(self.reject("map"));
        }
        Ok(MapEntries {
            form: self.form,
            field: self.field,
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(self.reject(format!("struct {name}")))
    }
}

/// List of strings, sent space-separated.
struct WordList<'a> {
    form: &'a mut WireForm,
    field: &'a str,
    words: Vec<String>,
}

impl ser::SerializeSeq for WordList<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let word = value.serialize(TextSerializer::new(self.field, "list of "))?;
        self.words.push(word);
        Ok(())
    }

    fn end(self) -> Result<(), EncodeError> {
        if !self.words.is_empty() {
            self.form.insert(self.field, self.words.join(" "));
        }
        Ok(())
    }
}

/// String map, expanded into one `field[key]` entry per pair.
struct MapEntries<'a> {
    form: &'a mut WireForm,
    field: &'a str,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapEntries<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.pending_key = Some(key.serialize(TextSerializer::new(self.field, "map key of type "))?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| EncodeError::Custom("map value serialized before its key".to_string()))?;
        let entry = format!("{}[{key}]", self.field);
        let value = value.serialize(TextSerializer::new(&entry, ""))?;
        self.form.insert(entry, value);
        Ok(())
    }

    fn end(self) -> Result<(), EncodeError> {
        Ok(())
    }
}

// ============================================================================
// Text
// ============================================================================

/// Accepts string values only.
struct TextSerializer<'a> {
    field: &'a str,
    context: &'static str,
}

impl<'a> TextSerializer<'a> {
    const fn new(field: &'a str, context: &'static str) -> Self {
        Self { field, context }
    }

    fn reject(&self, type_name: impl fmt::Display) -> EncodeError {
        EncodeError::unsupported(self.field, format!("{}{type_name}", self.context))
    }
}

impl ser::Serializer for TextSerializer<'_> {
    type Ok = String;
    type Error = EncodeError;
    type SerializeSeq = Impossible<String, EncodeError>;
    type SerializeTuple = Impossible<String, EncodeError>;
    type SerializeTupleStruct = Impossible<String, EncodeError>;
    type SerializeTupleVariant = Impossible<String, EncodeError>;
    type SerializeMap = Impossible<String, EncodeError>;
    type SerializeStruct = Impossible<String, EncodeError>;
    type SerializeStructVariant = Impossible<String, EncodeError>;

    reject_unsupported!();

    fn serialize_bool(self, _v: bool) -> Result<String, EncodeError> {
        Err(self.reject("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String, EncodeError> {
        Err(self.reject("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String, EncodeError> {
        Err(self.reject("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String, EncodeError> {
        Err(self.reject("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String, EncodeError> {
        Err(self.reject("i64"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, EncodeError> {
        Err(self.reject("f64"))
    }

    fn serialize_str(self, v: &str) -> Result<String, EncodeError> {
        Ok(v.to_string())
    }

    fn serialize_none(self) -> Result<String, EncodeError> {
        Err(self.reject("none"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String, EncodeError> {
        Err(self.reject("option"))
    }

    fn serialize_unit(self) -> Result<String, EncodeError> {
        Err(self.reject("unit"))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, EncodeError> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(self.reject("list"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(self.reject("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(self.reject(format!("struct {name}")))
    }
}
