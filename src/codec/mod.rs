//! Generic value codec
//!
//! Converts a [`Value`] to self-describing text and back:
//! - absent values encode to the empty default sentinel
//! - arrays and lists become a [`SequenceEnvelope`](crate::snapshot::SequenceEnvelope)
//! - strings are stored verbatim, assets by name
//! - composites become a [`CompositeEnvelope`](crate::snapshot::CompositeEnvelope)
//! - primitives and enum constants use their canonical text
//!
//! Decoding is keyed off the declared [`TypeTag`], never off the text.

mod decode;
mod encode;
pub mod reflect;
pub mod tag;
pub mod types;
pub mod value;

pub use reflect::{CompositeType, EnumType, Reflect, enum_index, enum_value};
pub use tag::{SeqKind, TypeTag};
pub use types::{AssetSchema, CompositeSchema, EnumSchema, TypeRegistry};
pub use value::{CompositeValue, EnumValue, Sequence, Value};

use crate::assets::AssetRegistry;
use crate::error::{Error, Result};
use crate::snapshot::Field;

/// Encoder/decoder bound to a type registry and an asset registry
#[derive(Clone, Copy)]
pub struct ValueCodec<'a> {
    types: &'a TypeRegistry,
    assets: &'a dyn AssetRegistry,
}

impl<'a> ValueCodec<'a> {
    pub fn new(types: &'a TypeRegistry, assets: &'a dyn AssetRegistry) -> Self {
        Self { types, assets }
    }

    pub fn types(&self) -> &'a TypeRegistry {
        self.types
    }

    /// Encode a value to its text form
    pub fn encode(&self, value: &Value) -> Result<String> {
        self.encode_at(value, 0)
    }

    /// Decode text as a value of the declared type
    ///
    /// Empty text yields the type's default value.
    pub fn decode(&self, text: &str, tag: &TypeTag) -> Result<Value> {
        self.decode_at(text, tag, 0)
    }

    /// Encode a named member into a snapshot field
    pub fn encode_field(&self, name: &str, tag: &TypeTag, value: &Value) -> Result<Field> {
        Ok(Field::new(name, tag, self.encode(value)?))
    }

    /// Decode a snapshot field using its own type identifier
    pub fn decode_field(&self, field: &Field) -> Result<Value> {
        let tag = field.type_tag()?;
        self.types.resolve(&tag)?;
        self.decode(&field.value, &tag)
    }

    /// Decode a field straight into a typed value
    pub fn decode_as<T: Reflect>(&self, field: &Field) -> Result<T> {
        let value = self.decode_field(field)?;
        T::from_value(value).ok_or_else(|| Error::TypeMismatch {
            member: field.name.clone(),
            expected: T::type_tag().to_string(),
        })
    }

    pub fn default_value(&self, tag: &TypeTag) -> Result<Value> {
        self.types.default_value(tag)
    }

    fn check_depth(depth: usize) -> Result<()> {
        if depth > crate::consts::MAX_DEPTH {
            return Err(Error::DepthExceeded(crate::consts::MAX_DEPTH));
        }
        Ok(())
    }
}
