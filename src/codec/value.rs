//! Dynamic runtime values
//!
//! [`Value`] is the shape the codec dispatches on. Typed Rust values cross into
//! it through [`Reflect`](super::Reflect). It is an owned tree, so a value graph
//! can never contain a cycle.

use super::reflect::Reflect;
use super::tag::{SeqKind, TypeTag};
use crate::assets::AssetHandle;

/// A value captured from (or destined for) a live member
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value; encodes to the empty default sentinel
    #[default]
    None,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Enum(EnumValue),
    Seq(Sequence),
    Composite(CompositeValue),
    Asset(AssetHandle),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Short shape name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Enum(_) => "enum",
            Value::Seq(_) => "sequence",
            Value::Composite(_) => "composite",
            Value::Asset(_) => "asset",
        }
    }

    /// Unwrap a composite of the given type
    pub fn into_composite(self, type_name: &str) -> Option<CompositeValue> {
        match self {
            Value::Composite(c) if c.type_name == type_name => Some(c),
            _ => None,
        }
    }

    /// Unwrap an enum constant of the given type, returning its variant name
    pub fn into_variant(self, type_name: &str) -> Option<String> {
        match self {
            Value::Enum(e) if e.type_name == type_name => Some(e.variant),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeValue> {
        match self {
            Value::Composite(c) => Some(c),
            _ => None,
        }
    }
}

/// An enumerated constant, carried by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }
}

/// An array or list with its declared element type
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub kind: SeqKind,
    pub element: TypeTag,
    pub items: Vec<Value>,
}

impl Sequence {
    pub fn new(kind: SeqKind, element: TypeTag) -> Self {
        Self {
            kind,
            element,
            items: Vec::new(),
        }
    }

    /// The full tag of this sequence (`array<T>` or `list<T>`)
    pub fn type_tag(&self) -> TypeTag {
        match self.kind {
            SeqKind::Array => TypeTag::array(self.element.clone()),
            SeqKind::List => TypeTag::list(self.element.clone()),
        }
    }
}

/// A value-object: type name plus named fields in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl CompositeValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field capture from a typed value
    pub fn with<V: Reflect>(mut self, name: &str, value: &V) -> Self {
        self.set(name, value.to_value());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Replace a field in place, or append it
    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// Remove a field and convert it to a typed value
    pub fn take<V: Reflect>(&mut self, name: &str) -> Option<V> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        let (_, value) = self.fields.remove(index);
        V::from_value(value)
    }
}

impl From<CompositeValue> for Value {
    fn from(c: CompositeValue) -> Self {
        Value::Composite(c)
    }
}

impl From<Sequence> for Value {
    fn from(s: Sequence) -> Self {
        Value::Seq(s)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_set_replaces() {
        let mut c = CompositeValue::new("ClassTest").with("a", &false);
        c.set("a", Value::Bool(true));
        c.set("b", Value::Str("nice".into()));
        assert_eq!(c.fields.len(), 2);
        assert_eq!(c.get("a"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_composite_take_typed() {
        let mut c = CompositeValue::new("ClassTest")
            .with("a", &true)
            .with("b", &"Test".to_string());
        assert_eq!(c.take::<String>("b"), Some("Test".to_string()));
        assert_eq!(c.take::<String>("a"), None);
        assert!(c.fields.is_empty());
    }

    #[test]
    fn test_into_composite_checks_type() {
        let v: Value = CompositeValue::new("A").into();
        assert!(v.clone().into_composite("B").is_none());
        assert!(v.into_composite("A").is_some());
    }
}
