//! Typed values to dynamic values and back
//!
//! [`Reflect`] stands in for runtime introspection: each serializable type
//! states its tag and how it converts to and from a [`Value`]. Composite and
//! enum types additionally implement [`CompositeType`] / [`EnumType`] so the
//! [`TypeRegistry`](super::TypeRegistry) can describe them by name.

use glam::{Quat, Vec3};

use super::tag::{SeqKind, TypeTag};
use super::value::{CompositeValue, EnumValue, Sequence, Value};
use crate::assets::{AssetKind, AssetRef};

/// Conversion between a typed value and the codec's dynamic [`Value`]
pub trait Reflect: Sized {
    /// Declared type of values of this type
    fn type_tag() -> TypeTag;
    /// Capture the current value
    fn to_value(&self) -> Value;
    /// Rebuild from a value; `None` when the shape does not match
    fn from_value(value: Value) -> Option<Self>;
}

/// A value-object type with a registered field table
pub trait CompositeType: Reflect + Default + 'static {
    const TYPE_NAME: &'static str;

    /// Instance fields in declaration order
    fn fields() -> Vec<(&'static str, TypeTag)>;
}

/// An enumeration carried by variant name
pub trait EnumType: Reflect + Default + 'static {
    const TYPE_NAME: &'static str;
    /// Variant names; the first is the default
    const VARIANTS: &'static [&'static str];
}

macro_rules! reflect_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_tag() -> TypeTag {
                    TypeTag::$variant
                }

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

reflect_primitive!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

impl Reflect for String {
    fn type_tag() -> TypeTag {
        TypeTag::Str
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

fn sequence_of<T: Reflect>(kind: SeqKind, items: &[T]) -> Value {
    Value::Seq(Sequence {
        kind,
        element: T::type_tag(),
        items: items.iter().map(T::to_value).collect(),
    })
}

fn items_of<T: Reflect>(kind: SeqKind, value: Value) -> Option<Vec<T>> {
    match value {
        Value::Seq(seq) if seq.kind == kind => seq.items.into_iter().map(T::from_value).collect(),
        _ => None,
    }
}

/// Growable ordered list
impl<T: Reflect> Reflect for Vec<T> {
    fn type_tag() -> TypeTag {
        TypeTag::list(T::type_tag())
    }

    fn to_value(&self) -> Value {
        sequence_of(SeqKind::List, self)
    }

    fn from_value(value: Value) -> Option<Self> {
        items_of(SeqKind::List, value)
    }
}

/// Fixed array, sized at construction
impl<T: Reflect> Reflect for Box<[T]> {
    fn type_tag() -> TypeTag {
        TypeTag::array(T::type_tag())
    }

    fn to_value(&self) -> Value {
        sequence_of(SeqKind::Array, self)
    }

    fn from_value(value: Value) -> Option<Self> {
        items_of(SeqKind::Array, value).map(Vec::into_boxed_slice)
    }
}

impl<K: AssetKind> Reflect for AssetRef<K> {
    fn type_tag() -> TypeTag {
        TypeTag::asset(K::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        match self.handle() {
            Some(handle) => Value::Asset(handle.clone()),
            None => Value::None,
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Asset(handle) => Some(AssetRef::new(handle)),
            Value::None => Some(AssetRef::none()),
            _ => None,
        }
    }
}

impl Reflect for Vec3 {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        let [x, y, z] = self.to_array();
        CompositeValue::new(Self::TYPE_NAME)
            .with("x", &x)
            .with("y", &y)
            .with("z", &z)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        Some(Vec3::new(c.take("x")?, c.take("y")?, c.take("z")?))
    }
}

impl CompositeType for Vec3 {
    const TYPE_NAME: &'static str = "Vec3";

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![("x", TypeTag::F32), ("y", TypeTag::F32), ("z", TypeTag::F32)]
    }
}

impl Reflect for Quat {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        let [x, y, z, w] = self.to_array();
        CompositeValue::new(Self::TYPE_NAME)
            .with("x", &x)
            .with("y", &y)
            .with("z", &z)
            .with("w", &w)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        Some(Quat::from_xyzw(
            c.take("x")?,
            c.take("y")?,
            c.take("z")?,
            c.take("w")?,
        ))
    }
}

impl CompositeType for Quat {
    const TYPE_NAME: &'static str = "Quat";

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![
            ("x", TypeTag::F32),
            ("y", TypeTag::F32),
            ("z", TypeTag::F32),
            ("w", TypeTag::F32),
        ]
    }
}

/// Capture an enum constant by variant name
pub fn enum_value<E: EnumType>(variant: &str) -> Value {
    EnumValue::new(E::TYPE_NAME, variant).into()
}

/// Index of an enum constant's variant, if the value is a known variant of `E`
pub fn enum_index<E: EnumType>(value: Value) -> Option<usize> {
    let variant = value.into_variant(E::TYPE_NAME)?;
    E::VARIANTS.iter().position(|v| *v == variant)
}
