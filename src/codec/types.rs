//! Registered value types
//!
//! The codec only resolves named types (composites, enums, assets) that were
//! registered here at startup. Anything else is an unresolvable identifier.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use super::reflect::{CompositeType, EnumType};
use super::tag::TypeTag;
use super::value::{EnumValue, Sequence, Value};
use crate::assets::AssetKind;
use crate::error::{Error, Result};
use crate::sim::{BoolLens, LensRequest};
use crate::snapshot::{Field, ItemState, PropertyState};

/// Field table of a registered value-object type
#[derive(Debug, Clone)]
pub struct CompositeSchema {
    pub name: String,
    /// Instance fields in declaration order
    pub fields: Vec<(String, TypeTag)>,
    default: fn() -> Value,
}

impl CompositeSchema {
    /// Declared tag of a field, by name
    pub fn field_tag(&self, name: &str) -> Option<&TypeTag> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// A default-constructed instance
    pub fn default_value(&self) -> Value {
        (self.default)()
    }
}

#[derive(Debug, Clone)]
pub struct EnumSchema {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumSchema {
    pub fn contains(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }
}

#[derive(Debug, Clone)]
pub struct AssetSchema {
    pub name: String,
    /// Namespace searched when resolving saved names
    pub resource_path: String,
}

/// Startup-time registry of named value types
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    composites: HashMap<String, CompositeSchema>,
    enums: HashMap<String, EnumSchema>,
    assets: HashMap<String, AssetSchema>,
}

impl TypeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the math, lens and snapshot types
    pub fn with_builtins() -> Self {
        let mut types = Self::new();
        types
            .register_composite::<Vec3>()
            .register_composite::<Quat>()
            .register_composite::<LensRequest>()
            .register_composite::<BoolLens>()
            .register_composite::<Field>()
            .register_composite::<PropertyState>()
            .register_composite::<ItemState>();
        types
    }

    pub fn register_composite<T: CompositeType>(&mut self) -> &mut Self {
        let schema = CompositeSchema {
            name: T::TYPE_NAME.to_string(),
            fields: T::fields()
                .into_iter()
                .map(|(name, tag)| (name.to_string(), tag))
                .collect(),
            default: || T::default().to_value(),
        };
        if self.composites.insert(schema.name.clone(), schema).is_some() {
            log::warn!("Composite type {} registered twice", T::TYPE_NAME);
        }
        self
    }

    pub fn register_enum<E: EnumType>(&mut self) -> &mut Self {
        let schema = EnumSchema {
            name: E::TYPE_NAME.to_string(),
            variants: E::VARIANTS.iter().map(|v| v.to_string()).collect(),
        };
        self.enums.insert(schema.name.clone(), schema);
        self
    }

    pub fn register_asset<K: AssetKind>(&mut self) -> &mut Self {
        let schema = AssetSchema {
            name: K::TYPE_NAME.to_string(),
            resource_path: K::RESOURCE_PATH.to_string(),
        };
        self.assets.insert(schema.name.clone(), schema);
        self
    }

    pub fn composite(&self, name: &str) -> Option<&CompositeSchema> {
        self.composites.get(name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumSchema> {
        self.enums.get(name)
    }

    pub fn asset(&self, name: &str) -> Option<&AssetSchema> {
        self.assets.get(name)
    }

    /// Check that every named type inside `tag` is registered
    pub fn resolve(&self, tag: &TypeTag) -> Result<()> {
        let known = match tag {
            TypeTag::Enum(name) => self.enums.contains_key(name),
            TypeTag::Composite(name) => self.composites.contains_key(name),
            TypeTag::Asset(name) => self.assets.contains_key(name),
            TypeTag::Array(element) | TypeTag::List(element) => return self.resolve(element),
            _ => true,
        };
        if known {
            Ok(())
        } else {
            Err(Error::UnresolvedType(tag.to_string()))
        }
    }

    /// Default value of a type: zero, empty, first variant, default instance
    pub fn default_value(&self, tag: &TypeTag) -> Result<Value> {
        let value = match tag {
            TypeTag::Bool => Value::Bool(false),
            TypeTag::I8 => Value::I8(0),
            TypeTag::I16 => Value::I16(0),
            TypeTag::I32 => Value::I32(0),
            TypeTag::I64 => Value::I64(0),
            TypeTag::U8 => Value::U8(0),
            TypeTag::U16 => Value::U16(0),
            TypeTag::U32 => Value::U32(0),
            TypeTag::U64 => Value::U64(0),
            TypeTag::F32 => Value::F32(0.0),
            TypeTag::F64 => Value::F64(0.0),
            TypeTag::Str => Value::Str(String::new()),
            TypeTag::Enum(name) => {
                let schema = self
                    .enumeration(name)
                    .ok_or_else(|| Error::UnresolvedType(tag.to_string()))?;
                let first = schema
                    .variants
                    .first()
                    .ok_or_else(|| Error::UnresolvedType(tag.to_string()))?;
                EnumValue::new(name.as_str(), first.as_str()).into()
            }
            TypeTag::Array(_) | TypeTag::List(_) => {
                self.resolve(tag)?;
                let (kind, element) = tag
                    .as_sequence()
                    .ok_or_else(|| Error::UnresolvedType(tag.to_string()))?;
                Sequence::new(kind, element.clone()).into()
            }
            TypeTag::Composite(name) => self
                .composite(name)
                .ok_or_else(|| Error::UnresolvedType(tag.to_string()))?
                .default_value(),
            TypeTag::Asset(_) => {
                self.resolve(tag)?;
                Value::None
            }
        };
        Ok(value)
    }
}
