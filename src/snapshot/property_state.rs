//! One component's snapshot

use serde::{Deserialize, Serialize};

use super::field::Field;
use crate::codec::{CompositeType, CompositeValue, Reflect, TypeTag, Value};

/// Captured state of one component
///
/// `properties` holds readable members (including discovered query methods),
/// `fields` holds explicitly marked storage fields. The two groups are
/// re-applied through different member lookups on load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyState {
    pub type_name: String,
    #[serde(default)]
    pub properties: Vec<Field>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl PropertyState {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&Field> {
        self.properties.iter().find(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up an entry by name, fields first
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.field(name).or_else(|| self.property(name))
    }

    /// Append a property unless one with the same name was already captured
    pub fn push_property(&mut self, field: Field) -> bool {
        if self.property(&field.name).is_some() {
            return false;
        }
        self.properties.push(field);
        true
    }

    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn len(&self) -> usize {
        self.properties.len() + self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.fields.is_empty()
    }
}

impl Reflect for PropertyState {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::TYPE_NAME)
            .with("typeName", &self.type_name)
            .with("properties", &self.properties)
            .with("fields", &self.fields)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        Some(Self {
            type_name: c.take("typeName")?,
            properties: c.take("properties")?,
            fields: c.take("fields")?,
        })
    }
}

impl CompositeType for PropertyState {
    const TYPE_NAME: &'static str = "PropertyState";

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![
            ("typeName", TypeTag::Str),
            ("properties", Vec::<Field>::type_tag()),
            ("fields", Vec::<Field>::type_tag()),
        ]
    }
}
