//! Named field/type/value triples and the envelopes built from them

use serde::{Deserialize, Serialize};

use crate::codec::{CompositeType, CompositeValue, Reflect, TypeTag, Value};

/// One captured member: name, type identifier and encoded text
///
/// An empty `value` means "use the type's default", not "empty string".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Type identifier as rendered by [`TypeTag`]; parsed lazily on decode
    #[serde(rename = "type")]
    pub type_id: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, tag: &TypeTag, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: tag.to_string(),
            value: value.into(),
        }
    }

    /// Parse the type identifier
    pub fn type_tag(&self) -> crate::Result<TypeTag> {
        self.type_id.parse()
    }

    /// True when the value is the default sentinel
    pub fn is_default(&self) -> bool {
        self.value.is_empty()
    }
}

impl Reflect for Field {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::TYPE_NAME)
            .with("name", &self.name)
            .with("type", &self.type_id)
            .with("value", &self.value)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        Some(Self {
            name: c.take("name")?,
            type_id: c.take("type")?,
            value: c.take("value")?,
        })
    }
}

impl CompositeType for Field {
    const TYPE_NAME: &'static str = "Field";

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![
            ("name", TypeTag::Str),
            ("type", TypeTag::Str),
            ("value", TypeTag::Str),
        ]
    }
}

/// Encoded array or list; items are labelled `Element0`, `Element1`, ...
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceEnvelope {
    pub element_type: String,
    #[serde(default)]
    pub items: Vec<Field>,
}

/// Encoded value-object: its type and one item per instance field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompositeEnvelope {
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub items: Vec<Field>,
}

/// Positional label of a sequence element
pub fn element_label(index: usize) -> String {
    format!("{}{}", crate::consts::ELEMENT_PREFIX, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_json_uses_type_key() {
        let field = Field::new("intTest", &TypeTag::I32, "5");
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(json, r#"{"name":"intTest","type":"i32","value":"5"}"#);
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn test_sequence_envelope_camel_case() {
        let env = SequenceEnvelope {
            element_type: "i32".to_string(),
            items: vec![Field::new(element_label(0), &TypeTag::I32, "1")],
        };
        let json = serde_json::to_string(&env).unwrap();
        assert!(json.contains("\"elementType\":\"i32\""));
        assert!(json.contains("\"name\":\"Element0\""));
    }

    #[test]
    fn test_field_bad_type_is_error() {
        let field = Field {
            name: "x".to_string(),
            type_id: "UnityEngine.Vector3, UnityEngine".to_string(),
            value: String::new(),
        };
        assert!(field.type_tag().is_err());
        assert!(field.is_default());
    }
}
