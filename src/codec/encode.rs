//! Value to text

use super::value::{CompositeValue, Sequence, Value};
use super::{TypeTag, ValueCodec};
use crate::error::{Error, Result};
use crate::snapshot::field::element_label;
use crate::snapshot::{CompositeEnvelope, Field, SequenceEnvelope};

impl ValueCodec<'_> {
    pub(super) fn encode_at(&self, value: &Value, depth: usize) -> Result<String> {
        Self::check_depth(depth)?;

        // Order matters: sequences and strings before the composite catch-all
        let text = match value {
            Value::None => String::new(),
            Value::Seq(seq) => self.encode_sequence(seq, depth)?,
            Value::Str(s) => s.clone(),
            Value::Asset(handle) => handle.name.clone(),
            Value::Composite(c) => self.encode_composite(c, depth)?,
            Value::Enum(e) => e.variant.clone(),
            Value::Bool(v) => v.to_string(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            // Display gives the shortest text that parses back to the same float
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
        };
        Ok(text)
    }

    fn encode_sequence(&self, seq: &Sequence, depth: usize) -> Result<String> {
        let element_type = seq.element.to_string();
        let items = seq
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| -> Result<Field> {
                Ok(Field {
                    name: element_label(i),
                    type_id: element_type.clone(),
                    value: self.encode_at(item, depth + 1)?,
                })
            })
            .collect::<Result<Vec<Field>>>()?;

        let envelope = SequenceEnvelope {
            element_type,
            items,
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    fn encode_composite(&self, value: &CompositeValue, depth: usize) -> Result<String> {
        let tag = TypeTag::composite(value.type_name.as_str());
        let schema = self
            .types
            .composite(&value.type_name)
            .ok_or_else(|| Error::UnresolvedType(tag.to_string()))?;

        let mut items = Vec::with_capacity(schema.fields.len());
        for (name, field_tag) in &schema.fields {
            let text = match value.get(name) {
                Some(field_value) => self.encode_at(field_value, depth + 1)?,
                // Unset fields fall back to the default sentinel
                None => String::new(),
            };
            items.push(Field::new(name.as_str(), field_tag, text));
        }

        let envelope = CompositeEnvelope {
            type_id: tag.to_string(),
            items,
        };
        Ok(serde_json::to_string(&envelope)?)
    }
}
