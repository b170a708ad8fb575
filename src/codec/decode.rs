//! Text to value

use std::str::FromStr;

use super::tag::SeqKind;
use super::value::{EnumValue, Sequence, Value};
use super::{TypeTag, ValueCodec};
use crate::error::{Error, Result};
use crate::snapshot::{CompositeEnvelope, SequenceEnvelope};

impl ValueCodec<'_> {
    pub(super) fn decode_at(&self, text: &str, tag: &TypeTag, depth: usize) -> Result<Value> {
        Self::check_depth(depth)?;

        if text.is_empty() {
            return self.types.default_value(tag);
        }

        match tag {
            TypeTag::Array(element) => self.decode_sequence(text, SeqKind::Array, element, depth),
            TypeTag::List(element) => self.decode_sequence(text, SeqKind::List, element, depth),
            TypeTag::Str => Ok(Value::Str(text.to_string())),
            TypeTag::Asset(name) => self.decode_asset(text, name),
            TypeTag::Composite(name) => self.decode_composite(text, name, depth),
            TypeTag::Enum(name) => self.decode_enum(text, name),
            TypeTag::Bool => parse_bool(text).map(Value::Bool),
            TypeTag::I8 => parse(text, tag).map(Value::I8),
            TypeTag::I16 => parse(text, tag).map(Value::I16),
            TypeTag::I32 => parse(text, tag).map(Value::I32),
            TypeTag::I64 => parse(text, tag).map(Value::I64),
            TypeTag::U8 => parse(text, tag).map(Value::U8),
            TypeTag::U16 => parse(text, tag).map(Value::U16),
            TypeTag::U32 => parse(text, tag).map(Value::U32),
            TypeTag::U64 => parse(text, tag).map(Value::U64),
            TypeTag::F32 => parse(text, tag).map(Value::F32),
            TypeTag::F64 => parse(text, tag).map(Value::F64),
        }
    }

    fn decode_sequence(
        &self,
        text: &str,
        kind: SeqKind,
        element: &TypeTag,
        depth: usize,
    ) -> Result<Value> {
        self.types.resolve(element)?;
        let envelope: SequenceEnvelope = serde_json::from_str(text)?;

        match envelope.element_type.parse::<TypeTag>() {
            Ok(saved) if &saved == element => {}
            _ => log::warn!(
                "Sequence saved as {} decoded as {}",
                envelope.element_type,
                element
            ),
        }

        // Elements are positional: one bad element fails the whole sequence
        let mut seq = Sequence::new(kind, element.clone());
        seq.items.reserve(envelope.items.len());
        for item in &envelope.items {
            seq.items.push(self.decode_at(&item.value, element, depth + 1)?);
        }
        Ok(seq.into())
    }

    fn decode_asset(&self, text: &str, name: &str) -> Result<Value> {
        let schema = self
            .types
            .asset(name)
            .ok_or_else(|| Error::UnresolvedType(TypeTag::asset(name).to_string()))?;

        match self.assets.lookup_by_name(&schema.resource_path, text) {
            Some(handle) => Ok(Value::Asset(handle)),
            None => {
                log::debug!("Asset {} not found in {}", text, schema.resource_path);
                Ok(Value::None)
            }
        }
    }

    fn decode_composite(&self, text: &str, name: &str, depth: usize) -> Result<Value> {
        let tag = TypeTag::composite(name);
        let schema = self
            .types
            .composite(name)
            .ok_or_else(|| Error::UnresolvedType(tag.to_string()))?;
        let envelope: CompositeEnvelope = serde_json::from_str(text)?;

        if envelope.type_id != tag.to_string() {
            log::warn!("Composite saved as {} decoded as {}", envelope.type_id, tag);
        }

        let mut composite = schema
            .default_value()
            .into_composite(name)
            .ok_or_else(|| Error::TypeMismatch {
                member: name.to_string(),
                expected: tag.to_string(),
            })?;

        for item in &envelope.items {
            let Some(field_tag) = schema.field_tag(&item.name) else {
                log::debug!("Skipping unknown field {}.{}", name, item.name);
                continue;
            };
            // A field that fails to decode keeps its default
            match self.decode_at(&item.value, field_tag, depth + 1) {
                Ok(value) => composite.set(&item.name, value),
                Err(e) => log::warn!("Skipping field {}.{}: {}", name, item.name, e),
            }
        }

        Ok(composite.into())
    }

    fn decode_enum(&self, text: &str, name: &str) -> Result<Value> {
        let schema = self
            .types
            .enumeration(name)
            .ok_or_else(|| Error::UnresolvedType(TypeTag::enumeration(name).to_string()))?;
        if !schema.contains(text) {
            return Err(Error::UnknownVariant {
                type_name: name.to_string(),
                variant: text.to_string(),
            });
        }
        Ok(EnumValue::new(name, text).into())
    }
}

fn parse<T: FromStr>(text: &str, tag: &TypeTag) -> Result<T> {
    text.trim().parse().map_err(|_| Error::Parse {
        tag: tag.to_string(),
        text: text.to_string(),
    })
}

fn parse_bool(text: &str) -> Result<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::Parse {
            tag: TypeTag::Bool.to_string(),
            text: text.to_string(),
        })
    }
}
