//! Prioritised boolean state
//!
//! Several systems can ask for a flag to be on or off; the highest-priority
//! request wins and the lens falls back to its default when nobody asks.

use crate::codec::{CompositeType, CompositeValue, Reflect, TypeTag, Value};

/// One system's request on a [`BoolLens`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LensRequest {
    pub priority: i32,
    pub value: bool,
}

impl Reflect for LensRequest {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::TYPE_NAME)
            .with("priority", &self.priority)
            .with("value", &self.value)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        Some(Self {
            priority: c.take("priority")?,
            value: c.take("value")?,
        })
    }
}

impl CompositeType for LensRequest {
    const TYPE_NAME: &'static str = "LensRequest";

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![("priority", TypeTag::I32), ("value", TypeTag::Bool)]
    }
}

/// Boolean resolved from prioritised requests
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoolLens {
    pub default: bool,
    pub requests: Vec<LensRequest>,
}

impl BoolLens {
    pub fn new(default: bool) -> Self {
        Self {
            default,
            requests: Vec::new(),
        }
    }

    /// Add a request; ties go to the most recent one
    pub fn request(&mut self, priority: i32, value: bool) {
        self.requests.push(LensRequest { priority, value });
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// Resolved value
    pub fn value(&self) -> bool {
        self.requests
            .iter()
            .max_by_key(|r| r.priority)
            .map_or(self.default, |r| r.value)
    }
}

impl Reflect for BoolLens {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::TYPE_NAME)
            .with("default", &self.default)
            .with("requests", &self.requests)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        Some(Self {
            default: c.take("default")?,
            requests: c.take("requests")?,
        })
    }
}

impl CompositeType for BoolLens {
    const TYPE_NAME: &'static str = crate::consts::BOOL_STATE_TYPE;

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![
            ("default", TypeTag::Bool),
            ("requests", Vec::<LensRequest>::type_tag()),
        ]
    }
}
