//! One entity's snapshot

use serde::{Deserialize, Serialize};

use super::property_state::PropertyState;
use crate::codec::{CompositeType, CompositeValue, Reflect, TypeTag, Value};

/// Captured state of one entity and all of its components
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemState {
    /// Save identity; unique per world by convention, not enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
    /// Entity kind, used to re-instantiate the entity
    pub item_name: String,
    #[serde(default)]
    pub components: Vec<PropertyState>,
}

impl ItemState {
    pub fn new(item_name: impl Into<String>, unique_name: Option<String>) -> Self {
        Self {
            unique_name,
            item_name: item_name.into(),
            components: Vec::new(),
        }
    }

    /// Component snapshot by type name
    pub fn component(&self, type_name: &str) -> Option<&PropertyState> {
        self.components.iter().find(|c| c.type_name == type_name)
    }

    pub fn component_mut(&mut self, type_name: &str) -> Option<&mut PropertyState> {
        self.components.iter_mut().find(|c| c.type_name == type_name)
    }

    /// True if this snapshot belongs to the entity with the given save identity
    pub fn matches_unique(&self, unique_name: &str) -> bool {
        self.unique_name.as_deref() == Some(unique_name)
    }
}

/// Nested snapshots let a component carry other entities, e.g. a container's contents.
/// An anonymous entity stores an empty unique name.
impl Reflect for ItemState {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        let unique_name = self.unique_name.clone().unwrap_or_default();
        CompositeValue::new(Self::TYPE_NAME)
            .with("uniqueName", &unique_name)
            .with("itemName", &self.item_name)
            .with("components", &self.components)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        let unique_name: String = c.take("uniqueName")?;
        Some(Self {
            unique_name: Some(unique_name).filter(|u| !u.is_empty()),
            item_name: c.take("itemName")?,
            components: c.take("components")?,
        })
    }
}

impl CompositeType for ItemState {
    const TYPE_NAME: &'static str = "ItemState";

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![
            ("uniqueName", TypeTag::Str),
            ("itemName", TypeTag::Str),
            ("components", Vec::<PropertyState>::type_tag()),
        ]
    }
}
