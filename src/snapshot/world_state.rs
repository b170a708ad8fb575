//! Save file root

use serde::{Deserialize, Serialize};

use super::item_state::ItemState;

/// Every persisted entity in one save
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldState {
    #[serde(default)]
    pub items: Vec<ItemState>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// First snapshot of the given entity kind
    pub fn item(&self, item_name: &str) -> Option<&ItemState> {
        self.items.iter().find(|i| i.item_name == item_name)
    }

    /// Snapshot for a save identity; the last entry wins when identities repeat
    pub fn by_unique(&self, unique_name: &str) -> Option<&ItemState> {
        self.items.iter().rev().find(|i| i.matches_unique(unique_name))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
