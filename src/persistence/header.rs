//! Save version stamp
//!
//! The save manager's own item carries a [`SaveHeader`] whose `SaveVersion`
//! property is captured like any other state. Applying it compares the saved
//! version against this build's and logs a mismatch; loading continues.

use std::any::Any;

use crate::consts::{SAVE_HEADER, SAVE_VERSION, SAVE_VERSION_PROPERTY};
use crate::schema::ComponentType;
use crate::sim::Component;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    version: i32,
    loaded: Option<i32>,
}

impl Default for SaveHeader {
    fn default() -> Self {
        Self::new(SAVE_VERSION)
    }
}

impl SaveHeader {
    pub fn new(version: i32) -> Self {
        Self {
            version,
            loaded: None,
        }
    }

    pub fn component_type() -> ComponentType {
        ComponentType::builder::<SaveHeader>(SAVE_HEADER)
            .default_factory()
            .property(
                SAVE_VERSION_PROPERTY,
                |h| h.version,
                |h, v| h.record_loaded(v),
            )
            .private()
            .saved()
            .build()
    }

    /// Version this build writes
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Version found in the last applied save
    pub fn loaded(&self) -> Option<i32> {
        self.loaded
    }

    pub fn is_mismatched(&self) -> bool {
        self.loaded.is_some_and(|v| v != self.version)
    }

    fn record_loaded(&mut self, saved: i32) {
        if saved < self.version {
            log::error!(
                "Loading old save file (v{} < v{}), some data may be lost",
                saved,
                self.version
            );
        } else if saved > self.version {
            log::error!(
                "Save file v{} is newer than this build (v{}), some data may be lost",
                saved,
                self.version
            );
        }
        self.loaded = Some(saved);
    }
}

impl Component for SaveHeader {
    fn type_name(&self) -> &'static str {
        SAVE_HEADER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
