//! Savegraph - snapshot persistence for component-based simulations
//!
//! Core modules:
//! - `codec`: Typed values to self-describing text and back
//! - `schema`: Per-component-type member discovery and lookup
//! - `snapshot`: Serializable world/item/component state records
//! - `persistence`: Capture, apply and the save manager
//! - `sim`: Items, components and shared state types
//! - `platform`: Storage backends for save text
//! - `settings`: User-facing save configuration

pub mod assets;
pub mod codec;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod schema;
pub mod settings;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
pub use settings::{SaveSettings, TextFormat};

/// Persistence constants
pub mod consts {
    /// Version stamped into every save; bump when saved layouts change
    pub const SAVE_VERSION: i32 = 0;

    /// Root of every registered component hierarchy
    pub const BASE_COMPONENT: &str = "PropertyItem";
    /// Membership query injected into every component schema
    pub const HAS_PROPERTY: &str = "HasProperty";
    /// Methods whose name contains this are assumed to mutate and never discovered
    pub const MUTATION_MARKER: &str = "Try";
    /// Composite type name of the prioritised boolean wrapper
    pub const BOOL_STATE_TYPE: &str = "BoolLens";

    /// Label prefix of sequence elements
    pub const ELEMENT_PREFIX: &str = "Element";
    /// Maximum nesting depth the codec will follow
    pub const MAX_DEPTH: usize = 64;

    /// Unique name of the save manager's own item
    pub const SAVE_MANAGER_ITEM: &str = "SaveManager";
    /// Component carrying the save version stamp
    pub const SAVE_HEADER: &str = "SaveHeader";
    /// Property holding the save version
    pub const SAVE_VERSION_PROPERTY: &str = "SaveVersion";
}
