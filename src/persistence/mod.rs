//! Save/load of component state
//!
//! Features:
//! - Per-component capture into named, typed text fields
//! - Apply with field, component and entity isolation
//! - Versioned saves with mismatch warnings
//! - Late registration: items added after a load still get their state

pub mod apply;
pub mod capture;
pub mod context;
pub mod header;
pub mod manager;

pub use apply::{ApplyStats, apply_item_state, apply_property_state};
pub use capture::{build_item_state, build_property_state};
pub use context::{Registry, RegistryBuilder, SaveContext};
pub use header::SaveHeader;
pub use manager::{SaveEvent, SaveManager};
