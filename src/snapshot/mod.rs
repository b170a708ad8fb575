//! Snapshot records produced by the codec
//!
//! Plain data: one [`Field`] per captured member, grouped into a
//! [`PropertyState`] per component, an [`ItemState`] per entity and a
//! [`WorldState`] per save file. All are (de)serialized as JSON.

pub mod field;
pub mod item_state;
pub mod property_state;
pub mod world_state;

pub use field::{CompositeEnvelope, Field, SequenceEnvelope};
pub use item_state::ItemState;
pub use property_state::PropertyState;
pub use world_state::WorldState;
