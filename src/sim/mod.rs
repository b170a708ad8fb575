//! Items and components
//!
//! The persistence layer only needs a thin view of the simulation:
//! - items with a kind name, an optional unique name and components
//! - components with a registered type name and an optional parent part
//! - load notifications once state has been applied

pub mod component;
pub mod item;
pub mod lens;

pub use component::{Component, downcast_mut, downcast_ref};
pub use item::{Entity, Item};
pub use lens::{BoolLens, LensRequest};
