//! Component type descriptions
//!
//! - [`ComponentType`]: declared members, parent and factory of one type
//! - [`ComponentRegistry`]: every type, rooted at the base component
//! - [`SchemaCache`]: members discovered for save/load queries

pub mod cache;
pub mod component_type;
pub mod member;
pub mod registry;

pub use cache::{SchemaCache, TypeSchema};
pub use component_type::{ComponentType, ComponentTypeBuilder, Factory};
pub use member::{
    Capability, Getter, Member, MemberDescriptor, MemberKind, Param, Setter, Visibility,
};
pub use registry::{Ancestors, ComponentRegistry};
