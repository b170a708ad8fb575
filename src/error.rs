//! Error types for the save system
//!
//! Nothing here is fatal to the process: the aggregation layer catches these
//! at field, component and entity boundaries, logs them and moves on.

use std::io;
use thiserror::Error;

/// Result type alias for save/load operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while discovering, encoding, decoding or applying state
#[derive(Debug, Error)]
pub enum Error {
    /// Type identifier does not parse or names an unregistered type
    #[error("Unresolvable type identifier: {0}")]
    UnresolvedType(String),

    /// Enum text does not match any registered variant
    #[error("Unknown variant {variant:?} for enum {type_name}")]
    UnknownVariant { type_name: String, variant: String },

    /// Primitive text failed canonical conversion
    #[error("Cannot parse {text:?} as {tag}")]
    Parse { tag: String, text: String },

    /// Value shape does not match the member's declared type
    #[error("Type mismatch on {member}: expected {expected}")]
    TypeMismatch { member: String, expected: String },

    /// Member name does not resolve on the component type
    #[error("Member {member} not found on {type_name}")]
    MissingMember { type_name: String, member: String },

    /// Member exists but has no setter
    #[error("Member {member} on {type_name} is read-only")]
    ReadOnlyMember { type_name: String, member: String },

    /// Query method takes parameters other than the context entity
    #[error("Method {0} takes arguments that cannot be supplied")]
    InvalidArguments(String),

    /// Two members of one type share a name
    #[error("Duplicate member {member} on {type_name}")]
    DuplicateMember { type_name: String, member: String },

    /// Parent type is not registered
    #[error("Type {type_name} names unknown parent {parent}")]
    UnknownParent { type_name: String, parent: String },

    /// Type does not derive from the component base
    #[error("Type {0} is not a component")]
    NotAComponent(String),

    /// No component type registered under this name
    #[error("Unknown component type: {0}")]
    UnknownComponent(String),

    /// Accessor was handed a component of the wrong concrete type
    #[error("Component is not a {0}")]
    WrongComponent(&'static str),

    /// Value nesting exceeded the codec's depth limit
    #[error("Nesting deeper than {0} levels")]
    DepthExceeded(usize),

    /// Envelope or save text is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure raised by component code itself
    #[error("Component error: {0}")]
    Component(String),
}
