//! Platform abstraction layer
//!
//! Handles where save text lives:
//! - Files on native builds
//! - Memory for tests and embedders

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SaveStorage};
