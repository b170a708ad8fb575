//! Named external resources
//!
//! Asset references are saved by name only. On load the name is looked up in
//! the resource namespace registered for the asset type; a missing name
//! decodes to an empty reference.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// A resolved asset: the namespace it was found in and its registered name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    pub namespace: String,
    pub name: String,
}

impl AssetHandle {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// Marker for a resource-backed asset type
pub trait AssetKind: 'static {
    /// Name used in `asset:<Name>` type tags
    const TYPE_NAME: &'static str;
    /// Namespace searched when resolving a saved name
    const RESOURCE_PATH: &'static str;
}

/// Typed, possibly empty reference to an asset of kind `K`
pub struct AssetRef<K> {
    handle: Option<AssetHandle>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> AssetRef<K> {
    pub fn new(handle: AssetHandle) -> Self {
        Self {
            handle: Some(handle),
            _kind: PhantomData,
        }
    }

    pub fn none() -> Self {
        Self {
            handle: None,
            _kind: PhantomData,
        }
    }

    pub fn from_handle(handle: Option<AssetHandle>) -> Self {
        Self {
            handle,
            _kind: PhantomData,
        }
    }

    pub fn handle(&self) -> Option<&AssetHandle> {
        self.handle.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.handle.as_ref().map(|h| h.name.as_str())
    }

    pub fn is_none(&self) -> bool {
        self.handle.is_none()
    }
}

impl<K> Default for AssetRef<K> {
    fn default() -> Self {
        Self::none()
    }
}

impl<K> Clone for AssetRef<K> {
    fn clone(&self) -> Self {
        Self::from_handle(self.handle.clone())
    }
}

impl<K> PartialEq for AssetRef<K> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<K: AssetKind> fmt::Debug for AssetRef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssetRef")
            .field(&K::TYPE_NAME)
            .field(&self.handle)
            .finish()
    }
}

/// Resolves asset names inside a resource namespace
pub trait AssetRegistry {
    fn lookup_by_name(&self, namespace: &str, name: &str) -> Option<AssetHandle>;
}

/// In-memory asset registry keyed by namespace
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    namespaces: HashMap<String, Vec<String>>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset name under a namespace (duplicates ignored)
    pub fn insert(&mut self, namespace: &str, name: &str) -> AssetHandle {
        let names = self.namespaces.entry(namespace.to_string()).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        AssetHandle::new(namespace, name)
    }

    /// Builder-style insert
    pub fn with(mut self, namespace: &str, name: &str) -> Self {
        self.insert(namespace, name);
        self
    }

    pub fn len(&self) -> usize {
        self.namespaces.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetRegistry for AssetLibrary {
    fn lookup_by_name(&self, namespace: &str, name: &str) -> Option<AssetHandle> {
        self.namespaces
            .get(namespace)?
            .iter()
            .find(|n| n.as_str() == name)
            .map(|n| AssetHandle::new(namespace, n.as_str()))
    }
}
