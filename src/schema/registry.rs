//! Startup-time table of component types

use std::collections::HashMap;
use std::sync::Arc;

use super::component_type::ComponentType;
use super::member::{Member, MemberDescriptor};
use crate::consts::BASE_COMPONENT;
use crate::error::{Error, Result};
use crate::sim::Component;

/// All component types known to the save system
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    types: Vec<ComponentType>,
    index: HashMap<&'static str, usize>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// Registry holding only the base component type
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            index: HashMap::new(),
        };
        registry.register(ComponentType::base());
        registry
    }

    /// Add a type; a later registration under the same name replaces the earlier one
    pub fn register(&mut self, ty: ComponentType) -> &mut Self {
        if let Some(component) = ty.create() {
            if component.type_name() != ty.name() {
                log::warn!(
                    "Component type {} creates instances named {}",
                    ty.name(),
                    component.type_name()
                );
            }
        }

        match self.index.get(ty.name()) {
            Some(&i) => {
                log::warn!("Component type {} registered twice", ty.name());
                self.types[i] = ty;
            }
            None => {
                self.index.insert(ty.name(), self.types.len());
                self.types.push(ty);
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ComponentType> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentType> {
        self.types.iter()
    }

    /// The named type followed by its registered parents, leaf first
    pub fn ancestors(&self, name: &str) -> Ancestors<'_> {
        Ancestors {
            registry: self,
            next: self.get(name),
            remaining: self.types.len(),
        }
    }

    /// Check that `name` is registered and its parent chain reaches the base type
    pub fn check_chain(&self, name: &str) -> Result<()> {
        let mut current = self
            .get(name)
            .ok_or_else(|| Error::UnknownComponent(name.to_string()))?;
        for _ in 0..self.types.len() {
            if current.is_base() {
                return Ok(());
            }
            let Some(parent) = current.parent() else {
                break;
            };
            current = self.get(parent).ok_or_else(|| Error::UnknownParent {
                type_name: name.to_string(),
                parent: parent.to_string(),
            })?;
        }
        Err(Error::NotAComponent(name.to_string()))
    }

    /// First declared member named `member` on `type_name` or its parents
    /// that satisfies `accept`
    pub fn find_member(
        &self,
        type_name: &str,
        member: &str,
        accept: impl Fn(&MemberDescriptor) -> bool,
    ) -> Option<&Arc<Member>> {
        self.ancestors(type_name).find_map(|ty| {
            ty.member(member)
                .filter(|m| accept(m.descriptor()))
        })
    }

    /// Default instance of a registered, instantiable component type
    pub fn create(&self, name: &str) -> Result<Box<dyn Component>> {
        self.check_chain(name)?;
        let ty = self
            .get(name)
            .ok_or_else(|| Error::UnknownComponent(name.to_string()))?;
        if ty.is_base() {
            return Err(Error::NotAComponent(BASE_COMPONENT.to_string()));
        }
        ty.create()
            .ok_or_else(|| Error::UnknownComponent(name.to_string()))
    }
}

/// Iterator over a component type and its parents
pub struct Ancestors<'a> {
    registry: &'a ComponentRegistry,
    next: Option<&'a ComponentType>,
    // Bounds the walk if a parent chain loops
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ComponentType;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next.take()?;
        self.next = current.parent().and_then(|p| self.registry.get(p));
        Some(current)
    }
}
