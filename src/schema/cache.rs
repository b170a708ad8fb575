//! Discovered property schemas
//!
//! Every registered component type gets a schema at construction:
//! - public bool / [`BoolLens`](crate::sim::BoolLens) fields
//! - public bool / float properties
//! - public non-synthetic, non-generic bool / float methods taking only the
//!   entity context, unless the name marks them as mutating
//! - the base type's membership query
//!
//! A type whose discovery fails is logged and left without a schema.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::component_type::ComponentType;
use super::member::{Member, MemberDescriptor, MemberKind};
use super::registry::ComponentRegistry;
use crate::codec::TypeTag;
use crate::consts::{BASE_COMPONENT, BOOL_STATE_TYPE, HAS_PROPERTY, MUTATION_MARKER};
use crate::error::{Error, Result};

/// Ordered, name-indexed members discovered on one component type
#[derive(Debug, Clone, Default)]
pub struct TypeSchema {
    type_name: String,
    parent: Option<String>,
    members: Vec<Arc<Member>>,
    index: HashMap<String, usize>,
}

impl TypeSchema {
    fn new(type_name: &str, parent: Option<&str>) -> Self {
        Self {
            type_name: type_name.to_string(),
            parent: parent.map(str::to_string),
            ..Default::default()
        }
    }

    fn insert(&mut self, member: Arc<Member>) -> Result<()> {
        if self.index.contains_key(member.name()) {
            return Err(Error::DuplicateMember {
                type_name: self.type_name.clone(),
                member: member.name().to_string(),
            });
        }
        self.index.insert(member.name().to_string(), self.members.len());
        self.members.push(member);
        Ok(())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Discovered members in discovery order
    pub fn members(&self) -> &[Arc<Member>] {
        &self.members
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Member>> {
        self.index.get(name).map(|&i| &self.members[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Read-only map from component type name to its discovered schema
#[derive(Debug, Clone, Default)]
pub struct SchemaCache {
    schemas: HashMap<String, TypeSchema>,
    /// Parent of every registered type, including ones whose discovery failed
    parents: HashMap<String, Option<String>>,
    names: Vec<String>,
    empty: TypeSchema,
}

impl SchemaCache {
    /// Discover schemas for every registered component type
    pub fn new(components: &ComponentRegistry) -> Self {
        let mut cache = Self::default();
        for ty in components.iter() {
            cache
                .parents
                .insert(ty.name().to_string(), ty.parent().map(str::to_string));
            match discover(components, ty) {
                Ok(schema) => {
                    log::debug!("Discovered {} members on {}", schema.len(), ty.name());
                    cache.schemas.insert(ty.name().to_string(), schema);
                }
                Err(e) => log::warn!("Skipping schema for {}: {}", ty.name(), e),
            }
        }
        cache.names = cache.schemas.keys().cloned().collect();
        cache.names.sort();
        cache
    }

    /// Schema of a type; empty for unknown or failed types
    pub fn get_schema(&self, type_name: &str) -> &TypeSchema {
        self.schemas.get(type_name).unwrap_or(&self.empty)
    }

    /// Member by name, searching the type then each parent in turn
    ///
    /// Levels without a schema are passed over, not treated as the end of the chain.
    pub fn get_member(&self, type_name: &str, member: &str) -> Option<&Arc<Member>> {
        let mut current = Some(type_name);
        // The bound stops a looping parent chain
        for _ in 0..=self.parents.len() {
            let name = current?;
            if let Some(found) = self.schemas.get(name).and_then(|s| s.get(member)) {
                return Some(found);
            }
            current = self.parents.get(name)?.as_deref();
        }
        None
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }

    /// Type names with a schema, sorted
    pub fn type_names(&self) -> &[String] {
        &self.names
    }

    pub fn member_names(&self, type_name: &str) -> Vec<&str> {
        self.get_schema(type_name).names().collect()
    }
}

fn discover(components: &ComponentRegistry, ty: &ComponentType) -> Result<TypeSchema> {
    components.check_chain(ty.name())?;

    let mut declared = HashSet::new();
    for member in ty.members() {
        if !declared.insert(member.name()) {
            return Err(Error::DuplicateMember {
                type_name: ty.name().to_string(),
                member: member.name().to_string(),
            });
        }
    }

    let mut schema = TypeSchema::new(ty.name(), ty.parent());
    for member in ty.members() {
        if is_state_field(member.descriptor()) || is_state_property(member.descriptor()) {
            schema.insert(Arc::clone(member))?;
        }
    }
    for member in ty.members() {
        let d = member.descriptor();
        if is_query_method(d) && !schema.contains(&d.name) {
            schema.insert(Arc::clone(member))?;
        }
    }

    if !ty.is_base() {
        let has_property = components
            .get(BASE_COMPONENT)
            .and_then(|base| base.member(HAS_PROPERTY))
            .ok_or_else(|| Error::MissingMember {
                type_name: BASE_COMPONENT.to_string(),
                member: HAS_PROPERTY.to_string(),
            })?;
        schema.insert(Arc::clone(has_property))?;
    }

    Ok(schema)
}

fn is_state_field(d: &MemberDescriptor) -> bool {
    d.is_field()
        && d.is_public()
        && (d.tag == TypeTag::Bool || d.tag == TypeTag::composite(BOOL_STATE_TYPE))
}

fn is_state_property(d: &MemberDescriptor) -> bool {
    d.is_property() && d.is_public() && d.tag.is_bool_or_float()
}

fn is_query_method(d: &MemberDescriptor) -> bool {
    matches!(d.kind, MemberKind::Method { .. })
        && d.is_public()
        && !d.synthetic
        && !d.generic
        && d.tag.is_bool_or_float()
        && d.is_invocable()
        && !d.name.contains(MUTATION_MARKER)
}
