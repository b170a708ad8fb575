//! Shared read-only registries used by capture and apply

use crate::assets::{AssetKind, AssetRegistry};
use crate::codec::{CompositeType, EnumType, TypeRegistry, ValueCodec};
use crate::schema::{ComponentRegistry, ComponentType, SchemaCache};

use super::header::SaveHeader;

/// Component types, their discovered schemas and the value types they use
///
/// Built once at startup; the schema cache is derived from the component
/// registry and never changes afterwards.
#[derive(Debug, Clone)]
pub struct Registry {
    components: ComponentRegistry,
    schemas: SchemaCache,
    types: TypeRegistry,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn new(components: ComponentRegistry, types: TypeRegistry) -> Self {
        let mut components = components;
        if !components.contains(crate::consts::SAVE_HEADER) {
            components.register(SaveHeader::component_type());
        }
        let schemas = SchemaCache::new(&components);
        log::info!(
            "Registry ready: {} component types, {} schemas",
            components.len(),
            schemas.type_names().len()
        );
        Self {
            components,
            schemas,
            types,
        }
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }
}

/// Collects component and value types before discovery runs
pub struct RegistryBuilder {
    components: ComponentRegistry,
    types: TypeRegistry,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            components: ComponentRegistry::new(),
            types: TypeRegistry::with_builtins(),
        }
    }
}

impl RegistryBuilder {
    pub fn component(mut self, ty: ComponentType) -> Self {
        self.components.register(ty);
        self
    }

    pub fn composite<T: CompositeType>(mut self) -> Self {
        self.types.register_composite::<T>();
        self
    }

    pub fn enumeration<E: EnumType>(mut self) -> Self {
        self.types.register_enum::<E>();
        self
    }

    pub fn asset<K: AssetKind>(mut self) -> Self {
        self.types.register_asset::<K>();
        self
    }

    pub fn build(self) -> Registry {
        Registry::new(self.components, self.types)
    }
}

/// Registries plus the asset lookup, borrowed for one capture or apply pass
#[derive(Clone, Copy)]
pub struct SaveContext<'a> {
    registry: &'a Registry,
    assets: &'a dyn AssetRegistry,
}

impl<'a> SaveContext<'a> {
    pub fn new(registry: &'a Registry, assets: &'a dyn AssetRegistry) -> Self {
        Self { registry, assets }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn components(&self) -> &'a ComponentRegistry {
        &self.registry.components
    }

    pub fn schemas(&self) -> &'a SchemaCache {
        &self.registry.schemas
    }

    pub fn codec(&self) -> ValueCodec<'a> {
        ValueCodec::new(&self.registry.types, self.assets)
    }
}
