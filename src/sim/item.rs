//! Items: named containers of components

use std::fmt;

use super::component::{Component, downcast_mut, downcast_ref};

/// Anything that owns components and takes part in save/load
pub trait Entity {
    /// Kind name (prefab-style) used to re-instantiate the entity
    fn item_name(&self) -> &str;

    /// Stable identity across save/load; `None` for anonymous entities
    fn unique_name(&self) -> Option<&str>;

    /// Attached components in attach order
    fn components(&self) -> Vec<&dyn Component>;

    /// First component whose type name matches
    fn component(&self, type_name: &str) -> Option<&dyn Component>;

    fn component_mut(&mut self, type_name: &str) -> Option<&mut (dyn Component + 'static)>;

    /// Attach a component and return it
    fn add_component(&mut self, component: Box<dyn Component>) -> &mut (dyn Component + 'static);

    /// Called once all saved component state has been applied
    fn on_loaded(&mut self) {}
}

/// Plain entity holding boxed components
#[derive(Default)]
pub struct Item {
    item_name: String,
    unique_name: Option<String>,
    components: Vec<Box<dyn Component>>,
    load_count: u32,
}

impl Item {
    pub fn new(item_name: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            ..Default::default()
        }
    }

    pub fn with_unique_name(mut self, unique_name: impl Into<String>) -> Self {
        self.unique_name = Some(unique_name.into());
        self
    }

    pub fn with_component(mut self, component: impl Component) -> Self {
        self.components.push(Box::new(component));
        self
    }

    /// Typed access to the first component containing a `T` part
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(|c| downcast_ref::<T>(c.as_ref()))
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|c| downcast_mut::<T>(c.as_mut()))
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of completed loads applied to this item
    pub fn load_count(&self) -> u32 {
        self.load_count
    }
}

impl Entity for Item {
    fn item_name(&self) -> &str {
        &self.item_name
    }

    fn unique_name(&self) -> Option<&str> {
        self.unique_name.as_deref()
    }

    fn components(&self) -> Vec<&dyn Component> {
        self.components.iter().map(|c| c.as_ref()).collect()
    }

    fn component(&self, type_name: &str) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.type_name() == type_name)
            .map(|c| c.as_ref())
    }

    fn component_mut(&mut self, type_name: &str) -> Option<&mut (dyn Component + 'static)> {
        self.components
            .iter_mut()
            .find(|c| c.type_name() == type_name)
            .map(|c| c.as_mut())
    }

    fn add_component(&mut self, component: Box<dyn Component>) -> &mut (dyn Component + 'static) {
        self.components.push(component);
        let last = self.components.len() - 1;
        self.components[last].as_mut()
    }

    fn on_loaded(&mut self) {
        self.load_count += 1;
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("item_name", &self.item_name)
            .field("unique_name", &self.unique_name)
            .field(
                "components",
                &self.components.iter().map(|c| c.type_name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
