//! Components attached to items
//!
//! A component type can extend another by embedding it and returning it from
//! [`Component::parent`]; member accessors declared on the parent type then
//! reach it through [`downcast_ref`] / [`downcast_mut`].

use std::any::Any;

/// State/behavior module attached to an [`Entity`](super::Entity)
pub trait Component: Any {
    /// Registered component type name
    fn type_name(&self) -> &'static str;

    /// Embedded parent-type part, if this type extends another
    fn parent(&self) -> Option<&dyn Component> {
        None
    }

    fn parent_mut(&mut self) -> Option<&mut dyn Component> {
        None
    }

    /// Called after saved state has been applied
    fn on_loaded(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Find the `T` part of a component, walking embedded parents
pub fn downcast_ref<T: Component>(component: &dyn Component) -> Option<&T> {
    let mut current = Some(component);
    while let Some(part) = current {
        if let Some(found) = part.as_any().downcast_ref::<T>() {
            return Some(found);
        }
        current = part.parent();
    }
    None
}

/// Mutable variant of [`downcast_ref`]
pub fn downcast_mut<T: Component>(component: &mut dyn Component) -> Option<&mut T> {
    if component.as_any().is::<T>() {
        return component.as_any_mut().downcast_mut::<T>();
    }
    component.parent_mut().and_then(downcast_mut::<T>)
}
