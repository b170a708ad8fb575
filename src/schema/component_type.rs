//! Registered component types and their declared members
//!
//! Component types are declared once at startup with a typed builder; the
//! builder wraps each accessor so the rest of the crate only sees
//! `dyn Component` and [`Value`]s.

use std::marker::PhantomData;
use std::sync::Arc;

use super::member::{Getter, Member, MemberDescriptor, MemberKind, Param, Setter, Visibility};
use crate::codec::{Reflect, Value};
use crate::consts::{BASE_COMPONENT, HAS_PROPERTY};
use crate::error::{Error, Result};
use crate::sim::{Component, Entity, downcast_mut, downcast_ref};

/// Creates a default instance of a component type
pub type Factory = fn() -> Box<dyn Component>;

/// A component type: name, parent and declared members
#[derive(Debug, Clone)]
pub struct ComponentType {
    name: &'static str,
    parent: Option<&'static str>,
    generic_wrapper: bool,
    members: Vec<Arc<Member>>,
    factory: Option<Factory>,
}

impl ComponentType {
    /// Start declaring a component type backed by `T`
    pub fn builder<T: Component>(name: &'static str) -> ComponentTypeBuilder<T> {
        ComponentTypeBuilder {
            ty: ComponentType {
                name,
                parent: Some(BASE_COMPONENT),
                generic_wrapper: false,
                members: Vec::new(),
                factory: None,
            },
            pending: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Root of every component hierarchy; declares only the membership query
    pub fn base() -> Self {
        let descriptor = MemberDescriptor::new(
            HAS_PROPERTY,
            bool::type_tag(),
            MemberKind::Method {
                params: vec![Param::Context],
            },
            BASE_COMPONENT,
        );
        let getter: Getter =
            Arc::new(|component: &dyn Component, entity: &dyn Entity| -> Result<Value> {
                Ok(Value::Bool(entity.component(component.type_name()).is_some()))
            });

        Self {
            name: BASE_COMPONENT,
            parent: None,
            generic_wrapper: false,
            members: vec![Arc::new(Member::new(descriptor, getter, None))],
            factory: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static str> {
        self.parent
    }

    /// Wrapper levels are skipped when naming and aggregating state
    pub fn is_generic_wrapper(&self) -> bool {
        self.generic_wrapper
    }

    pub fn is_base(&self) -> bool {
        self.name == BASE_COMPONENT
    }

    /// Members declared directly on this type, in declaration order
    pub fn members(&self) -> &[Arc<Member>] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Arc<Member>> {
        self.members.iter().find(|m| m.name() == name)
    }

    pub fn can_create(&self) -> bool {
        self.factory.is_some()
    }

    /// New default instance, if the type is instantiable
    pub fn create(&self) -> Option<Box<dyn Component>> {
        self.factory.map(|factory| factory())
    }
}

/// Typed declaration of a [`ComponentType`]
///
/// Modifiers like [`private`](Self::private) and [`saved`](Self::saved) apply
/// to the most recently declared member.
pub struct ComponentTypeBuilder<T> {
    ty: ComponentType,
    pending: Vec<Member>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Component> ComponentTypeBuilder<T> {
    pub fn parent(mut self, parent: &'static str) -> Self {
        self.ty.parent = Some(parent);
        self
    }

    pub fn generic_wrapper(mut self) -> Self {
        self.ty.generic_wrapper = true;
        self
    }

    /// Instantiate with `T::default()` when loading attaches a missing component
    pub fn default_factory(mut self) -> Self
    where
        T: Default,
    {
        self.ty.factory = Some(|| -> Box<dyn Component> { Box::new(T::default()) });
        self
    }

    pub fn field<V: Reflect + 'static>(
        self,
        name: &str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        let type_name = self.ty.name;
        let (get, set) = (getter::<T, V>(type_name, get), setter::<T, V>(type_name, name, set));
        self.push::<V>(name, MemberKind::Field, get, Some(set))
    }

    pub fn property<V: Reflect + 'static>(
        self,
        name: &str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        let type_name = self.ty.name;
        let (get, set) = (getter::<T, V>(type_name, get), setter::<T, V>(type_name, name, set));
        self.push::<V>(name, MemberKind::Property, get, Some(set))
    }

    pub fn read_only<V: Reflect + 'static>(
        self,
        name: &str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Self {
        let get = getter::<T, V>(self.ty.name, get);
        self.push::<V>(name, MemberKind::Property, get, None)
    }

    /// Read-only property whose getter can fail
    pub fn try_property<V: Reflect + 'static>(
        self,
        name: &str,
        get: impl Fn(&T) -> Result<V> + Send + Sync + 'static,
    ) -> Self {
        let type_name = self.ty.name;
        let getter: Getter = Arc::new(
            move |component: &dyn Component, _: &dyn Entity| -> Result<Value> {
                let part = downcast_ref::<T>(component).ok_or(Error::WrongComponent(type_name))?;
                Ok(get(part)?.to_value())
            },
        );
        self.push::<V>(name, MemberKind::Property, getter, None)
    }

    /// Method taking the owning entity as its only argument
    pub fn method<V: Reflect + 'static>(
        self,
        name: &str,
        call: impl Fn(&T, &dyn Entity) -> V + Send + Sync + 'static,
    ) -> Self {
        let type_name = self.ty.name;
        let getter: Getter = Arc::new(
            move |component: &dyn Component, entity: &dyn Entity| -> Result<Value> {
                let part = downcast_ref::<T>(component).ok_or(Error::WrongComponent(type_name))?;
                Ok(call(part, entity).to_value())
            },
        );
        let kind = MemberKind::Method {
            params: vec![Param::Context],
        };
        self.push::<V>(name, kind, getter, None)
    }

    /// Parameterless method
    pub fn query<V: Reflect + 'static>(
        self,
        name: &str,
        call: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Self {
        let kind = MemberKind::Method { params: Vec::new() };
        let get = getter::<T, V>(self.ty.name, call);
        self.push::<V>(name, kind, get, None)
    }

    /// Method with arguments the save system cannot supply
    pub fn opaque_method<V: Reflect + 'static>(self, name: &str, params: Vec<Param>) -> Self {
        let member_name = name.to_string();
        let getter: Getter = Arc::new(move |_: &dyn Component, _: &dyn Entity| -> Result<Value> {
            Err(Error::InvalidArguments(member_name.clone()))
        });
        self.push::<V>(name, MemberKind::Method { params }, getter, None)
    }

    /// Mark the last member for save/load
    pub fn saved(self) -> Self {
        self.modify(|d| d.save = true)
    }

    pub fn private(self) -> Self {
        self.modify(|d| d.visibility = Visibility::Private)
    }

    pub fn synthetic(self) -> Self {
        self.modify(|d| d.synthetic = true)
    }

    pub fn generic(self) -> Self {
        self.modify(|d| d.generic = true)
    }

    pub fn build(self) -> ComponentType {
        let mut ty = self.ty;
        ty.members = self.pending.into_iter().map(Arc::new).collect();
        ty
    }

    fn push<V: Reflect>(
        mut self,
        name: &str,
        kind: MemberKind,
        getter: Getter,
        setter: Option<Setter>,
    ) -> Self {
        let descriptor = MemberDescriptor::new(name, V::type_tag(), kind, self.ty.name);
        self.pending.push(Member::new(descriptor, getter, setter));
        self
    }

    fn modify(mut self, f: impl FnOnce(&mut MemberDescriptor)) -> Self {
        match self.pending.last_mut() {
            Some(member) => f(member.descriptor_mut()),
            None => log::warn!("Member modifier on {} before any member", self.ty.name),
        }
        self
    }
}

fn getter<T: Component, V: Reflect + 'static>(
    type_name: &'static str,
    get: impl Fn(&T) -> V + Send + Sync + 'static,
) -> Getter {
    Arc::new(
        move |component: &dyn Component, _: &dyn Entity| -> Result<Value> {
            let part = downcast_ref::<T>(component).ok_or(Error::WrongComponent(type_name))?;
            Ok(get(part).to_value())
        },
    )
}

fn setter<T: Component, V: Reflect + 'static>(
    type_name: &'static str,
    member: &str,
    set: impl Fn(&mut T, V) + Send + Sync + 'static,
) -> Setter {
    let member = member.to_string();
    Arc::new(
        move |component: &mut dyn Component, value: Value| -> Result<()> {
            let part = downcast_mut::<T>(component).ok_or(Error::WrongComponent(type_name))?;
            let value = V::from_value(value).ok_or_else(|| Error::TypeMismatch {
                member: member.clone(),
                expected: V::type_tag().to_string(),
            })?;
            set(part, value);
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Capability;
    use crate::sim::Item;
    use crate::testing::TestItem;

    #[test]
    fn test_builder_records_declared_members() {
        let ty = TestItem::component_type();
        assert_eq!(ty.name(), "TestItem");
        assert_eq!(ty.parent(), Some(BASE_COMPONENT));
        assert!(ty.can_create());

        let int_test = ty.member("intTest").unwrap().descriptor();
        assert!(int_test.is_field());
        assert!(int_test.save);
        assert_eq!(int_test.visibility, Visibility::Private);
        assert_eq!(int_test.capability, Capability::ReadWrite);

        let prop = ty.member("PropTest").unwrap().descriptor();
        assert!(prop.is_property());
        assert!(!prop.is_writable());
    }

    #[test]
    fn test_accessors_roundtrip_through_values() {
        let ty = TestItem::component_type();
        let item = Item::new("Test");
        let mut component = ty.create().unwrap();

        let member = ty.member("intTest").unwrap();
        member.set(component.as_mut(), Value::I32(9)).unwrap();
        assert_eq!(member.get(component.as_ref(), &item).unwrap(), Value::I32(9));

        let wrong = member.set(component.as_mut(), Value::Str("nine".into()));
        assert!(matches!(wrong, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_base_has_property() {
        let base = ComponentType::base();
        assert!(base.is_base());
        assert!(!base.can_create());

        let has = base.member(HAS_PROPERTY).unwrap();
        let with = Item::new("Test").with_component(TestItem::default());
        let without = Item::new("Empty");
        let probe = TestItem::default();
        assert_eq!(has.get(&probe, &with).unwrap(), Value::Bool(true));
        assert_eq!(has.get(&probe, &without).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_modifier_without_member_is_ignored() {
        let ty = ComponentType::builder::<TestItem>("TestItem").saved().build();
        assert!(ty.members().is_empty());
    }
}
