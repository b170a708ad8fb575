//! Member descriptors and type-erased accessors

use std::fmt;
use std::sync::Arc;

use crate::codec::{TypeTag, Value};
use crate::error::{Error, Result};
use crate::sim::{Component, Entity};

/// Reads a member from a component; the entity is the context argument for methods
pub type Getter = Arc<dyn Fn(&dyn Component, &dyn Entity) -> Result<Value> + Send + Sync>;
/// Writes a decoded value into a component
pub type Setter = Arc<dyn Fn(&mut dyn Component, Value) -> Result<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Parameter of a method member
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// The owning entity, supplied at invocation
    Context,
    Other(TypeTag),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Field,
    Property,
    Method { params: Vec<Param> },
}

/// Everything discovery and aggregation need to know about a member
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    pub name: String,
    /// Declared type of the field, property or method return value
    pub tag: TypeTag,
    pub kind: MemberKind,
    pub capability: Capability,
    pub visibility: Visibility,
    /// Explicitly marked for save/load
    pub save: bool,
    /// Compiler/tool generated, never discovered
    pub synthetic: bool,
    /// Generic method, never discovered
    pub generic: bool,
    /// Component type that declared the member
    pub declared_on: String,
}

impl MemberDescriptor {
    pub fn new(
        name: impl Into<String>,
        tag: TypeTag,
        kind: MemberKind,
        declared_on: impl Into<String>,
    ) -> Self {
        let capability = match kind {
            MemberKind::Field => Capability::ReadWrite,
            _ => Capability::Read,
        };
        Self {
            name: name.into(),
            tag,
            kind,
            capability,
            visibility: Visibility::Public,
            save: false,
            synthetic: false,
            generic: false,
            declared_on: declared_on.into(),
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field)
    }

    pub fn is_property(&self) -> bool {
        matches!(self.kind, MemberKind::Property)
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_writable(&self) -> bool {
        self.capability == Capability::ReadWrite
    }

    /// True for fields, properties and methods whose parameters are all the context
    pub fn is_invocable(&self) -> bool {
        match &self.kind {
            MemberKind::Method { params } => params.iter().all(|p| *p == Param::Context),
            _ => true,
        }
    }
}

/// A member descriptor with its accessors
#[derive(Clone)]
pub struct Member {
    descriptor: MemberDescriptor,
    getter: Getter,
    setter: Option<Setter>,
}

impl Member {
    pub fn new(descriptor: MemberDescriptor, getter: Getter, setter: Option<Setter>) -> Self {
        let mut descriptor = descriptor;
        if setter.is_some() {
            descriptor.capability = Capability::ReadWrite;
        }
        Self {
            descriptor,
            getter,
            setter,
        }
    }

    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }

    pub(crate) fn descriptor_mut(&mut self) -> &mut MemberDescriptor {
        &mut self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn tag(&self) -> &TypeTag {
        &self.descriptor.tag
    }

    /// Read the member, invoking it with `entity` as context if it is a method
    pub fn get(&self, component: &dyn Component, entity: &dyn Entity) -> Result<Value> {
        if !self.descriptor.is_invocable() {
            return Err(Error::InvalidArguments(self.descriptor.name.clone()));
        }
        (self.getter)(component, entity)
    }

    pub fn set(&self, component: &mut dyn Component, value: Value) -> Result<()> {
        match &self.setter {
            Some(setter) => setter(component, value),
            None => Err(Error::ReadOnlyMember {
                type_name: self.descriptor.declared_on.clone(),
                member: self.descriptor.name.clone(),
            }),
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("descriptor", &self.descriptor)
            .field("writable", &self.setter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Item;
    use crate::testing::TestItem;

    fn constant(value: i32) -> Getter {
        Arc::new(move |_: &dyn Component, _: &dyn Entity| -> Result<Value> { Ok(Value::I32(value)) })
    }

    #[test]
    fn test_method_with_foreign_params_not_invocable() {
        let descriptor = MemberDescriptor::new(
            "CountNear",
            TypeTag::I32,
            MemberKind::Method {
                params: vec![Param::Context, Param::Other(TypeTag::F32)],
            },
            "TestItem",
        );
        let member = Member::new(descriptor, constant(1), None);
        let item = Item::new("Test");
        let result = member.get(&TestItem::default(), &item);
        assert!(matches!(result, Err(Error::InvalidArguments(_))));
    }

    #[test]
    fn test_read_only_set_fails() {
        let descriptor =
            MemberDescriptor::new("Count", TypeTag::I32, MemberKind::Property, "TestItem");
        let member = Member::new(descriptor, constant(4), None);
        assert!(!member.descriptor().is_writable());

        let item = Item::new("Test");
        let mut component = TestItem::default();
        assert_eq!(member.get(&component, &item).unwrap(), Value::I32(4));
        let result = member.set(&mut component, Value::I32(5));
        assert!(matches!(result, Err(Error::ReadOnlyMember { .. })));
    }

    #[test]
    fn test_context_only_method_invocable() {
        let descriptor = MemberDescriptor::new(
            "IsHeld",
            TypeTag::Bool,
            MemberKind::Method {
                params: vec![Param::Context],
            },
            "TestItem",
        );
        assert!(descriptor.is_invocable());
        assert!(descriptor.is_method());
        assert!(!descriptor.is_writable());
    }
}
