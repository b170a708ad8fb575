//! Shared test fixtures: value types, components and registries

use std::any::Any;

use glam::{Quat, Vec3};

use crate::assets::{AssetKind, AssetLibrary, AssetRef};
use crate::codec::{
    CompositeType, CompositeValue, EnumType, Reflect, TypeRegistry, TypeTag, Value, enum_index,
    enum_value,
};
use crate::error::Error;
use crate::persistence::Registry;
use crate::schema::{ComponentRegistry, ComponentType, Param};
use crate::sim::{BoolLens, Component};
use crate::snapshot::ItemState;

pub struct Weapon;

impl AssetKind for Weapon {
    const TYPE_NAME: &'static str = "Weapon";
    const RESOURCE_PATH: &'static str = "Weapons";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestEnum {
    #[default]
    First,
    Second,
    Third,
}

impl Reflect for TestEnum {
    fn type_tag() -> TypeTag {
        TypeTag::enumeration(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        enum_value::<Self>(Self::VARIANTS[*self as usize])
    }

    fn from_value(value: Value) -> Option<Self> {
        match enum_index::<Self>(value)? {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Third),
            _ => None,
        }
    }
}

impl EnumType for TestEnum {
    const TYPE_NAME: &'static str = "TestEnum";
    const VARIANTS: &'static [&'static str] = &["First", "Second", "Third"];
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructTest {
    pub x: f32,
    pub flag: bool,
}

impl Reflect for StructTest {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::TYPE_NAME)
            .with("x", &self.x)
            .with("flag", &self.flag)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        Some(Self {
            x: c.take("x")?,
            flag: c.take("flag")?,
        })
    }
}

impl CompositeType for StructTest {
    const TYPE_NAME: &'static str = "StructTest";

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![("x", TypeTag::F32), ("flag", TypeTag::Bool)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassTest {
    pub number: i32,
    pub label: String,
    pub inner: StructTest,
    pub mode: TestEnum,
}

impl Default for ClassTest {
    fn default() -> Self {
        Self {
            number: 7,
            label: "default".to_string(),
            inner: StructTest::default(),
            mode: TestEnum::First,
        }
    }
}

impl Reflect for ClassTest {
    fn type_tag() -> TypeTag {
        TypeTag::composite(Self::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::TYPE_NAME)
            .with("number", &self.number)
            .with("label", &self.label)
            .with("inner", &self.inner)
            .with("mode", &self.mode)
            .into()
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut c = value.into_composite(Self::TYPE_NAME)?;
        Some(Self {
            number: c.take("number")?,
            label: c.take("label")?,
            inner: c.take("inner")?,
            mode: c.take("mode")?,
        })
    }
}

impl CompositeType for ClassTest {
    const TYPE_NAME: &'static str = "ClassTest";

    fn fields() -> Vec<(&'static str, TypeTag)> {
        vec![
            ("number", TypeTag::I32),
            ("label", TypeTag::Str),
            ("inner", StructTest::type_tag()),
            ("mode", TestEnum::type_tag()),
        ]
    }
}

macro_rules! component_boilerplate {
    ($name:literal) => {
        fn type_name(&self) -> &'static str {
            $name
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    };
}

/// Component exercising every supported member shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestItem {
    pub int_test: i32,
    pub float_test: f32,
    pub woken_up: bool,
    pub hidden_flag: bool,
    pub lens_test: BoolLens,
    pub position: Vec3,
    pub rotation: Quat,
    pub class_test: ClassTest,
    pub int_arr_test: Box<[i32]>,
    pub class_list: Vec<ClassTest>,
    pub enum_test: TestEnum,
    pub weapon: AssetRef<Weapon>,
    pub weight: f32,
    /// Makes the `Checksum` property fail
    pub broken: bool,
    pub loaded: u32,
}

impl Component for TestItem {
    component_boilerplate!("TestItem");

    fn on_loaded(&mut self) {
        self.loaded += 1;
    }
}

impl TestItem {
    pub fn component_type() -> ComponentType {
        ComponentType::builder::<TestItem>("TestItem")
            .default_factory()
            .field("intTest", |t| t.int_test, |t, v| t.int_test = v)
            .private()
            .saved()
            .field("floatTest", |t| t.float_test, |t, v| t.float_test = v)
            .private()
            .saved()
            .field("wokenUp", |t| t.woken_up, |t, v| t.woken_up = v)
            .saved()
            .field("hiddenFlag", |t| t.hidden_flag, |t, v| t.hidden_flag = v)
            .private()
            .field("lensTest", |t| t.lens_test.clone(), |t, v| t.lens_test = v)
            .property("Position", |t| t.position, |t, v| t.position = v)
            .saved()
            .field("rotation", |t| t.rotation, |t, v| t.rotation = v)
            .private()
            .saved()
            .field("classTest", |t| t.class_test.clone(), |t, v| t.class_test = v)
            .saved()
            .field("intArrTest", |t| t.int_arr_test.clone(), |t, v| t.int_arr_test = v)
            .saved()
            .field("classList", |t| t.class_list.clone(), |t, v| t.class_list = v)
            .saved()
            .field("enumTest", |t| t.enum_test, |t, v| t.enum_test = v)
            .saved()
            .field("weapon", |t| t.weapon.clone(), |t, v| t.weapon = v)
            .saved()
            .property("Weight", |t| t.weight, |t, v| t.weight = v)
            .saved()
            .read_only("PropTest", |t| t.int_test * 2)
            .saved()
            .try_property("Checksum", |t| {
                if t.broken {
                    Err(Error::Component("checksum unavailable".into()))
                } else {
                    Ok(t.int_test.wrapping_add(t.float_test as i32))
                }
            })
            .saved()
            .method("IsHeavy", |t, _| t.weight > 10.0)
            .saved()
            .method("TryOpen", |_, _| true)
            .opaque_method::<f32>("DistanceTo", vec![Param::Context, Param::Other(Vec3::type_tag())])
            .saved()
            .query("Compiled", |_| true)
            .synthetic()
            .query("Cast", |_| false)
            .generic()
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub capacity: i32,
    pub count: i32,
}

impl Component for Container {
    component_boilerplate!("Container");
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lockable {
    pub container: Container,
    pub locked: bool,
}

impl Component for Lockable {
    component_boilerplate!("Lockable");

    fn parent(&self) -> Option<&dyn Component> {
        Some(&self.container)
    }

    fn parent_mut(&mut self) -> Option<&mut dyn Component> {
        Some(&mut self.container)
    }
}

/// Three levels below the base: Chest -> Lockable -> Container
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chest {
    pub lockable: Lockable,
    pub label: String,
}

impl Component for Chest {
    component_boilerplate!("Chest");

    fn parent(&self) -> Option<&dyn Component> {
        Some(&self.lockable)
    }

    fn parent_mut(&mut self) -> Option<&mut dyn Component> {
        Some(&mut self.lockable)
    }
}

/// Counts instances through a generic wrapper level
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tracker {
    pub instances: i32,
    pub seen: i32,
}

impl Component for Tracker {
    component_boilerplate!("Tracker");
}

/// Holds whole entities as snapshots, like a bag's contents
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stash {
    pub contents: Vec<ItemState>,
}

impl Component for Stash {
    component_boilerplate!("Stash");
}

impl Stash {
    pub fn component_type() -> ComponentType {
        ComponentType::builder::<Stash>("Stash")
            .default_factory()
            .field("contents", |s| s.contents.clone(), |s, v| s.contents = v)
            .saved()
            .build()
    }
}

pub fn container_types() -> Vec<ComponentType> {
    vec![
        ComponentType::builder::<Container>("Container")
            .default_factory()
            .field("capacity", |c| c.capacity, |c, v| c.capacity = v)
            .saved()
            .property("Count", |c| c.count, |c, v| c.count = v)
            .saved()
            .build(),
        ComponentType::builder::<Lockable>("Lockable")
            .parent("Container")
            .default_factory()
            .field("locked", |l| l.locked, |l, v| l.locked = v)
            .saved()
            .method("IsLocked", |l, _| l.locked)
            .build(),
        ComponentType::builder::<Chest>("Chest")
            .parent("Lockable")
            .default_factory()
            .field("label", |c| c.label.clone(), |c, v| c.label = v)
            .saved()
            .query("IsFull", |c| c.lockable.container.count >= c.lockable.container.capacity)
            .build(),
        ComponentType::builder::<Tracker>("Singleton")
            .generic_wrapper()
            .field("instances", |t| t.instances, |t, v| t.instances = v)
            .saved()
            .build(),
        ComponentType::builder::<Tracker>("Tracker")
            .parent("Singleton")
            .default_factory()
            .field("seen", |t| t.seen, |t, v| t.seen = v)
            .saved()
            .build(),
    ]
}

pub fn registry_components() -> ComponentRegistry {
    let mut components = ComponentRegistry::new();
    components.register(TestItem::component_type());
    for ty in container_types() {
        components.register(ty);
    }
    components
}

pub fn test_types() -> TypeRegistry {
    let mut types = TypeRegistry::with_builtins();
    types
        .register_composite::<StructTest>()
        .register_composite::<ClassTest>()
        .register_enum::<TestEnum>()
        .register_asset::<Weapon>();
    types
}

pub fn test_registry() -> Registry {
    let mut builder = Registry::builder()
        .component(TestItem::component_type())
        .component(Stash::component_type())
        .composite::<StructTest>()
        .composite::<ClassTest>()
        .enumeration::<TestEnum>()
        .asset::<Weapon>();
    for ty in container_types() {
        builder = builder.component(ty);
    }
    builder.build()
}

pub fn weapon_library() -> AssetLibrary {
    AssetLibrary::new()
        .with(Weapon::RESOURCE_PATH, "Sword_01")
        .with(Weapon::RESOURCE_PATH, "Axe_02")
}
