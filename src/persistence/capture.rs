//! Components and items to snapshots
//!
//! Each component type level from the leaf up to the base contributes:
//! - discovered members marked for save, read into `properties`
//!   (query methods are invoked with the owning entity)
//! - declared properties marked for save, into `properties`
//! - declared fields marked for save, into `fields`
//!
//! Generic wrapper levels contribute nothing and never name the state.

use super::context::SaveContext;
use crate::error::{Error, Result};
use crate::schema::{Member, MemberKind};
use crate::sim::{Component, Entity};
use crate::snapshot::{ItemState, PropertyState};

/// Capture one component's saved members
pub fn build_property_state(
    ctx: &SaveContext<'_>,
    component: &dyn Component,
    entity: &dyn Entity,
) -> Result<PropertyState> {
    let components = ctx.components();
    let leaf = component.type_name();
    if !components.contains(leaf) {
        return Err(Error::UnknownComponent(leaf.to_string()));
    }

    let type_name = components
        .ancestors(leaf)
        .find(|ty| !ty.is_generic_wrapper())
        .map_or(leaf, |ty| ty.name());
    let mut state = PropertyState::new(type_name);

    for ty in components.ancestors(leaf) {
        if ty.is_generic_wrapper() {
            continue;
        }

        for member in ctx.schemas().get_schema(ty.name()).members() {
            let d = member.descriptor();
            if !d.save || d.is_field() {
                continue;
            }
            if !d.is_invocable() {
                log::debug!("Not capturing {}.{}: needs arguments", ty.name(), d.name);
                continue;
            }
            capture_property(ctx, &mut state, member, component, entity)?;
        }

        for member in ty.members() {
            let d = member.descriptor();
            if !d.save {
                continue;
            }
            match d.kind {
                MemberKind::Property => {
                    capture_property(ctx, &mut state, member, component, entity)?;
                }
                MemberKind::Field => {
                    let value = member.get(component, entity)?;
                    state.push_field(ctx.codec().encode_field(&d.name, &d.tag, &value)?);
                }
                MemberKind::Method { .. } => {}
            }
        }
    }

    Ok(state)
}

fn capture_property(
    ctx: &SaveContext<'_>,
    state: &mut PropertyState,
    member: &Member,
    component: &dyn Component,
    entity: &dyn Entity,
) -> Result<()> {
    // First capture of a name wins
    if state.property(member.name()).is_some() {
        return Ok(());
    }
    let value = member.get(component, entity)?;
    state.push_property(ctx.codec().encode_field(member.name(), member.tag(), &value)?);
    Ok(())
}

/// Capture an entity and every component that captures cleanly
///
/// A component that fails is logged and left out of the snapshot.
pub fn build_item_state(ctx: &SaveContext<'_>, entity: &dyn Entity) -> ItemState {
    let mut state = ItemState::new(entity.item_name(), entity.unique_name().map(str::to_string));
    for component in entity.components() {
        match build_property_state(ctx, component, entity) {
            Ok(component_state) => state.components.push(component_state),
            Err(e) => log::error!(
                "Issue building {} item {} property state: {}",
                entity.item_name(),
                component.type_name(),
                e
            ),
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRef;
    use crate::sim::Item;
    use crate::testing::{Chest, TestItem, Tracker, test_registry, weapon_library};

    #[test]
    fn test_test_item_state_layout() {
        let registry = test_registry();
        let assets = weapon_library();
        let ctx = SaveContext::new(&registry, &assets);

        let mut component = TestItem::default();
        component.weight = 12.5;
        component.weapon = AssetRef::new(crate::assets::AssetHandle::new("Weapons", "Sword_01"));
        let item = Item::new("Test").with_component(component.clone());

        let state = build_property_state(&ctx, &component, &item).unwrap();
        assert_eq!(state.type_name, "TestItem");

        let properties: Vec<_> = state.properties.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            properties,
            vec!["Weight", "IsHeavy", "Position", "PropTest", "Checksum"]
        );
        assert_eq!(state.property("Weight").unwrap().value, "12.5");
        assert_eq!(state.property("IsHeavy").unwrap().value, "true");

        let fields: Vec<_> = state.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "intTest",
                "floatTest",
                "wokenUp",
                "rotation",
                "classTest",
                "intArrTest",
                "classList",
                "enumTest",
                "weapon"
            ]
        );
        assert_eq!(state.field("weapon").unwrap().value, "Sword_01");
        assert_eq!(state.field("enumTest").unwrap().value, "First");
        // Unsaved and non-invocable members never appear
        assert!(state.get("hiddenFlag").is_none());
        assert!(state.get("DistanceTo").is_none());
        assert!(state.get("HasProperty").is_none());
    }

    #[test]
    fn test_inherited_levels_captured() {
        let registry = test_registry();
        let assets = weapon_library();
        let ctx = SaveContext::new(&registry, &assets);

        let mut chest = Chest::default();
        chest.label = "loot".into();
        chest.lockable.locked = true;
        chest.lockable.container.capacity = 4;
        let item = Item::new("Chest");

        let state = build_property_state(&ctx, &chest, &item).unwrap();
        assert_eq!(state.type_name, "Chest");
        assert_eq!(state.field("label").unwrap().value, "loot");
        assert_eq!(state.field("locked").unwrap().value, "true");
        assert_eq!(state.field("capacity").unwrap().value, "4");
        assert_eq!(state.property("Count").unwrap().value, "0");
    }

    #[test]
    fn test_wrapper_level_skipped() {
        let registry = test_registry();
        let assets = weapon_library();
        let ctx = SaveContext::new(&registry, &assets);

        let tracker = Tracker {
            instances: 3,
            seen: 5,
        };
        let state = build_property_state(&ctx, &tracker, &Item::new("Tracker")).unwrap();
        assert_eq!(state.type_name, "Tracker");
        assert_eq!(state.field("seen").unwrap().value, "5");
        assert!(state.get("instances").is_none());
    }

    #[test]
    fn test_failing_component_omitted() {
        let registry = test_registry();
        let assets = weapon_library();
        let ctx = SaveContext::new(&registry, &assets);

        let broken = TestItem {
            broken: true,
            ..Default::default()
        };
        let item = Item::new("Mixed")
            .with_unique_name("mixed_1")
            .with_component(Chest::default())
            .with_component(broken)
            .with_component(Tracker::default());

        let state = build_item_state(&ctx, &item);
        assert_eq!(state.unique_name.as_deref(), Some("mixed_1"));
        assert_eq!(state.item_name, "Mixed");
        let names: Vec<_> = state.components.iter().map(|c| c.type_name.as_str()).collect();
        assert_eq!(names, vec!["Chest", "Tracker"]);
    }

    #[test]
    fn test_unregistered_component_fails() {
        let registry = crate::persistence::Registry::builder().build();
        let assets = weapon_library();
        let ctx = SaveContext::new(&registry, &assets);
        let result = build_property_state(&ctx, &Chest::default(), &Item::new("Chest"));
        assert!(matches!(result, Err(Error::UnknownComponent(_))));
    }
}
