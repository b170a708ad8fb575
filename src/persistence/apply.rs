//! Snapshots back onto live components and items
//!
//! Failures are contained at the smallest boundary that makes sense: a bad
//! field is skipped, a bad component is skipped, the rest still loads.

use std::ops::AddAssign;

use super::context::SaveContext;
use crate::error::{Error, Result};
use crate::schema::MemberDescriptor;
use crate::sim::{Component, Entity};
use crate::snapshot::{Field, ItemState, PropertyState};

/// Outcome counters for one apply pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Members written
    pub applied: usize,
    /// Members skipped: unresolved, read-only or undecodable
    pub skipped: usize,
    /// Components that could not be attached or applied
    pub failed_components: usize,
}

impl AddAssign for ApplyStats {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.failed_components += other.failed_components;
    }
}

/// Write a component snapshot's properties then fields, then notify the component
pub fn apply_property_state(
    ctx: &SaveContext<'_>,
    state: &PropertyState,
    component: &mut dyn Component,
) -> Result<ApplyStats> {
    let type_name = component.type_name();
    if !ctx.components().contains(type_name) {
        return Err(Error::UnknownComponent(type_name.to_string()));
    }

    let mut stats = ApplyStats::default();
    for field in &state.properties {
        apply_member(ctx, type_name, field, component, &mut stats, |d| {
            d.is_property()
        });
    }
    for field in &state.fields {
        apply_member(ctx, type_name, field, component, &mut stats, |d| d.is_field());
    }

    component.on_loaded();
    Ok(stats)
}

fn apply_member(
    ctx: &SaveContext<'_>,
    type_name: &str,
    field: &Field,
    component: &mut dyn Component,
    stats: &mut ApplyStats,
    accept: impl Fn(&MemberDescriptor) -> bool,
) {
    let Some(member) = ctx
        .components()
        .find_member(type_name, &field.name, |d| accept(d) && d.is_writable())
    else {
        if ctx
            .components()
            .find_member(type_name, &field.name, |_| true)
            .is_some()
        {
            // Captured for queries only, e.g. methods and read-only properties
            log::debug!("Not restoring {}.{}", type_name, field.name);
        } else {
            log::warn!("Could not find member {} on {}", field.name, type_name);
        }
        stats.skipped += 1;
        return;
    };

    let result = ctx
        .codec()
        .decode_field(field)
        .and_then(|value| member.set(component, value));
    match result {
        Ok(()) => stats.applied += 1,
        Err(e) => {
            log::warn!("Skipping {}.{}: {}", type_name, field.name, e);
            stats.skipped += 1;
        }
    }
}

/// Apply every component snapshot to an entity, attaching missing components
///
/// Each component is isolated: failing to attach or apply one is logged and
/// the others still load. The entity is notified once at the end.
pub fn apply_item_state(
    ctx: &SaveContext<'_>,
    state: &ItemState,
    entity: &mut dyn Entity,
) -> ApplyStats {
    let mut stats = ApplyStats::default();
    for component_state in &state.components {
        let result = component_for(ctx, entity, &component_state.type_name)
            .and_then(|component| apply_property_state(ctx, component_state, component));
        match result {
            Ok(component_stats) => stats += component_stats,
            Err(e) => {
                log::error!(
                    "Issue applying {} item {} property state: {}",
                    state.item_name,
                    component_state.type_name,
                    e
                );
                stats.failed_components += 1;
            }
        }
    }
    entity.on_loaded();
    stats
}

fn component_for<'e>(
    ctx: &SaveContext<'_>,
    entity: &'e mut dyn Entity,
    type_name: &str,
) -> Result<&'e mut (dyn Component + 'static)> {
    if entity.component(type_name).is_none() {
        let component = ctx.components().create(type_name)?;
        log::debug!("Attaching {} to {}", type_name, entity.item_name());
        entity.add_component(component);
    }
    entity
        .component_mut(type_name)
        .ok_or_else(|| Error::UnknownComponent(type_name.to_string()))
}
