//! Savegraph demo entry point
//!
//! Registers a small crate/lamp world, saves it, scrambles it and loads it
//! back. Run with `RUST_LOG=debug` to see every capture and apply step.

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use glam::Vec3;

use savegraph::assets::AssetLibrary;
use savegraph::persistence::{Registry, SaveManager};
use savegraph::platform::FileStorage;
use savegraph::schema::ComponentType;
use savegraph::sim::{BoolLens, Component, Item};
use savegraph::SaveSettings;

const SETTINGS_PATH: &str = "savegraph.json";

/// Openable crate with contents
#[derive(Debug, Default)]
struct Crate {
    position: Vec3,
    contents: Vec<String>,
    open: bool,
}

impl Component for Crate {
    fn type_name(&self) -> &'static str {
        "Crate"
    }

    fn on_loaded(&mut self) {
        log::debug!("Crate loaded with {} items", self.contents.len());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Light that several systems can switch
#[derive(Debug, Default)]
struct Lamp {
    lit: BoolLens,
    brightness: f32,
}

impl Component for Lamp {
    fn type_name(&self) -> &'static str {
        "Lamp"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn registry() -> Registry {
    Registry::builder()
        .component(
            ComponentType::builder::<Crate>("Crate")
                .default_factory()
                .property("Position", |c| c.position, |c, v| c.position = v)
                .saved()
                .field("contents", |c| c.contents.clone(), |c, v| c.contents = v)
                .saved()
                .field("open", |c| c.open, |c, v| c.open = v)
                .saved()
                .query("IsEmpty", |c| c.contents.is_empty())
                .build(),
        )
        .component(
            ComponentType::builder::<Lamp>("Lamp")
                .default_factory()
                .field("lit", |l| l.lit.clone(), |l, v| l.lit = v)
                .saved()
                .property("Brightness", |l| l.brightness, |l, v| l.brightness = v)
                .saved()
                .build(),
        )
        .build()
}

fn main() {
    env_logger::init();
    log::info!("Savegraph demo starting...");

    let settings = SaveSettings::load(Path::new(SETTINGS_PATH));
    let storage = FileStorage::new(settings.save_directory.clone());
    let mut manager = SaveManager::new(
        Arc::new(registry()),
        Box::new(AssetLibrary::new()),
        storage,
        settings,
    );

    manager.register_item(
        Item::new("Crate")
            .with_unique_name("crate_01")
            .with_component(Crate {
                position: Vec3::new(1.0, 0.0, -2.5),
                contents: vec!["rope".into(), "lantern".into()],
                open: false,
            }),
    );
    let mut lamp = Lamp {
        brightness: 0.75,
        ..Default::default()
    };
    lamp.lit.request(1, true);
    manager.register_item(Item::new("Lamp").with_unique_name("lamp_01").with_component(lamp));

    if let Err(e) = manager.save_world_state(None) {
        log::error!("Save failed: {}", e);
        return;
    }

    if let Some(c) = manager
        .item_mut("crate_01")
        .and_then(|i| i.get_mut::<Crate>())
    {
        c.contents.clear();
        c.open = true;
    }

    match manager.load_from_disk(None) {
        Ok(true) => {
            if let Some(c) = manager.item("crate_01").and_then(|i| i.get::<Crate>()) {
                log::info!("Crate after load: {:?}", c);
            }
            if let Some(l) = manager.item("lamp_01").and_then(|i| i.get::<Lamp>()) {
                log::info!("Lamp lit after load: {}", l.lit.value());
            }
        }
        Ok(false) => log::warn!("Nothing to load"),
        Err(e) => log::error!("Load failed: {}", e),
    }

    for event in manager.drain_events() {
        log::debug!("Event: {:?}", event);
    }
}
