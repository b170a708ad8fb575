//! World save/load orchestration
//!
//! The manager owns the registered items and the last captured or loaded
//! [`WorldState`]. Items registered after a load pick up their saved state
//! immediately. Progress is reported through [`SaveEvent`]s drained by the
//! caller.

use std::sync::Arc;

use super::apply::{ApplyStats, apply_item_state};
use super::capture::build_item_state;
use super::context::{Registry, SaveContext};
use super::header::SaveHeader;
use crate::assets::AssetRegistry;
use crate::consts::SAVE_MANAGER_ITEM;
use crate::error::Result;
use crate::platform::SaveStorage;
use crate::settings::SaveSettings;
use crate::sim::{Entity, Item};
use crate::snapshot::{ItemState, WorldState};

/// Save/load lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveEvent {
    WillSave,
    SaveFinished,
    WillLoad,
    LoadFinished,
    /// Item with this unique (or kind) name was registered
    ItemRegistered(String),
    ItemDeregistered(String),
}

/// Owns items and moves world state between them and storage
pub struct SaveManager<S: SaveStorage> {
    registry: Arc<Registry>,
    assets: Box<dyn AssetRegistry>,
    storage: S,
    settings: SaveSettings,
    items: Vec<Item>,
    world_state: Option<WorldState>,
    events: Vec<SaveEvent>,
}

impl<S: SaveStorage> SaveManager<S> {
    pub fn new(
        registry: Arc<Registry>,
        assets: Box<dyn AssetRegistry>,
        storage: S,
        settings: SaveSettings,
    ) -> Self {
        let header = Item::new(SAVE_MANAGER_ITEM)
            .with_unique_name(SAVE_MANAGER_ITEM)
            .with_component(SaveHeader::new(settings.save_version));
        Self {
            registry,
            assets,
            storage,
            settings,
            items: vec![header],
            world_state: None,
            events: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &SaveSettings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn context(&self) -> SaveContext<'_> {
        SaveContext::new(&self.registry, self.assets.as_ref())
    }

    /// Add an item; if a world was loaded, its saved state is applied now
    pub fn register_item(&mut self, item: Item) -> &mut Item {
        let mut item = item;
        let saved = match (&self.world_state, item.unique_name()) {
            (Some(world), Some(unique)) => world.by_unique(unique),
            _ => None,
        };
        if let Some(state) = saved {
            log::debug!("Applying saved state to late item {}", item.item_name());
            let ctx = SaveContext::new(&self.registry, self.assets.as_ref());
            apply_item_state(&ctx, state, &mut item);
        }

        let label = item.unique_name().unwrap_or(item.item_name()).to_string();
        self.events.push(SaveEvent::ItemRegistered(label));
        self.items.push(item);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    /// Remove the first item with this unique name
    pub fn deregister_item(&mut self, unique_name: &str) -> Option<Item> {
        let index = self
            .items
            .iter()
            .position(|i| i.unique_name() == Some(unique_name))?;
        let item = self.items.remove(index);
        self.events
            .push(SaveEvent::ItemDeregistered(unique_name.to_string()));
        Some(item)
    }

    pub fn item(&self, unique_name: &str) -> Option<&Item> {
        self.items
            .iter()
            .find(|i| i.unique_name() == Some(unique_name))
    }

    pub fn item_mut(&mut self, unique_name: &str) -> Option<&mut Item> {
        self.items
            .iter_mut()
            .find(|i| i.unique_name() == Some(unique_name))
    }

    /// Every registered item, the manager's own item first
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Save version found in the last applied save
    pub fn loaded_version(&self) -> Option<i32> {
        self.item(SAVE_MANAGER_ITEM)
            .and_then(|i| i.get::<SaveHeader>())
            .and_then(SaveHeader::loaded)
    }

    pub fn world_state(&self) -> Option<&WorldState> {
        self.world_state.as_ref()
    }

    /// Capture every registered item into a fresh world state
    pub fn collect_world_state(&mut self) -> &WorldState {
        let ctx = SaveContext::new(&self.registry, self.assets.as_ref());
        let mut world = WorldState::new();
        for item in &self.items {
            world.items.push(build_item_state(&ctx, item));
        }
        log::info!("Captured {} items", world.len());
        self.world_state.insert(world)
    }

    /// Current world state as save text
    pub fn save_to_string(&mut self) -> Result<String> {
        let world = self.world_state.get_or_insert_with(WorldState::new);
        self.settings.text_format.to_string(&*world)
    }

    /// Write the current world state to a preset or the default location
    pub fn save_to_disk(&mut self, preset: Option<&str>) -> Result<()> {
        let text = self.save_to_string()?;
        let location = self.settings.save_location(preset);
        self.storage.write_text(&location, &text)?;
        log::info!("Saved {} ({} bytes)", location, text.len());
        Ok(())
    }

    /// Capture and write the world
    pub fn save_world_state(&mut self, preset: Option<&str>) -> Result<()> {
        self.events.push(SaveEvent::WillSave);
        self.collect_world_state();
        self.save_to_disk(preset)?;
        self.events.push(SaveEvent::SaveFinished);
        Ok(())
    }

    /// Overwrite the default location with an empty world
    pub fn clear_save(&mut self) -> Result<()> {
        self.events.push(SaveEvent::WillSave);
        self.world_state = Some(WorldState::new());
        self.save_to_disk(None)?;
        self.events.push(SaveEvent::SaveFinished);
        Ok(())
    }

    /// Read and apply a save; `Ok(false)` if there is nothing to load
    pub fn load_from_disk(&mut self, preset: Option<&str>) -> Result<bool> {
        self.events.push(SaveEvent::WillLoad);
        let location = self.settings.save_location(preset);
        let text = match self.storage.read_text(&location)? {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                log::info!("No save at {}", location);
                return Ok(false);
            }
        };

        self.load_from_str(&text)?;
        log::info!("Loaded {}", location);
        self.events.push(SaveEvent::LoadFinished);
        Ok(true)
    }

    /// Parse save text, apply it to registered items and keep it for late registrations
    pub fn load_from_str(&mut self, text: &str) -> Result<ApplyStats> {
        let world: WorldState = serde_json::from_str(text)?;
        let stats = self.apply_world_state(&world);
        self.world_state = Some(world);
        Ok(stats)
    }

    /// Apply each saved item to the first registered item with the same unique name
    pub fn apply_world_state(&mut self, world: &WorldState) -> ApplyStats {
        let ctx = SaveContext::new(&self.registry, self.assets.as_ref());
        let mut stats = ApplyStats::default();
        for state in &world.items {
            let Some(unique) = state.unique_name.as_deref().filter(|u| !u.is_empty()) else {
                continue;
            };
            match self
                .items
                .iter_mut()
                .find(|i| i.unique_name() == Some(unique))
            {
                Some(item) => stats += apply_item_state(&ctx, state, item),
                None => log::debug!("No registered item for {}", unique),
            }
        }
        stats
    }

    /// Build a new item from a snapshot, attaching its components
    pub fn instantiate_item(&self, state: &ItemState) -> Item {
        let mut item = Item::new(state.item_name.as_str());
        if let Some(unique) = &state.unique_name {
            item = item.with_unique_name(unique.as_str());
        }
        apply_item_state(&self.context(), state, &mut item);
        item
    }

    /// Save on the way out if configured to
    pub fn on_quit(&mut self) -> Result<()> {
        if self.settings.auto_save_on_quit {
            self.save_world_state(None)?;
        }
        Ok(())
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SaveEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use crate::testing::{Chest, Stash, TestItem, test_registry, weapon_library};

    fn manager() -> SaveManager<MemoryStorage> {
        SaveManager::new(
            Arc::new(test_registry()),
            Box::new(weapon_library()),
            MemoryStorage::new(),
            SaveSettings::default(),
        )
    }

    fn test_item(unique: &str, int_test: i32) -> Item {
        Item::new("Test")
            .with_unique_name(unique)
            .with_component(TestItem {
                int_test,
                ..Default::default()
            })
    }

    #[test]
    fn test_save_then_load_restores() {
        let mut manager = manager();
        manager.register_item(test_item("a", 5));
        manager.save_world_state(None).unwrap();
        assert!(manager.storage().get("savegame_v0").is_some());

        manager.item_mut("a").unwrap().get_mut::<TestItem>().unwrap().int_test = 99;
        assert!(manager.load_from_disk(None).unwrap());
        assert_eq!(manager.item("a").unwrap().get::<TestItem>().unwrap().int_test, 5);
        assert_eq!(manager.loaded_version(), Some(0));

        let events = manager.drain_events();
        assert_eq!(
            events,
            vec![
                SaveEvent::ItemRegistered("a".into()),
                SaveEvent::WillSave,
                SaveEvent::SaveFinished,
                SaveEvent::WillLoad,
                SaveEvent::LoadFinished,
            ]
        );
        assert!(manager.drain_events().is_empty());
    }

    #[test]
    fn test_load_nothing_returns_false() {
        let mut manager = manager();
        assert!(!manager.load_from_disk(Some("missing")).unwrap());
        assert_eq!(manager.drain_events(), vec![SaveEvent::WillLoad]);
    }

    #[test]
    fn test_late_registration_applies_loaded_state() {
        let mut source = manager();
        source.register_item(test_item("late", 42));
        source.collect_world_state();
        let text = source.save_to_string().unwrap();

        let mut target = manager();
        target.load_from_str(&text).unwrap();
        let item = target.register_item(test_item("late", 0));
        assert_eq!(item.get::<TestItem>().unwrap().int_test, 42);
        assert_eq!(item.load_count(), 1);
    }

    #[test]
    fn test_duplicate_identity_first_registered_wins() {
        let mut manager = manager();
        manager.register_item(test_item("dup", 1));
        manager.register_item(test_item("dup", 2));

        let mut world = WorldState::new();
        let mut state = ItemState::new("Test", Some("dup".into()));
        let mut component = crate::snapshot::PropertyState::new("TestItem");
        component.push_field(crate::snapshot::Field::new(
            "intTest",
            &crate::codec::TypeTag::I32,
            "7",
        ));
        state.components.push(component);
        world.items.push(state);

        manager.apply_world_state(&world);
        let values: Vec<_> = manager
            .items()
            .iter()
            .filter_map(|i| i.get::<TestItem>())
            .map(|t| t.int_test)
            .collect();
        assert_eq!(values, vec![7, 2]);
    }

    #[test]
    fn test_version_mismatch_still_loads() {
        let mut old = SaveManager::new(
            Arc::new(test_registry()),
            Box::new(weapon_library()),
            MemoryStorage::new(),
            SaveSettings {
                save_version: 1,
                ..Default::default()
            },
        );
        old.register_item(test_item("v", 3));
        old.collect_world_state();
        let text = old.save_to_string().unwrap();

        let mut current = SaveManager::new(
            Arc::new(test_registry()),
            Box::new(weapon_library()),
            MemoryStorage::new(),
            SaveSettings {
                save_version: 2,
                ..Default::default()
            },
        );
        current.register_item(test_item("v", 0));
        current.load_from_str(&text).unwrap();
        assert_eq!(current.loaded_version(), Some(1));
        assert_eq!(current.item("v").unwrap().get::<TestItem>().unwrap().int_test, 3);
    }

    #[test]
    fn test_clear_save_writes_empty_world() {
        let mut manager = manager();
        manager.register_item(test_item("a", 1));
        manager.save_world_state(None).unwrap();
        manager.clear_save().unwrap();

        let text = manager.storage().get("savegame_v0").unwrap();
        let world: WorldState = serde_json::from_str(text).unwrap();
        assert!(world.is_empty());
    }

    #[test]
    fn test_presets_are_separate_locations() {
        let mut manager = manager();
        manager.register_item(test_item("a", 1));
        manager.save_world_state(Some("arena")).unwrap();
        assert!(manager.storage().get("presets/arena").is_some());
        assert!(manager.storage().get("savegame_v0").is_none());
        assert!(manager.load_from_disk(Some("arena")).unwrap());
    }

    #[test]
    fn test_instantiate_item_from_snapshot() {
        let mut manager = manager();
        let mut chest = Chest::default();
        chest.label = "spawned".into();
        manager.register_item(Item::new("Chest").with_unique_name("c1").with_component(chest));
        let world = manager.collect_world_state().clone();

        let state = world.by_unique("c1").unwrap();
        let item = manager.instantiate_item(state);
        assert_eq!(item.item_name(), "Chest");
        assert_eq!(item.unique_name(), Some("c1"));
        assert_eq!(item.get::<Chest>().unwrap().label, "spawned");
    }

    #[test]
    fn test_nested_item_snapshots_reinstantiate() {
        let mut source = manager();
        let mut chest = Chest::default();
        chest.label = "inner".into();
        let inner = Item::new("Chest").with_component(chest);
        let inner_state = build_item_state(&source.context(), &inner);
        source.register_item(
            Item::new("Bag")
                .with_unique_name("bag")
                .with_component(Stash {
                    contents: vec![inner_state],
                }),
        );
        source.collect_world_state();
        let text = source.save_to_string().unwrap();

        let mut target = manager();
        target.register_item(Item::new("Bag").with_unique_name("bag").with_component(Stash::default()));
        target.load_from_str(&text).unwrap();

        let contents = target.item("bag").unwrap().get::<Stash>().unwrap().contents.clone();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].unique_name, None);
        let spawned = target.instantiate_item(&contents[0]);
        assert_eq!(spawned.item_name(), "Chest");
        assert_eq!(spawned.get::<Chest>().unwrap().label, "inner");
    }

    #[test]
    fn test_deregister_item() {
        let mut manager = manager();
        manager.register_item(test_item("gone", 1));
        assert!(manager.deregister_item("gone").is_some());
        assert!(manager.item("gone").is_none());
        assert!(manager.deregister_item("gone").is_none());
        assert_eq!(
            manager.drain_events().last(),
            Some(&SaveEvent::ItemDeregistered("gone".into()))
        );
    }

    #[test]
    fn test_on_quit_respects_setting() {
        let mut manager = SaveManager::new(
            Arc::new(test_registry()),
            Box::new(weapon_library()),
            MemoryStorage::new(),
            SaveSettings {
                auto_save_on_quit: false,
                ..Default::default()
            },
        );
        manager.on_quit().unwrap();
        assert!(manager.storage().is_empty());
    }
}
