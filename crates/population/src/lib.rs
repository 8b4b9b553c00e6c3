//! Household, workplace and student counts for city-builder buildings,
//! derived from building volume instead of lot size.
//!
//! [`PopData`] is the engine: it resolves which calculation pack applies to a
//! building, runs it, applies multipliers and overrides and caches the
//! answer. [`PopulationPlugin`] wires it into a bevy app together with the
//! configuration queue and a system that keeps each building entity's
//! [`capacity::BuildingCapacity`] current.

use bevy::prelude::*;
use std::collections::BTreeMap;

pub mod capacity;
pub mod config;
pub mod config_actions;
pub mod data_pack;
pub mod employment;
pub mod legacy;
pub mod multipliers;
pub mod overrides;
pub mod pop_data;
pub mod prefab;

#[cfg(test)]
mod integration_tests;

pub use pop_data::PopData;

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// A resource that persists itself as an opaque blob under a fixed key.
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Key in the saved blob map. Never change it once shipped.
    const SAVE_KEY: &'static str;

    /// `None` when there is nothing worth saving (default state).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    fn load_from_bytes(bytes: &[u8]) -> Self;
}

/// `bitcode::decode`, or `T::default()` with a warning when the bytes are bad.
pub fn decode_or_warn<T: bitcode::DecodeOwned + Default>(key: &str, bytes: &[u8]) -> T {
    bitcode::decode(bytes).unwrap_or_else(|e| {
        warn!(
            "Saved '{}' ({} bytes) could not be decoded, using defaults: {}",
            key,
            bytes.len(),
            e
        );
        T::default()
    })
}

type SaveFn = Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>;
type LoadFn = Box<dyn Fn(&mut World, &[u8]) + Send + Sync>;
type ResetFn = Box<dyn Fn(&mut World) + Send + Sync>;

struct SaveableEntry {
    key: &'static str,
    save: SaveFn,
    load: LoadFn,
    reset: ResetFn,
}

/// Every [`Saveable`] resource registered by a plugin, so a host save system
/// can store and restore them without knowing their types.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    /// Register `T`. A second registration under the same key is ignored.
    pub fn register<T: Saveable>(&mut self) {
        if self.contains(T::SAVE_KEY) {
            warn!("Saveable key '{}' registered twice; keeping the first", T::SAVE_KEY);
            return;
        }
        self.entries.push(SaveableEntry {
            key: T::SAVE_KEY,
            save: Box::new(|world| world.get_resource::<T>().and_then(T::save_to_bytes)),
            load: Box::new(|world, bytes| world.insert_resource(T::load_from_bytes(bytes))),
            reset: Box::new(|world| world.insert_resource(T::default())),
        });
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        self.entries
            .iter()
            .filter_map(|e| (e.save)(world).map(|bytes| (e.key.to_string(), bytes)))
            .collect()
    }

    /// Load every registered key present in `blobs`; absent keys keep their
    /// current value.
    pub fn load_all(&self, world: &mut World, blobs: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            if let Some(bytes) = blobs.get(entry.key) {
                (entry.load)(world, bytes);
            }
        }
    }

    pub fn reset_all(&self, world: &mut World) {
        for entry in &self.entries {
            (entry.reset)(world);
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Ordering of this crate's systems within `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PopulationSet {
    /// Queued configuration changes are applied.
    Config,
    /// Building capacities are brought up to date.
    Capacity,
}

pub struct PopulationPlugin;

impl Plugin for PopulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PopData>()
            .init_resource::<config_actions::ConfigQueue>()
            .init_resource::<SaveableRegistry>()
            .add_event::<config_actions::PopConfigChanged>()
            .configure_sets(
                Update,
                (PopulationSet::Config, PopulationSet::Capacity).chain(),
            )
            .add_systems(
                Update,
                (
                    config_actions::apply_config_actions.in_set(PopulationSet::Config),
                    capacity::refresh_building_capacity.in_set(PopulationSet::Capacity),
                ),
            );

        app.world_mut()
            .resource_mut::<SaveableRegistry>()
            .register::<PopData>();
    }
}
