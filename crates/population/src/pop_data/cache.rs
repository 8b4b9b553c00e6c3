use std::collections::HashMap;

use crate::employment::Workplaces;
use crate::prefab::PrefabId;

/// Cache key: prefab identity and the level asked about.
pub type CacheKey = (PrefabId, u8);

/// Memoised results. Entries are never revalidated on read, so every
/// configuration change must clear the cache in full.
#[derive(Debug, Clone, Default)]
pub struct PopCache {
    households: HashMap<CacheKey, u32>,
    workplaces: HashMap<CacheKey, Workplaces>,
}

impl PopCache {
    pub fn household(&self, key: CacheKey) -> Option<u32> {
        self.households.get(&key).copied()
    }

    pub fn insert_household(&mut self, key: CacheKey, value: u32) {
        self.households.insert(key, value);
    }

    pub fn workplaces(&self, key: CacheKey) -> Option<Workplaces> {
        self.workplaces.get(&key).copied()
    }

    pub fn insert_workplaces(&mut self, key: CacheKey, value: Workplaces) {
        self.workplaces.insert(key, value);
    }

    pub fn clear_households(&mut self) {
        self.households.clear();
    }

    pub fn clear_workplaces(&mut self) {
        self.workplaces.clear();
    }

    pub fn household_len(&self) -> usize {
        self.households.len()
    }

    pub fn workplace_len(&self) -> usize {
        self.workplaces.len()
    }
}
