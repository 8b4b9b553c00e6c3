//! The population engine: pack selection, overrides, multipliers and the
//! result caches, behind one [`PopData`] resource.
//!
//! Every query goes through a cache keyed by prefab and level. Cached values
//! are returned as-is, so each configuration setter here ends by clearing the
//! caches in full. Callers outside this module can't mutate configuration
//! without going through those setters.

mod cache;
mod save;

pub use cache::{CacheKey, PopCache};
pub use save::{PackSelection, PopConfig};

use bevy::prelude::*;
use std::collections::HashMap;

use crate::config::{is_host_native, MIN_UNITS};
use crate::config_actions::ConfigError;
use crate::data_pack::{
    CalcContext, DataVersion, FloorDataPack, LevelData, PackCatalog, PopDataPack, PopPackKind,
    SchoolDataPack,
};
use crate::employment::{distribute_for, VisitRates, WorkplaceLevels, Workplaces};
use crate::legacy::{self, Consumption, LegacyLevel, LegacyTables};
use crate::multipliers::Multipliers;
use crate::overrides::OverrideTable;
use crate::prefab::{BuildingPrefab, Category, SchoolLevel, Service, SubService};

/// Staffing and cost of a school under the custom school model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchoolProperties {
    pub students: u32,
    pub workers: WorkplaceLevels,
    pub construction_cost: u64,
    pub maintenance_cost: u64,
}

/// Population engine state.
#[derive(Resource, Debug, Clone)]
pub struct PopData {
    catalog: PackCatalog,
    vanilla: PopDataPack,
    fallback_floor: FloorDataPack,
    selections: HashMap<(Service, SubService), String>,
    building_packs: HashMap<String, String>,
    floor_selections: HashMap<Service, String>,
    floor_overrides: HashMap<String, FloorDataPack>,
    school_selections: HashMap<SchoolLevel, String>,
    multipliers: Multipliers,
    overrides: OverrideTable,
    worker_overrides: OverrideTable,
    legacy: LegacyTables,
    visits: VisitRates,
    custom_schools: bool,
    cache: PopCache,
}

impl Default for PopData {
    fn default() -> Self {
        Self::new(PackCatalog::default())
    }
}

impl PopData {
    pub fn new(catalog: PackCatalog) -> Self {
        if let Err(e) = catalog.validate() {
            warn!("Pack catalog has problems ({}); affected selections fall back to vanilla", e);
        }
        Self {
            catalog,
            vanilla: PopDataPack::vanilla(),
            fallback_floor: FloorDataPack::new(DataVersion::VolumetricV1, "fallback", 3.0, 3.0, 0.0, false),
            selections: HashMap::new(),
            building_packs: HashMap::new(),
            floor_selections: HashMap::new(),
            floor_overrides: HashMap::new(),
            school_selections: HashMap::new(),
            multipliers: Multipliers::default(),
            overrides: OverrideTable::default(),
            worker_overrides: OverrideTable::default(),
            legacy: LegacyTables::default(),
            visits: VisitRates::default(),
            custom_schools: false,
            cache: PopCache::default(),
        }
    }

    pub fn from_catalog_json(json: &str) -> Result<Self, serde_json::Error> {
        PackCatalog::from_json(json).map(Self::new)
    }

    // -----------------------------------------------------------------------
    // Pack resolution
    // -----------------------------------------------------------------------

    /// The pack in effect for a (service, sub-service) pair. Never fails:
    /// missing or mismatched selections fall back to the catalog default, and
    /// then to vanilla.
    pub fn active_pack(&self, service: Service, sub_service: SubService) -> &PopDataPack {
        self.selections
            .get(&(service, sub_service))
            .and_then(|name| self.catalog.find_pop(name))
            .filter(|pack| pack.applies_to(service))
            .or_else(|| {
                self.catalog
                    .default_pop_name(Category::resolve(service, sub_service))
                    .and_then(|name| self.catalog.find_pop(name))
                    .filter(|pack| pack.applies_to(service))
            })
            .unwrap_or(&self.vanilla)
    }

    /// The pack for one prefab: a per-building selection wins over the
    /// category selection.
    pub fn pack_for(&self, prefab: &BuildingPrefab) -> &PopDataPack {
        self.building_packs
            .get(&prefab.name)
            .and_then(|name| self.catalog.find_pop(name))
            .filter(|pack| pack.applies_to(prefab.service))
            .unwrap_or_else(|| self.active_pack(prefab.service, prefab.sub_service))
    }

    /// Floor pack for one prefab: per-building override, then the service
    /// selection, then the catalog default.
    pub fn floor_pack_for(&self, prefab: &BuildingPrefab) -> &FloorDataPack {
        if let Some(pack) = self.floor_overrides.get(&prefab.name) {
            return pack;
        }
        self.floor_selections
            .get(&prefab.service)
            .map(String::as_str)
            .or_else(|| self.catalog.default_floor_name(prefab.service))
            .and_then(|name| self.catalog.find_floor(name))
            .unwrap_or(&self.fallback_floor)
    }

    pub fn school_pack(&self, level: SchoolLevel) -> Option<&SchoolDataPack> {
        self.school_selections
            .get(&level)
            .and_then(|name| self.catalog.find_school(name))
            .or_else(|| self.catalog.default_school(level))
    }

    fn ctx<'a>(&'a self, prefab: &BuildingPrefab) -> CalcContext<'a> {
        CalcContext {
            floors: self.floor_pack_for(prefab),
            legacy: &self.legacy,
            visits: &self.visits,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Households for a residential building at `level` (zero-based). Zero for
    /// buildings without homes; [`crate::config::HOST_NATIVE`] when the host
    /// should use its own number.
    pub fn population(&mut self, prefab: &BuildingPrefab, level: u8) -> u32 {
        if !prefab.service.has_households() {
            return 0;
        }
        let key = (prefab.id, level);
        if let Some(cached) = self.cache.household(key) {
            return cached;
        }
        let value = self.compute_households(prefab, level);
        self.cache.insert_household(key, value);
        value
    }

    fn compute_households(&self, prefab: &BuildingPrefab, level: u8) -> u32 {
        if let Some(fixed) = self.overrides.lookup(&prefab.name) {
            return fixed;
        }
        let multiplier = self.multipliers.for_prefab(prefab);
        let raw = self
            .pack_for(prefab)
            .population(prefab, level, multiplier, self.ctx(prefab));
        floor_unless_native(raw)
    }

    /// Jobs per tier plus visitor capacity.
    pub fn workplaces(&mut self, prefab: &BuildingPrefab, level: u8) -> Workplaces {
        let key = (prefab.id, level);
        if let Some(cached) = self.cache.workplaces(key) {
            return cached;
        }
        let value = self.compute_workplaces(prefab, level);
        self.cache.insert_workplaces(key, value);
        value
    }

    fn compute_workplaces(&self, prefab: &BuildingPrefab, level: u8) -> Workplaces {
        let category = prefab.category();
        if let Some(total) = self.worker_overrides.lookup(&prefab.name) {
            return Workplaces {
                levels: distribute_for(
                    category,
                    category.row_index(level, prefab.extractor),
                    total,
                ),
                visitors: self.visits.visitors(category, total),
            };
        }
        let multiplier = self.multipliers.for_prefab(prefab);
        let jobs = self
            .pack_for(prefab)
            .workplaces(prefab, level, multiplier, self.ctx(prefab));
        if !jobs.is_host_native() && jobs.total() == 0 {
            Workplaces::MINIMUM
        } else {
            jobs
        }
    }

    /// Student places. Zero for non-schools; the host's own count unless
    /// custom school capacities are enabled.
    pub fn students(&mut self, prefab: &BuildingPrefab) -> u32 {
        if !prefab.is_school() {
            return 0;
        }
        if !self.custom_schools {
            return prefab.native_students;
        }
        let Some(index) = prefab.school_level.and_then(SchoolLevel::pack_index) else {
            return prefab.native_students;
        };
        let key = (prefab.id, index);
        if let Some(cached) = self.cache.household(key) {
            return cached;
        }
        let value = self.compute_students(prefab);
        self.cache.insert_household(key, value);
        value
    }

    fn compute_students(&self, prefab: &BuildingPrefab) -> u32 {
        if let Some(fixed) = self.overrides.lookup(&prefab.name) {
            return fixed;
        }
        let multiplier = self.multipliers.for_prefab(prefab);
        let raw = self
            .pack_for(prefab)
            .students(prefab, multiplier, self.ctx(prefab));
        if is_host_native(raw) {
            prefab.native_students
        } else {
            raw.max(MIN_UNITS)
        }
    }

    /// Students, staff and costs for a school, when custom schools are on and
    /// a school pack exists for its tier.
    pub fn school_properties(&mut self, prefab: &BuildingPrefab) -> Option<SchoolProperties> {
        if !self.custom_schools || !prefab.is_school() {
            return None;
        }
        let level = prefab.school_level?;
        let students = self.students(prefab);
        let pack = self.school_pack(level)?;
        Some(SchoolProperties {
            students,
            workers: pack.workers(students),
            construction_cost: pack.construction_cost(students),
            maintenance_cost: pack.maintenance(students),
        })
    }

    /// Utility and economy totals from the legacy rate tables, scaled by the
    /// building's households, students or jobs. `None` when that count is
    /// left to the host.
    pub fn consumption(&mut self, prefab: &BuildingPrefab, level: u8) -> Option<Consumption> {
        let units = if prefab.service.has_households() {
            self.population(prefab, level)
        } else if prefab.is_school() {
            self.students(prefab)
        } else {
            let jobs = self.workplaces(prefab, level);
            if jobs.is_host_native() {
                return None;
            }
            jobs.total()
        };
        if is_host_native(units) {
            return None;
        }
        // Schools take their rate row from the school tier, not the level.
        let row_level = match prefab.school_level.filter(|_| prefab.is_school()) {
            Some(tier) => tier.pack_index().unwrap_or(u8::MAX),
            None => level,
        };
        Some(legacy::consumption(prefab, row_level, units, &self.legacy))
    }

    // -----------------------------------------------------------------------
    // Configuration (every successful change invalidates the caches)
    // -----------------------------------------------------------------------

    pub fn select_pack(
        &mut self,
        service: Service,
        sub_service: SubService,
        pack: &str,
    ) -> Result<(), ConfigError> {
        let found = self
            .catalog
            .find_pop(pack)
            .ok_or_else(|| ConfigError::UnknownPack(pack.to_string()))?;
        check_service(found, service)?;
        self.selections
            .insert((service, sub_service), pack.to_string());
        self.invalidate_caches();
        Ok(())
    }

    /// Drop a category selection so the catalog default applies again.
    pub fn clear_pack_selection(&mut self, service: Service, sub_service: SubService) {
        self.selections.remove(&(service, sub_service));
        self.invalidate_caches();
    }

    /// Pin one building to a pack, or clear the pin with `None`.
    pub fn set_building_pack(&mut self, building: &str, pack: Option<&str>) -> Result<(), ConfigError> {
        match pack {
            Some(name) => {
                if self.catalog.find_pop(name).is_none() {
                    return Err(ConfigError::UnknownPack(name.to_string()));
                }
                self.building_packs
                    .insert(building.to_string(), name.to_string());
            }
            None => {
                self.building_packs.remove(building);
            }
        }
        self.invalidate_caches();
        Ok(())
    }

    pub fn select_floor_pack(&mut self, service: Service, pack: &str) -> Result<(), ConfigError> {
        if self.catalog.find_floor(pack).is_none() {
            return Err(ConfigError::UnknownPack(pack.to_string()));
        }
        self.floor_selections.insert(service, pack.to_string());
        self.invalidate_caches();
        Ok(())
    }

    /// Give one building its own floor parameters, or clear them with `None`.
    /// The pack must be an `OverrideV1` pack.
    pub fn set_floor_override(
        &mut self,
        building: &str,
        pack: Option<FloorDataPack>,
    ) -> Result<(), ConfigError> {
        match pack {
            Some(pack) => {
                if pack.info.version() != DataVersion::OverrideV1 {
                    return Err(ConfigError::WrongVersion(pack.info.name.clone()));
                }
                pack.validate()?;
                self.floor_overrides.insert(building.to_string(), pack);
            }
            None => {
                self.floor_overrides.remove(building);
            }
        }
        self.invalidate_caches();
        Ok(())
    }

    pub fn select_school_pack(&mut self, level: SchoolLevel, pack: &str) -> Result<(), ConfigError> {
        let found = self
            .catalog
            .find_school(pack)
            .ok_or_else(|| ConfigError::UnknownPack(pack.to_string()))?;
        if found.level != level {
            return Err(ConfigError::InvalidValue(format!(
                "school pack '{}' is for {:?}, not {:?}",
                pack, found.level, level
            )));
        }
        self.school_selections.insert(level, pack.to_string());
        self.invalidate_caches();
        Ok(())
    }

    pub fn set_multiplier(
        &mut self,
        service: Service,
        sub_service: SubService,
        value: f32,
    ) -> Result<(), ConfigError> {
        self.multipliers.set(service, sub_service, value)?;
        self.invalidate_caches();
        Ok(())
    }

    pub fn multiplier(&self, service: Service, sub_service: SubService) -> f32 {
        self.multipliers.get(service, sub_service)
    }

    /// Fix a building's households (or students) at `value`; 0 clears.
    pub fn set_override(&mut self, building: &str, value: u32) {
        self.overrides.set(building, value);
        self.invalidate_caches();
    }

    /// The household/student override for a building, 0 when unset.
    pub fn get_override(&self, building: &str) -> u32 {
        self.overrides.get(building)
    }

    /// Fix a building's total jobs at `value`; 0 clears.
    pub fn set_worker_override(&mut self, building: &str, value: u32) {
        self.worker_overrides.set(building, value);
        self.invalidate_caches();
    }

    pub fn get_worker_override(&self, building: &str) -> u32 {
        self.worker_overrides.get(building)
    }

    pub fn set_custom_schools(&mut self, enabled: bool) {
        self.custom_schools = enabled;
        self.invalidate_caches();
    }

    pub fn custom_schools(&self) -> bool {
        self.custom_schools
    }

    /// Add a user pack. Must be `CustomV1` with a name not already in use.
    pub fn add_custom_pack(&mut self, pack: PopDataPack) -> Result<(), ConfigError> {
        if pack.version() != DataVersion::CustomV1 {
            return Err(ConfigError::WrongVersion(pack.name().to_string()));
        }
        if self.catalog.find_pop(pack.name()).is_some() {
            return Err(ConfigError::DuplicatePack(pack.name().to_string()));
        }
        self.catalog.pop_packs.push(pack);
        self.invalidate_caches();
        Ok(())
    }

    /// Replace one level of a user pack.
    pub fn set_custom_level(&mut self, pack: &str, level: u8, data: LevelData) -> Result<(), ConfigError> {
        if !(data.area_per > 0.0) || data.empty_percent > 100 || !(data.empty_area >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "level data for pack '{pack}' out of range"
            )));
        }
        let found = self
            .catalog
            .find_pop_mut(pack)
            .ok_or_else(|| ConfigError::UnknownPack(pack.to_string()))?;
        if found.version() != DataVersion::CustomV1 {
            return Err(ConfigError::WrongVersion(pack.to_string()));
        }
        let PopPackKind::Volumetric(volumetric) = &mut found.kind else {
            return Err(ConfigError::WrongVersion(pack.to_string()));
        };
        let slot = volumetric
            .levels
            .get_mut(usize::from(level))
            .ok_or_else(|| ConfigError::InvalidLevel {
                pack: pack.to_string(),
                level,
            })?;
        *slot = data;
        self.invalidate_caches();
        Ok(())
    }

    pub fn set_legacy_level(
        &mut self,
        category: Category,
        row: usize,
        level: LegacyLevel,
    ) -> Result<(), ConfigError> {
        self.legacy.set_row(category, row, level)?;
        self.invalidate_caches();
        Ok(())
    }

    pub fn set_visit_percent(&mut self, category: Category, percent: u32) -> Result<(), ConfigError> {
        if !self.visits.set_percent(category, percent) {
            return Err(ConfigError::InvalidValue(format!(
                "{category:?} has no visitors"
            )));
        }
        self.invalidate_caches();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Caches
    // -----------------------------------------------------------------------

    pub fn clear_household_cache(&mut self) {
        self.cache.clear_households();
    }

    pub fn clear_workplace_cache(&mut self) {
        self.cache.clear_workplaces();
    }

    /// Drop every cached result.
    pub fn invalidate_caches(&mut self) {
        debug!(
            "Invalidating population caches ({} household, {} workplace entries)",
            self.cache.household_len(),
            self.cache.workplace_len()
        );
        self.clear_household_cache();
        self.clear_workplace_cache();
    }

    pub fn cache(&self) -> &PopCache {
        &self.cache
    }

    pub fn catalog(&self) -> &PackCatalog {
        &self.catalog
    }

    pub fn legacy_tables(&self) -> &LegacyTables {
        &self.legacy
    }
}

fn floor_unless_native(value: u32) -> u32 {
    if is_host_native(value) {
        value
    } else {
        value.max(MIN_UNITS)
    }
}

fn check_service(pack: &PopDataPack, requested: Service) -> Result<(), ConfigError> {
    match pack.service {
        Some(pack_service) if pack_service != requested => Err(ConfigError::ServiceMismatch {
            pack: pack.name().to_string(),
            pack_service,
            requested,
        }),
        _ => Ok(()),
    }
}
