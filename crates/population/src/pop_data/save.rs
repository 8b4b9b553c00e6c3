use bevy::prelude::*;
use bitcode::{Decode, Encode};

use super::PopData;
use crate::data_pack::{DataVersion, FloorDataPack, PackCatalog, PopDataPack};
use crate::employment::VisitRates;
use crate::legacy::LegacyTables;
use crate::multipliers::MultiplierEntry;
use crate::prefab::{SchoolLevel, Service, SubService};
use crate::{decode_or_warn, Saveable};

/// A category's chosen pack.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct PackSelection {
    pub service: Service,
    pub sub_service: SubService,
    pub pack: String,
}

/// Everything the user can change, in a stable order. User (`CustomV1`)
/// packs are listed on their own; the rest of the catalog is only stored
/// when it differs from the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Encode, Decode)]
pub struct PopConfig {
    /// `None` while the built-in catalog is in use.
    pub catalog: Option<PackCatalog>,
    pub selections: Vec<PackSelection>,
    pub building_packs: Vec<(String, String)>,
    pub floor_selections: Vec<(Service, String)>,
    pub floor_overrides: Vec<(String, FloorDataPack)>,
    pub school_selections: Vec<(SchoolLevel, String)>,
    pub multipliers: Vec<MultiplierEntry>,
    pub overrides: Vec<(String, u32)>,
    pub worker_overrides: Vec<(String, u32)>,
    pub custom_packs: Vec<PopDataPack>,
    /// `None` while the tables are untouched.
    pub legacy: Option<LegacyTables>,
    pub visits: VisitRates,
    pub custom_schools: bool,
}

impl PopData {
    /// The catalog without user packs.
    fn base_catalog(&self) -> PackCatalog {
        let mut catalog = self.catalog.clone();
        catalog
            .pop_packs
            .retain(|p| p.version() != DataVersion::CustomV1);
        catalog
    }

    pub fn snapshot(&self) -> PopConfig {
        let mut selections: Vec<_> = self
            .selections
            .iter()
            .map(|(&(service, sub_service), pack)| PackSelection {
                service,
                sub_service,
                pack: pack.clone(),
            })
            .collect();
        selections.sort_by_key(|s| (s.service, s.sub_service));

        let mut building_packs: Vec<_> = self
            .building_packs
            .iter()
            .map(|(b, p)| (b.clone(), p.clone()))
            .collect();
        building_packs.sort();

        let mut floor_selections: Vec<_> = self
            .floor_selections
            .iter()
            .map(|(&s, p)| (s, p.clone()))
            .collect();
        floor_selections.sort_by_key(|(s, _)| *s);

        let mut floor_overrides: Vec<_> = self
            .floor_overrides
            .iter()
            .map(|(b, p)| (b.clone(), p.clone()))
            .collect();
        floor_overrides.sort_by(|a, b| a.0.cmp(&b.0));

        let mut school_selections: Vec<_> = self
            .school_selections
            .iter()
            .map(|(&l, p)| (l, p.clone()))
            .collect();
        school_selections.sort_by_key(|(l, _)| l.pack_index().unwrap_or(u8::MAX));

        let base = self.base_catalog();
        let catalog = (base != PackCatalog::default()).then_some(base);
        let legacy = (self.legacy != LegacyTables::default()).then(|| self.legacy.clone());

        PopConfig {
            catalog,
            selections,
            building_packs,
            floor_selections,
            floor_overrides,
            school_selections,
            multipliers: self.multipliers.entries(),
            overrides: self.overrides.entries(),
            worker_overrides: self.worker_overrides.entries(),
            custom_packs: self
                .catalog
                .pop_packs
                .iter()
                .filter(|p| p.version() == DataVersion::CustomV1)
                .cloned()
                .collect(),
            legacy,
            visits: self.visits.clone(),
            custom_schools: self.custom_schools,
        }
    }

    /// Replace all user configuration with `config`. Entries that no longer
    /// apply (a pack that was removed, a mismatched service) are skipped with
    /// a warning; the rest still load.
    pub fn restore(&mut self, config: PopConfig) {
        let catalog = match config.catalog {
            Some(saved) => saved,
            None => self.base_catalog(),
        };
        let mut data = PopData::new(catalog);
        let mut skipped = 0usize;
        let mut note = |what: &str, result: Result<(), crate::config_actions::ConfigError>| {
            if let Err(e) = result {
                warn!("Skipping saved {}: {}", what, e);
                skipped += 1;
            }
        };

        for pack in config.custom_packs {
            note("custom pack", data.add_custom_pack(pack));
        }
        for s in &config.selections {
            note(
                "pack selection",
                data.select_pack(s.service, s.sub_service, &s.pack),
            );
        }
        for (building, pack) in &config.building_packs {
            note("building pack", data.set_building_pack(building, Some(pack)));
        }
        for (service, pack) in &config.floor_selections {
            note("floor pack selection", data.select_floor_pack(*service, pack));
        }
        for (building, pack) in config.floor_overrides {
            note("floor override", data.set_floor_override(&building, Some(pack)));
        }
        for (level, pack) in &config.school_selections {
            note("school pack selection", data.select_school_pack(*level, pack));
        }
        for m in &config.multipliers {
            note(
                "multiplier",
                data.set_multiplier(m.service, m.sub_service, m.value),
            );
        }
        for (building, value) in &config.overrides {
            data.set_override(building, *value);
        }
        for (building, value) in &config.worker_overrides {
            data.set_worker_override(building, *value);
        }
        if let Some(legacy) = config.legacy {
            data.legacy = legacy;
        }
        data.visits = config.visits;
        data.custom_schools = config.custom_schools;
        data.invalidate_caches();

        info!(
            "Restored population configuration: {} selections, {} overrides, {} skipped",
            data.selections.len() + data.building_packs.len(),
            data.overrides.len() + data.worker_overrides.len(),
            skipped
        );
        *self = data;
    }
}

impl Saveable for PopData {
    const SAVE_KEY: &'static str = "population_config";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        let config = self.snapshot();
        if config == PopConfig::default() {
            return None;
        }
        Some(bitcode::encode(&config))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let config: PopConfig = decode_or_warn(Self::SAVE_KEY, bytes);
        let mut data = PopData::default();
        data.restore(config);
        data
    }
}
