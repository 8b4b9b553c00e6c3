//! Population packs: one variant per calculation strategy, dispatched by
//! matching on [`PopPackKind`].

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::floor::FloorDataPack;
use super::types::{DataVersion, PackInfo};
use super::volumetric::{volumetric_units, LevelData, VolumetricPack};
use crate::config::{HOST_NATIVE, MIN_UNITS};
use crate::employment::{distribute_for, VisitRates, Workplaces};
use crate::legacy::{self, LegacyTables};
use crate::prefab::{BuildingPrefab, Service};

/// Calculation strategy and the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum PopPackKind {
    /// Defer to the host's own numbers.
    Vanilla,
    /// Flat per-category area tables.
    Legacy,
    Volumetric(VolumetricPack),
}

/// Everything a pack reads besides the prefab itself.
#[derive(Clone, Copy)]
pub struct CalcContext<'a> {
    pub floors: &'a FloorDataPack,
    pub legacy: &'a LegacyTables,
    pub visits: &'a VisitRates,
}

/// A selectable population/workplace calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PopDataPack {
    pub info: PackInfo,
    /// Only applies to this service; `None` applies to all.
    pub service: Option<Service>,
    pub kind: PopPackKind,
}

impl PopDataPack {
    pub fn vanilla() -> Self {
        Self {
            info: PackInfo::new(DataVersion::Vanilla, "vanilla")
                .with_keys("pack.vanilla.name", "pack.vanilla.desc"),
            service: None,
            kind: PopPackKind::Vanilla,
        }
    }

    pub fn legacy() -> Self {
        Self {
            info: PackInfo::new(DataVersion::Legacy, "legacy")
                .with_keys("pack.legacy.name", "pack.legacy.desc"),
            service: None,
            kind: PopPackKind::Legacy,
        }
    }

    pub fn volumetric(name: &str, service: Service, levels: Vec<LevelData>) -> Self {
        Self::with_levels(DataVersion::VolumetricV1, name, service, levels)
    }

    /// A user-editable volumetric pack.
    pub fn custom(name: &str, service: Service, levels: Vec<LevelData>) -> Self {
        Self::with_levels(DataVersion::CustomV1, name, service, levels)
    }

    fn with_levels(version: DataVersion, name: &str, service: Service, levels: Vec<LevelData>) -> Self {
        if levels.len() != service.level_count() {
            warn!(
                "Pack '{}' has {} levels, expected {} for {:?}; requests will be clamped",
                name,
                levels.len(),
                service.level_count(),
                service
            );
        }
        Self {
            info: PackInfo::new(version, name),
            service: Some(service),
            kind: PopPackKind::Volumetric(VolumetricPack { levels }),
        }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn version(&self) -> DataVersion {
        self.info.version()
    }

    pub fn applies_to(&self, service: Service) -> bool {
        self.service.map_or(true, |s| s == service)
    }

    pub fn is_vanilla(&self) -> bool {
        matches!(self.kind, PopPackKind::Vanilla)
    }

    /// Households for residential buildings, student places for schools
    /// (called with the school's level), zero for everything else.
    /// [`HOST_NATIVE`] for the vanilla pack.
    pub fn population(
        &self,
        prefab: &BuildingPrefab,
        level: u8,
        multiplier: f32,
        ctx: CalcContext<'_>,
    ) -> u32 {
        match &self.kind {
            PopPackKind::Vanilla => HOST_NATIVE,
            _ if !counts_population(prefab.service) => 0,
            PopPackKind::Legacy => legacy::households(prefab, level, multiplier, ctx.legacy),
            PopPackKind::Volumetric(pack) => match pack.level_data(level) {
                Some(data) => volumetric_units(
                    prefab.effective_floor_area(),
                    prefab.height,
                    data,
                    ctx.floors,
                    multiplier,
                ),
                None => {
                    warn!("Pack '{}' has no level data; using minimum", self.name());
                    MIN_UNITS
                }
            },
        }
    }

    /// Jobs per tier plus visitors. Buildings that don't employ get
    /// [`Workplaces::MINIMUM`].
    pub fn workplaces(
        &self,
        prefab: &BuildingPrefab,
        level: u8,
        multiplier: f32,
        ctx: CalcContext<'_>,
    ) -> Workplaces {
        match &self.kind {
            PopPackKind::Vanilla => Workplaces::HOST_NATIVE,
            _ if !prefab.service.has_workplaces() => Workplaces::MINIMUM,
            PopPackKind::Legacy => {
                legacy::workplaces(prefab, level, multiplier, ctx.legacy, ctx.visits)
            }
            PopPackKind::Volumetric(pack) => {
                let Some(data) = pack.level_data(level) else {
                    warn!("Pack '{}' has no level data; using minimum", self.name());
                    return Workplaces::MINIMUM;
                };
                let total = volumetric_units(
                    prefab.effective_floor_area(),
                    prefab.height,
                    data,
                    ctx.floors,
                    multiplier,
                );
                let category = prefab.category();
                Workplaces {
                    levels: distribute_for(
                        category,
                        category.row_index(level, prefab.extractor),
                        total,
                    ),
                    visitors: ctx.visits.visitors(category, total),
                }
            }
        }
    }

    /// Student places: zero for non-schools, native for tiers without pack
    /// data, otherwise `population` at the school's level.
    pub fn students(&self, prefab: &BuildingPrefab, multiplier: f32, ctx: CalcContext<'_>) -> u32 {
        let Some(school_level) = prefab.school_level.filter(|_| prefab.is_school()) else {
            return 0;
        };
        match school_level.pack_index() {
            Some(index) => self.population(prefab, index, multiplier, ctx),
            None => prefab.native_students,
        }
    }
}

fn counts_population(service: Service) -> bool {
    matches!(service, Service::Residential | Service::Education)
}
