use serde::{Deserialize, Serialize};

use crate::data_pack::{FloorDataPack, LevelData, PopDataPack};
use crate::legacy::LegacyLevel;
use crate::prefab::{Category, SchoolLevel, Service, SubService};

/// One configuration change. Building names refer to prefab names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ConfigAction {
    SelectPack {
        service: Service,
        sub_service: SubService,
        pack: String,
    },
    ClearPackSelection {
        service: Service,
        sub_service: SubService,
    },
    /// `None` removes the building's own selection.
    SetBuildingPack {
        building: String,
        pack: Option<String>,
    },
    SelectFloorPack {
        service: Service,
        pack: String,
    },
    SetFloorOverride {
        building: String,
        pack: Option<FloorDataPack>,
    },
    SelectSchoolPack {
        level: SchoolLevel,
        pack: String,
    },
    SetMultiplier {
        service: Service,
        sub_service: SubService,
        value: f32,
    },
    /// Value 0 clears.
    SetOverride {
        building: String,
        value: u32,
    },
    SetWorkerOverride {
        building: String,
        value: u32,
    },
    SetCustomSchools {
        enabled: bool,
    },
    AddCustomPack {
        pack: PopDataPack,
    },
    SetCustomLevel {
        pack: String,
        level: u8,
        data: LevelData,
    },
    SetLegacyLevel {
        category: Category,
        row: usize,
        level: LegacyLevel,
    },
    SetVisitPercent {
        category: Category,
        percent: u32,
    },
    InvalidateCaches,
}
