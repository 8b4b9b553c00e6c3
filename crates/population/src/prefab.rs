//! Building prefab descriptors and the (service, sub-service) categories the
//! calculation tables are indexed by.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::CELL_AREA;

/// Top-level building service as reported by the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum Service {
    Residential,
    Commercial,
    Industrial,
    Office,
    Education,
    /// Any other service; never recalculated here.
    Other,
}

impl Service {
    /// Number of [`crate::data_pack::LevelData`] entries a volumetric pack for
    /// this service is expected to carry.
    pub fn level_count(self) -> usize {
        match self {
            Service::Residential => 5,
            Service::Commercial | Service::Industrial | Service::Office => 3,
            Service::Education => 2,
            Service::Other => 1,
        }
    }

    pub fn has_households(self) -> bool {
        self == Service::Residential
    }

    pub fn has_workplaces(self) -> bool {
        matches!(
            self,
            Service::Commercial | Service::Industrial | Service::Office
        )
    }

    pub fn all() -> &'static [Service] {
        &[
            Service::Residential,
            Service::Commercial,
            Service::Industrial,
            Service::Office,
            Service::Education,
            Service::Other,
        ]
    }
}

/// Finer-grained category within a service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Encode,
    Decode,
)]
pub enum SubService {
    #[default]
    None,
    ResidentialLow,
    ResidentialHigh,
    ResidentialLowEco,
    ResidentialHighEco,
    CommercialLow,
    CommercialHigh,
    CommercialEco,
    CommercialLeisure,
    CommercialTourist,
    IndustrialGeneric,
    IndustrialFarming,
    IndustrialForestry,
    IndustrialOil,
    IndustrialOre,
    OfficeGeneric,
    OfficeHightech,
}

/// School tier for education buildings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub enum SchoolLevel {
    Elementary,
    HighSchool,
    University,
}

impl SchoolLevel {
    /// Index into an education pack's levels, or `None` for tiers whose
    /// capacity is always left to the host.
    pub fn pack_index(self) -> Option<u8> {
        match self {
            SchoolLevel::Elementary => Some(0),
            SchoolLevel::HighSchool => Some(1),
            SchoolLevel::University => None,
        }
    }
}

/// Stable identity of a prefab, used as the cache key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct PrefabId(pub u32);

/// A building type definition as supplied by the host.
///
/// Attached as a component to building entities; the matching
/// [`crate::capacity::BuildingLevel`] carries the instance level.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingPrefab {
    pub id: PrefabId,
    pub name: String,
    pub service: Service,
    pub sub_service: SubService,
    /// Lot width in cells.
    pub width: u8,
    /// Lot length in cells.
    pub length: u8,
    /// Overall mesh height in metres.
    pub height: f32,
    /// Generated floor area of one storey in square metres. A non-positive
    /// value means the generator had nothing and the lot area is used.
    pub floor_area: f32,
    /// Resource extractor (specialised industry only).
    pub extractor: bool,
    pub school_level: Option<SchoolLevel>,
    /// Student count the host would use without recalculation.
    pub native_students: u32,
}

impl BuildingPrefab {
    /// Lot area in square metres.
    pub fn lot_area(&self) -> f32 {
        f32::from(self.width) * f32::from(self.length) * CELL_AREA
    }

    /// Generated floor area, falling back to the lot area.
    pub fn effective_floor_area(&self) -> f32 {
        if self.floor_area > 0.0 {
            self.floor_area
        } else {
            self.lot_area()
        }
    }

    pub fn category(&self) -> Category {
        Category::resolve(self.service, self.sub_service)
    }

    pub fn is_school(&self) -> bool {
        self.service == Service::Education && self.school_level.is_some()
    }
}

/// Calculation category: one row set in the legacy and employment tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum Category {
    ResidentialLow,
    ResidentialHigh,
    ResidentialLowEco,
    ResidentialHighEco,
    CommercialLow,
    CommercialHigh,
    CommercialEco,
    CommercialLeisure,
    CommercialTourist,
    IndustryGeneric,
    IndustryFarming,
    IndustryForestry,
    IndustryOil,
    IndustryOre,
    Office,
    OfficeHighTech,
    School,
    Other,
}

impl Category {
    /// Map a host (service, sub-service) pair onto a category.
    ///
    /// Pairs that don't belong together (third-party assets, missing DLC
    /// sub-services) are logged and treated as the service's generic category.
    pub fn resolve(service: Service, sub_service: SubService) -> Category {
        use SubService as S;
        let resolved = match (service, sub_service) {
            (Service::Residential, S::ResidentialLow) => Some(Category::ResidentialLow),
            (Service::Residential, S::ResidentialHigh) => Some(Category::ResidentialHigh),
            (Service::Residential, S::ResidentialLowEco) => Some(Category::ResidentialLowEco),
            (Service::Residential, S::ResidentialHighEco) => Some(Category::ResidentialHighEco),
            (Service::Commercial, S::CommercialLow) => Some(Category::CommercialLow),
            (Service::Commercial, S::CommercialHigh) => Some(Category::CommercialHigh),
            (Service::Commercial, S::CommercialEco) => Some(Category::CommercialEco),
            (Service::Commercial, S::CommercialLeisure) => Some(Category::CommercialLeisure),
            (Service::Commercial, S::CommercialTourist) => Some(Category::CommercialTourist),
            (Service::Industrial, S::IndustrialGeneric) => Some(Category::IndustryGeneric),
            (Service::Industrial, S::IndustrialFarming) => Some(Category::IndustryFarming),
            (Service::Industrial, S::IndustrialForestry) => Some(Category::IndustryForestry),
            (Service::Industrial, S::IndustrialOil) => Some(Category::IndustryOil),
            (Service::Industrial, S::IndustrialOre) => Some(Category::IndustryOre),
            (Service::Office, S::OfficeGeneric) => Some(Category::Office),
            (Service::Office, S::OfficeHightech) => Some(Category::OfficeHighTech),
            (Service::Education, _) => Some(Category::School),
            (Service::Other, _) => Some(Category::Other),
            _ => None,
        };

        resolved.unwrap_or_else(|| {
            let fallback = Category::generic_for(service);
            warn!(
                "Unrecognised sub-service {:?} for service {:?}; treating as {:?}",
                sub_service, service, fallback
            );
            fallback
        })
    }

    /// The generic category of a service.
    pub fn generic_for(service: Service) -> Category {
        match service {
            Service::Residential => Category::ResidentialLow,
            Service::Commercial => Category::CommercialLow,
            Service::Industrial => Category::IndustryGeneric,
            Service::Office => Category::Office,
            Service::Education => Category::School,
            Service::Other => Category::Other,
        }
    }

    pub fn service(self) -> Service {
        match self {
            Category::ResidentialLow
            | Category::ResidentialHigh
            | Category::ResidentialLowEco
            | Category::ResidentialHighEco => Service::Residential,
            Category::CommercialLow
            | Category::CommercialHigh
            | Category::CommercialEco
            | Category::CommercialLeisure
            | Category::CommercialTourist => Service::Commercial,
            Category::IndustryGeneric
            | Category::IndustryFarming
            | Category::IndustryForestry
            | Category::IndustryOil
            | Category::IndustryOre => Service::Industrial,
            Category::Office | Category::OfficeHighTech => Service::Office,
            Category::School => Service::Education,
            Category::Other => Service::Other,
        }
    }

    pub fn is_commercial(self) -> bool {
        self.service() == Service::Commercial
    }

    /// Specialised industry: rows are extractor / processor rather than levels.
    pub fn is_specialised_industry(self) -> bool {
        matches!(
            self,
            Category::IndustryFarming
                | Category::IndustryForestry
                | Category::IndustryOil
                | Category::IndustryOre
        )
    }

    /// Table row for a building of this category.
    pub fn row_index(self, level: u8, extractor: bool) -> usize {
        if self.is_specialised_industry() {
            if extractor {
                0
            } else {
                1
            }
        } else {
            usize::from(level)
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::ResidentialLow,
            Category::ResidentialHigh,
            Category::ResidentialLowEco,
            Category::ResidentialHighEco,
            Category::CommercialLow,
            Category::CommercialHigh,
            Category::CommercialEco,
            Category::CommercialLeisure,
            Category::CommercialTourist,
            Category::IndustryGeneric,
            Category::IndustryFarming,
            Category::IndustryForestry,
            Category::IndustryOil,
            Category::IndustryOre,
            Category::Office,
            Category::OfficeHighTech,
            Category::School,
            Category::Other,
        ]
    }
}

#[cfg(test)]
pub(crate) mod test_prefabs {
    use super::*;

    /// A plain prefab with no generated geometry.
    pub fn prefab(id: u32, service: Service, sub_service: SubService) -> BuildingPrefab {
        BuildingPrefab {
            id: PrefabId(id),
            name: format!("prefab_{id}"),
            service,
            sub_service,
            width: 4,
            length: 4,
            height: 3.0,
            floor_area: 0.0,
            extractor: false,
            school_level: None,
            native_students: 0,
        }
    }

    pub fn residential(id: u32, floor_area: f32, height: f32) -> BuildingPrefab {
        BuildingPrefab {
            floor_area,
            height,
            ..prefab(id, Service::Residential, SubService::ResidentialHigh)
        }
    }

    pub fn school(id: u32, level: SchoolLevel, native_students: u32) -> BuildingPrefab {
        BuildingPrefab {
            school_level: Some(level),
            native_students,
            floor_area: 600.0,
            height: 7.0,
            ..prefab(id, Service::Education, SubService::None)
        }
    }
}
