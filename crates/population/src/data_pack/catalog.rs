//! The catalog of available packs and the built-in defaults.
//!
//! Catalogs are plain data and round-trip through JSON, so tuning sets can be
//! shipped or shared as files.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::floor::FloorDataPack;
use super::pop_pack::PopDataPack;
use super::school::SchoolDataPack;
use super::types::DataVersion;
use super::volumetric::LevelData;
use crate::config_actions::ConfigError;
use crate::prefab::{Category, SchoolLevel, Service};

/// All packs that can be selected, plus the selection used when the user
/// hasn't chosen one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PackCatalog {
    pub pop_packs: Vec<PopDataPack>,
    pub floor_packs: Vec<FloorDataPack>,
    pub school_packs: Vec<SchoolDataPack>,
    pub default_pop: BTreeMap<Category, String>,
    pub default_floor: BTreeMap<Service, String>,
}

impl Default for PackCatalog {
    fn default() -> Self {
        Self {
            pop_packs: default_pop_packs(),
            floor_packs: default_floor_packs(),
            school_packs: default_school_packs(),
            default_pop: default_pop_selection(),
            default_floor: default_floor_selection(),
        }
    }
}

impl PackCatalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn find_pop(&self, name: &str) -> Option<&PopDataPack> {
        self.pop_packs.iter().find(|p| p.name() == name)
    }

    pub fn find_pop_mut(&mut self, name: &str) -> Option<&mut PopDataPack> {
        self.pop_packs.iter_mut().find(|p| p.name() == name)
    }

    pub fn find_floor(&self, name: &str) -> Option<&FloorDataPack> {
        self.floor_packs.iter().find(|p| p.info.name == name)
    }

    pub fn find_school(&self, name: &str) -> Option<&SchoolDataPack> {
        self.school_packs.iter().find(|p| p.info.name == name)
    }

    /// First school pack for a tier.
    pub fn default_school(&self, level: SchoolLevel) -> Option<&SchoolDataPack> {
        self.school_packs.iter().find(|p| p.level == level)
    }

    pub fn default_pop_name(&self, category: Category) -> Option<&str> {
        self.default_pop.get(&category).map(String::as_str)
    }

    pub fn default_floor_name(&self, service: Service) -> Option<&str> {
        self.default_floor.get(&service).map(String::as_str)
    }

    /// Check names are unique, floor packs are usable and every default
    /// points at a pack that exists and applies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in self.pop_packs.iter().map(|p| p.name()) {
            if !seen.insert(name) {
                return Err(ConfigError::DuplicatePack(name.to_string()));
            }
        }
        for floor in &self.floor_packs {
            floor.validate()?;
        }
        for (&category, name) in &self.default_pop {
            let pack = self
                .find_pop(name)
                .ok_or_else(|| ConfigError::UnknownPack(name.clone()))?;
            if let Some(pack_service) = pack.service.filter(|&s| s != category.service()) {
                return Err(ConfigError::ServiceMismatch {
                    pack: name.clone(),
                    pack_service,
                    requested: category.service(),
                });
            }
        }
        for name in self.default_floor.values() {
            if self.find_floor(name).is_none() {
                return Err(ConfigError::UnknownPack(name.clone()));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in data
// ---------------------------------------------------------------------------

fn default_pop_packs() -> Vec<PopDataPack> {
    let lvl = LevelData::new;
    vec![
        PopDataPack::vanilla(),
        PopDataPack::legacy(),
        PopDataPack::volumetric(
            "res_detached",
            Service::Residential,
            vec![
                lvl(0.0, 0, 140.0, true),
                lvl(0.0, 0, 145.0, true),
                lvl(0.0, 0, 150.0, true),
                lvl(0.0, 0, 160.0, true),
                lvl(0.0, 0, 170.0, true),
            ],
        ),
        PopDataPack::volumetric(
            "res_apartments",
            Service::Residential,
            vec![
                lvl(20.0, 10, 75.0, false),
                lvl(20.0, 10, 80.0, false),
                lvl(25.0, 10, 85.0, false),
                lvl(30.0, 12, 95.0, false),
                lvl(30.0, 12, 105.0, false),
            ],
        ),
        PopDataPack::volumetric(
            "com_shops",
            Service::Commercial,
            vec![
                lvl(0.0, 20, 40.0, false),
                lvl(0.0, 20, 35.0, false),
                lvl(0.0, 20, 30.0, false),
            ],
        ),
        PopDataPack::volumetric(
            "com_mall",
            Service::Commercial,
            vec![
                lvl(50.0, 25, 35.0, false),
                lvl(50.0, 25, 30.0, false),
                lvl(50.0, 25, 25.0, false),
            ],
        ),
        PopDataPack::volumetric(
            "ind_factory",
            Service::Industrial,
            vec![
                lvl(0.0, 10, 60.0, false),
                lvl(0.0, 10, 45.0, false),
                lvl(0.0, 10, 35.0, false),
            ],
        ),
        PopDataPack::volumetric(
            "office_block",
            Service::Office,
            vec![
                lvl(40.0, 15, 14.0, false),
                lvl(40.0, 15, 12.0, false),
                lvl(40.0, 15, 10.0, false),
            ],
        ),
        PopDataPack::volumetric(
            "school_default",
            Service::Education,
            vec![lvl(0.0, 30, 12.0, false), lvl(0.0, 30, 15.0, false)],
        ),
    ]
}

fn default_pop_selection() -> BTreeMap<Category, String> {
    Category::all()
        .iter()
        .map(|&category| {
            let name = match category {
                Category::ResidentialLow | Category::ResidentialLowEco => "res_detached",
                Category::ResidentialHigh | Category::ResidentialHighEco => "res_apartments",
                Category::CommercialLow | Category::CommercialEco => "com_shops",
                Category::CommercialHigh
                | Category::CommercialLeisure
                | Category::CommercialTourist => "com_mall",
                Category::IndustryGeneric
                | Category::IndustryFarming
                | Category::IndustryForestry
                | Category::IndustryOil
                | Category::IndustryOre => "ind_factory",
                Category::Office | Category::OfficeHighTech => "office_block",
                Category::School => "school_default",
                Category::Other => "vanilla",
            };
            (category, name.to_string())
        })
        .collect()
}

fn default_floor_packs() -> Vec<FloorDataPack> {
    let v1 = DataVersion::VolumetricV1;
    vec![
        FloorDataPack::new(v1, "generic", 3.0, 3.0, 1.0, false),
        FloorDataPack::new(v1, "plain", 3.0, 3.0, 0.0, false),
        FloorDataPack::new(v1, "commercial", 4.0, 4.0, 2.0, false),
        FloorDataPack::new(v1, "warehouse", 9.0, 9.0, 0.0, false),
        FloorDataPack::new(v1, "podium", 3.0, 3.0, 3.0, true),
    ]
}

fn default_floor_selection() -> BTreeMap<Service, String> {
    Service::all()
        .iter()
        .map(|&service| {
            let name = match service {
                Service::Residential => "generic",
                Service::Commercial => "commercial",
                Service::Industrial => "warehouse",
                Service::Office | Service::Education | Service::Other => "plain",
            };
            (service, name.to_string())
        })
        .collect()
}

fn default_school_packs() -> Vec<SchoolDataPack> {
    vec![
        SchoolDataPack::new(
            "elementary_default",
            SchoolLevel::Elementary,
            [1, 2, 1, 0],
            [0, 20, 40, 0],
            20_000,
            100,
            1_000,
            10,
        ),
        SchoolDataPack::new(
            "highschool_default",
            SchoolLevel::HighSchool,
            [1, 2, 2, 1],
            [0, 25, 30, 60],
            40_000,
            120,
            1_600,
            16,
        ),
    ]
}
