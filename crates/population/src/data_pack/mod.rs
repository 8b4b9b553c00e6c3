//! Calculation packs.
//!
//! A pack is a named, versioned bundle of calculation parameters. Population
//! packs ([`PopDataPack`]) decide how households, workplaces and students are
//! derived; floor packs ([`FloorDataPack`]) split a building's height into
//! storeys; school packs ([`SchoolDataPack`]) drive school staffing and cost.
//! The [`PackCatalog`] holds every pack the user can choose from.

mod catalog;
mod floor;
mod pop_pack;
mod school;
mod types;
mod volumetric;

pub use catalog::PackCatalog;
pub use floor::FloorDataPack;
pub use pop_pack::{CalcContext, PopDataPack, PopPackKind};
pub use school::SchoolDataPack;
pub use types::{DataVersion, PackInfo};
pub use volumetric::{volumetric_units, LevelData, VolumetricPack};
