//! Volumetric unit calculation: floor area and storeys in, households /
//! workers / students out.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::floor::FloorDataPack;
use crate::config::{scale_and_clamp, MIN_UNITS};

/// Area requirements for one building level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LevelData {
    /// Fixed area removed from each floor before dividing (stairs, lobby).
    pub empty_area: f32,
    /// Percentage of the remaining area that is also unusable. 0..=100.
    pub empty_percent: u8,
    /// Area per household / worker / student. Must be > 0.
    pub area_per: f32,
    /// A unit spans the full building height (detached houses) instead of a
    /// single floor.
    pub multi_floor_units: bool,
}

impl LevelData {
    pub const fn new(empty_area: f32, empty_percent: u8, area_per: f32, multi_floor_units: bool) -> Self {
        Self {
            empty_area,
            empty_percent,
            area_per,
            multi_floor_units,
        }
    }

    /// Usable area of one floor after the fixed and percentage deductions.
    pub fn usable_area(&self, floor_area: f32) -> f64 {
        let after_fixed = (f64::from(floor_area) - f64::from(self.empty_area)).max(0.0);
        let keep = f64::from(100 - self.empty_percent.min(100)) / 100.0;
        after_fixed * keep
    }

    /// Unscaled unit count for `floors` storeys of `floor_area` each.
    pub fn raw_units(&self, floor_area: f32, floors: u32) -> f64 {
        if floors == 0 || !(self.area_per > 0.0) {
            return 0.0;
        }
        let per_floor = (self.usable_area(floor_area) / f64::from(self.area_per)).floor();
        if self.multi_floor_units {
            // Each unit already occupies every storey: count the footprint once.
            per_floor
        } else {
            // Each floor is divided on its own, then summed.
            per_floor * f64::from(floors)
        }
    }
}

/// Per-level area data for a volumetric pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct VolumetricPack {
    pub levels: Vec<LevelData>,
}

impl VolumetricPack {
    /// Level data for `level`, clamped to the last available level.
    pub fn level_data(&self, level: u8) -> Option<&LevelData> {
        let last = self.levels.len().checked_sub(1)?;
        self.levels.get(usize::from(level).min(last))
    }
}

/// Final unit count for a building.
///
/// Always at least [`MIN_UNITS`]; never the host sentinel.
pub fn volumetric_units(
    floor_area: f32,
    height: f32,
    level: &LevelData,
    floors: &FloorDataPack,
    multiplier: f32,
) -> u32 {
    if !(level.area_per > 0.0) {
        warn!(
            "Level data has non-positive area per unit ({}); using minimum of {}",
            level.area_per, MIN_UNITS
        );
        return MIN_UNITS;
    }
    let floor_count = floors.floor_count(height);
    scale_and_clamp(level.raw_units(floor_area, floor_count), multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_pack::DataVersion;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn storeys() -> FloorDataPack {
        FloorDataPack::new(DataVersion::VolumetricV1, "storeys", 3.0, 3.0, 0.0, false)
    }

    #[test]
    fn test_single_floor_exact() {
        let level = LevelData::new(0.0, 0, 100.0, false);
        assert_eq!(volumetric_units(500.0, 3.0, &level, &storeys(), 1.0), 5);
    }

    #[test]
    fn test_empty_percent_reduces_area() {
        let level = LevelData::new(0.0, 20, 100.0, false);
        assert_eq!(volumetric_units(500.0, 3.0, &level, &storeys(), 1.0), 4);
    }

    #[test]
    fn test_empty_area_clamps_to_zero_and_floors_at_one() {
        let level = LevelData::new(800.0, 0, 100.0, false);
        assert!(level.usable_area(500.0).abs() < f64::EPSILON);
        assert_eq!(volumetric_units(500.0, 3.0, &level, &storeys(), 1.0), 1);
    }

    #[test]
    fn test_multiplier_scales_and_rounds() {
        let level = LevelData::new(0.0, 0, 100.0, false);
        assert_eq!(volumetric_units(500.0, 3.0, &level, &storeys(), 1.5), 8);
        assert_eq!(volumetric_units(500.0, 3.0, &level, &storeys(), 0.5), 3);
    }

    #[test]
    fn test_single_floor_units_double_with_height() {
        let level = LevelData::new(0.0, 0, 50.0, false);
        let short = volumetric_units(400.0, 9.0, &level, &storeys(), 1.0);
        let tall = volumetric_units(400.0, 18.0, &level, &storeys(), 1.0);
        assert_eq!(short, 24);
        assert_eq!(tall, 48);
    }

    #[test]
    fn test_multi_floor_units_ignore_height() {
        let level = LevelData::new(0.0, 0, 50.0, true);
        let short = volumetric_units(400.0, 6.0, &level, &storeys(), 1.0);
        let tall = volumetric_units(400.0, 12.0, &level, &storeys(), 1.0);
        assert_eq!(short, 8);
        assert_eq!(tall, short, "full-height units must not scale with storeys");
    }

    #[test]
    fn test_non_positive_area_per_gives_minimum() {
        let level = LevelData::new(0.0, 0, 0.0, false);
        assert_eq!(volumetric_units(5000.0, 30.0, &level, &storeys(), 1.0), 1);
    }

    #[test]
    fn test_level_data_clamps() {
        let pack = VolumetricPack {
            levels: vec![
                LevelData::new(0.0, 0, 10.0, false),
                LevelData::new(0.0, 0, 20.0, false),
            ],
        };
        assert!((pack.level_data(0).map(|l| l.area_per).unwrap_or(0.0) - 10.0).abs() < f32::EPSILON);
        assert!((pack.level_data(7).map(|l| l.area_per).unwrap_or(0.0) - 20.0).abs() < f32::EPSILON);
        let empty = VolumetricPack { levels: vec![] };
        assert!(empty.level_data(0).is_none());
    }

    #[test]
    fn test_property_units_at_least_one_and_height_laws() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..1000 {
            let level = LevelData::new(
                rng.gen_range(0.0..200.0),
                rng.gen_range(0..=100),
                rng.gen_range(5.0..300.0),
                rng.gen_bool(0.5),
            );
            let area: f32 = rng.gen_range(0.0..5000.0);
            let floors: u32 = rng.gen_range(1..40);
            let height = 3.0 * floors as f32;
            let mult: f32 = rng.gen_range(0.0..4.0);

            let units = volumetric_units(area, height, &level, &storeys(), mult);
            assert!(units >= 1);

            let single = level.raw_units(area, floors);
            let double = level.raw_units(area, floors * 2);
            if level.multi_floor_units {
                assert!((double - single).abs() < f64::EPSILON);
            } else {
                assert!((double - 2.0 * single).abs() < 1e-6);
            }
        }
    }
}
