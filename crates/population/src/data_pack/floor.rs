use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::types::{DataVersion, PackInfo};
use crate::config_actions::ConfigError;

/// How a building's height is split into storeys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct FloorDataPack {
    pub info: PackInfo,
    /// Height of every storey above the ground floor, in metres. Must be > 0.
    pub floor_height: f32,
    /// Minimum ground floor height.
    pub first_floor_min: f32,
    /// Extra ground floor height used when the building is tall enough for it.
    pub first_floor_extra: f32,
    /// Ground floor has no units (lobby, shops, parking).
    pub first_floor_empty: bool,
}

impl FloorDataPack {
    pub fn new(
        version: DataVersion,
        name: &str,
        floor_height: f32,
        first_floor_min: f32,
        first_floor_extra: f32,
        first_floor_empty: bool,
    ) -> Self {
        Self {
            info: PackInfo::new(version, name),
            floor_height,
            first_floor_min,
            first_floor_extra,
            first_floor_empty,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.floor_height > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "floor pack '{}': floor height must be positive, got {}",
                self.info.name, self.floor_height
            )));
        }
        if !(self.first_floor_min >= 0.0) || !(self.first_floor_extra >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "floor pack '{}': first floor heights can't be negative",
                self.info.name
            )));
        }
        Ok(())
    }

    /// Ground floor height for a building of `height` metres.
    pub fn first_floor_height(&self, height: f32) -> f32 {
        let extended = self.first_floor_min + self.first_floor_extra;
        if height >= extended {
            extended
        } else {
            self.first_floor_min
        }
    }

    /// Storeys that can hold units.
    ///
    /// `max(1, floor((height - first) / floor_height) + 1)`, minus the ground
    /// floor when it is empty. May therefore be zero for a single-storey
    /// building with an empty ground floor.
    pub fn floor_count(&self, height: f32) -> u32 {
        let floors = if self.floor_height > 0.0 {
            let first = self.first_floor_height(height);
            let above = ((height - first) / self.floor_height).floor();
            if above.is_finite() && above > 0.0 {
                // f32 -> u32 casts saturate.
                (above as u32).saturating_add(1)
            } else {
                1
            }
        } else {
            warn!(
                "Floor pack '{}' has non-positive floor height {}; treating building as one storey",
                self.info.name, self.floor_height
            );
            1
        };

        if self.first_floor_empty {
            floors - 1
        } else {
            floors
        }
    }
}
