//! Per-entity capacity: keeps a [`BuildingCapacity`] component on every
//! building entity in step with its prefab, its level and the engine
//! configuration.

use bevy::prelude::*;

use crate::employment::Workplaces;
use crate::pop_data::PopData;
use crate::prefab::BuildingPrefab;

/// Zero-based building level (host level 1 is 0).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildingLevel(pub u8);

/// Computed capacity of one building.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingCapacity {
    pub households: u32,
    pub workplaces: Workplaces,
    pub students: u32,
}

impl BuildingCapacity {
    pub fn compute(data: &mut PopData, prefab: &BuildingPrefab, level: BuildingLevel) -> Self {
        Self {
            households: data.population(prefab, level.0),
            workplaces: data.workplaces(prefab, level.0),
            students: data.students(prefab),
        }
    }
}

/// Recomputes capacity for buildings that are new, changed prefab or level,
/// or all of them after a configuration change.
///
/// Cache fills don't count as configuration changes, so they go through
/// `bypass_change_detection`.
pub fn refresh_building_capacity(
    mut commands: Commands,
    mut data: ResMut<PopData>,
    mut buildings: Query<(
        Entity,
        Ref<BuildingPrefab>,
        Ref<BuildingLevel>,
        Option<&mut BuildingCapacity>,
    )>,
) {
    let config_changed = data.is_changed();
    let data = data.bypass_change_detection();
    let mut refreshed = 0usize;

    for (entity, prefab, level, capacity) in &mut buildings {
        let stale = config_changed || prefab.is_changed() || level.is_changed();
        match capacity {
            Some(mut current) if stale => {
                let fresh = BuildingCapacity::compute(data, &prefab, *level);
                if *current != fresh {
                    *current = fresh;
                }
                refreshed += 1;
            }
            Some(_) => {}
            None => {
                let fresh = BuildingCapacity::compute(data, &prefab, *level);
                commands.entity(entity).insert(fresh);
                refreshed += 1;
            }
        }
    }

    if refreshed > 0 {
        debug!("Refreshed capacity of {} buildings", refreshed);
    }
}
