//! Applies queued [`ConfigAction`]s to [`PopData`]. Every action goes through
//! a `PopData` setter, so caches are cleared by the time the next system in
//! the frame asks for a count.

use bevy::prelude::*;

use super::{ConfigAction, ConfigError, ConfigQueue};
use crate::pop_data::PopData;

/// Sent once per applied action.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PopConfigChanged {
    pub action: ConfigAction,
    pub result: Result<(), ConfigError>,
}

/// Drains the queue and applies every action in order.
pub fn apply_config_actions(
    mut queue: ResMut<ConfigQueue>,
    mut data: ResMut<PopData>,
    mut changed: EventWriter<PopConfigChanged>,
) {
    if queue.is_empty() {
        return;
    }
    for action in queue.drain() {
        let result = apply_config_action(&mut data, &action);
        if let Err(e) = &result {
            warn!("Population config change {:?} rejected: {}", action, e);
        }
        changed.send(PopConfigChanged { action, result });
    }
}

pub fn apply_config_action(data: &mut PopData, action: &ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::SelectPack {
            service,
            sub_service,
            pack,
        } => data.select_pack(*service, *sub_service, pack),
        ConfigAction::ClearPackSelection {
            service,
            sub_service,
        } => {
            data.clear_pack_selection(*service, *sub_service);
            Ok(())
        }
        ConfigAction::SetBuildingPack { building, pack } => {
            data.set_building_pack(building, pack.as_deref())
        }
        ConfigAction::SelectFloorPack { service, pack } => data.select_floor_pack(*service, pack),
        ConfigAction::SetFloorOverride { building, pack } => {
            data.set_floor_override(building, pack.clone())
        }
        ConfigAction::SelectSchoolPack { level, pack } => data.select_school_pack(*level, pack),
        ConfigAction::SetMultiplier {
            service,
            sub_service,
            value,
        } => data.set_multiplier(*service, *sub_service, *value),
        ConfigAction::SetOverride { building, value } => {
            data.set_override(building, *value);
            Ok(())
        }
        ConfigAction::SetWorkerOverride { building, value } => {
            data.set_worker_override(building, *value);
            Ok(())
        }
        ConfigAction::SetCustomSchools { enabled } => {
            data.set_custom_schools(*enabled);
            Ok(())
        }
        ConfigAction::AddCustomPack { pack } => data.add_custom_pack(pack.clone()),
        ConfigAction::SetCustomLevel { pack, level, data: level_data } => {
            data.set_custom_level(pack, *level, *level_data)
        }
        ConfigAction::SetLegacyLevel {
            category,
            row,
            level,
        } => data.set_legacy_level(*category, *row, *level),
        ConfigAction::SetVisitPercent { category, percent } => {
            data.set_visit_percent(*category, *percent)
        }
        ConfigAction::InvalidateCaches => {
            data.invalidate_caches();
            Ok(())
        }
    }
}
