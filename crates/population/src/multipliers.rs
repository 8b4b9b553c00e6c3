//! Per-category scaling applied on top of every computed household and
//! workplace count.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::{MAX_MULTIPLIER, MIN_MULTIPLIER};
use crate::config_actions::ConfigError;
use crate::prefab::{BuildingPrefab, Service, SubService};

pub const DEFAULT_MULTIPLIER: f32 = 1.0;

/// One non-default multiplier, as stored in saved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MultiplierEntry {
    pub service: Service,
    pub sub_service: SubService,
    pub value: f32,
}

/// (service, sub-service) -> scale factor. Missing entries are 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multipliers {
    values: HashMap<(Service, SubService), f32>,
}

impl Multipliers {
    pub fn get(&self, service: Service, sub_service: SubService) -> f32 {
        self.values
            .get(&(service, sub_service))
            .copied()
            .unwrap_or(DEFAULT_MULTIPLIER)
    }

    pub fn for_prefab(&self, prefab: &BuildingPrefab) -> f32 {
        self.get(prefab.service, prefab.sub_service)
    }

    /// Set a multiplier, clamped to the allowed range. Setting the default
    /// removes the entry.
    pub fn set(
        &mut self,
        service: Service,
        sub_service: SubService,
        value: f32,
    ) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::InvalidValue(format!(
                "multiplier for {service:?}/{sub_service:?} must be finite"
            )));
        }
        let value = value.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);
        if (value - DEFAULT_MULTIPLIER).abs() < f32::EPSILON {
            self.values.remove(&(service, sub_service));
        } else {
            self.values.insert((service, sub_service), value);
        }
        Ok(())
    }

    pub fn is_default(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-default entries in a stable order.
    pub fn entries(&self) -> Vec<MultiplierEntry> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(&(service, sub_service), &value)| MultiplierEntry {
                service,
                sub_service,
                value,
            })
            .collect();
        entries.sort_by_key(|e| (e.service, e.sub_service));
        entries
    }

    pub fn from_entries(entries: &[MultiplierEntry]) -> Self {
        let mut multipliers = Self::default();
        for entry in entries {
            // Saved data went through `set` once already; anything invalid is
            // dropped back to the default.
            let _ = multipliers.set(entry.service, entry.sub_service, entry.value);
        }
        multipliers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one() {
        let m = Multipliers::default();
        assert!((m.get(Service::Residential, SubService::ResidentialLow) - 1.0).abs() < f32::EPSILON);
        assert!(m.is_default());
    }

    #[test]
    fn test_set_and_get() {
        let mut m = Multipliers::default();
        m.set(Service::Office, SubService::OfficeGeneric, 2.5)
            .expect("finite");
        assert!((m.get(Service::Office, SubService::OfficeGeneric) - 2.5).abs() < f32::EPSILON);
        assert!((m.get(Service::Office, SubService::OfficeHightech) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_set_clamps_and_rejects_nan() {
        let mut m = Multipliers::default();
        m.set(Service::Commercial, SubService::CommercialLow, -3.0)
            .expect("finite");
        assert!(m.get(Service::Commercial, SubService::CommercialLow).abs() < f32::EPSILON);
        assert!(m
            .set(Service::Commercial, SubService::CommercialLow, f32::NAN)
            .is_err());
    }

    #[test]
    fn test_setting_default_removes_entry() {
        let mut m = Multipliers::default();
        m.set(Service::Industrial, SubService::IndustrialOil, 3.0)
            .expect("finite");
        m.set(Service::Industrial, SubService::IndustrialOil, 1.0)
            .expect("finite");
        assert!(m.is_default());
    }

    #[test]
    fn test_entries_roundtrip() {
        let mut m = Multipliers::default();
        m.set(Service::Residential, SubService::ResidentialHigh, 1.5)
            .expect("finite");
        m.set(Service::Commercial, SubService::CommercialHigh, 0.5)
            .expect("finite");
        let entries = m.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].service, Service::Residential);
        assert_eq!(Multipliers::from_entries(&entries), m);
    }
}
