use bevy::prelude::*;

use super::tables::{Consumption, LegacyLevel, LegacyTables};
use crate::config::{
    scale_and_clamp, MIN_UNITS, MIN_WORKERS_EXTRACTOR, MIN_WORKERS_GENERIC, MIN_WORKERS_OFFICE,
};
use crate::employment::{distribute, VisitRates, Workplaces};
use crate::prefab::{BuildingPrefab, Category, Service};

/// Whole units that fit on the lot at `area_per` square metres each.
pub fn lot_units(prefab: &BuildingPrefab, area_per: f32) -> f64 {
    if !(area_per > 0.0) {
        return 0.0;
    }
    (f64::from(prefab.lot_area()) / f64::from(area_per)).floor()
}

fn row_for<'a>(tables: &'a LegacyTables, prefab: &BuildingPrefab, level: u8) -> Option<&'a LegacyLevel> {
    let category = prefab.category();
    let row = tables.row(category, category.row_index(level, prefab.extractor));
    if row.is_none() {
        warn!(
            "No legacy table for {:?} (prefab '{}'); using minimum values",
            category, prefab.name
        );
    }
    row
}

/// Households (or students, for schools) from the legacy tables.
pub fn households(prefab: &BuildingPrefab, level: u8, multiplier: f32, tables: &LegacyTables) -> u32 {
    match row_for(tables, prefab, level) {
        Some(row) => scale_and_clamp(lot_units(prefab, row.area_per), multiplier),
        None => MIN_UNITS,
    }
}

/// Smallest workforce a legacy job building may have.
pub fn min_workers(category: Category, extractor: bool) -> u32 {
    match category.service() {
        Service::Industrial if extractor && category.is_specialised_industry() => {
            MIN_WORKERS_EXTRACTOR
        }
        Service::Office => MIN_WORKERS_OFFICE,
        Service::Industrial | Service::Commercial => MIN_WORKERS_GENERIC,
        Service::Residential | Service::Education | Service::Other => MIN_UNITS,
    }
}

/// Workplaces from the legacy tables, split by the row's own tier shares.
pub fn workplaces(
    prefab: &BuildingPrefab,
    level: u8,
    multiplier: f32,
    tables: &LegacyTables,
    visits: &VisitRates,
) -> Workplaces {
    let Some(row) = row_for(tables, prefab, level) else {
        return Workplaces::MINIMUM;
    };
    let category = prefab.category();
    let total = scale_and_clamp(lot_units(prefab, row.area_per), multiplier)
        .max(min_workers(category, prefab.extractor));
    Workplaces {
        levels: distribute(total, row.workers),
        visitors: visits.visitors(category, total),
    }
}

/// Utility and economy totals for a building holding `units` households or
/// workers.
pub fn consumption(
    prefab: &BuildingPrefab,
    level: u8,
    units: u32,
    tables: &LegacyTables,
) -> Consumption {
    row_for(tables, prefab, level)
        .map(|row| row.rates.scaled(units))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefab::test_prefabs::prefab;
    use crate::prefab::SubService;

    #[test]
    fn test_lot_units_4x4() {
        let p = prefab(1, Service::Residential, SubService::ResidentialHigh);
        // 4 x 4 cells = 1024 m2
        assert!((lot_units(&p, 80.0) - 12.0).abs() < f64::EPSILON);
        assert!(lot_units(&p, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_households_from_table() {
        let p = prefab(1, Service::Residential, SubService::ResidentialHigh);
        let tables = LegacyTables::default();
        assert_eq!(households(&p, 0, 1.0, &tables), 12);
        assert_eq!(households(&p, 0, 2.0, &tables), 24);
        // level 4 row: 1024 / 100 = 10
        assert_eq!(households(&p, 4, 1.0, &tables), 10);
    }

    #[test]
    fn test_zero_raw_households_floor_to_one() {
        let p = prefab(1, Service::Residential, SubService::ResidentialLow);
        let mut tables = LegacyTables::default();
        let mut row = *tables.row(Category::ResidentialLow, 0).expect("row");
        row.area_per = 5000.0;
        tables
            .set_row(Category::ResidentialLow, 0, row)
            .expect("valid row");
        assert_eq!(households(&p, 0, 1.0, &tables), 1);
    }

    #[test]
    fn test_min_workers() {
        assert_eq!(min_workers(Category::IndustryOil, true), 3);
        assert_eq!(min_workers(Category::IndustryOil, false), 4);
        assert_eq!(min_workers(Category::IndustryGeneric, true), 4);
        assert_eq!(min_workers(Category::CommercialHigh, false), 4);
        assert_eq!(min_workers(Category::OfficeHighTech, false), 10);
        assert_eq!(min_workers(Category::ResidentialLow, false), 1);
    }

    #[test]
    fn test_workplaces_apply_minimums() {
        let mut p = prefab(2, Service::Office, SubService::OfficeGeneric);
        p.width = 1;
        p.length = 1;
        let tables = LegacyTables::default();
        let jobs = workplaces(&p, 0, 1.0, &tables, &VisitRates::default());
        // 64 / 16 = 4, raised to the office minimum of 10
        assert_eq!(jobs.total(), 10);
        assert_eq!(jobs.visitors, 0);
    }

    #[test]
    fn test_extractor_uses_extractor_row() {
        let mut p = prefab(3, Service::Industrial, SubService::IndustrialFarming);
        p.extractor = true;
        let tables = LegacyTables::default();
        let jobs = workplaces(&p, 0, 1.0, &tables, &VisitRates::default());
        // 1024 / 200 = 5 -> above the extractor minimum of 3
        assert_eq!(jobs.total(), 5);
        assert_eq!(jobs.levels.level3, 0);
    }

    #[test]
    fn test_commercial_workplaces_have_visitors() {
        let p = prefab(4, Service::Commercial, SubService::CommercialLow);
        let tables = LegacyTables::default();
        let jobs = workplaces(&p, 0, 1.0, &tables, &VisitRates::default());
        // 1024 / 40 = 25 workers, 250% visitors
        assert_eq!(jobs.total(), 25);
        assert_eq!(jobs.visitors, 63);
    }

    #[test]
    fn test_consumption_multiplies_rates() {
        let p = prefab(5, Service::Residential, SubService::ResidentialLow);
        let tables = LegacyTables::default();
        let c = consumption(&p, 0, 10, &tables);
        assert_eq!(c.power, 80);
        assert_eq!(c.income, 120);
    }
}
