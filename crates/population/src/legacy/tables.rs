//! Flat per-category area tables used before volumetric calculation existed.
//! Kept so older saved configurations produce the same numbers.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config_actions::ConfigError;
use crate::employment::{tier_split, TierSplit};
use crate::prefab::Category;

/// Utility and economy rates. Per unit in a table row; per building once
/// multiplied out by [`super::consumption`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode,
)]
pub struct Consumption {
    pub power: i64,
    pub water: i64,
    pub sewage: i64,
    pub garbage: i64,
    pub income: i64,
    pub mail: i64,
}

impl Consumption {
    const fn rates(power: i64, water: i64, sewage: i64, garbage: i64, income: i64, mail: i64) -> Self {
        Self {
            power,
            water,
            sewage,
            garbage,
            income,
            mail,
        }
    }

    /// Rates times `units`, saturating at the `i64` range.
    pub fn scaled(self, units: u32) -> Self {
        let n = i64::from(units);
        Self {
            power: self.power.saturating_mul(n),
            water: self.water.saturating_mul(n),
            sewage: self.sewage.saturating_mul(n),
            garbage: self.garbage.saturating_mul(n),
            income: self.income.saturating_mul(n),
            mail: self.mail.saturating_mul(n),
        }
    }
}

/// One row of a legacy table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LegacyLevel {
    /// Lot area per household / worker / student, in square metres.
    pub area_per: f32,
    /// Worker tier split for job buildings.
    pub workers: TierSplit,
    pub rates: Consumption,
}

const RESIDENTIAL_RATES: Consumption = Consumption::rates(8, 10, 10, 5, 12, 3);
const COMMERCIAL_RATES: Consumption = Consumption::rates(6, 5, 5, 6, 15, 4);
const INDUSTRY_RATES: Consumption = Consumption::rates(12, 8, 8, 10, 14, 3);
const OFFICE_RATES: Consumption = Consumption::rates(5, 4, 4, 3, 18, 5);
const SCHOOL_RATES: Consumption = Consumption::rates(2, 2, 2, 1, 0, 1);

fn default_areas(category: Category) -> &'static [f32] {
    match category {
        Category::ResidentialLow => &[140.0, 145.0, 150.0, 160.0, 170.0],
        Category::ResidentialHigh => &[80.0, 85.0, 90.0, 95.0, 100.0],
        Category::ResidentialLowEco => &[150.0, 155.0, 160.0, 170.0, 180.0],
        Category::ResidentialHighEco => &[90.0, 95.0, 100.0, 105.0, 110.0],
        Category::CommercialLow => &[40.0, 38.0, 35.0],
        Category::CommercialHigh => &[35.0, 32.0, 30.0],
        Category::CommercialEco => &[45.0],
        Category::CommercialLeisure => &[50.0],
        Category::CommercialTourist => &[55.0],
        Category::IndustryGeneric => &[50.0, 45.0, 40.0],
        Category::IndustryFarming => &[200.0, 60.0],
        Category::IndustryForestry => &[150.0, 55.0],
        Category::IndustryOil => &[120.0, 50.0],
        Category::IndustryOre => &[130.0, 50.0],
        Category::Office => &[16.0, 14.0, 12.0],
        Category::OfficeHighTech => &[14.0],
        Category::School => &[10.0, 12.0],
        Category::Other => &[100.0],
    }
}

fn default_rates(category: Category) -> Consumption {
    use crate::prefab::Service;
    match category.service() {
        Service::Residential => RESIDENTIAL_RATES,
        Service::Commercial => COMMERCIAL_RATES,
        Service::Industrial => INDUSTRY_RATES,
        Service::Office => OFFICE_RATES,
        Service::Education => SCHOOL_RATES,
        Service::Other => Consumption::default(),
    }
}

/// Legacy rows for every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LegacyTables {
    rows: BTreeMap<Category, Vec<LegacyLevel>>,
}

impl Default for LegacyTables {
    fn default() -> Self {
        let rows = Category::all()
            .iter()
            .map(|&category| {
                let rates = default_rates(category);
                let levels = default_areas(category)
                    .iter()
                    .enumerate()
                    .map(|(row, &area_per)| LegacyLevel {
                        area_per,
                        workers: tier_split(category, row),
                        rates: Consumption {
                            // Better buildings pay more.
                            income: rates.income + 2 * row as i64,
                            ..rates
                        },
                    })
                    .collect();
                (category, levels)
            })
            .collect();
        Self { rows }
    }
}

impl LegacyTables {
    /// Row for `category`, clamped to the last row.
    pub fn row(&self, category: Category, row: usize) -> Option<&LegacyLevel> {
        let levels = self.rows.get(&category)?;
        let last = levels.len().checked_sub(1)?;
        levels.get(row.min(last))
    }

    pub fn row_count(&self, category: Category) -> usize {
        self.rows.get(&category).map_or(0, Vec::len)
    }

    /// Replace an existing row.
    pub fn set_row(
        &mut self,
        category: Category,
        row: usize,
        level: LegacyLevel,
    ) -> Result<(), ConfigError> {
        if !(level.area_per > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "legacy area per unit must be positive, got {}",
                level.area_per
            )));
        }
        let slot = self
            .rows
            .get_mut(&category)
            .and_then(|levels| levels.get_mut(row))
            .ok_or(ConfigError::InvalidRow { category, row })?;
        *slot = level;
        Ok(())
    }
}
