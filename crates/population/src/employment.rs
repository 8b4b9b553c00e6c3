//! Workplace tiers: how a building's total job count is split across the four
//! education levels, and how many visitors a commercial building receives.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::HOST_NATIVE;
use crate::prefab::Category;

// ---------------------------------------------------------------------------
// Result shapes
// ---------------------------------------------------------------------------

/// Jobs per education tier (0 = uneducated .. 3 = highly educated).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode,
)]
pub struct WorkplaceLevels {
    pub level0: u32,
    pub level1: u32,
    pub level2: u32,
    pub level3: u32,
}

impl WorkplaceLevels {
    /// Fallback for anything that doesn't compute its own breakdown.
    pub const MINIMUM: WorkplaceLevels = WorkplaceLevels {
        level0: 1,
        level1: 0,
        level2: 0,
        level3: 0,
    };

    pub const HOST_NATIVE: WorkplaceLevels = WorkplaceLevels {
        level0: HOST_NATIVE,
        level1: HOST_NATIVE,
        level2: HOST_NATIVE,
        level3: HOST_NATIVE,
    };

    pub fn from_array(tiers: [u32; 4]) -> Self {
        Self {
            level0: tiers[0],
            level1: tiers[1],
            level2: tiers[2],
            level3: tiers[3],
        }
    }

    pub fn to_array(self) -> [u32; 4] {
        [self.level0, self.level1, self.level2, self.level3]
    }

    pub fn total(self) -> u32 {
        self.to_array()
            .iter()
            .fold(0u32, |acc, &n| acc.saturating_add(n))
    }

    pub fn is_host_native(self) -> bool {
        self == Self::HOST_NATIVE
    }
}

/// Full workplace answer for one building.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode,
)]
pub struct Workplaces {
    pub levels: WorkplaceLevels,
    /// Visitor capacity; zero for anything that isn't commercial.
    pub visitors: u32,
}

impl Workplaces {
    pub const MINIMUM: Workplaces = Workplaces {
        levels: WorkplaceLevels::MINIMUM,
        visitors: 0,
    };

    pub const HOST_NATIVE: Workplaces = Workplaces {
        levels: WorkplaceLevels::HOST_NATIVE,
        visitors: HOST_NATIVE,
    };

    pub fn is_host_native(&self) -> bool {
        self.levels.is_host_native()
    }

    pub fn total(&self) -> u32 {
        self.levels.total()
    }
}

// ---------------------------------------------------------------------------
// Tier distribution
// ---------------------------------------------------------------------------

/// Relative share of each tier. Doesn't have to sum to 100.
pub type TierSplit = [u8; 4];

const EVEN_UNSKILLED: &[TierSplit] = &[[100, 0, 0, 0]];

const COMMERCIAL_LOW: &[TierSplit] = &[[75, 20, 5, 0], [40, 45, 15, 0], [20, 35, 35, 10]];
const COMMERCIAL_HIGH: &[TierSplit] = &[[60, 30, 10, 0], [35, 40, 20, 5], [15, 30, 40, 15]];
const COMMERCIAL_ECO: &[TierSplit] = &[[50, 40, 10, 0]];
const COMMERCIAL_LEISURE: &[TierSplit] = &[[40, 40, 15, 5]];
const COMMERCIAL_TOURIST: &[TierSplit] = &[[30, 45, 20, 5]];

const INDUSTRY_GENERIC: &[TierSplit] = &[[70, 20, 10, 0], [30, 45, 20, 5], [10, 30, 45, 15]];
// Specialised industry rows: extractor, processor.
const INDUSTRY_FARMING: &[TierSplit] = &[[90, 10, 0, 0], [40, 45, 15, 0]];
const INDUSTRY_FORESTRY: &[TierSplit] = &[[85, 15, 0, 0], [35, 45, 20, 0]];
const INDUSTRY_OIL: &[TierSplit] = &[[50, 35, 15, 0], [20, 40, 30, 10]];
const INDUSTRY_ORE: &[TierSplit] = &[[60, 30, 10, 0], [25, 40, 30, 5]];

const OFFICE: &[TierSplit] = &[[2, 8, 60, 30], [1, 5, 50, 44], [1, 3, 36, 60]];
const OFFICE_HIGH_TECH: &[TierSplit] = &[[0, 5, 35, 60]];

fn splits_for(category: Category) -> &'static [TierSplit] {
    match category {
        Category::CommercialLow => COMMERCIAL_LOW,
        Category::CommercialHigh => COMMERCIAL_HIGH,
        Category::CommercialEco => COMMERCIAL_ECO,
        Category::CommercialLeisure => COMMERCIAL_LEISURE,
        Category::CommercialTourist => COMMERCIAL_TOURIST,
        Category::IndustryGeneric => INDUSTRY_GENERIC,
        Category::IndustryFarming => INDUSTRY_FARMING,
        Category::IndustryForestry => INDUSTRY_FORESTRY,
        Category::IndustryOil => INDUSTRY_OIL,
        Category::IndustryOre => INDUSTRY_ORE,
        Category::Office => OFFICE,
        Category::OfficeHighTech => OFFICE_HIGH_TECH,
        Category::ResidentialLow
        | Category::ResidentialHigh
        | Category::ResidentialLowEco
        | Category::ResidentialHighEco
        | Category::School
        | Category::Other => EVEN_UNSKILLED,
    }
}

/// Tier split for a category's table row; rows past the end use the last row.
pub fn tier_split(category: Category, row: usize) -> TierSplit {
    let rows = splits_for(category);
    rows[row.min(rows.len() - 1)]
}

/// Split `total` jobs across the four tiers in proportion to `split`.
///
/// The tiers always sum to `total`. Integer remainders go to the lowest tier
/// with a non-zero share, so a tier with a zero share always stays at zero.
pub fn distribute(total: u32, split: TierSplit) -> WorkplaceLevels {
    let weight_sum: u64 = split.iter().map(|&p| u64::from(p)).sum();
    if weight_sum == 0 {
        warn!("Tier split is all zeros; assigning all {} jobs to tier 0", total);
        return WorkplaceLevels {
            level0: total,
            ..Default::default()
        };
    }

    let mut tiers = [0u32; 4];
    let mut assigned = 0u64;
    for (tier, &share) in tiers.iter_mut().zip(split.iter()) {
        // share / weight_sum <= 1, so this fits back into u32.
        *tier = (u64::from(total) * u64::from(share) / weight_sum) as u32;
        assigned += u64::from(*tier);
    }

    let remainder = (u64::from(total) - assigned) as u32;
    if let Some(lowest) = split.iter().position(|&p| p > 0) {
        tiers[lowest] += remainder;
    }
    WorkplaceLevels::from_array(tiers)
}

/// Distribute using the built-in table for this category and row.
pub fn distribute_for(category: Category, row: usize, total: u32) -> WorkplaceLevels {
    distribute(total, tier_split(category, row))
}

// ---------------------------------------------------------------------------
// Visitors
// ---------------------------------------------------------------------------

/// Visitor capacity of commercial buildings, as a percentage of total jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct VisitRates {
    percent: BTreeMap<Category, u32>,
}

impl Default for VisitRates {
    fn default() -> Self {
        let percent = BTreeMap::from([
            (Category::CommercialLow, 250),
            (Category::CommercialHigh, 200),
            (Category::CommercialEco, 220),
            (Category::CommercialLeisure, 300),
            (Category::CommercialTourist, 350),
        ]);
        Self { percent }
    }
}

impl VisitRates {
    pub fn percent(&self, category: Category) -> u32 {
        self.percent.get(&category).copied().unwrap_or(0)
    }

    /// Returns false (and changes nothing) for non-commercial categories.
    pub fn set_percent(&mut self, category: Category, percent: u32) -> bool {
        if !category.is_commercial() {
            return false;
        }
        self.percent.insert(category, percent);
        true
    }

    /// Visitors for a building with `total_workers` jobs, rounded up.
    pub fn visitors(&self, category: Category, total_workers: u32) -> u32 {
        let pct = u64::from(self.percent(category));
        let visitors = (u64::from(total_workers) * pct).div_ceil(100);
        visitors.min(u64::from(crate::config::MAX_COMPUTED)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_distribute_exact_split() {
        let levels = distribute(100, [70, 20, 10, 0]);
        assert_eq!(levels.to_array(), [70, 20, 10, 0]);
    }

    #[test]
    fn test_distribute_remainder_goes_to_lowest_tier() {
        // 7 * 40 / 100 = 2.8 -> 2, 7 * 45 / 100 = 3.15 -> 3, 7 * 15 / 100 = 1.05 -> 1
        let levels = distribute(7, [40, 45, 15, 0]);
        assert_eq!(levels.to_array(), [3, 3, 1, 0]);
        assert_eq!(levels.total(), 7);
    }

    #[test]
    fn test_distribute_zero_share_tier_stays_zero() {
        let levels = distribute(3, [0, 5, 35, 60]);
        assert_eq!(levels.level0, 0, "zero-share tier must stay empty");
        assert_eq!(levels.total(), 3);
    }

    #[test]
    fn test_distribute_all_zero_split() {
        let levels = distribute(9, [0, 0, 0, 0]);
        assert_eq!(levels.to_array(), [9, 0, 0, 0]);
    }

    #[test]
    fn test_distribute_property_sum_and_zero_tiers() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let total = rng.gen_range(0..100_000u32);
            let mut split: TierSplit = [0; 4];
            for share in split.iter_mut() {
                *share = if rng.gen_bool(0.3) {
                    0
                } else {
                    rng.gen_range(1..=100)
                };
            }
            if split.iter().all(|&s| s == 0) {
                continue;
            }
            let levels = distribute(total, split);
            assert_eq!(levels.total(), total, "split {:?}", split);
            for (count, share) in levels.to_array().iter().zip(split.iter()) {
                if *share == 0 {
                    assert_eq!(*count, 0, "split {:?} gave {:?}", split, levels);
                }
            }
        }
    }

    #[test]
    fn test_tier_split_clamps_row() {
        assert_eq!(tier_split(Category::Office, 99), [1, 3, 36, 60]);
        assert_eq!(tier_split(Category::IndustryOil, 0), [50, 35, 15, 0]);
    }

    #[test]
    fn test_workplace_levels_sentinel() {
        assert!(WorkplaceLevels::HOST_NATIVE.is_host_native());
        assert!(!WorkplaceLevels::MINIMUM.is_host_native());
        assert_eq!(WorkplaceLevels::HOST_NATIVE.total(), u32::MAX);
        assert!(Workplaces::HOST_NATIVE.is_host_native());
    }

    #[test]
    fn test_visitors_rounds_up() {
        let rates = VisitRates::default();
        // 3 * 250% = 7.5 -> 8
        assert_eq!(rates.visitors(Category::CommercialLow, 3), 8);
        assert_eq!(rates.visitors(Category::IndustryGeneric, 30), 0);
    }

    #[test]
    fn test_visit_rates_reject_non_commercial() {
        let mut rates = VisitRates::default();
        assert!(!rates.set_percent(Category::Office, 50));
        assert!(rates.set_percent(Category::CommercialEco, 100));
        assert_eq!(rates.visitors(Category::CommercialEco, 12), 12);
    }
}
