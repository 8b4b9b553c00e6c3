use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::types::{DataVersion, PackInfo};
use crate::employment::WorkplaceLevels;
use crate::prefab::SchoolLevel;

/// Staffing and cost model for one school tier, scaled by student count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SchoolDataPack {
    pub info: PackInfo,
    pub level: SchoolLevel,
    /// Workers per tier regardless of size.
    pub base_workers: [u32; 4],
    /// Students per additional worker of each tier; 0 means no extra workers.
    pub per_worker: [u32; 4],
    pub base_cost: u32,
    pub cost_per: u32,
    pub base_maint: u32,
    pub maint_per: u32,
}

impl SchoolDataPack {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        level: SchoolLevel,
        base_workers: [u32; 4],
        per_worker: [u32; 4],
        base_cost: u32,
        cost_per: u32,
        base_maint: u32,
        maint_per: u32,
    ) -> Self {
        Self {
            info: PackInfo::new(DataVersion::VolumetricV1, name),
            level,
            base_workers,
            per_worker,
            base_cost,
            cost_per,
            base_maint,
            maint_per,
        }
    }

    pub fn workers(&self, students: u32) -> WorkplaceLevels {
        let mut tiers = self.base_workers;
        for (tier, &per) in tiers.iter_mut().zip(self.per_worker.iter()) {
            if per > 0 {
                *tier = tier.saturating_add(students / per);
            }
        }
        WorkplaceLevels::from_array(tiers)
    }

    pub fn construction_cost(&self, students: u32) -> u64 {
        u64::from(self.base_cost) + u64::from(self.cost_per) * u64::from(students)
    }

    pub fn maintenance(&self, students: u32) -> u64 {
        u64::from(self.base_maint) + u64::from(self.maint_per) * u64::from(students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elementary() -> SchoolDataPack {
        SchoolDataPack::new(
            "elementary",
            SchoolLevel::Elementary,
            [1, 2, 1, 0],
            [0, 20, 40, 0],
            20_000,
            100,
            1_000,
            10,
        )
    }

    #[test]
    fn test_workers_scale_with_students() {
        let pack = elementary();
        assert_eq!(pack.workers(0).to_array(), [1, 2, 1, 0]);
        assert_eq!(pack.workers(100).to_array(), [1, 7, 3, 0]);
    }

    #[test]
    fn test_costs_are_linear() {
        let pack = elementary();
        assert_eq!(pack.construction_cost(0), 20_000);
        assert_eq!(pack.construction_cost(300), 50_000);
        assert_eq!(pack.maintenance(300), 4_000);
    }
}
