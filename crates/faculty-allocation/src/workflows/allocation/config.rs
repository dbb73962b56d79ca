use super::domain::{AllocationError, SlotCapacity};
use super::engine::AllocationEngine;
use crate::workflows::roster::{CapacityPlan, Roster};

/// Explicit column and capacity configuration for one allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationConfig {
    pub cgpa_column: String,
    pub preference_columns: Vec<String>,
    pub slot_capacity: SlotCapacity,
}

impl AllocationConfig {
    pub fn for_roster(roster: &Roster, plan: &CapacityPlan) -> Self {
        let layout = roster.layout();
        Self {
            cgpa_column: layout.cgpa_column().to_string(),
            preference_columns: layout.preference_columns().to_vec(),
            slot_capacity: plan.resolve(roster),
        }
    }

    pub fn engine(&self) -> Result<AllocationEngine, AllocationError> {
        AllocationEngine::new(self.preference_columns.len())
    }
}
