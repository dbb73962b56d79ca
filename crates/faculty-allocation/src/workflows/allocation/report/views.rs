use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Allocated,
    Unallocated,
    Rejected,
}

impl AllocationStatus {
    pub fn label(self) -> &'static str {
        match self {
            AllocationStatus::Allocated => "allocated",
            AllocationStatus::Unallocated => "unallocated",
            AllocationStatus::Rejected => "rejected",
        }
    }
}

/// One output row per roster row, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRowView {
    pub source_row: usize,
    pub identity: Vec<String>,
    pub cgpa: Option<f64>,
    /// 1-based merit rank; absent for rejected rows.
    pub rank: Option<usize>,
    pub allocated_faculty: Option<String>,
    /// 1-based preference position the allocated faculty came from.
    pub preference_rank: Option<usize>,
    pub status: AllocationStatus,
    pub status_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCountEntry {
    pub faculty: String,
    pub allocated: usize,
}

/// How many students listed `faculty` at each preference position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceDemandEntry {
    pub faculty: String,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocationTotals {
    pub students: usize,
    pub allocated: usize,
    pub unallocated: usize,
    pub rejected: usize,
}

/// Everything the host needs to render or export a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    pub generated_at: DateTime<Utc>,
    pub identity_columns: Vec<String>,
    pub preference_columns: Vec<String>,
    pub rows: Vec<AllocationRowView>,
    pub allocation_counts: Vec<SlotCountEntry>,
    pub preference_demand: Vec<PreferenceDemandEntry>,
    pub totals: AllocationTotals,
}
