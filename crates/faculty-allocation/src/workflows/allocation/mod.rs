//! Merit-ranked slot allocation.
//!
//! Students are sorted by CGPA (stable, highest first). The student at rank `i` starts probing
//! at preference column `i mod K` and walks all `K` columns cyclically, taking the first listed
//! slot with a free seat. There is no backtracking: each student's outcome depends only on the
//! seats left by higher-ranked students.

mod config;
pub mod domain;
mod engine;
pub mod export;
pub mod report;
mod service;

#[cfg(test)]
mod tests;

pub use config::AllocationConfig;
pub use domain::{
    Allocation, AllocationError, AllocationOutcome, AllocationResult, Cgpa, PreferenceCountTable,
    SlotCapacity, SlotId, StudentRecord,
};
pub use engine::AllocationEngine;
pub use export::{ExportError, ExportTable};
pub use report::views::{
    AllocationRowView, AllocationStatus, AllocationTotals, PreferenceDemandEntry, SlotCountEntry,
};
pub use report::AllocationReport;
pub use service::AllocationService;
