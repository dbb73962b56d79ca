mod summary;
pub mod views;

pub use views::AllocationReport;
