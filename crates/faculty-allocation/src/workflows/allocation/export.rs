use super::report::AllocationReport;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ALLOCATION_FILE: &str = "output_btp_mtp_allocation.csv";
pub const ALLOCATION_COUNT_FILE: &str = "fac_allocation_count.csv";
pub const PREFERENCE_COUNT_FILE: &str = "fac_preference_count.csv";

const ALLOCATED_COLUMN: &str = "AllocatedFaculty";
const STATUS_COLUMN: &str = "Status";

/// Output tables produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTable {
    Allocation,
    AllocationCount,
    PreferenceCount,
}

impl ExportTable {
    pub fn all() -> [ExportTable; 3] {
        [
            ExportTable::Allocation,
            ExportTable::AllocationCount,
            ExportTable::PreferenceCount,
        ]
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportTable::Allocation => ALLOCATION_FILE,
            ExportTable::AllocationCount => ALLOCATION_COUNT_FILE,
            ExportTable::PreferenceCount => PREFERENCE_COUNT_FILE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write allocation output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode allocation CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub fn write_table<W: Write>(
    report: &AllocationReport,
    table: ExportTable,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    match table {
        ExportTable::Allocation => write_allocation(report, &mut csv_writer)?,
        ExportTable::AllocationCount => {
            csv_writer.write_record(["Fac", "Allocated"])?;
            for entry in &report.allocation_counts {
                csv_writer.write_record([entry.faculty.clone(), entry.allocated.to_string()])?;
            }
        }
        ExportTable::PreferenceCount => write_preference_count(report, &mut csv_writer)?,
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn render_table(report: &AllocationReport, table: ExportTable) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_table(report, table, &mut buffer)?;
    Ok(buffer)
}

/// Writes every table into `dir`, creating it if needed. Returns the written paths.
pub fn save_outputs(report: &AllocationReport, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(3);
    for table in ExportTable::all() {
        let path = dir.join(table.file_name());
        let file = std::fs::File::create(&path)?;
        write_table(report, table, std::io::BufWriter::new(file))?;
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "saved allocation outputs");
    Ok(written)
}

fn write_allocation<W: Write>(
    report: &AllocationReport,
    csv_writer: &mut csv::Writer<W>,
) -> Result<(), csv::Error> {
    let mut header: Vec<&str> = report.identity_columns.iter().map(String::as_str).collect();
    header.push(ALLOCATED_COLUMN);
    header.push(STATUS_COLUMN);
    csv_writer.write_record(&header)?;

    let width = report.identity_columns.len();
    for row in &report.rows {
        let mut record: Vec<&str> = (0..width)
            .map(|index| row.identity.get(index).map(String::as_str).unwrap_or(""))
            .collect();
        record.push(row.allocated_faculty.as_deref().unwrap_or(""));
        record.push(&row.status_label);
        csv_writer.write_record(&record)?;
    }

    Ok(())
}

fn write_preference_count<W: Write>(
    report: &AllocationReport,
    csv_writer: &mut csv::Writer<W>,
) -> Result<(), csv::Error> {
    let mut header = vec!["Fac".to_string()];
    header.extend((1..=report.preference_columns.len()).map(|rank| format!("Count Pref {rank}")));
    csv_writer.write_record(&header)?;

    for entry in &report.preference_demand {
        let mut record = vec![entry.faculty.clone()];
        record.extend(entry.counts.iter().map(usize::to_string));
        csv_writer.write_record(&record)?;
    }

    Ok(())
}
