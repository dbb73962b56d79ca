use clap::Args;
use faculty_allocation::config::{AllocationSettings, AppConfig};
use faculty_allocation::error::AppError;
use faculty_allocation::telemetry;
use faculty_allocation::workflows::allocation::export::save_outputs;
use faculty_allocation::workflows::allocation::{
    AllocationReport, AllocationService, AllocationStatus,
};
use faculty_allocation::workflows::roster::CapacityPlan;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Roster CSV: identity columns, a CGPA column, then ranked preference columns
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Seats per faculty (defaults to ALLOCATION_DEFAULT_CAPACITY, else an even share)
    #[arg(long)]
    pub(crate) capacity: Option<u32>,
    /// Optional Fac,Capacity CSV with per-faculty seat overrides
    #[arg(long)]
    pub(crate) capacity_file: Option<PathBuf>,
    /// Directory for the output CSVs (defaults to ALLOCATION_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Print the summary without writing output files
    #[arg(long)]
    pub(crate) no_save: bool,
    /// Include every student row in the printed summary
    #[arg(long)]
    pub(crate) list: bool,
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let list = args.list;
    let input = args.input.clone();
    let (report, written) = execute(args, &config.allocation)?;

    render_allocation_report(&input, &report, list);
    if !written.is_empty() {
        println!("\nOutputs written");
        for path in &written {
            println!("- {}", path.display());
        }
    }

    Ok(())
}

pub(crate) fn execute(
    args: AllocateArgs,
    settings: &AllocationSettings,
) -> Result<(AllocationReport, Vec<PathBuf>), AppError> {
    let service = AllocationService::default();
    let mut plan = CapacityPlan {
        default_capacity: args.capacity.or(settings.default_capacity),
        ..CapacityPlan::default()
    };
    if let Some(path) = &args.capacity_file {
        plan = plan.overrides_from_path(path, service.directory())?;
    }

    let roster = service.import_path(&args.input)?;
    let report = service.report(&roster, &plan)?;

    let written = if args.no_save {
        Vec::new()
    } else {
        let dir = args
            .output_dir
            .unwrap_or_else(|| settings.output_dir.clone());
        save_outputs(&report, &dir)?
    };

    Ok((report, written))
}

pub(crate) fn render_allocation_report(input: &Path, report: &AllocationReport, list: bool) {
    println!("Faculty allocation");
    println!("Roster: {}", input.display());
    println!(
        "Preference columns: {} ({})",
        report.preference_columns.len(),
        report.preference_columns.join(", ")
    );

    let totals = &report.totals;
    println!(
        "\nStudents: {} | allocated {} | unallocated {} | rejected {}",
        totals.students, totals.allocated, totals.unallocated, totals.rejected
    );

    if report.allocation_counts.is_empty() {
        println!("\nFaculty allocations: none");
    } else {
        println!("\nFaculty allocations");
        for entry in &report.allocation_counts {
            println!("- {}: {}", entry.faculty, entry.allocated);
        }
    }

    let needs_attention: Vec<_> = report.unallocated_rows().collect();
    if needs_attention.is_empty() {
        println!("\nUnallocated students: none");
    } else {
        println!("\nStudents needing attention");
        for row in needs_attention {
            println!(
                "- row {} ({}): {}",
                row.source_row + 1,
                row.identity.join(" | "),
                row.status_label
            );
        }
    }

    if list {
        println!("\nAllocation by roster order");
        for row in &report.rows {
            let faculty = row.allocated_faculty.as_deref().unwrap_or("-");
            let choice = match (row.status, row.preference_rank) {
                (AllocationStatus::Allocated, Some(rank)) => format!(" (preference {rank})"),
                _ => String::new(),
            };
            println!(
                "- {} | {}{} | {}",
                row.identity.join(" | "),
                faculty,
                choice,
                row.status_label
            );
        }
    }
}
