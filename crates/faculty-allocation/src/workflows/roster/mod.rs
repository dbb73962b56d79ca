mod capacity;
mod mapping;
mod normalizer;
mod parser;

pub use capacity::{CapacityError, CapacityPlan};
pub use mapping::FacultyDirectory;
pub use parser::RosterLayout;

use crate::workflows::allocation::{SlotId, StudentRecord};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Shape(#[from] InputShapeError),
}

/// Structural problems that make the whole roster unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputShapeError {
    #[error("CGPA column not found")]
    MissingCgpaColumn,
    #[error("no preference columns found after CGPA column '{cgpa_column}'")]
    NoPreferenceColumns { cgpa_column: String },
}

/// Per-row problems that keep a student out of the ranking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowIssue {
    #[error("missing CGPA")]
    MissingCgpa,
    #[error("invalid CGPA '{raw}'")]
    InvalidCgpa { raw: String },
}

/// A roster row that could not be ranked. It is still reported in the allocation table.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub source_row: usize,
    pub identity: Vec<String>,
    pub preferences: Vec<Option<SlotId>>,
    pub issue: RowIssue,
}

/// Normalized roster ready for allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    layout: RosterLayout,
    students: Vec<StudentRecord>,
    rejected: Vec<RejectedRow>,
}

impl Roster {
    pub fn layout(&self) -> &RosterLayout {
        &self.layout
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    /// Data rows in the source, ranked or not.
    pub fn row_count(&self) -> usize {
        self.students.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Every slot listed by at least one rankable student.
    pub fn slot_universe(&self) -> BTreeSet<SlotId> {
        self.students
            .iter()
            .flat_map(StudentRecord::listed_slots)
            .cloned()
            .collect()
    }

    /// Preference lists for every source row, in source order.
    pub fn preference_rows(&self) -> impl Iterator<Item = &[Option<SlotId>]> {
        let mut rows: Vec<(usize, &[Option<SlotId>])> = self
            .students
            .iter()
            .map(|student| (student.source_row, student.preferences.as_slice()))
            .chain(
                self.rejected
                    .iter()
                    .map(|row| (row.source_row, row.preferences.as_slice())),
            )
            .collect();
        rows.sort_by_key(|(source_row, _)| *source_row);
        rows.into_iter().map(|(_, preferences)| preferences)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        directory: &FacultyDirectory,
    ) -> Result<Roster, RosterError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, directory)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        directory: &FacultyDirectory,
    ) -> Result<Roster, RosterError> {
        let parsed = parser::parse_roster(reader, directory)?;

        info!(
            cgpa_column = parsed.layout.cgpa_column(),
            preference_columns = parsed.layout.preference_width(),
            students = parsed.students.len(),
            rejected = parsed.rejected.len(),
            "roster imported"
        );

        Ok(Roster {
            layout: parsed.layout,
            students: parsed.students,
            rejected: parsed.rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn import(csv: &str) -> Result<Roster, RosterError> {
        RosterImporter::from_reader(Cursor::new(csv), &FacultyDirectory::standard())
    }

    #[test]
    fn layout_prefers_exact_cgpa_header() {
        let layout = RosterLayout::detect(["Roll", "Name", "CGPA", "Pref 1", "Pref 2"])
            .expect("layout detected");
        assert_eq!(layout.cgpa_column(), "CGPA");
        assert_eq!(layout.identity_columns(), ["Roll", "Name", "CGPA"]);
        assert_eq!(layout.preference_columns(), ["Pref 1", "Pref 2"]);
        assert_eq!(layout.preference_width(), 2);
    }

    #[test]
    fn layout_falls_back_to_substring_match() {
        let layout = RosterLayout::detect(["Roll", "Final CGPA Score", "P1"]).expect("layout");
        assert_eq!(layout.cgpa_index(), 1);

        let layout = RosterLayout::detect(["Roll", "GPA", "P1"]).expect("layout");
        assert_eq!(layout.cgpa_column(), "GPA");
    }

    #[test]
    fn layout_reports_missing_cgpa_column() {
        assert_eq!(
            RosterLayout::detect(["Roll", "Name", "P1"]),
            Err(InputShapeError::MissingCgpaColumn)
        );
    }

    #[test]
    fn layout_reports_missing_preference_columns() {
        assert_eq!(
            RosterLayout::detect(["Roll", "CGPA"]),
            Err(InputShapeError::NoPreferenceColumns {
                cgpa_column: "CGPA".to_string()
            })
        );
    }

    #[test]
    fn importer_maps_codes_and_keeps_blank_preferences() {
        let roster = import("Roll,CGPA,P1,P2,P3\nR1,8.5,1,,SKD\nR2,7.25,3.0,2,\n")
            .expect("roster imports");

        assert_eq!(roster.students().len(), 2);
        let first = &roster.students()[0];
        assert_eq!(first.identity, vec!["R1".to_string(), "8.5".to_string()]);
        assert_eq!(
            first.preferences,
            vec![Some(SlotId::new("ABM")), None, Some(SlotId::new("SKD"))]
        );
        assert_eq!(roster.students()[1].preferences[0], Some(SlotId::new("AM")));
        assert_eq!(
            roster.slot_universe().into_iter().collect::<Vec<_>>(),
            vec![
                SlotId::new("ABM"),
                SlotId::new("AE"),
                SlotId::new("AM"),
                SlotId::new("SKD")
            ]
        );
    }

    #[test]
    fn importer_rejects_rows_with_bad_cgpa_without_aborting() {
        let roster = import("Roll,CGPA,P1\nR1,,AE\nR2,abc,AE\nR3,9.0,AE\nR4,NaN,AE\n")
            .expect("roster imports");

        assert_eq!(roster.students().len(), 1);
        assert_eq!(roster.students()[0].source_row, 2);
        let issues: Vec<&RowIssue> = roster.rejected().iter().map(|row| &row.issue).collect();
        assert_eq!(
            issues,
            vec![
                &RowIssue::MissingCgpa,
                &RowIssue::InvalidCgpa {
                    raw: "abc".to_string()
                },
                &RowIssue::InvalidCgpa {
                    raw: "NaN".to_string()
                },
            ]
        );
        assert_eq!(roster.row_count(), 4);
    }

    #[test]
    fn identity_cells_pass_through_unchanged() {
        use crate::workflows::allocation::export::{render_table, ExportTable};
        use crate::workflows::allocation::AllocationService;

        let roster = import("Roll,Name,CGPA,P1\nR1,\"  Asha  Rao \", 9.0 , 1 \n")
            .expect("roster imports");
        let student = &roster.students()[0];
        assert_eq!(student.identity[1], "  Asha  Rao ");
        assert_eq!(student.identity[2], " 9.0 ");
        assert_eq!(student.cgpa.value(), 9.0);
        assert_eq!(student.preferences, vec![Some(SlotId::new("ABM"))]);

        let report = AllocationService::default()
            .report(&roster, &CapacityPlan::uniform(1))
            .expect("allocation runs");
        let csv = render_table(&report, ExportTable::Allocation).expect("csv renders");
        let mut reader = csv::Reader::from_reader(csv.as_slice());
        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("csv parses");
        assert_eq!(
            rows,
            vec![csv::StringRecord::from(vec![
                "R1",
                "  Asha  Rao ",
                " 9.0 ",
                "ABM",
                "allocated"
            ])]
        );
    }

    #[test]
    fn importer_tolerates_short_rows() {
        let roster = import("Roll,CGPA,P1,P2\nR1,8.0\n").expect("roster imports");
        assert_eq!(roster.students()[0].preferences, vec![None, None]);
    }

    #[test]
    fn importer_accepts_header_only_roster() {
        let roster = import("Roll,CGPA,P1\n").expect("roster imports");
        assert!(roster.is_empty());
    }

    #[test]
    fn importer_surfaces_shape_errors() {
        match import("Roll,Name\nR1,Asha\n") {
            Err(RosterError::Shape(InputShapeError::MissingCgpaColumn)) => {}
            other => panic!("expected missing CGPA column, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error =
            RosterImporter::from_path("./does-not-exist.csv", &FacultyDirectory::standard())
                .expect_err("expected io error");
        assert!(matches!(error, RosterError::Io(_)));
    }

    #[test]
    fn cgpa_parser_accepts_padded_numbers() {
        let cgpa = parser::parse_cgpa_for_tests(" 9.25 ").expect("parses");
        assert_eq!(cgpa.value(), 9.25);
        assert_eq!(
            parser::parse_cgpa_for_tests("inf"),
            Err(RowIssue::InvalidCgpa {
                raw: "inf".to_string()
            })
        );
    }

    #[test]
    fn preference_rows_follow_source_order() {
        let roster = import("Roll,CGPA,P1\nR1,x,AE\nR2,8.0,MA\n").expect("roster imports");
        let rows: Vec<Vec<Option<SlotId>>> =
            roster.preference_rows().map(|row| row.to_vec()).collect();
        assert_eq!(
            rows,
            vec![vec![Some(SlotId::new("AE"))], vec![Some(SlotId::new("MA"))]]
        );
    }
}
