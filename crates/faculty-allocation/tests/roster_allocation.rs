use faculty_allocation::workflows::allocation::export::{render_table, ExportTable};
use faculty_allocation::workflows::allocation::{
    AllocationEngine, AllocationOutcome, AllocationService, AllocationStatus, SlotCapacity,
    SlotId,
};
use faculty_allocation::workflows::roster::{
    CapacityPlan, FacultyDirectory, InputShapeError, RosterError, RosterImporter,
};

const FIXTURE: &str = include_str!("fixtures/input_btp_mtp_allocation.csv");

#[test]
fn fixture_roster_imports_with_detected_layout() {
    let roster = RosterImporter::from_reader(FIXTURE.as_bytes(), &FacultyDirectory::standard())
        .expect("fixture imports");

    let layout = roster.layout();
    assert_eq!(layout.cgpa_column(), "CGPA");
    assert_eq!(layout.identity_columns(), ["Roll", "Name", "Email", "CGPA"]);
    assert_eq!(layout.preference_width(), 4);
    assert_eq!(roster.students().len(), 9);
    assert_eq!(roster.rejected().len(), 1);
    assert_eq!(roster.rejected()[0].identity[0], "2101CS05");

    let gaurav = roster
        .students()
        .iter()
        .find(|student| student.identity[0] == "2101CS07")
        .expect("row present");
    assert_eq!(
        gaurav.preferences,
        vec![
            Some(SlotId::new("ABM")),
            Some(SlotId::new("CA")),
            Some(SlotId::new("RH")),
            Some(SlotId::new("SK")),
        ]
    );
}

#[test]
fn fixture_allocation_honours_merit_rotation_and_capacity() {
    let service = AllocationService::default();
    let roster = service
        .import_reader(FIXTURE.as_bytes())
        .expect("fixture imports");
    let plan = CapacityPlan::uniform(1);

    let report = service.report(&roster, &plan).expect("report builds");
    let by_roll = |roll: &str| {
        report
            .rows
            .iter()
            .find(|row| row.identity[0] == roll)
            .expect("row present")
    };

    // Rank order: CS10 9.60, CS01 9.12, CS03 9.12, CS02 8.75, CS08 8.75, CS06 8.05,
    // CS09 7.85, CS04 7.40, CS07 6.90. Start columns rotate 0,1,2,3,0,1,2,3,0.
    assert_eq!(by_roll("2101CS10").status, AllocationStatus::Unallocated);
    assert_eq!(by_roll("2101CS01").allocated_faculty.as_deref(), Some("CA"));
    assert_eq!(by_roll("2101CS03").allocated_faculty.as_deref(), Some("RH"));
    assert_eq!(by_roll("2101CS02").allocated_faculty.as_deref(), Some("AR"));
    assert_eq!(by_roll("2101CS02").preference_rank, Some(4));
    assert_eq!(by_roll("2101CS08").status, AllocationStatus::Unallocated);
    assert_eq!(by_roll("2101CS06").allocated_faculty.as_deref(), Some("ABM"));
    assert_eq!(by_roll("2101CS09").allocated_faculty.as_deref(), Some("SKD"));
    assert_eq!(by_roll("2101CS04").status, AllocationStatus::Unallocated);
    assert_eq!(by_roll("2101CS07").allocated_faculty.as_deref(), Some("SK"));
    assert_eq!(by_roll("2101CS05").status, AllocationStatus::Rejected);

    assert_eq!(report.totals.students, 10);
    assert_eq!(report.totals.allocated, 6);
    assert_eq!(report.totals.unallocated, 3);
    assert_eq!(report.totals.rejected, 1);
    assert!(report
        .allocation_counts
        .iter()
        .all(|entry| entry.allocated == 1));
}

#[test]
fn fixture_exports_keep_identity_columns_and_original_order() {
    let service = AllocationService::default();
    let roster = service
        .import_reader(FIXTURE.as_bytes())
        .expect("fixture imports");
    let report = service
        .report(&roster, &CapacityPlan::uniform(2))
        .expect("report builds");

    let csv = String::from_utf8(
        render_table(&report, ExportTable::Allocation).expect("allocation renders"),
    )
    .expect("utf8");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Roll,Name,Email,CGPA,AllocatedFaculty,Status")
    );
    let rolls: Vec<&str> = lines
        .map(|line| line.split(',').next().unwrap_or_default())
        .collect();
    assert_eq!(rolls.len(), 10);
    assert_eq!(rolls.first(), Some(&"2101CS01"));
    assert_eq!(rolls.last(), Some(&"2101CS10"));
}

#[test]
fn roster_without_preference_columns_is_rejected() {
    let error = RosterImporter::from_reader(
        "Roll,Name,CGPA\nR1,Asha,9.0\n".as_bytes(),
        &FacultyDirectory::standard(),
    )
    .expect_err("shape error");

    match error {
        RosterError::Shape(InputShapeError::NoPreferenceColumns { cgpa_column }) => {
            assert_eq!(cgpa_column, "CGPA");
        }
        other => panic!("expected missing preference columns, got {other:?}"),
    }
}

#[test]
fn engine_accepts_capacity_built_by_hand() {
    let roster = RosterImporter::from_reader(
        "Roll,CGPA,P1,P2\nR1,8.0,X,Y\nR2,9.0,X,Y\n".as_bytes(),
        &FacultyDirectory::passthrough(),
    )
    .expect("roster imports");
    let engine = AllocationEngine::new(roster.layout().preference_width()).expect("engine");
    let capacity = SlotCapacity::new().with_slot("X", 1).with_slot("Y", 1);

    let result = engine.allocate(roster.students(), capacity);
    let outcomes: Vec<AllocationOutcome> = result
        .in_input_order()
        .into_iter()
        .map(|row| row.outcome.clone())
        .collect();
    assert_eq!(
        outcomes,
        vec![
            AllocationOutcome::Allocated {
                slot: SlotId::new("Y"),
                preference_index: 1,
            },
            AllocationOutcome::Allocated {
                slot: SlotId::new("X"),
                preference_index: 0,
            },
        ]
    );
}
