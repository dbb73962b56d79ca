use crate::workflows::allocation::{Cgpa, SlotCapacity, SlotId, StudentRecord};
use crate::workflows::roster::{FacultyDirectory, Roster, RosterImporter};
use std::io::Cursor;

pub(super) fn student(row: usize, cgpa: f64, prefs: &[&str]) -> StudentRecord {
    StudentRecord::new(
        row,
        vec![format!("S{}", row + 1), cgpa.to_string()],
        Cgpa::new(cgpa).expect("finite cgpa"),
        prefs
            .iter()
            .map(|pref| (!pref.trim().is_empty()).then(|| SlotId::new(*pref)))
            .collect(),
    )
}

pub(super) fn capacity(slots: &[(&str, u32)]) -> SlotCapacity {
    slots
        .iter()
        .map(|(slot, seats)| (SlotId::new(*slot), *seats))
        .collect()
}

pub(super) fn slot(name: &str) -> SlotId {
    SlotId::new(name)
}

pub(super) fn roster(csv: &str) -> Roster {
    RosterImporter::from_reader(Cursor::new(csv), &FacultyDirectory::standard())
        .expect("roster imports")
}

/// Scenario A from the allocation rules: three students, two columns, one seat per slot.
pub(super) fn scenario_a_students() -> Vec<StudentRecord> {
    vec![
        student(0, 9.0, &["A", "B"]),
        student(1, 8.0, &["A", "B"]),
        student(2, 8.0, &["B", "A"]),
    ]
}

pub(super) const CLASS_ROSTER: &str = "Roll,Name,Email,CGPA,Pref1,Pref2,Pref3\n\
R01,Asha,asha@example.edu,8.1,1,2,3\n\
R02,Bilal,bilal@example.edu,9.4,2,1,3\n\
R03,Chen,chen@example.edu,,1,2,3\n\
R04,Divya,divya@example.edu,8.1,3,3,1\n\
R05,Eitan,eitan@example.edu,7.0,1,,\n";
