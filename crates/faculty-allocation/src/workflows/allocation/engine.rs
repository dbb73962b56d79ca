use super::domain::{
    Allocation, AllocationError, AllocationOutcome, AllocationResult, SlotCapacity, StudentRecord,
};
use tracing::{debug, info};

/// Single-pass allocator: rank by CGPA, rotate the first probed preference column by rank,
/// and commit each student to the first listed slot that still has a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationEngine {
    preference_columns: usize,
}

impl AllocationEngine {
    pub fn new(preference_columns: usize) -> Result<Self, AllocationError> {
        if preference_columns == 0 {
            return Err(AllocationError::NoPreferenceColumns);
        }

        Ok(Self { preference_columns })
    }

    pub fn preference_columns(&self) -> usize {
        self.preference_columns
    }

    /// Stable sort by CGPA descending; equal CGPA keeps roster order.
    pub fn rank<'a>(&self, students: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        let mut ranked: Vec<&StudentRecord> = students.iter().collect();
        ranked.sort_by(|a, b| a.cgpa.merit_order(b.cgpa));
        ranked
    }

    pub fn start_column(&self, rank: usize) -> usize {
        rank % self.preference_columns
    }

    /// Preference column indices probed for the student at `rank`, each visited once.
    pub fn probe_order(&self, rank: usize) -> impl Iterator<Item = usize> {
        let width = self.preference_columns;
        let start = self.start_column(rank);
        (0..width).map(move |offset| (start + offset) % width)
    }

    /// Runs the allocation. `capacity` is consumed; callers never observe intermediate seats.
    pub fn allocate(
        &self,
        students: &[StudentRecord],
        mut capacity: SlotCapacity,
    ) -> AllocationResult {
        let ranked = self.rank(students);
        let mut allocations = Vec::with_capacity(ranked.len());

        for (rank, student) in ranked.into_iter().enumerate() {
            let start_column = self.start_column(rank);
            let outcome = self.commit(rank, student, &mut capacity);

            match &outcome {
                AllocationOutcome::Allocated {
                    slot,
                    preference_index,
                } => debug!(
                    rank,
                    source_row = student.source_row,
                    start_column,
                    preference_index,
                    slot = %slot,
                    "student allocated"
                ),
                AllocationOutcome::Unallocated => debug!(
                    rank,
                    source_row = student.source_row,
                    start_column,
                    "no probed preference has a free seat"
                ),
            }

            allocations.push(Allocation {
                source_row: student.source_row,
                rank,
                start_column,
                cgpa: student.cgpa,
                outcome,
            });
        }

        let result = AllocationResult::from_ranked(allocations);
        info!(
            students = result.len(),
            allocated = result.allocated_count(),
            unallocated = result.unallocated_count(),
            preference_columns = self.preference_columns,
            "allocation pass complete"
        );
        result
    }

    fn commit(
        &self,
        rank: usize,
        student: &StudentRecord,
        capacity: &mut SlotCapacity,
    ) -> AllocationOutcome {
        if student.listed_slots().next().is_none() {
            return AllocationOutcome::Unallocated;
        }

        for column in self.probe_order(rank) {
            let Some(Some(slot)) = student.preferences.get(column) else {
                continue;
            };

            if capacity.try_claim(slot) {
                return AllocationOutcome::Allocated {
                    slot: slot.clone(),
                    preference_index: column,
                };
            }
        }

        AllocationOutcome::Unallocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::allocation::domain::{Cgpa, SlotId};

    fn student(row: usize, cgpa: f64, prefs: &[&str]) -> StudentRecord {
        StudentRecord::new(
            row,
            vec![format!("S{row}")],
            Cgpa::new(cgpa).expect("finite"),
            prefs
                .iter()
                .map(|pref| (!pref.is_empty()).then(|| SlotId::new(*pref)))
                .collect(),
        )
    }

    #[test]
    fn rejects_zero_preference_columns() {
        assert_eq!(
            AllocationEngine::new(0),
            Err(AllocationError::NoPreferenceColumns)
        );
    }

    #[test]
    fn probe_order_rotates_with_rank() {
        let engine = AllocationEngine::new(3).expect("engine");
        assert_eq!(engine.probe_order(0).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(engine.probe_order(1).collect::<Vec<_>>(), vec![1, 2, 0]);
        assert_eq!(engine.probe_order(5).collect::<Vec<_>>(), vec![2, 0, 1]);
    }

    #[test]
    fn rank_is_stable_for_equal_cgpa() {
        let engine = AllocationEngine::new(1).expect("engine");
        let students = vec![
            student(0, 7.5, &["A"]),
            student(1, 9.1, &["A"]),
            student(2, 7.5, &["A"]),
            student(3, 7.5, &["A"]),
        ];
        let order: Vec<usize> = engine
            .rank(&students)
            .iter()
            .map(|student| student.source_row)
            .collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
    }

    #[test]
    fn blank_cells_are_skipped_while_probing() {
        let engine = AllocationEngine::new(3).expect("engine");
        let students = vec![student(0, 8.0, &["", "", "C"])];
        let capacity = SlotCapacity::new().with_slot("C", 1);

        let result = engine.allocate(&students, capacity);
        assert_eq!(
            result.allocations()[0].outcome,
            AllocationOutcome::Allocated {
                slot: SlotId::new("C"),
                preference_index: 2,
            }
        );
    }

    #[test]
    fn slots_without_configured_capacity_are_never_assigned() {
        let engine = AllocationEngine::new(2).expect("engine");
        let students = vec![student(0, 8.0, &["X", "Y"])];
        let capacity = SlotCapacity::new().with_slot("Y", 0);

        let result = engine.allocate(&students, capacity);
        assert_eq!(result.allocations()[0].outcome, AllocationOutcome::Unallocated);
    }

    #[test]
    fn duplicate_preferences_only_take_one_seat() {
        let engine = AllocationEngine::new(2).expect("engine");
        let students = vec![student(0, 9.0, &["A", "A"]), student(1, 8.0, &["A", "A"])];
        let capacity = SlotCapacity::new().with_slot("A", 1);

        let result = engine.allocate(&students, capacity);
        assert_eq!(result.allocated_count(), 1);
        assert_eq!(result.slot_counts().get(&SlotId::new("A")), 1);
    }
}
