use super::super::domain::{AllocationOutcome, AllocationResult};
use super::views::{
    AllocationReport, AllocationRowView, AllocationStatus, AllocationTotals,
    PreferenceDemandEntry, SlotCountEntry,
};
use crate::workflows::roster::Roster;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

impl AllocationReport {
    pub fn build(roster: &Roster, result: &AllocationResult) -> Self {
        let layout = roster.layout();
        let identities: HashMap<usize, &[String]> = roster
            .students()
            .iter()
            .map(|student| (student.source_row, student.identity.as_slice()))
            .collect();

        let mut rows: Vec<AllocationRowView> = result
            .allocations()
            .iter()
            .map(|allocation| {
                let identity = identities
                    .get(&allocation.source_row)
                    .map(|cells| cells.to_vec())
                    .unwrap_or_default();
                let (allocated_faculty, preference_rank, status) = match &allocation.outcome {
                    AllocationOutcome::Allocated {
                        slot,
                        preference_index,
                    } => (
                        Some(slot.to_string()),
                        Some(preference_index + 1),
                        AllocationStatus::Allocated,
                    ),
                    AllocationOutcome::Unallocated => (None, None, AllocationStatus::Unallocated),
                };

                AllocationRowView {
                    source_row: allocation.source_row,
                    identity,
                    cgpa: Some(allocation.cgpa.value()),
                    rank: Some(allocation.rank + 1),
                    allocated_faculty,
                    preference_rank,
                    status,
                    status_label: status.label().to_string(),
                }
            })
            .collect();

        rows.extend(roster.rejected().iter().map(|row| AllocationRowView {
            source_row: row.source_row,
            identity: row.identity.clone(),
            cgpa: None,
            rank: None,
            allocated_faculty: None,
            preference_rank: None,
            status: AllocationStatus::Rejected,
            status_label: format!("{}: {}", AllocationStatus::Rejected.label(), row.issue),
        }));
        rows.sort_by_key(|row| row.source_row);

        let allocation_counts = result
            .slot_counts()
            .iter()
            .map(|(slot, allocated)| SlotCountEntry {
                faculty: slot.to_string(),
                allocated,
            })
            .collect();

        let totals = AllocationTotals {
            students: roster.row_count(),
            allocated: result.allocated_count(),
            unallocated: result.unallocated_count(),
            rejected: roster.rejected().len(),
        };

        AllocationReport {
            generated_at: Utc::now(),
            identity_columns: layout.identity_columns().to_vec(),
            preference_columns: layout.preference_columns().to_vec(),
            rows,
            allocation_counts,
            preference_demand: preference_demand(roster),
            totals,
        }
    }

    pub fn unallocated_rows(&self) -> impl Iterator<Item = &AllocationRowView> {
        self.rows
            .iter()
            .filter(|row| row.status != AllocationStatus::Allocated)
    }
}

/// Counts every non-blank preference cell by faculty and column position, across all rows.
pub(crate) fn preference_demand(roster: &Roster) -> Vec<PreferenceDemandEntry> {
    let width = roster.layout().preference_width();
    let mut demand: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for preferences in roster.preference_rows() {
        for (column, slot) in preferences.iter().enumerate() {
            let Some(slot) = slot else {
                continue;
            };
            let counts = demand
                .entry(slot.to_string())
                .or_insert_with(|| vec![0; width]);
            if let Some(count) = counts.get_mut(column) {
                *count += 1;
            }
        }
    }

    demand
        .into_iter()
        .map(|(faculty, counts)| PreferenceDemandEntry { faculty, counts })
        .collect()
}
