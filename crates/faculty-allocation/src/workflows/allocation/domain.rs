use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a faculty member or project that students can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Cumulative grade point average used as the merit key. Always finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Cgpa(f64);

impl Cgpa {
    pub fn new(value: f64) -> Result<Self, AllocationError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(AllocationError::NonFiniteCgpa { value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Higher merit sorts first.
    pub fn merit_order(self, other: Self) -> Ordering {
        other.0.partial_cmp(&self.0).unwrap_or(Ordering::Equal)
    }
}

/// A ranked student as produced by the roster importer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    /// 0-based data row in the source roster.
    pub source_row: usize,
    /// Raw identity cells (every column up to and including CGPA), passed through unchanged.
    pub identity: Vec<String>,
    pub cgpa: Cgpa,
    /// One entry per preference column; `None` marks a blank cell.
    pub preferences: Vec<Option<SlotId>>,
}

impl StudentRecord {
    pub fn new(
        source_row: usize,
        identity: Vec<String>,
        cgpa: Cgpa,
        preferences: Vec<Option<SlotId>>,
    ) -> Self {
        Self {
            source_row,
            identity,
            cgpa,
            preferences,
        }
    }

    pub fn listed_slots(&self) -> impl Iterator<Item = &SlotId> {
        self.preferences.iter().flatten()
    }

    pub fn has_preference(&self, slot: &SlotId) -> bool {
        self.listed_slots().any(|listed| listed == slot)
    }
}

/// Remaining seats per slot for a single allocation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotCapacity {
    remaining: BTreeMap<SlotId, u32>,
}

impl SlotCapacity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, slot: impl Into<SlotId>, capacity: u32) -> Self {
        self.set(slot.into(), capacity);
        self
    }

    pub fn set(&mut self, slot: SlotId, capacity: u32) {
        self.remaining.insert(slot, capacity);
    }

    /// Unknown slots have no seats.
    pub fn remaining(&self, slot: &SlotId) -> u32 {
        self.remaining.get(slot).copied().unwrap_or(0)
    }

    /// Takes one seat from `slot` if any remain.
    pub fn try_claim(&mut self, slot: &SlotId) -> bool {
        match self.remaining.get_mut(slot) {
            Some(seats) if *seats > 0 => {
                *seats -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, u32)> {
        self.remaining.iter().map(|(slot, seats)| (slot, *seats))
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.remaining.values().map(|seats| u64::from(*seats)).sum()
    }
}

impl FromIterator<(SlotId, u32)> for SlotCapacity {
    fn from_iter<I: IntoIterator<Item = (SlotId, u32)>>(iter: I) -> Self {
        Self {
            remaining: iter.into_iter().collect(),
        }
    }
}

/// Terminal result for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AllocationOutcome {
    Allocated {
        slot: SlotId,
        /// 0-based preference column the slot was taken from.
        preference_index: usize,
    },
    Unallocated,
}

impl AllocationOutcome {
    pub fn slot(&self) -> Option<&SlotId> {
        match self {
            AllocationOutcome::Allocated { slot, .. } => Some(slot),
            AllocationOutcome::Unallocated => None,
        }
    }

    pub fn is_allocated(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated { .. })
    }
}

/// One row of the allocation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub source_row: usize,
    /// 0-based position in merit order.
    pub rank: usize,
    pub start_column: usize,
    pub cgpa: Cgpa,
    pub outcome: AllocationOutcome,
}

/// Allocation rows in merit order, one per ranked student.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocationResult {
    allocations: Vec<Allocation>,
}

impl AllocationResult {
    pub(crate) fn from_ranked(allocations: Vec<Allocation>) -> Self {
        Self { allocations }
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    pub fn for_row(&self, source_row: usize) -> Option<&Allocation> {
        self.allocations
            .iter()
            .find(|allocation| allocation.source_row == source_row)
    }

    /// Rows re-ordered by their position in the source roster.
    pub fn in_input_order(&self) -> Vec<&Allocation> {
        let mut rows: Vec<&Allocation> = self.allocations.iter().collect();
        rows.sort_by_key(|allocation| allocation.source_row);
        rows
    }

    pub fn allocated_count(&self) -> usize {
        self.allocations
            .iter()
            .filter(|allocation| allocation.outcome.is_allocated())
            .count()
    }

    pub fn unallocated_count(&self) -> usize {
        self.len() - self.allocated_count()
    }

    pub fn slot_counts(&self) -> PreferenceCountTable {
        PreferenceCountTable::from_result(self)
    }
}

/// Number of students assigned to each slot. Slots with no assignments are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PreferenceCountTable {
    counts: BTreeMap<SlotId, usize>,
}

impl PreferenceCountTable {
    pub fn from_result(result: &AllocationResult) -> Self {
        let mut counts = BTreeMap::new();
        for slot in result
            .allocations()
            .iter()
            .filter_map(|allocation| allocation.outcome.slot())
        {
            *counts.entry(slot.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, slot: &SlotId) -> usize {
        self.counts.get(slot).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, usize)> {
        self.counts.iter().map(|(slot, count)| (slot, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("at least one preference column is required")]
    NoPreferenceColumns,
    #[error("CGPA must be a finite number (found {value})")]
    NonFiniteCgpa { value: f64 },
}
