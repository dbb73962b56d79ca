use super::mapping::FacultyDirectory;
use super::normalizer::non_blank;
use super::Roster;
use crate::workflows::allocation::{SlotCapacity, SlotId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Seat limits supplied by the administrator before a run.
///
/// Slots listed in `overrides` use that capacity; every other slot in the roster gets
/// `default_capacity`, or an even share of the class when no default is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityPlan {
    pub default_capacity: Option<u32>,
    pub overrides: BTreeMap<SlotId, u32>,
}

impl CapacityPlan {
    pub fn uniform(capacity: u32) -> Self {
        Self {
            default_capacity: Some(capacity),
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, slot: impl Into<SlotId>, capacity: u32) -> Self {
        self.overrides.insert(slot.into(), capacity);
        self
    }

    /// Validates signed values from untyped sources (JSON bodies, CLI strings).
    pub fn from_signed<I, S>(
        default_capacity: Option<i64>,
        overrides: I,
        directory: &FacultyDirectory,
    ) -> Result<Self, CapacityError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let default_capacity = default_capacity
            .map(|value| checked_capacity("default", value))
            .transpose()?;

        let mut plan = Self {
            default_capacity,
            overrides: BTreeMap::new(),
        };
        for (raw_slot, value) in overrides {
            let Some(slot) = directory.resolve(raw_slot.as_ref()) else {
                continue;
            };
            let capacity = checked_capacity(slot.as_str(), value)?;
            plan.overrides.insert(slot, capacity);
        }

        Ok(plan)
    }

    /// Reads per-slot overrides from a `Fac,Capacity` CSV file.
    pub fn overrides_from_path<P: AsRef<Path>>(
        self,
        path: P,
        directory: &FacultyDirectory,
    ) -> Result<Self, CapacityError> {
        let file = std::fs::File::open(path)?;
        self.overrides_from_reader(file, directory)
    }

    pub fn overrides_from_reader<R: Read>(
        mut self,
        reader: R,
        directory: &FacultyDirectory,
    ) -> Result<Self, CapacityError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        for row in csv_reader.deserialize::<CapacityRow>() {
            let row = row?;
            let Some(slot) = directory.resolve(&row.faculty) else {
                continue;
            };
            let raw = non_blank(&row.capacity).unwrap_or_default();
            let value = raw.parse::<i64>().map_err(|_| CapacityError::NotAnInteger {
                slot: slot.to_string(),
                raw: raw.to_string(),
            })?;
            let capacity = checked_capacity(slot.as_str(), value)?;
            self.overrides.insert(slot, capacity);
        }

        Ok(self)
    }

    /// Even share used when no default is configured: `ceil(students / slots)`, at least 1.
    pub fn inferred_default(students: usize, slots: usize) -> u32 {
        if slots == 0 {
            return 1;
        }

        let share = students.div_ceil(slots).max(1);
        u32::try_from(share).unwrap_or(u32::MAX)
    }

    /// Seats for every slot the roster's students listed, plus any extra overrides.
    pub fn resolve(&self, roster: &Roster) -> SlotCapacity {
        let universe = roster.slot_universe();
        let default_capacity = self.default_capacity.unwrap_or_else(|| {
            let inferred = Self::inferred_default(roster.students().len(), universe.len());
            debug!(
                students = roster.students().len(),
                slots = universe.len(),
                inferred,
                "no default capacity configured, using even share"
            );
            inferred
        });

        let mut capacity: SlotCapacity = universe
            .into_iter()
            .map(|slot| (slot, default_capacity))
            .collect();
        for (slot, seats) in &self.overrides {
            capacity.set(slot.clone(), *seats);
        }
        capacity
    }
}

fn checked_capacity(slot: &str, value: i64) -> Result<u32, CapacityError> {
    if value < 0 {
        return Err(CapacityError::Negative {
            slot: slot.to_string(),
            value,
        });
    }

    u32::try_from(value).map_err(|_| CapacityError::TooLarge {
        slot: slot.to_string(),
        value,
    })
}

#[derive(Debug, Deserialize)]
struct CapacityRow {
    #[serde(rename = "Fac", alias = "Faculty", alias = "Slot")]
    faculty: String,
    #[serde(rename = "Capacity", default)]
    capacity: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("capacity for '{slot}' must be non-negative (found {value})")]
    Negative { slot: String, value: i64 },
    #[error("capacity for '{slot}' exceeds the supported maximum (found {value})")]
    TooLarge { slot: String, value: i64 },
    #[error("capacity for '{slot}' is not an integer: '{raw}'")]
    NotAnInteger { slot: String, raw: String },
    #[error("failed to read capacity file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid capacity CSV data: {0}")]
    Csv(#[from] csv::Error),
}
