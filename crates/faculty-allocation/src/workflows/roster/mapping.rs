use super::normalizer::non_blank;
use crate::workflows::allocation::SlotId;
use std::collections::HashMap;

/// Short names for the numeric faculty codes used on the preference form.
const STANDARD_FACULTY_CODES: &[(&str, &str)] = &[
    ("1", "ABM"),
    ("2", "AE"),
    ("3", "AM"),
    ("4", "AR"),
    ("5", "CA"),
    ("6", "JC"),
    ("7", "JM"),
    ("8", "MA"),
    ("9", "RH"),
    ("10", "RM"),
    ("11", "RM2"),
    ("12", "RS"),
    ("13", "SK"),
    ("14", "SKD"),
    ("15", "SKM"),
    ("16", "SM"),
    ("17", "SS"),
    ("18", "ST"),
];

/// Maps raw preference cells to slot identifiers.
///
/// Cells matching a known code (including the `"3.0"` form spreadsheets produce) resolve to
/// the faculty short name; any other non-blank value is taken as the slot name itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyDirectory {
    codes: HashMap<String, String>,
}

impl FacultyDirectory {
    pub fn standard() -> Self {
        Self::from_pairs(STANDARD_FACULTY_CODES.iter().copied())
    }

    /// Directory with no codes: every cell is used verbatim.
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let codes = pairs
            .into_iter()
            .map(|(code, name)| (code.into(), name.into()))
            .collect();
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn resolve(&self, raw: &str) -> Option<SlotId> {
        let value = non_blank(raw)?;

        if let Some(name) = self.codes.get(value) {
            return Some(SlotId::new(name.as_str()));
        }

        if let Some(name) = integral_code(value).and_then(|code| self.codes.get(&code)) {
            return Some(SlotId::new(name.as_str()));
        }

        Some(SlotId::new(value))
    }
}

/// Canonical integer form of numeric cells such as `"01"`, `"3.0"` or `"1.00"`.
fn integral_code(value: &str) -> Option<String> {
    let number = value.parse::<f64>().ok()?;
    let integral = number.is_finite() && number >= 0.0 && number.fract() == 0.0;
    (integral && number <= f64::from(u32::MAX)).then(|| format!("{}", number as u64))
}
