use super::mapping::FacultyDirectory;
use super::normalizer::{header_key, non_blank, normalize_header};
use super::{InputShapeError, RejectedRow, RosterError, RowIssue};
use crate::workflows::allocation::{Cgpa, SlotId, StudentRecord};
use serde::Serialize;
use std::io::Read;
use tracing::warn;

/// Header spellings accepted as the CGPA column before falling back to a substring match.
const CGPA_HEADERS: &[&str] = &["cgpa", "cgpa_score", "gpa", "cgpa (out of 10)"];

/// Column roles detected from the roster header row.
///
/// Everything up to and including the CGPA column is identity; everything after it is a
/// preference column, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterLayout {
    headers: Vec<String>,
    cgpa_index: usize,
}

impl RosterLayout {
    pub fn detect<I, S>(headers: I) -> Result<Self, InputShapeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|header| normalize_header(header.as_ref()))
            .collect();
        let keys: Vec<String> = headers.iter().map(|header| header_key(header)).collect();

        let cgpa_index = keys
            .iter()
            .position(|key| CGPA_HEADERS.contains(&key.as_str()))
            .or_else(|| keys.iter().position(|key| key.contains("cgpa")))
            .ok_or(InputShapeError::MissingCgpaColumn)?;

        if cgpa_index + 1 >= headers.len() {
            return Err(InputShapeError::NoPreferenceColumns {
                cgpa_column: headers[cgpa_index].clone(),
            });
        }

        Ok(Self {
            headers,
            cgpa_index,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn cgpa_index(&self) -> usize {
        self.cgpa_index
    }

    pub fn cgpa_column(&self) -> &str {
        &self.headers[self.cgpa_index]
    }

    pub fn identity_columns(&self) -> &[String] {
        &self.headers[..=self.cgpa_index]
    }

    pub fn preference_columns(&self) -> &[String] {
        &self.headers[self.cgpa_index + 1..]
    }

    pub fn preference_width(&self) -> usize {
        self.headers.len() - self.cgpa_index - 1
    }
}

pub(crate) struct ParsedRoster {
    pub(crate) layout: RosterLayout,
    pub(crate) students: Vec<StudentRecord>,
    pub(crate) rejected: Vec<RejectedRow>,
}

pub(crate) fn parse_roster<R: Read>(
    reader: R,
    directory: &FacultyDirectory,
) -> Result<ParsedRoster, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let layout = RosterLayout::detect(csv_reader.headers()?.iter())?;
    let mut students = Vec::new();
    let mut rejected = Vec::new();

    for (source_row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let cell = |index: usize| record.get(index).unwrap_or("");

        let identity: Vec<String> = (0..=layout.cgpa_index)
            .map(|index| cell(index).to_string())
            .collect();
        let preferences: Vec<Option<SlotId>> = (layout.cgpa_index + 1..layout.headers.len())
            .map(|index| directory.resolve(cell(index)))
            .collect();

        match parse_cgpa(cell(layout.cgpa_index)) {
            Ok(cgpa) => students.push(StudentRecord::new(source_row, identity, cgpa, preferences)),
            Err(issue) => {
                warn!(source_row, %issue, "roster row cannot be ranked");
                rejected.push(RejectedRow {
                    source_row,
                    identity,
                    preferences,
                    issue,
                });
            }
        }
    }

    Ok(ParsedRoster {
        layout,
        students,
        rejected,
    })
}

fn parse_cgpa(raw: &str) -> Result<Cgpa, RowIssue> {
    let value = non_blank(raw).ok_or(RowIssue::MissingCgpa)?;
    let invalid = || RowIssue::InvalidCgpa {
        raw: value.to_string(),
    };

    let parsed = value.parse::<f64>().map_err(|_| invalid())?;
    Cgpa::new(parsed).map_err(|_| invalid())
}

#[cfg(test)]
pub(crate) fn parse_cgpa_for_tests(raw: &str) -> Result<Cgpa, RowIssue> {
    parse_cgpa(raw)
}
