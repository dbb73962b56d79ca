use super::config::AllocationConfig;
use super::domain::{AllocationError, AllocationResult};
use super::report::AllocationReport;
use crate::workflows::roster::{CapacityPlan, FacultyDirectory, Roster, RosterError, RosterImporter};
use std::io::Read;
use std::path::Path;

/// Composes roster import, capacity resolution, the engine pass, and reporting.
#[derive(Debug, Clone)]
pub struct AllocationService {
    directory: FacultyDirectory,
}

impl Default for AllocationService {
    fn default() -> Self {
        Self::new(FacultyDirectory::standard())
    }
}

impl AllocationService {
    pub fn new(directory: FacultyDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &FacultyDirectory {
        &self.directory
    }

    pub fn import_path<P: AsRef<Path>>(&self, path: P) -> Result<Roster, RosterError> {
        RosterImporter::from_path(path, &self.directory)
    }

    pub fn import_reader<R: Read>(&self, reader: R) -> Result<Roster, RosterError> {
        RosterImporter::from_reader(reader, &self.directory)
    }

    /// Runs the engine alone. Each call resolves a fresh capacity map.
    pub fn allocate(
        &self,
        roster: &Roster,
        plan: &CapacityPlan,
    ) -> Result<AllocationResult, AllocationError> {
        let config = AllocationConfig::for_roster(roster, plan);
        let engine = config.engine()?;
        Ok(engine.allocate(roster.students(), config.slot_capacity))
    }

    pub fn report(
        &self,
        roster: &Roster,
        plan: &CapacityPlan,
    ) -> Result<AllocationReport, AllocationError> {
        let result = self.allocate(roster, plan)?;
        Ok(AllocationReport::build(roster, &result))
    }
}
