use crate::domain::model::{DoctorId, Grade, Name, PatientId, WardId};
use crate::domain::patient::Patient;
use crate::utils::error::{HospitalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A medical team headed by one consultant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    code: String,
    doctors: Vec<DoctorId>,
    consultant: DoctorId,
    patients: BTreeSet<PatientId>,
}

impl Team {
    /// `doctors` must already include `consultant`.
    pub(crate) fn new(code: String, doctors: Vec<DoctorId>, consultant: DoctorId) -> Self {
        Self {
            code,
            doctors,
            consultant,
            patients: BTreeSet::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn doctors(&self) -> &[DoctorId] {
        &self.doctors
    }

    pub fn consultant(&self) -> DoctorId {
        self.consultant
    }

    pub fn patients(&self) -> &BTreeSet<PatientId> {
        &self.patients
    }

    /// Roster membership, used to validate treatment.
    pub fn contains(&self, doctor: DoctorId) -> bool {
        self.doctors.contains(&doctor)
    }

    /// Builds a fresh map from each patient cared for by this team to the ward
    /// that patient reports as current.
    pub fn patients_and_wards(
        &self,
        registry: &BTreeMap<PatientId, Patient>,
    ) -> BTreeMap<PatientId, WardId> {
        self.patients
            .iter()
            .filter_map(|id| {
                registry
                    .get(id)
                    .and_then(Patient::ward)
                    .map(|ward| (*id, ward))
            })
            .collect()
    }

    pub(crate) fn add_patient(&mut self, patient: PatientId) {
        self.patients.insert(patient);
    }

    pub(crate) fn remove_patient(&mut self, patient: PatientId) {
        self.patients.remove(&patient);
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} doctors: {} patients",
            self.code,
            self.doctors.len(),
            self.patients.len()
        )
    }
}

/// A team as read from the setup file, before it is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRoster {
    pub code: String,
    pub consultant: Option<Name>,
    pub juniors: Vec<(Name, Grade)>,
}

impl TeamRoster {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_consultant(mut self, name: Name) -> Self {
        self.consultant = Some(name);
        self
    }

    pub fn with_junior(mut self, name: Name, grade: Grade) -> Self {
        self.juniors.push((name, grade));
        self
    }

    /// A team needs a consultant and at least one junior of the lowest grade.
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(HospitalError::invariant("team code cannot be empty"));
        }
        if self.consultant.is_none() {
            return Err(HospitalError::invariant(format!(
                "team {} has no consultant",
                self.code
            )));
        }
        if !self
            .juniors
            .iter()
            .any(|(_, grade)| *grade == Grade::lowest())
        {
            return Err(HospitalError::invariant(format!(
                "team {} needs at least one {} junior doctor",
                self.code,
                Grade::lowest()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(given: &str, family: &str) -> Name {
        Name::new("Dr", given, family).unwrap()
    }

    #[test]
    fn test_roster_requires_consultant_and_lowest_junior() {
        let roster = TeamRoster::new("T1").with_junior(name("Ann", "Jones"), Grade::Foundation1);
        assert!(roster.validate().is_err());

        let roster = TeamRoster::new("T1")
            .with_consultant(name("John", "Smith"))
            .with_junior(name("Ann", "Jones"), Grade::Foundation2);
        assert!(roster.validate().is_err());

        let roster = TeamRoster::new("T1")
            .with_consultant(name("John", "Smith"))
            .with_junior(name("Ann", "Jones"), Grade::Foundation1);
        assert!(roster.validate().is_ok());
    }

    #[test]
    fn test_contains_checks_roster() {
        let team = Team::new("T1".to_string(), vec![DoctorId(0), DoctorId(1)], DoctorId(0));
        assert!(team.contains(DoctorId(1)));
        assert!(!team.contains(DoctorId(2)));
        assert_eq!(team.consultant(), DoctorId(0));
    }
}
