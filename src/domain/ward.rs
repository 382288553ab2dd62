use crate::domain::model::{PatientId, Sex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A bedded unit for patients of one sex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    name: String,
    kind: Sex,
    capacity: usize,
    patients: BTreeSet<PatientId>,
}

impl Ward {
    pub(crate) fn new(name: String, kind: Sex, capacity: usize) -> Self {
        Self {
            name,
            kind,
            capacity,
            patients: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sex of patients this ward accepts.
    pub fn kind(&self) -> Sex {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn free_beds(&self) -> usize {
        self.capacity.saturating_sub(self.patients.len())
    }

    pub fn patients(&self) -> &BTreeSet<PatientId> {
        &self.patients
    }

    pub fn contains(&self, patient: PatientId) -> bool {
        self.patients.contains(&patient)
    }

    // Capacity is not checked here; the caller has already picked a ward with a free bed.
    pub(crate) fn add_patient(&mut self, patient: PatientId) {
        self.patients.insert(patient);
    }

    pub(crate) fn remove_patient(&mut self, patient: PatientId) {
        self.patients.remove(&patient);
    }
}

impl fmt::Display for Ward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}: {} free",
            self.name,
            self.kind,
            self.capacity,
            self.free_beds()
        )
    }
}
