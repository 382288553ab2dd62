use crate::domain::model::{
    BirthDate, Doctor, DoctorId, Name, PatientId, Sex, TeamId, WardId,
};
use crate::domain::patient::Patient;
use crate::domain::ports::SnapshotStore;
use crate::domain::team::{Team, TeamRoster};
use crate::domain::ward::Ward;
use crate::utils::error::{HospitalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a successful admission put the new patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub ward: WardId,
    pub patient: PatientId,
}

/// The coordinating aggregate for wards, teams, doctors and admitted patients.
///
/// Every cross-reference in the graph is an id into one of the collections
/// owned here, so a patient listed on a ward and in a team is always the same
/// registry entry. All mutation goes through this type.
///
/// Ids are positions, so they only mean something to the hospital that issued
/// them. An id from another hospital that happens to be in range resolves to
/// whatever entry sits at that position here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    wards: Vec<Ward>,
    teams: Vec<Team>,
    doctors: Vec<Doctor>,
    patients: BTreeMap<PatientId, Patient>,
    next_patient: usize,
}

impl Hospital {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ward(&mut self, name: &str, kind: Sex, capacity: usize) -> Result<WardId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HospitalError::invariant("ward name cannot be empty"));
        }
        if capacity == 0 {
            return Err(HospitalError::invariant(format!(
                "ward {} must have at least one bed",
                name
            )));
        }
        if self.ward_id_by_name(name).is_some() {
            return Err(HospitalError::invariant(format!(
                "ward {} already exists",
                name
            )));
        }

        let id = WardId(self.wards.len());
        self.wards.push(Ward::new(name.to_string(), kind, capacity));
        tracing::debug!("Added ward {} ({}, {} beds)", name, kind, capacity);
        Ok(id)
    }

    pub fn add_team(&mut self, roster: TeamRoster) -> Result<TeamId> {
        roster.validate()?;
        let code = roster.code.trim().to_string();
        if self.team_id_by_code(&code).is_some() {
            return Err(HospitalError::invariant(format!(
                "team {} already exists",
                code
            )));
        }
        let Some(consultant_name) = roster.consultant else {
            return Err(HospitalError::invariant(format!(
                "team {} has no consultant",
                code
            )));
        };

        let consultant = self.hire(Doctor::consultant(consultant_name));
        let mut roster_ids = vec![consultant];
        for (name, grade) in roster.juniors {
            roster_ids.push(self.hire(Doctor::junior(name, grade)));
        }

        let id = TeamId(self.teams.len());
        tracing::debug!("Added team {} with {} doctors", code, roster_ids.len());
        self.teams.push(Team::new(code, roster_ids, consultant));
        Ok(id)
    }

    fn hire(&mut self, doctor: Doctor) -> DoctorId {
        let id = DoctorId(self.doctors.len());
        self.doctors.push(doctor);
        id
    }

    /// Admits a new patient under `team` onto the ward of the patient's sex
    /// with the most free beds.
    ///
    /// Wards are scanned in the order they were added and the first ward seen
    /// wins a tie. Returns `Ok(None)` without touching any state when no ward
    /// of that sex has a free bed.
    pub fn admit(
        &mut self,
        name: Name,
        sex: Sex,
        date_of_birth: BirthDate,
        team: TeamId,
    ) -> Result<Option<Placement>> {
        if self.teams.get(team.index()).is_none() {
            return Err(HospitalError::invariant(format!("unknown team {}", team)));
        }

        let Some(ward) = self.select_ward(sex) else {
            tracing::debug!("No {} ward has a free bed for {}", sex, name);
            return Ok(None);
        };

        let id = PatientId(self.next_patient);
        let mut patient = Patient::new(id, name, sex, date_of_birth);
        patient.admit(ward, team, &mut self.wards, &mut self.teams)?;
        self.next_patient += 1;

        tracing::debug!(
            "Admitted {} to ward {} under team {}",
            patient.name(),
            self.wards[ward.index()].name(),
            self.teams[team.index()].code()
        );
        self.patients.insert(id, patient);
        Ok(Some(Placement { ward, patient: id }))
    }

    fn select_ward(&self, sex: Sex) -> Option<WardId> {
        let mut best = None;
        let mut best_free = 0;
        for (index, ward) in self.wards.iter().enumerate() {
            if ward.kind() == sex && ward.free_beds() > best_free {
                best = Some(WardId(index));
                best_free = ward.free_beds();
            }
        }
        best
    }

    /// Severs every link between the patient and the hospital and hands the
    /// detached record back. Unknown or already discharged ids are a no-op.
    pub fn discharge(&mut self, patient: PatientId) -> Option<Patient> {
        let mut record = self.patients.remove(&patient)?;
        record.discharge(&mut self.wards, &mut self.teams);
        tracing::debug!("Discharged {}", record.name());
        Some(record)
    }

    pub fn record_treatment(&mut self, patient: PatientId, doctor: DoctorId) -> Result<()> {
        let staff = self
            .doctors
            .get(doctor.index())
            .ok_or_else(|| HospitalError::invariant(format!("unknown doctor {}", doctor)))?;
        let record = self
            .patients
            .get_mut(&patient)
            .ok_or_else(|| HospitalError::invariant(format!("unknown patient {}", patient)))?;

        record.record_treatment_by(doctor, staff, &self.teams)?;
        tracing::debug!("Recorded treatment of {} by {}", record.name(), staff.name());
        Ok(())
    }

    pub fn wards(&self) -> &[Ward] {
        &self.wards
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn ward(&self, id: WardId) -> Option<&Ward> {
        self.wards.get(id.index())
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index())
    }

    pub fn doctor(&self, id: DoctorId) -> Option<&Doctor> {
        self.doctors.get(id.index())
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(&id)
    }

    pub fn ward_id_by_name(&self, name: &str) -> Option<WardId> {
        self.wards
            .iter()
            .position(|ward| ward.name().eq_ignore_ascii_case(name.trim()))
            .map(WardId)
    }

    pub fn team_id_by_code(&self, code: &str) -> Option<TeamId> {
        self.teams
            .iter()
            .position(|team| team.code().eq_ignore_ascii_case(code.trim()))
            .map(TeamId)
    }

    pub fn find_doctor(&self, name: &Name) -> Option<DoctorId> {
        self.doctors
            .iter()
            .position(|doctor| doctor.name() == name)
            .map(DoctorId)
    }

    pub fn find_patients(&self, name: &Name) -> Vec<&Patient> {
        self.patients
            .values()
            .filter(|patient| patient.name() == name)
            .collect()
    }

    /// Every admitted patient, ward by ward.
    pub fn patients(&self) -> Vec<&Patient> {
        self.wards
            .iter()
            .flat_map(|ward| ward.patients().iter())
            .filter_map(|id| self.patients.get(id))
            .collect()
    }

    pub fn patients_on(&self, ward: WardId) -> Result<Vec<&Patient>> {
        let ward = self.require_ward(ward)?;
        Ok(ward
            .patients()
            .iter()
            .filter_map(|id| self.patients.get(id))
            .collect())
    }

    pub fn doctors_in(&self, team: TeamId) -> Result<Vec<&Doctor>> {
        let team = self.require_team(team)?;
        Ok(team
            .doctors()
            .iter()
            .filter_map(|id| self.doctors.get(id.index()))
            .collect())
    }

    /// Doctors that have treated the patient.
    pub fn doctors_treating(&self, patient: PatientId) -> Result<Vec<&Doctor>> {
        let treated_by = self
            .require_patient(patient)?
            .treated_by()
            .ok_or_else(|| not_admitted(patient))?;
        Ok(treated_by
            .iter()
            .filter_map(|id| self.doctors.get(id.index()))
            .collect())
    }

    pub fn consultant_of(&self, patient: PatientId) -> Result<&Doctor> {
        let consultant = self
            .require_patient(patient)?
            .consultant()
            .ok_or_else(|| not_admitted(patient))?;
        self.doctors
            .get(consultant.index())
            .ok_or_else(|| HospitalError::invariant(format!("unknown doctor {}", consultant)))
    }

    pub fn team_of(&self, patient: PatientId) -> Result<&Team> {
        let team = self
            .require_patient(patient)?
            .team()
            .ok_or_else(|| not_admitted(patient))?;
        self.require_team(team)
    }

    pub fn patients_and_wards(&self, team: TeamId) -> Result<BTreeMap<PatientId, WardId>> {
        Ok(self.require_team(team)?.patients_and_wards(&self.patients))
    }

    fn require_ward(&self, id: WardId) -> Result<&Ward> {
        self.ward(id)
            .ok_or_else(|| HospitalError::invariant(format!("unknown ward {}", id)))
    }

    fn require_team(&self, id: TeamId) -> Result<&Team> {
        self.team(id)
            .ok_or_else(|| HospitalError::invariant(format!("unknown team {}", id)))
    }

    fn require_patient(&self, id: PatientId) -> Result<&Patient> {
        self.patient(id)
            .ok_or_else(|| HospitalError::invariant(format!("unknown patient {}", id)))
    }

    /// Writes the whole graph to `store`.
    pub fn save_to(&self, store: &dyn SnapshotStore) -> Result<()> {
        store.write(self)?;
        tracing::info!(
            "Saved hospital: {} wards, {} teams, {} patients",
            self.wards.len(),
            self.teams.len(),
            self.patients.len()
        );
        Ok(())
    }

    /// Reads a graph back from `store`, rejecting one whose links disagree.
    pub fn restore_from(store: &dyn SnapshotStore) -> Result<Self> {
        let hospital = store.read()?;
        hospital.check_invariants()?;
        tracing::info!(
            "Restored hospital: {} wards, {} teams, {} patients",
            hospital.wards.len(),
            hospital.teams.len(),
            hospital.patients.len()
        );
        Ok(hospital)
    }

    /// Verifies that every link in the graph is mirrored on the other side.
    pub fn check_invariants(&self) -> Result<()> {
        for (index, ward) in self.wards.iter().enumerate() {
            if ward.patients().len() > ward.capacity() {
                return Err(HospitalError::invariant(format!(
                    "ward {} holds {} patients but has {} beds",
                    ward.name(),
                    ward.patients().len(),
                    ward.capacity()
                )));
            }
            for id in ward.patients() {
                let patient = self.require_patient(*id)?;
                if patient.sex() != ward.kind() || patient.ward() != Some(WardId(index)) {
                    return Err(HospitalError::invariant(format!(
                        "ward {} lists {} who does not belong there",
                        ward.name(),
                        patient.name()
                    )));
                }
            }
        }

        for (index, team) in self.teams.iter().enumerate() {
            let head = self.doctor(team.consultant());
            if !team.contains(team.consultant()) || !head.is_some_and(Doctor::is_consultant) {
                return Err(HospitalError::invariant(format!(
                    "team {} is not headed by a consultant on its roster",
                    team.code()
                )));
            }
            if let Some(missing) = team.doctors().iter().find(|id| self.doctor(**id).is_none()) {
                return Err(HospitalError::invariant(format!(
                    "team {} lists unknown doctor {}",
                    team.code(),
                    missing
                )));
            }
            for id in team.patients() {
                let patient = self.require_patient(*id)?;
                if patient.team() != Some(TeamId(index))
                    || patient.consultant() != Some(team.consultant())
                {
                    return Err(HospitalError::invariant(format!(
                        "team {} lists {} who is not under its care",
                        team.code(),
                        patient.name()
                    )));
                }
            }
        }

        for (id, patient) in &self.patients {
            let admission = patient.admission().ok_or_else(|| not_admitted(*id))?;
            if patient.id() != *id || id.index() >= self.next_patient {
                return Err(HospitalError::invariant(format!(
                    "patient {} is registered under the wrong id",
                    patient.name()
                )));
            }
            let ward = self.require_ward(admission.ward)?;
            let team = self.require_team(admission.team)?;
            if !ward.contains(*id) || !team.patients().contains(id) {
                return Err(HospitalError::invariant(format!(
                    "patient {} is only half linked",
                    patient.name()
                )));
            }
            if let Some(stranger) = admission.treated_by.iter().find(|d| !team.contains(**d)) {
                return Err(HospitalError::invariant(format!(
                    "patient {} was treated by doctor {} outside team {}",
                    patient.name(),
                    stranger,
                    team.code()
                )));
            }
        }

        Ok(())
    }
}

fn not_admitted(patient: PatientId) -> HospitalError {
    HospitalError::invariant(format!("patient {} is not admitted", patient))
}

impl fmt::Display for Hospital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Teams:")?;
        for team in &self.teams {
            writeln!(f, "  {}", team)?;
            for doctor in team.doctors().iter().filter_map(|id| self.doctor(*id)) {
                writeln!(f, "    {}", doctor)?;
            }
        }
        writeln!(f, "Wards:")?;
        for ward in &self.wards {
            writeln!(f, "  {}", ward)?;
            for patient in ward.patients().iter().filter_map(|id| self.patient(*id)) {
                writeln!(f, "    {}", patient)?;
            }
        }
        Ok(())
    }
}
