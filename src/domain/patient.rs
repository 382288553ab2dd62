use crate::domain::model::{BirthDate, Doctor, DoctorId, Name, PatientId, Sex, TeamId, WardId};
use crate::domain::team::Team;
use crate::domain::ward::Ward;
use crate::utils::error::{HospitalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Links held by an admitted patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub ward: WardId,
    pub team: TeamId,
    pub consultant: DoctorId,
    pub treated_by: BTreeSet<DoctorId>,
}

/// A patient record.
///
/// A patient starts out detached, becomes admitted through [`Patient::admit`]
/// and is detached again by [`Patient::discharge`]. Both transitions update the
/// ward and team on the other side of each link, so neither side is ever
/// half-linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    id: PatientId,
    name: Name,
    sex: Sex,
    date_of_birth: BirthDate,
    admission: Option<Admission>,
}

impl Patient {
    pub(crate) fn new(id: PatientId, name: Name, sex: Sex, date_of_birth: BirthDate) -> Self {
        Self {
            id,
            name,
            sex,
            date_of_birth,
            admission: None,
        }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn date_of_birth(&self) -> BirthDate {
        self.date_of_birth
    }

    pub fn admission(&self) -> Option<&Admission> {
        self.admission.as_ref()
    }

    pub fn is_admitted(&self) -> bool {
        self.admission.is_some()
    }

    pub fn ward(&self) -> Option<WardId> {
        self.admission.as_ref().map(|a| a.ward)
    }

    pub fn team(&self) -> Option<TeamId> {
        self.admission.as_ref().map(|a| a.team)
    }

    pub fn consultant(&self) -> Option<DoctorId> {
        self.admission.as_ref().map(|a| a.consultant)
    }

    pub fn treated_by(&self) -> Option<&BTreeSet<DoctorId>> {
        self.admission.as_ref().map(|a| &a.treated_by)
    }

    /// Places this patient on `ward_id` under `team_id` and takes the team's
    /// consultant. The ward must accept this patient's sex and have a free bed.
    pub(crate) fn admit(
        &mut self,
        ward_id: WardId,
        team_id: TeamId,
        wards: &mut [Ward],
        teams: &mut [Team],
    ) -> Result<()> {
        if self.admission.is_some() {
            return Err(HospitalError::invariant(format!(
                "patient {} is already admitted",
                self.name
            )));
        }
        let ward = wards
            .get_mut(ward_id.index())
            .ok_or_else(|| HospitalError::invariant(format!("unknown ward {}", ward_id)))?;
        let team = teams
            .get_mut(team_id.index())
            .ok_or_else(|| HospitalError::invariant(format!("unknown team {}", team_id)))?;

        if ward.kind() != self.sex {
            return Err(HospitalError::invariant(format!(
                "ward {} is for {} patients, {} is {}",
                ward.name(),
                ward.kind(),
                self.name,
                self.sex
            )));
        }
        if ward.free_beds() == 0 {
            return Err(HospitalError::invariant(format!(
                "ward {} has no free beds",
                ward.name()
            )));
        }

        ward.add_patient(self.id);
        team.add_patient(self.id);
        self.admission = Some(Admission {
            ward: ward_id,
            team: team_id,
            consultant: team.consultant(),
            treated_by: BTreeSet::new(),
        });
        Ok(())
    }

    /// Removes this patient from its ward and team and clears every link.
    /// A detached patient is left untouched.
    pub(crate) fn discharge(&mut self, wards: &mut [Ward], teams: &mut [Team]) {
        let Some(admission) = self.admission.take() else {
            return;
        };
        if let Some(ward) = wards.get_mut(admission.ward.index()) {
            ward.remove_patient(self.id);
        }
        if let Some(team) = teams.get_mut(admission.team.index()) {
            team.remove_patient(self.id);
        }
    }

    /// Records that `doctor` has seen this patient. Recording the same doctor
    /// twice has no further effect.
    pub(crate) fn record_treatment_by(
        &mut self,
        doctor_id: DoctorId,
        doctor: &Doctor,
        teams: &[Team],
    ) -> Result<()> {
        let admission = self.admission.as_mut().ok_or_else(|| {
            HospitalError::invariant(format!("patient {} is not admitted", self.name))
        })?;
        let team = teams.get(admission.team.index()).ok_or_else(|| {
            HospitalError::invariant(format!("unknown team {}", admission.team))
        })?;

        if !team.contains(doctor_id) {
            return Err(HospitalError::NotInTeam {
                doctor: doctor.name().to_string(),
                team: team.code().to_string(),
            });
        }

        admission.treated_by.insert(doctor_id);
        Ok(())
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, born {})", self.name, self.sex, self.date_of_birth)
    }
}
