pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};
pub use crate::config::HospitalConfig;

pub use crate::adapters::snapshot::FileSnapshotStore;
pub use crate::core::hospital::{Hospital, Placement};
pub use crate::core::loader::{load_setup, LoadReport, ParseIssue};
pub use crate::core::registry::{get_hospital, SharedHospital};
pub use crate::domain::model::{
    BirthDate, Doctor, DoctorId, DoctorKind, Grade, Name, PatientId, Sex, TeamId, WardId,
};
pub use crate::domain::patient::{Admission, Patient};
pub use crate::domain::team::{Team, TeamRoster};
pub use crate::domain::ward::Ward;
pub use crate::utils::error::{HospitalError, Result};
