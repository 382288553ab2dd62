#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{HospitalError, Result};
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SETUP_FILE: &str = "hospital.csv";
pub const DEFAULT_SNAPSHOT_FILE: &str = "Hospital.data";
pub const DEFAULT_CONFIG_FILE: &str = "hospital.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Settings resolved once at startup and handed to the hospital accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalConfig {
    pub setup_file: PathBuf,
    pub snapshot_file: PathBuf,
    pub verbose: bool,
    pub log_format: LogFormat,
}

impl Default for HospitalConfig {
    fn default() -> Self {
        Self {
            setup_file: PathBuf::from(DEFAULT_SETUP_FILE),
            snapshot_file: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            verbose: false,
            log_format: LogFormat::default(),
        }
    }
}

impl HospitalConfig {
    pub fn with_files(setup_file: impl Into<PathBuf>, snapshot_file: impl Into<PathBuf>) -> Self {
        Self {
            setup_file: setup_file.into(),
            snapshot_file: snapshot_file.into(),
            ..Self::default()
        }
    }
}

impl Validate for HospitalConfig {
    fn validate(&self) -> Result<()> {
        validate_path("files.setup", &self.setup_file)?;
        validate_path("files.snapshot", &self.snapshot_file)?;
        if self.setup_file == self.snapshot_file {
            return Err(HospitalError::ConfigValidationError {
                field: "files.snapshot".to_string(),
                message: "snapshot file must differ from the setup file".to_string(),
            });
        }
        Ok(())
    }
}
