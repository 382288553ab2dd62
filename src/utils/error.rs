use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HospitalError {
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("Doctor {doctor} is not in team {team}")]
    NotInTeam { doctor: String, team: String },

    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Cannot read setup file {}: {source}", .path.display())]
    SetupFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Snapshot file {} does not exist", .path.display())]
    SnapshotMissing { path: PathBuf },

    #[error("Snapshot file {} is unusable: {reason}", .path.display())]
    SnapshotCorrupt { path: PathBuf, reason: String },

    #[error("Problem storing state of hospital to {}: {source}", .path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    Input,
    Persistence,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HospitalError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvariantViolation { .. } | Self::NotInTeam { .. } => ErrorCategory::Domain,
            Self::ParseError { .. } | Self::SetupFile { .. } | Self::CsvError(_) => {
                ErrorCategory::Input
            }
            Self::SnapshotMissing { .. }
            | Self::SnapshotCorrupt { .. }
            | Self::SnapshotWrite { .. } => ErrorCategory::Persistence,
            Self::SerializationError(_) => ErrorCategory::Output,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ParseError { .. } | Self::SnapshotMissing { .. } => ErrorSeverity::Low,
            Self::NotInTeam { .. } | Self::SnapshotCorrupt { .. } => ErrorSeverity::Medium,
            Self::InvariantViolation { .. }
            | Self::SetupFile { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::SnapshotWrite { .. } => ErrorSeverity::Critical,
        }
    }

    /// True for failures of the snapshot file, which the driver treats as fatal.
    pub fn is_persistence(&self) -> bool {
        self.category() == ErrorCategory::Persistence
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvariantViolation { .. } => {
                "Check that the ward, team and patient referenced belong to this hospital"
            }
            Self::NotInTeam { .. } => "Record treatment only by a doctor from the patient's team",
            Self::ParseError { .. } => "Fix the offending line in the setup file and restart",
            Self::SetupFile { .. } => "Make sure the setup file exists and is readable",
            Self::SnapshotMissing { .. } | Self::SnapshotCorrupt { .. } => {
                "The hospital will be rebuilt from the setup file"
            }
            Self::SnapshotWrite { .. } => {
                "Check free disk space and write permissions for the snapshot file"
            }
            Self::SerializationError(_) => "Report this listing failure with the snapshot file",
            Self::CsvError(_) => "Make sure the setup file is comma-separated UTF-8 text",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review hospital.toml and the command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotInTeam { doctor, team } => {
                format!("{} cannot treat this patient: not a member of team {}", doctor, team)
            }
            Self::SnapshotWrite { .. } => "Problem storing state of hospital".to_string(),
            Self::SnapshotMissing { .. } | Self::SnapshotCorrupt { .. } => {
                "Data file does not exist or is incompatible with this version of the software"
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HospitalError>;
