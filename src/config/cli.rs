use crate::config::toml_config::TomlConfig;
use crate::config::{HospitalConfig, LogFormat, DEFAULT_CONFIG_FILE};
use crate::domain::model::{BirthDate, DoctorId, PatientId, Sex};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "ward-round")]
#[command(about = "Ward, team and patient administration for a small hospital")]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults to hospital.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Setup file used when no usable snapshot exists
    #[arg(long)]
    pub setup_file: Option<PathBuf>,

    /// Snapshot file holding the saved hospital
    #[arg(long)]
    pub snapshot_file: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Acquire the hospital twice, admit Ms Bet Lynch and save
    Demo,
    /// List wards with their free beds
    Wards,
    /// List teams with their doctors
    Teams,
    /// List every admitted patient
    Patients {
        #[arg(long)]
        json: bool,
    },
    /// Admit a patient under a team
    Admit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        given: String,
        #[arg(long)]
        family: String,
        #[arg(long)]
        sex: Sex,
        /// Date of birth as dd/MM/yy
        #[arg(long)]
        dob: BirthDate,
        /// Team code
        #[arg(long)]
        team: String,
    },
    /// Discharge a patient by admission number
    Discharge {
        #[arg(long)]
        patient: PatientId,
    },
    /// Record that a doctor has treated a patient
    Treat {
        #[arg(long)]
        patient: PatientId,
        #[arg(long)]
        doctor: DoctorId,
    },
}

impl CliConfig {
    /// Resolves the effective configuration: built-in defaults, then the TOML
    /// file, then command line flags.
    pub fn resolve(&self) -> Result<HospitalConfig> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Some(TomlConfig::from_file(DEFAULT_CONFIG_FILE)?)
            }
            None => None,
        };

        let mut config = file
            .map(|f| f.to_hospital_config())
            .unwrap_or_default();
        if let Some(setup) = &self.setup_file {
            config.setup_file = setup.clone();
        }
        if let Some(snapshot) = &self.snapshot_file {
            config.snapshot_file = snapshot.clone();
        }
        if self.verbose {
            config.verbose = true;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Demo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[files]\nsetup = \"seed.csv\"\nsnapshot = \"from-file.data\"\n")
            .unwrap();
        let path = temp_file.path().to_string_lossy().to_string();

        let cli = CliConfig::parse_from([
            "ward-round",
            "--config",
            path.as_str(),
            "--snapshot-file",
            "override.data",
            "--log-format",
            "json",
            "wards",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.setup_file, PathBuf::from("seed.csv"));
        assert_eq!(config.snapshot_file, PathBuf::from("override.data"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(matches!(cli.command(), Command::Wards));
    }

    #[test]
    fn test_admit_arguments_are_typed() {
        let cli = CliConfig::parse_from([
            "ward-round",
            "admit",
            "--title",
            "Ms",
            "--given",
            "Bet",
            "--family",
            "Lynch",
            "--sex",
            "f",
            "--dob",
            "23/05/78",
            "--team",
            "T1",
        ]);
        match cli.command() {
            Command::Admit { sex, dob, team, .. } => {
                assert_eq!(sex, Sex::F);
                assert_eq!(dob.to_string(), "23/05/78");
                assert_eq!(team, "T1");
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(CliConfig::try_parse_from(["ward-round", "discharge", "--patient", "x"]).is_err());
    }

    #[test]
    fn test_default_command_is_demo() {
        let cli = CliConfig::parse_from(["ward-round"]);
        assert!(matches!(cli.command(), Command::Demo));
    }
}
