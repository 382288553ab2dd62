use crate::config::{HospitalConfig, LogFormat};
use crate::utils::error::{HospitalError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional `hospital.toml` file.
///
/// ```toml
/// [files]
/// setup = "hospital.csv"
/// snapshot = "${HOSPITAL_DATA_DIR}/Hospital.data"
///
/// [logging]
/// verbose = false
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub files: Option<FilesConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesConfig {
    pub setup: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HospitalError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HospitalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the variable's value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HospitalError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Layers the file's values over the built-in defaults.
    pub fn to_hospital_config(&self) -> HospitalConfig {
        let mut config = HospitalConfig::default();
        if let Some(files) = &self.files {
            if let Some(setup) = &files.setup {
                config.setup_file = setup.clone();
            }
            if let Some(snapshot) = &files.snapshot {
                config.snapshot_file = snapshot.clone();
            }
        }
        if let Some(logging) = &self.logging {
            config.verbose = logging.verbose.unwrap_or(false);
            config.log_format = logging.format.unwrap_or_default();
        }
        config
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_hospital_config().validate()
    }
}
