use crate::config::OutputFormat;
use crate::domain::model::ProbeTimeouts;
use crate::utils::error::{Result, VerifierError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MIN_TIMEOUT_SECS: u64 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub timeouts: Option<TimeoutConfig>,
    pub sample: Option<SampleConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub health_secs: Option<u64>,
    pub config_secs: Option<u64>,
    pub encode_secs: Option<u64>,
    pub compare_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleConfig {
    pub student_id: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub format: Option<OutputFormat>,
}

impl TomlConfig {
    /// Loads the config from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VerifierError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| VerifierError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` references; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| VerifierError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(url) = &self.service.url {
            validation::validate_url("service.url", url)?;
        }

        // Timeouts may be tightened but never raised above the defaults.
        if let Some(timeouts) = &self.timeouts {
            let ceilings = ProbeTimeouts::default();
            let fields = [
                ("timeouts.health_secs", timeouts.health_secs, ceilings.health),
                ("timeouts.config_secs", timeouts.config_secs, ceilings.config),
                ("timeouts.encode_secs", timeouts.encode_secs, ceilings.encode),
                ("timeouts.compare_secs", timeouts.compare_secs, ceilings.compare),
            ];
            for (field, value, ceiling) in fields {
                if let Some(secs) = value {
                    validation::validate_range(field, secs, MIN_TIMEOUT_SECS, ceiling.as_secs())?;
                }
            }
        }

        if let Some(sample) = &self.sample {
            if let Some(student_id) = &sample.student_id {
                validation::validate_non_empty_string("sample.student_id", student_id)?;
            }
            if let Some(image) = &sample.image {
                validation::validate_data_uri("sample.image", image)?;
            }
        }

        Ok(())
    }

    pub fn service_url(&self) -> Option<&str> {
        self.service.url.as_deref()
    }

    /// Configured timeouts layered over the defaults.
    pub fn timeouts(&self) -> ProbeTimeouts {
        let defaults = ProbeTimeouts::default();
        let Some(t) = &self.timeouts else {
            return defaults;
        };
        let pick = |secs: Option<u64>, fallback: Duration| {
            secs.map(Duration::from_secs).unwrap_or(fallback)
        };

        ProbeTimeouts {
            health: pick(t.health_secs, defaults.health),
            config: pick(t.config_secs, defaults.config),
            encode: pick(t.encode_secs, defaults.encode),
            compare: pick(t.compare_secs, defaults.compare),
        }
    }

    pub fn student_id(&self) -> Option<&str> {
        self.sample.as_ref().and_then(|s| s.student_id.as_deref())
    }

    pub fn image(&self) -> Option<&str> {
        self.sample.as_ref().and_then(|s| s.image.as_deref())
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.report.as_ref().and_then(|r| r.format)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
