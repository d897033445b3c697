#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::config::toml_config::TomlConfig;
use crate::domain::model::{ProbeTimeouts, RecognitionSample, ServiceEndpoint};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// Environment override for the service base URL.
pub const SERVICE_URL_ENV: &str = "PYTHON_FACE_SERVER_URL";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything a single verification run needs, already resolved.
#[derive(Debug, Clone, Default)]
pub struct VerifierSettings {
    pub endpoint: ServiceEndpoint,
    pub timeouts: ProbeTimeouts,
    pub sample: RecognitionSample,
    pub format: OutputFormat,
}

/// Raw inputs to settings resolution, highest precedence first per field.
#[derive(Debug, Default)]
pub struct SettingsSources<'a> {
    pub cli_url: Option<&'a str>,
    pub cli_student_id: Option<&'a str>,
    pub cli_format: Option<OutputFormat>,
    pub file: Option<&'a TomlConfig>,
    pub env_url: Option<&'a str>,
}

impl VerifierSettings {
    /// URL: CLI, then config file, then environment, then the default.
    pub fn resolve(sources: SettingsSources<'_>) -> Self {
        let file = sources.file;
        let override_url = sources
            .cli_url
            .or_else(|| file.and_then(|f| f.service_url()))
            .or(sources.env_url);

        let placeholder = RecognitionSample::placeholder();
        let student_id = sources
            .cli_student_id
            .or_else(|| file.and_then(|f| f.student_id()))
            .unwrap_or(placeholder.student_id.as_str());
        let image = file.and_then(|f| f.image()).unwrap_or(placeholder.image.as_str());

        Self {
            endpoint: ServiceEndpoint::resolve(override_url),
            timeouts: file.map(|f| f.timeouts()).unwrap_or_default(),
            sample: RecognitionSample::new(student_id, image),
            format: sources
                .cli_format
                .or_else(|| file.and_then(|f| f.format()))
                .unwrap_or_default(),
        }
    }
}

impl Validate for VerifierSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("service.url", self.endpoint.base_url())?;
        validation::validate_non_empty_string("sample.student_id", &self.sample.student_id)?;
        validation::validate_data_uri("sample.image", &self.sample.image)?;
        Ok(())
    }
}

impl ConfigProvider for VerifierSettings {
    fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    fn timeouts(&self) -> ProbeTimeouts {
        self.timeouts
    }

    fn sample(&self) -> &RecognitionSample {
        &self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DEFAULT_SERVICE_URL;
    use std::time::Duration;

    #[test]
    fn test_defaults_without_any_source() {
        let settings = VerifierSettings::resolve(SettingsSources::default());
        assert_eq!(settings.endpoint.base_url(), DEFAULT_SERVICE_URL);
        assert_eq!(settings.sample, RecognitionSample::placeholder());
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_url_precedence() {
        let file = TomlConfig::from_toml_str("[service]\nurl = \"http://from-file:1\"\n").unwrap();

        let env_only = VerifierSettings::resolve(SettingsSources {
            env_url: Some("http://from-env:2"),
            ..Default::default()
        });
        assert_eq!(env_only.endpoint.base_url(), "http://from-env:2");

        let file_beats_env = VerifierSettings::resolve(SettingsSources {
            file: Some(&file),
            env_url: Some("http://from-env:2"),
            ..Default::default()
        });
        assert_eq!(file_beats_env.endpoint.base_url(), "http://from-file:1");

        let cli_beats_all = VerifierSettings::resolve(SettingsSources {
            cli_url: Some("http://from-cli:3"),
            file: Some(&file),
            env_url: Some("http://from-env:2"),
            ..Default::default()
        });
        assert_eq!(cli_beats_all.endpoint.base_url(), "http://from-cli:3");
    }

    #[test]
    fn test_file_values_flow_into_settings() {
        let file = TomlConfig::from_toml_str(
            "[timeouts]\nencode_secs = 20\n[sample]\nstudent_id = \"FILE-1\"\n[report]\nformat = \"json\"\n",
        )
        .unwrap();

        let settings = VerifierSettings::resolve(SettingsSources {
            file: Some(&file),
            ..Default::default()
        });
        assert_eq!(settings.timeouts.encode, Duration::from_secs(20));
        assert_eq!(settings.sample.student_id, "FILE-1");
        assert_eq!(settings.format, OutputFormat::Json);

        let cli_override = VerifierSettings::resolve(SettingsSources {
            file: Some(&file),
            cli_student_id: Some("CLI-1"),
            cli_format: Some(OutputFormat::Text),
            ..Default::default()
        });
        assert_eq!(cli_override.sample.student_id, "CLI-1");
        assert_eq!(cli_override.format, OutputFormat::Text);
    }

    #[test]
    fn test_invalid_url_fails_validation() {
        let settings = VerifierSettings::resolve(SettingsSources {
            cli_url: Some("localhost:8085"),
            ..Default::default()
        });
        assert!(settings.validate().is_err());
    }
}
