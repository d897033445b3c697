use crate::config::toml_config::TomlConfig;
use crate::config::{OutputFormat, SettingsSources, VerifierSettings, SERVICE_URL_ENV};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "face-probe")]
#[command(about = "Verifies that a face recognition service honours its REST contract")]
pub struct CliConfig {
    /// Service base URL (overrides the config file and PYTHON_FACE_SERVER_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Student identifier submitted with the placeholder sample
    #[arg(long)]
    pub student_id: Option<String>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// The only place the process environment is consulted.
    pub fn load_settings(&self) -> Result<VerifierSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };
        let env_url = std::env::var(SERVICE_URL_ENV).ok();

        let settings = VerifierSettings::resolve(SettingsSources {
            cli_url: self.url.as_deref(),
            cli_student_id: self.student_id.as_deref(),
            cli_format: self.format,
            file: file.as_ref(),
            env_url: env_url.as_deref(),
        });
        settings.validate()?;
        Ok(settings)
    }
}
