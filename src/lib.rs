pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::http::HttpTransport;
pub use crate::config::{OutputFormat, VerifierSettings};
pub use crate::core::probe::{Disposition, ProbeName, ProbeResult};
pub use crate::core::report::AggregateReport;
pub use crate::core::verifier::Verifier;
pub use crate::domain::model::{RecognitionResult, RecognitionSample, ServiceEndpoint};
pub use crate::utils::error::{Result, ServiceError, VerifierError};
