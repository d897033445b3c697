use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl VerifierError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            VerifierError::HttpClientError(_) => {
                "Check the TLS setup of this machine and try again"
            }
            VerifierError::IoError(_) => "Make sure the config file exists and is readable",
            VerifierError::SerializationError(_) => "Report output could not be encoded as JSON",
            VerifierError::ConfigValidationError { .. } => {
                "Fix the TOML syntax in the config file"
            }
            VerifierError::InvalidConfigValueError { .. } => {
                "Correct the value in the config file or on the command line"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            VerifierError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifierError>;

/// Failure of a single call against the recognition service.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceError {
    #[error("Connection refused by {url}")]
    ConnectionRefused { url: String },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Service returned HTTP {status}: {body}")]
    ProtocolError { status: u16, body: String },

    #[error("Unexpected error: {details}")]
    UnknownError { details: String },
}

impl ServiceError {
    /// Operator-facing advice printed next to a hard failure.
    pub fn remediation(&self) -> &'static str {
        match self {
            ServiceError::ConnectionRefused { .. } => {
                "Start the face recognition service (cd Python && python face_recognition_server_simplified.py) and check that the configured URL and hostname are correct"
            }
            ServiceError::Timeout { .. } => {
                "Check that the service is alive and that the configured URL is correct"
            }
            ServiceError::ProtocolError { .. } => {
                "The service answered with an application error; check its logs"
            }
            ServiceError::UnknownError { .. } => "Inspect the error details above",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::ProtocolError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_exposes_status() {
        let err = ServiceError::ProtocolError {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Service returned HTTP 503: unavailable");

        let refused = ServiceError::ConnectionRefused {
            url: "http://localhost:8085/".to_string(),
        };
        assert_eq!(refused.status(), None);
        assert!(refused.remediation().starts_with("Start the face recognition service"));
        // Unresolvable hostnames land here too.
        assert!(refused.remediation().contains("URL"));
    }

    #[test]
    fn test_service_error_serializes_with_kind_tag() {
        let err = ServiceError::Timeout {
            url: "http://svc/config".to_string(),
            timeout_ms: 200,
        };
        assert_eq!(err.to_string(), "Request to http://svc/config timed out after 200ms");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "timeout");
        assert_eq!(value["timeout_ms"], 200);
    }

    #[test]
    fn test_user_friendly_message_for_invalid_value() {
        let err = VerifierError::InvalidConfigValueError {
            field: "service.url".to_string(),
            value: "ftp://x".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "Setting 'service.url' is invalid: Unsupported URL scheme: ftp"
        );
    }
}
