use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8085";

/// 1×1 transparent PNG. The service should reject it as a face sample.
pub const PLACEHOLDER_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub const PLACEHOLDER_STUDENT_ID: &str = "TEST001";

/// Base URL of the recognition service, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServiceEndpoint {
    base_url: String,
}

impl ServiceEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Uses the override when it is set and non-blank, otherwise the default URL.
    pub fn resolve(override_url: Option<&str>) -> Self {
        match override_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Self::new(url),
            None => Self::new(DEFAULT_SERVICE_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL)
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}

/// Encoded image plus the identifier it is submitted under. Input only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSample {
    pub student_id: String,
    pub image: String,
}

impl RecognitionSample {
    pub fn new(student_id: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            image: image.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_STUDENT_ID, PLACEHOLDER_IMAGE)
    }
}

impl Default for RecognitionSample {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTimeouts {
    pub health: Duration,
    pub config: Duration,
    pub encode: Duration,
    pub compare: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            health: Duration::from_secs(10),
            config: Duration::from_secs(10),
            encode: Duration::from_secs(30),
            compare: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// `GET /`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub version: Option<String>,
    pub timestamp: Option<String>,
}

/// `GET /config`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigResponse {
    pub confidence_threshold: Option<f64>,
    pub anti_spoof_enabled: Option<bool>,
    pub face_recognition_model: Option<String>,
    pub mode: Option<String>,
    pub version: Option<String>,
}

impl ConfigResponse {
    pub fn mode_or_default(&self) -> &str {
        self.mode.as_deref().unwrap_or("production")
    }
}

/// `POST /encode`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodeResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

/// `POST /compare`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub deprecated: bool,
    pub message: Option<String>,
}

/// A recognized student as handed to a display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub name: String,
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient_percentage")]
    pub confidence: f64,
    #[serde(default)]
    pub spoof_score: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
}

pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 90.0;

impl RecognitionResult {
    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.confidence)
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence >= HIGH_CONFIDENCE_THRESHOLD
    }

    pub fn department_label(&self) -> &str {
        self.department
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("Not specified")
    }

    /// Present whenever the service sent a score, including 0.
    pub fn security_score(&self) -> Option<f64> {
        self.spoof_score
    }
}

impl fmt::Display for RecognitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Face Recognized: {} ({})", self.name, self.student_id)?;
        writeln!(f, "Department: {}", self.department_label())?;
        write!(f, "Confidence: {}", self.confidence_label())?;
        if self.is_high_confidence() {
            write!(f, " [High Confidence]")?;
        }
        if let Some(score) = self.security_score() {
            write!(f, "\nSecurity Score: {}", score)?;
        }
        Ok(())
    }
}

// Numbers pass through, numeric strings are parsed, anything else reads as 0.
fn lenient_percentage<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
