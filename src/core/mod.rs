pub mod probe;
pub mod report;
pub mod verifier;

pub use crate::domain::model::{ProbeTimeouts, RecognitionSample, ServiceEndpoint};
pub use crate::domain::ports::{ConfigProvider, ServiceTransport};
pub use crate::utils::error::Result;
