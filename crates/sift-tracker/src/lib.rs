pub mod config;
pub mod http;

pub use config::{SiftConfig, TrackerConfig};
pub use http::HttpDecisionReporter;
