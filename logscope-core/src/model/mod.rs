mod search;
mod stats;

pub use search::*;
pub use stats::*;

use serde::{Deserialize, Serialize};

/// A logical target: one application in one environment, optionally narrowed
/// to a single log on a single host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Application {
    #[serde(rename = "application")]
    pub application_id: String,
    pub env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Application {
    pub fn new(application_id: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            env: env.into(),
            ..Default::default()
        }
    }
}
