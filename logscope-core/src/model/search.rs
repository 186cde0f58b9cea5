use serde::{Deserialize, Serialize};

/// A peer endpoint together with the log files it should operate on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostDetails {
    pub endpoint: String,
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchRequest {
    pub value: String,

    /// Inclusive lower bound, unix millis. Carried to peers untouched.
    #[serde(rename = "fromTime", default, skip_serializing_if = "Option::is_none")]
    pub from_time: Option<i64>,

    /// Inclusive upper bound, unix millis. Carried to peers untouched.
    #[serde(rename = "toTime", default, skip_serializing_if = "Option::is_none")]
    pub to_time: Option<i64>,

    #[serde(default)]
    pub hosts: Vec<HostDetails>,
}

impl SearchRequest {
    /// The same search narrowed to a single host, as forwarded to a peer.
    pub fn for_host(&self, host: &HostDetails) -> SearchRequest {
        SearchRequest {
            value: self.value.clone(),
            from_time: self.from_time,
            to_time: self.to_time,
            hosts: vec![host.clone()],
        }
    }
}

/// Per-unit failure attached to a result instead of failing the whole request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UnitError {
    pub message: String,
    pub code: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchResult {
    #[serde(rename = "logfile")]
    pub log_file: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<UnitError>,
    /// Elapsed milliseconds of the unit that produced this result.
    #[serde(default)]
    pub time: u64,
}

impl SearchResult {
    pub fn new(log_file: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            log_file: log_file.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn failed(log_file: impl Into<String>, host: impl Into<String>, error: UnitError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(log_file, host)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogDetails {
    pub name: String,
    pub size: u64,
    /// Unix seconds.
    #[serde(rename = "modtime")]
    pub mod_time: i64,
    #[serde(default)]
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TailLogRequest {
    pub endpoint: String,
    pub log: String,
}
