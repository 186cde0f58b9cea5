use crate::error::LogscopeError;
use crate::model::{HostDetails, LogStructure};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TAIL_WINDOW_BYTES: u64 = 16 * 1024;
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_REMOTE_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SCHEDULER_INTERVAL_SECS: u64 = 4 * 60 * 60;

/// Represents the top-level `logscope.hcl` file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogscopeConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub tail: TailConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub applications: Vec<AppConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Overrides the OS hostname used to decide whether an endpoint is this process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_remote_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Sent as `Authorization: Bearer <token>` on every peer call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer: Option<String>,

    /// Peers commonly run with self-signed certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_REMOTE_CONNECT_TIMEOUT_MS,
            bearer: None,
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TailConfig {
    #[serde(default = "default_tail_window_bytes")]
    pub window_bytes: u64,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            window_bytes: DEFAULT_TAIL_WINDOW_BYTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_scheduler_interval_secs")]
    pub interval_secs: u64,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: DEFAULT_SCHEDULER_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory for persisted stats. In-memory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub application: String,
    pub env: String,

    #[serde(default)]
    pub collect_stats: bool,

    #[serde(default)]
    pub hosts: Vec<HostConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_structure: Option<LogStructure>,
}

impl AppConfig {
    pub fn matches(&self, app: &str, env: &str) -> bool {
        self.application == app && self.env == env
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    pub endpoint: String,

    #[serde(default)]
    pub paths: Vec<String>,

    /// The machine the application itself runs on, when it differs from the endpoint.
    /// An application narrowed to a host matches this as well as the endpoint host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_host: Option<String>,
}

impl From<&HostConfig> for HostDetails {
    fn from(h: &HostConfig) -> Self {
        HostDetails {
            endpoint: h.endpoint.clone(),
            paths: h.paths.clone(),
        }
    }
}

/// Lookups used by the coordinator.
impl LogscopeConfig {
    pub fn application(&self, app: &str, env: &str) -> Option<&AppConfig> {
        self.applications.iter().find(|a| a.matches(app, env))
    }

    pub fn log_structure(&self, app: &str, env: &str) -> Result<&LogStructure, LogscopeError> {
        self.application(app, env)
            .and_then(|a| a.log_structure.as_ref())
            .ok_or_else(|| LogscopeError::Configuration {
                what: "log structure",
                app: app.to_string(),
                env: env.to_string(),
            })
    }

    pub fn hosts(&self, app: &str, env: &str) -> Result<Vec<HostDetails>, LogscopeError> {
        match self.application(app, env) {
            Some(a) if !a.hosts.is_empty() => Ok(a.hosts.iter().map(HostDetails::from).collect()),
            _ => Err(LogscopeError::Configuration {
                what: "hosts",
                app: app.to_string(),
                env: env.to_string(),
            }),
        }
    }

    pub fn stats_applications(&self) -> impl Iterator<Item = &AppConfig> {
        self.applications.iter().filter(|a| a.collect_stats)
    }
}

fn default_tail_window_bytes() -> u64 {
    DEFAULT_TAIL_WINDOW_BYTES
}

fn default_remote_timeout_ms() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_MS
}

fn default_remote_connect_timeout_ms() -> u64 {
    DEFAULT_REMOTE_CONNECT_TIMEOUT_MS
}

fn default_scheduler_interval_secs() -> u64 {
    DEFAULT_SCHEDULER_INTERVAL_SECS
}
