use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Column layout of a pipe-delimited log line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogStructure {
    pub date: usize,
    pub level: usize,
    pub user: usize,
    pub reqid: usize,
    pub message: usize,
    /// strftime pattern the date column is written in, e.g. `%Y-%m-%d`.
    #[serde(rename = "dateFormat", alias = "date_format")]
    pub date_format: String,
}

impl LogStructure {
    /// Highest column index a line must reach to be counted.
    ///
    /// The message column is read opportunistically and does not take part.
    pub fn max_index(&self) -> usize {
        self.date.max(self.level).max(self.user).max(self.reqid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReqId {
    pub reqid: String,
    pub date: String,
}

/// Per-user statistics of a single log file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Stat {
    #[serde(rename = "lastTime")]
    pub last_time: String,
    pub counter: u64,
    pub levels: BTreeMap<String, u64>,
    pub errors: Vec<ReqId>,
    pub warnings: Vec<ReqId>,
}

/// Stats keyed by user.
pub type UserStats = HashMap<String, Stat>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorDetails {
    pub reqid: String,
    pub date: String,
    pub user: String,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub from: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorDetailsPagination {
    pub errors: Vec<ErrorDetails>,
    pub pagination: Pagination,
}

/// Per-user, per-level request counts for one day of one log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectStatsResult {
    pub users: BTreeMap<String, BTreeMap<String, u64>>,
}

/// A persisted daily aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Stats {
    pub stats: CollectStatsResult,
    #[serde(rename = "logPath")]
    pub log_path: String,
    pub date: String,
    pub app: String,
    pub env: String,
    #[serde(rename = "createdOn")]
    pub created_on: String,
}

impl Stats {
    pub fn key(&self) -> StatsKey {
        StatsKey::new(&self.app, &self.env, &self.date, &self.log_path)
    }
}

/// Identity of a persisted [`Stats`] record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatsKey {
    pub app: String,
    pub env: String,
    pub date: String,
    pub log_path: String,
}

impl StatsKey {
    pub fn new(app: &str, env: &str, date: &str, log_path: &str) -> Self {
        Self {
            app: app.to_string(),
            env: env.to_string(),
            date: date.to_string(),
            log_path: log_path.to_string(),
        }
    }
}

impl fmt::Display for StatsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}#{}#{}", self.app, self.env, self.date, self.log_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatsRequest {
    pub endpoint: String,
    pub log: String,
    #[serde(rename = "logStructure")]
    pub log_structure: LogStructure,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorsRequest {
    #[serde(flatten)]
    pub stats: StatsRequest,
    #[serde(default)]
    pub from: usize,
    #[serde(default)]
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectStatsRequest {
    #[serde(flatten)]
    pub stats: StatsRequest,
    /// Target day, already rendered in the structure's date format.
    pub date: String,
}

/// Query over persisted stats for one application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppStatsQuery {
    pub app: String,
    pub env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    /// Inclusive `%Y-%m-%d` bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}
