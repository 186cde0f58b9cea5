use crate::error::Result;
use crate::model::Stats;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Condensed view of one persisted [`Stats`] record for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub app: String,
    pub env: String,
    pub date: String,
    /// File name only; the full path is in the stored record.
    pub log_name: String,
    /// Sum of every level whose name mentions ERROR or WARN.
    pub total_errors: u64,
    /// Busiest users first.
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub user: String,
    pub requests: u64,
    pub levels: BTreeMap<String, u64>,
}

pub fn summarize(records: &[Stats]) -> Vec<StatsSummary> {
    let mut out: Vec<StatsSummary> = records.iter().map(summarize_one).collect();
    out.sort_by(|a, b| {
        (&a.app, &a.env, &a.log_name).cmp(&(&b.app, &b.env, &b.log_name))
    });
    out
}

fn summarize_one(stats: &Stats) -> StatsSummary {
    let mut total_errors = 0;
    let mut users: Vec<UserSummary> = stats
        .stats
        .users
        .iter()
        .map(|(user, levels)| {
            total_errors += levels
                .iter()
                .filter(|(level, _)| level.contains("ERROR") || level.contains("WARN"))
                .map(|(_, n)| n)
                .sum::<u64>();
            UserSummary {
                user: user.clone(),
                requests: levels.values().sum(),
                levels: levels.clone(),
            }
        })
        .collect();
    users.sort_by(|a, b| b.requests.cmp(&a.requests).then_with(|| a.user.cmp(&b.user)));

    let log_name = Path::new(&stats.log_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| stats.log_path.clone());

    StatsSummary {
        app: stats.app.clone(),
        env: stats.env.clone(),
        date: stats.date.clone(),
        log_name,
        total_errors,
        users,
    }
}

/// Destination for the summary of a finished batch.
#[async_trait]
pub trait StatsReporter: Send + Sync {
    async fn report(&self, date: &str, summaries: &[StatsSummary]) -> Result<()>;
}

/// Writes each summary as a structured log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingReporter;

#[async_trait]
impl StatsReporter for LoggingReporter {
    async fn report(&self, date: &str, summaries: &[StatsSummary]) -> Result<()> {
        if summaries.is_empty() {
            tracing::info!(date, "no new stats collected");
            return Ok(());
        }

        for s in summaries {
            let top_user = s.users.first().map(|u| u.user.as_str()).unwrap_or("-");
            tracing::info!(
                date,
                app = %s.app,
                env = %s.env,
                log = %s.log_name,
                total_errors = s.total_errors,
                users = s.users.len(),
                top_user,
                "daily stats"
            );
        }
        Ok(())
    }
}
