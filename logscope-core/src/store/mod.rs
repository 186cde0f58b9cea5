//! Persistence contract for daily stats aggregates.
//!
//! The batch scheduler only needs three things from a store: which keys already
//! exist for a day, a way to save a new record, and a query for reporting.

mod json_dir;
mod memory;
#[cfg(test)]
mod tests;

pub use json_dir::JsonDirStatsStore;
pub use memory::MemoryStatsStore;

use crate::error::Result;
use crate::model::{AppStatsQuery, Stats, StatsKey};
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Keys already persisted for `date` (`%Y-%m-%d`).
    async fn stats_keys(&self, date: &str) -> Result<HashSet<StatsKey>>;

    /// Insert or replace the record under its [`StatsKey`].
    async fn save_stats(&self, stats: &Stats) -> Result<()>;

    /// Records of one app/env, ordered by date then log path.
    async fn app_stats(&self, query: &AppStatsQuery) -> Result<Vec<Stats>>;
}

/// Shared filter used by every backend for [`StatsStore::app_stats`].
pub(crate) fn query_matches(query: &AppStatsQuery, stats: &Stats) -> bool {
    if stats.app != query.app || stats.env != query.env {
        return false;
    }
    if query.log.as_deref().is_some_and(|log| log != stats.log_path) {
        return false;
    }
    if query.from.as_deref().is_some_and(|from| stats.date.as_str() < from) {
        return false;
    }
    if query.to.as_deref().is_some_and(|to| stats.date.as_str() > to) {
        return false;
    }
    true
}

pub(crate) fn sort_records(records: &mut [Stats]) {
    records.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.log_path.cmp(&b.log_path))
    });
}
