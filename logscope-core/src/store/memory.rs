use crate::error::Result;
use crate::model::{AppStatsQuery, Stats, StatsKey};
use crate::store::{StatsStore, query_matches, sort_records};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-local store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    records: DashMap<StatsKey, Stats>,
    saves: AtomicUsize,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save_stats` calls since creation.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn stats_keys(&self, date: &str) -> Result<HashSet<StatsKey>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.key().date == date)
            .map(|r| r.key().clone())
            .collect())
    }

    async fn save_stats(&self, stats: &Stats) -> Result<()> {
        self.records.insert(stats.key(), stats.clone());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn app_stats(&self, query: &AppStatsQuery) -> Result<Vec<Stats>> {
        let mut out: Vec<Stats> = self
            .records
            .iter()
            .filter(|r| query_matches(query, r.value()))
            .map(|r| r.value().clone())
            .collect();
        sort_records(&mut out);
        Ok(out)
    }
}
