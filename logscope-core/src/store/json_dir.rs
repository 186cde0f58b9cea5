use crate::error::{LogscopeError, Result};
use crate::model::{AppStatsQuery, Stats, StatsKey};
use crate::store::{StatsStore, query_matches, sort_records};
use async_trait::async_trait;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One JSON document per [`StatsKey`], grouped in a directory per day:
///
/// ```text
/// <root>/2024-05-01/<encoded key>.json
/// ```
#[derive(Debug, Clone)]
pub struct JsonDirStatsStore {
    root: PathBuf,
}

impl JsonDirStatsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &StatsKey) -> PathBuf {
        self.root
            .join(encode_component(&key.date))
            .join(format!("{}.json", encode_component(&key.to_string())))
    }

    async fn read_day(&self, day_dir: &Path) -> Result<Vec<Stats>> {
        let mut entries = match tokio::fs::read_dir(day_dir).await {
            Ok(e) => e,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(store_err(day_dir, e)),
        };

        let mut out = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| store_err(day_dir, e))?
        {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let raw = tokio::fs::read(&path)
                .await
                .map_err(|e| store_err(&path, e))?;
            let stats: Stats = serde_json::from_slice(&raw)
                .map_err(|e| LogscopeError::Store(format!("{}: {e}", path.display())))?;
            out.push(stats);
        }
        Ok(out)
    }

    async fn day_dirs(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(e) => e,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(store_err(&self.root, e)),
        };

        let mut dirs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| store_err(&self.root, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| store_err(entry.path(), e))?
                .is_dir();
            if is_dir {
                dirs.push(entry.path());
            }
        }
        Ok(dirs)
    }
}

#[async_trait]
impl StatsStore for JsonDirStatsStore {
    async fn stats_keys(&self, date: &str) -> Result<HashSet<StatsKey>> {
        let day = self.root.join(encode_component(date));
        Ok(self
            .read_day(&day)
            .await?
            .iter()
            .map(Stats::key)
            .collect())
    }

    async fn save_stats(&self, stats: &Stats) -> Result<()> {
        let path = self.record_path(&stats.key());
        let Some(dir) = path.parent() else {
            return Err(LogscopeError::Store(format!(
                "no parent directory for {}",
                path.display()
            )));
        };
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| store_err(dir, e))?;

        let body = serde_json::to_vec_pretty(stats)
            .map_err(|e| LogscopeError::Store(e.to_string()))?;

        // Write then rename so readers never observe a half-written record.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| store_err(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| store_err(&path, e))?;

        tracing::debug!(key = %stats.key(), path = %path.display(), "stats persisted");
        Ok(())
    }

    async fn app_stats(&self, query: &AppStatsQuery) -> Result<Vec<Stats>> {
        let mut out = Vec::new();
        for day in self.day_dirs().await? {
            out.extend(
                self.read_day(&day)
                    .await?
                    .into_iter()
                    .filter(|s| query_matches(query, s)),
            );
        }
        sort_records(&mut out);
        Ok(out)
    }
}

fn store_err(path: impl AsRef<Path>, e: std::io::Error) -> LogscopeError {
    LogscopeError::Store(format!("{}: {e}", path.as_ref().display()))
}

/// Percent-style encoding of everything outside `[A-Za-z0-9._-]`, so distinct keys
/// always map to distinct file names.
pub(crate) fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
