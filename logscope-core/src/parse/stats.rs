use crate::error::Result;
use crate::model::{CollectStatsResult, LogStructure, ReqId, Stat, UserStats};
use crate::parse::line::{DedupSet, LogLine};
use crate::parse::normalize::LevelClass;
use crate::parse::scan::scan_lines;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Per-user counters built from a stream of lines.
///
/// Error and warning histories accumulate in file order; [`StatsAggregator::finish`]
/// flips them so the newest entry comes first.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    users: UserStats,
    dedup: DedupSet,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &LogLine<'_>) {
        if !self.dedup.first_occurrence(line) {
            return;
        }

        let stat = self.users.entry(line.user.to_string()).or_default();
        stat.last_time = line.date.to_string();
        stat.counter += 1;
        *stat.levels.entry(line.level.clone()).or_insert(0) += 1;

        let entry = || ReqId {
            reqid: line.reqid.to_string(),
            date: line.date.to_string(),
        };
        match LevelClass::of(&line.level) {
            LevelClass::Error => stat.errors.push(entry()),
            LevelClass::Warning => stat.warnings.push(entry()),
            LevelClass::Other => {}
        }
    }

    pub fn finish(mut self) -> UserStats {
        for stat in self.users.values_mut() {
            stat.errors.reverse();
            stat.warnings.reverse();
        }
        self.users
    }
}

/// Per-user statistics of a whole log file.
pub async fn extract_stats(
    path: &Path,
    structure: &LogStructure,
    cancel: &CancellationToken,
) -> Result<UserStats> {
    let mut agg = StatsAggregator::new();

    scan_lines(path, cancel, |raw| {
        if let Some(line) = LogLine::parse(raw, structure) {
            agg.push(&line);
        }
    })
    .await?;

    Ok(agg.finish())
}

/// Per-user level counts restricted to lines whose date column starts with `date`.
pub async fn collect_stats(
    path: &Path,
    structure: &LogStructure,
    date: &str,
    cancel: &CancellationToken,
) -> Result<CollectStatsResult> {
    let mut agg = StatsAggregator::new();

    scan_lines(path, cancel, |raw| {
        if let Some(line) = LogLine::parse(raw, structure) {
            if line.date.starts_with(date) {
                agg.push(&line);
            }
        }
    })
    .await?;

    Ok(to_collect_result(agg.finish()))
}

fn to_collect_result(users: UserStats) -> CollectStatsResult {
    CollectStatsResult {
        users: users
            .into_iter()
            .map(|(user, stat): (String, Stat)| (user, stat.levels))
            .collect(),
    }
}
