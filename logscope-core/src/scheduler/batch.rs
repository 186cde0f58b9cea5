use crate::ctx::OperationId;
use crate::error::{LogscopeError, Result};
use crate::fanout::Coordinator;
use crate::model::{CollectStatsRequest, Stats, StatsKey, StatsRequest};
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Canonical date used in [`StatsKey`]s and persisted records.
const KEY_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct BatchScheduler {
    coordinator: Coordinator,
}

impl BatchScheduler {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    /// Collect and persist stats for `date` across every configured log.
    ///
    /// Keys already present in the store are skipped, so a re-run only fills gaps.
    /// Returns the records persisted by this run.
    pub async fn populate_stats_batch(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<Stats>> {
        if date >= today {
            return Err(LogscopeError::validation(format!(
                "stats can only be collected for days before {today}, got {date}"
            )));
        }

        let ctx = self.coordinator.context();
        let key_date = render_date(date, KEY_DATE_FORMAT)?;
        let existing = ctx.store().stats_keys(&key_date).await?;

        let op = OperationId::default();
        tracing::info!(op = %op, date = %key_date, existing = existing.len(), "stats batch started");

        let accumulator = Arc::new(Mutex::new(Vec::new()));
        let mut scheduled = HashSet::new();
        let mut set = JoinSet::new();

        for app in ctx.config().stats_applications() {
            let Some(structure) = app.log_structure.as_ref() else {
                tracing::warn!(app = %app.application, env = %app.env, "no log structure, skipping");
                continue;
            };
            let log_date = match render_date(date, &structure.date_format) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(app = %app.application, env = %app.env, error = %e, "skipping");
                    continue;
                }
            };

            for host in &app.hosts {
                for path in &host.paths {
                    let key = StatsKey::new(&app.application, &app.env, &key_date, path);
                    if existing.contains(&key) {
                        tracing::debug!(key = %key, "already collected");
                        continue;
                    }
                    if !scheduled.insert(key.clone()) {
                        tracing::warn!(key = %key, endpoint = %host.endpoint, "log configured twice, collecting once");
                        continue;
                    }

                    let req = CollectStatsRequest {
                        stats: StatsRequest {
                            endpoint: host.endpoint.clone(),
                            log: path.clone(),
                            log_structure: structure.clone(),
                        },
                        date: log_date.clone(),
                    };
                    let coordinator = self.coordinator.clone();
                    let accumulator = Arc::clone(&accumulator);
                    let cancel = cancel.clone();
                    let span = tracing::info_span!("stats_unit", op = %op, key = %key);

                    set.spawn(
                        async move {
                            let stats = match coordinator.collect_stats(&req, &cancel).await {
                                Ok(result) => Stats {
                                    stats: result,
                                    log_path: key.log_path.clone(),
                                    date: key.date.clone(),
                                    app: key.app.clone(),
                                    env: key.env.clone(),
                                    created_on: Utc::now().to_rfc3339(),
                                },
                                Err(e) => {
                                    tracing::warn!(error = %e, "stats collection failed");
                                    return;
                                }
                            };

                            if let Err(e) = coordinator.context().store().save_stats(&stats).await {
                                tracing::error!(error = %e, "could not persist stats");
                                return;
                            }

                            accumulator.lock().await.push(stats);
                        }
                        .instrument(span),
                    );
                }
            }
        }

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "stats unit panicked");
            }
        }

        if cancel.is_cancelled() {
            return Err(LogscopeError::Cancelled);
        }

        let mut out = std::mem::take(&mut *accumulator.lock().await);
        out.sort_by(|a, b| {
            (&a.app, &a.env, &a.log_path).cmp(&(&b.app, &b.env, &b.log_path))
        });

        tracing::info!(op = %op, date = %key_date, persisted = out.len(), "stats batch finished");
        Ok(out)
    }
}

/// Render `date` with a strftime pattern, rejecting patterns chrono cannot format.
pub fn render_date(date: NaiveDate, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).map_err(|_| {
        LogscopeError::validation(format!("date format '{format}' cannot render a date"))
    })?;
    Ok(out)
}
