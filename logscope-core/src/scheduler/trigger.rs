use crate::error::Result;
use crate::scheduler::{BatchScheduler, StatsReporter, StatsSummary, render_date, summarize};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Runs the batch for the previous local day on a fixed interval.
pub struct StatsTrigger {
    scheduler: BatchScheduler,
    reporter: Arc<dyn StatsReporter>,
    every: Duration,
}

impl StatsTrigger {
    pub fn new(
        scheduler: BatchScheduler,
        reporter: Arc<dyn StatsReporter>,
        every: Duration,
    ) -> Self {
        Self {
            scheduler,
            reporter,
            every,
        }
    }

    /// One batch for the day before `today`, reported whether or not anything new
    /// was collected.
    pub async fn run_once(
        &self,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<StatsSummary>> {
        let Some(yesterday) = today.pred_opt() else {
            return Ok(Vec::new());
        };

        let records = self
            .scheduler
            .populate_stats_batch(yesterday, today, cancel)
            .await?;
        let summaries = summarize(&records);

        let date = render_date(yesterday, "%Y-%m-%d")?;
        self.reporter.report(&date, &summaries).await?;
        Ok(summaries)
    }

    /// Tick until `cancel` fires. The first tick runs immediately.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(every_secs = self.every.as_secs(), "stats trigger started");

        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("stats trigger stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let today = Local::now().date_naive();
                    if let Err(e) = self.run_once(today, &cancel).await {
                        tracing::error!(error = %e, "scheduled stats batch failed");
                    }
                }
            }
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
