mod grep;
mod list;
mod tail;

pub use list::{list_logs, parent_dirs};
pub use tail::tail_file;

use crate::conf::DEFAULT_TAIL_WINDOW_BYTES;
use crate::error::{LogscopeError, Result};
use crate::executor::{LogBackend, elapsed_ms};
use crate::locality::endpoint_host;
use crate::model::{
    CollectStatsRequest, CollectStatsResult, ErrorDetailsPagination, ErrorsRequest, HostDetails,
    LogDetails, SearchRequest, SearchResult, StatsRequest, TailLogRequest, UserStats,
};
use crate::parse::{collect_stats, error_page, extract_stats};
use async_trait::async_trait;
use grep::{grep_file, is_cancelled};
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Serves every operation from this machine's filesystem.
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    tail_window: u64,
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_TAIL_WINDOW_BYTES)
    }
}

impl LocalExecutor {
    pub fn new(tail_window: u64) -> Self {
        Self { tail_window }
    }

    pub fn tail_window(&self) -> u64 {
        self.tail_window
    }
}

fn host_label(endpoint: &str) -> String {
    endpoint_host(endpoint).unwrap_or_default()
}

#[async_trait]
impl LogBackend for LocalExecutor {
    async fn grep(
        &self,
        req: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        let mut out = Vec::new();

        for host in &req.hosts {
            let label = host_label(&host.endpoint);
            tracing::info!(host = %label, files = host.paths.len(), "local grep");

            for path in &host.paths {
                let mut result = SearchResult::new(path, &label);
                match grep_file(Path::new(path), &req.value, cancel).await {
                    Ok(lines) => result.lines = lines,
                    Err(e) if is_cancelled(&e) => return Err(e),
                    Err(e) => {
                        tracing::warn!(path = %path, error = %e, "grep failed for file");
                        result.error = Some(e.to_unit_error());
                    }
                }
                out.push(result);
            }
        }

        Ok(out)
    }

    async fn tail(&self, req: &TailLogRequest, cancel: &CancellationToken) -> Result<SearchResult> {
        tracing::info!(log = %req.log, "local tail");
        let start = Instant::now();

        let lines = tail_file(Path::new(&req.log), self.tail_window, cancel).await?;

        Ok(SearchResult {
            log_file: req.log.clone(),
            lines,
            host: host_label(&req.endpoint),
            error: None,
            time: elapsed_ms(start),
        })
    }

    async fn download(&self, req: &TailLogRequest, cancel: &CancellationToken) -> Result<Vec<u8>> {
        if cancel.is_cancelled() {
            return Err(LogscopeError::Cancelled);
        }
        tracing::info!(log = %req.log, "local download");
        tokio::fs::read(&req.log)
            .await
            .map_err(|e| LogscopeError::io(&req.log, e))
    }

    async fn list(
        &self,
        host: &HostDetails,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogDetails>> {
        tracing::info!(endpoint = %host.endpoint, "local list");
        list_logs(&host.paths, &host_label(&host.endpoint), cancel).await
    }

    async fn stats(&self, req: &StatsRequest, cancel: &CancellationToken) -> Result<UserStats> {
        tracing::info!(log = %req.log, "local stats");
        extract_stats(Path::new(&req.log), &req.log_structure, cancel).await
    }

    async fn errors(
        &self,
        req: &ErrorsRequest,
        cancel: &CancellationToken,
    ) -> Result<ErrorDetailsPagination> {
        tracing::info!(log = %req.stats.log, from = req.from, size = req.size, "local errors");
        error_page(
            Path::new(&req.stats.log),
            &req.stats.log_structure,
            req.from,
            req.size,
            cancel,
        )
        .await
    }

    async fn collect_stats(
        &self,
        req: &CollectStatsRequest,
        cancel: &CancellationToken,
    ) -> Result<CollectStatsResult> {
        tracing::info!(log = %req.stats.log, date = %req.date, "local collect stats");
        collect_stats(
            Path::new(&req.stats.log),
            &req.stats.log_structure,
            &req.date,
            cancel,
        )
        .await
    }
}
