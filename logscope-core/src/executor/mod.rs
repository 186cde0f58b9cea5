//! One capability contract, two ways of fulfilling it.
//!
//! [`LocalExecutor`] reads the filesystem of this machine, [`RemoteDispatcher`]
//! forwards the identical request to the peer that owns the files. The coordinator
//! picks one per call through the locality resolver and only ever talks to the
//! [`Executor`] enum.

mod api;
mod local;
mod remote;

pub use api::ApiOperation;
pub use local::{LocalExecutor, list_logs, parent_dirs, tail_file};
pub use remote::RemoteDispatcher;

use crate::error::Result;
use crate::model::{
    CollectStatsRequest, CollectStatsResult, ErrorDetailsPagination, ErrorsRequest, HostDetails,
    LogDetails, SearchRequest, SearchResult, StatsRequest, TailLogRequest, UserStats,
};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait LogBackend: Send + Sync {
    /// `req` names exactly one host; one result per requested path.
    async fn grep(&self, req: &SearchRequest, cancel: &CancellationToken)
    -> Result<Vec<SearchResult>>;

    async fn tail(&self, req: &TailLogRequest, cancel: &CancellationToken) -> Result<SearchResult>;

    async fn download(&self, req: &TailLogRequest, cancel: &CancellationToken) -> Result<Vec<u8>>;

    async fn list(&self, host: &HostDetails, cancel: &CancellationToken)
    -> Result<Vec<LogDetails>>;

    async fn stats(&self, req: &StatsRequest, cancel: &CancellationToken) -> Result<UserStats>;

    async fn errors(
        &self,
        req: &ErrorsRequest,
        cancel: &CancellationToken,
    ) -> Result<ErrorDetailsPagination>;

    async fn collect_stats(
        &self,
        req: &CollectStatsRequest,
        cancel: &CancellationToken,
    ) -> Result<CollectStatsResult>;
}

#[derive(Debug, Clone)]
pub enum Executor {
    Local(LocalExecutor),
    Remote(RemoteDispatcher),
}

impl Executor {
    pub fn is_local(&self) -> bool {
        matches!(self, Executor::Local(_))
    }

    fn backend(&self) -> &dyn LogBackend {
        match self {
            Executor::Local(l) => l,
            Executor::Remote(r) => r,
        }
    }
}

#[async_trait]
impl LogBackend for Executor {
    async fn grep(
        &self,
        req: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        self.backend().grep(req, cancel).await
    }

    async fn tail(&self, req: &TailLogRequest, cancel: &CancellationToken) -> Result<SearchResult> {
        self.backend().tail(req, cancel).await
    }

    async fn download(&self, req: &TailLogRequest, cancel: &CancellationToken) -> Result<Vec<u8>> {
        self.backend().download(req, cancel).await
    }

    async fn list(
        &self,
        host: &HostDetails,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogDetails>> {
        self.backend().list(host, cancel).await
    }

    async fn stats(&self, req: &StatsRequest, cancel: &CancellationToken) -> Result<UserStats> {
        self.backend().stats(req, cancel).await
    }

    async fn errors(
        &self,
        req: &ErrorsRequest,
        cancel: &CancellationToken,
    ) -> Result<ErrorDetailsPagination> {
        self.backend().errors(req, cancel).await
    }

    async fn collect_stats(
        &self,
        req: &CollectStatsRequest,
        cancel: &CancellationToken,
    ) -> Result<CollectStatsResult> {
        self.backend().collect_stats(req, cancel).await
    }
}

/// Milliseconds since `start`, saturating at `u64::MAX`.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    duration_ms(start.elapsed())
}

pub(crate) fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
