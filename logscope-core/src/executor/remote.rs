use crate::conf::RemoteConfig;
use crate::error::{LogscopeError, Result};
use crate::executor::{ApiOperation, LogBackend};
use crate::model::{
    CollectStatsRequest, CollectStatsResult, ErrorDetailsPagination, ErrorsRequest, HostDetails,
    LogDetails, SearchRequest, SearchResult, StatsRequest, TailLogRequest, UserStats,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Forwards operations to the peer instance named by the request's endpoint.
///
/// Peer failures are surfaced verbatim. Nothing is retried.
#[derive(Debug, Clone)]
pub struct RemoteDispatcher {
    client: Client,
    bearer: Option<String>,
}

impl RemoteDispatcher {
    pub fn new(cfg: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout())
            .connect_timeout(cfg.connect_timeout())
            .danger_accept_invalid_certs(cfg.accept_invalid_certs)
            .build()
            .map_err(|e| LogscopeError::transport("<client>", e))?;

        Ok(Self {
            client,
            bearer: cfg.bearer.clone(),
        })
    }

    /// POST `body` as JSON and return the raw response body.
    pub async fn post<B>(
        &self,
        endpoint: &str,
        op: ApiOperation,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = op.url(endpoint);
        tracing::info!(url = %url, "remote call");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let send = async {
            let resp = request
                .send()
                .await
                .map_err(|e| LogscopeError::transport(&url, e))?;

            let status = resp.status();
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| LogscopeError::transport(&url, e))?;

            if !status.is_success() {
                let body = String::from_utf8_lossy(&bytes).into_owned();
                tracing::error!(url = %url, status = status.as_u16(), body = %body, "remote call failed");
                return Err(LogscopeError::RemoteStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(bytes.to_vec())
        };

        cancellable(cancel, send).await
    }

    /// POST `body` and decode the JSON response.
    pub async fn call<B, R>(
        &self,
        endpoint: &str,
        op: ApiOperation,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let bytes = self.post(endpoint, op, body, cancel).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            LogscopeError::transport(op.url(endpoint), format!("could not decode response: {e}"))
        })
    }
}

async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LogscopeError::Cancelled),
        res = fut => res,
    }
}

#[async_trait]
impl LogBackend for RemoteDispatcher {
    async fn grep(
        &self,
        req: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        let endpoint = single_endpoint(req)?;
        self.call(endpoint, ApiOperation::Search, req, cancel).await
    }

    async fn tail(&self, req: &TailLogRequest, cancel: &CancellationToken) -> Result<SearchResult> {
        self.call(&req.endpoint, ApiOperation::TailLog, req, cancel)
            .await
    }

    async fn download(&self, req: &TailLogRequest, cancel: &CancellationToken) -> Result<Vec<u8>> {
        self.post(&req.endpoint, ApiOperation::DownloadLog, req, cancel)
            .await
    }

    async fn list(
        &self,
        host: &HostDetails,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogDetails>> {
        self.call(&host.endpoint, ApiOperation::ListLogs, host, cancel)
            .await
    }

    async fn stats(&self, req: &StatsRequest, cancel: &CancellationToken) -> Result<UserStats> {
        self.call(&req.endpoint, ApiOperation::Stats, req, cancel)
            .await
    }

    async fn errors(
        &self,
        req: &ErrorsRequest,
        cancel: &CancellationToken,
    ) -> Result<ErrorDetailsPagination> {
        self.call(&req.stats.endpoint, ApiOperation::Errors, req, cancel)
            .await
    }

    async fn collect_stats(
        &self,
        req: &CollectStatsRequest,
        cancel: &CancellationToken,
    ) -> Result<CollectStatsResult> {
        self.call(&req.stats.endpoint, ApiOperation::CollectStats, req, cancel)
            .await
    }
}

fn single_endpoint(req: &SearchRequest) -> Result<&str> {
    match req.hosts.as_slice() {
        [host] => Ok(&host.endpoint),
        _ => Err(LogscopeError::validation(
            "a forwarded search must name exactly one host",
        )),
    }
}
