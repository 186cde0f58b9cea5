use crate::ctx::{OperationId, ServiceContext};
use crate::error::{LogscopeError, Result};
use crate::executor::{LogBackend, elapsed_ms};
use crate::fanout::validate;
use crate::locality::endpoint_host;
use crate::model::{
    AppStatsQuery, Application, CollectStatsRequest, CollectStatsResult, ErrorDetailsPagination,
    ErrorsRequest, HostDetails, LogDetails, SearchRequest, SearchResult, Stats, StatsRequest,
    TailLogRequest, UserStats,
};
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Entry point for every log operation, local or remote.
#[derive(Debug, Clone)]
pub struct Coordinator {
    ctx: ServiceContext,
}

impl Coordinator {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    //-------------------------------------------------------------------------
    // Search
    //-------------------------------------------------------------------------

    /// Grep every host concurrently and merge the per-file results in host order.
    pub async fn search(
        &self,
        req: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        validate::search(req)?;

        let op = OperationId::default();
        tracing::info!(op = %op, value = %req.value, hosts = req.hosts.len(), "search");

        let mut set = JoinSet::new();
        for (idx, host) in req.hosts.iter().enumerate() {
            let executor = self.ctx.executor_for(&host.endpoint);
            let sub = req.for_host(host);
            let label = host_label(&host.endpoint);
            let cancel = cancel.clone();
            let span = tracing::info_span!("search_unit", op = %op, host = %label);

            set.spawn(
                async move {
                    let start = Instant::now();
                    let outcome = executor.grep(&sub, &cancel).await;
                    let elapsed = elapsed_ms(start);

                    let results = match outcome {
                        Ok(mut results) => {
                            for r in &mut results {
                                r.time = elapsed;
                                r.host = label.clone();
                            }
                            results
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "search unit failed");
                            let unit_error = e.to_unit_error();
                            sub.hosts[0]
                                .paths
                                .iter()
                                .map(|p| SearchResult {
                                    time: elapsed,
                                    ..SearchResult::failed(p, &label, unit_error.clone())
                                })
                                .collect()
                        }
                    };
                    (idx, results)
                }
                .instrument(span),
            );
        }

        let merged = join_in_order(set).await;
        if cancel.is_cancelled() {
            return Err(LogscopeError::Cancelled);
        }
        Ok(merged.into_iter().flatten().collect())
    }

    /// Search every configured host of an application.
    pub async fn search_application(
        &self,
        app: &Application,
        value: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        let req = SearchRequest {
            value: value.to_string(),
            hosts: self.application_hosts(app)?,
            ..Default::default()
        };
        self.search(&req, cancel).await
    }

    //-------------------------------------------------------------------------
    // Listing
    //-------------------------------------------------------------------------

    /// Files next to the configured logs of every host, newest first.
    pub async fn list_logs(
        &self,
        hosts: &[HostDetails],
        cancel: &CancellationToken,
    ) -> Result<Vec<LogDetails>> {
        hosts.iter().try_for_each(validate::host)?;

        let op = OperationId::default();
        tracing::info!(op = %op, hosts = hosts.len(), "list logs");

        let mut set = JoinSet::new();
        for (idx, host) in hosts.iter().enumerate() {
            let executor = self.ctx.executor_for(&host.endpoint);
            let host = host.clone();
            let label = host_label(&host.endpoint);
            let cancel = cancel.clone();
            let span = tracing::info_span!("list_unit", op = %op, host = %label);

            set.spawn(
                async move {
                    let logs = match executor.list(&host, &cancel).await {
                        Ok(mut logs) => {
                            for l in &mut logs {
                                l.host = label.clone();
                            }
                            logs
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "list unit failed");
                            Vec::new()
                        }
                    };
                    (idx, logs)
                }
                .instrument(span),
            );
        }

        let merged = join_in_order(set).await;
        if cancel.is_cancelled() {
            return Err(LogscopeError::Cancelled);
        }

        let mut out: Vec<LogDetails> = merged.into_iter().flatten().collect();
        out.sort_by(|a, b| b.mod_time.cmp(&a.mod_time));
        Ok(out)
    }

    pub async fn list_application_logs(
        &self,
        app: &Application,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogDetails>> {
        let hosts = self.application_hosts(app)?;
        self.list_logs(&hosts, cancel).await
    }

    //-------------------------------------------------------------------------
    // Single-target operations
    //-------------------------------------------------------------------------

    pub async fn tail_log(
        &self,
        req: &TailLogRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchResult> {
        validate::tail(req)?;

        let start = Instant::now();
        let mut result = self
            .ctx
            .executor_for(&req.endpoint)
            .tail(req, cancel)
            .await?;
        result.time = elapsed_ms(start);
        result.host = host_label(&req.endpoint);
        Ok(result)
    }

    pub async fn download_log(
        &self,
        req: &TailLogRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        validate::tail(req)?;
        self.ctx
            .executor_for(&req.endpoint)
            .download(req, cancel)
            .await
    }

    pub async fn stats(&self, req: &StatsRequest, cancel: &CancellationToken) -> Result<UserStats> {
        validate::stats(req)?;
        self.ctx
            .executor_for(&req.endpoint)
            .stats(req, cancel)
            .await
    }

    /// Stats of one configured log, with the log structure taken from config.
    pub async fn application_stats(
        &self,
        app: &Application,
        cancel: &CancellationToken,
    ) -> Result<UserStats> {
        let req = self.application_stats_request(app)?;
        self.stats(&req, cancel).await
    }

    pub async fn errors(
        &self,
        req: &ErrorsRequest,
        cancel: &CancellationToken,
    ) -> Result<ErrorDetailsPagination> {
        validate::errors(req)?;
        self.ctx
            .executor_for(&req.stats.endpoint)
            .errors(req, cancel)
            .await
    }

    pub async fn collect_stats(
        &self,
        req: &CollectStatsRequest,
        cancel: &CancellationToken,
    ) -> Result<CollectStatsResult> {
        validate::collect(req)?;
        self.ctx
            .executor_for(&req.stats.endpoint)
            .collect_stats(req, cancel)
            .await
    }

    /// Previously persisted daily aggregates.
    pub async fn app_stats(&self, query: &AppStatsQuery) -> Result<Vec<Stats>> {
        if query.app.trim().is_empty() || query.env.trim().is_empty() {
            return Err(LogscopeError::validation("app and env are required"));
        }
        self.ctx.store().app_stats(query).await
    }

    //-------------------------------------------------------------------------
    // Config lookups
    //-------------------------------------------------------------------------

    /// Configured hosts of `app`, narrowed to its host and log when given.
    pub fn application_hosts(&self, app: &Application) -> Result<Vec<HostDetails>> {
        let config = self.ctx.config();
        let mut hosts = config.hosts(&app.application_id, &app.env)?;

        // A host matches on its endpoint's host or on the machine the application runs on.
        if let Some(wanted) = app.host.as_deref() {
            let wanted = wanted.to_lowercase();
            let configured = config
                .application(&app.application_id, &app.env)
                .map(|a| a.hosts.as_slice())
                .unwrap_or_default();
            let mut keep = configured.iter().map(|h| {
                endpoint_host(&h.endpoint).is_some_and(|host| host == wanted)
                    || h.app_host.as_deref().is_some_and(|host| host.to_lowercase() == wanted)
            });
            hosts.retain(|_| keep.next().unwrap_or(false));
        }
        if let Some(log) = app.log.as_deref() {
            for h in &mut hosts {
                h.paths.retain(|p| p == log);
            }
            hosts.retain(|h| !h.paths.is_empty());
        }

        if hosts.is_empty() {
            return Err(LogscopeError::Configuration {
                what: "matching hosts",
                app: app.application_id.clone(),
                env: app.env.clone(),
            });
        }
        Ok(hosts)
    }

    /// Resolve the endpoint and log structure of a single configured log.
    pub fn application_stats_request(&self, app: &Application) -> Result<StatsRequest> {
        let Some(log) = app.log.clone() else {
            return Err(LogscopeError::validation("application stats need a log path"));
        };
        let log_structure = self
            .ctx
            .config()
            .log_structure(&app.application_id, &app.env)?
            .clone();

        let hosts = self.application_hosts(app)?;
        let [host] = hosts.as_slice() else {
            return Err(LogscopeError::validation(format!(
                "log '{log}' is configured on {} hosts; name one",
                hosts.len()
            )));
        };

        Ok(StatsRequest {
            endpoint: host.endpoint.clone(),
            log,
            log_structure,
        })
    }
}

fn host_label(endpoint: &str) -> String {
    endpoint_host(endpoint).unwrap_or_else(|| endpoint.to_string())
}

/// Drain `set` completely and return the outputs ordered by unit index.
async fn join_in_order<T: 'static>(mut set: JoinSet<(usize, T)>) -> Vec<T> {
    let mut done = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(unit) => done.push(unit),
            Err(e) => tracing::error!(error = %e, "fan-out unit panicked"),
        }
    }
    done.sort_by_key(|(idx, _)| *idx);
    done.into_iter().map(|(_, out)| out).collect()
}
