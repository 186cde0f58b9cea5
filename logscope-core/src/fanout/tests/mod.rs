mod list_tests;
mod single_target_tests;

use crate::conf::{AppConfig, HostConfig, LogscopeConfig, RemoteConfig};
use crate::ctx::ServiceContext;
use crate::fanout::Coordinator;
use crate::locality::Locality;
use crate::model::LogStructure;
use crate::store::MemoryStatsStore;
use std::sync::Arc;

/// Nothing listens on the discard port, so calls fail fast with a transport error.
pub(super) const DEAD_PEER: &str = "http://127.0.0.1:9/logscope";

pub(super) fn structure() -> LogStructure {
    LogStructure {
        date: 0,
        level: 1,
        user: 2,
        reqid: 3,
        message: 4,
        date_format: "%Y-%m-%d".to_string(),
    }
}

pub(super) fn coordinator(applications: Vec<AppConfig>) -> Coordinator {
    let config = LogscopeConfig {
        remote: RemoteConfig {
            timeout_ms: 2_000,
            connect_timeout_ms: 500,
            ..Default::default()
        },
        applications,
        ..Default::default()
    };
    let ctx = ServiceContext::new(
        config,
        Locality::with_hostname(Some("node-a")),
        Arc::new(MemoryStatsStore::new()),
    )
    .unwrap();
    Coordinator::new(ctx)
}

pub(super) fn app(hosts: Vec<(&str, Vec<String>)>, log_structure: Option<LogStructure>) -> AppConfig {
    AppConfig {
        application: "billing".to_string(),
        env: "prod".to_string(),
        collect_stats: log_structure.is_some(),
        hosts: hosts
            .into_iter()
            .map(|(endpoint, paths)| HostConfig {
                endpoint: endpoint.to_string(),
                paths,
                app_host: None,
            })
            .collect(),
        log_structure,
    }
}
