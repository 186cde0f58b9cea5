
use crate::conf::{AppConfig, HostConfig, LogscopeConfig};
use crate::ctx::ServiceContext;
use crate::fanout::Coordinator;
use crate::locality::Locality;
use crate::model::LogStructure;
use crate::scheduler::BatchScheduler;
use crate::store::MemoryStatsStore;
use std::sync::Arc;

pub(super) const LOG: &str = "\
30/04/2024|INFO|alice|r0|previous day
01/05/2024|INFO|alice|r1|start
01/05/2024|ERROR|alice|r2|boom
01/05/2024|ERROR|alice|r2|boom
01/05/2024|WARN|bob|r3|slow
02/05/2024|INFO|carol|r4|next day
";

pub(super) fn structure() -> LogStructure {
    LogStructure {
        date: 0,
        level: 1,
        user: 2,
        reqid: 3,
        message: 4,
        date_format: "%d/%m/%Y".to_string(),
    }
}

pub(super) fn stats_app(name: &str, hosts: Vec<(&str, Vec<String>)>) -> AppConfig {
    AppConfig {
        application: name.to_string(),
        env: "prod".to_string(),
        collect_stats: true,
        hosts: hosts
            .into_iter()
            .map(|(endpoint, paths)| HostConfig {
                endpoint: endpoint.to_string(),
                paths,
                app_host: None,
            })
            .collect(),
        log_structure: Some(structure()),
    }
}

pub(super) fn scheduler(applications: Vec<AppConfig>) -> (BatchScheduler, Arc<MemoryStatsStore>) {
    let store = Arc::new(MemoryStatsStore::new());
    let mut config = LogscopeConfig {
        applications,
        ..Default::default()
    };
    config.remote.connect_timeout_ms = 500;
    let ctx = ServiceContext::new(
        config,
        Locality::with_hostname(Some("node-a")),
        store.clone(),
    )
    .unwrap();
    (BatchScheduler::new(Coordinator::new(ctx)), store)
}
