use logscope_core::conf::{AppConfig, HostConfig, LogscopeConfig, RemoteConfig};
use logscope_core::ctx::ServiceContext;
use logscope_core::fanout::Coordinator;
use logscope_core::locality::Locality;
use logscope_core::model::LogStructure;
use logscope_core::store::StatsStore;
use std::sync::Arc;

/// Hostname the process under test pretends to have.
pub const OWN_HOST: &str = "node-a";

/// A coordinator wired like production, with a fixed hostname.
pub struct TestContext {
    pub coordinator: Coordinator,
}

impl TestContext {
    pub fn new(
        remote: RemoteConfig,
        applications: Vec<AppConfig>,
        store: Arc<dyn StatsStore>,
    ) -> Self {
        let config = LogscopeConfig {
            remote,
            applications,
            ..Default::default()
        };
        let ctx = ServiceContext::new(config, Locality::with_hostname(Some(OWN_HOST)), store)
            .expect("failed to build service context");

        Self {
            coordinator: Coordinator::new(ctx),
        }
    }
}

/// A local endpoint that resolves to the hostname above.
pub fn endpoint_of(host: &str) -> String {
    format!("https://{host}:8090/logscope")
}

/// `date|level|user|reqid|message`, ISO dates.
pub fn structure() -> LogStructure {
    LogStructure {
        date: 0,
        level: 1,
        user: 2,
        reqid: 3,
        message: 4,
        date_format: "%Y-%m-%d".to_string(),
    }
}

pub fn stats_app(application: &str, hosts: Vec<(String, Vec<String>)>) -> AppConfig {
    AppConfig {
        application: application.to_string(),
        env: "prod".to_string(),
        collect_stats: true,
        hosts: hosts
            .into_iter()
            .map(|(endpoint, paths)| HostConfig {
                endpoint,
                paths,
                app_host: None,
            })
            .collect(),
        log_structure: Some(structure()),
    }
}
