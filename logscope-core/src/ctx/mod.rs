mod operation_id;

pub use operation_id::OperationId;

use crate::conf::LogscopeConfig;
use crate::error::Result;
use crate::executor::{Executor, LocalExecutor, RemoteDispatcher};
use crate::locality::{Locality, Target};
use crate::store::{JsonDirStatsStore, MemoryStatsStore, StatsStore};
use std::sync::Arc;

/// Everything a coordinator call needs, built once at startup and shared.
///
/// Cloning is cheap; all heavy members are reference counted or hold a pooled
/// HTTP client.
#[derive(Clone)]
pub struct ServiceContext {
    config: Arc<LogscopeConfig>,
    locality: Locality,
    local: LocalExecutor,
    remote: RemoteDispatcher,
    store: Arc<dyn StatsStore>,
}

impl ServiceContext {
    /// Resolve the hostname and open the configured store.
    pub fn from_config(config: LogscopeConfig) -> Result<Self> {
        let locality = Locality::resolve(config.server.hostname.as_deref());

        let store: Arc<dyn StatsStore> = match &config.store.dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "using json directory stats store");
                Arc::new(JsonDirStatsStore::new(dir))
            }
            None => {
                tracing::info!("using in-memory stats store");
                Arc::new(MemoryStatsStore::new())
            }
        };

        Self::new(config, locality, store)
    }

    pub fn new(
        config: LogscopeConfig,
        locality: Locality,
        store: Arc<dyn StatsStore>,
    ) -> Result<Self> {
        let local = LocalExecutor::new(config.tail.window_bytes);
        let remote = RemoteDispatcher::new(&config.remote)?;

        Ok(Self {
            config: Arc::new(config),
            locality,
            local,
            remote,
            store,
        })
    }

    pub fn config(&self) -> &LogscopeConfig {
        &self.config
    }

    pub fn locality(&self) -> &Locality {
        &self.locality
    }

    pub fn store(&self) -> &Arc<dyn StatsStore> {
        &self.store
    }

    /// Route an endpoint to this machine's filesystem or to its peer.
    pub fn executor_for(&self, endpoint: &str) -> Executor {
        match self.locality.classify(endpoint) {
            Target::Local => Executor::Local(self.local.clone()),
            Target::Remote => Executor::Remote(self.remote.clone()),
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("hostname", &self.locality.hostname())
            .field("applications", &self.config.applications.len())
            .finish_non_exhaustive()
    }
}
