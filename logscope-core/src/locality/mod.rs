//! Decides whether an endpoint names this process or a peer instance.
//!
//! The hostname is resolved once, when the [`Locality`] is built, and reused for
//! the lifetime of the process. If it cannot be resolved, only the literal
//! `localhost` is considered local and every other endpoint is treated as remote.


use url::Url;

const LOCALHOST: &str = "localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Local,
    Remote,
}

#[derive(Debug, Clone)]
pub struct Locality {
    /// Lower-cased hostname, `None` when resolution failed.
    hostname: Option<String>,
}

impl Locality {
    /// Resolve the OS hostname, preferring an explicit override.
    pub fn resolve(hostname_override: Option<&str>) -> Self {
        if let Some(h) = hostname_override {
            tracing::info!(hostname = h, "using configured hostname");
            return Self::with_hostname(Some(h));
        }

        match nix::unistd::gethostname() {
            Ok(name) => {
                let name = name.to_string_lossy().into_owned();
                tracing::info!(hostname = %name, "resolved hostname");
                Self::with_hostname(Some(&name))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "hostname resolution failed; only localhost endpoints will be treated as local"
                );
                Self::with_hostname(None)
            }
        }
    }

    pub fn with_hostname(hostname: Option<&str>) -> Self {
        let hostname = hostname
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty());
        Self { hostname }
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn classify(&self, endpoint: &str) -> Target {
        if self.is_local(endpoint) {
            Target::Local
        } else {
            Target::Remote
        }
    }

    pub fn is_local(&self, endpoint: &str) -> bool {
        let Some(host) = endpoint_host(endpoint) else {
            return false;
        };

        if host == LOCALHOST {
            return true;
        }

        self.hostname
            .as_deref()
            .is_some_and(|own| host.contains(own))
    }
}

/// Lower-cased host part of an endpoint given either as a URL or as `host[:port][/path]`.
pub fn endpoint_host(endpoint: &str) -> Option<String> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return None;
    }

    if endpoint.contains("://") {
        return Url::parse(endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .filter(|h| !h.is_empty());
    }

    let authority = endpoint.split('/').next().unwrap_or(endpoint);
    let host = authority.rsplit_once(':').map_or(authority, |(h, _)| h);
    (!host.is_empty()).then(|| host.to_lowercase())
}
