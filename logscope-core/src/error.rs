use crate::model::UnitError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogscopeError {
    //-------------------------------------------------------------------------
    // Configuration
    //-------------------------------------------------------------------------
    #[error("no {what} configured for application '{app}' in env '{env}'")]
    Configuration {
        what: &'static str,
        app: String,
        env: String,
    },

    //-------------------------------------------------------------------------
    // Filesystem
    //-------------------------------------------------------------------------
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed while scanning {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    //-------------------------------------------------------------------------
    // Remote peers
    //-------------------------------------------------------------------------
    #[error("request to {url} failed with status {status}: {body}")]
    RemoteStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    //-------------------------------------------------------------------------
    // Request shape
    //-------------------------------------------------------------------------
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("stats store failure: {0}")]
    Store(String),
}

impl LogscopeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP-style status code reported alongside a unit failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Configuration { .. } => 400,
            Self::RemoteStatus { status, .. } => *status,
            Self::Transport { .. } => 502,
            Self::Cancelled => 499,
            Self::Io { .. } | Self::Parse { .. } | Self::Store(_) => 500,
        }
    }

    pub fn to_unit_error(&self) -> UnitError {
        UnitError {
            message: self.to_string(),
            code: self.status_code(),
        }
    }
}

pub type Result<T, E = LogscopeError> = std::result::Result<T, E>;
