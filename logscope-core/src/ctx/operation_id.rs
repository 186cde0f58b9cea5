use std::fmt;
use uuid::Uuid;

/// Correlates every unit spawned for one coordinator call in the logs.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct OperationId(pub String);

impl Default for OperationId {
    fn default() -> Self {
        OperationId(Uuid::new_v4().to_string())
    }
}

impl From<String> for OperationId {
    fn from(s: String) -> Self {
        OperationId(s)
    }
}

impl From<&str> for OperationId {
    fn from(s: &str) -> Self {
        OperationId(s.to_owned())
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
