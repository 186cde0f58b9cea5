use crate::error::{LogscopeError, Result};
use crate::parse::{normalize_levels, scan_lines};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Case-insensitive substring match over every line of `path`.
pub async fn grep_file(path: &Path, value: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
    let needle = value.to_lowercase();
    let mut out = Vec::new();

    scan_lines(path, cancel, |line| {
        if line.to_lowercase().contains(&needle) {
            out.push(normalize_levels(line).into_owned());
        }
    })
    .await?;

    tracing::debug!(path = %path.display(), matches = out.len(), "grep finished");
    Ok(out)
}

pub(crate) fn is_cancelled(err: &LogscopeError) -> bool {
    matches!(err, LogscopeError::Cancelled)
}
