use crate::error::{LogscopeError, Result};
use crate::model::LogDetails;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Distinct parent directories of `paths`, in first-seen order.
pub fn parent_dirs(paths: &[String]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(|p| match Path::new(p).parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        })
        .filter(|dir| seen.insert(dir.clone()))
        .collect()
}

/// Every file below the parent directories of `paths`, walked concurrently.
///
/// A directory that cannot be walked is logged and contributes nothing.
pub async fn list_logs(
    paths: &[String],
    host: &str,
    cancel: &CancellationToken,
) -> Result<Vec<LogDetails>> {
    let mut set = JoinSet::new();
    for dir in parent_dirs(paths) {
        let cancel = cancel.clone();
        set.spawn(async move {
            let res = walk_dir(&dir, &cancel).await;
            (dir, res)
        });
    }

    let mut out = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, Ok(mut logs))) => out.append(&mut logs),
            Ok((_, Err(LogscopeError::Cancelled))) => return Err(LogscopeError::Cancelled),
            Ok((dir, Err(e))) => {
                tracing::warn!(dir = %dir.display(), error = %e, "could not list directory");
            }
            Err(e) => tracing::error!(error = %e, "directory walk task failed"),
        }
    }

    for log in &mut out {
        log.host = host.to_string();
    }
    Ok(out)
}

async fn walk_dir(root: &Path, cancel: &CancellationToken) -> Result<Vec<LogDetails>> {
    let meta = tokio::fs::metadata(root)
        .await
        .map_err(|e| LogscopeError::io(root, e))?;
    if !meta.is_dir() {
        return Err(LogscopeError::io(
            root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        if cancel.is_cancelled() {
            return Err(LogscopeError::Cancelled);
        }

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if dir == root => return Err(LogscopeError::io(&dir, e)),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };

            if file_type.is_dir() {
                pending.push(path);
                continue;
            }

            // Symlinks are never descended into; a link to a file is listed with the
            // target's size and modtime.
            let Ok(meta) = tokio::fs::metadata(&path).await else {
                continue;
            };
            if meta.is_dir() {
                tracing::debug!(path = %path.display(), "not following directory symlink");
                continue;
            }

            out.push(LogDetails {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
                mod_time: meta
                    .modified()
                    .map(|t| DateTime::<Utc>::from(t).timestamp())
                    .unwrap_or(0),
                host: String::new(),
            });
        }
    }

    Ok(out)
}
