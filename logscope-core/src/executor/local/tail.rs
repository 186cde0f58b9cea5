use crate::error::{LogscopeError, Result};
use crate::parse::normalize_levels;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;

/// Last lines of `path`, read from at most `window` trailing bytes.
///
/// When the window starts inside the file, everything up to and including the first
/// newline is dropped so the first returned line is always complete.
pub async fn tail_file(path: &Path, window: u64, cancel: &CancellationToken) -> Result<Vec<String>> {
    if cancel.is_cancelled() {
        return Err(LogscopeError::Cancelled);
    }

    let io = |e| LogscopeError::io(path, e);

    let mut file = File::open(path).await.map_err(io)?;
    let size = file.metadata().await.map_err(io)?.len();
    let offset = size.saturating_sub(window);

    file.seek(SeekFrom::Start(offset)).await.map_err(io)?;
    let mut buf = Vec::with_capacity((size - offset) as usize);
    file.take(size - offset)
        .read_to_end(&mut buf)
        .await
        .map_err(io)?;

    let start = if offset == 0 {
        0
    } else {
        buf.iter()
            .position(|b| *b == b'\n')
            .map_or(buf.len(), |i| i + 1)
    };

    let text = String::from_utf8_lossy(&buf[start..]);
    Ok(text
        .split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(|l| normalize_levels(l).into_owned())
        .collect())
}
