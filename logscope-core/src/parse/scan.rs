use crate::error::{LogscopeError, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Stream a file line by line, invoking `f` for each line without its terminator.
///
/// Invalid UTF-8 is replaced rather than failing the scan. Cancellation is checked
/// before every line.
pub async fn scan_lines<F>(path: &Path, cancel: &CancellationToken, mut f: F) -> Result<()>
where
    F: FnMut(&str),
{
    if cancel.is_cancelled() {
        return Err(LogscopeError::Cancelled);
    }

    let file = File::open(path)
        .await
        .map_err(|e| LogscopeError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::with_capacity(512);

    loop {
        if cancel.is_cancelled() {
            return Err(LogscopeError::Cancelled);
        }

        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| LogscopeError::parse(path, e))?;
        if n == 0 {
            break;
        }

        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        f(&String::from_utf8_lossy(&buf));
    }

    Ok(())
}
