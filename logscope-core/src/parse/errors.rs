use crate::error::Result;
use crate::model::{ErrorDetails, ErrorDetailsPagination, LogStructure, Pagination};
use crate::parse::line::{DedupSet, LogLine};
use crate::parse::normalize::LevelClass;
use crate::parse::scan::scan_lines;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Every ERROR/WARNING/WARN event of a file, newest first.
pub async fn extract_errors(
    path: &Path,
    structure: &LogStructure,
    cancel: &CancellationToken,
) -> Result<Vec<ErrorDetails>> {
    let mut dedup = DedupSet::new();
    let mut out = Vec::new();

    scan_lines(path, cancel, |raw| {
        let Some(line) = LogLine::parse(raw, structure) else {
            return;
        };
        if !LevelClass::of(&line.level).is_problem() || !dedup.first_occurrence(&line) {
            return;
        }
        out.push(ErrorDetails {
            reqid: line.reqid.to_string(),
            date: line.date.to_string(),
            user: line.user.to_string(),
            level: line.level,
            message: line.message.to_string(),
        });
    })
    .await?;

    out.reverse();
    Ok(out)
}

/// Page `from` (zero based) of `size` entries. Out-of-range pages are empty, not errors.
pub fn paginate(mut errors: Vec<ErrorDetails>, from: usize, size: usize) -> ErrorDetailsPagination {
    let total = errors.len();
    let start = from.saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);

    let page = if start < end {
        errors.truncate(end);
        errors.split_off(start)
    } else {
        Vec::new()
    };

    ErrorDetailsPagination {
        errors: page,
        pagination: Pagination { total, from, size },
    }
}

pub async fn error_page(
    path: &Path,
    structure: &LogStructure,
    from: usize,
    size: usize,
    cancel: &CancellationToken,
) -> Result<ErrorDetailsPagination> {
    let errors = extract_errors(path, structure, cancel).await?;
    Ok(paginate(errors, from, size))
}
