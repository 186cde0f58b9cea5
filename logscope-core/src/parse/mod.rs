//! Pipe-delimited log parsing.
//!
//! Lines are split on `|` and mapped to fields by a [`LogStructure`]. Lines that do
//! not reach every referenced column, or carry no user, are skipped silently. A
//! `(reqid, level, user)` tuple is counted once no matter how often the same event
//! was written.
//!
//! [`LogStructure`]: crate::model::LogStructure

mod errors;
mod line;
mod normalize;
mod scan;
mod stats;
#[cfg(test)]
mod tests;

pub use errors::{error_page, extract_errors, paginate};
pub use line::{DedupSet, LogLine};
pub use normalize::{LevelClass, normalize_level, normalize_levels, strip_ansi};
pub use scan::scan_lines;
pub use stats::{StatsAggregator, collect_stats, extract_stats};
