//! Daily stats collection.
//!
//! [`BatchScheduler`] collects one day for every application flagged with
//! `collect_stats`, skipping keys the store already holds. [`StatsTrigger`] runs it
//! for "yesterday" on a fixed interval and hands a [`StatsSummary`] of the fresh
//! records to a [`StatsReporter`].

mod batch;
mod report;
mod trigger;
#[cfg(test)]
mod tests;

pub use batch::{BatchScheduler, render_date};
pub use report::{LoggingReporter, StatsReporter, StatsSummary, UserSummary, summarize};
pub use trigger::StatsTrigger;
