//! Concurrent dispatch of one operation across many hosts.
//!
//! Every host (or host and path) becomes one unit in a [`tokio::task::JoinSet`]. The
//! [`Coordinator`] waits for all of them, so a slow or failing peer never hides the
//! results of its siblings. A failing unit reports through its own result.

mod coordinator;
mod validate;
#[cfg(test)]
mod tests;

pub use coordinator::Coordinator;
