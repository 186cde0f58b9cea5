pub mod conf;
pub mod ctx;
pub mod error;
pub mod executor;
pub mod fanout;
pub mod locality;
pub mod logging;
pub mod model;
pub mod parse;
pub mod scheduler;
pub mod store;

pub use error::{LogscopeError, Result};
