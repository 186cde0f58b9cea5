mod context;
pub mod peer;
pub mod tracing;

pub use context::{OWN_HOST, TestContext, endpoint_of, stats_app, structure};
pub use peer::{RecordedRequest, Reply, StubPeer};
pub use tracing::{CapturedEvent, events, init_test_tracing};
