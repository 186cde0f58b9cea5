use integration_tests::harness::{Reply, StubPeer, TestContext, events, init_test_tracing, structure};
use logscope_core::conf::RemoteConfig;
use logscope_core::error::LogscopeError;
use logscope_core::model::{ErrorsRequest, StatsRequest, TailLogRequest};
use logscope_core::store::MemoryStatsStore;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn context(timeout_ms: u64) -> TestContext {
    TestContext::new(
        RemoteConfig {
            timeout_ms,
            connect_timeout_ms: 1_000,
            bearer: Some("peer-token".into()),
            accept_invalid_certs: false,
        },
        vec![],
        Arc::new(MemoryStatsStore::new()),
    )
}

#[tokio::test]
async fn tail_is_forwarded_unchanged_to_the_peer() {
    // Arrange
    let peer = StubPeer::fixed(Reply::json(json!({
        "logfile": "/var/log/app.log",
        "lines": ["a", "b"],
        "host": "whatever",
        "time": 3
    })))
    .await;
    let req = TailLogRequest {
        endpoint: peer.endpoint(),
        log: "/var/log/app.log".into(),
    };

    // Act
    let result = context(5_000)
        .coordinator
        .tail_log(&req, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(result.lines, vec!["a", "b"]);
    assert_eq!(result.host, "127.0.0.1");
    let seen = peer.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path, "/logscope/tail-log");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer peer-token"));
    assert_eq!(
        seen[0].body,
        json!({ "endpoint": peer.endpoint(), "log": "/var/log/app.log" })
    );
}

#[tokio::test]
async fn errors_request_keeps_its_flat_wire_shape() {
    // Arrange
    let peer = StubPeer::fixed(Reply::json(json!({
        "errors": [],
        "pagination": { "total": 0, "from": 1, "size": 5 }
    })))
    .await;
    let req = ErrorsRequest {
        stats: StatsRequest {
            endpoint: peer.endpoint(),
            log: "/var/log/app.log".into(),
            log_structure: structure(),
        },
        from: 1,
        size: 5,
    };

    // Act
    let page = context(5_000)
        .coordinator
        .errors(&req, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(page.pagination.size, 5);
    let body = &peer.requests()[0].body;
    assert_eq!(peer.requests()[0].path, "/logscope/errors");
    assert_eq!(body["from"], 1);
    assert_eq!(body["logStructure"]["dateFormat"], "%Y-%m-%d");
    assert_eq!(body["log"], "/var/log/app.log");
}

#[tokio::test]
async fn non_success_status_surfaces_with_the_peer_body() {
    // Arrange
    init_test_tracing();
    let peer = StubPeer::fixed(Reply::status(404, "no such log: /var/log/app.log")).await;
    let req = TailLogRequest {
        endpoint: peer.endpoint(),
        log: "/var/log/app.log".into(),
    };

    // Act
    let err = context(5_000)
        .coordinator
        .tail_log(&req, &CancellationToken::new())
        .await
        .unwrap_err();

    // Assert
    match err {
        LogscopeError::RemoteStatus { status, body, url } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such log: /var/log/app.log");
            assert!(url.ends_with("/logscope/tail-log"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let logged = events()
        .lock()
        .unwrap()
        .iter()
        .any(|e| e.level == tracing::Level::ERROR && e.message() == Some("remote call failed"));
    assert!(logged);
}

#[tokio::test]
async fn slow_peer_times_out_as_transport_error() {
    // Arrange
    let peer = StubPeer::fixed(
        Reply::json(json!({ "logfile": "x", "lines": [] })).delayed(Duration::from_secs(3)),
    )
    .await;
    let req = TailLogRequest {
        endpoint: peer.endpoint(),
        log: "/var/log/app.log".into(),
    };

    // Act
    let err = context(200)
        .coordinator
        .tail_log(&req, &CancellationToken::new())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, LogscopeError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn undecodable_reply_is_a_transport_error() {
    // Arrange
    let peer = StubPeer::fixed(Reply::status(200, "<html>proxy error</html>")).await;
    let req = StatsRequest {
        endpoint: peer.endpoint(),
        log: "/var/log/app.log".into(),
        log_structure: structure(),
    };

    // Act
    let err = context(5_000)
        .coordinator
        .stats(&req, &CancellationToken::new())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, LogscopeError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn cancellation_aborts_a_pending_remote_call() {
    // Arrange
    let peer = StubPeer::fixed(
        Reply::json(json!({ "logfile": "x", "lines": [] })).delayed(Duration::from_secs(10)),
    )
    .await;
    let req = TailLogRequest {
        endpoint: peer.endpoint(),
        log: "/var/log/app.log".into(),
    };
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    // Act
    let err = context(30_000)
        .coordinator
        .tail_log(&req, &cancel)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, LogscopeError::Cancelled));
}

#[tokio::test]
async fn download_returns_peer_bytes_verbatim() {
    // Arrange
    let peer = StubPeer::fixed(Reply::status(200, "raw|log|content\n")).await;
    let req = TailLogRequest {
        endpoint: peer.endpoint(),
        log: "/var/log/app.log".into(),
    };

    // Act
    let bytes = context(5_000)
        .coordinator
        .download_log(&req, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(bytes, b"raw|log|content\n");
    assert_eq!(peer.requests()[0].path, "/logscope/download-log");
}
