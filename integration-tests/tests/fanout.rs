use integration_tests::harness::{OWN_HOST, Reply, StubPeer, TestContext, endpoint_of};
use logscope_core::conf::RemoteConfig;
use logscope_core::model::{HostDetails, SearchRequest};
use logscope_core::store::MemoryStatsStore;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn context() -> TestContext {
    TestContext::new(
        RemoteConfig {
            timeout_ms: 5_000,
            connect_timeout_ms: 1_000,
            ..Default::default()
        },
        vec![],
        Arc::new(MemoryStatsStore::new()),
    )
}

#[tokio::test]
async fn search_merges_local_remote_and_failing_hosts() {
    // Arrange
    let dir = tempdir().unwrap();
    let local_log = dir.path().join("app.log");
    fs::write(&local_log, "2024-05-01|INFO|alice|r1|order 99 created\n").unwrap();

    let healthy = StubPeer::start(|req| {
        let path = req.body["hosts"][0]["paths"][0].as_str().unwrap_or_default().to_string();
        Reply::json(json!([{ "logfile": path, "lines": ["remote order 99"], "host": "" }]))
    })
    .await;
    let broken = StubPeer::fixed(Reply::status(500, "disk on fire")).await;

    let req = SearchRequest {
        value: "order 99".into(),
        hosts: vec![
            HostDetails {
                endpoint: healthy.endpoint(),
                paths: vec!["/var/log/remote.log".into()],
            },
            HostDetails {
                endpoint: endpoint_of(OWN_HOST),
                paths: vec![local_log.to_string_lossy().into_owned()],
            },
            HostDetails {
                endpoint: broken.endpoint(),
                paths: vec!["/var/log/a.log".into(), "/var/log/b.log".into()],
            },
        ],
        ..Default::default()
    };

    // Act
    let results = context()
        .coordinator
        .search(&req, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(results.len(), 4);

    assert_eq!(results[0].log_file, "/var/log/remote.log");
    assert_eq!(results[0].lines, vec!["remote order 99"]);
    assert_eq!(results[0].host, "127.0.0.1");

    assert_eq!(results[1].host, OWN_HOST);
    assert_eq!(results[1].lines, vec!["2024-05-01|INFO|alice|r1|order 99 created"]);

    for failed in &results[2..] {
        let err = failed.error.as_ref().unwrap();
        assert_eq!(err.code, 500);
        assert!(err.message.contains("disk on fire"));
    }

    // Each peer sees only its own host.
    let forwarded = &healthy.requests()[0].body;
    assert_eq!(forwarded["value"], "order 99");
    assert_eq!(forwarded["hosts"].as_array().unwrap().len(), 1);
    assert_eq!(healthy.requests()[0].path, "/logscope/search");
}

#[tokio::test]
async fn listing_merges_peers_newest_first() {
    // Arrange
    let peer = StubPeer::fixed(Reply::json(json!([
        { "name": "remote-old.log", "size": 10, "modtime": 100 },
        { "name": "remote-new.log", "size": 20, "modtime": 300 }
    ])))
    .await;
    let broken = StubPeer::fixed(Reply::status(503, "busy")).await;
    let hosts = vec![
        HostDetails {
            endpoint: peer.endpoint(),
            paths: vec!["/var/log/app.log".into()],
        },
        HostDetails {
            endpoint: broken.endpoint(),
            paths: vec!["/var/log/app.log".into()],
        },
    ];

    // Act
    let logs = context()
        .coordinator
        .list_logs(&hosts, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    let names: Vec<_> = logs.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["remote-new.log", "remote-old.log"]);
    assert!(logs.iter().all(|l| l.host == "127.0.0.1"));
    assert_eq!(peer.requests()[0].path, "/logscope/list-logs");
}
