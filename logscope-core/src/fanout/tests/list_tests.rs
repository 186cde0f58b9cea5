use super::{DEAD_PEER, app, coordinator};
use crate::error::LogscopeError;
use crate::model::{Application, HostDetails};
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn touch(path: &std::path::Path, secs_ago: u64) {
    fs::write(path, "x").unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
        .unwrap();
}

#[tokio::test]
async fn merged_listing_is_newest_first() {
    // Arrange
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    touch(&a.join("old.log"), 3_000);
    touch(&b.join("new.log"), 10);
    touch(&a.join("mid.log"), 500);
    let hosts = vec![
        HostDetails {
            endpoint: "localhost".into(),
            paths: vec![a.join("old.log").to_string_lossy().into_owned()],
        },
        HostDetails {
            endpoint: "node-a:8090".into(),
            paths: vec![b.join("new.log").to_string_lossy().into_owned()],
        },
    ];

    // Act
    let logs = coordinator(vec![])
        .list_logs(&hosts, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    let names: Vec<_> = logs.iter().map(|l| (l.name.as_str(), l.host.as_str())).collect();
    assert_eq!(
        names,
        vec![("new.log", "node-a"), ("mid.log", "localhost"), ("old.log", "localhost")]
    );
}

#[tokio::test]
async fn failing_host_contributes_nothing() {
    // Arrange
    let dir = tempdir().unwrap();
    touch(&dir.path().join("app.log"), 1);
    let hosts = vec![
        HostDetails {
            endpoint: DEAD_PEER.into(),
            paths: vec!["/remote/app.log".into()],
        },
        HostDetails {
            endpoint: "localhost".into(),
            paths: vec![dir.path().join("app.log").to_string_lossy().into_owned()],
        },
    ];

    // Act
    let logs = coordinator(vec![])
        .list_logs(&hosts, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].host, "localhost");
}

#[tokio::test]
async fn application_listing_can_be_narrowed_to_one_host() {
    // Arrange
    let dir = tempdir().unwrap();
    touch(&dir.path().join("app.log"), 1);
    let log = dir.path().join("app.log").to_string_lossy().into_owned();
    let coord = coordinator(vec![app(
        vec![("localhost", vec![log.clone()]), (DEAD_PEER, vec![log.clone()])],
        None,
    )]);
    let mut target = Application::new("billing", "prod");
    target.host = Some("LOCALHOST".into());

    // Act
    let hosts = coord.application_hosts(&target).unwrap();
    let logs = coord
        .list_application_logs(&target, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].endpoint, "localhost");
    assert_eq!(logs.len(), 1);
}

#[tokio::test]
async fn narrowing_to_an_unknown_host_is_a_configuration_error() {
    let coord = coordinator(vec![app(vec![("localhost", vec!["/a.log".into()])], None)]);
    let mut target = Application::new("billing", "prod");
    target.host = Some("node-z".into());

    let err = coord.application_hosts(&target).unwrap_err();

    assert!(matches!(err, LogscopeError::Configuration { .. }));
}

#[test]
fn application_host_narrows_by_configured_app_host() {
    // Arrange
    let mut config = app(
        vec![
            ("https://logs-1.corp:8090/logscope", vec!["/a.log".into()]),
            ("https://logs-2.corp:8090/logscope", vec!["/a.log".into()]),
        ],
        None,
    );
    config.hosts[1].app_host = Some("Billing-02".into());
    let coord = coordinator(vec![config]);
    let mut target = Application::new("billing", "prod");
    target.host = Some("billing-02".into());

    // Act
    let hosts = coord.application_hosts(&target).unwrap();

    // Assert
    assert_eq!(
        hosts,
        vec![HostDetails {
            endpoint: "https://logs-2.corp:8090/logscope".into(),
            paths: vec!["/a.log".into()],
        }]
    );
}
