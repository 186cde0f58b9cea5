use super::{DEAD_PEER, app, coordinator, structure};
use crate::error::LogscopeError;
use crate::model::{
    AppStatsQuery, Application, CollectStatsRequest, ErrorsRequest, StatsRequest, TailLogRequest,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

const LOG: &str = "\
2024-05-01 10:00|INFO|alice|r1|start
2024-05-01 10:01|ERROR|alice|r2|boom
2024-05-01 10:01|ERROR|alice|r2|boom
2024-05-02 09:00|WARN|bob|r3|slow
";

#[tokio::test]
async fn tail_is_labelled_with_the_endpoint_host() {
    // Arrange
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    fs::write(&log, LOG).unwrap();
    let req = TailLogRequest {
        endpoint: "https://NODE-A:8090/logscope".into(),
        log: log.to_string_lossy().into_owned(),
    };

    // Act
    let result = coordinator(vec![])
        .tail_log(&req, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(result.host, "node-a");
    assert_eq!(result.lines.len(), 4);
    assert_eq!(result.lines[3], "2024-05-02 09:00|WARN|bob|r3|slow");
}

#[tokio::test]
async fn tail_without_log_is_rejected() {
    let req = TailLogRequest {
        endpoint: "localhost".into(),
        log: "".into(),
    };

    let err = coordinator(vec![])
        .tail_log(&req, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LogscopeError::Validation(_)));
}

#[tokio::test]
async fn remote_download_failure_is_a_transport_error() {
    let req = TailLogRequest {
        endpoint: DEAD_PEER.into(),
        log: "/remote/app.log".into(),
    };

    let err = coordinator(vec![])
        .download_log(&req, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LogscopeError::Transport { .. }));
}

#[tokio::test]
async fn application_stats_take_structure_from_config() {
    // Arrange
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    fs::write(&log, LOG).unwrap();
    let log = log.to_string_lossy().into_owned();
    let coord = coordinator(vec![app(vec![("localhost", vec![log.clone()])], Some(structure()))]);
    let mut target = Application::new("billing", "prod");
    target.log = Some(log);

    // Act
    let stats = coord
        .application_stats(&target, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(stats["alice"].counter, 2);
    assert_eq!(stats["alice"].errors.len(), 1);
    assert_eq!(stats["bob"].warnings.len(), 1);
}

#[tokio::test]
async fn application_stats_without_structure_is_a_configuration_error() {
    let coord = coordinator(vec![app(vec![("localhost", vec!["/a.log".into()])], None)]);
    let mut target = Application::new("billing", "prod");
    target.log = Some("/a.log".into());

    let err = coord
        .application_stats(&target, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LogscopeError::Configuration { what: "log structure", .. }));
}

#[tokio::test]
async fn errors_and_collect_go_through_the_same_routing() {
    // Arrange
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    fs::write(&log, LOG).unwrap();
    let stats = StatsRequest {
        endpoint: "localhost".into(),
        log: log.to_string_lossy().into_owned(),
        log_structure: structure(),
    };
    let coord = coordinator(vec![]);

    // Act
    let page = coord
        .errors(
            &ErrorsRequest {
                stats: stats.clone(),
                from: 0,
                size: 10,
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    let day = coord
        .collect_stats(
            &CollectStatsRequest {
                stats,
                date: "2024-05-01".into(),
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.errors[0].reqid, "r3");
    assert_eq!(day.users.len(), 1);
    assert_eq!(day.users["alice"]["ERROR"], 1);
    assert_eq!(day.users["alice"]["INFO"], 1);
}

#[tokio::test]
async fn app_stats_requires_app_and_env() {
    let err = coordinator(vec![])
        .app_stats(&AppStatsQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LogscopeError::Validation(_)));
}
