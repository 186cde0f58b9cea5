use crate::model::ErrorDetails;
use crate::parse::tests::test_helpers::{line, structure, write_log};
use crate::parse::{error_page, extract_errors, paginate};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn details(n: usize) -> Vec<ErrorDetails> {
    (0..n)
        .map(|i| ErrorDetails {
            reqid: format!("r{i}"),
            date: format!("d{i}"),
            user: "alice".into(),
            level: "ERROR".into(),
            message: String::new(),
        })
        .collect()
}

#[test]
fn pagination_length_matches_formula() {
    for total in 0..12usize {
        for size in 0..5usize {
            for from in 0..6usize {
                let page = paginate(details(total), from, size);

                let expected = size.min(total.saturating_sub(from * size));
                assert_eq!(page.errors.len(), expected, "total={total} from={from} size={size}");
                assert_eq!(page.pagination.total, total);
                assert_eq!(page.pagination.from, from);
                assert_eq!(page.pagination.size, size);
            }
        }
    }
}

#[test]
fn page_past_the_end_is_empty_with_total() {
    let page = paginate(details(5), 3, 2);

    assert!(page.errors.is_empty());
    assert_eq!(page.pagination.total, 5);
}

#[test]
fn page_slices_in_order() {
    let page = paginate(details(5), 1, 2);

    let ids: Vec<_> = page.errors.iter().map(|e| e.reqid.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r3"]);
}

#[tokio::test]
async fn errors_are_filtered_deduped_and_newest_first() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = write_log(
        &dir,
        "app.log",
        &[
            line("d1", "ERROR", "alice", "r1", "first"),
            line("d1", "ERROR", "alice", "r1", "first"),
            line("d2", "INFO", "alice", "r2", "fine"),
            line("d3", "WARN", "bob", "r3", "careful"),
            line("d4", "\x1b[0;33mWARNING\x1b[0m", "bob", "r4", "careful again"),
            "short|line".to_string(),
        ],
    );

    // Act
    let errors = extract_errors(&path, &structure(), &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    let ids: Vec<_> = errors.iter().map(|e| e.reqid.as_str()).collect();
    assert_eq!(ids, vec!["r4", "r3", "r1"]);
    assert_eq!(errors[0].level, "WARNING");
    assert_eq!(errors[2].message, "first");
    assert_eq!(errors[2].user, "alice");
}

#[tokio::test]
async fn error_page_returns_requested_slice() {
    // Arrange
    let dir = tempdir().unwrap();
    let lines: Vec<String> = (0..7)
        .map(|i| line(&format!("d{i}"), "ERROR", "alice", &format!("r{i}"), "x"))
        .collect();
    let path = write_log(&dir, "app.log", &lines);

    // Act
    let page = error_page(&path, &structure(), 1, 3, &CancellationToken::new())
        .await
        .unwrap();

    // Assert
    let ids: Vec<_> = page.errors.iter().map(|e| e.reqid.as_str()).collect();
    assert_eq!(ids, vec!["r3", "r2", "r1"]);
    assert_eq!(page.pagination.total, 7);
}
