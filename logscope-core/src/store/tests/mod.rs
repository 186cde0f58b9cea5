
use crate::model::{CollectStatsResult, Stats};
use std::collections::BTreeMap;

pub(super) fn record(app: &str, date: &str, log_path: &str) -> Stats {
    let mut levels = BTreeMap::new();
    levels.insert("ERROR".to_string(), 2);
    let mut users = BTreeMap::new();
    users.insert("alice".to_string(), levels);

    Stats {
        stats: CollectStatsResult { users },
        log_path: log_path.to_string(),
        date: date.to_string(),
        app: app.to_string(),
        env: "prod".to_string(),
        created_on: "2024-05-02T03:00:00Z".to_string(),
    }
}
