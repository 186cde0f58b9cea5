use crate::conf::types::LogscopeConfig;
use std::collections::HashSet;

/// Collects every semantic problem instead of stopping at the first.
pub fn validate_config(config: &LogscopeConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.tail.window_bytes == 0 {
        errors.push("tail.window_bytes must be greater than zero".to_string());
    }
    if config.remote.timeout_ms == 0 {
        errors.push("remote.timeout_ms must be greater than zero".to_string());
    }
    if config.scheduler.interval_secs == 0 {
        errors.push("scheduler.interval_secs must be greater than zero".to_string());
    }

    let mut seen = HashSet::new();
    for (i, app) in config.applications.iter().enumerate() {
        let label = format!("applications[{i}]");

        if app.application.trim().is_empty() {
            errors.push(format!("{label}: application must not be empty"));
        }
        if app.env.trim().is_empty() {
            errors.push(format!("{label}: env must not be empty"));
        }
        if !seen.insert((app.application.as_str(), app.env.as_str())) {
            errors.push(format!(
                "{label}: duplicate application '{}' in env '{}'",
                app.application, app.env
            ));
        }

        for (j, host) in app.hosts.iter().enumerate() {
            if host.endpoint.trim().is_empty() {
                errors.push(format!("{label}.hosts[{j}]: endpoint must not be empty"));
            }
            if host.paths.is_empty() {
                errors.push(format!("{label}.hosts[{j}]: at least one path is required"));
            }
        }

        match &app.log_structure {
            Some(ls) => {
                if ls.date_format.trim().is_empty() {
                    errors.push(format!("{label}.log_structure: dateFormat must not be empty"));
                }
                let columns: HashSet<usize> = [ls.date, ls.level, ls.user, ls.reqid].into();
                if columns.len() < 4 {
                    errors.push(format!(
                        "{label}.log_structure: date, level, user and reqid must be distinct columns"
                    ));
                }
            }
            None if app.collect_stats => {
                errors.push(format!("{label}: collect_stats requires a log_structure"));
            }
            None => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
