use crate::cli::{AppArgs, Cli, Command};
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use logscope_core::conf::load_config;
use logscope_core::ctx::ServiceContext;
use logscope_core::fanout::Coordinator;
use logscope_core::model::{AppStatsQuery, Application, ErrorsRequest, TailLogRequest};
use logscope_core::scheduler::{
    BatchScheduler, LoggingReporter, StatsReporter, StatsTrigger, summarize,
};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn run(cli: Cli, cancel: CancellationToken) -> Result<()> {
    let config = load_config(&cli.config)?;

    if matches!(cli.command, Command::Check) {
        println!("config ok: {} application(s)", config.applications.len());
        return Ok(());
    }

    let scheduler_cfg = config.scheduler.clone();
    let coordinator = Coordinator::new(ServiceContext::from_config(config)?);
    let pretty = cli.pretty;

    match cli.command {
        Command::Check => Ok(()),

        Command::Search { target, value } => {
            let results = coordinator
                .search_application(&application(&target), &value, &cancel)
                .await?;
            print_json(&results, pretty)
        }

        Command::List { target } => {
            let logs = coordinator
                .list_application_logs(&application(&target), &cancel)
                .await?;
            print_json(&logs, pretty)
        }

        Command::Tail { target } => {
            let req = TailLogRequest {
                endpoint: target.endpoint,
                log: target.log,
            };
            let result = coordinator.tail_log(&req, &cancel).await?;
            if let Some(err) = &result.error {
                bail!("tail failed ({}): {}", err.code, err.message);
            }
            for line in &result.lines {
                println!("{line}");
            }
            Ok(())
        }

        Command::Download { target, out } => {
            let req = TailLogRequest {
                endpoint: target.endpoint,
                log: target.log,
            };
            let bytes = coordinator.download_log(&req, &cancel).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("could not write {}", out.display()))?;
            tracing::info!(out = %out.display(), bytes = bytes.len(), "log downloaded");
            Ok(())
        }

        Command::Stats { target } => {
            let stats = coordinator
                .application_stats(&application(&target), &cancel)
                .await?;
            print_json(&stats, pretty)
        }

        Command::Errors { target, from, size } => {
            let stats = coordinator
                .application_stats_request(&application(&target))?;
            let page = coordinator
                .errors(&ErrorsRequest { stats, from, size }, &cancel)
                .await?;
            print_json(&page, pretty)
        }

        Command::Batch { date } => {
            let today = Local::now().date_naive();
            let date = match date {
                Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .with_context(|| format!("invalid date '{d}', expected YYYY-MM-DD"))?,
                None => today.pred_opt().context("no day before today")?,
            };

            let records = BatchScheduler::new(coordinator)
                .populate_stats_batch(date, today, &cancel)
                .await?;
            let summaries = summarize(&records);
            LoggingReporter
                .report(&date.format("%Y-%m-%d").to_string(), &summaries)
                .await?;
            print_json(&summaries, pretty)
        }

        Command::AppStats {
            app,
            env,
            log,
            from,
            to,
        } => {
            let query = AppStatsQuery {
                app,
                env,
                log,
                from,
                to,
            };
            let records = coordinator.app_stats(&query).await?;
            print_json(&records, pretty)
        }

        Command::Schedule => {
            if !scheduler_cfg.enabled {
                tracing::warn!("scheduler.enabled is false in config; running anyway");
            }
            let trigger = StatsTrigger::new(
                BatchScheduler::new(coordinator),
                Arc::new(LoggingReporter),
                scheduler_cfg.interval(),
            );
            trigger.spawn(cancel).await?;
            Ok(())
        }
    }
}

fn application(args: &AppArgs) -> Application {
    Application {
        host: args.host.clone(),
        log: args.log.clone(),
        ..Application::new(&args.app, &args.env)
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
