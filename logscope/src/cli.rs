use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logscope",
    version,
    about = "Logscope: distributed log search and daily request stats"
)]
pub struct Cli {
    /// Path to the Logscope config file
    #[arg(long, global = true, default_value = "config/logscope.hcl")]
    pub config: PathBuf,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// One configured application, optionally narrowed to a host and a log.
#[derive(Args, Debug, Clone)]
pub struct AppArgs {
    #[arg(long)]
    pub app: String,

    #[arg(long)]
    pub env: String,

    /// Only the configured endpoint whose host matches
    #[arg(long)]
    pub host: Option<String>,

    /// Only this log path
    #[arg(long)]
    pub log: Option<String>,
}

/// A single file on a single endpoint.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[arg(long)]
    pub endpoint: String,

    #[arg(long)]
    pub log: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the config file and exit
    Check,

    /// Case-insensitive search across every host of an application
    Search {
        #[command(flatten)]
        target: AppArgs,

        value: String,
    },

    /// Files next to the configured logs, newest first
    List {
        #[command(flatten)]
        target: AppArgs,
    },

    /// Last lines of one log
    Tail {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Copy a whole log to a local file
    Download {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long)]
        out: PathBuf,
    },

    /// Per-user request stats of one configured log
    Stats {
        #[command(flatten)]
        target: AppArgs,
    },

    /// Paginated errors and warnings of one configured log
    Errors {
        #[command(flatten)]
        target: AppArgs,

        /// Page number, starting at 0
        #[arg(long, default_value_t = 0)]
        from: usize,

        #[arg(long, default_value_t = 20)]
        size: usize,
    },

    /// Collect and persist stats for one past day (defaults to yesterday)
    Batch {
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },

    /// Persisted daily stats of an application
    AppStats {
        #[arg(long)]
        app: String,

        #[arg(long)]
        env: String,

        #[arg(long)]
        log: Option<String>,

        /// Inclusive, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// Inclusive, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
    },

    /// Run the periodic stats batch until Ctrl-C
    Schedule,
}
