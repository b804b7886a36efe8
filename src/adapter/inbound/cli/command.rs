//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Order intake pipeline
#[derive(Parser, Debug)]
#[command(name = "ordergate")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (defaults apply when absent)
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start both broker consumers until Ctrl-C
    Run(RunArgs),

    /// Place one order from a JSON file
    Submit(SubmitArgs),

    /// Show order type and item statuses for an order
    Status(StatusArgs),

    /// Probe both brokers and the database
    Health,
}

/// Broker that `run --feed` publishes to.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FeedVia {
    /// Queue/topic broker placement queue
    #[default]
    Topic,
    /// Exchange broker main exchange
    Exchange,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Override the log level (e.g. debug)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Override the database path
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// File with one JSON order per line to enqueue at startup
    #[arg(long)]
    pub feed: Option<PathBuf>,

    /// Broker receiving the fed orders
    #[arg(long, value_enum, default_value_t = FeedVia::Topic)]
    pub via: FeedVia,

    /// Exit once every queued message is processed
    #[arg(long)]
    pub drain: bool,
}

#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// JSON order request file ("-" for stdin)
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Order id
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_with_global_config() {
        let cli = Cli::try_parse_from(["ordergate", "--config", "x.toml", "status", "1234567"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Commands::Status(StatusArgs { id: 1_234_567 })));
    }

    #[test]
    fn run_defaults_to_topic_feed() {
        let cli = Cli::try_parse_from(["ordergate", "run", "--drain"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.drain);
        assert!(matches!(args.via, FeedVia::Topic));
    }

    #[test]
    fn submit_requires_file() {
        assert!(Cli::try_parse_from(["ordergate", "submit"]).is_err());
    }
}
