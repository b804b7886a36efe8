//! Shared helper routines for operator implementations.

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::runtime::ConsumerSummary;
use crate::port::inbound::operator::runtime::ConsumerReport;

/// Parse config and apply an optional database override.
#[allow(clippy::result_large_err)]
pub(super) fn load_config(config_toml: &str, database_path: Option<&str>) -> Result<Config> {
    let mut config = Config::parse_toml(config_toml)?;
    if let Some(path) = database_path {
        config.database = path.to_string();
    }
    Ok(config)
}

pub(super) fn consumer_report(summary: ConsumerSummary) -> ConsumerReport {
    ConsumerReport {
        queue: summary.queue,
        received: summary.received,
        acked: summary.acked,
        redelivered: summary.redelivered,
        dead_lettered: summary.dead_lettered,
    }
}
