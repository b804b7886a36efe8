//! Handler for the `run` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::{FeedVia, RunArgs};
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::runtime::{FeedTransport, RunReport, RunRequest};

/// Execute the run command.
pub async fn execute(config_path: &std::path::Path, args: &RunArgs) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let feed = match &args.feed {
        Some(path) => parse_feed(&operator::read_input(path)?),
        None => Vec::new(),
    };

    let request = RunRequest {
        config_toml,
        log_level: args.log_level.clone(),
        json_logs: args.json_logs,
        database_path: args
            .database
            .as_ref()
            .map(|path| path.to_string_lossy().to_string()),
        feed,
        feed_transport: match args.via {
            FeedVia::Topic => FeedTransport::Topic,
            FeedVia::Exchange => FeedTransport::Exchange,
        },
        drain: args.drain,
    };

    let report = operator::operator()?.execute_run(request).await?;
    print_report(&report);
    Ok(())
}

/// One payload per non-blank line.
fn parse_feed(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn print_report(report: &RunReport) {
    if output::is_json() {
        let consumers = report
            .consumers
            .iter()
            .map(|consumer| {
                json!({
                    "queue": consumer.queue,
                    "received": consumer.received,
                    "acked": consumer.acked,
                    "redelivered": consumer.redelivered,
                    "deadLettered": consumer.dead_lettered,
                })
            })
            .collect::<Vec<_>>();
        let dead_letters = report
            .dead_letters
            .iter()
            .map(|(queue, payloads)| json!({ "queue": queue, "payloads": payloads }))
            .collect::<Vec<_>>();
        output::json_output(json!({
            "command": "run",
            "consumers": consumers,
            "deadLetters": dead_letters,
        }));
        return;
    }

    output::section("Consumers");
    for consumer in &report.consumers {
        output::field(
            &consumer.queue,
            format!(
                "received {} · acked {} · redelivered {} · dead-lettered {}",
                consumer.received, consumer.acked, consumer.redelivered, consumer.dead_lettered
            ),
        );
    }
    for (queue, payloads) in &report.dead_letters {
        if !payloads.is_empty() {
            output::warning(&format!("{} message(s) on {queue}", payloads.len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_skips_blank_lines() {
        let feed = parse_feed("{\"id\":1}\n\n  {\"id\":2}  \n");
        assert_eq!(feed, vec!["{\"id\":1}", "{\"id\":2}"]);
    }
}
