//! Handler for the `submit` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::SubmitArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::error::{Error, Result};

/// Execute the submit command. Fails unless the order was accepted.
pub async fn execute(config_path: &std::path::Path, args: &SubmitArgs) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let payload = operator::read_input(&args.file)?;
    let view = operator::operator()?
        .submit_order(&config_toml, &payload)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "submit",
            "status": view.status_code,
            "message": view.message,
            "failedSinks": view.failed_sinks,
        }));
    } else if view.is_accepted() {
        output::success(&view.message);
        for sink in &view.failed_sinks {
            output::warning(&format!("event not delivered to sink {sink}"));
        }
    }

    if view.is_accepted() {
        Ok(())
    } else {
        Err(Error::Rejected(view.message))
    }
}
