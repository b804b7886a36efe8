//! Handler for the `status` command.

use crate::adapter::inbound::cli::command::StatusArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::error::{Error, Result};

/// Execute the status command.
pub async fn execute(config_path: &std::path::Path, args: &StatusArgs) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let view = operator::operator()?
        .order_status(&config_toml, args.id)
        .await?;

    let Some(view) = view else {
        let message = format!("Order not found with id: {}", args.id);
        if output::is_json() {
            output::json_output(serde_json::json!({
                "command": "status",
                "found": false,
                "message": message,
            }));
        }
        return Err(Error::Rejected(message));
    };

    if output::is_json() {
        output::json_output(serde_json::to_value(&view)?);
        return Ok(());
    }

    output::section(&format!("Order {}", view.order_id));
    output::field("Type", view.order_type);
    for item in &view.items {
        output::field(
            &format!("Product {}", item.product_id),
            format!("qty {} · {}", item.quantity, item.status),
        );
    }
    Ok(())
}
