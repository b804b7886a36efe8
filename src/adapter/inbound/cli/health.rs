//! Handler for the `health` command.

use serde_json::json;

use crate::adapter::inbound::cli::{operator, output};
use crate::error::{Error, Result};
use crate::port::inbound::operator::diagnostic::HealthCheckStatus;

/// `OK` or `DOWN` for one check.
fn label(status: &HealthCheckStatus) -> &'static str {
    match status {
        HealthCheckStatus::Healthy => "OK",
        HealthCheckStatus::Unhealthy(_) => "DOWN",
    }
}

/// Probe dependencies; fails when any critical one is down.
pub async fn execute(config_path: &std::path::Path) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let report = operator::operator()?.health_report(&config_toml).await?;

    if output::is_json() {
        let checks = report
            .checks
            .iter()
            .map(|check| {
                let details = match &check.status {
                    HealthCheckStatus::Healthy => None,
                    HealthCheckStatus::Unhealthy(reason) => Some(reason.as_str()),
                };
                json!({
                    "name": check.name,
                    "critical": check.critical,
                    "status": label(&check.status),
                    "details": details,
                })
            })
            .collect::<Vec<_>>();

        output::json_output(json!({
            "command": "health",
            "status": if report.is_healthy() { "healthy" } else { "degraded" },
            "checks": checks,
        }));
    } else {
        for check in &report.checks {
            match &check.status {
                HealthCheckStatus::Healthy => println!("{}: OK", check.name),
                HealthCheckStatus::Unhealthy(reason) => {
                    println!("{}: DOWN ({reason})", check.name);
                }
            }
        }
    }

    if !report.is_healthy() {
        return Err(Error::Rejected("Health check failed".to_string()));
    }
    Ok(())
}
