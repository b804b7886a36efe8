//! Diagnostic operator implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::infrastructure::orchestration::health::{self, HealthStatus};
use crate::port::inbound::operator::diagnostic::{
    DiagnosticOperator, HealthCheckEntry, HealthCheckReport, HealthCheckStatus,
};

use super::{entry::Operator, shared};

#[async_trait]
impl DiagnosticOperator for Operator {
    async fn health_report(&self, config_toml: &str) -> Result<HealthCheckReport> {
        let config = shared::load_config(config_toml, None)?;
        let report = health::check_config(config).await?;

        Ok(HealthCheckReport {
            checks: report
                .checks()
                .iter()
                .map(|check| HealthCheckEntry {
                    name: check.name().to_string(),
                    critical: check.critical(),
                    status: match check.status() {
                        HealthStatus::Healthy => HealthCheckStatus::Healthy,
                        HealthStatus::Unhealthy(reason) => {
                            HealthCheckStatus::Unhealthy(reason.clone())
                        }
                    },
                })
                .collect(),
        })
    }
}
