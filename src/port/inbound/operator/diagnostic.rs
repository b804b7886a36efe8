//! Diagnostic projections for operator-facing adapters.

use async_trait::async_trait;

use crate::error::Result;

/// Health status item for operator checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthCheckStatus {
    Healthy,
    Unhealthy(String),
}

/// Individual health check entry.
#[derive(Debug, Clone)]
pub struct HealthCheckEntry {
    pub name: String,
    pub critical: bool,
    pub status: HealthCheckStatus,
}

/// Health check report projection.
#[derive(Debug, Clone, Default)]
pub struct HealthCheckReport {
    pub checks: Vec<HealthCheckEntry>,
}

impl HealthCheckReport {
    /// True when all critical checks are healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .filter(|check| check.critical)
            .all(|check| matches!(&check.status, HealthCheckStatus::Healthy))
    }
}

/// Diagnostics use-cases for operator-facing adapters.
#[async_trait]
pub trait DiagnosticOperator: Send + Sync {
    /// Probe both brokers and the database.
    async fn health_report(&self, config_toml: &str) -> Result<HealthCheckReport>;
}
