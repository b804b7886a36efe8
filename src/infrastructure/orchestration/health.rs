//! Dependency health reporting.

use std::sync::Arc;

use tracing::warn;

use crate::error::Result;
use crate::infrastructure::bootstrap::{self, Services};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::broker::BrokerProbe;
use crate::port::outbound::store::OrderStore;

/// Label of the store check.
pub const DATABASE_CHECK: &str = "database";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    /// `OK` or `DOWN`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "OK",
            Self::Unhealthy(_) => "DOWN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    name: String,
    critical: bool,
    status: HealthStatus,
}

impl HealthCheck {
    pub fn new(name: impl Into<String>, critical: bool, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            critical,
            status,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HealthReport {
    checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn checks(&self) -> &[HealthCheck] {
        &self.checks
    }

    /// Degraded as soon as any critical dependency is down.
    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .filter(|check| check.critical())
            .all(HealthCheck::is_healthy)
    }

    /// One `name: OK|DOWN` line per check.
    pub fn summary(&self) -> String {
        self.checks
            .iter()
            .map(|check| format!("{}: {}", check.name(), check.status().label()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Probe every broker and the store. All are critical.
pub async fn health_check(
    brokers: &[Arc<dyn BrokerProbe>],
    store: &dyn OrderStore,
) -> HealthReport {
    let mut checks = broker_checks(brokers).await;
    let status = match store.ping().await {
        Ok(()) => HealthStatus::Healthy,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    };
    checks.push(HealthCheck::new(DATABASE_CHECK, true, status));
    HealthReport { checks }
}

/// Probe every broker; the store could not be opened.
pub async fn health_check_without_store(
    brokers: &[Arc<dyn BrokerProbe>],
    reason: impl Into<String>,
) -> HealthReport {
    let mut checks = broker_checks(brokers).await;
    checks.push(HealthCheck::new(
        DATABASE_CHECK,
        true,
        HealthStatus::Unhealthy(reason.into()),
    ));
    HealthReport { checks }
}

/// Wire services from `config` and probe them. A database that cannot be
/// opened is reported as down rather than returned as an error.
///
/// # Errors
///
/// Returns an error only if the broker topology cannot be declared.
#[allow(clippy::result_large_err)]
pub async fn check_config(config: Config) -> Result<HealthReport> {
    match bootstrap::open_store(&config) {
        Ok(store) => {
            let services = Services::with_store(config, store)?;
            Ok(health_check(&services.broker_probes(), services.store.as_ref()).await)
        }
        Err(e) => {
            warn!(database = %config.database, error = %e, "Database unavailable");
            let probes = bootstrap::broker_probes(&config)?;
            Ok(health_check_without_store(&probes, e.to_string()).await)
        }
    }
}

async fn broker_checks(brokers: &[Arc<dyn BrokerProbe>]) -> Vec<HealthCheck> {
    let mut checks = Vec::with_capacity(brokers.len() + 1);
    for broker in brokers {
        let status = match broker.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        };
        checks.push(HealthCheck::new(broker.name(), true, status));
    }
    checks
}
