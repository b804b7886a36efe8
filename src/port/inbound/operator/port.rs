//! Unified operator capability surface for inbound adapters.

use super::diagnostic::DiagnosticOperator;
use super::order::OrderOperator;
use super::runtime::RuntimeOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort: DiagnosticOperator + OrderOperator + RuntimeOperator {}

impl<T> OperatorPort for T where T: DiagnosticOperator + OrderOperator + RuntimeOperator {}
