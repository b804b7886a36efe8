//! Ordered validator chain.

use regex::Regex;
use tracing::debug;

use crate::domain::order::OrderRequest;
use crate::error::ValidationError;

use super::config::ValidationConfig;
use super::rules::{
    CustomerDetailsValidator, OrderIdValidator, OrderItemsValidator, OrderTypeValidator,
    TotalAmountValidator,
};

/// One independent check over an order request.
pub trait Validator: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Validate the request, returning the first problem found.
    fn validate(&self, request: &OrderRequest) -> Result<(), ValidationError>;
}

/// Ordered sequence of validators.
pub struct ValidatorChain {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorChain {
    /// Empty chain that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Standard chain: id, order type, customer details, items, then the
    /// total cross-check when enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured phone pattern is not a valid regex.
    pub fn from_config(config: &ValidationConfig) -> Result<Self, regex::Error> {
        let phone_pattern = Regex::new(&config.phone_pattern)?;
        let mut chain = Self::new()
            .with(OrderIdValidator)
            .with(OrderTypeValidator)
            .with(CustomerDetailsValidator::new(phone_pattern))
            .with(OrderItemsValidator);
        if config.enforce_total_amount {
            chain = chain.with(TotalAmountValidator);
        }
        Ok(chain)
    }

    /// Append a validator to the end of the chain.
    #[must_use]
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Run every validator in order, stopping at the first failure.
    pub fn validate(&self, request: &OrderRequest) -> Result<(), ValidationError> {
        for validator in &self.validators {
            if let Err(err) = validator.validate(request) {
                debug!(
                    order_id = %request.id,
                    validator = validator.name(),
                    reason = %err,
                    "Validation failed"
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Names of the registered validators, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for ValidatorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidatorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorChain")
            .field("validators", &self.names())
            .finish()
    }
}
