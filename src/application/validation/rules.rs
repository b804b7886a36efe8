//! Individual validation checks.

use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidateEmail;

use crate::domain::order::{CustomerDetails, OrderRequest, OrderType};
use crate::error::ValidationError;

use super::chain::Validator;

/// Identifier present and non-zero.
pub struct OrderIdValidator;

impl Validator for OrderIdValidator {
    fn name(&self) -> &'static str {
        "order_id"
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), ValidationError> {
        if request.id.is_present() {
            Ok(())
        } else {
            Err(ValidationError::MissingId)
        }
    }
}

/// Order type non-empty and an exact member of [`OrderType`].
pub struct OrderTypeValidator;

impl Validator for OrderTypeValidator {
    fn name(&self) -> &'static str {
        "order_type"
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), ValidationError> {
        if request.order_type.is_empty() {
            return Err(ValidationError::MissingOrderType);
        }
        request
            .order_type
            .parse::<OrderType>()
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidOrderType {
                order_type: request.order_type.clone(),
            })
    }
}

/// Customer name, email and phone, checked in that order.
pub struct CustomerDetailsValidator {
    phone_pattern: Regex,
}

impl CustomerDetailsValidator {
    #[must_use]
    pub fn new(phone_pattern: Regex) -> Self {
        Self { phone_pattern }
    }

    fn validate_name(name: &str) -> Result<(), ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::MissingCustomerName);
        }
        Ok(())
    }

    fn validate_email(email: &str) -> Result<(), ValidationError> {
        if email.validate_email() {
            Ok(())
        } else {
            Err(ValidationError::InvalidEmail {
                email: email.to_string(),
            })
        }
    }

    fn validate_phone(&self, phone: &str) -> Result<(), ValidationError> {
        if phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone);
        }
        if !self.phone_pattern.is_match(phone) {
            return Err(ValidationError::InvalidPhone {
                phone: phone.to_string(),
            });
        }
        Ok(())
    }

    fn validate_details(&self, details: &CustomerDetails) -> Result<(), ValidationError> {
        Self::validate_name(&details.name)?;
        Self::validate_email(&details.email)?;
        self.validate_phone(&details.phone)
    }
}

impl Validator for CustomerDetailsValidator {
    fn name(&self) -> &'static str {
        "customer_details"
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), ValidationError> {
        self.validate_details(&request.customer_details)
    }
}

/// quantity > 0 and price per unit ≥ 0 on every item.
pub struct OrderItemsValidator;

impl Validator for OrderItemsValidator {
    fn name(&self) -> &'static str {
        "order_items"
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), ValidationError> {
        for (index, item) in request.items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(ValidationError::NonPositiveQuantity {
                    index,
                    quantity: item.quantity,
                });
            }
            if item.price_per_unit < Decimal::ZERO {
                return Err(ValidationError::NegativePrice {
                    index,
                    price: item.price_per_unit,
                });
            }
        }
        Ok(())
    }
}

/// Declared total equals Σ(quantity × price per unit).
pub struct TotalAmountValidator;

impl Validator for TotalAmountValidator {
    fn name(&self) -> &'static str {
        "total_amount"
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), ValidationError> {
        let computed = request
            .computed_total()
            .ok_or(ValidationError::TotalOverflow)?;
        if computed.normalize() == request.total_amount.normalize() {
            Ok(())
        } else {
            Err(ValidationError::TotalMismatch {
                declared: request.total_amount,
                computed,
            })
        }
    }
}
