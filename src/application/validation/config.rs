//! Validator chain configuration.

use serde::Deserialize;

/// Default phone pattern: optional `+` and country code, optional area code
/// in parentheses, then seven to ten grouped digits.
pub const DEFAULT_PHONE_PATTERN: &str =
    r"^\+?(\d{1,3})?[-.\s]?(\(?\d{3}\)?[-.\s]?)?(\d[-.\s]?){6,9}\d$";

/// Configuration for request validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Regular expression a customer phone number must match in full.
    #[serde(default = "default_phone_pattern")]
    pub phone_pattern: String,

    /// Reject requests whose `totalAmount` differs from the item sum.
    ///
    /// Off by default: the declared total is accepted as computed client-side.
    #[serde(default)]
    pub enforce_total_amount: bool,
}

fn default_phone_pattern() -> String {
    DEFAULT_PHONE_PATTERN.to_string()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            phone_pattern: default_phone_pattern(),
            enforce_total_amount: false,
        }
    }
}
