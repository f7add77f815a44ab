use rust_decimal::Decimal;

/// Errors raised by the cost and pricing engine.
///
/// Every variant is produced at the boundary, before any price is computed,
/// so callers never receive infinite or undefined amounts.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid tax rate {rate}%: {reason}")]
    InvalidTaxRate { rate: Decimal, reason: String },
    #[error("missing bracket data: {0}")]
    MissingBracketData(String),
}

impl PricingError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        PricingError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn tax_rate(rate: Decimal, reason: impl Into<String>) -> Self {
        PricingError::InvalidTaxRate {
            rate,
            reason: reason.into(),
        }
    }
}
