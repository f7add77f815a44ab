//! Overflow-checked decimal arithmetic over user-supplied amounts.
//!
//! `Decimal` operators panic when a result leaves the representable range;
//! these helpers turn that into an [`PricingError::InvalidConfiguration`]
//! naming the quantity being computed.

use super::error::PricingError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn out_of_range(what: &str) -> PricingError {
    PricingError::config(format!("{} is out of range", what))
}

pub(crate) fn add(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, PricingError> {
    a.checked_add(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn sub(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, PricingError> {
    a.checked_sub(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn mul(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, PricingError> {
    a.checked_mul(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn div(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, PricingError> {
    a.checked_div(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn sum<I>(values: I, what: &str) -> Result<Decimal, PricingError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| add(acc, v, what))
}

/// `percent`% of `amount`.
pub(crate) fn percent_of(
    amount: Decimal,
    percent: Decimal,
    what: &str,
) -> Result<Decimal, PricingError> {
    div(mul(amount, percent, what)?, dec!(100), what)
}

/// `amount × (1 + percent/100)`.
pub(crate) fn mark_up(
    amount: Decimal,
    percent: Decimal,
    what: &str,
) -> Result<Decimal, PricingError> {
    let factor = add(Decimal::ONE, div(percent, dec!(100), what)?, what)?;
    mul(amount, factor, what)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_becomes_configuration_error() {
        assert!(matches!(
            div(dec!(1000000000000), dec!(0.0000000000000000001), "cost per hour"),
            Err(PricingError::InvalidConfiguration(msg)) if msg == "cost per hour is out of range"
        ));
        assert!(mul(Decimal::MAX, dec!(2), "x").is_err());
        assert!(sum([Decimal::MAX, Decimal::ONE], "x").is_err());
        assert!(div(Decimal::ONE, Decimal::ZERO, "x").is_err());
    }

    #[test]
    fn regular_values_pass_through() {
        assert_eq!(percent_of(dec!(2000), dec!(117.44), "x").unwrap(), dec!(2348.80));
        assert_eq!(mark_up(dec!(81.25), dec!(40), "x").unwrap(), dec!(113.75));
        assert_eq!(sum([dec!(1), dec!(2.5)], "x").unwrap(), dec!(3.5));
    }
}
