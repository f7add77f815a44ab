use super::checked;
use super::error::PricingError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OccupancyStatus {
    Low,
    Medium,
    Ideal,
    Overloaded,
}

impl OccupancyStatus {
    pub fn classify(rate_percent: Decimal) -> Self {
        if rate_percent <= dec!(50) {
            OccupancyStatus::Low
        } else if rate_percent <= dec!(75) {
            OccupancyStatus::Medium
        } else if rate_percent <= dec!(90) {
            OccupancyStatus::Ideal
        } else {
            OccupancyStatus::Overloaded
        }
    }
}

/// Share of available chair hours actually spent on procedures.
pub fn occupancy_rate(
    effective_hours: Decimal,
    available_hours: Decimal,
) -> Result<Decimal, PricingError> {
    if available_hours > Decimal::ZERO {
        let share = checked::div(effective_hours, available_hours, "occupancy rate")?;
        checked::mul(share, dec!(100), "occupancy rate")
    } else {
        Ok(Decimal::ZERO)
    }
}
