//! Advisory price tiers and the net margin left on a chosen price.

use super::checked;
use super::error::PricingError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Points taken off the user's margin for the conservative tier.
pub const CONSERVATIVE_DISCOUNT: Decimal = dec!(15);
/// Lowest margin the conservative tier can carry.
pub const CONSERVATIVE_FLOOR: Decimal = dec!(10);
/// The premium tier adds this many points to the user's margin.
pub const PREMIUM_UPLIFT: Decimal = dec!(20);

pub const HEALTHY_MARGIN: Decimal = dec!(30);
pub const CAUTION_MARGIN: Decimal = dec!(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Conservative,
    Target,
    Premium,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Conservative => write!(f, "Conservative"),
            Tier::Target => write!(f, "Target"),
            Tier::Premium => write!(f, "Premium"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierPrice {
    pub tier: Tier,
    pub margin_percent: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPrices {
    pub base_cost: Decimal,
    pub conservative: TierPrice,
    pub target: TierPrice,
    pub premium: TierPrice,
}

impl StrategyPrices {
    pub fn tier(&self, tier: Tier) -> &TierPrice {
        match tier {
            Tier::Conservative => &self.conservative,
            Tier::Target => &self.target,
            Tier::Premium => &self.premium,
        }
    }

    pub fn tiers(&self) -> [&TierPrice; 3] {
        [&self.conservative, &self.target, &self.premium]
    }
}

fn tier_price(
    tier: Tier,
    base_cost: Decimal,
    margin_percent: Decimal,
) -> Result<TierPrice, PricingError> {
    Ok(TierPrice {
        tier,
        margin_percent,
        price: checked::mark_up(base_cost, margin_percent, &format!("{} price", tier))?,
    })
}

/// Three advisory prices around the user's margin on a treatment's real cost.
pub fn strategy_prices(
    base_cost: Decimal,
    user_margin_percent: Decimal,
) -> Result<StrategyPrices, PricingError> {
    let conservative_margin = checked::sub(user_margin_percent, CONSERVATIVE_DISCOUNT, "margin")?
        .max(CONSERVATIVE_FLOOR);
    let premium_margin = checked::add(user_margin_percent, PREMIUM_UPLIFT, "margin")?;
    Ok(StrategyPrices {
        base_cost,
        conservative: tier_price(Tier::Conservative, base_cost, conservative_margin)?,
        target: tier_price(Tier::Target, base_cost, user_margin_percent)?,
        premium: tier_price(Tier::Premium, base_cost, premium_margin)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarginHealth {
    Healthy,
    Caution,
    LossRisk,
}

impl MarginHealth {
    pub fn classify(net_margin_percent: Decimal) -> Self {
        if net_margin_percent >= HEALTHY_MARGIN {
            MarginHealth::Healthy
        } else if net_margin_percent >= CAUTION_MARGIN {
            MarginHealth::Caution
        } else {
            MarginHealth::LossRisk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarginHealth::Healthy => "healthy",
            MarginHealth::Caution => "caution",
            MarginHealth::LossRisk => "loss-risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetMargin {
    pub price: Decimal,
    pub real_cost: Decimal,
    pub commission_amount: Decimal,
    pub tax_amount: Decimal,
    pub net_margin: Decimal,
    pub net_margin_percent: Decimal,
    pub health: MarginHealth,
}

/// What is left of `price` after real cost, commission and on-revenue tax.
///
/// `tax_rate_percent` must be zero when tax is embedded in the price.
pub fn net_margin(
    price: Decimal,
    real_cost: Decimal,
    commission_percent: Decimal,
    tax_rate_percent: Decimal,
) -> Result<NetMargin, PricingError> {
    if price <= Decimal::ZERO {
        return Err(PricingError::config(format!(
            "price must be positive to compute a margin, got {}",
            price
        )));
    }
    if commission_percent < Decimal::ZERO {
        return Err(PricingError::config(format!(
            "commission cannot be negative, got {}%",
            commission_percent
        )));
    }
    if tax_rate_percent < Decimal::ZERO {
        return Err(PricingError::tax_rate(
            tax_rate_percent,
            "rate cannot be negative",
        ));
    }

    let what = "net margin";
    let commission_amount = checked::percent_of(price, commission_percent, what)?;
    let tax_amount = checked::percent_of(price, tax_rate_percent, what)?;
    let deductions = checked::sum([real_cost, commission_amount, tax_amount], what)?;
    let net = checked::sub(price, deductions, what)?;
    let net_margin_percent = checked::mul(checked::div(net, price, what)?, dec!(100), what)?;

    Ok(NetMargin {
        price,
        real_cost,
        commission_amount,
        tax_amount,
        net_margin: net,
        net_margin_percent,
        health: MarginHealth::classify(net_margin_percent),
    })
}
