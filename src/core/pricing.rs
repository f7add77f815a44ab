use super::checked;
use super::costs::CalculatedCosts;
use super::error::PricingError;
use super::tax::{check_embedded_rate, CalculationMethod, TaxConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Markup of the minimum price over real cost.
pub const MINIMUM_MARKUP: Decimal = dec!(1.10);

/// Uplift of the strategic price over the ideal price.
pub const STRATEGIC_UPLIFT: Decimal = dec!(1.50);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Material {
    pub name: String,
    #[schemars(with = "f64")]
    pub cost: Decimal,
}

/// A clinic service with the inputs that drive its cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub name: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub lab_cost: Decimal,
}

impl Treatment {
    pub fn materials_cost(&self) -> Result<Decimal, PricingError> {
        checked::sum(
            self.materials.iter().map(|m| m.cost),
            &format!("materials of '{}'", self.name),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub time_cost: Decimal,
    pub materials_cost: Decimal,
    pub lab_cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub real_cost: Decimal,
    pub minimum_price: Decimal,
    pub ideal_price: Decimal,
    pub strategic_price: Decimal,
    pub breakdown: CostBreakdown,
}

/// Raise a price so that `rate_percent` of the result is tax and the rest is `price`.
pub fn gross_up(price: Decimal, rate_percent: Decimal) -> Result<Decimal, PricingError> {
    check_embedded_rate(rate_percent)?;
    let kept = Decimal::ONE - rate_percent / dec!(100);
    checked::div(price, kept, "grossed-up price")
}

/// Real cost and baseline prices of one treatment.
///
/// Under the embedded method each price is grossed up so the tax is contained
/// in it; on revenue the prices are left as they are and tax is added at sale.
pub fn price_treatment(
    treatment: &Treatment,
    costs: &CalculatedCosts,
    profit_margin: Decimal,
    tax: Option<&TaxConfig>,
) -> Result<PricingResult, PricingError> {
    let what = format!("price of '{}'", treatment.name);
    let time_cost = checked::div(
        checked::mul(Decimal::from(treatment.duration_minutes), costs.cost_per_hour, &what)?,
        dec!(60),
        &what,
    )?;
    let materials_cost = treatment.materials_cost()?;
    let lab_cost = treatment.lab_cost;
    let real_cost = checked::sum([time_cost, materials_cost, lab_cost], &what)?;

    let mut minimum_price = checked::mul(real_cost, MINIMUM_MARKUP, &what)?;
    let mut ideal_price = checked::mark_up(real_cost, profit_margin, &what)?;
    let mut strategic_price = checked::mul(ideal_price, STRATEGIC_UPLIFT, &what)?;

    if let Some(config) = tax.filter(|c| c.method() == CalculationMethod::Embedded) {
        let rate = config.rate();
        minimum_price = gross_up(minimum_price, rate)?;
        ideal_price = gross_up(ideal_price, rate)?;
        strategic_price = gross_up(strategic_price, rate)?;
    }

    log::debug!(
        "Priced '{}': real={}, minimum={}, ideal={}, strategic={}",
        treatment.name,
        real_cost,
        minimum_price,
        ideal_price,
        strategic_price
    );

    Ok(PricingResult {
        real_cost,
        minimum_price,
        ideal_price,
        strategic_price,
        breakdown: CostBreakdown {
            time_cost,
            materials_cost,
            lab_cost,
        },
    })
}
