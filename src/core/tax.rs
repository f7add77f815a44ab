//! Tax regimes and resolution of a configuration into one effective rate.

use super::checked;
use super::error::PricingError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service class of the simplified regime, each with its own bracket table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceClass {
    /// Services subject to the payroll factor (Anexo III)
    #[default]
    #[serde(alias = "anexo3")]
    ClassA,
    /// Intellectual services (Anexo V)
    #[serde(alias = "anexo5")]
    ClassB,
}

/// One revenue band of a bracket table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub index: u8,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub nominal_rate: Decimal,
}

pub const BRACKET_COUNT: u8 = 6;

impl FromStr for ServiceClass {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" | "class-a" | "anexo3" => Ok(ServiceClass::ClassA),
            "b" | "class-b" | "anexo5" => Ok(ServiceClass::ClassB),
            _ => Err(PricingError::MissingBracketData(format!(
                "unknown service class '{}'",
                s
            ))),
        }
    }
}

impl ServiceClass {
    fn nominal_rates(self) -> [Decimal; BRACKET_COUNT as usize] {
        match self {
            ServiceClass::ClassA => [
                dec!(6),
                dec!(11.2),
                dec!(13.5),
                dec!(16),
                dec!(21),
                dec!(33),
            ],
            ServiceClass::ClassB => [
                dec!(15.5),
                dec!(18),
                dec!(19.5),
                dec!(20.5),
                dec!(23),
                dec!(30.5),
            ],
        }
    }

    /// The six revenue bands of this class, bracket 1 first.
    pub fn brackets(self) -> Vec<Bracket> {
        let bounds = [
            (dec!(0), dec!(180000)),
            (dec!(180000.01), dec!(360000)),
            (dec!(360000.01), dec!(720000)),
            (dec!(720000.01), dec!(1800000)),
            (dec!(1800000.01), dec!(3600000)),
            (dec!(3600000.01), dec!(4800000)),
        ];
        bounds
            .into_iter()
            .zip(self.nominal_rates())
            .zip(1u8..)
            .map(|(((lower_bound, upper_bound), nominal_rate), index)| Bracket {
                index,
                lower_bound,
                upper_bound,
                nominal_rate,
            })
            .collect()
    }

    pub fn bracket(self, index: u8) -> Result<Bracket, PricingError> {
        self.brackets()
            .into_iter()
            .find(|b| b.index == index)
            .ok_or_else(|| {
                PricingError::MissingBracketData(format!(
                    "bracket {} does not exist for {} (expected 1-{})",
                    index, self, BRACKET_COUNT
                ))
            })
    }

    /// Bracket whose revenue band contains an annual revenue figure.
    pub fn bracket_for_revenue(self, annual_revenue: Decimal) -> Result<Bracket, PricingError> {
        self.brackets()
            .into_iter()
            .find(|b| annual_revenue <= b.upper_bound)
            .filter(|_| annual_revenue >= Decimal::ZERO)
            .ok_or_else(|| {
                PricingError::MissingBracketData(format!(
                    "annual revenue {} is outside every bracket of {}",
                    annual_revenue, self
                ))
            })
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceClass::ClassA => write!(f, "class A"),
            ServiceClass::ClassB => write!(f, "class B"),
        }
    }
}

/// Whether tax is added at sale time or already contained in the listed price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationMethod {
    #[default]
    #[serde(alias = "onRevenue")]
    OnRevenue,
    Embedded,
}

/// Levies of the presumed-profit and real-profit regimes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfitLevies {
    pub service_tax: Decimal,
    pub pis: Decimal,
    pub cofins: Decimal,
    pub corporate_income_tax: Decimal,
    pub social_contribution: Decimal,
}

impl ProfitLevies {
    pub fn presumed_profit_defaults() -> Self {
        ProfitLevies {
            service_tax: dec!(5),
            pis: dec!(0.65),
            cofins: dec!(3),
            corporate_income_tax: dec!(4.8),
            social_contribution: dec!(2.88),
        }
    }

    pub fn real_profit_defaults() -> Self {
        ProfitLevies {
            service_tax: dec!(5),
            pis: dec!(1.65),
            cofins: dec!(7.6),
            corporate_income_tax: dec!(15),
            social_contribution: dec!(9),
        }
    }

    fn total(&self) -> Result<Decimal, PricingError> {
        checked::sum(
            [
                self.service_tax,
                self.pis,
                self.cofins,
                self.corporate_income_tax,
                self.social_contribution,
            ],
            "tax rate",
        )
    }
}

/// Levies of the sole-proprietor regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoleProprietorLevies {
    pub service_tax: Decimal,
    pub social_security: Decimal,
    pub income_tax: Decimal,
}

impl SoleProprietorLevies {
    pub fn defaults() -> Self {
        SoleProprietorLevies {
            service_tax: dec!(5),
            social_security: dec!(11),
            income_tax: dec!(15),
        }
    }

    fn total(&self) -> Result<Decimal, PricingError> {
        checked::sum(
            [self.service_tax, self.social_security, self.income_tax],
            "tax rate",
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxRegime {
    SimplifiedBracketed { class: ServiceClass, bracket: u8 },
    PresumedProfit(ProfitLevies),
    RealProfit(ProfitLevies),
    SoleProprietor(SoleProprietorLevies),
}

impl TaxRegime {
    pub fn name(&self) -> &'static str {
        match self {
            TaxRegime::SimplifiedBracketed { .. } => "simplified-bracketed",
            TaxRegime::PresumedProfit(_) => "presumed-profit",
            TaxRegime::RealProfit(_) => "real-profit",
            TaxRegime::SoleProprietor(_) => "sole-proprietor",
        }
    }

    /// Regime with its default levies (bracket 1 of class A for the simplified regime).
    pub fn from_name(name: &str) -> Option<TaxRegime> {
        match name.to_lowercase().as_str() {
            "simplified-bracketed" | "simplesnacional" => Some(TaxRegime::SimplifiedBracketed {
                class: ServiceClass::ClassA,
                bracket: 1,
            }),
            "presumed-profit" | "lucropresumido" => Some(TaxRegime::PresumedProfit(
                ProfitLevies::presumed_profit_defaults(),
            )),
            "real-profit" | "lucroreal" => {
                Some(TaxRegime::RealProfit(ProfitLevies::real_profit_defaults()))
            }
            "sole-proprietor" | "cpf" => {
                Some(TaxRegime::SoleProprietor(SoleProprietorLevies::defaults()))
            }
            _ => None,
        }
    }

    fn rate(&self) -> Result<Decimal, PricingError> {
        match self {
            TaxRegime::SimplifiedBracketed { class, bracket } => {
                class.bracket(*bracket).map(|b| b.nominal_rate)
            }
            TaxRegime::PresumedProfit(levies) | TaxRegime::RealProfit(levies) => levies.total(),
            TaxRegime::SoleProprietor(levies) => levies.total(),
        }
    }
}

/// A validated tax configuration.
///
/// Only obtainable through [`TaxConfig::new`] or [`TryFrom<TaxConfigInput>`],
/// both of which reject unknown regimes, out-of-range brackets, negative
/// levies and embedded rates of 100% or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaxConfigInput", into = "TaxConfigInput")]
pub struct TaxConfig {
    regime: TaxRegime,
    method: CalculationMethod,
    rate: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig {
            regime: TaxRegime::SimplifiedBracketed {
                class: ServiceClass::ClassA,
                bracket: 1,
            },
            method: CalculationMethod::OnRevenue,
            rate: dec!(6),
        }
    }
}

impl TaxConfig {
    pub fn new(regime: TaxRegime, method: CalculationMethod) -> Result<Self, PricingError> {
        match regime {
            TaxRegime::SimplifiedBracketed { .. } => {}
            TaxRegime::PresumedProfit(levies) | TaxRegime::RealProfit(levies) => {
                for (name, value) in [
                    ("service tax", levies.service_tax),
                    ("PIS", levies.pis),
                    ("COFINS", levies.cofins),
                    ("corporate income tax", levies.corporate_income_tax),
                    ("social contribution", levies.social_contribution),
                ] {
                    check_levy(name, value)?;
                }
            }
            TaxRegime::SoleProprietor(levies) => {
                for (name, value) in [
                    ("service tax", levies.service_tax),
                    ("social security", levies.social_security),
                    ("income tax", levies.income_tax),
                ] {
                    check_levy(name, value)?;
                }
            }
        }

        // bracket tables hold only positive rates, so a valid bracket never resolves to zero
        let rate = regime.rate()?;
        if method == CalculationMethod::Embedded {
            check_embedded_rate(rate)?;
        }
        Ok(TaxConfig {
            regime,
            method,
            rate,
        })
    }

    pub fn regime(&self) -> &TaxRegime {
        &self.regime
    }

    pub fn method(&self) -> CalculationMethod {
        self.method
    }

    /// Effective percentage rate on a 0-100 scale.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Rate to subtract from a chosen price when computing net margin.
    ///
    /// Embedded tax is already inside the price, so it contributes nothing here.
    pub fn net_margin_rate(&self) -> Decimal {
        match self.method {
            CalculationMethod::OnRevenue => self.rate,
            CalculationMethod::Embedded => Decimal::ZERO,
        }
    }

    /// Tax due on a sale at `price`.
    pub fn tax_amount(&self, price: Decimal) -> Result<Decimal, PricingError> {
        checked::percent_of(price, self.rate, "tax amount")
    }

    /// Amount charged to the patient for a listed `price`.
    pub fn checkout_price(&self, price: Decimal) -> Result<Decimal, PricingError> {
        match self.method {
            CalculationMethod::OnRevenue => {
                checked::add(price, self.tax_amount(price)?, "checkout price")
            }
            CalculationMethod::Embedded => Ok(price),
        }
    }
}

/// Effective rate of an optional configuration; no configuration means no tax.
pub fn resolve_tax_rate(config: Option<&TaxConfig>) -> Decimal {
    config.map_or(Decimal::ZERO, TaxConfig::rate)
}

fn check_levy(name: &str, value: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO {
        return Err(PricingError::tax_rate(
            value,
            format!("{} levy cannot be negative", name),
        ));
    }
    Ok(())
}

pub(crate) fn check_embedded_rate(rate: Decimal) -> Result<(), PricingError> {
    if rate < Decimal::ZERO {
        return Err(PricingError::tax_rate(rate, "rate cannot be negative"));
    }
    if rate >= dec!(100) {
        return Err(PricingError::tax_rate(
            rate,
            "embedded tax must be below 100%",
        ));
    }
    Ok(())
}

/// Tax configuration as stored by the application.
///
/// Any field may be missing; stored rates from older versions are accepted
/// and normalised while converting into a [`TaxConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfigInput {
    /// simplified-bracketed, presumed-profit, real-profit or sole-proprietor
    pub regime: String,
    #[serde(default)]
    pub rates: TaxRatesInput,
    #[serde(default)]
    pub calculation_method: CalculationMethod,
}

/// Rates of a stored tax configuration.
///
/// The Portuguese keys written by earlier versions of the application are
/// accepted as aliases; any other unknown key is an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaxRatesInput {
    /// Stored nominal rate of the simplified regime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub total_rate: Option<Decimal>,
    #[serde(default, alias = "anexo", skip_serializing_if = "Option::is_none")]
    pub service_class: Option<ServiceClass>,
    #[serde(default, alias = "faixaSelecionada", skip_serializing_if = "Option::is_none")]
    pub bracket: Option<u8>,
    #[serde(default, alias = "iss", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub service_tax: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub pis: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub cofins: Option<Decimal>,
    #[serde(default, alias = "irpj", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub corporate_income_tax: Option<Decimal>,
    #[serde(default, alias = "csll", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub social_contribution: Option<Decimal>,
    #[serde(default, alias = "inss", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub social_security: Option<Decimal>,
    #[serde(default, alias = "irpf", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub income_tax: Option<Decimal>,
}

impl TryFrom<TaxConfigInput> for TaxConfig {
    type Error = PricingError;

    fn try_from(input: TaxConfigInput) -> Result<Self, Self::Error> {
        let rates = &input.rates;

        let regime = match TaxRegime::from_name(&input.regime) {
            Some(TaxRegime::SimplifiedBracketed { .. }) => {
                let class = rates.service_class.unwrap_or_default();
                let bracket = match (rates.bracket, rates.total_rate) {
                    (Some(bracket), _) => bracket,
                    // older records stored only the rate; recover its bracket from the table
                    (None, Some(stored)) => class
                        .brackets()
                        .into_iter()
                        .find(|b| b.nominal_rate == stored)
                        .map_or(1, |b| b.index),
                    (None, None) => 1,
                };
                let nominal = class.bracket(bracket)?.nominal_rate;
                match rates.total_rate {
                    Some(stored) if stored.is_zero() && bracket == 1 => log::warn!(
                        "Stored rate for bracket 1 of {} was 0%, using {}%",
                        class,
                        nominal
                    ),
                    Some(stored) if stored != nominal => log::warn!(
                        "Stored rate {}% differs from bracket {} of {}, using {}%",
                        stored,
                        bracket,
                        class,
                        nominal
                    ),
                    _ => {}
                }
                TaxRegime::SimplifiedBracketed { class, bracket }
            }
            Some(TaxRegime::PresumedProfit(_)) => TaxRegime::PresumedProfit(profit_levies(rates)),
            Some(TaxRegime::RealProfit(_)) => TaxRegime::RealProfit(profit_levies(rates)),
            Some(TaxRegime::SoleProprietor(_)) => TaxRegime::SoleProprietor(SoleProprietorLevies {
                service_tax: rates.service_tax.unwrap_or_default(),
                social_security: rates.social_security.unwrap_or_default(),
                income_tax: rates.income_tax.unwrap_or_default(),
            }),
            None => {
                return Err(PricingError::MissingBracketData(format!(
                    "unknown tax regime '{}'",
                    input.regime
                )))
            }
        };

        TaxConfig::new(regime, input.calculation_method)
    }
}

fn profit_levies(rates: &TaxRatesInput) -> ProfitLevies {
    ProfitLevies {
        service_tax: rates.service_tax.unwrap_or_default(),
        pis: rates.pis.unwrap_or_default(),
        cofins: rates.cofins.unwrap_or_default(),
        corporate_income_tax: rates.corporate_income_tax.unwrap_or_default(),
        social_contribution: rates.social_contribution.unwrap_or_default(),
    }
}

impl From<TaxConfig> for TaxConfigInput {
    fn from(config: TaxConfig) -> Self {
        let rates = match config.regime {
            TaxRegime::SimplifiedBracketed { class, bracket } => TaxRatesInput {
                total_rate: Some(config.rate),
                service_class: Some(class),
                bracket: Some(bracket),
                ..Default::default()
            },
            TaxRegime::PresumedProfit(l) | TaxRegime::RealProfit(l) => TaxRatesInput {
                service_tax: Some(l.service_tax),
                pis: Some(l.pis),
                cofins: Some(l.cofins),
                corporate_income_tax: Some(l.corporate_income_tax),
                social_contribution: Some(l.social_contribution),
                ..Default::default()
            },
            TaxRegime::SoleProprietor(l) => TaxRatesInput {
                service_tax: Some(l.service_tax),
                social_security: Some(l.social_security),
                income_tax: Some(l.income_tax),
                ..Default::default()
            },
        };
        TaxConfigInput {
            regime: config.regime.name().to_string(),
            rates,
            calculation_method: config.method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracketed(class: ServiceClass, bracket: Option<u8>, stored: Option<Decimal>) -> TaxConfigInput {
        TaxConfigInput {
            regime: "simplified-bracketed".to_string(),
            rates: TaxRatesInput {
                total_rate: stored,
                service_class: Some(class),
                bracket,
                ..Default::default()
            },
            calculation_method: CalculationMethod::OnRevenue,
        }
    }

    #[test]
    fn bracket_one_rates() {
        for class in [ServiceClass::ClassA, ServiceClass::ClassB] {
            let config = TaxConfig::try_from(bracketed(class, Some(1), None)).unwrap();
            let expected = if class == ServiceClass::ClassA {
                dec!(6)
            } else {
                dec!(15.5)
            };
            assert_eq!(resolve_tax_rate(Some(&config)), expected);
        }
    }

    #[test]
    fn no_bracket_resolves_to_zero() {
        for class in [ServiceClass::ClassA, ServiceClass::ClassB] {
            for b in class.brackets() {
                assert!(b.nominal_rate > Decimal::ZERO);
                let config = TaxConfig::try_from(bracketed(class, Some(b.index), None)).unwrap();
                assert_eq!(config.rate(), b.nominal_rate);
            }
        }
    }

    #[test]
    fn stored_zero_rate_for_bracket_one_is_replaced() {
        let config =
            TaxConfig::try_from(bracketed(ServiceClass::ClassA, Some(1), Some(Decimal::ZERO)))
                .unwrap();
        assert_eq!(config.rate(), dec!(6.0));

        let config =
            TaxConfig::try_from(bracketed(ServiceClass::ClassB, Some(1), Some(Decimal::ZERO)))
                .unwrap();
        assert_eq!(config.rate(), dec!(15.5));
    }

    #[test]
    fn stored_rate_never_overrides_table() {
        let config =
            TaxConfig::try_from(bracketed(ServiceClass::ClassB, Some(4), Some(dec!(2)))).unwrap();
        assert_eq!(config.rate(), dec!(20.5));
    }

    #[test]
    fn missing_bracket_defaults_to_first() {
        let config = TaxConfig::try_from(bracketed(ServiceClass::ClassA, None, None)).unwrap();
        assert_eq!(config.rate(), dec!(6));
    }

    #[test]
    fn out_of_range_bracket_is_rejected() {
        for bracket in [0, 7] {
            let err = TaxConfig::try_from(bracketed(ServiceClass::ClassA, Some(bracket), None))
                .unwrap_err();
            assert!(matches!(err, PricingError::MissingBracketData(_)));
        }
    }

    #[test]
    fn unknown_regime_is_rejected() {
        let input = TaxConfigInput {
            regime: "flat".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            TaxConfig::try_from(input),
            Err(PricingError::MissingBracketData(_))
        ));
    }

    #[test]
    fn profit_regimes_sum_five_levies() {
        let presumed = TaxConfig::new(
            TaxRegime::PresumedProfit(ProfitLevies::presumed_profit_defaults()),
            CalculationMethod::OnRevenue,
        )
        .unwrap();
        assert_eq!(presumed.rate(), dec!(16.33));

        let real = TaxConfig::new(
            TaxRegime::RealProfit(ProfitLevies::real_profit_defaults()),
            CalculationMethod::OnRevenue,
        )
        .unwrap();
        assert_eq!(real.rate(), dec!(38.25));
    }

    #[test]
    fn missing_levies_count_as_zero() {
        let input = TaxConfigInput {
            regime: "presumed-profit".to_string(),
            rates: TaxRatesInput {
                service_tax: Some(dec!(5)),
                pis: Some(dec!(0.65)),
                ..Default::default()
            },
            calculation_method: CalculationMethod::OnRevenue,
        };
        let config = TaxConfig::try_from(input).unwrap();
        assert_eq!(config.rate(), dec!(5.65));
        assert!(matches!(config.regime(), TaxRegime::PresumedProfit(_)));
    }

    #[test]
    fn sole_proprietor_sums_three_levies() {
        let config = TaxConfig::new(
            TaxRegime::SoleProprietor(SoleProprietorLevies::defaults()),
            CalculationMethod::OnRevenue,
        )
        .unwrap();
        assert_eq!(config.rate(), dec!(31));
    }

    #[test]
    fn negative_levy_is_rejected() {
        let levies = SoleProprietorLevies {
            income_tax: dec!(-1),
            ..SoleProprietorLevies::defaults()
        };
        assert!(matches!(
            TaxConfig::new(TaxRegime::SoleProprietor(levies), CalculationMethod::OnRevenue),
            Err(PricingError::InvalidTaxRate { .. })
        ));
    }

    #[test]
    fn embedded_rate_of_one_hundred_is_rejected() {
        let levies = SoleProprietorLevies {
            service_tax: dec!(50),
            social_security: dec!(30),
            income_tax: dec!(20),
        };
        let err = TaxConfig::new(TaxRegime::SoleProprietor(levies), CalculationMethod::Embedded)
            .unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidTaxRate {
                rate: dec!(100),
                reason: "embedded tax must be below 100%".to_string()
            }
        );
        // the same levies are fine when tax is added at sale time
        assert!(
            TaxConfig::new(TaxRegime::SoleProprietor(levies), CalculationMethod::OnRevenue).is_ok()
        );
    }

    #[test]
    fn absent_config_resolves_to_zero() {
        assert_eq!(resolve_tax_rate(None), Decimal::ZERO);
    }

    #[test]
    fn legacy_json_is_normalised() {
        let json = r#"{
            "regime": "simplesNacional",
            "rates": { "totalRate": 0, "serviceClass": "class-b", "bracket": 1 },
            "calculationMethod": "embedded"
        }"#;
        let config: TaxConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rate(), dec!(15.5));
        assert_eq!(config.method(), CalculationMethod::Embedded);

        let value = serde_json::to_value(config).unwrap();
        assert_eq!(value["regime"], "simplified-bracketed");
        assert_eq!(value["rates"]["totalRate"], "15.5");
    }

    #[test]
    fn invalid_json_fails_to_deserialize() {
        let json = r#"{ "regime": "simplified-bracketed", "rates": { "bracket": 9 } }"#;
        let err = serde_json::from_str::<TaxConfig>(json).unwrap_err();
        assert!(err.to_string().contains("bracket 9"));
    }

    #[test]
    fn tax_amount_and_checkout_price() {
        let on_revenue = TaxConfig::default();
        assert_eq!(on_revenue.tax_amount(dec!(100)).unwrap(), dec!(6));
        assert_eq!(on_revenue.checkout_price(dec!(100)).unwrap(), dec!(106));
        assert!(on_revenue.checkout_price(Decimal::MAX).is_err());
        assert_eq!(on_revenue.net_margin_rate(), dec!(6));

        let embedded = TaxConfig::new(*on_revenue.regime(), CalculationMethod::Embedded).unwrap();
        assert_eq!(embedded.checkout_price(dec!(100)).unwrap(), dec!(100));
        assert_eq!(embedded.net_margin_rate(), Decimal::ZERO);
    }

    #[test]
    fn bracket_for_revenue() {
        let class = ServiceClass::ClassA;
        assert_eq!(class.bracket_for_revenue(dec!(100000)).unwrap().index, 1);
        assert_eq!(class.bracket_for_revenue(dec!(180000.01)).unwrap().index, 2);
        assert_eq!(class.bracket_for_revenue(dec!(4800000)).unwrap().index, 6);
        assert!(class.bracket_for_revenue(dec!(4800000.01)).is_err());
        assert!(class.bracket_for_revenue(dec!(-1)).is_err());
    }

    #[test]
    fn service_class_from_str() {
        assert_eq!("A".parse::<ServiceClass>(), Ok(ServiceClass::ClassA));
        assert_eq!("anexo5".parse::<ServiceClass>(), Ok(ServiceClass::ClassB));
        assert!(matches!(
            "c".parse::<ServiceClass>(),
            Err(PricingError::MissingBracketData(_))
        ));
    }

    #[test]
    fn stored_sole_proprietor_keys() {
        let json = r#"{
            "regime": "cpf",
            "state": "SP",
            "rates": { "iss": 5, "inss": 11, "irpf": 15 },
            "calculationMethod": "embedded"
        }"#;
        let config: TaxConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rate(), dec!(31));
        assert_eq!(config.method(), CalculationMethod::Embedded);
    }

    #[test]
    fn stored_profit_regime_keys() {
        let json = r#"{
            "regime": "lucroPresumido",
            "state": "SP",
            "customISS": 5,
            "rates": { "iss": 5, "pis": 0.65, "cofins": 3, "irpj": 4.8, "csll": 2.88 },
            "calculationMethod": "onRevenue"
        }"#;
        let config: TaxConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rate(), dec!(16.33));
        assert_eq!(config.method(), CalculationMethod::OnRevenue);
        assert!(matches!(config.regime(), TaxRegime::PresumedProfit(_)));

        let json = r#"{
            "regime": "lucroReal",
            "rates": { "iss": 5, "pis": 1.65, "cofins": 7.6, "irpj": 15, "csll": 9 },
            "calculationMethod": "onRevenue"
        }"#;
        let config: TaxConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rate(), dec!(38.25));
    }

    #[test]
    fn stored_simplified_keys() {
        let json = r#"{
            "regime": "simplesNacional",
            "rates": { "anexo": "anexo5", "faixaSelecionada": 3, "totalRate": 19.5 },
            "calculationMethod": "onRevenue"
        }"#;
        let config: TaxConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rate(), dec!(19.5));
        assert_eq!(
            *config.regime(),
            TaxRegime::SimplifiedBracketed {
                class: ServiceClass::ClassB,
                bracket: 3
            }
        );
    }

    #[test]
    fn bracket_recovered_from_stored_rate() {
        let json = r#"{
            "regime": "simplesNacional",
            "rates": { "anexo": "anexo3", "totalRate": 13.5 }
        }"#;
        let config: TaxConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rate(), dec!(13.5));
    }

    #[test]
    fn unknown_rate_key_is_rejected() {
        let json = r#"{ "regime": "cpf", "rates": { "isss": 5, "inss": 11, "irpf": 15 } }"#;
        let err = serde_json::from_str::<TaxConfig>(json).unwrap_err();
        assert!(err.to_string().contains("isss"));
    }
}
