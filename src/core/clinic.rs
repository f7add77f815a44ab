use super::pricing::Treatment;
use super::tax::{TaxConfig, TaxConfigInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Full clinic record handed to the engine by the surrounding application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClinicRecord {
    pub profile: ClinicProfile,
    #[serde(default)]
    pub fixed_costs: FixedCostsLedger,
    #[serde(default)]
    pub team: Team,
    pub goals: Goals,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<TaxConfigInput>")]
    pub tax_config: Option<TaxConfig>,
    #[serde(default)]
    pub treatments: Vec<Treatment>,
}

impl ClinicRecord {
    /// Starter record: one employee carrying the default payroll charges and the
    /// usual admin expense names, all amounts zero.
    pub fn template() -> Self {
        ClinicRecord {
            profile: ClinicProfile {
                name: None,
                days_per_week: dec!(5),
                hours_per_day: dec!(8),
                chairs: 1,
            },
            fixed_costs: FixedCostsLedger {
                admin_expenses: default_admin_expenses(),
                custom_costs: Vec::new(),
            },
            team: Team {
                employees: vec![Employee {
                    name: "Assistant".to_string(),
                    role: Some("Dental assistant".to_string()),
                    gross_salary: Decimal::ZERO,
                    labor_charges: Some(default_labor_charges()),
                }],
                partner_dentists: Vec::new(),
            },
            goals: Goals {
                pro_labore: Decimal::ZERO,
                profit_margin: dec!(40),
                monthly_revenue: None,
            },
            equipment: Vec::new(),
            tax_config: Some(TaxConfig::default()),
            treatments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClinicProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[schemars(with = "f64")]
    pub days_per_week: Decimal,
    #[schemars(with = "f64")]
    pub hours_per_day: Decimal,
    /// Number of chairs; informational only
    #[serde(default = "one_chair")]
    pub chairs: u32,
}

fn one_chair() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostsLedger {
    #[serde(default)]
    pub admin_expenses: Vec<AdminExpense>,
    #[serde(default)]
    pub custom_costs: Vec<CustomCost>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdminExpense {
    pub id: String,
    pub name: String,
    #[schemars(with = "f64")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CustomCost {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: CostCategory,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CostCategory {
    Structure,
    Administrative,
    Marketing,
    Technology,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LaborCharge {
    pub name: String,
    #[schemars(with = "f64")]
    pub percentage: Decimal,
}

impl LaborCharge {
    fn new(name: &str, percentage: Decimal) -> Self {
        LaborCharge {
            name: name.to_string(),
            percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[schemars(with = "f64")]
    pub gross_salary: Decimal,
    /// Payroll add-ons; when absent the employee costs the gross salary alone
    #[serde(default)]
    pub labor_charges: Option<Vec<LaborCharge>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Remuneration {
    /// Share of each procedure's price
    Percentage,
    /// Fixed monthly amount
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PartnerDentist {
    pub name: String,
    #[serde(rename = "type")]
    pub remuneration: Remuneration,
    #[schemars(with = "f64")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub partner_dentists: Vec<PartnerDentist>,
}

impl Team {
    /// Summed revenue share of percentage-paid partners, charged per procedure
    /// rather than as a monthly cost.
    pub fn revenue_share_percent(&self) -> Decimal {
        self.partner_dentists
            .iter()
            .filter(|p| p.remuneration == Remuneration::Percentage)
            .map(|p| p.value)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub name: String,
    #[schemars(with = "f64")]
    pub value: Decimal,
    pub depreciation_months: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    /// Owner's monthly draw, counted as a team cost
    #[schemars(with = "f64")]
    pub pro_labore: Decimal,
    /// Default markup percent over real cost
    #[schemars(with = "f64")]
    pub profit_margin: Decimal,
    /// Expected revenue, used for ratios only
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub monthly_revenue: Option<Decimal>,
}

/// Brazilian payroll add-ons applied to a CLT salary.
pub fn default_labor_charges() -> Vec<LaborCharge> {
    vec![
        LaborCharge::new("FGTS", dec!(8)),
        LaborCharge::new("INSS Empregador", dec!(20)),
        LaborCharge::new("INSS Terceiros", dec!(5.8)),
        LaborCharge::new("RAT", dec!(1)),
        LaborCharge::new("13º Salário", dec!(8.33)),
        LaborCharge::new("Férias + 1/3", dec!(11.11)),
        LaborCharge::new("FGTS sobre 13º e Férias", dec!(3.2)),
        LaborCharge::new("INSS sobre 13º e Férias", dec!(20)),
        LaborCharge::new("Multa FGTS", dec!(40)),
    ]
}

pub fn default_admin_expenses() -> Vec<AdminExpense> {
    [
        ("rent", "Rent"),
        ("property-tax", "Property tax"),
        ("condo", "Condominium fees"),
        ("internet", "Internet and phone"),
        ("water", "Water and sewage"),
        ("electricity", "Electricity"),
        ("accounting", "Accounting"),
        ("events", "Staff events"),
        ("bank", "Bank fees"),
        ("lawyer", "Legal fees"),
        ("meals", "Meals and snacks"),
        ("office", "Office supplies"),
        ("cleaning", "Cleaning supplies"),
        ("software", "Software subscriptions"),
        ("security", "Monitoring and security"),
        ("insurance", "Insurance"),
        ("credit", "Credit bureau and trade association"),
        ("health", "Occupational health"),
        ("maintenance", "Equipment maintenance"),
    ]
    .into_iter()
    .map(|(id, name)| AdminExpense {
        id: id.to_string(),
        name: name.to_string(),
        amount: Decimal::ZERO,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labor_charges_sum() {
        let total: Decimal = default_labor_charges().iter().map(|c| c.percentage).sum();
        assert_eq!(total, dec!(117.44));
    }

    #[test]
    fn revenue_share_only_counts_percentage_partners() {
        let team = Team {
            employees: vec![],
            partner_dentists: vec![
                PartnerDentist {
                    name: "A".to_string(),
                    remuneration: Remuneration::Percentage,
                    value: dec!(30),
                },
                PartnerDentist {
                    name: "B".to_string(),
                    remuneration: Remuneration::Fixed,
                    value: dec!(5000),
                },
            ],
        };
        assert_eq!(team.revenue_share_percent(), dec!(30));
    }

    #[test]
    fn clinic_json_deserializes() {
        let json = r#"{
            "profile": { "daysPerWeek": 5, "hoursPerDay": 8 },
            "team": {
                "employees": [{ "name": "Ana", "grossSalary": 2000 }],
                "partnerDentists": [{ "name": "Bia", "type": "fixed", "value": 3000 }]
            },
            "goals": { "proLabore": 8000, "profitMargin": 40 },
            "equipment": [{ "name": "Chair", "value": 60000, "depreciationMonths": 120 }]
        }"#;
        let clinic: ClinicRecord = serde_json::from_str(json).unwrap();
        assert_eq!(clinic.profile.chairs, 1);
        assert!(clinic.team.employees[0].labor_charges.is_none());
        assert_eq!(clinic.team.partner_dentists[0].remuneration, Remuneration::Fixed);
        assert!(clinic.tax_config.is_none());
        assert!(clinic.fixed_costs.admin_expenses.is_empty());
    }

    #[test]
    fn template_has_default_tax_config() {
        let clinic = ClinicRecord::template();
        assert_eq!(clinic.fixed_costs.admin_expenses.len(), 19);
        assert!(clinic.tax_config.is_some());
    }
}
