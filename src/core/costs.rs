use super::checked;
use super::clinic::{ClinicRecord, Employee, Remuneration};
use super::error::PricingError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Average number of weeks in a month.
pub const WEEKS_PER_MONTH: Decimal = dec!(4.33);

/// Fixed costs above this share of monthly revenue are flagged.
pub const FIXED_COST_ALERT_PERCENT: Decimal = dec!(25);

/// Monthly cost basis of a clinic and the derived time rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedCosts {
    pub total_fixed_costs: Decimal,
    pub total_team_costs: Decimal,
    pub total_depreciation: Decimal,
    pub total_monthly_costs: Decimal,
    pub cost_per_hour: Decimal,
    pub cost_per_minute: Decimal,
    pub working_hours_per_month: Decimal,
}

impl CalculatedCosts {
    /// Fixed costs as a percentage of the expected monthly revenue.
    ///
    /// `None` when no positive revenue figure is known or the ratio is out of range.
    pub fn fixed_cost_ratio(&self, monthly_revenue: Option<Decimal>) -> Option<Decimal> {
        monthly_revenue
            .filter(|r| *r > Decimal::ZERO)
            .and_then(|r| self.total_fixed_costs.checked_div(r))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
    }

    pub fn fixed_costs_exceed_alert(&self, monthly_revenue: Option<Decimal>) -> bool {
        self.fixed_cost_ratio(monthly_revenue)
            .is_some_and(|ratio| ratio > FIXED_COST_ALERT_PERCENT)
    }
}

/// Gross salary plus every labor charge, each applied to the gross salary.
pub fn employee_total_cost(employee: &Employee) -> Result<Decimal, PricingError> {
    let what = format!("cost of employee '{}'", employee.name);
    match &employee.labor_charges {
        None => Ok(employee.gross_salary),
        Some(charges) => {
            let percentage = checked::sum(charges.iter().map(|c| c.percentage), &what)?;
            let charged = checked::percent_of(employee.gross_salary, percentage, &what)?;
            checked::add(employee.gross_salary, charged, &what)
        }
    }
}

pub fn working_hours_per_month(
    days_per_week: Decimal,
    hours_per_day: Decimal,
) -> Result<Decimal, PricingError> {
    let what = "working hours per month";
    checked::mul(checked::mul(days_per_week, WEEKS_PER_MONTH, what)?, hours_per_day, what)
}

/// Cost per hour and per minute for a monthly total spread over the working hours.
pub fn cost_rates(
    total_monthly_costs: Decimal,
    working_hours_per_month: Decimal,
) -> Result<(Decimal, Decimal), PricingError> {
    if working_hours_per_month <= Decimal::ZERO {
        return Err(PricingError::config(format!(
            "working hours per month must be positive, got {}",
            working_hours_per_month
        )));
    }
    let per_hour = checked::div(total_monthly_costs, working_hours_per_month, "cost per hour")?;
    Ok((per_hour, checked::div(per_hour, dec!(60), "cost per minute")?))
}

/// Fold every monthly cost of the clinic into one total and a per-minute rate.
pub fn calculate_clinic_costs(clinic: &ClinicRecord) -> Result<CalculatedCosts, PricingError> {
    let ledger = &clinic.fixed_costs;
    let total_fixed_costs = checked::sum(
        ledger
            .admin_expenses
            .iter()
            .map(|e| e.amount)
            .chain(ledger.custom_costs.iter().map(|c| c.amount)),
        "fixed costs",
    )?;

    let employees = clinic
        .team
        .employees
        .iter()
        .map(employee_total_cost)
        .collect::<Result<Vec<_>, _>>()?;
    let employees = checked::sum(employees, "employee costs")?;
    let fixed_partners = checked::sum(
        clinic
            .team
            .partner_dentists
            .iter()
            .filter(|p| p.remuneration == Remuneration::Fixed)
            .map(|p| p.value),
        "partner costs",
    )?;
    let total_team_costs = checked::sum(
        [employees, fixed_partners, clinic.goals.pro_labore],
        "team costs",
    )?;

    let mut total_depreciation = Decimal::ZERO;
    for item in &clinic.equipment {
        if item.depreciation_months == 0 {
            return Err(PricingError::config(format!(
                "equipment '{}' has no depreciation period",
                item.name
            )));
        }
        let monthly = checked::div(
            item.value,
            Decimal::from(item.depreciation_months),
            "depreciation",
        )?;
        total_depreciation = checked::add(total_depreciation, monthly, "depreciation")?;
    }

    let total_monthly_costs = checked::sum(
        [total_fixed_costs, total_team_costs, total_depreciation],
        "total monthly costs",
    )?;
    let hours = working_hours_per_month(clinic.profile.days_per_week, clinic.profile.hours_per_day)?;
    let (cost_per_hour, cost_per_minute) = cost_rates(total_monthly_costs, hours)?;

    log::debug!(
        "Clinic costs: fixed={}, team={} (employees={}, partners={}), depreciation={}, total={}, hours={}",
        total_fixed_costs,
        total_team_costs,
        employees,
        fixed_partners,
        total_depreciation,
        total_monthly_costs,
        hours
    );

    Ok(CalculatedCosts {
        total_fixed_costs,
        total_team_costs,
        total_depreciation,
        total_monthly_costs,
        cost_per_hour,
        cost_per_minute,
        working_hours_per_month: hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clinic::{
        default_labor_charges, AdminExpense, ClinicProfile, CostCategory, CustomCost, Equipment,
        FixedCostsLedger, Goals, LaborCharge, PartnerDentist, Team,
    };

    fn employee(salary: Decimal, charges: Option<Vec<LaborCharge>>) -> Employee {
        Employee {
            name: "Ana".to_string(),
            role: None,
            gross_salary: salary,
            labor_charges: charges,
        }
    }

    fn partner(remuneration: Remuneration, value: Decimal) -> PartnerDentist {
        PartnerDentist {
            name: "Partner".to_string(),
            remuneration,
            value,
        }
    }

    fn clinic() -> ClinicRecord {
        ClinicRecord {
            profile: ClinicProfile {
                name: None,
                days_per_week: dec!(5),
                hours_per_day: dec!(8),
                chairs: 2,
            },
            fixed_costs: FixedCostsLedger {
                admin_expenses: vec![
                    AdminExpense {
                        id: "rent".to_string(),
                        name: "Rent".to_string(),
                        amount: dec!(3000),
                    },
                    AdminExpense {
                        id: "power".to_string(),
                        name: "Electricity".to_string(),
                        amount: dec!(500),
                    },
                ],
                custom_costs: vec![CustomCost {
                    id: "ads".to_string(),
                    name: "Ads".to_string(),
                    category: CostCategory::Marketing,
                    amount: dec!(500),
                    note: None,
                }],
            },
            team: Team {
                employees: vec![employee(dec!(2000), None)],
                partner_dentists: vec![
                    partner(Remuneration::Fixed, dec!(3000)),
                    partner(Remuneration::Percentage, dec!(40)),
                ],
            },
            goals: Goals {
                pro_labore: dec!(5000),
                profit_margin: dec!(40),
                monthly_revenue: None,
            },
            equipment: vec![Equipment {
                name: "Chair".to_string(),
                value: dec!(12000),
                depreciation_months: 60,
            }],
            tax_config: None,
            treatments: vec![],
        }
    }

    #[test]
    fn employee_with_default_charges() {
        let emp = employee(dec!(2000), Some(default_labor_charges()));
        assert_eq!(employee_total_cost(&emp).unwrap(), dec!(4348.80));
    }

    #[test]
    fn employee_without_charges_costs_gross_salary() {
        assert_eq!(
            employee_total_cost(&employee(dec!(2000), None)).unwrap(),
            dec!(2000)
        );
        assert_eq!(
            employee_total_cost(&employee(dec!(2000), Some(vec![]))).unwrap(),
            dec!(2000)
        );
    }

    #[test]
    fn cost_rates_example() {
        let (per_hour, per_minute) = cost_rates(dec!(10000), dec!(160)).unwrap();
        assert_eq!(per_hour, dec!(62.5));
        assert_eq!(per_minute.round_dp(4), dec!(1.0417));
    }

    #[test]
    fn clinic_totals() {
        let costs = calculate_clinic_costs(&clinic()).unwrap();
        assert_eq!(costs.total_fixed_costs, dec!(4000));
        // percentage partner is not a monthly cost
        assert_eq!(costs.total_team_costs, dec!(10000));
        assert_eq!(costs.total_depreciation, dec!(200));
        assert_eq!(costs.total_monthly_costs, dec!(14200));
        assert_eq!(costs.working_hours_per_month, dec!(173.2));
        assert_eq!(costs.cost_per_hour.round_dp(2), dec!(81.99));
        assert_eq!(costs.cost_per_minute, costs.cost_per_hour / dec!(60));
    }

    #[test]
    fn zero_working_hours_is_invalid() {
        let mut c = clinic();
        c.profile.days_per_week = Decimal::ZERO;
        assert!(matches!(
            calculate_clinic_costs(&c),
            Err(PricingError::InvalidConfiguration(_))
        ));
        assert!(cost_rates(dec!(100), dec!(-1)).is_err());
    }

    #[test]
    fn zero_depreciation_months_is_invalid() {
        let mut c = clinic();
        c.equipment[0].depreciation_months = 0;
        assert!(matches!(
            calculate_clinic_costs(&c),
            Err(PricingError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn fixed_cost_ratio_alert() {
        let costs = calculate_clinic_costs(&clinic()).unwrap();
        assert_eq!(costs.fixed_cost_ratio(None), None);
        assert_eq!(costs.fixed_cost_ratio(Some(Decimal::ZERO)), None);
        assert_eq!(costs.fixed_cost_ratio(Some(dec!(20000))), Some(dec!(20)));
        assert!(!costs.fixed_costs_exceed_alert(Some(dec!(20000))));
        assert!(costs.fixed_costs_exceed_alert(Some(dec!(10000))));
    }

    #[test]
    fn tiny_working_hours_overflow_is_an_error() {
        assert!(matches!(
            cost_rates(dec!(1000000000000), dec!(0.0000000000000000001)),
            Err(PricingError::InvalidConfiguration(_))
        ));

        let mut c = clinic();
        c.profile.days_per_week = dec!(0.0000000000000000001);
        c.profile.hours_per_day = dec!(0.0000000001);
        assert!(matches!(
            calculate_clinic_costs(&c),
            Err(PricingError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn huge_salary_overflow_is_an_error() {
        let mut c = clinic();
        c.team.employees = vec![employee(Decimal::MAX, Some(default_labor_charges()))];
        assert!(matches!(
            employee_total_cost(&c.team.employees[0]),
            Err(PricingError::InvalidConfiguration(_))
        ));
        assert!(calculate_clinic_costs(&c).is_err());
    }
}
