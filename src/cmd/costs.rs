//! Costs command - monthly cost basis and time rates

use super::{money, percent, read_clinic};
use clap::Args;
use clinic_pricing::core::{
    calculate_clinic_costs, occupancy_rate, CalculatedCosts, ClinicRecord, OccupancyStatus,
    FIXED_COST_ALERT_PERCENT,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CostsCommand {
    /// Clinic JSON file (or "-" for stdin)
    #[arg(short, long)]
    clinic: PathBuf,

    /// Hours actually spent on procedures last month, for the occupancy rate
    #[arg(long)]
    effective_hours: Option<Decimal>,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CostsOutput {
    #[serde(flatten)]
    costs: CalculatedCosts,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_cost_ratio: Option<Decimal>,
    fixed_cost_alert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    occupancy: Option<Occupancy>,
}

#[derive(Debug, Serialize)]
struct Occupancy {
    rate: Decimal,
    status: OccupancyStatus,
}

#[derive(Debug, Tabled)]
struct CostRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Monthly")]
    value: String,
}

impl CostsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let clinic = read_clinic(&self.clinic)?;
        let output = self.build(&clinic)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_table(&clinic, &output);
        }
        Ok(())
    }

    fn build(&self, clinic: &ClinicRecord) -> anyhow::Result<CostsOutput> {
        let costs = calculate_clinic_costs(clinic)?;
        let revenue = clinic.goals.monthly_revenue;
        let occupancy = match self.effective_hours {
            Some(hours) => {
                let rate = occupancy_rate(hours, costs.working_hours_per_month)?;
                Some(Occupancy {
                    rate,
                    status: OccupancyStatus::classify(rate),
                })
            }
            None => None,
        };
        Ok(CostsOutput {
            fixed_cost_ratio: costs.fixed_cost_ratio(revenue),
            fixed_cost_alert: costs.fixed_costs_exceed_alert(revenue),
            costs,
            occupancy,
        })
    }

    fn print_table(&self, clinic: &ClinicRecord, output: &CostsOutput) {
        let costs = &output.costs;
        let rows = vec![
            row("Fixed costs", money(costs.total_fixed_costs)),
            row("Team costs", money(costs.total_team_costs)),
            row("Depreciation", money(costs.total_depreciation)),
            row("Total monthly costs", money(costs.total_monthly_costs)),
            row("Working hours", format!("{:.2}", costs.working_hours_per_month)),
            row("Cost per hour", money(costs.cost_per_hour)),
            row("Cost per minute", format!("{:.4}", costs.cost_per_minute)),
        ];

        let title = clinic.profile.name.as_deref().unwrap_or("Clinic");
        println!();
        println!("COSTS ({}, {} chair(s))", title, clinic.profile.chairs);
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        if let Some(ratio) = output.fixed_cost_ratio {
            println!("Fixed costs are {} of monthly revenue", percent(ratio));
            if output.fixed_cost_alert {
                println!(
                    "\u{26A0} Fixed costs exceed {} of monthly revenue",
                    percent(FIXED_COST_ALERT_PERCENT)
                );
            }
        }
        if let Some(occupancy) = &output.occupancy {
            println!(
                "Occupancy: {} ({:?})",
                percent(occupancy.rate),
                occupancy.status
            );
        }
        println!();
    }
}

fn row(item: &str, value: String) -> CostRow {
    CostRow {
        item: item.to_string(),
        value,
    }
}
