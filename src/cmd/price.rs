//! Price command - real cost and baseline prices per treatment

use super::{collect_treatments, money, read_clinic};
use clap::Args;
use clinic_pricing::core::{calculate_clinic_costs, price_treatment, PricingResult};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct PriceCommand {
    /// Clinic JSON file (or "-" for stdin)
    #[arg(short, long)]
    clinic: PathBuf,

    /// Additional treatments from a catalog CSV
    #[arg(short, long)]
    treatments: Option<PathBuf>,

    /// Profit margin percent, overriding the clinic goal
    #[arg(short, long)]
    margin: Option<Decimal>,

    /// Output as CSV instead of a table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricedTreatment {
    treatment: String,
    duration_minutes: u32,
    #[serde(flatten)]
    pricing: PricingResult,
}

/// Row for the price table and CSV output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PriceRow {
    #[tabled(rename = "Treatment")]
    pub treatment: String,

    #[tabled(rename = "Min")]
    pub duration: u32,

    #[tabled(rename = "Time")]
    pub time_cost: String,

    #[tabled(rename = "Materials")]
    pub materials_cost: String,

    #[tabled(rename = "Lab")]
    pub lab_cost: String,

    #[tabled(rename = "Real Cost")]
    pub real_cost: String,

    #[tabled(rename = "Minimum")]
    pub minimum_price: String,

    #[tabled(rename = "Ideal")]
    pub ideal_price: String,

    #[tabled(rename = "Strategic")]
    pub strategic_price: String,
}

impl From<&PricedTreatment> for PriceRow {
    fn from(priced: &PricedTreatment) -> Self {
        let p = &priced.pricing;
        PriceRow {
            treatment: priced.treatment.clone(),
            duration: priced.duration_minutes,
            time_cost: money(p.breakdown.time_cost),
            materials_cost: money(p.breakdown.materials_cost),
            lab_cost: money(p.breakdown.lab_cost),
            real_cost: money(p.real_cost),
            minimum_price: money(p.minimum_price),
            ideal_price: money(p.ideal_price),
            strategic_price: money(p.strategic_price),
        }
    }
}

impl PriceCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let clinic = read_clinic(&self.clinic)?;
        let treatments = collect_treatments(&clinic, self.treatments.as_deref())?;
        let margin = self.margin.unwrap_or(clinic.goals.profit_margin);
        let costs = calculate_clinic_costs(&clinic)?;

        let priced = treatments
            .iter()
            .map(|t| {
                Ok(PricedTreatment {
                    treatment: t.name.clone(),
                    duration_minutes: t.duration_minutes,
                    pricing: price_treatment(t, &costs, margin, clinic.tax_config.as_ref())?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&priced)?);
            return Ok(());
        }

        let rows: Vec<PriceRow> = priced.iter().map(Into::into).collect();
        if self.csv {
            self.write_csv(&rows)
        } else {
            self.print_table(&rows, margin);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[PriceRow], margin: Decimal) {
        if rows.is_empty() {
            println!("No treatments found");
            return;
        }

        println!();
        println!("TREATMENT PRICES - {}% margin", margin);
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();
    }

    fn write_csv(&self, rows: &[PriceRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
