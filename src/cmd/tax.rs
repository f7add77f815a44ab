//! Tax command - resolved rate for a clinic, or a bracket table

use super::{money, percent, read_clinic};
use clap::Args;
use clinic_pricing::core::{
    resolve_tax_rate, Bracket, CalculationMethod, ServiceClass, TaxConfig, TaxRegime,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TaxCommand {
    /// Clinic JSON file (or "-" for stdin)
    #[arg(short, long, required_unless_present = "brackets")]
    clinic: Option<PathBuf>,

    /// List the bracket table of a service class (a, b, anexo3, anexo5)
    #[arg(short, long)]
    brackets: Option<ServiceClass>,

    /// Annual revenue to place in a bracket
    #[arg(long)]
    annual_revenue: Option<Decimal>,

    /// Listed price to show the tax due and the checkout amount for
    #[arg(long, requires = "clinic")]
    price: Option<Decimal>,
}

#[derive(Debug, Tabled)]
struct BracketRow {
    #[tabled(rename = "Bracket")]
    index: String,
    #[tabled(rename = "From")]
    lower: String,
    #[tabled(rename = "To")]
    upper: String,
    #[tabled(rename = "Nominal Rate")]
    rate: String,
}

impl TaxCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if let Some(class) = self.brackets {
            let matched = self.revenue_bracket(class)?;
            print_brackets(class, matched.as_ref());
            return Ok(());
        }
        let Some(path) = &self.clinic else {
            anyhow::bail!("Provide a clinic file or --brackets");
        };
        let clinic = read_clinic(path)?;

        println!();
        match &clinic.tax_config {
            None => println!("No tax configuration - rate {}", percent(resolve_tax_rate(None))),
            Some(config) => self.print_config(config)?,
        }
        if let Some(price) = self.price {
            let (tax, checkout) = match &clinic.tax_config {
                Some(config) => (config.tax_amount(price)?, config.checkout_price(price)?),
                None => (Decimal::ZERO, price),
            };
            println!("  Tax on {}: {}", money(price), money(tax));
            println!("  Checkout price: {}", money(checkout));
        }
        println!();
        Ok(())
    }

    fn print_config(&self, config: &TaxConfig) -> anyhow::Result<()> {
        let regime = match config.regime() {
            TaxRegime::SimplifiedBracketed { class, bracket } => {
                format!("{} ({}, bracket {})", config.regime().name(), class, bracket)
            }
            other => other.name().to_string(),
        };
        let method = match config.method() {
            CalculationMethod::OnRevenue => "on revenue",
            CalculationMethod::Embedded => "embedded in price",
        };
        println!("TAX");
        println!("  Regime: {}", regime);
        println!("  Method: {}", method);
        println!("  Effective rate: {}", percent(resolve_tax_rate(Some(config))));

        if self.annual_revenue.is_some() {
            let TaxRegime::SimplifiedBracketed { class, .. } = config.regime() else {
                anyhow::bail!("Annual revenue brackets only apply to the simplified regime");
            };
            if let Some(bracket) = self.revenue_bracket(*class)? {
                println!(
                    "  Annual revenue falls in bracket {} ({})",
                    bracket.index,
                    percent(bracket.nominal_rate)
                );
            }
        }
        Ok(())
    }

    fn revenue_bracket(&self, class: ServiceClass) -> anyhow::Result<Option<Bracket>> {
        match self.annual_revenue {
            Some(revenue) => Ok(Some(class.bracket_for_revenue(revenue)?)),
            None => Ok(None),
        }
    }
}

fn print_brackets(class: ServiceClass, matched: Option<&Bracket>) {
    let rows: Vec<BracketRow> = class
        .brackets()
        .into_iter()
        .map(|b| BracketRow {
            index: if matched.is_some_and(|m| m.index == b.index) {
                format!("{} *", b.index)
            } else {
                b.index.to_string()
            },
            lower: money(b.lower_bound),
            upper: money(b.upper_bound),
            rate: percent(b.nominal_rate),
        })
        .collect();

    println!();
    println!("BRACKETS ({}) - annual revenue", class);
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
}
