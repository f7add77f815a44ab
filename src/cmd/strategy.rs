//! Strategy command - advisory price tiers and net margin for one treatment

use super::{collect_treatments, money, percent, read_clinic};
use clap::{Args, ValueEnum};
use clinic_pricing::core::{
    calculate_clinic_costs, net_margin, price_treatment, strategy_prices, NetMargin,
    StrategyPrices, TaxConfig, Tier,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct StrategyCommand {
    /// Clinic JSON file (or "-" for stdin)
    #[arg(short, long)]
    clinic: PathBuf,

    /// Name of the treatment to analyse
    #[arg(short, long)]
    treatment: String,

    /// Additional treatments from a catalog CSV
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Margin percent for the target tier (defaults to the clinic goal)
    #[arg(short, long)]
    margin: Option<Decimal>,

    /// Commission percent per procedure (defaults to the percentage partners' share)
    #[arg(long)]
    commission: Option<Decimal>,

    /// Tier whose net margin is reported
    #[arg(long, value_enum, default_value_t = TierArg::Target)]
    tier: TierArg,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum TierArg {
    Conservative,
    #[default]
    Target,
    Premium,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Conservative => Tier::Conservative,
            TierArg::Target => Tier::Target,
            TierArg::Premium => Tier::Premium,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StrategyOutput {
    treatment: String,
    commission_percent: Decimal,
    tax_rate_percent: Decimal,
    strategies: StrategyPrices,
    selected: Tier,
    net: NetMargin,
}

#[derive(Debug, Tabled)]
struct TierRow {
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Margin")]
    margin: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl StrategyCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let clinic = read_clinic(&self.clinic)?;
        let treatments = collect_treatments(&clinic, self.catalog.as_deref())?;
        let Some(treatment) = treatments
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(&self.treatment))
        else {
            anyhow::bail!("Treatment not found: {}", self.treatment);
        };

        let margin = self.margin.unwrap_or(clinic.goals.profit_margin);
        let commission = self
            .commission
            .unwrap_or_else(|| clinic.team.revenue_share_percent());
        let tax_rate = clinic
            .tax_config
            .as_ref()
            .map_or(Decimal::ZERO, TaxConfig::net_margin_rate);

        let costs = calculate_clinic_costs(&clinic)?;
        let pricing = price_treatment(treatment, &costs, margin, clinic.tax_config.as_ref())?;
        let strategies = strategy_prices(pricing.real_cost, margin)?;
        let selected: Tier = self.tier.into();
        let net = net_margin(
            strategies.tier(selected).price,
            pricing.real_cost,
            commission,
            tax_rate,
        )?;

        let output = StrategyOutput {
            treatment: treatment.name.clone(),
            commission_percent: commission,
            tax_rate_percent: tax_rate,
            strategies,
            selected,
            net,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&output);
        }
        Ok(())
    }
}

fn print_text(output: &StrategyOutput) {
    let rows: Vec<TierRow> = output
        .strategies
        .tiers()
        .iter()
        .map(|t| TierRow {
            tier: if t.tier == output.selected {
                format!("{} *", t.tier)
            } else {
                t.tier.to_string()
            },
            margin: percent(t.margin_percent),
            price: money(t.price),
        })
        .collect();

    println!();
    println!(
        "PRICING STRATEGY ({}) - real cost {}",
        output.treatment,
        money(output.strategies.base_cost)
    );
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();

    let net = &output.net;
    println!("NET MARGIN ({})", output.selected);
    println!("  Price: {}", money(net.price));
    println!("  Real cost: {}", money(net.real_cost));
    println!(
        "  Commission ({}): {}",
        percent(output.commission_percent),
        money(net.commission_amount)
    );
    println!(
        "  Tax ({}): {}",
        percent(output.tax_rate_percent),
        money(net.tax_amount)
    );
    println!(
        "  Net margin: {} ({}) - {}",
        money(net.net_margin),
        percent(net.net_margin_percent),
        net.health.label()
    );
    println!();
}
