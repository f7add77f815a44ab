mod cmd;

use clap::{Parser, Subcommand};
use cmd::{
    costs::CostsCommand, init::InitCommand, price::PriceCommand, schema::SchemaCommand,
    strategy::StrategyCommand, tax::TaxCommand, validate::ValidateCommand,
};

#[derive(Parser, Debug)]
#[command(name = "clinic-pricing", version)]
#[command(about = "Turn clinic operating costs into a cost per minute and price treatments against it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter clinic file
    Init(InitCommand),
    /// Monthly cost basis and cost per hour/minute
    Costs(CostsCommand),
    /// Real cost and baseline prices for every treatment
    Price(PriceCommand),
    /// Advisory price tiers and net margin for one treatment
    Strategy(StrategyCommand),
    /// Resolved tax rate or a bracket table
    Tax(TaxCommand),
    /// Check a clinic file for configuration problems
    Validate(ValidateCommand),
    /// Print the expected input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Init(cmd) => cmd.exec(),
        Command::Costs(cmd) => cmd.exec(),
        Command::Price(cmd) => cmd.exec(),
        Command::Strategy(cmd) => cmd.exec(),
        Command::Tax(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
