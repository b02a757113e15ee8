//! Rendita CLI
//!
//! Reads an instrument's terms from a JSON file, prints the computed
//! cash-flow ledger and summary metrics, and optionally exports the
//! ledger to CSV.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use rendita::{
    calculate_bond_yield, calculate_deposit_yield, BondInputs, BondResult, DepositInputs,
    DepositResult,
};

#[derive(Parser)]
#[command(name = "rendita", version, about = "Deposit and bond yield calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the ledger and yields for a term deposit
    Deposit {
        /// Path to a DepositInputs JSON file
        #[arg(long)]
        input: PathBuf,

        /// Write the ledger to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Compute the ledger and yields for a fixed-coupon bond
    Bond {
        /// Path to a BondInputs JSON file
        #[arg(long)]
        input: PathBuf,

        /// Write the ledger to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Deposit { input, csv } => {
            let file = File::open(&input)
                .with_context(|| format!("cannot open inputs file {}", input.display()))?;
            let inputs: DepositInputs =
                serde_json::from_reader(file).context("malformed deposit inputs")?;
            let result = calculate_deposit_yield(&inputs).context("deposit computation failed")?;

            print_deposit(&result);

            if let Some(path) = csv {
                write_csv(&path, &result.cash_flows)?;
                println!("\nLedger written to: {}", path.display());
            }
        }
        Command::Bond { input, csv } => {
            let file = File::open(&input)
                .with_context(|| format!("cannot open inputs file {}", input.display()))?;
            let inputs: BondInputs =
                serde_json::from_reader(file).context("malformed bond inputs")?;
            let result = calculate_bond_yield(&inputs).context("bond computation failed")?;

            print_bond(&result);

            if let Some(path) = csv {
                write_csv(&path, &result.cash_flows)?;
                println!("\nLedger written to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_deposit(result: &DepositResult) {
    println!("Deposit ledger ({} entries):", result.cash_flows.len());
    println!("{:>10}  {:<32} {:>12} {:>12}", "Date", "Description", "Amount", "Balance");
    println!("{}", "-".repeat(70));
    for cf in &result.cash_flows {
        println!(
            "{:>10}  {:<32} {:>12.2} {:>12.2}",
            rendita::dates::format_display(cf.date),
            cf.description,
            cf.amount,
            cf.balance,
        );
    }

    println!("\nSummary:");
    println!("  Initial capital:       {}", result.initial_capital);
    println!("  Total gross interest:  {}", result.total_gross_interest);
    println!("  Total net interest:    {}", result.total_net_interest);
    println!("  Total tax:             {}", result.total_tax);
    println!("  Final capital:         {}", result.final_capital);
    println!("  Effective gross yield: {}%", result.effective_gross_yield);
    println!("  Effective net yield:   {}%", result.effective_net_yield);
}

fn print_bond(result: &BondResult) {
    println!("Bond ledger ({} entries):", result.cash_flows.len());
    println!("{:>10}  {:<44} {:>12} {:>10}", "Date", "Description", "Amount", "Base100");
    println!("{}", "-".repeat(82));
    for cf in &result.cash_flows {
        println!(
            "{:>10}  {:<44} {:>12.2} {:>10.4}",
            rendita::dates::format_display(cf.date),
            cf.description,
            cf.amount,
            cf.base100,
        );
    }

    println!("\nSummary:");
    println!("  Units:                 {}", result.number_of_units);
    println!("  Invested capital:      {}", result.invested_capital);
    println!("  Accrued at purchase:   {}", result.accrued_interest);
    println!("  Total commissions:     {}", result.total_commissions);
    println!("  Total gross yield:     {}", result.total_gross_yield);
    println!("  Total net yield:       {}", result.total_net_yield);
    println!("  Capital gain tax:      {}", result.capital_gain_tax);
    println!("  Final net value:       {}", result.final_net_value);
    println!(
        "  Gross IRR:             {}%{}",
        result.irr_gross,
        if result.irr_gross_converged { "" } else { " (did not converge)" }
    );
    println!(
        "  Net IRR:               {}%{}",
        result.irr_net,
        if result.irr_net_converged { "" } else { " (did not converge)" }
    );
}

fn write_csv<T: serde::Serialize>(path: &PathBuf, rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot create CSV file {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::info!("wrote {} ledger rows to {}", rows.len(), path.display());
    Ok(())
}
