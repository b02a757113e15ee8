//! Sweep a bond's sale price across a range and report the net IRR of
//! each scenario
//!
//! Scenario grid runs in parallel; each engine call is pure, so no
//! coordination is needed.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;

use rendita::{calculate_bond_yield, BondInputs, SaleTerms};

#[derive(Parser)]
#[command(name = "price_sweep", about = "Bond sale-price scenario sweep")]
struct Args {
    /// Path to a BondInputs JSON file; its sale terms must be an early
    /// sale, whose date anchors the sweep
    #[arg(long)]
    input: PathBuf,

    /// Lowest sale price in the sweep
    #[arg(long, default_value_t = 90.0)]
    from: f64,

    /// Highest sale price in the sweep
    #[arg(long, default_value_t = 110.0)]
    to: f64,

    /// Price increment between scenarios
    #[arg(long, default_value_t = 0.5)]
    step: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let file = File::open(&args.input)
        .with_context(|| format!("cannot open inputs file {}", args.input.display()))?;
    let inputs: BondInputs = serde_json::from_reader(file).context("malformed bond inputs")?;

    let sale_date = match &inputs.sale {
        SaleTerms::Early { date, .. } => date.clone(),
        SaleTerms::AtMaturity => anyhow::bail!("price sweep requires early-sale terms"),
    };

    let steps = ((args.to - args.from) / args.step).floor() as usize;
    let prices: Vec<f64> = (0..=steps).map(|i| args.from + i as f64 * args.step).collect();

    log::info!("sweeping {} sale prices on {}", prices.len(), sale_date);
    let start = Instant::now();

    let mut scenarios: Vec<(f64, String, bool)> = prices
        .par_iter()
        .map(|&price| -> Result<(f64, String, bool), rendita::EngineError> {
            let scenario = BondInputs {
                sale: SaleTerms::Early {
                    date: sale_date.clone(),
                    unit_price: price,
                },
                ..inputs.clone()
            };
            let result = calculate_bond_yield(&scenario)?;
            Ok((price, result.irr_net, result.irr_net_converged))
        })
        .collect::<Result<Vec<_>, rendita::EngineError>>()?;
    scenarios.sort_by(|a, b| a.0.total_cmp(&b.0));

    println!("Sale price sweep ({} scenarios in {:?}):", scenarios.len(), start.elapsed());
    println!("{:>10} {:>10}", "Price", "Net IRR");
    println!("{}", "-".repeat(21));
    for (price, irr, converged) in &scenarios {
        println!(
            "{:>10.2} {:>9}%{}",
            price,
            irr,
            if *converged { "" } else { " (n/c)" }
        );
    }

    Ok(())
}
