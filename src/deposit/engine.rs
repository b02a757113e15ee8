//! Ledger construction for term deposits

use crate::cashflow::{format_amount, CashFlow, FlowKind};
use crate::dates::{add_months, parse_iso};
use crate::error::EngineError;

use super::data::{DepositInputs, DepositResult};

/// Flat withholding rate on deposit interest
const DEPOSIT_TAX_RATE: f64 = 0.26;

/// Build the full cash-flow ledger and summary metrics for a deposit.
///
/// The ledger opens with the principal paid in and closes with a
/// withdrawal of the full remaining balance, so its amounts always sum
/// to zero. Interest is credited at every month divisible by the period
/// length; a trailing partial period earns nothing.
pub fn calculate_deposit_yield(inputs: &DepositInputs) -> Result<DepositResult, EngineError> {
    let start_date = parse_iso("startDate", &inputs.start_date)?;

    let period_months = inputs.frequency.period_months();
    let period_rate = inputs.annual_rate / 100.0 / inputs.frequency.per_year() as f64;

    let mut cash_flows = vec![CashFlow {
        date: start_date,
        description: "Initial deposit".to_string(),
        amount: inputs.amount,
        balance: inputs.amount,
        kind: FlowKind::Principal,
    }];

    // Balance the interest is computed on: stays at the principal unless
    // interest is reinvested. The account itself accumulates post-tax
    // interest either way, so the closing withdrawal returns it all.
    let mut interest_base = inputs.amount;
    let mut account_balance = inputs.amount;
    let mut total_gross_interest = 0.0;

    for month in 1..=inputs.duration_months {
        if month % period_months != 0 {
            continue;
        }

        let interest_date = add_months(start_date, month);
        let interest = interest_base * period_rate;
        let tax = interest * DEPOSIT_TAX_RATE;
        total_gross_interest += interest;

        cash_flows.push(CashFlow {
            date: interest_date,
            description: "Gross interest".to_string(),
            amount: interest,
            balance: account_balance + interest,
            kind: FlowKind::Interest,
        });

        cash_flows.push(CashFlow {
            date: interest_date,
            description: "Tax on interest (26%)".to_string(),
            amount: -tax,
            balance: account_balance + interest - tax,
            kind: FlowKind::Tax,
        });

        account_balance += interest - tax;
        if inputs.reinvest {
            interest_base = account_balance;
        }
    }

    let end_date = add_months(start_date, inputs.duration_months);
    cash_flows.push(CashFlow {
        date: end_date,
        description: "Final withdrawal".to_string(),
        amount: -account_balance,
        balance: 0.0,
        kind: FlowKind::Principal,
    });

    let total_net_interest = total_gross_interest * (1.0 - DEPOSIT_TAX_RATE);
    let total_tax = total_gross_interest * DEPOSIT_TAX_RATE;
    let final_capital = inputs.amount + total_net_interest;

    let years_invested = inputs.duration_months as f64 / 12.0;
    let effective_gross_yield =
        ((1.0 + total_gross_interest / inputs.amount).powf(1.0 / years_invested) - 1.0) * 100.0;
    let effective_net_yield =
        ((1.0 + total_net_interest / inputs.amount).powf(1.0 / years_invested) - 1.0) * 100.0;

    Ok(DepositResult {
        cash_flows,
        initial_capital: format_amount(inputs.amount),
        total_gross_interest: format_amount(total_gross_interest),
        total_net_interest: format_amount(total_net_interest),
        total_tax: format_amount(total_tax),
        final_capital: format_amount(final_capital),
        effective_gross_yield: format_amount(effective_gross_yield),
        effective_net_yield: format_amount(effective_net_yield),
    })
}
