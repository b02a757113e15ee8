//! Money-weighted rate of return (XIRR) for dated cash flows
//!
//! Solves `sum(a_i / (1+r)^((d_i - d_0)/365)) = 0` for `r`, where `d_0`
//! is the earliest flow date, using Newton-Raphson with an analytic
//! derivative and a bisection fallback.

use chrono::NaiveDate;

use crate::dates::days_between;

const TOLERANCE: f64 = 1e-7;
const MAX_ITERATIONS: u32 = 100;
const RATE_FLOOR: f64 = -0.99;
const RATE_CEIL: f64 = 100.0;

/// Outcome of an XIRR solve.
///
/// Non-convergence is a visible state, not an error and not a true 0%
/// return. `rate_or_zero` gives the degraded value for callers that want
/// a number no matter what.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Xirr {
    /// The iteration converged to a finite annualized rate
    Converged(f64),
    /// Empty input, single-sign input, or the iteration did not settle
    NotConverged,
}

impl Xirr {
    /// The solved rate, or 0 when no rate could be determined
    pub fn rate_or_zero(&self) -> f64 {
        match self {
            Xirr::Converged(rate) => *rate,
            Xirr::NotConverged => 0.0,
        }
    }

    pub fn converged(&self) -> bool {
        matches!(self, Xirr::Converged(_))
    }
}

/// Solve for the annualized money-weighted return of `flows`.
///
/// The input is sorted ascending by date internally (stable, so flows on
/// the same date keep their order; they discount identically either way).
/// A solution requires at least one positive and one negative amount;
/// anything else is `NotConverged`.
pub fn solve(flows: &[(NaiveDate, f64)]) -> Xirr {
    if flows.is_empty() {
        return Xirr::NotConverged;
    }

    let mut sorted: Vec<(NaiveDate, f64)> = flows.to_vec();
    sorted.sort_by_key(|(date, _)| *date);

    let has_positive = sorted.iter().any(|(_, a)| *a > 0.0);
    let has_negative = sorted.iter().any(|(_, a)| *a < 0.0);
    if !has_positive || !has_negative {
        return Xirr::NotConverged;
    }

    let base_date = sorted[0].0;

    // Pre-compute year fractions (actual/365 from the earliest flow)
    let flows: Vec<(f64, f64)> = sorted
        .iter()
        .map(|(date, amount)| (days_between(base_date, *date) as f64 / 365.0, *amount))
        .collect();

    // Residual tolerance scaled to the size of the flows
    let npv_tolerance = 1e-6 * flows.iter().map(|(_, a)| a.abs()).sum::<f64>().max(1.0);

    // Newton-Raphson from a 10% guess
    let mut rate = 0.1_f64;
    for iteration in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(&flows, rate);

        if dnpv.abs() < 1e-12 {
            log::debug!("xirr: derivative vanished at iteration {iteration}, bisecting");
            return bisect(&flows);
        }

        let new_rate = (rate - npv / dnpv).clamp(RATE_FLOOR, RATE_CEIL);

        if !new_rate.is_finite() {
            return bisect(&flows);
        }

        if (new_rate - rate).abs() < TOLERANCE {
            // A small step can also mean the update is pinned at a clamp
            // bound; only a small residual counts as a root
            if npv_at(&flows, new_rate).abs() > npv_tolerance {
                return bisect(&flows);
            }
            log::debug!("xirr: converged to {new_rate:.8} after {iteration} iterations");
            return Xirr::Converged(new_rate);
        }

        rate = new_rate;
    }

    log::debug!("xirr: Newton did not converge within {MAX_ITERATIONS} iterations, bisecting");
    bisect(&flows)
}

/// NPV and its derivative with respect to the rate, over pre-computed
/// (year_fraction, amount) pairs
fn npv_and_derivative(flows: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for &(years, amount) in flows {
        let discount = (1.0 + rate).powf(-years);
        npv += amount * discount;
        dnpv -= years * amount * (1.0 + rate).powf(-years - 1.0);
    }

    (npv, dnpv)
}

fn npv_at(flows: &[(f64, f64)], rate: f64) -> f64 {
    flows
        .iter()
        .map(|&(years, amount)| amount * (1.0 + rate).powf(-years))
        .sum()
}

/// Bisection fallback over the full admissible rate interval
fn bisect(flows: &[(f64, f64)]) -> Xirr {
    let mut low = RATE_FLOOR;
    let mut high = RATE_CEIL;

    let npv_low = npv_at(flows, low);
    let npv_high = npv_at(flows, high);

    // No sign change over the interval: no root to find
    if npv_low * npv_high > 0.0 {
        return Xirr::NotConverged;
    }

    for _ in 0..MAX_ITERATIONS * 10 {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at(flows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Xirr::Converged(mid);
        }

        if npv_mid * npv_at(flows, low) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    Xirr::NotConverged
}
