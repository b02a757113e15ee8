//! Bond inputs and results records

use serde::{Deserialize, Serialize};

use crate::cashflow::BondCashFlow;

/// How often the bond pays coupons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouponFrequency {
    /// One coupon per year
    Annual,
    /// Two coupons per year
    SemiAnnual,
}

impl CouponFrequency {
    /// Coupons per year
    pub fn per_year(&self) -> u32 {
        match self {
            CouponFrequency::Annual => 1,
            CouponFrequency::SemiAnnual => 2,
        }
    }

    /// Months between consecutive coupons
    pub fn period_months(&self) -> u32 {
        12 / self.per_year()
    }
}

/// How the position is unwound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SaleTerms {
    /// Held to maturity; redeemed at exactly 100
    AtMaturity,
    /// Sold before maturity at a user-supplied clean price
    Early {
        /// Sale date, ISO `YYYY-MM-DD`
        date: String,
        /// Clean sale price per 100 of face value
        unit_price: f64,
    },
}

/// Terms of a fixed-coupon bond position
///
/// `coupon_rate` and `nominal_value` are string-typed at the boundary:
/// callers may pass locale-formatted text, and malformed values fail
/// explicitly instead of propagating NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondInputs {
    /// Clean purchase price per 100 of face value
    pub unit_price: f64,

    /// Commission charged at purchase
    pub purchase_commission: f64,

    /// Commission charged at an early sale
    pub sale_commission: f64,

    /// Annual coupon rate in percent, as text (e.g. "3.75")
    pub coupon_rate: String,

    /// Face value of the position, as text (e.g. "10000")
    pub nominal_value: String,

    /// Issue date, ISO `YYYY-MM-DD`
    pub issue_date: String,

    /// Maturity date, ISO `YYYY-MM-DD`
    pub maturity_date: String,

    /// Purchase date, ISO `YYYY-MM-DD`
    pub purchase_date: String,

    /// Government bonds are taxed at 12.5%, everything else at 26%
    pub government: bool,

    /// Coupon payment frequency
    pub coupon_frequency: CouponFrequency,

    /// Hold-to-maturity or early sale
    pub sale: SaleTerms,
}

/// Computed bond ledger and summary metrics.
///
/// Monetary and percentage metrics are formatted to 2 decimal places for
/// direct display; the ledger keeps full-precision amounts. The IRR
/// fields carry companion convergence flags: a rate of `"0.00"` with the
/// flag unset means the solver found no rate, not a true 0% return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondResult {
    /// The complete dated ledger, in generation order
    pub cash_flows: Vec<BondCashFlow>,

    /// Sum of all ledger amounts with taxes added back
    pub total_gross_yield: String,

    /// Sum of all ledger amounts
    pub total_net_yield: String,

    /// Annualized gross yield, percent (gross IRR)
    pub annual_gross_yield_pct: String,

    /// Annualized net yield, percent (net IRR)
    pub annual_net_yield_pct: String,

    /// Annualized gross yield on the invested capital
    pub annual_gross_yield_value: String,

    /// Annualized net yield on the invested capital
    pub annual_net_yield_value: String,

    /// Accrued interest paid to the seller at purchase
    pub accrued_interest: String,

    /// Units purchased times clean unit price
    pub invested_capital: String,

    /// Number of 100-face-value units held
    pub number_of_units: u64,

    /// Tax on the capital gain at sale/maturity
    pub capital_gain_tax: String,

    /// Principal return plus accrued received, net of taxes on both
    pub final_net_value: String,

    /// Purchase commission plus sale commission (early sale only)
    pub total_commissions: String,

    /// Internal rate of return excluding tax rows, percent
    pub irr_gross: String,

    /// Internal rate of return over the full ledger, percent
    pub irr_net: String,

    /// Whether the gross IRR solve converged
    pub irr_gross_converged: bool,

    /// Whether the net IRR solve converged
    pub irr_net_converged: bool,
}
