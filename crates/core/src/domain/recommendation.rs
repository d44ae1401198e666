use anyhow::ensure;
use serde::{Deserialize, Serialize};

pub const MIN_MONTHLY_INVESTMENT: f64 = 100.0;
pub const MIN_TARGET_AMOUNT: f64 = 1000.0;
pub const HORIZON_YEARS_RANGE: std::ops::RangeInclusive<u32> = 1..=30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub years_to_target: f64,
}

/// What the investor enters on the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestorInputs {
    pub monthly_investment: f64,
    pub target_amount: f64,
    pub horizon_years: u32,
}

impl Default for InvestorInputs {
    fn default() -> Self {
        Self {
            monthly_investment: 10_000.0,
            target_amount: 1_000_000.0,
            horizon_years: 10,
        }
    }
}

impl InvestorInputs {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.monthly_investment.is_finite() && self.monthly_investment >= MIN_MONTHLY_INVESTMENT,
            "monthly investment must be at least {MIN_MONTHLY_INVESTMENT} (got {})",
            self.monthly_investment
        );
        ensure!(
            self.target_amount.is_finite() && self.target_amount >= MIN_TARGET_AMOUNT,
            "target amount must be at least {MIN_TARGET_AMOUNT} (got {})",
            self.target_amount
        );
        ensure!(
            HORIZON_YEARS_RANGE.contains(&self.horizon_years),
            "investment horizon must be {}..={} years (got {})",
            HORIZON_YEARS_RANGE.start(),
            HORIZON_YEARS_RANGE.end(),
            self.horizon_years
        );
        Ok(())
    }
}
