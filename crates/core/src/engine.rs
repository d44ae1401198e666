use crate::domain::fund::FundRecord;
use crate::domain::recommendation::RecommendationResult;
use crate::projection::{years_to_target, ProjectionError};

/// Annual return assumed for a fund when projecting contributions.
pub trait ReturnAssumption {
    fn annual_rate(&self, fund: &FundRecord) -> f64;
}

/// Same rate for every fund. NAV plays no part in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRate(pub f64);

impl ReturnAssumption for FixedRate {
    fn annual_rate(&self, _fund: &FundRecord) -> f64 {
        self.0
    }
}

/// Funds whose projected time to `target_amount` fits inside `horizon_years`, fastest first.
///
/// Contributions start from zero. A fund whose zero-growth projection runs past
/// [`MAX_PROJECTION_MONTHS`](crate::projection::MAX_PROJECTION_MONTHS) is left out like any
/// other fund past the horizon; invalid amounts or rates are returned as errors.
pub fn recommend_funds(
    funds: &[FundRecord],
    monthly_investment: f64,
    target_amount: f64,
    horizon_years: f64,
    returns: &impl ReturnAssumption,
) -> Result<Vec<RecommendationResult>, ProjectionError> {
    let mut out = Vec::new();

    for fund in funds {
        let rate = returns.annual_rate(fund);
        let years = match years_to_target(0.0, monthly_investment, target_amount, rate) {
            Ok(years) => years,
            Err(ProjectionError::ExceedsMaxMonths { .. }) => continue,
            Err(e) => return Err(e),
        };

        if years <= horizon_years {
            out.push(RecommendationResult {
                code: fund.code.clone(),
                name: fund.name.clone(),
                price: fund.price,
                years_to_target: years,
            });
        }
    }

    // Stable: equal projections keep feed order.
    out.sort_by(|a, b| a.years_to_target.total_cmp(&b.years_to_target));

    tracing::debug!(
        funds = funds.len(),
        qualifying = out.len(),
        monthly_investment,
        target_amount,
        horizon_years,
        "computed recommendations"
    );

    Ok(out)
}
