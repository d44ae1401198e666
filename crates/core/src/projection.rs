use std::fmt;

/// Upper bound on simulated months (100 years) when contributions do not compound.
///
/// With any effective growth the month count grows logarithmically in the target and the
/// simulation runs uncapped.
pub const MAX_PROJECTION_MONTHS: u32 = 1200;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Contribution is zero, negative or NaN while the target is still ahead; the
    /// simulation would never converge.
    NonPositiveContribution { monthly_contribution: f64 },
    InvalidAmount { field: &'static str, value: f64 },
    InvalidRate { annual_rate: f64 },
    ExceedsMaxMonths { max_months: u32 },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveContribution {
                monthly_contribution,
            } => write!(
                f,
                "monthly contribution must be > 0 to reach the target (got {monthly_contribution})"
            ),
            Self::InvalidAmount { field, value } => {
                write!(f, "{field} must be a finite, non-negative amount (got {value})")
            }
            Self::InvalidRate { annual_rate } => write!(
                f,
                "annual rate must be a finite, non-negative number (got {annual_rate})"
            ),
            Self::ExceedsMaxMonths { max_months } => {
                write!(f, "target not reached within {max_months} months")
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Years needed for monthly contributions to grow from `initial_amount` to
/// `target_amount` at `annual_rate`, compounded monthly.
///
/// Steps whole months: contribution first, then growth. The result is always a
/// multiple of 1/12.
pub fn years_to_target(
    initial_amount: f64,
    monthly_contribution: f64,
    target_amount: f64,
    annual_rate: f64,
) -> Result<f64, ProjectionError> {
    if !initial_amount.is_finite() || initial_amount < 0.0 {
        return Err(ProjectionError::InvalidAmount {
            field: "initial amount",
            value: initial_amount,
        });
    }
    if !target_amount.is_finite() {
        return Err(ProjectionError::InvalidAmount {
            field: "target amount",
            value: target_amount,
        });
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(ProjectionError::InvalidRate { annual_rate });
    }

    let mut total = initial_amount;
    if total >= target_amount {
        return Ok(0.0);
    }

    if !(monthly_contribution.is_finite() && monthly_contribution > 0.0) {
        return Err(ProjectionError::NonPositiveContribution {
            monthly_contribution,
        });
    }

    let growth = 1.0 + annual_rate / 12.0;
    // Zero (or rounded-away) growth is plain accumulation and can stall once the total
    // outgrows f64 precision.
    let capped = growth == 1.0;
    let mut months: u32 = 0;
    while total < target_amount {
        if capped && months >= MAX_PROJECTION_MONTHS {
            return Err(ProjectionError::ExceedsMaxMonths {
                max_months: MAX_PROJECTION_MONTHS,
            });
        }
        total += monthly_contribution;
        total *= growth;
        months += 1;
    }

    Ok(f64::from(months) / 12.0)
}
