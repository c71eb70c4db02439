use rayon::prelude::*;
use serde::Serialize;

use super::summary::{BreakEven, find_break_even};
use super::types::YearRow;
use super::{Assumptions, run_projection};
use crate::error::RentOwnError;

pub const MAX_SWEEP_POINTS: usize = 1_000;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepField {
    HomePrice,
    DownPercent,
    InterestRate,
    AppreciationRate,
    MonthlyRent,
    RentGrowthRate,
    InvestmentReturn,
}

impl SweepField {
    /// Rate fields are fractions in [`Assumptions`] but entered as percentages.
    pub fn is_rate(self) -> bool {
        !matches!(self, SweepField::HomePrice | SweepField::MonthlyRent)
    }

    fn apply(self, assumptions: &mut Assumptions, value: f64) {
        match self {
            SweepField::HomePrice => assumptions.home_price = value,
            SweepField::DownPercent => assumptions.down_percent = value,
            SweepField::InterestRate => assumptions.interest_rate = value,
            SweepField::AppreciationRate => assumptions.appreciation_rate = value,
            SweepField::MonthlyRent => assumptions.monthly_rent = value,
            SweepField::RentGrowthRate => assumptions.rent_growth_rate = value,
            SweepField::InvestmentReturn => assumptions.investment_return = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepPoint {
    pub value: f64,
    pub totals: Option<YearRow>,
    pub break_even: Option<BreakEven>,
}

/// Inclusive grid `start, start + step, ..., <= end`.
pub fn sweep_values(start: f64, end: f64, step: f64) -> Result<Vec<f64>, RentOwnError> {
    if !start.is_finite() || !end.is_finite() || !step.is_finite() {
        return Err(RentOwnError::InvalidConfig(
            "sweep bounds and step must be finite".to_string(),
        ));
    }
    if step <= 0.0 {
        return Err(RentOwnError::InvalidConfig("sweep step must be > 0".to_string()));
    }
    if end < start {
        return Err(RentOwnError::InvalidConfig(
            "sweep end must be >= start".to_string(),
        ));
    }

    // Small slack so 0.1-style steps still land on `end`.
    let span = ((end - start) / step + 1e-9).floor();
    if span >= MAX_SWEEP_POINTS as f64 {
        return Err(RentOwnError::InvalidConfig(format!(
            "sweep would produce more than {MAX_SWEEP_POINTS} points"
        )));
    }

    Ok((0..=span as usize)
        .map(|i| start + step * i as f64)
        .collect())
}

/// Project every value of `field` independently. Output order follows `values`.
pub fn run_sweep(base: &Assumptions, field: SweepField, values: &[f64]) -> Vec<SweepPoint> {
    values
        .par_iter()
        .map(|&value| {
            let mut assumptions = base.clone();
            field.apply(&mut assumptions, value);
            let result = run_projection(&assumptions);
            SweepPoint {
                value,
                totals: result.totals,
                break_even: find_break_even(&result.rows),
            }
        })
        .collect()
}
