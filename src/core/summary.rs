use serde::Serialize;

use super::types::{Assumptions, ProjectionResult, YearRow};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Leader {
    Owning,
    Renting,
    Tie,
}

/// The first year in which the rent-vs-own lead changes hands.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEven {
    pub year: u32,
    /// Owning leads from this year on (otherwise renting took the lead).
    pub owning_ahead_after: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub final_year: u32,
    pub owning_ahead: bool,
    pub advantage: f64,
    pub break_even: Option<BreakEven>,
    pub owner_monthly_cost: f64,
    pub renter_monthly_cost: f64,
    pub final_equity: f64,
    pub final_renter_portfolio: f64,
    pub wealth_leader: Leader,
}

pub fn find_break_even(rows: &[YearRow]) -> Option<BreakEven> {
    rows.windows(2)
        .find(|pair| pair[0].owning_ahead() != pair[1].owning_ahead())
        .map(|pair| BreakEven {
            year: pair[1].year,
            owning_ahead_after: pair[1].owning_ahead(),
        })
}

/// Headline figures for a finished projection; `None` when no year was projected.
pub fn summarize(assumptions: &Assumptions, result: &ProjectionResult) -> Option<Summary> {
    let totals = result.totals?;
    let first = result.rows.first()?;

    let carrying_annual = first.home_value
        * (assumptions.property_tax_rate + assumptions.maintenance_rate)
        + assumptions.insurance_annual;
    let owner_monthly_cost =
        result.monthly_payment + carrying_annual / 12.0 + assumptions.hoa_monthly;

    let wealth_leader = if totals.equity > totals.renter_portfolio {
        Leader::Owning
    } else if totals.renter_portfolio > totals.equity {
        Leader::Renting
    } else {
        Leader::Tie
    };

    Some(Summary {
        final_year: totals.year,
        owning_ahead: totals.owning_ahead(),
        advantage: totals.rent_vs_own.abs(),
        break_even: find_break_even(&result.rows),
        owner_monthly_cost,
        renter_monthly_cost: assumptions.monthly_rent,
        final_equity: totals.equity,
        final_renter_portfolio: totals.renter_portfolio,
        wealth_leader,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::run_projection;

    fn row(year: u32, rent_vs_own: f64) -> YearRow {
        YearRow {
            year,
            home_value: 0.0,
            balance: 0.0,
            equity: 0.0,
            owner_cash: 0.0,
            owner_net_cost: 0.0,
            rent_paid: 0.0,
            rent_vs_own,
            renter_portfolio: 0.0,
        }
    }

    fn sample_assumptions() -> Assumptions {
        Assumptions {
            home_price: 500_000.0,
            down_percent: 0.2,
            closing_cost_percent: 0.02,
            loan_term_years: 30,
            interest_rate: 0.06,
            analysis_years: 30,
            property_tax_rate: 0.012,
            maintenance_rate: 0.01,
            insurance_annual: 1_500.0,
            hoa_monthly: 100.0,
            appreciation_rate: 0.03,
            monthly_rent: 2_200.0,
            rent_growth_rate: 0.03,
            investment_return: 0.05,
        }
    }

    #[test]
    fn break_even_is_first_sign_change() {
        let rows = [row(1, -50.0), row(2, -10.0), row(3, 5.0), row(4, -1.0)];
        assert_eq!(
            find_break_even(&rows),
            Some(BreakEven {
                year: 3,
                owning_ahead_after: true
            })
        );
    }

    #[test]
    fn break_even_reports_renting_taking_the_lead() {
        let rows = [row(1, 10.0), row(2, 0.0)];
        assert_eq!(
            find_break_even(&rows),
            Some(BreakEven {
                year: 2,
                owning_ahead_after: false
            })
        );
    }

    #[test]
    fn no_break_even_without_sign_change() {
        assert_eq!(find_break_even(&[row(1, -3.0), row(2, -2.0)]), None);
        assert_eq!(find_break_even(&[row(1, 3.0)]), None);
        assert_eq!(find_break_even(&[]), None);
    }

    #[test]
    fn summary_reflects_totals() {
        let assumptions = sample_assumptions();
        let result = run_projection(&assumptions);
        let summary = summarize(&assumptions, &result).expect("rows were projected");
        let totals = result.totals.expect("totals present");

        assert_eq!(summary.final_year, 30);
        assert_eq!(summary.owning_ahead, totals.rent_vs_own > 0.0);
        assert_eq!(summary.advantage, totals.rent_vs_own.abs());
        assert_eq!(summary.final_equity, totals.equity);
        assert_eq!(summary.renter_monthly_cost, 2_200.0);
        assert_eq!(summary.break_even, find_break_even(&result.rows));

        let first = result.rows[0];
        let expected_monthly = result.monthly_payment
            + (first.home_value * 0.022 + 1_500.0) / 12.0
            + 100.0;
        assert!((summary.owner_monthly_cost - expected_monthly).abs() < 1e-9);
    }

    #[test]
    fn wealth_leader_compares_equity_with_portfolio() {
        let mut assumptions = sample_assumptions();
        assumptions.investment_return = 0.0;
        assumptions.monthly_rent = 100_000.0;
        let result = run_projection(&assumptions);
        let summary = summarize(&assumptions, &result).expect("rows were projected");
        assert_eq!(summary.wealth_leader, Leader::Owning);
        assert!(summary.owning_ahead);
    }

    #[test]
    fn empty_projection_has_no_summary() {
        let mut assumptions = sample_assumptions();
        assumptions.analysis_years = 0;
        let result = run_projection(&assumptions);
        assert!(summarize(&assumptions, &result).is_none());
    }
}
