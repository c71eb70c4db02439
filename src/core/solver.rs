use serde::Serialize;

use super::{Assumptions, run_projection};
use crate::error::RentOwnError;

/// Upper bound on `max_iterations`; bisection on f64 stalls long before this.
pub const MAX_SOLVER_ITERATIONS: u32 = 1_000;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalType {
    MonthlyRent,
    HomePrice,
    AppreciationRate,
}

#[derive(Debug, Clone, Copy)]
pub struct BreakEvenConfig {
    pub goal_type: GoalType,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl BreakEvenConfig {
    /// Search bounds wide enough for typical markets, scaled from the current assumptions.
    pub fn for_goal(goal_type: GoalType, assumptions: &Assumptions) -> Self {
        let (search_min, search_max, tolerance) = match goal_type {
            GoalType::MonthlyRent => (0.0, (assumptions.monthly_rent * 10.0).max(10_000.0), 0.01),
            GoalType::HomePrice => (0.0, (assumptions.home_price * 10.0).max(1_000_000.0), 1.0),
            GoalType::AppreciationRate => (-0.5, 0.5, 1e-6),
        };
        Self {
            goal_type,
            search_min,
            search_max,
            tolerance,
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub rent_vs_own: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenResult {
    pub goal_type: GoalType,
    pub horizon_years: u32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    pub solved_value: Option<f64>,
    pub achieved_rent_vs_own: Option<f64>,
    pub iterations: Vec<SolveIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

/// Find the value of the goal variable at which renting and owning cost the same
/// by the final projected year.
pub fn solve_break_even(
    assumptions: &Assumptions,
    config: BreakEvenConfig,
) -> Result<BreakEvenResult, RentOwnError> {
    validate_config(assumptions, config)?;

    let mut iterations =
        Vec::with_capacity(config.max_iterations.min(MAX_SOLVER_ITERATIONS) as usize);
    let low_eval = evaluate_candidate(assumptions, config.goal_type, config.search_min);
    let high_eval = evaluate_candidate(assumptions, config.goal_type, config.search_max);

    let mut solved_value = None;
    let mut converged = false;
    let feasible;
    let message;

    if low_eval == 0.0 {
        solved_value = Some(config.search_min);
        converged = true;
        feasible = true;
        message = "Break-even sits exactly at the lower search bound.".to_string();
    } else if high_eval == 0.0 {
        solved_value = Some(config.search_max);
        converged = true;
        feasible = true;
        message = "Break-even sits exactly at the upper search bound.".to_string();
    } else if (low_eval > 0.0) == (high_eval > 0.0) {
        feasible = false;
        message = if low_eval > 0.0 {
            "Owning stays ahead across the search bounds.".to_string()
        } else {
            "Renting stays ahead across the search bounds.".to_string()
        };
    } else {
        let low_owning_ahead = low_eval > 0.0;
        let mut lo = config.search_min;
        let mut hi = config.search_max;
        let mut it = 0;
        let mut stalled = false;
        while it < config.max_iterations {
            let mid = (lo + hi) * 0.5;
            // Adjacent floats: the bracket cannot narrow any further.
            if mid <= lo || mid >= hi {
                stalled = true;
                break;
            }
            it += 1;
            let eval = evaluate_candidate(assumptions, config.goal_type, mid);
            iterations.push(SolveIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate_value: mid,
                rent_vs_own: eval,
            });

            if eval == 0.0 {
                lo = mid;
                hi = mid;
            } else if (eval > 0.0) == low_owning_ahead {
                lo = mid;
            } else {
                hi = mid;
            }

            if (hi - lo).abs() <= config.tolerance {
                converged = true;
                break;
            }
        }
        solved_value = Some((lo + hi) * 0.5);
        feasible = true;
        message = if converged {
            "Solved break-even value.".to_string()
        } else if stalled {
            "Search bracket reached floating-point precision before tolerance was met; returning best estimate."
                .to_string()
        } else {
            "Reached max iterations before tolerance was met; returning best estimate."
                .to_string()
        };
    }

    let achieved_rent_vs_own =
        solved_value.map(|value| evaluate_candidate(assumptions, config.goal_type, value));

    Ok(BreakEvenResult {
        goal_type: config.goal_type,
        horizon_years: assumptions.analysis_years,
        search_min: config.search_min,
        search_max: config.search_max,
        tolerance: config.tolerance,
        max_iterations: config.max_iterations,
        solved_value,
        achieved_rent_vs_own,
        iterations,
        converged,
        feasible,
        message,
    })
}

fn evaluate_candidate(base: &Assumptions, goal_type: GoalType, candidate_value: f64) -> f64 {
    let mut assumptions = base.clone();
    match goal_type {
        GoalType::MonthlyRent => assumptions.monthly_rent = candidate_value,
        GoalType::HomePrice => assumptions.home_price = candidate_value,
        GoalType::AppreciationRate => assumptions.appreciation_rate = candidate_value,
    }

    run_projection(&assumptions)
        .totals
        .map(|totals| totals.rent_vs_own)
        .unwrap_or(0.0)
}

fn validate_config(assumptions: &Assumptions, config: BreakEvenConfig) -> Result<(), RentOwnError> {
    let invalid = |msg: &str| -> Result<(), RentOwnError> {
        Err(RentOwnError::InvalidConfig(msg.to_string()))
    };

    if assumptions.analysis_years == 0 {
        return invalid("analysis_years must be > 0");
    }
    if !config.search_min.is_finite() || !config.search_max.is_finite() {
        return invalid("search bounds must be finite");
    }
    if config.search_max <= config.search_min {
        return invalid("search_max must be greater than search_min");
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return invalid("tolerance must be > 0");
    }
    if config.max_iterations == 0 {
        return invalid("max_iterations must be > 0");
    }
    if config.max_iterations > MAX_SOLVER_ITERATIONS {
        return Err(RentOwnError::InvalidConfig(format!(
            "max_iterations must be <= {MAX_SOLVER_ITERATIONS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn deterministic_assumptions() -> Assumptions {
        Assumptions {
            home_price: 300_000.0,
            down_percent: 0.2,
            closing_cost_percent: 0.03,
            loan_term_years: 30,
            interest_rate: 0.05,
            analysis_years: 7,
            property_tax_rate: 0.01,
            maintenance_rate: 0.01,
            insurance_annual: 1_200.0,
            hoa_monthly: 0.0,
            appreciation_rate: 0.02,
            monthly_rent: 1_500.0,
            rent_growth_rate: 0.0,
            investment_return: 0.0,
        }
    }

    #[test]
    fn monthly_rent_solver_matches_net_cost_spread() {
        let assumptions = deterministic_assumptions();
        let net_cost = run_projection(&assumptions)
            .totals
            .expect("totals present")
            .owner_net_cost;
        // Flat rent: cumulative rent is rent * 12 * years.
        let expected = net_cost / (12.0 * 7.0);

        let config = BreakEvenConfig::for_goal(GoalType::MonthlyRent, &assumptions);
        let result = solve_break_even(&assumptions, config).expect("must solve");

        assert!(result.feasible);
        assert!(result.converged);
        assert_close(
            result.solved_value.expect("value expected"),
            expected,
            config.tolerance,
        );
        assert_close(
            result.achieved_rent_vs_own.expect("evaluation expected"),
            0.0,
            config.tolerance * 12.0 * 7.0,
        );
        assert!(!result.iterations.is_empty());
    }

    #[test]
    fn appreciation_solver_converges_within_bounds() {
        let assumptions = deterministic_assumptions();
        let config = BreakEvenConfig::for_goal(GoalType::AppreciationRate, &assumptions);
        let result = solve_break_even(&assumptions, config).expect("must return result");

        assert!(result.feasible);
        let solved = result.solved_value.expect("value expected");
        assert!((config.search_min..=config.search_max).contains(&solved));
        assert_close(
            result.achieved_rent_vs_own.expect("evaluation expected"),
            0.0,
            5.0,
        );
    }

    #[test]
    fn solver_reports_infeasible_when_bounds_never_cross() {
        let assumptions = deterministic_assumptions();
        let config = BreakEvenConfig {
            goal_type: GoalType::MonthlyRent,
            search_min: 0.0,
            search_max: 10.0,
            tolerance: 0.01,
            max_iterations: 16,
        };

        let result = solve_break_even(&assumptions, config).expect("must return result");
        assert!(!result.feasible);
        assert!(result.solved_value.is_none());
        assert!(result.message.contains("Renting stays ahead"));
    }

    #[test]
    fn solver_returns_best_estimate_when_iterations_run_out() {
        let assumptions = deterministic_assumptions();
        let config = BreakEvenConfig {
            max_iterations: 3,
            ..BreakEvenConfig::for_goal(GoalType::MonthlyRent, &assumptions)
        };

        let result = solve_break_even(&assumptions, config).expect("must return result");
        assert!(result.feasible);
        assert!(!result.converged);
        assert_eq!(result.iterations.len(), 3);
        assert!(result.solved_value.is_some());
    }

    #[test]
    fn solver_rejects_unbounded_iteration_count() {
        let assumptions = deterministic_assumptions();
        let config = BreakEvenConfig {
            max_iterations: u32::MAX,
            ..BreakEvenConfig::for_goal(GoalType::MonthlyRent, &assumptions)
        };

        let err = solve_break_even(&assumptions, config).expect_err("must reject iteration count");
        assert!(matches!(err, RentOwnError::InvalidConfig(_)));
        assert!(err.to_string().contains("max_iterations"));

        let at_limit = BreakEvenConfig {
            max_iterations: MAX_SOLVER_ITERATIONS,
            ..config
        };
        assert!(solve_break_even(&assumptions, at_limit).is_ok());
    }

    #[test]
    fn solver_stops_when_bracket_cannot_narrow() {
        let assumptions = deterministic_assumptions();
        let config = BreakEvenConfig {
            tolerance: 1e-300,
            max_iterations: MAX_SOLVER_ITERATIONS,
            ..BreakEvenConfig::for_goal(GoalType::MonthlyRent, &assumptions)
        };

        let result = solve_break_even(&assumptions, config).expect("must return result");
        assert!(result.feasible);
        assert!(!result.converged);
        // A 0..15000 bracket runs out of representable midpoints within ~70 halvings.
        assert!(result.iterations.len() < 200);
        assert!(result.message.contains("floating-point precision"));

        let last = result.iterations.last().expect("iterations recorded");
        assert!(last.upper_bound - last.lower_bound < 1e-9);
    }

    #[test]
    fn solver_rejects_bad_config() {
        let assumptions = deterministic_assumptions();
        let base = BreakEvenConfig::for_goal(GoalType::HomePrice, &assumptions);

        let inverted = BreakEvenConfig {
            search_min: 10.0,
            search_max: 5.0,
            ..base
        };
        let err = solve_break_even(&assumptions, inverted).expect_err("must reject bounds");
        assert!(err.to_string().contains("search_max"));

        let no_tolerance = BreakEvenConfig {
            tolerance: 0.0,
            ..base
        };
        assert!(solve_break_even(&assumptions, no_tolerance).is_err());

        let mut empty = assumptions.clone();
        empty.analysis_years = 0;
        let err = solve_break_even(&empty, base).expect_err("must reject empty horizon");
        assert!(err.to_string().contains("analysis_years"));
    }
}
