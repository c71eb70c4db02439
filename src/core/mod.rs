mod engine;
mod normalize;
mod solver;
mod summary;
mod sweep;
mod types;

pub use engine::{monthly_payment, run_projection, run_projection_with_schedule};
pub use normalize::{
    DEFAULT_ANALYSIS_YEARS, DEFAULT_LOAN_TERM_YEARS, MAX_ANALYSIS_YEARS, MIN_ANALYSIS_YEARS,
    RawAssumptions, RawValue, normalize,
};
pub use solver::{
    BreakEvenConfig, BreakEvenResult, GoalType, MAX_SOLVER_ITERATIONS, SolveIteration,
    solve_break_even,
};
pub use summary::{BreakEven, Leader, Summary, find_break_even, summarize};
pub use sweep::{MAX_SWEEP_POINTS, SweepField, SweepPoint, run_sweep, sweep_values};
pub use types::{Assumptions, MonthRow, ProjectionResult, YearRow};
