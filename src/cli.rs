use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use crate::config::{load_scenario, resolve_port, starter_scenario};
use crate::core::{
    Assumptions, BreakEvenConfig, GoalType, RawAssumptions, RawValue, SweepField, normalize,
    run_projection, run_projection_with_schedule, run_sweep, solve_break_even, summarize,
    sweep_values,
};
use crate::report::{format_break_even, format_projection, format_schedule, format_sweep};

#[derive(Parser, Debug)]
#[command(
    name = "rent-vs-own",
    about = "Year-by-year comparison of buying a home versus renting and investing the difference",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project owner and renter balances year by year
    Project {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Print the projection as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Include the monthly amortization schedule
        #[arg(long)]
        schedule: bool,
    },

    /// Solve for the value at which renting and owning break even by the final year
    Solve {
        #[command(flatten)]
        scenario: ScenarioArgs,

        #[arg(long, value_enum)]
        goal: CliGoal,

        /// Lower search bound (percent for appreciation-rate)
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,

        /// Upper search bound (percent for appreciation-rate)
        #[arg(long, allow_hyphen_values = true)]
        max: Option<f64>,

        /// Stop once the bracket is this narrow (percent for appreciation-rate)
        #[arg(long)]
        tolerance: Option<f64>,

        #[arg(long)]
        max_iterations: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Re-run the projection across a range of values for one assumption
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,

        #[arg(long, value_enum)]
        field: CliSweepField,

        /// First value (percent for rate fields)
        #[arg(long, allow_hyphen_values = true)]
        from: f64,

        /// Last value (percent for rate fields)
        #[arg(long, allow_hyphen_values = true)]
        to: f64,

        #[arg(long)]
        step: f64,

        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API and web page
    Serve {
        /// Port to listen on (defaults to $RENT_VS_OWN_PORT or 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliGoal {
    MonthlyRent,
    HomePrice,
    AppreciationRate,
}

impl From<CliGoal> for GoalType {
    fn from(value: CliGoal) -> Self {
        match value {
            CliGoal::MonthlyRent => GoalType::MonthlyRent,
            CliGoal::HomePrice => GoalType::HomePrice,
            CliGoal::AppreciationRate => GoalType::AppreciationRate,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliSweepField {
    HomePrice,
    DownPercent,
    InterestRate,
    AppreciationRate,
    MonthlyRent,
    RentGrowthRate,
    InvestmentReturn,
}

impl From<CliSweepField> for SweepField {
    fn from(value: CliSweepField) -> Self {
        match value {
            CliSweepField::HomePrice => SweepField::HomePrice,
            CliSweepField::DownPercent => SweepField::DownPercent,
            CliSweepField::InterestRate => SweepField::InterestRate,
            CliSweepField::AppreciationRate => SweepField::AppreciationRate,
            CliSweepField::MonthlyRent => SweepField::MonthlyRent,
            CliSweepField::RentGrowthRate => SweepField::RentGrowthRate,
            CliSweepField::InvestmentReturn => SweepField::InvestmentReturn,
        }
    }
}

/// Assumption overrides. Rates are in percent, e.g. `--interest-rate 6.5`.
#[derive(Args, Debug, Default)]
pub struct ScenarioArgs {
    /// TOML or JSON scenario file used instead of the built-in starter scenario
    #[arg(long)]
    pub scenario: Option<PathBuf>,
    #[arg(long)]
    pub home_price: Option<f64>,
    #[arg(long, help = "Down payment in percent of the price")]
    pub down_percent: Option<f64>,
    #[arg(long, help = "Closing costs in percent of the price")]
    pub closing_cost_percent: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub loan_term_years: Option<f64>,
    #[arg(long, help = "Annual mortgage rate in percent")]
    pub interest_rate: Option<f64>,
    #[arg(long, allow_hyphen_values = true, help = "Years to project (clamped to 1-40)")]
    pub analysis_years: Option<f64>,
    #[arg(long, help = "Annual property tax in percent of home value")]
    pub property_tax_rate: Option<f64>,
    #[arg(long, help = "Annual maintenance in percent of home value")]
    pub maintenance_rate: Option<f64>,
    #[arg(long)]
    pub insurance_annual: Option<f64>,
    #[arg(long)]
    pub hoa_monthly: Option<f64>,
    #[arg(long, allow_hyphen_values = true, help = "Annual home appreciation in percent")]
    pub appreciation_rate: Option<f64>,
    #[arg(long)]
    pub monthly_rent: Option<f64>,
    #[arg(long, allow_hyphen_values = true, help = "Annual rent growth in percent")]
    pub rent_growth_rate: Option<f64>,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Annual return on the renter's invested cash in percent"
    )]
    pub investment_return: Option<f64>,
}

impl ScenarioArgs {
    fn overrides(&self) -> RawAssumptions {
        let v = |value: Option<f64>| value.map(RawValue::Number);
        RawAssumptions {
            home_price: v(self.home_price),
            down_percent: v(self.down_percent),
            closing_cost_percent: v(self.closing_cost_percent),
            loan_term_years: v(self.loan_term_years),
            interest_rate: v(self.interest_rate),
            analysis_years: v(self.analysis_years),
            property_tax_rate: v(self.property_tax_rate),
            maintenance_rate: v(self.maintenance_rate),
            insurance_annual: v(self.insurance_annual),
            hoa_monthly: v(self.hoa_monthly),
            appreciation_rate: v(self.appreciation_rate),
            monthly_rent: v(self.monthly_rent),
            rent_growth_rate: v(self.rent_growth_rate),
            investment_return: v(self.investment_return),
        }
    }

    /// Scenario file (or starter scenario) with command-line flags layered on top.
    pub fn resolve(&self) -> Result<Assumptions> {
        let mut raw = match &self.scenario {
            Some(path) => {
                info!("loading scenario from {}", path.display());
                load_scenario(path)?
            }
            None => starter_scenario(),
        };
        raw.overlay(self.overrides());
        Ok(normalize(&raw))
    }
}

fn percent_if(rate: bool, value: f64) -> f64 {
    if rate { value / 100.0 } else { value }
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Project {
            scenario,
            json,
            schedule,
        } => {
            let assumptions = scenario.resolve()?;
            let result = if schedule {
                run_projection_with_schedule(&assumptions)
            } else {
                run_projection(&assumptions)
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let summary = summarize(&assumptions, &result);
                print!("{}", format_projection(&result, summary.as_ref()));
                if schedule {
                    print!("{}", format_schedule(&result.schedule));
                }
            }
        }

        Commands::Solve {
            scenario,
            goal,
            min,
            max,
            tolerance,
            max_iterations,
            json,
        } => {
            let assumptions = scenario.resolve()?;
            let goal_type = GoalType::from(goal);
            let rate = goal_type == GoalType::AppreciationRate;
            let defaults = BreakEvenConfig::for_goal(goal_type, &assumptions);
            let config = BreakEvenConfig {
                search_min: min.map_or(defaults.search_min, |v| percent_if(rate, v)),
                search_max: max.map_or(defaults.search_max, |v| percent_if(rate, v)),
                tolerance: tolerance.map_or(defaults.tolerance, |v| percent_if(rate, v)),
                max_iterations: max_iterations.unwrap_or(defaults.max_iterations),
                ..defaults
            };

            let result = solve_break_even(&assumptions, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", format_break_even(&result));
            }
        }

        Commands::Sweep {
            scenario,
            field,
            from,
            to,
            step,
            json,
        } => {
            let assumptions = scenario.resolve()?;
            let field = SweepField::from(field);
            let rate = field.is_rate();
            let values = sweep_values(
                percent_if(rate, from),
                percent_if(rate, to),
                percent_if(rate, step),
            )?;

            let points = run_sweep(&assumptions, field, &values);
            if json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                print!("{}", format_sweep(field, &points));
            }
        }

        Commands::Serve { port } => {
            crate::api::run_http_server(resolve_port(port)).await?;
        }
    }

    Ok(())
}
