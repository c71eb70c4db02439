use colored::Colorize;
use comfy_table::{
    Cell, CellAlignment, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_FULL,
};

use crate::core::{
    BreakEvenResult, GoalType, Leader, MonthRow, ProjectionResult, Summary, SweepField,
    SweepPoint,
};

pub const EMPTY_PROJECTION: &str = "No projection available";

/// Whole-dollar amount with thousands separators, e.g. `-$1,234`.
pub fn money(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money_cell(value: f64) -> Cell {
    Cell::new(money(value)).set_alignment(CellAlignment::Right)
}

pub fn format_projection(result: &ProjectionResult, summary: Option<&Summary>) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Rent vs Own Projection".bold().cyan()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    if result.is_empty() {
        output.push_str(&format!("{EMPTY_PROJECTION}\n"));
        return output;
    }

    output.push_str(&format!(
        "  Down payment:     {}\n  Closing costs:    {}\n  Loan amount:      {}\n  Monthly payment:  {}\n",
        money(result.down_payment),
        money(result.closing_costs),
        money(result.loan_amount),
        money(result.monthly_payment),
    ));

    let mut table = new_table(vec![
        "Year",
        "Home value",
        "Balance",
        "Equity",
        "Owner cash",
        "Owner net cost",
        "Rent paid",
        "Rent vs own",
        "Renter portfolio",
    ]);
    for row in &result.rows {
        table.add_row(vec![
            Cell::new(row.year),
            money_cell(row.home_value),
            money_cell(row.balance),
            money_cell(row.equity),
            money_cell(row.owner_cash),
            money_cell(row.owner_net_cost),
            money_cell(row.rent_paid),
            money_cell(row.rent_vs_own),
            money_cell(row.renter_portfolio),
        ]);
    }
    output.push_str(&format!("{table}\n"));

    if let Some(summary) = summary {
        output.push_str(&format_summary(summary));
    }
    output
}

pub fn format_summary(summary: &Summary) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Summary".bold().green()));

    let verdict = if summary.owning_ahead {
        format!(
            "Owning is ahead by {} after {} years",
            money(summary.advantage),
            summary.final_year
        )
        .green()
    } else {
        format!(
            "Renting is ahead by {} after {} years",
            money(summary.advantage),
            summary.final_year
        )
        .yellow()
    };
    output.push_str(&format!("  {verdict}\n"));

    match summary.break_even {
        Some(be) if be.owning_ahead_after => {
            output.push_str(&format!("  Break-even: owning pulls ahead in year {}\n", be.year));
        }
        Some(be) => {
            output.push_str(&format!("  Break-even: renting pulls ahead in year {}\n", be.year));
        }
        None => output.push_str("  Break-even: none within the horizon\n"),
    }

    output.push_str(&format!(
        "  Owner monthly cost (year 1):  {}\n  Renter monthly cost:          {}\n",
        money(summary.owner_monthly_cost),
        money(summary.renter_monthly_cost),
    ));
    let leader = match summary.wealth_leader {
        Leader::Owning => "owning",
        Leader::Renting => "renting",
        Leader::Tie => "tie",
    };
    output.push_str(&format!(
        "  Final equity {} vs renter portfolio {}: {}\n",
        money(summary.final_equity),
        money(summary.final_renter_portfolio),
        leader.bold()
    ));
    output
}

pub fn format_schedule(schedule: &[MonthRow]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Amortization Schedule".bold().cyan()));
    if schedule.is_empty() {
        output.push_str("  No mortgage payments\n");
        return output;
    }

    let mut table = new_table(vec!["Month", "Year", "Payment", "Interest", "Principal", "Balance"]);
    for month in schedule {
        table.add_row(vec![
            Cell::new(month.month),
            Cell::new(month.year),
            Cell::new(format!("{:.2}", month.payment)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", month.interest)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", month.principal)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", month.balance)).set_alignment(CellAlignment::Right),
        ]);
    }
    output.push_str(&format!("{table}\n"));
    output
}

fn format_goal_value(goal_type: GoalType, value: f64) -> String {
    match goal_type {
        GoalType::MonthlyRent | GoalType::HomePrice => money(value),
        GoalType::AppreciationRate => format!("{:.3}%", value * 100.0),
    }
}

pub fn format_break_even(result: &BreakEvenResult) -> String {
    let mut output = String::new();
    let goal = match result.goal_type {
        GoalType::MonthlyRent => "monthly rent",
        GoalType::HomePrice => "home price",
        GoalType::AppreciationRate => "appreciation rate",
    };
    output.push_str(&format!(
        "\n{}\n",
        format!("Break-even {goal} over {} years", result.horizon_years)
            .bold()
            .cyan()
    ));

    match result.solved_value {
        Some(value) => output.push_str(&format!(
            "  {}: {}\n",
            "Solved".green().bold(),
            format_goal_value(result.goal_type, value)
        )),
        None => output.push_str(&format!("  {}\n", "No break-even found".yellow().bold())),
    }
    if let Some(residual) = result.achieved_rent_vs_own {
        output.push_str(&format!("  Rent vs own at solution: {}\n", money(residual)));
    }
    output.push_str(&format!(
        "  {} ({} iterations)\n",
        result.message,
        result.iterations.len()
    ));
    output
}

pub fn format_sweep(field: SweepField, points: &[SweepPoint]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Sensitivity Sweep".bold().cyan()));

    let mut table = new_table(vec![
        "Value",
        "Rent vs own",
        "Leader",
        "Break-even year",
        "Equity",
        "Renter portfolio",
    ]);
    for point in points {
        let value = if field.is_rate() {
            format!("{:.2}%", point.value * 100.0)
        } else {
            money(point.value)
        };
        match point.totals {
            Some(totals) => table.add_row(vec![
                Cell::new(value),
                money_cell(totals.rent_vs_own),
                Cell::new(if totals.owning_ahead() { "owning" } else { "renting" }),
                Cell::new(
                    point
                        .break_even
                        .map(|be| be.year.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                money_cell(totals.equity),
                money_cell(totals.renter_portfolio),
            ]),
            None => table.add_row(vec![Cell::new(value), Cell::new(EMPTY_PROJECTION)]),
        };
    }
    output.push_str(&format!("{table}\n"));
    output
}
