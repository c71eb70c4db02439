use log::debug;

use super::types::{Assumptions, MonthRow, ProjectionResult, YearRow};

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, Copy)]
struct MonthlyFlow {
    payment: f64,
    interest: f64,
    principal: f64,
}

#[derive(Debug, Clone, Copy)]
struct Loan {
    balance: f64,
    payment: f64,
    monthly_rate: f64,
    months_term: u64,
    months_elapsed: u64,
}

impl Loan {
    fn new(assumptions: &Assumptions) -> Self {
        let loan_amount = assumptions.loan_amount();
        Self {
            balance: if assumptions.loan_term_years > 0 {
                loan_amount
            } else {
                0.0
            },
            payment: monthly_payment(
                loan_amount,
                assumptions.interest_rate,
                assumptions.loan_term_years,
            ),
            monthly_rate: assumptions.interest_rate / 12.0,
            months_term: term_months(assumptions.loan_term_years),
            months_elapsed: 0,
        }
    }

    fn is_retired(&self) -> bool {
        self.months_elapsed >= self.months_term || self.balance <= 0.0
    }

    fn step_month(&mut self) -> Option<MonthlyFlow> {
        if self.is_retired() {
            return None;
        }

        let interest = if self.monthly_rate == 0.0 {
            0.0
        } else {
            self.balance * self.monthly_rate
        };
        let mut payment = self.payment;
        let mut principal = (payment - interest).max(0.0);

        // The last scheduled month clears whatever rounding left behind.
        let final_month = self.months_elapsed + 1 == self.months_term;
        if principal > self.balance || final_month {
            principal = self.balance;
            payment = principal + interest;
        }

        self.balance = (self.balance - principal).max(0.0);
        self.months_elapsed += 1;

        Some(MonthlyFlow {
            payment,
            interest,
            principal,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct RunningTotals {
    owner_cash: f64,
    rent_paid: f64,
    renter_portfolio: f64,
}

/// Fixed monthly payment that retires `loan_amount` over the term.
pub fn monthly_payment(loan_amount: f64, interest_rate: f64, loan_term_years: i32) -> f64 {
    if loan_amount <= 0.0 || loan_term_years <= 0 {
        return 0.0;
    }
    let months_term = term_months(loan_term_years) as f64;
    let monthly_rate = interest_rate / 12.0;
    if monthly_rate == 0.0 {
        return loan_amount / months_term;
    }
    let discount = (1.0 + monthly_rate).powf(-months_term);
    loan_amount * monthly_rate / (1.0 - discount)
}

fn term_months(loan_term_years: i32) -> u64 {
    (loan_term_years.max(0) as u64 * u64::from(MONTHS_PER_YEAR)).max(1)
}

pub fn run_projection(assumptions: &Assumptions) -> ProjectionResult {
    project(assumptions, false)
}

/// Same yearly rows as [`run_projection`], plus the month-by-month amortization schedule.
pub fn run_projection_with_schedule(assumptions: &Assumptions) -> ProjectionResult {
    project(assumptions, true)
}

fn project(assumptions: &Assumptions, record_schedule: bool) -> ProjectionResult {
    let down_payment = assumptions.down_payment();
    let closing_costs = assumptions.closing_costs();
    let mut loan = Loan::new(assumptions);
    let upfront = down_payment + closing_costs;
    let mut totals = RunningTotals {
        owner_cash: upfront,
        rent_paid: 0.0,
        renter_portfolio: upfront.max(0.0),
    };

    let mut rows = Vec::with_capacity(assumptions.analysis_years as usize);
    let mut schedule = Vec::new();

    for year in 1..=assumptions.analysis_years {
        let mut year_mortgage_payment = 0.0;
        for month_of_year in 1..=MONTHS_PER_YEAR {
            let Some(flow) = loan.step_month() else {
                break;
            };
            year_mortgage_payment += flow.payment;
            if record_schedule {
                schedule.push(MonthRow {
                    month: (year - 1) * MONTHS_PER_YEAR + month_of_year,
                    year,
                    payment: flow.payment,
                    interest: flow.interest,
                    principal: flow.principal,
                    balance: loan.balance,
                });
            }
        }

        rows.push(aggregate_year(
            assumptions,
            year,
            year_mortgage_payment,
            loan.balance,
            &mut totals,
        ));
    }

    debug!(
        "projected {} years: loan {:.2}, payment {:.2}",
        rows.len(),
        assumptions.loan_amount(),
        loan.payment
    );

    ProjectionResult {
        down_payment,
        closing_costs,
        loan_amount: assumptions.loan_amount(),
        monthly_payment: loan.payment,
        totals: rows.last().copied(),
        rows,
        schedule,
    }
}

fn aggregate_year(
    assumptions: &Assumptions,
    year: u32,
    year_mortgage_payment: f64,
    balance: f64,
    totals: &mut RunningTotals,
) -> YearRow {
    let home_value = assumptions.home_price * (1.0 + assumptions.appreciation_rate).powi(year as i32);
    let property_tax = home_value * assumptions.property_tax_rate;
    let maintenance = home_value * assumptions.maintenance_rate;
    let hoa_annual = assumptions.hoa_monthly * 12.0;
    let ownership_cost = year_mortgage_payment
        + property_tax
        + maintenance
        + hoa_annual
        + assumptions.insurance_annual;

    totals.owner_cash += ownership_cost;
    let equity = (home_value - balance).max(0.0);
    let owner_net_cost = totals.owner_cash - equity;

    let rent_this_year = assumptions.monthly_rent
        * 12.0
        * (1.0 + assumptions.rent_growth_rate).powi(year as i32 - 1);
    totals.rent_paid += rent_this_year;

    totals.renter_portfolio = (totals.renter_portfolio * (1.0 + assumptions.investment_return)
        + (ownership_cost - rent_this_year))
        .max(0.0);

    YearRow {
        year,
        home_value,
        balance,
        equity,
        owner_cash: totals.owner_cash,
        owner_net_cost,
        rent_paid: totals.rent_paid,
        rent_vs_own: totals.rent_paid - owner_net_cost,
        renter_portfolio: totals.renter_portfolio,
    }
}
