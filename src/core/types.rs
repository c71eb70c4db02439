use serde::Serialize;

/// Normalized inputs for a single projection. Rates are annual fractions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    pub home_price: f64,
    pub down_percent: f64,
    pub closing_cost_percent: f64,
    pub loan_term_years: i32,
    pub interest_rate: f64,
    pub analysis_years: u32,
    pub property_tax_rate: f64,
    pub maintenance_rate: f64,
    pub insurance_annual: f64,
    pub hoa_monthly: f64,
    pub appreciation_rate: f64,
    pub monthly_rent: f64,
    pub rent_growth_rate: f64,
    pub investment_return: f64,
}

impl Assumptions {
    pub fn down_payment(&self) -> f64 {
        self.home_price * self.down_percent
    }

    pub fn closing_costs(&self) -> f64 {
        self.home_price * self.closing_cost_percent
    }

    pub fn loan_amount(&self) -> f64 {
        (self.home_price - self.down_payment()).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRow {
    pub year: u32,
    pub home_value: f64,
    pub balance: f64,
    pub equity: f64,
    pub owner_cash: f64,
    pub owner_net_cost: f64,
    pub rent_paid: f64,
    pub rent_vs_own: f64,
    pub renter_portfolio: f64,
}

impl YearRow {
    /// Renting has cost more than owning so far.
    pub fn owning_ahead(&self) -> bool {
        self.rent_vs_own > 0.0
    }
}

/// One month of mortgage activity. Only months with a payment are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRow {
    pub month: u32,
    pub year: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub down_payment: f64,
    pub closing_costs: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub rows: Vec<YearRow>,
    pub totals: Option<YearRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<MonthRow>,
}

impl ProjectionResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
