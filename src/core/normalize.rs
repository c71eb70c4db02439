use serde::Deserialize;
use serde::de::IgnoredAny;

use super::types::Assumptions;

pub const MIN_ANALYSIS_YEARS: u32 = 1;
pub const MAX_ANALYSIS_YEARS: u32 = 40;
pub const DEFAULT_ANALYSIS_YEARS: f64 = 10.0;
pub const DEFAULT_LOAN_TERM_YEARS: f64 = 30.0;

/// A single user-supplied field as it arrived: a number, some text, or anything else.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawValue {
    /// The value as a finite number, if it has one.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(text) => text
                .trim()
                .trim_end_matches('%')
                .trim_end()
                .replace(',', "")
                .parse::<f64>()
                .ok()?,
            RawValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// Unvalidated assumptions, percent-style rates in whole numbers (7.5 means 7.5%).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAssumptions {
    #[serde(alias = "home_price")]
    pub home_price: Option<RawValue>,
    #[serde(alias = "down_percent")]
    pub down_percent: Option<RawValue>,
    #[serde(alias = "closing_cost_percent")]
    pub closing_cost_percent: Option<RawValue>,
    #[serde(alias = "loan_term_years")]
    pub loan_term_years: Option<RawValue>,
    #[serde(alias = "interest_rate")]
    pub interest_rate: Option<RawValue>,
    #[serde(alias = "analysis_years")]
    pub analysis_years: Option<RawValue>,
    #[serde(alias = "property_tax_rate")]
    pub property_tax_rate: Option<RawValue>,
    #[serde(alias = "maintenance_rate")]
    pub maintenance_rate: Option<RawValue>,
    #[serde(alias = "insurance_annual")]
    pub insurance_annual: Option<RawValue>,
    #[serde(alias = "hoa_monthly")]
    pub hoa_monthly: Option<RawValue>,
    #[serde(alias = "appreciation_rate")]
    pub appreciation_rate: Option<RawValue>,
    #[serde(alias = "monthly_rent")]
    pub monthly_rent: Option<RawValue>,
    #[serde(alias = "rent_growth_rate")]
    pub rent_growth_rate: Option<RawValue>,
    #[serde(alias = "investment_return")]
    pub investment_return: Option<RawValue>,
}

impl RawAssumptions {
    /// Replace every field that `other` sets.
    pub fn overlay(&mut self, other: RawAssumptions) {
        fn take(slot: &mut Option<RawValue>, value: Option<RawValue>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.home_price, other.home_price);
        take(&mut self.down_percent, other.down_percent);
        take(&mut self.closing_cost_percent, other.closing_cost_percent);
        take(&mut self.loan_term_years, other.loan_term_years);
        take(&mut self.interest_rate, other.interest_rate);
        take(&mut self.analysis_years, other.analysis_years);
        take(&mut self.property_tax_rate, other.property_tax_rate);
        take(&mut self.maintenance_rate, other.maintenance_rate);
        take(&mut self.insurance_annual, other.insurance_annual);
        take(&mut self.hoa_monthly, other.hoa_monthly);
        take(&mut self.appreciation_rate, other.appreciation_rate);
        take(&mut self.monthly_rent, other.monthly_rent);
        take(&mut self.rent_growth_rate, other.rent_growth_rate);
        take(&mut self.investment_return, other.investment_return);
    }
}

fn finite(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(RawValue::as_finite)
}

fn amount(value: &Option<RawValue>) -> f64 {
    finite(value).unwrap_or(0.0)
}

fn percent(value: &Option<RawValue>) -> f64 {
    amount(value) / 100.0
}

fn whole_years(value: &Option<RawValue>, default: f64) -> f64 {
    finite(value).unwrap_or(default).trunc()
}

/// Resolve raw input into assumptions. Never fails: bad fields fall back to defaults.
pub fn normalize(raw: &RawAssumptions) -> Assumptions {
    let analysis_years = whole_years(&raw.analysis_years, DEFAULT_ANALYSIS_YEARS)
        .clamp(f64::from(MIN_ANALYSIS_YEARS), f64::from(MAX_ANALYSIS_YEARS))
        as u32;

    Assumptions {
        home_price: amount(&raw.home_price),
        down_percent: percent(&raw.down_percent),
        closing_cost_percent: percent(&raw.closing_cost_percent),
        // `as` saturates at the i32 bounds.
        loan_term_years: whole_years(&raw.loan_term_years, DEFAULT_LOAN_TERM_YEARS) as i32,
        interest_rate: percent(&raw.interest_rate),
        analysis_years,
        property_tax_rate: percent(&raw.property_tax_rate),
        maintenance_rate: percent(&raw.maintenance_rate),
        insurance_annual: amount(&raw.insurance_annual),
        hoa_monthly: amount(&raw.hoa_monthly),
        appreciation_rate: percent(&raw.appreciation_rate),
        monthly_rent: amount(&raw.monthly_rent),
        rent_growth_rate: percent(&raw.rent_growth_rate),
        investment_return: percent(&raw.investment_return),
    }
}
