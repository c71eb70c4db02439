use std::fs;
use std::path::Path;

use log::warn;

use crate::core::{RawAssumptions, RawValue};
use crate::error::RentOwnError;

pub const DEFAULT_PORT: u16 = 8080;
pub const PORT_ENV: &str = "RENT_VS_OWN_PORT";

/// Load raw assumptions from a `.toml` or `.json` scenario file.
pub fn load_scenario(path: &Path) -> Result<RawAssumptions, RentOwnError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "toml" => parse_scenario_toml(&fs::read_to_string(path)?),
        "json" => parse_scenario_json(&fs::read_to_string(path)?),
        _ => Err(RentOwnError::UnsupportedFormat(format!(
            ".{ext} (use .toml or .json)"
        ))),
    }
}

pub fn parse_scenario_toml(text: &str) -> Result<RawAssumptions, RentOwnError> {
    Ok(toml::from_str(text)?)
}

pub fn parse_scenario_json(text: &str) -> Result<RawAssumptions, RentOwnError> {
    Ok(serde_json::from_str(text)?)
}

/// Scenario used by the command line when no file is given.
pub fn starter_scenario() -> RawAssumptions {
    let n = |v: f64| Some(RawValue::Number(v));
    RawAssumptions {
        home_price: n(500_000.0),
        down_percent: n(20.0),
        closing_cost_percent: n(2.0),
        loan_term_years: n(30.0),
        interest_rate: n(6.0),
        analysis_years: n(10.0),
        property_tax_rate: n(1.2),
        maintenance_rate: n(1.0),
        insurance_annual: n(1_500.0),
        hoa_monthly: n(0.0),
        appreciation_rate: n(3.0),
        monthly_rent: n(2_200.0),
        rent_growth_rate: n(3.0),
        investment_return: n(5.0),
    }
}

/// Port from the command line, then `RENT_VS_OWN_PORT`, then the default.
pub fn resolve_port(arg: Option<u16>) -> u16 {
    resolve_port_from(arg, std::env::var(PORT_ENV).ok())
}

fn resolve_port_from(arg: Option<u16>, env_value: Option<String>) -> u16 {
    if let Some(port) = arg {
        return port;
    }
    match env_value {
        Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
            warn!("{PORT_ENV}={raw} is not a valid port, using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}
