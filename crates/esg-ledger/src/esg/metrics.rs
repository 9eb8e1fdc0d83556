//! Ratio calculations derived from a response on read. Nothing here is stored.
//!
//! Every metric follows one rule: a missing, zero or non-finite denominator yields exactly `0.0`,
//! as does a missing numerator or a quotient that overflows. The functions never fail.

use serde::Serialize;

use super::domain::EsgFigures;

/// Decimal digits used for carbon intensity on every output surface.
pub const CARBON_INTENSITY_PRECISION: usize = 6;
/// Decimal digits used for all percentage metrics on every output surface.
pub const PERCENT_PRECISION: usize = 2;

fn quotient(numerator: Option<f64>, denominator: Option<f64>, scale: f64) -> f64 {
    let (Some(numerator), Some(denominator)) = (numerator, denominator) else {
        return 0.0;
    };
    if !numerator.is_finite() || !denominator.is_finite() || denominator == 0.0 {
        return 0.0;
    }
    let value = scale * numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Plain ratio `numerator / denominator`.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    quotient(numerator, denominator, 1.0)
}

/// `100 × numerator / denominator`.
pub fn percentage(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    quotient(numerator, denominator, 100.0)
}

/// Emissions (T CO2e) per unit of revenue.
pub fn carbon_intensity(figures: &EsgFigures) -> f64 {
    ratio(figures.carbon_emissions_tco2e, figures.total_revenue_inr)
}

pub fn renewable_electricity_ratio(figures: &EsgFigures) -> f64 {
    percentage(
        figures.renewable_electricity_kwh,
        figures.total_electricity_kwh,
    )
}

pub fn diversity_ratio(figures: &EsgFigures) -> f64 {
    percentage(
        figures.female_employees.map(f64::from),
        figures.total_employees.map(f64::from),
    )
}

pub fn community_spend_ratio(figures: &EsgFigures) -> f64 {
    percentage(figures.community_investment_inr, figures.total_revenue_inr)
}

/// All four derived metrics for one response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EsgRatios {
    pub carbon_intensity: f64,
    pub renewable_ratio_pct: f64,
    pub diversity_ratio_pct: f64,
    pub community_ratio_pct: f64,
}

impl EsgRatios {
    pub fn from_figures(figures: &EsgFigures) -> Self {
        Self {
            carbon_intensity: carbon_intensity(figures),
            renewable_ratio_pct: renewable_electricity_ratio(figures),
            diversity_ratio_pct: diversity_ratio(figures),
            community_ratio_pct: community_spend_ratio(figures),
        }
    }

    pub fn formatted(&self) -> FormattedRatios {
        FormattedRatios {
            carbon_intensity: format_carbon_intensity(self.carbon_intensity),
            renewable_ratio_pct: format_percent(self.renewable_ratio_pct),
            diversity_ratio_pct: format_percent(self.diversity_ratio_pct),
            community_ratio_pct: format_percent(self.community_ratio_pct),
        }
    }
}

/// Display strings at the canonical precision, without unit suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRatios {
    pub carbon_intensity: String,
    pub renewable_ratio_pct: String,
    pub diversity_ratio_pct: String,
    pub community_ratio_pct: String,
}

pub fn format_carbon_intensity(value: f64) -> String {
    format!("{value:.CARBON_INTENSITY_PRECISION$}")
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.PERCENT_PRECISION$}")
}
