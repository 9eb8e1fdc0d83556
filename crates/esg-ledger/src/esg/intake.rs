//! Coercion of untrusted questionnaire payloads into [`EsgFigures`].
//!
//! Clients submit numbers as JSON numbers, strings, or empty strings, and several fields arrive
//! under two spellings (`totalRevenueInr` and `totalRevenueINR`). Everything is resolved here so
//! the rest of the crate only sees the canonical schema. Bad numbers never fail a request; they
//! degrade to "not reported". A missing fiscal year always does.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::{EsgFigures, FiscalYear, ResponseDraft, UserId};

/// Raw JSON object as posted by the questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSubmission(Map<String, Value>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("missing fiscalYear")]
    MissingFiscalYear,
}

const FISCAL_YEAR: &[&str] = &["fiscalYear"];
const TOTAL_ELECTRICITY: &[&str] = &["totalElectricityKwh", "totalElectricityKWh"];
const RENEWABLE_ELECTRICITY: &[&str] = &["renewableElectricityKwh", "renewableElectricityKWh"];
const TOTAL_FUEL: &[&str] = &["totalFuelLiters"];
const CARBON_EMISSIONS: &[&str] = &["carbonEmissionsTco2e", "carbonEmissionsTCO2e"];
const TOTAL_EMPLOYEES: &[&str] = &["totalEmployees"];
const FEMALE_EMPLOYEES: &[&str] = &["femaleEmployees"];
const AVG_TRAINING_HOURS: &[&str] = &["avgTrainingHours", "avgTrainingHoursPerEmployee"];
const COMMUNITY_INVESTMENT: &[&str] = &["communityInvestmentInr", "communityInvestmentINR"];
const INDEPENDENT_BOARD: &[&str] = &["independentBoardPct"];
const DATA_PRIVACY_POLICY: &[&str] = &["hasDataPrivacyPolicy"];
const TOTAL_REVENUE: &[&str] = &["totalRevenueInr", "totalRevenueINR"];

impl ResponseSubmission {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Chainable setter used by tests and the demo seeder.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// First non-null value among the accepted spellings, canonical spelling first.
    fn field(&self, names: &[&str]) -> Option<&Value> {
        names
            .iter()
            .filter_map(|name| self.0.get(*name))
            .find(|value| !value.is_null())
    }

    pub fn fiscal_year(&self) -> Result<FiscalYear, IntakeError> {
        self.field(FISCAL_YEAR)
            .and_then(Value::as_str)
            .and_then(FiscalYear::parse)
            .ok_or(IntakeError::MissingFiscalYear)
    }

    pub fn figures(&self) -> EsgFigures {
        EsgFigures {
            total_electricity_kwh: coerce_number(self.field(TOTAL_ELECTRICITY)),
            renewable_electricity_kwh: coerce_number(self.field(RENEWABLE_ELECTRICITY)),
            total_fuel_liters: coerce_number(self.field(TOTAL_FUEL)),
            carbon_emissions_tco2e: coerce_number(self.field(CARBON_EMISSIONS)),
            total_employees: coerce_count(self.field(TOTAL_EMPLOYEES)),
            female_employees: coerce_count(self.field(FEMALE_EMPLOYEES)),
            avg_training_hours: coerce_number(self.field(AVG_TRAINING_HOURS)),
            community_investment_inr: coerce_number(self.field(COMMUNITY_INVESTMENT)),
            independent_board_pct: coerce_number(self.field(INDEPENDENT_BOARD)),
            has_data_privacy_policy: coerce_flag(self.field(DATA_PRIVACY_POLICY)),
            total_revenue_inr: coerce_number(self.field(TOTAL_REVENUE)),
        }
    }

    /// Binds the submission to its owner. Fails only when the fiscal year is missing.
    pub fn into_draft(self, user_id: UserId) -> Result<ResponseDraft, IntakeError> {
        let fiscal_year = self.fiscal_year()?;
        let figures = self.figures();
        Ok(ResponseDraft {
            user_id,
            fiscal_year,
            figures,
        })
    }
}

impl From<Map<String, Value>> for ResponseSubmission {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Absent, null and blank values are unset; anything that does not yield a finite number is
/// unset as well.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    number.filter(|number| number.is_finite())
}

/// Head counts: a coerced number that is also a whole, non-negative value within `u32`.
pub fn coerce_count(value: Option<&Value>) -> Option<u32> {
    let number = coerce_number(value)?;
    if number < 0.0 || number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return None;
    }
    Some(number as u32)
}

/// Literal booleans or the questionnaire's `Yes`/`No` answers; anything else is unknown.
pub fn coerce_flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::String(answer) => match answer.as_str() {
            "Yes" => Some(true),
            "No" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
