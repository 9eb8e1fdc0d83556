use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the authenticated owner of a response, as resolved by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Returns `None` for blank identifiers; every operation requires a real owner.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reporting period token such as `2023-24`.
///
/// Ordering is plain string ordering, so `"2021-22" < "2022-23" < "2023-24"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiscalYear(String);

impl FiscalYear {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub Uuid);

impl ResponseId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw annual figures for one fiscal year. `None` means "not reported", which is kept distinct
/// from a reported zero all the way to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsgFigures {
    pub total_electricity_kwh: Option<f64>,
    pub renewable_electricity_kwh: Option<f64>,
    pub total_fuel_liters: Option<f64>,
    pub carbon_emissions_tco2e: Option<f64>,
    pub total_employees: Option<u32>,
    pub female_employees: Option<u32>,
    pub avg_training_hours: Option<f64>,
    pub community_investment_inr: Option<f64>,
    pub independent_board_pct: Option<f64>,
    pub has_data_privacy_policy: Option<bool>,
    pub total_revenue_inr: Option<f64>,
}

/// Validated write request: the owner, the fiscal year and the coerced figures.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDraft {
    pub user_id: UserId,
    pub fiscal_year: FiscalYear,
    pub figures: EsgFigures,
}

/// Persisted response for one (user, fiscal year) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsgResponse {
    pub id: ResponseId,
    pub user_id: UserId,
    pub fiscal_year: FiscalYear,
    #[serde(flatten)]
    pub figures: EsgFigures,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EsgResponse {
    /// First save for a key: fresh identifier, both timestamps set to `now`.
    pub fn create(draft: ResponseDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ResponseId::generate(),
            user_id: draft.user_id,
            fiscal_year: draft.fiscal_year,
            figures: draft.figures,
            created_at: now,
            updated_at: now,
        }
    }

    /// Later save for the same key: identifier and creation time survive, every figure is
    /// replaced.
    pub fn replace_figures(&mut self, figures: EsgFigures, now: DateTime<Utc>) {
        self.figures = figures;
        self.updated_at = now;
    }
}
