use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use crate::esg::domain::{
    EsgFigures, EsgResponse, FiscalYear, ResponseDraft, ResponseId, UserId,
};
use crate::esg::repository::{ResponseStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS esg_responses (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    fiscal_year TEXT NOT NULL,
    total_electricity_kwh REAL,
    renewable_electricity_kwh REAL,
    total_fuel_liters REAL,
    carbon_emissions_tco2e REAL,
    total_employees INTEGER,
    female_employees INTEGER,
    avg_training_hours REAL,
    community_investment_inr REAL,
    independent_board_pct REAL,
    has_data_privacy_policy BOOLEAN,
    total_revenue_inr REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (user_id, fiscal_year)
)";

const COLUMNS: &str = "id, user_id, fiscal_year, total_electricity_kwh, renewable_electricity_kwh, \
    total_fuel_liters, carbon_emissions_tco2e, total_employees, female_employees, \
    avg_training_hours, community_investment_inr, independent_board_pct, \
    has_data_privacy_policy, total_revenue_inr, created_at, updated_at";

/// Durable store backed by SQLite through an sqlx pool.
///
/// Upserts rely on the `UNIQUE (user_id, fiscal_year)` constraint and SQLite's native
/// `ON CONFLICT ... DO UPDATE`, so concurrent writers to one key never produce duplicates.
#[derive(Debug, Clone)]
pub struct SqliteResponseStore {
    pool: SqlitePool,
}

impl SqliteResponseStore {
    /// Opens (creating if needed) the database at `url` and ensures the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(unavailable)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        debug!("esg_responses schema ready");
        Ok(())
    }
}

#[async_trait]
impl ResponseStore for SqliteResponseStore {
    async fn upsert(&self, draft: ResponseDraft) -> Result<EsgResponse, StoreError> {
        let now = Utc::now();
        let ResponseDraft {
            user_id,
            fiscal_year,
            figures,
        } = draft;

        let statement = format!(
            "INSERT INTO esg_responses ({COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id, fiscal_year) DO UPDATE SET
                total_electricity_kwh = excluded.total_electricity_kwh,
                renewable_electricity_kwh = excluded.renewable_electricity_kwh,
                total_fuel_liters = excluded.total_fuel_liters,
                carbon_emissions_tco2e = excluded.carbon_emissions_tco2e,
                total_employees = excluded.total_employees,
                female_employees = excluded.female_employees,
                avg_training_hours = excluded.avg_training_hours,
                community_investment_inr = excluded.community_investment_inr,
                independent_board_pct = excluded.independent_board_pct,
                has_data_privacy_policy = excluded.has_data_privacy_policy,
                total_revenue_inr = excluded.total_revenue_inr,
                updated_at = excluded.updated_at
             RETURNING {COLUMNS}"
        );

        let row: ResponseRow = sqlx::query_as(&statement)
            .bind(ResponseId::generate().to_string())
            .bind(user_id.as_str())
            .bind(fiscal_year.as_str())
            .bind(figures.total_electricity_kwh)
            .bind(figures.renewable_electricity_kwh)
            .bind(figures.total_fuel_liters)
            .bind(figures.carbon_emissions_tco2e)
            .bind(figures.total_employees.map(i64::from))
            .bind(figures.female_employees.map(i64::from))
            .bind(figures.avg_training_hours)
            .bind(figures.community_investment_inr)
            .bind(figures.independent_board_pct)
            .bind(figures.has_data_privacy_policy)
            .bind(figures.total_revenue_inr)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        row.try_into()
    }

    async fn get(
        &self,
        user_id: &UserId,
        fiscal_year: &FiscalYear,
    ) -> Result<Option<EsgResponse>, StoreError> {
        let statement =
            format!("SELECT {COLUMNS} FROM esg_responses WHERE user_id = ? AND fiscal_year = ?");
        let row: Option<ResponseRow> = sqlx::query_as(&statement)
            .bind(user_id.as_str())
            .bind(fiscal_year.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        row.map(EsgResponse::try_from).transpose()
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<EsgResponse>, StoreError> {
        let statement = format!(
            "SELECT {COLUMNS} FROM esg_responses WHERE user_id = ? ORDER BY fiscal_year ASC"
        );
        let rows: Vec<ResponseRow> = sqlx::query_as(&statement)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        rows.into_iter().map(EsgResponse::try_from).collect()
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[derive(Debug, FromRow)]
struct ResponseRow {
    id: String,
    user_id: String,
    fiscal_year: String,
    total_electricity_kwh: Option<f64>,
    renewable_electricity_kwh: Option<f64>,
    total_fuel_liters: Option<f64>,
    carbon_emissions_tco2e: Option<f64>,
    total_employees: Option<i64>,
    female_employees: Option<i64>,
    avg_training_hours: Option<f64>,
    community_investment_inr: Option<f64>,
    independent_board_pct: Option<f64>,
    has_data_privacy_policy: Option<bool>,
    total_revenue_inr: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ResponseRow> for EsgResponse {
    type Error = StoreError;

    fn try_from(row: ResponseRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|err| StoreError::Corrupt(format!("response id '{}': {err}", row.id)))?;
        let user_id = UserId::parse(&row.user_id)
            .ok_or_else(|| StoreError::Corrupt(format!("blank user id on response {id}")))?;
        let fiscal_year = FiscalYear::parse(&row.fiscal_year)
            .ok_or_else(|| StoreError::Corrupt(format!("blank fiscal year on response {id}")))?;

        Ok(Self {
            id: ResponseId(id),
            user_id,
            fiscal_year,
            figures: EsgFigures {
                total_electricity_kwh: row.total_electricity_kwh,
                renewable_electricity_kwh: row.renewable_electricity_kwh,
                total_fuel_liters: row.total_fuel_liters,
                carbon_emissions_tco2e: row.carbon_emissions_tco2e,
                total_employees: row.total_employees.and_then(|n| u32::try_from(n).ok()),
                female_employees: row.female_employees.and_then(|n| u32::try_from(n).ok()),
                avg_training_hours: row.avg_training_hours,
                community_investment_inr: row.community_investment_inr,
                independent_board_pct: row.independent_board_pct,
                has_data_privacy_policy: row.has_data_privacy_policy,
                total_revenue_inr: row.total_revenue_inr,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_check_violation() => {
            StoreError::Constraint(db.message().to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(err.to_string())
        }
        _ => StoreError::Unavailable(err.to_string()),
    }
}
