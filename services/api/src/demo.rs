use crate::infra::{connect_service, parse_fiscal_year, parse_user, ResponseService};
use clap::{Args, ValueEnum};
use esg_ledger::config::{AppConfig, StoreConfig};
use esg_ledger::error::AppError;
use esg_ledger::esg::{FiscalYear, ResponseSubmission, UserId};
use serde_json::json;

const DEMO_USER: &str = "demo-user";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Text,
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// User whose responses are reported
    #[arg(long, value_parser = parse_user)]
    pub(crate) user: UserId,
    /// Restrict the report to one fiscal year (e.g. 2023-24)
    #[arg(long, value_parser = parse_fiscal_year)]
    pub(crate) year: Option<FiscalYear>,
    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub(crate) format: ReportFormat,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Restrict the demo report to one fiscal year
    #[arg(long, value_parser = parse_fiscal_year)]
    pub(crate) year: Option<FiscalYear>,
    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub(crate) format: ReportFormat,
}

/// Prints the stored responses of one user from the configured store.
pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs { user, year, format } = args;
    let config = AppConfig::load()?;
    let service = connect_service(&config.store).await?;

    let output = render(&service, &user, year.as_ref(), format).await?;
    print!("{output}");
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { year, format } = args;
    let service = connect_service(&StoreConfig::in_memory()).await?;
    let user = seed_demo_responses(&service).await?;

    println!("ESG ledger demo ({} sample fiscal years)", DEMO_SUBMISSIONS.len());
    let output = render(&service, &user, year.as_ref(), format).await?;
    print!("{output}");
    Ok(())
}

pub(crate) async fn render(
    service: &ResponseService,
    user: &UserId,
    year: Option<&FiscalYear>,
    format: ReportFormat,
) -> Result<String, AppError> {
    match format {
        ReportFormat::Text => Ok(service.text_report(user, year).await?),
        ReportFormat::Csv => {
            let bytes = service.export_csv(user, year).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// (fiscal year, emissions, revenue, renewable kWh, female employees)
const DEMO_SUBMISSIONS: [(&str, f64, f64, f64, u32); 2] = [
    ("2022-23", 950.0, 42_000_000.0, 18_000.0, 80),
    ("2023-24", 800.0, 50_000_000.0, 30_000.0, 90),
];

async fn seed_demo_responses(service: &ResponseService) -> Result<UserId, AppError> {
    let user = UserId(DEMO_USER.to_string());
    for (fiscal_year, emissions, revenue, renewable, female) in DEMO_SUBMISSIONS {
        let submission = ResponseSubmission::default()
            .with("fiscalYear", fiscal_year)
            .with("carbonEmissionsTco2e", emissions)
            .with("totalRevenueInr", revenue.to_string())
            .with("totalElectricityKwh", 120_000)
            .with("renewableElectricityKwh", renewable)
            .with("totalEmployees", "200")
            .with("femaleEmployees", female)
            .with("communityInvestmentInr", 1_500_000)
            .with("hasDataPrivacyPolicy", json!("Yes"));
        service.save(&user, submission).await?;
    }
    Ok(user)
}
