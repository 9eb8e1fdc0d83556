use std::fmt::Write as _;

use chrono::SecondsFormat;
use serde::Serialize;

use super::domain::{EsgResponse, FiscalYear};
use super::metrics::{EsgRatios, FormattedRatios};

/// Keeps only responses for `year` when a filter is given.
pub fn filter_by_year<'a>(
    responses: &'a [EsgResponse],
    year: Option<&'a FiscalYear>,
) -> impl Iterator<Item = &'a EsgResponse> + 'a {
    responses
        .iter()
        .filter(move |response| year.map_or(true, |year| &response.fiscal_year == year))
}

/// File name offered to browsers, e.g. `esg-reports-2023-24.csv` or `esg-reports-all.csv`.
pub fn export_file_name(year: Option<&FiscalYear>, extension: &str) -> String {
    let scope = year.map_or("all", FiscalYear::as_str);
    format!("esg-reports-{scope}.{extension}")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRow<'a> {
    id: String,
    fiscal_year: &'a str,
    total_electricity_kwh: Option<f64>,
    renewable_electricity_kwh: Option<f64>,
    total_fuel_liters: Option<f64>,
    carbon_emissions_tco2e: Option<f64>,
    total_employees: Option<u32>,
    female_employees: Option<u32>,
    avg_training_hours: Option<f64>,
    community_investment_inr: Option<f64>,
    independent_board_pct: Option<f64>,
    has_data_privacy_policy: Option<bool>,
    total_revenue_inr: Option<f64>,
    carbon_intensity: String,
    renewable_ratio_pct: String,
    diversity_ratio_pct: String,
    community_ratio_pct: String,
    created_at: String,
    updated_at: String,
}

impl<'a> ExportRow<'a> {
    fn new(response: &'a EsgResponse) -> Self {
        let figures = &response.figures;
        let FormattedRatios {
            carbon_intensity,
            renewable_ratio_pct,
            diversity_ratio_pct,
            community_ratio_pct,
        } = EsgRatios::from_figures(figures).formatted();

        Self {
            id: response.id.to_string(),
            fiscal_year: response.fiscal_year.as_str(),
            total_electricity_kwh: figures.total_electricity_kwh,
            renewable_electricity_kwh: figures.renewable_electricity_kwh,
            total_fuel_liters: figures.total_fuel_liters,
            carbon_emissions_tco2e: figures.carbon_emissions_tco2e,
            total_employees: figures.total_employees,
            female_employees: figures.female_employees,
            avg_training_hours: figures.avg_training_hours,
            community_investment_inr: figures.community_investment_inr,
            independent_board_pct: figures.independent_board_pct,
            has_data_privacy_policy: figures.has_data_privacy_policy,
            total_revenue_inr: figures.total_revenue_inr,
            carbon_intensity,
            renewable_ratio_pct,
            diversity_ratio_pct,
            community_ratio_pct,
            created_at: response.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_at: response.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Writes one CSV row per response. No responses means no output at all, header included.
pub fn write_csv<'a, I>(responses: I) -> Result<Vec<u8>, csv::Error>
where
    I: IntoIterator<Item = &'a EsgResponse>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for response in responses {
        writer.serialize(ExportRow::new(response))?;
    }
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

fn display_amount(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| value.to_string())
}

fn display_count(value: Option<u32>) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| value.to_string())
}

fn display_flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "N/A",
    }
}

/// Plain-text rendering of the historical report, one block per fiscal year.
pub fn render_text_report<'a, I>(responses: I, year: Option<&FiscalYear>) -> String
where
    I: IntoIterator<Item = &'a EsgResponse>,
{
    let mut out = String::from("ESG Reports\n");
    if let Some(year) = year {
        let _ = writeln!(out, "Year: {year}");
    }

    let mut empty = true;
    for response in responses {
        empty = false;
        let figures = &response.figures;
        let ratios = EsgRatios::from_figures(figures).formatted();

        out.push('\n');
        let _ = writeln!(out, "Fiscal Year: {}", response.fiscal_year);
        let _ = writeln!(out, "Carbon Intensity: {} T CO2e/INR", ratios.carbon_intensity);
        let _ = writeln!(out, "Renewable Electricity: {}%", ratios.renewable_ratio_pct);
        let _ = writeln!(out, "Diversity Ratio: {}%", ratios.diversity_ratio_pct);
        let _ = writeln!(out, "Community Investment: {}%", ratios.community_ratio_pct);
        let _ = writeln!(
            out,
            "Total Revenue: {}",
            display_amount(figures.total_revenue_inr)
        );
        let _ = writeln!(
            out,
            "Total Employees: {}",
            display_count(figures.total_employees)
        );
        let _ = writeln!(
            out,
            "Data Privacy Policy: {}",
            display_flag(figures.has_data_privacy_policy)
        );
    }

    if empty {
        out.push_str("\nNo ESG reports found\n");
    }

    out
}
