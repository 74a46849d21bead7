//! Tabular adapter between polars frames and company records.
//!
//! Datasets of fundamentals are loaded into a [`DataFrame`] and converted to
//! [`CompanyRecord`]s here. This is the only place that knows column names
//! and units: percentages are turned into fractions before the records reach
//! the valuation chain.

use crate::{
    Result, ValuationError,
    record::CompanyRecord,
    registry::Country,
    round::round_to,
    valuation::CompanyValuation,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unit of a rate column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateUnit {
    /// 0.05 means five percent
    Fraction,
    /// 5.0 means five percent
    Percent,
}

impl RateUnit {
    /// Convert a value in this unit to a fraction.
    pub fn to_fraction(self, value: f64) -> f64 {
        match self {
            Self::Fraction => value,
            Self::Percent => value / 100.0,
        }
    }
}

/// Column names and units of a fundamentals dataset.
///
/// Defaults match the public fundamentals CSV: `Ticker`, `MarketCap`,
/// `Debt/Equity` in percent, and so on. Only the ticker column is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSchema {
    /// Ticker column (required)
    pub ticker: String,
    /// Company name column
    pub name: String,
    /// Market capitalization column
    pub market_cap: String,
    /// Gross debt column
    pub total_debt: String,
    /// Debt-to-equity column
    pub debt_to_equity: String,
    /// Cash column
    pub cash: String,
    /// Beta column
    pub beta: String,
    /// Free cash flow column
    pub free_cash_flow: String,
    /// Price column
    pub price: String,
    /// Country column
    pub country: String,
    /// Growth override column
    pub growth_rate: String,
    /// Interest expense column
    pub interest_expense: String,
    /// Tax rate column
    pub tax_rate: String,
    /// Unit of the debt-to-equity column
    pub debt_to_equity_unit: RateUnit,
    /// Unit of the growth column
    pub growth_unit: RateUnit,
    /// Unit of the tax rate column
    pub tax_rate_unit: RateUnit,
}

impl Default for FrameSchema {
    fn default() -> Self {
        Self {
            ticker: "Ticker".to_string(),
            name: "Name".to_string(),
            market_cap: "MarketCap".to_string(),
            total_debt: "TotalDebt".to_string(),
            debt_to_equity: "Debt/Equity".to_string(),
            cash: "Cash".to_string(),
            beta: "Beta".to_string(),
            free_cash_flow: "FreeCashflow".to_string(),
            price: "Price".to_string(),
            country: "Country".to_string(),
            growth_rate: "GrowthRate".to_string(),
            interest_expense: "InterestExpense".to_string(),
            tax_rate: "TaxRate".to_string(),
            debt_to_equity_unit: RateUnit::Percent,
            growth_unit: RateUnit::Percent,
            tax_rate_unit: RateUnit::Fraction,
        }
    }
}

/// Load a CSV file with a header row.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// An optional column cast to `Float64`. Unparseable cells become null.
fn float_column(df: &DataFrame, name: &str) -> Result<Option<Float64Chunked>> {
    match df.column(name) {
        Ok(column) => Ok(Some(column.cast(&DataType::Float64)?.f64()?.clone())),
        Err(_) => Ok(None),
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Option<StringChunked>> {
    match df.column(name) {
        Ok(column) => Ok(Some(column.cast(&DataType::String)?.str()?.clone())),
        Err(_) => Ok(None),
    }
}

fn float_cell(column: &Option<Float64Chunked>, row: usize) -> Option<f64> {
    column.as_ref().and_then(|c| c.get(row))
}

fn string_cell(column: &Option<StringChunked>, row: usize) -> Option<String> {
    column
        .as_ref()
        .and_then(|c| c.get(row))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Convert a fundamentals frame into company records, one per row.
///
/// Rows without a ticker are dropped. Missing optional columns and null
/// cells become `None` on the record.
pub fn records_from_frame(df: &DataFrame, schema: &FrameSchema) -> Result<Vec<CompanyRecord>> {
    if df.column(&schema.ticker).is_err() {
        return Err(ValuationError::MissingColumn(schema.ticker.clone()));
    }
    let tickers = string_column(df, &schema.ticker)?;
    let names = string_column(df, &schema.name)?;
    let countries = string_column(df, &schema.country)?;

    let market_cap = float_column(df, &schema.market_cap)?;
    let total_debt = float_column(df, &schema.total_debt)?;
    let debt_to_equity = float_column(df, &schema.debt_to_equity)?;
    let cash = float_column(df, &schema.cash)?;
    let beta = float_column(df, &schema.beta)?;
    let free_cash_flow = float_column(df, &schema.free_cash_flow)?;
    let price = float_column(df, &schema.price)?;
    let growth_rate = float_column(df, &schema.growth_rate)?;
    let interest_expense = float_column(df, &schema.interest_expense)?;
    let tax_rate = float_column(df, &schema.tax_rate)?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(ticker) = string_cell(&tickers, row) else {
            tracing::warn!(row, "row without ticker dropped");
            continue;
        };

        records.push(CompanyRecord {
            ticker,
            name: string_cell(&names, row),
            market_cap: float_cell(&market_cap, row),
            total_debt: float_cell(&total_debt, row),
            debt_to_equity: float_cell(&debt_to_equity, row)
                .map(|v| schema.debt_to_equity_unit.to_fraction(v)),
            cash: float_cell(&cash, row),
            beta: float_cell(&beta, row),
            free_cash_flow: float_cell(&free_cash_flow, row),
            price: float_cell(&price, row),
            country: string_cell(&countries, row).map(|c| Country::parse(&c)),
            growth_rate: float_cell(&growth_rate, row).map(|v| schema.growth_unit.to_fraction(v)),
            interest_expense: float_cell(&interest_expense, row),
            tax_rate: float_cell(&tax_rate, row).map(|v| schema.tax_rate_unit.to_fraction(v)),
        });
    }

    tracing::debug!(rows = df.height(), records = records.len(), "records loaded");
    Ok(records)
}

/// Render valuations as a frame for display or export.
///
/// Intrinsic value and deviation are rounded to two decimals here; the
/// valuations themselves keep full precision.
pub fn valuations_to_frame(valuations: &[CompanyValuation]) -> Result<DataFrame> {
    let ticker: Vec<&str> = valuations.iter().map(|v| v.ticker.as_str()).collect();
    let name: Vec<Option<&str>> = valuations.iter().map(|v| v.name.as_deref()).collect();
    let wacc: Vec<Option<f64>> = valuations.iter().map(|v| v.wacc_rate()).collect();
    let risk_tier: Vec<Option<String>> = valuations
        .iter()
        .map(|v| v.wacc.map(|w| w.risk_tier.to_string()))
        .collect();
    let intrinsic_value: Vec<Option<f64>> = valuations
        .iter()
        .map(|v| v.intrinsic_value().map(|x| round_to(x, 2)))
        .collect();
    let price: Vec<Option<f64>> = valuations
        .iter()
        .map(|v| v.comparison.map(|c| c.price))
        .collect();
    let deviation_pct: Vec<Option<f64>> = valuations
        .iter()
        .map(|v| v.comparison.map(|c| round_to(c.deviation_pct, 2)))
        .collect();
    let status: Vec<String> = valuations
        .iter()
        .map(|v| match (&v.comparison, &v.skipped) {
            (Some(c), _) => c.verdict.to_string(),
            (None, Some(reason)) => reason.to_string(),
            (None, None) => "not valued".to_string(),
        })
        .collect();

    let df = df!(
        "ticker" => ticker,
        "name" => name,
        "wacc" => wacc,
        "risk_tier" => risk_tier,
        "intrinsic_value" => intrinsic_value,
        "price" => price,
        "deviation_pct" => deviation_pct,
        "status" => status,
    )?;
    Ok(df)
}
