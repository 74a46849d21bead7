//! CLI for the valora valuation library.
//!
//! Values companies from a fundamentals CSV, or runs the WACC and DCF
//! calculators on figures given on the command line.

mod config;
mod logging;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use logging::LogFormat;
use std::path::PathBuf;
use valora::{
    CompanyValuation, ConfigurableModel, Country, DcfConfig, DcfInputs, MarketRegistry, Model,
    ValuationSummary, Valuator, WaccInputs, read_csv, records_from_frame, round_to,
    valuations_to_frame,
};

#[derive(Parser)]
#[command(name = "valora")]
#[command(about = "WACC and DCF valuation of listed companies", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log format, overriding the configuration file
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value every company in a fundamentals CSV
    Value {
        /// Path to the CSV file
        csv: PathBuf,
        /// Only value this ticker
        #[arg(long)]
        ticker: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Compute the WACC of one company
    Wacc {
        /// Market capitalization
        #[arg(long)]
        market_cap: f64,
        /// Equity beta
        #[arg(long, allow_hyphen_values = true)]
        beta: f64,
        /// Gross interest-bearing debt
        #[arg(long, default_value_t = 0.0)]
        total_debt: f64,
        /// Cash netted against debt
        #[arg(long, default_value_t = 0.0)]
        cash: f64,
        /// Country name or ISO code
        #[arg(long, default_value = "Unknown")]
        country: String,
        /// Reported annual interest expense
        #[arg(long)]
        interest_expense: Option<f64>,
        /// Tax rate as a fraction, overriding the country default
        #[arg(long)]
        tax_rate: Option<f64>,
    },
    /// Intrinsic value per share from a DCF projection
    Dcf {
        /// Current free cash flow per share
        #[arg(long, allow_hyphen_values = true)]
        fcf_per_share: f64,
        /// Discount rate as a fraction
        #[arg(long, allow_hyphen_values = true)]
        discount_rate: f64,
        /// Growth over the horizon as a fraction
        #[arg(long, allow_hyphen_values = true)]
        growth: Option<f64>,
        /// Perpetual growth after the horizon as a fraction
        #[arg(long, allow_hyphen_values = true)]
        terminal_growth: Option<f64>,
        /// Years in the explicit horizon
        #[arg(long)]
        years: Option<u32>,
    },
    /// List market assumptions per country
    Markets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init_logging(
        &config.log.level,
        cli.log_format.unwrap_or(config.log.format),
    );

    match cli.command {
        Commands::Value {
            csv,
            ticker,
            format,
        } => value_companies(&config, &csv, ticker.as_deref(), format),
        Commands::Wacc {
            market_cap,
            beta,
            total_debt,
            cash,
            country,
            interest_expense,
            tax_rate,
        } => {
            let mut inputs = WaccInputs::new(market_cap, beta, Country::parse(&country))
                .with_debt(total_debt, cash);
            inputs.interest_expense = interest_expense;
            inputs.tax_rate = tax_rate;
            print_wacc(&config, &inputs);
            Ok(())
        }
        Commands::Dcf {
            fcf_per_share,
            discount_rate,
            growth,
            terminal_growth,
            years,
        } => {
            let mut dcf = config.valuation.dcf;
            if let Some(rate) = terminal_growth {
                dcf.terminal_growth = rate;
            }
            if let Some(years) = years {
                dcf.horizon_years = years;
            }
            print_dcf(dcf, fcf_per_share, growth, discount_rate)
        }
        Commands::Markets => {
            list_markets(&config.valuation.wacc.markets);
            Ok(())
        }
    }
}

/// Value all companies in a CSV and print the result.
fn value_companies(
    config: &AppConfig,
    path: &std::path::Path,
    ticker: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let frame =
        read_csv(path).with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let mut records = records_from_frame(&frame, &config.schema)?;

    if let Some(ticker) = ticker {
        records.retain(|r| r.ticker.eq_ignore_ascii_case(ticker));
        if records.is_empty() {
            bail!("Ticker '{ticker}' not found in {}", path.display());
        }
    }

    let valuator = Valuator::new(config.valuation.clone());
    let valuations = valuator.value_all(&records);

    match format {
        OutputFormat::Table => {
            println!("{}", valuations_to_frame(&valuations)?);
            print_summary(&valuations);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&valuations)?);
        }
    }
    Ok(())
}

fn print_summary(valuations: &[CompanyValuation]) {
    let summary = ValuationSummary::from_valuations(valuations);
    println!(
        "\n{} companies: {} undervalued, {} overvalued, {} without valuation",
        summary.total, summary.undervalued, summary.overvalued, summary.skipped
    );
}

/// Compute and print the WACC of one company.
fn print_wacc(config: &AppConfig, inputs: &WaccInputs) {
    let model = valora::Wacc::with_config(config.valuation.wacc.clone());

    match model.evaluate(inputs) {
        Ok(wacc) => {
            println!("WACC: {:.2}% ({})", wacc.rate * 100.0, wacc.risk_tier);
            println!("  Country: {}", inputs.country);
            println!("  Cost of equity: {:.2}%", wacc.cost_of_equity * 100.0);
            println!(
                "  Cost of debt: {:.2}% pre-tax, {:.2}% after tax ({})",
                wacc.cost_of_debt * 100.0,
                wacc.after_tax_cost_of_debt() * 100.0,
                wacc.cost_of_debt_source
            );
            println!("  Tax rate: {:.1}%", wacc.tax_rate * 100.0);
            println!(
                "  Weights: equity {:.1}%, net debt {:.1}%",
                wacc.equity_weight * 100.0,
                wacc.debt_weight * 100.0
            );
        }
        Err(err) => println!("WACC could not be computed: {err}"),
    }
}

/// Compute and print a DCF projection.
fn print_dcf(
    config: DcfConfig,
    fcf_per_share: f64,
    growth: Option<f64>,
    discount_rate: f64,
) -> Result<()> {
    let inputs = DcfInputs::from_config(fcf_per_share, growth, discount_rate, &config);
    let model = valora::Dcf::with_config(config);
    let valuation = model.evaluate(&inputs)?;

    println!(
        "Intrinsic value: {:.2} per share",
        round_to(valuation.intrinsic_value, 2)
    );
    println!(
        "  Growth {:.2}%, discount {:.2}%, terminal growth {:.2}%",
        inputs.growth_rate * 100.0,
        inputs.discount_rate * 100.0,
        inputs.terminal_growth_rate * 100.0
    );
    println!("\n  Year  Cash flow  Present value");
    for year in &valuation.years {
        println!(
            "  {:>4}  {:>9.2}  {:>13.2}",
            year.year, year.cash_flow, year.present_value
        );
    }
    print!(
        "\n  Terminal value: {:.2} ({:.2} discounted",
        valuation.terminal_value, valuation.discounted_terminal_value,
    );
    match valuation.terminal_share() {
        Some(share) => println!(", {:.0}% of value)", share * 100.0),
        None => println!(")"),
    }
    Ok(())
}

/// List market assumptions per country.
fn list_markets(markets: &MarketRegistry) {
    println!("Market assumptions ({} countries + default)\n", markets.len());
    println!("  {:<10} {:>9} {:>9} {:>6}", "Country", "Risk-free", "Premium", "Tax");
    for (country, market) in markets.entries() {
        println!(
            "  {:<10} {:>8.2}% {:>8.2}% {:>5.1}%",
            country.to_string(),
            market.risk_free_rate * 100.0,
            market.market_premium * 100.0,
            market.tax_rate * 100.0
        );
    }
}
