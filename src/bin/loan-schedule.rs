//! `loan-schedule` - print the repayment schedule of a loan.
//!
//! Terms come either from flags or from a JSON file (`--terms`) in the same
//! camelCase shape `LoanTerms` deserializes from:
//!
//! ```json
//! {"loanType": "CAR", "amount": "10000.00", "periodMonths": 24,
//!  "annualInterestRate": "6.00", "scheduleType": "ANNUITY", "startDate": "2024-01-01"}
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use loan_schedule::{
    CalculationPolicy, LoanTerms, LoanType, ScheduleDispatcher, ScheduleRow, ScheduleSummary, ScheduleType,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Loan repayment schedule calculator
#[derive(Parser)]
#[command(name = "loan-schedule")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with the loan terms
    #[arg(short, long, conflicts_with_all = ["amount", "months", "rate", "start_date"])]
    terms: Option<PathBuf>,

    /// Loan amount, at most two decimal places
    #[arg(long)]
    amount: Option<Decimal>,

    /// Number of monthly payments
    #[arg(short, long)]
    months: Option<u32>,

    /// Annual interest rate in percent (e.g. 5.25)
    #[arg(short, long)]
    rate: Option<Decimal>,

    /// Schedule type (annuity, equal-principal)
    #[arg(short, long, default_value = "annuity")]
    schedule_type: ScheduleType,

    /// Date of the first payment (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// What the loan finances (consumer, car, mortgage)
    #[arg(long, default_value = "consumer")]
    loan_type: LoanType,

    /// JSON file with the precision policy
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Append totals to the schedule
    #[arg(long)]
    summary: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Serialize)]
struct ScheduleOutput<'a> {
    items: &'a [ScheduleRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ScheduleSummary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = load_policy(&cli)?;
    let terms = load_terms(&cli)?;
    debug!(?policy, ?terms, "loaded inputs");

    let rows = ScheduleDispatcher::standard(policy)
        .calculate_schedule(&terms)
        .context("failed to calculate repayment schedule")?;
    let summary = cli.summary.then(|| ScheduleSummary::from_rows(&rows));

    match cli.format {
        OutputFormat::Json => {
            let output = ScheduleOutput {
                items: &rows,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => print_table(&rows, summary.as_ref()),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_policy(cli: &Cli) -> Result<CalculationPolicy> {
    let Some(path) = &cli.policy else {
        return Ok(CalculationPolicy::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("cannot read policy file {}", path.display()))?;
    CalculationPolicy::from_json(&raw).with_context(|| format!("invalid policy file {}", path.display()))
}

fn load_terms(cli: &Cli) -> Result<LoanTerms> {
    if let Some(path) = &cli.terms {
        let raw = fs::read_to_string(path).with_context(|| format!("cannot read terms file {}", path.display()))?;
        return LoanTerms::from_json(&raw).with_context(|| format!("invalid terms file {}", path.display()));
    }

    let (Some(amount), Some(months), Some(rate)) = (cli.amount, cli.months, cli.rate) else {
        bail!("either --terms or all of --amount, --months and --rate are required");
    };
    let start_date = cli
        .start_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    Ok(LoanTerms::new(amount, months, rate, cli.schedule_type, start_date).with_loan_type(cli.loan_type))
}

fn print_table(rows: &[ScheduleRow], summary: Option<&ScheduleSummary>) {
    println!(
        "{:>5}  {:<10}  {:>14}  {:>14}  {:>14}  {:>16}",
        "#", "date", "payment", "principal", "interest", "balance"
    );
    for (index, row) in rows.iter().enumerate() {
        println!(
            "{:>5}  {:<10}  {:>14}  {:>14}  {:>14}  {:>16}",
            index + 1,
            row.payment_date,
            row.payment,
            row.principal,
            row.interest,
            row.remaining_balance
        );
    }

    if let Some(summary) = summary {
        println!();
        println!("payments:        {}", summary.payment_count);
        println!("first payment:   {}", summary.first_payment);
        println!("last payment:    {}", summary.last_payment);
        println!("total principal: {}", summary.total_principal);
        println!("total interest:  {}", summary.total_interest);
        println!("total paid:      {}", summary.total_paid);
    }
}
