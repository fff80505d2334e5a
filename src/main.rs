//! Credit Calculator CLI
//!
//! Command-line interface for pricing loan overpayments

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::PathBuf;

use credit_calculator::{
    batch::write_outcomes_csv,
    config::DEFAULT_CONFIG_PATH,
    BatchRunner, CalculatorConfig, ClientCategory, FileRateProvider, LoanRequest,
    OverpaymentCalculator, RateProvider, StaticRateProvider,
};
use credit_calculator::loan::load_loan_requests;

type DynProvider = Box<dyn RateProvider + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "credit-calc", version, about = "Loan overpayment calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Total interest paid on a single loan
    Quote(LoanArgs),
    /// Month-by-month amortization table for a single loan
    Schedule {
        #[command(flatten)]
        loan: LoanArgs,

        /// Write the table as CSV instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Price every loan in a CSV loan book
    Batch {
        /// Loan book with columns loan_id,principal,monthly_payment,category
        #[arg(short, long)]
        input: PathBuf,

        /// Results CSV (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        rates: RateArgs,
    },
}

#[derive(Debug, Args)]
struct LoanArgs {
    /// Loan amount
    #[arg(short, long)]
    principal: f64,

    /// Fixed monthly payment
    #[arg(short = 'm', long)]
    payment: f64,

    /// Client category
    #[arg(short, long, value_enum)]
    category: ClientCategory,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    rates: RateArgs,
}

#[derive(Debug, Args)]
struct RateArgs {
    /// Key rate in percent (e.g. 16 for 16%)
    #[arg(long, conflicts_with = "rate_file")]
    key_rate: Option<f64>,

    /// JSON quote file with the current key rate
    #[arg(long)]
    rate_file: Option<PathBuf>,

    /// Treat quotes older than this many days as unavailable
    #[arg(long, requires = "rate_file")]
    max_age_days: Option<i64>,

    /// Calculator config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured fallback rate in percent
    #[arg(long)]
    fallback_rate: Option<f64>,
}

impl RateArgs {
    fn load_config(&self) -> Result<CalculatorConfig> {
        let path = self.config.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            default.exists().then_some(default)
        });

        let mut config = CalculatorConfig::load_or_default(path.as_deref())
            .context("failed to load calculator config")?;
        if let Some(rate) = self.fallback_rate {
            config.fallback_annual_rate = rate;
            config.validate()?;
        }
        Ok(config)
    }

    fn provider(&self, config: &CalculatorConfig) -> DynProvider {
        let fallback = config.fallback_annual_rate;

        match (self.key_rate, &self.rate_file) {
            (Some(rate), _) => Box::new(StaticRateProvider::new(rate, fallback)),
            (None, Some(path)) => {
                let provider = FileRateProvider::new(path, fallback);
                match self.max_age_days {
                    Some(days) => Box::new(provider.with_max_age_days(days)),
                    None => Box::new(provider),
                }
            }
            (None, None) => {
                log::warn!("No key rate source given; pricing at the fallback rate");
                Box::new(StaticRateProvider::unavailable(fallback))
            }
        }
    }
}

fn quote(args: LoanArgs) -> Result<()> {
    let config = args.rates.load_config()?;
    let provider = args.rates.provider(&config);
    let calculator = OverpaymentCalculator::new(provider, config);

    let request = LoanRequest::new(args.principal, args.payment, args.category)?;
    let result = calculator.calculate(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Loan: {:.2} at {:.2}/month ({})", result.principal, result.monthly_payment, args.category);
    println!(
        "  Rate: {}% base ({:?}) + {} margin = {}%",
        result.rate.base_annual_rate, result.rate.source, result.rate.margin, result.rate.effective_annual_rate
    );
    println!("  Months: {}", result.months);
    println!("  Overpayment: {}", result.total_interest);
    println!("  Total paid: {}", result.total_paid());
    Ok(())
}

fn schedule(args: LoanArgs, output: Option<PathBuf>) -> Result<()> {
    let mut config = args.rates.load_config()?;
    config.detailed_output = true;
    let provider = args.rates.provider(&config);
    let calculator = OverpaymentCalculator::new(provider, config);

    let request = LoanRequest::new(args.principal, args.payment, args.category)?;
    let result = calculator.calculate(&request)?;

    if let Some(path) = output {
        let file = File::create(&path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        let mut writer = csv::Writer::from_writer(file);
        for row in &result.schedule {
            writer.serialize(row)?;
        }
        writer.flush()?;
        println!("Schedule ({} months) written to: {}", result.months, path.display());
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.schedule)?);
        return Ok(());
    }

    println!("{:>5} {:>16} {:>14} {:>14} {:>16} {:>16}",
        "Month", "Opening", "Interest", "Principal", "Closing", "CumInterest");
    println!("{}", "-".repeat(86));
    for row in &result.schedule {
        println!("{:>5} {:>16.2} {:>14.4} {:>14.4} {:>16.2} {:>16.6}",
            row.month,
            row.opening_principal,
            row.interest,
            row.principal_portion,
            row.closing_principal,
            row.cumulative_interest,
        );
    }
    println!("\nOverpayment: {}", result.total_interest);
    Ok(())
}

fn batch(input: PathBuf, output: Option<PathBuf>, rates: RateArgs) -> Result<()> {
    let config = rates.load_config()?;
    let provider = rates.provider(&config);

    let loans = load_loan_requests(&input)
        .with_context(|| format!("failed to load loans from {}", input.display()))?;
    let runner = BatchRunner::new(provider, config);
    let report = runner.run(&loans);

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("unable to create {}", path.display()))?;
            write_outcomes_csv(file, &report.outcomes)?;
            let summary = report.summary();
            eprintln!(
                "Priced {} loans, rejected {}; total overpayment {:.2}. Written to {}",
                summary.priced, summary.rejected, summary.total_interest, path.display()
            );
        }
        None => write_outcomes_csv(io::stdout().lock(), &report.outcomes)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Quote(args) => quote(args),
        Command::Schedule { loan, output } => schedule(loan, output),
        Command::Batch { input, output, rates } => batch(input, output, rates),
    }
}
