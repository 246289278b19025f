use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde_json::Value;

use amortise_core::{Frequency, Loan, LoanKind};

use super::RoundingArgs;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Amortized,
    #[value(name = "interest_only", alias = "interest-only")]
    InterestOnly,
}

impl From<KindArg> for LoanKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Amortized => LoanKind::Amortized,
            KindArg::InterestOnly => LoanKind::InterestOnly,
        }
    }
}

/// Arguments for a single-loan summary
#[derive(Args)]
pub struct SummarizeArgs {
    /// Path to a JSON or YAML loan file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Code name for the loan
    #[arg(long)]
    pub code: Option<String>,

    /// Loan kind
    #[arg(long, value_enum, default_value = "amortized")]
    pub kind: KindArg,

    /// Amount borrowed
    #[arg(long, allow_negative_numbers = true)]
    pub principal: Option<f64>,

    /// Nominal annual interest rate (e.g. 0.05 for 5%)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub interest_rate: f64,

    /// Payment frequency (annually, ..., monthly, fortnightly, weekly, daily)
    #[arg(long, default_value = "monthly")]
    pub payment_freq: Frequency,

    /// Compounding frequency; defaults to the payment frequency
    #[arg(long)]
    pub compounding_freq: Option<Frequency>,

    /// Number of payments over the loan term
    #[arg(long)]
    pub num_payments: Option<u32>,

    /// One-time loan fee
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub fee: f64,

    /// First payment date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    #[command(flatten)]
    pub rounding: RoundingArgs,
}

pub fn run_summarize(args: SummarizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = if let Some(ref path) = args.input {
        input::file::read_loan(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        Loan::from_json_value(data)?
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let num_payments = args
            .num_payments
            .ok_or("--num-payments is required (or provide --input)")?;

        let mut loan = Loan {
            kind: args.kind.into(),
            principal,
            interest_rate: args.interest_rate,
            payment_freq: args.payment_freq,
            compounding_freq: args.compounding_freq,
            num_payments,
            fee: args.fee,
            start_date: args.start_date,
            ..Loan::default()
        };
        if let Some(code) = args.code {
            loan.code = code;
        }
        loan.validate()?;
        loan
    };

    tracing::debug!(code = %loan.code, "summarizing loan");
    let result = loan.summarize_with_metadata(args.rounding.rounding())?;
    Ok(serde_json::to_value(result)?)
}
