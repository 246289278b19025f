use clap::Args;
use serde_json::Value;

use amortise_core::aggregate::{aggregate_with_metadata, BucketPeriod};
use amortise_core::{Loan, Schedule};

use super::RoundingArgs;
use crate::input;

/// Arguments for multi-loan aggregation
#[derive(Args)]
pub struct AggregateArgs {
    /// Loan files to combine (repeat the flag for each loan)
    #[arg(long = "input")]
    pub inputs: Vec<String>,

    /// Resample dated schedules into day, week, month, quarter or year buckets
    #[arg(long)]
    pub bucket: Option<BucketPeriod>,

    #[command(flatten)]
    pub rounding: RoundingArgs,
}

fn loans_from_value(value: Value) -> Result<Vec<Loan>, Box<dyn std::error::Error>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|v| Loan::from_json_value(v).map_err(Into::into))
            .collect(),
        other => Ok(vec![Loan::from_json_value(other)?]),
    }
}

pub fn run_aggregate(args: AggregateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loans: Vec<Loan> = if !args.inputs.is_empty() {
        args.inputs
            .iter()
            .map(|path| input::file::read_loan(path))
            .collect::<Result<_, _>>()?
    } else if let Some(data) = input::stdin::read_stdin()? {
        loans_from_value(data)?
    } else {
        return Err("--input <loan.json> (one or more) or a JSON array on stdin required".into());
    };

    let rounding = args.rounding.rounding();
    let schedules: Vec<Schedule> = loans
        .iter()
        .map(|loan| loan.summarize(rounding).map(|s| s.schedule))
        .collect::<Result<_, _>>()?;

    let result = aggregate_with_metadata(&schedules, args.bucket, rounding)?;
    Ok(serde_json::to_value(result)?)
}
