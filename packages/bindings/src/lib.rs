use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use amortise_core::aggregate::{aggregate_with_metadata, BucketPeriod};
use amortise_core::{Loan, Rounding, Schedule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn rounding(decimals: Option<u32>, unrounded: Option<bool>) -> Rounding {
    let decimals = decimals.unwrap_or(amortise_core::rounding::DEFAULT_DECIMALS);
    Rounding::from_decimals((!unrounded.unwrap_or(false)).then_some(decimals))
}

// ---------------------------------------------------------------------------
// Single loan
// ---------------------------------------------------------------------------

#[napi]
pub fn summarize_loan(
    loan_json: String,
    decimals: Option<u32>,
    unrounded: Option<bool>,
) -> NapiResult<String> {
    let loan = Loan::from_json_str(&loan_json).map_err(to_napi_error)?;
    let output = loan
        .summarize_with_metadata(rounding(decimals, unrounded))
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AggregateRequest {
    loans: Vec<serde_json::Value>,
    #[serde(default)]
    bucket: Option<BucketPeriod>,
}

#[napi]
pub fn aggregate_loans(
    request_json: String,
    decimals: Option<u32>,
    unrounded: Option<bool>,
) -> NapiResult<String> {
    let request: AggregateRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let rounding = rounding(decimals, unrounded);
    let schedules: Vec<Schedule> = request
        .loans
        .into_iter()
        .map(|value| {
            Loan::from_json_value(value).and_then(|loan| loan.summarize(rounding).map(|s| s.schedule))
        })
        .collect::<Result<_, _>>()
        .map_err(to_napi_error)?;
    let output =
        aggregate_with_metadata(&schedules, request.bucket, rounding).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
