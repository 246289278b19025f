//! Combine several loan schedules into one.
//!
//! Rows are bucketed by payment date when every schedule is dated, otherwise
//! by payment sequence number, and principal and interest are summed per
//! bucket.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AmortiseError;
use crate::rounding::Rounding;
use crate::schedule::{PaymentRow, Schedule};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::AmortiseResult;

/// Key of an aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    #[serde(rename = "payment_sequence")]
    Sequence(u32),
    #[serde(rename = "payment_date")]
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    #[serde(flatten)]
    pub bucket: BucketKey,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub total_payment: Money,
}

/// Resampling period for date buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketPeriod {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl BucketPeriod {
    const ALL: [BucketPeriod; 5] = [
        BucketPeriod::Day,
        BucketPeriod::Week,
        BucketPeriod::Month,
        BucketPeriod::Quarter,
        BucketPeriod::Year,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BucketPeriod::Day => "day",
            BucketPeriod::Week => "week",
            BucketPeriod::Month => "month",
            BucketPeriod::Quarter => "quarter",
            BucketPeriod::Year => "year",
        }
    }

    /// First day of the period containing `date` (weeks start on Monday).
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            BucketPeriod::Day => date,
            BucketPeriod::Week => date
                .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(date),
            BucketPeriod::Month => date.with_day(1).unwrap_or(date),
            BucketPeriod::Quarter => {
                let first_month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
            }
            BucketPeriod::Year => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
            }
        }
    }

    /// Start of the period following the one that starts at `start`.
    fn next_start(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            BucketPeriod::Day => start.checked_add_days(Days::new(1)),
            BucketPeriod::Week => start.checked_add_days(Days::new(7)),
            BucketPeriod::Month => start.checked_add_months(Months::new(1)),
            BucketPeriod::Quarter => start.checked_add_months(Months::new(3)),
            BucketPeriod::Year => start.checked_add_months(Months::new(12)),
        }
    }
}

impl fmt::Display for BucketPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BucketPeriod {
    type Err = AmortiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BucketPeriod::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| AmortiseError::InvalidInput {
                field: "bucket".into(),
                reason: format!("'{s}' is not one of day, week, month, quarter, year"),
            })
    }
}

fn all_dated(schedules: &[Schedule]) -> bool {
    schedules
        .iter()
        .flat_map(|s| s.iter())
        .all(|row| row.payment_date.is_some())
}

fn any_dated(schedules: &[Schedule]) -> bool {
    schedules
        .iter()
        .flat_map(|s| s.iter())
        .any(|row| row.payment_date.is_some())
}

fn bucket_of(row: &PaymentRow, by_date: bool, period: Option<BucketPeriod>) -> BucketKey {
    match (by_date, row.payment_date) {
        (true, Some(date)) => BucketKey::Date(match period {
            Some(p) => p.bucket_start(date),
            None => date,
        }),
        _ => BucketKey::Sequence(row.payment_sequence),
    }
}

/// Sum principal and interest across schedules, bucket by bucket.
///
/// When every schedule is dated the buckets are payment dates, resampled to
/// `period` if one is given (empty periods between the first and last bucket
/// appear with zero totals). Otherwise, including when only some schedules
/// are dated, the buckets are payment sequence numbers. Keys are ascending.
pub fn aggregate_schedules(
    schedules: &[Schedule],
    period: Option<BucketPeriod>,
) -> AmortiseResult<Vec<AggregatedRow>> {
    if schedules.is_empty() {
        return Err(AmortiseError::EmptyInput(
            "no payment schedules given to aggregate".into(),
        ));
    }

    let by_date = all_dated(schedules);
    let mut buckets: BTreeMap<BucketKey, (Money, Money)> = BTreeMap::new();
    for row in schedules.iter().flat_map(|s| s.iter()) {
        let entry = buckets
            .entry(bucket_of(row, by_date, period))
            .or_insert((0.0, 0.0));
        entry.0 += row.principal_payment;
        entry.1 += row.interest_payment;
    }

    if let (true, Some(p)) = (by_date, period) {
        fill_empty_periods(&mut buckets, p);
    }

    debug!(
        schedules = schedules.len(),
        buckets = buckets.len(),
        by_date,
        "aggregated payment schedules"
    );

    Ok(buckets
        .into_iter()
        .map(|(bucket, (principal, interest))| AggregatedRow {
            bucket,
            principal_payment: principal,
            interest_payment: interest,
            total_payment: principal + interest,
        })
        .collect())
}

fn fill_empty_periods(buckets: &mut BTreeMap<BucketKey, (Money, Money)>, period: BucketPeriod) {
    let (Some(BucketKey::Date(first)), Some(BucketKey::Date(last))) = (
        buckets.keys().next().copied(),
        buckets.keys().next_back().copied(),
    ) else {
        return;
    };
    let mut cursor = first;
    while cursor < last {
        buckets.entry(BucketKey::Date(cursor)).or_insert((0.0, 0.0));
        match period.next_start(cursor) {
            Some(next) => cursor = next,
            None => break,
        }
    }
}

/// [`aggregate_schedules`] with presentation rounding and the standard
/// output envelope.
pub fn aggregate_with_metadata(
    schedules: &[Schedule],
    period: Option<BucketPeriod>,
    rounding: Rounding,
) -> AmortiseResult<ComputationOutput<Vec<AggregatedRow>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if !all_dated(schedules) && any_dated(schedules) {
        let msg = "Some schedules have no payment dates; bucketing all schedules by payment sequence"
            .to_string();
        warn!("{msg}");
        warnings.push(msg);
    } else if period.is_some() && !any_dated(schedules) {
        let msg = "Bucket period ignored: schedules have no payment dates".to_string();
        warn!("{msg}");
        warnings.push(msg);
    }

    let rows: Vec<AggregatedRow> = aggregate_schedules(schedules, period)?
        .into_iter()
        .map(|row| AggregatedRow {
            principal_payment: rounding.apply(row.principal_payment),
            interest_payment: rounding.apply(row.interest_payment),
            total_payment: rounding.apply(row.total_payment),
            ..row
        })
        .collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment schedule aggregation",
        &serde_json::json!({
            "schedules": schedules.len(),
            "bucket": period.map(|p| p.name()),
        }),
        warnings,
        elapsed,
        rounding.describe(),
        rows,
    ))
}
