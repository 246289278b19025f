//! Named payment and compounding frequencies.
//!
//! Maps each [`Frequency`] to a count of periods per year and, for the nine
//! tabulated counts, to the calendar step between consecutive payment dates.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AmortiseError;
use crate::AmortiseResult;

/// Periods-per-year counts that have a calendar step.
pub const TABULATED_PERIODS: [u32; 9] = [1, 2, 3, 4, 6, 12, 26, 52, 365];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Annually,
    Semiannually,
    Triannually,
    Quarterly,
    Bimonthly,
    Monthly,
    Fortnightly,
    Weekly,
    Daily,
    Continuously,
}

impl Frequency {
    pub const ALL: [Frequency; 10] = [
        Frequency::Annually,
        Frequency::Semiannually,
        Frequency::Triannually,
        Frequency::Quarterly,
        Frequency::Bimonthly,
        Frequency::Monthly,
        Frequency::Fortnightly,
        Frequency::Weekly,
        Frequency::Daily,
        Frequency::Continuously,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Frequency::Annually => "annually",
            Frequency::Semiannually => "semiannually",
            Frequency::Triannually => "triannually",
            Frequency::Quarterly => "quarterly",
            Frequency::Bimonthly => "bimonthly",
            Frequency::Monthly => "monthly",
            Frequency::Fortnightly => "fortnightly",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily",
            Frequency::Continuously => "continuously",
        }
    }

    fn accepted_names(allow_continuous: bool) -> String {
        Frequency::ALL
            .iter()
            .filter(|f| allow_continuous || **f != Frequency::Continuously)
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frequency {
    type Err = AmortiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| AmortiseError::InvalidFrequency {
                name: s.to_string(),
                reason: format!(
                    "frequency must be one of [{}]",
                    Frequency::accepted_names(true)
                ),
            })
    }
}

/// Number of occurrences per year; continuous compounding is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodsPerYear {
    Finite(u32),
    Unbounded,
}

impl PeriodsPerYear {
    pub fn as_f64(self) -> f64 {
        match self {
            PeriodsPerYear::Finite(k) => f64::from(k),
            PeriodsPerYear::Unbounded => f64::INFINITY,
        }
    }
}

/// Map a frequency to its periods per year.
///
/// `continuously` is rejected unless `allow_continuous` is set, which is the
/// case for compounding frequencies only.
pub fn periods_per_year(freq: Frequency, allow_continuous: bool) -> AmortiseResult<PeriodsPerYear> {
    let k = match freq {
        Frequency::Annually => 1,
        Frequency::Semiannually => 2,
        Frequency::Triannually => 3,
        Frequency::Quarterly => 4,
        Frequency::Bimonthly => 6,
        Frequency::Monthly => 12,
        Frequency::Fortnightly => 26,
        Frequency::Weekly => 52,
        Frequency::Daily => 365,
        Frequency::Continuously => {
            if allow_continuous {
                return Ok(PeriodsPerYear::Unbounded);
            }
            return Err(AmortiseError::InvalidFrequency {
                name: freq.name().to_string(),
                reason: format!(
                    "not a payment frequency; frequency must be one of [{}]",
                    Frequency::accepted_names(false)
                ),
            });
        }
    };
    Ok(PeriodsPerYear::Finite(k))
}

/// Parse a frequency name and look up its periods per year in one step.
pub fn parse_frequency(name: &str, allow_continuous: bool) -> AmortiseResult<PeriodsPerYear> {
    let freq: Frequency = name.parse()?;
    periods_per_year(freq, allow_continuous)
}

/// Calendar distance between consecutive payment dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarStep {
    Months(u32),
    Weeks(u32),
    Days(u32),
}

impl CalendarStep {
    /// `start` advanced by `n` steps. Month steps clamp to the last day of a
    /// shorter month (31 Jan + 1 month = 28/29 Feb).
    pub fn nth_date(self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            CalendarStep::Months(m) => {
                start.checked_add_months(Months::new(m.checked_mul(n)?))
            }
            CalendarStep::Weeks(w) => {
                let days = u64::from(w) * 7 * u64::from(n);
                start.checked_add_days(Days::new(days))
            }
            CalendarStep::Days(d) => {
                start.checked_add_days(Days::new(u64::from(d) * u64::from(n)))
            }
        }
    }
}

/// Calendar step for a periods-per-year count, or `None` when the count is
/// not one of [`TABULATED_PERIODS`].
pub fn calendar_step(periods: PeriodsPerYear) -> Option<CalendarStep> {
    let k = match periods {
        PeriodsPerYear::Finite(k) => k,
        PeriodsPerYear::Unbounded => return None,
    };
    match k {
        1 | 2 | 3 | 4 | 6 | 12 => Some(CalendarStep::Months(12 / k)),
        26 => Some(CalendarStep::Weeks(2)),
        52 => Some(CalendarStep::Weeks(1)),
        365 => Some(CalendarStep::Days(1)),
        _ => None,
    }
}
