use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::amortisation::{interest_only_payment, periodic_payment};
use crate::balance::{interest_only_balance_after, BalanceFunction};
use crate::error::AmortiseError;
use crate::frequency::{calendar_step, periods_per_year, CalendarStep, Frequency};
use crate::types::{Money, Rate};
use crate::AmortiseResult;

/// How the principal is repaid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    /// Equal blended payments, zero balance at term end.
    #[default]
    Amortized,
    /// Interest only each period; the full principal is due with the last payment.
    InterestOnly,
}

/// Already-validated loan parameters consumed by the schedule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Nominal annual rate (0.05 = 5%)
    pub interest_rate: Rate,
    pub compounding_freq: Frequency,
    pub payment_freq: Frequency,
    pub num_payments: u32,
    #[serde(default)]
    pub fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub kind: LoanKind,
}

/// One payment in a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub payment_sequence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub beginning_balance: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub ending_balance: Money,
}

impl PaymentRow {
    pub fn total_payment(&self) -> Money {
        self.principal_payment + self.interest_payment
    }
}

/// Payment rows in ascending sequence order, one per payment.
pub type Schedule = Vec<PaymentRow>;

/// Per-row formulas for each loan kind. Rows depend only on their own
/// sequence number.
#[derive(Debug, Clone, Copy)]
enum RowModel {
    Amortized {
        balance: BalanceFunction,
        payment: Money,
    },
    InterestOnly {
        principal: Money,
        num_payments: u32,
        payment: Money,
    },
}

impl RowModel {
    fn for_terms(terms: &LoanTerms) -> AmortiseResult<Self> {
        match terms.kind {
            LoanKind::Amortized => {
                let balance = BalanceFunction::from_terms(terms)?;
                let payment =
                    periodic_payment(terms.principal, balance.period_rate, terms.num_payments);
                debug!(
                    period_rate = balance.period_rate,
                    payment, "solved amortized loan"
                );
                Ok(RowModel::Amortized { balance, payment })
            }
            LoanKind::InterestOnly => {
                let payment =
                    interest_only_payment(terms.principal, terms.interest_rate, terms.payment_freq)?;
                debug!(payment, "solved interest-only loan");
                Ok(RowModel::InterestOnly {
                    principal: terms.principal,
                    num_payments: terms.num_payments,
                    payment,
                })
            }
        }
    }

    fn row(&self, seq: u32, payment_date: Option<NaiveDate>) -> PaymentRow {
        match *self {
            RowModel::Amortized { balance, payment } => {
                let beginning = balance.balance_after(f64::from(seq - 1));
                // Last row takes whatever is left so the loan closes at exactly zero.
                let principal_payment = if seq == balance.num_payments {
                    beginning
                } else {
                    beginning - balance.balance_after(f64::from(seq))
                };
                PaymentRow {
                    payment_sequence: seq,
                    payment_date,
                    beginning_balance: beginning,
                    principal_payment,
                    interest_payment: payment - principal_payment,
                    ending_balance: beginning - principal_payment,
                }
            }
            RowModel::InterestOnly {
                principal,
                num_payments,
                payment,
            } => {
                let beginning = interest_only_balance_after(principal, num_payments, seq - 1);
                let ending = interest_only_balance_after(principal, num_payments, seq);
                PaymentRow {
                    payment_sequence: seq,
                    payment_date,
                    beginning_balance: beginning,
                    principal_payment: beginning - ending,
                    interest_payment: payment,
                    ending_balance: ending,
                }
            }
        }
    }
}

/// The fixed payment of an amortized loan, or `None` for interest-only loans.
pub fn loan_periodic_payment(terms: &LoanTerms) -> AmortiseResult<Option<Money>> {
    match RowModel::for_terms(terms)? {
        RowModel::Amortized { payment, .. } => Ok(Some(payment)),
        RowModel::InterestOnly { .. } => Ok(None),
    }
}

/// Calendar step used to date the rows, if the loan has a start date and its
/// payment frequency is one of the tabulated ones.
pub fn payment_step(terms: &LoanTerms) -> AmortiseResult<Option<CalendarStep>> {
    let k = periods_per_year(terms.payment_freq, false)?;
    Ok(terms.start_date.and(calendar_step(k)))
}

/// Build the full-precision payment schedule for a loan.
pub fn build_schedule(terms: &LoanTerms) -> AmortiseResult<Schedule> {
    let model = RowModel::for_terms(terms)?;
    let step = payment_step(terms)?;

    let make_row = |seq: u32| -> AmortiseResult<PaymentRow> {
        let date = match (terms.start_date, step) {
            (Some(start), Some(step)) => Some(step.nth_date(start, seq - 1).ok_or_else(|| {
                AmortiseError::DateError(format!(
                    "payment {seq} falls outside the supported calendar range"
                ))
            })?),
            _ => None,
        };
        Ok(model.row(seq, date))
    };

    #[cfg(feature = "parallel")]
    let rows = (1..=terms.num_payments)
        .into_par_iter()
        .map(make_row)
        .collect::<AmortiseResult<Schedule>>()?;

    #[cfg(not(feature = "parallel"))]
    let rows = (1..=terms.num_payments)
        .map(make_row)
        .collect::<AmortiseResult<Schedule>>()?;

    debug!(rows = rows.len(), dated = step.is_some(), "built payment schedule");
    Ok(rows)
}
