//! Fixed periodic payments for amortized and interest-only loans.
//!
//! Inputs are assumed validated: a non-positive principal or payment count
//! yields a meaningless (possibly NaN or infinite) payment, not an error.

use crate::frequency::{periods_per_year, Frequency};
use crate::types::{Money, Rate};
use crate::AmortiseResult;

/// Level payment that retires `principal` over `num_payments` periods at
/// `period_rate` per period.
///
/// A zero rate falls back to straight-line repayment.
pub fn periodic_payment(principal: Money, period_rate: Rate, num_payments: u32) -> Money {
    let n = f64::from(num_payments);
    if period_rate == 0.0 {
        return principal / n;
    }
    principal * period_rate / (1.0 - (1.0 + period_rate).powf(-n))
}

/// Interest due each period on an interest-only loan.
pub fn interest_only_payment(
    principal: Money,
    annual_rate: Rate,
    payment_freq: Frequency,
) -> AmortiseResult<Money> {
    let k = periods_per_year(payment_freq, false)?.as_f64();
    Ok(principal * annual_rate / k)
}
