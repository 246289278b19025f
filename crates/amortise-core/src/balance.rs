use serde::{Deserialize, Serialize};

use crate::rate::period_rate;
use crate::schedule::LoanTerms;
use crate::types::{Money, Rate};
use crate::AmortiseResult;

/// Outstanding balance of an amortized loan as a closed-form function of the
/// number of elapsed periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceFunction {
    pub principal: Money,
    pub period_rate: Rate,
    pub num_payments: u32,
}

impl BalanceFunction {
    pub fn new(principal: Money, period_rate: Rate, num_payments: u32) -> Self {
        Self {
            principal,
            period_rate,
            num_payments,
        }
    }

    pub fn from_terms(terms: &LoanTerms) -> AmortiseResult<Self> {
        let rate = period_rate(terms.interest_rate, terms.compounding_freq, terms.payment_freq)?;
        Ok(Self::new(terms.principal, rate, terms.num_payments))
    }

    /// Balance remaining after `t` periods. Every call is independent, so any
    /// set of periods can be evaluated in any order.
    pub fn balance_after(&self, t: f64) -> Money {
        let p = self.principal;
        let n = f64::from(self.num_payments);
        let r = self.period_rate;
        if r == 0.0 {
            return p - t * p / n;
        }
        p * (1.0 - ((1.0 + r).powf(t) - 1.0) / ((1.0 + r).powf(n) - 1.0))
    }
}

/// Interest-only loans carry the full principal until the final payment.
pub fn interest_only_balance_after(principal: Money, num_payments: u32, t: u32) -> Money {
    if t >= num_payments {
        0.0
    } else {
        principal
    }
}
