//! Loan summaries: periodic payment, rounded schedule and totals.
//!
//! Totals are taken over the full-precision schedule; rounding is the last
//! step and touches every row field and every scalar alike.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::rounding::Rounding;
use crate::schedule::{build_schedule, loan_periodic_payment, LoanTerms, PaymentRow, Schedule};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::AmortiseResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Level payment; absent for interest-only loans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periodic_payment: Option<Money>,
    pub schedule: Schedule,
    pub interest_total: Money,
    pub interest_and_fee_total: Money,
    /// Principal plus interest plus fee
    pub payment_total: Money,
    /// (interest + fee) / principal
    pub return_rate: Rate,
}

fn round_row(row: PaymentRow, rounding: Rounding) -> PaymentRow {
    PaymentRow {
        beginning_balance: rounding.apply(row.beginning_balance),
        principal_payment: rounding.apply(row.principal_payment),
        interest_payment: rounding.apply(row.interest_payment),
        ending_balance: rounding.apply(row.ending_balance),
        ..row
    }
}

/// Summarise a loan, rounding the result for presentation.
pub fn summarize(terms: &LoanTerms, rounding: Rounding) -> AmortiseResult<SummaryResult> {
    let periodic_payment = loan_periodic_payment(terms)?;
    let schedule = build_schedule(terms)?;

    let interest_total: Money = schedule.iter().map(|r| r.interest_payment).sum();
    let interest_and_fee_total = interest_total + terms.fee;
    let payment_total = interest_and_fee_total + terms.principal;
    let return_rate = interest_and_fee_total / terms.principal;

    Ok(SummaryResult {
        periodic_payment: periodic_payment.map(|p| rounding.apply(p)),
        schedule: schedule
            .into_iter()
            .map(|row| round_row(row, rounding))
            .collect(),
        interest_total: rounding.apply(interest_total),
        interest_and_fee_total: rounding.apply(interest_and_fee_total),
        payment_total: rounding.apply(payment_total),
        return_rate: rounding.apply(return_rate),
    })
}

/// [`summarize`] wrapped in the standard output envelope.
pub fn summarize_with_metadata(
    terms: &LoanTerms,
    rounding: Rounding,
) -> AmortiseResult<ComputationOutput<SummaryResult>> {
    let start = Instant::now();
    let result = summarize(terms, rounding)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-form loan amortisation",
        terms,
        Vec::new(),
        elapsed,
        rounding.describe(),
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::Frequency;
    use crate::schedule::LoanKind;
    use approx::assert_abs_diff_eq;

    fn terms() -> LoanTerms {
        LoanTerms {
            principal: 1000.0,
            interest_rate: 0.05,
            compounding_freq: Frequency::Quarterly,
            payment_freq: Frequency::Monthly,
            num_payments: 36,
            fee: 10.0,
            start_date: None,
            kind: LoanKind::Amortized,
        }
    }

    #[test]
    fn test_summary_known_answer() {
        let s = summarize(&terms(), Rounding::default()).unwrap();
        assert_eq!(s.periodic_payment, Some(29.96));
        assert_eq!(s.interest_and_fee_total, 88.62);
        assert_eq!(s.schedule.len(), 36);
        assert_eq!(s.schedule[35].ending_balance, 0.0);
    }

    #[test]
    fn test_totals_are_consistent() {
        let s = summarize(&terms(), Rounding::None).unwrap();
        assert_abs_diff_eq!(s.interest_and_fee_total, s.interest_total + 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.payment_total, s.interest_and_fee_total + 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.return_rate, s.interest_and_fee_total / 1000.0, epsilon = 1e-15);
        // Sum of interest equals n payments less the principal.
        let a = s.periodic_payment.unwrap();
        assert_abs_diff_eq!(s.interest_total, 36.0 * a - 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rounding_touches_only_presentation() {
        let raw = summarize(&terms(), Rounding::None).unwrap();
        let rounded = summarize(&terms(), Rounding::DecimalPlaces(2)).unwrap();
        assert_eq!(rounded.interest_total, crate::rounding::round_to(raw.interest_total, 2));
        for (r, f) in rounded.schedule.iter().zip(&raw.schedule) {
            assert_eq!(r.principal_payment, crate::rounding::round_to(f.principal_payment, 2));
        }
    }

    #[test]
    fn test_interest_only_summary() {
        let mut t = terms();
        t.kind = LoanKind::InterestOnly;
        t.interest_rate = 0.12;
        t.num_payments = 12;
        let s = summarize(&t, Rounding::default()).unwrap();
        assert_eq!(s.periodic_payment, None);
        assert_eq!(s.interest_total, 120.0);
        assert_eq!(s.interest_and_fee_total, 130.0);
        assert_eq!(s.payment_total, 1130.0);
        assert_eq!(s.return_rate, 0.13);

        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("periodic_payment").is_none());
    }

    #[test]
    fn test_metadata_envelope() {
        let mut t = terms();
        t.start_date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1);
        let out = summarize_with_metadata(&t, Rounding::default()).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "f64, rounded to 2 dp");
        assert!(out.result.schedule.iter().all(|r| r.payment_date.is_some()));
    }
}
