use amortise_core::balance::BalanceFunction;
use amortise_core::frequency::Frequency;
use amortise_core::rate::period_rate;
use amortise_core::rounding::Rounding;
use amortise_core::schedule::{build_schedule, LoanKind, LoanTerms};
use amortise_core::summary::summarize;
use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use proptest::prelude::*;

fn terms(
    principal: f64,
    rate: f64,
    compounding: Frequency,
    payment: Frequency,
    n: u32,
) -> LoanTerms {
    LoanTerms {
        principal,
        interest_rate: rate,
        compounding_freq: compounding,
        payment_freq: payment,
        num_payments: n,
        fee: 0.0,
        start_date: None,
        kind: LoanKind::Amortized,
    }
}

// ===========================================================================
// Known answers (calculator.net business loan calculator)
// ===========================================================================

#[test]
fn test_quarterly_compounding_monthly_payments() {
    let s = summarize(
        &terms(1000.0, 0.05, Frequency::Quarterly, Frequency::Monthly, 36),
        Rounding::default(),
    )
    .unwrap();
    assert_eq!(s.periodic_payment, Some(29.96));
    assert_eq!(s.schedule.len(), 36);
}

#[test]
fn test_continuous_compounding_semiannual_payments() {
    let s = summarize(
        &terms(1000.0, 0.02, Frequency::Continuously, Frequency::Semiannually, 4),
        Rounding::default(),
    )
    .unwrap();
    assert_eq!(s.periodic_payment, Some(256.31));
}

#[test]
fn test_fee_included_in_totals() {
    let mut t = terms(1000.0, 0.05, Frequency::Quarterly, Frequency::Monthly, 36);
    t.fee = 10.0;
    let s = summarize(&t, Rounding::default()).unwrap();
    assert_eq!(s.interest_and_fee_total, 88.62);
    assert_eq!(s.payment_total, 1088.62);
}

#[test]
fn test_seven_percent_balances_in_schedule() {
    let expected = [
        100.00, 91.93, 83.81, 75.65, 67.44, 59.18, 50.87, 42.52, 34.11, 25.66, 17.16, 8.60,
    ];
    let s = summarize(
        &terms(100.0, 0.07, Frequency::Monthly, Frequency::Monthly, 12),
        Rounding::default(),
    )
    .unwrap();
    for (row, want) in s.schedule.iter().zip(expected) {
        assert_eq!(row.beginning_balance, want);
    }
    assert_eq!(s.schedule[11].ending_balance, 0.0);
}

#[test]
fn test_zero_rate_linear_schedule() {
    let s = summarize(
        &terms(1200.0, 0.0, Frequency::Monthly, Frequency::Monthly, 12),
        Rounding::None,
    )
    .unwrap();
    assert_eq!(s.periodic_payment, Some(100.0));
    for row in &s.schedule {
        assert_abs_diff_eq!(row.principal_payment, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(row.interest_payment, 0.0, epsilon = 1e-9);
    }
    assert!(s.interest_total.abs() < 1e-9);
}

#[test]
fn test_weekly_dates() {
    let mut t = terms(5000.0, 0.08, Frequency::Monthly, Frequency::Weekly, 10);
    t.start_date = NaiveDate::from_ymd_opt(2024, 12, 27);
    let rows = build_schedule(&t).unwrap();
    assert_eq!(rows[0].payment_date, NaiveDate::from_ymd_opt(2024, 12, 27));
    assert_eq!(rows[1].payment_date, NaiveDate::from_ymd_opt(2025, 1, 3));
    assert_eq!(rows[9].payment_date, NaiveDate::from_ymd_opt(2025, 2, 28));
}

#[test]
fn test_building_twice_is_identical() {
    let mut t = terms(250_000.0, 0.045, Frequency::Monthly, Frequency::Fortnightly, 780);
    t.start_date = NaiveDate::from_ymd_opt(2025, 6, 1);
    assert_eq!(build_schedule(&t).unwrap(), build_schedule(&t).unwrap());
}

// ===========================================================================
// Properties
// ===========================================================================

fn payment_freq() -> impl Strategy<Value = Frequency> {
    prop::sample::select(Frequency::ALL[..9].to_vec())
}

fn compounding_freq() -> impl Strategy<Value = Frequency> {
    prop::sample::select(Frequency::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_rows_reconcile(
        principal in 1.0f64..1_000_000.0,
        rate in 0.0f64..0.3,
        compounding in compounding_freq(),
        payment in payment_freq(),
        n in 1u32..400,
    ) {
        let t = terms(principal, rate, compounding, payment, n);
        let rows = build_schedule(&t).unwrap();
        prop_assert_eq!(rows.len(), n as usize);
        let tol = principal * 1e-9;
        for row in &rows {
            prop_assert!((row.beginning_balance - row.principal_payment - row.ending_balance).abs() <= tol);
        }
        prop_assert_eq!(rows.last().unwrap().ending_balance, 0.0);
        prop_assert!((rows[0].beginning_balance - principal).abs() <= tol);
    }

    #[test]
    fn prop_balance_endpoints(
        principal in 1.0f64..1_000_000.0,
        rate in 0.0f64..0.3,
        compounding in compounding_freq(),
        payment in payment_freq(),
        n in 1u32..400,
    ) {
        let r = period_rate(rate, compounding, payment).unwrap();
        let f = BalanceFunction::new(principal, r, n);
        let tol = principal * 1e-9;
        prop_assert!((f.balance_after(0.0) - principal).abs() <= tol);
        prop_assert!(f.balance_after(f64::from(n)).abs() <= tol);
    }

    #[test]
    fn prop_principal_sums_to_loan(
        principal in 1.0f64..1_000_000.0,
        rate in 0.0f64..0.3,
        payment in payment_freq(),
        n in 1u32..400,
    ) {
        let t = terms(principal, rate, Frequency::Monthly, payment, n);
        let rows = build_schedule(&t).unwrap();
        let repaid: f64 = rows.iter().map(|r| r.principal_payment).sum();
        prop_assert!((repaid - principal).abs() <= principal * 1e-9);
    }
}
