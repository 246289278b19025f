//! Loan records as loaded from JSON, with parameter checks.
//!
//! A [`Loan`] is the caller-facing description of a loan. It is validated
//! before its [`LoanTerms`] reach the schedule engine.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AmortiseError;
use crate::frequency::{periods_per_year, Frequency};
use crate::rounding::Rounding;
use crate::schedule::{LoanKind, LoanTerms};
use crate::summary::{summarize, summarize_with_metadata, SummaryResult};
use crate::types::{ComputationOutput, Money, Rate};
use crate::AmortiseResult;

fn default_code() -> String {
    format!("loan-{}", Local::now().format("%Y-%m-%dT%H:%M:%S"))
}

fn default_principal() -> Money {
    1.0
}

fn default_payment_freq() -> Frequency {
    Frequency::Monthly
}

fn default_num_payments() -> u32 {
    1
}

/// Keys every loan document must carry. `compounding_freq` is optional and
/// `start_date` may be `null` for an undated loan.
pub const REQUIRED_KEYS: [&str; 8] = [
    "code",
    "kind",
    "principal",
    "interest_rate",
    "payment_freq",
    "num_payments",
    "fee",
    "start_date",
];

/// Unknown keys in the JSON are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub code: String,
    pub kind: LoanKind,
    pub principal: Money,
    pub interest_rate: Rate,
    pub payment_freq: Frequency,
    /// Defaults to the payment frequency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compounding_freq: Option<Frequency>,
    pub num_payments: u32,
    pub fee: Money,
    pub start_date: Option<NaiveDate>,
}

impl Default for Loan {
    fn default() -> Self {
        Self {
            code: default_code(),
            kind: LoanKind::default(),
            principal: default_principal(),
            interest_rate: 0.0,
            payment_freq: default_payment_freq(),
            compounding_freq: None,
            num_payments: default_num_payments(),
            fee: 0.0,
            start_date: None,
        }
    }
}

impl Loan {
    pub fn compounding_freq(&self) -> Frequency {
        self.compounding_freq.unwrap_or(self.payment_freq)
    }

    /// Check the parameters the schedule engine assumes.
    pub fn validate(&self) -> AmortiseResult<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(AmortiseError::InvalidInput {
                field: "principal".into(),
                reason: "Principal must be a positive number".into(),
            });
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err(AmortiseError::InvalidInput {
                field: "interest_rate".into(),
                reason: "Interest rate must be non-negative".into(),
            });
        }
        if !self.fee.is_finite() || self.fee < 0.0 {
            return Err(AmortiseError::InvalidInput {
                field: "fee".into(),
                reason: "Fee must be non-negative".into(),
            });
        }
        if self.num_payments == 0 {
            return Err(AmortiseError::InvalidInput {
                field: "num_payments".into(),
                reason: "Number of payments must be a positive integer".into(),
            });
        }
        periods_per_year(self.payment_freq, false)?;
        Ok(())
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal,
            interest_rate: self.interest_rate,
            compounding_freq: self.compounding_freq(),
            payment_freq: self.payment_freq,
            num_payments: self.num_payments,
            fee: self.fee,
            start_date: self.start_date,
            kind: self.kind,
        }
    }

    pub fn summarize(&self, rounding: Rounding) -> AmortiseResult<SummaryResult> {
        self.validate()?;
        summarize(&self.terms(), rounding)
    }

    pub fn summarize_with_metadata(
        &self,
        rounding: Rounding,
    ) -> AmortiseResult<ComputationOutput<SummaryResult>> {
        self.validate()?;
        summarize_with_metadata(&self.terms(), rounding)
    }

    /// Parse and validate a loan from JSON text.
    pub fn from_json_str(json: &str) -> AmortiseResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Parse and validate a loan from an already-decoded JSON value.
    ///
    /// Every key in [`REQUIRED_KEYS`] must be present.
    pub fn from_json_value(value: serde_json::Value) -> AmortiseResult<Self> {
        check_required_keys(&value)?;
        let loan: Loan = serde_json::from_value(value)?;
        loan.validate()?;
        Ok(loan)
    }

    pub fn to_json_value(&self) -> AmortiseResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn check_required_keys(value: &serde_json::Value) -> AmortiseResult<()> {
    let Some(map) = value.as_object() else {
        return Err(AmortiseError::InvalidInput {
            field: "loan".into(),
            reason: "Loan parameters must be a JSON object".into(),
        });
    };
    match REQUIRED_KEYS.iter().find(|key| !map.contains_key(**key)) {
        Some(key) => Err(AmortiseError::InvalidInput {
            field: (*key).into(),
            reason: format!("Missing required loan parameter '{key}'"),
        }),
        None => Ok(()),
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            LoanKind::Amortized => "amortized",
            LoanKind::InterestOnly => "interest_only",
        };
        writeln!(f, "code: {}", self.code)?;
        writeln!(f, "kind: {kind}")?;
        writeln!(f, "principal: {}", self.principal)?;
        writeln!(f, "interest_rate: {}", self.interest_rate)?;
        writeln!(f, "payment_freq: {}", self.payment_freq)?;
        writeln!(f, "compounding_freq: {}", self.compounding_freq())?;
        writeln!(f, "num_payments: {}", self.num_payments)?;
        writeln!(f, "fee: {}", self.fee)?;
        match self.start_date {
            Some(date) => write!(f, "start_date: {date}"),
            None => write!(f, "start_date: None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Loan {
        Loan {
            code: "test-20180324".into(),
            kind: LoanKind::Amortized,
            principal: 10_000.0,
            interest_rate: 0.12,
            payment_freq: Frequency::Monthly,
            compounding_freq: None,
            num_payments: 6,
            fee: 250.0,
            start_date: NaiveDate::from_ymd_opt(2018, 3, 24),
        }
    }

    #[test]
    fn test_valid_loan() {
        assert!(sample().validate().is_ok());
        assert_eq!(sample().compounding_freq(), Frequency::Monthly);
    }

    #[test]
    fn test_invalid_fields() {
        let mut l = sample();
        l.interest_rate = -1.0;
        assert!(matches!(
            l.validate(),
            Err(AmortiseError::InvalidInput { ref field, .. }) if field == "interest_rate"
        ));

        let mut l = sample();
        l.principal = 0.0;
        assert!(l.validate().is_err());

        let mut l = sample();
        l.fee = f64::NAN;
        assert!(l.validate().is_err());

        let mut l = sample();
        l.num_payments = 0;
        assert!(l.validate().is_err());

        let mut l = sample();
        l.payment_freq = Frequency::Continuously;
        assert!(matches!(
            l.validate(),
            Err(AmortiseError::InvalidFrequency { .. })
        ));
    }

    #[test]
    fn test_default_loan() {
        let loan = Loan::default();
        assert!(loan.code.starts_with("loan-"));
        assert_eq!(loan.kind, LoanKind::Amortized);
        assert_eq!(loan.principal, 1.0);
        assert_eq!(loan.payment_freq, Frequency::Monthly);
        assert_eq!(loan.num_payments, 1);
    }

    #[test]
    fn test_missing_keys_rejected() {
        let err = Loan::from_json_str(r#"{"code": "x"}"#).unwrap_err();
        assert!(matches!(
            err,
            AmortiseError::InvalidInput { ref field, .. } if field == "kind"
        ));

        let mut value = sample().to_json_value().unwrap();
        value.as_object_mut().unwrap().remove("fee");
        assert!(matches!(
            Loan::from_json_value(value),
            Err(AmortiseError::InvalidInput { ref field, .. }) if field == "fee"
        ));
    }

    #[test]
    fn test_compounding_optional_and_null_start_date() {
        let json = r#"{
            "code": "x", "kind": "amortized", "principal": 500,
            "interest_rate": 0.1, "payment_freq": "monthly",
            "num_payments": 3, "fee": 0, "start_date": null
        }"#;
        let loan = Loan::from_json_str(json).unwrap();
        assert_eq!(loan.compounding_freq(), Frequency::Monthly);
        assert_eq!(loan.start_date, None);
        assert_eq!(Loan::from_json_value(loan.to_json_value().unwrap()).unwrap(), loan);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            Loan::from_json_str("[1, 2]"),
            Err(AmortiseError::InvalidInput { ref field, .. }) if field == "loan"
        ));
    }

    #[test]
    fn test_from_json_ignores_extra_keys() {
        let json = r#"{
            "code": "x", "kind": "interest_only", "principal": 500,
            "interest_rate": 0.1, "payment_freq": "quarterly",
            "num_payments": 4, "fee": 0, "start_date": "2020-01-31",
            "bingo": "bongo"
        }"#;
        let loan = Loan::from_json_str(json).unwrap();
        assert_eq!(loan.kind, LoanKind::InterestOnly);
        assert_eq!(loan.start_date, NaiveDate::from_ymd_opt(2020, 1, 31));
    }

    #[test]
    fn test_bad_date_rejected() {
        let json = r#"{
            "code": "x", "kind": "amortized", "principal": 500,
            "interest_rate": 0.1, "payment_freq": "monthly",
            "num_payments": 3, "fee": 0, "start_date": "23-02-2018"
        }"#;
        assert!(Loan::from_json_str(json).is_err());
    }

    #[test]
    fn test_default_loan_summarizes() {
        for kind in [LoanKind::Amortized, LoanKind::InterestOnly] {
            let loan = Loan {
                kind,
                ..Loan::default()
            };
            let s = loan.summarize(Rounding::default()).unwrap();
            assert_eq!(s.schedule.len(), 1);
            assert_eq!(s.schedule[0].principal_payment, 1.0);
            assert_eq!(s.interest_total, 0.0);
        }
    }

    #[test]
    fn test_display_lists_attributes() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "code: test-20180324");
        assert_eq!(lines[5], "compounding_freq: monthly");
        assert_eq!(lines[8], "start_date: 2018-03-24");
    }
}
