pub mod aggregate;
pub mod amortisation;
pub mod balance;
pub mod error;
pub mod frequency;
pub mod loan;
pub mod rate;
pub mod rounding;
pub mod schedule;
pub mod summary;
pub mod types;

pub use aggregate::{aggregate_schedules, AggregatedRow, BucketKey, BucketPeriod};
pub use error::AmortiseError;
pub use frequency::{Frequency, PeriodsPerYear};
pub use loan::Loan;
pub use rounding::Rounding;
pub use schedule::{build_schedule, LoanKind, LoanTerms, PaymentRow, Schedule};
pub use summary::{summarize, SummaryResult};
pub use types::*;

/// Standard result type for all amortisation operations
pub type AmortiseResult<T> = Result<T, AmortiseError>;
