use crate::frequency::{periods_per_year, Frequency, PeriodsPerYear};
use crate::types::Rate;
use crate::AmortiseResult;

/// Effective interest rate per payment period.
///
/// With `j` compoundings and `k` payments per year the rate is
/// `(1 + i/j)^(j/k) - 1`; continuous compounding takes the limit
/// `e^(i/k) - 1`. The payment frequency must be discrete.
pub fn period_rate(
    annual_rate: Rate,
    compounding_freq: Frequency,
    payment_freq: Frequency,
) -> AmortiseResult<Rate> {
    let j = periods_per_year(compounding_freq, true)?;
    let k = periods_per_year(payment_freq, false)?.as_f64();

    let rate = match j {
        PeriodsPerYear::Unbounded => (annual_rate / k).exp() - 1.0,
        PeriodsPerYear::Finite(j) => {
            let j = f64::from(j);
            (1.0 + annual_rate / j).powf(j / k) - 1.0
        }
    };
    Ok(rate)
}
