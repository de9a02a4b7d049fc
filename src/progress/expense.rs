use super::{require_positive_amount, ProgressError};

/// Validates an expense amount for create and replace
pub fn amount(value: f64) -> Result<f64, ProgressError> {
    require_positive_amount("amount", value)
}

/// Sum of the given amounts, ignoring non-finite values
pub fn period_total<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    amounts.into_iter().filter(|a| a.is_finite()).sum()
}
