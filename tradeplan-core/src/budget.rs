//! Budget input validation.
//!
//! One attempt at a time: the surrounding re-prompt loop is a CLI concern.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BudgetError {
    #[error("enter a positive integer in base 10")]
    NotANumber,

    #[error("enter a number greater than zero")]
    NotPositive,
}

/// Validate one budget entry: a base-10 positive integer.
pub fn parse_budget(input: &str) -> Result<u64, BudgetError> {
    let value: i64 = input.trim().parse().map_err(|_| BudgetError::NotANumber)?;
    if value <= 0 {
        return Err(BudgetError::NotPositive);
    }
    Ok(value as u64)
}
