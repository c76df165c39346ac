//! Equal-weight allocation engine.
//!
//! Splits a fixed budget evenly across every symbol in the quote set, then
//! converts each slice to whole shares: one division and one floor per
//! symbol, so the result is byte-for-byte reproducible for identical inputs.

use crate::quote::QuoteSet;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AllocError {
    #[error("cannot allocate across an empty quote set")]
    EmptyUniverse,

    #[error("invalid price {price} for {symbol}")]
    InvalidPrice { symbol: String, price: f64 },
}

/// One recommended position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedPosition {
    pub symbol: String,
    pub price: f64,
    pub market_cap: f64,
    pub shares: u64,
}

/// The full recommendation: one position per quote, in quote-set order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    pub positions: Vec<PlannedPosition>,
    /// Budget slice assigned to each symbol before share rounding.
    pub position_size: f64,
    pub budget: f64,
}

impl AllocationPlan {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total cost of the recommended whole-share purchases.
    pub fn invested(&self) -> f64 {
        self.positions
            .iter()
            .map(|p| p.shares as f64 * p.price)
            .sum()
    }
}

/// Compute the equal-weight plan for `quotes` under `budget`.
///
/// `budget` must be positive; the interactive boundary validates it before
/// it reaches the engine. A quote with a non-positive (or non-finite) price
/// fails the whole allocation; a silent infinite or negative share count is
/// never produced.
pub fn allocate(quotes: &QuoteSet, budget: f64) -> Result<AllocationPlan, AllocError> {
    if quotes.is_empty() {
        return Err(AllocError::EmptyUniverse);
    }

    let position_size = budget / quotes.len() as f64;

    let mut positions = Vec::with_capacity(quotes.len());
    for record in quotes.iter() {
        if record.price <= 0.0 || !record.price.is_finite() {
            return Err(AllocError::InvalidPrice {
                symbol: record.symbol.clone(),
                price: record.price,
            });
        }
        positions.push(PlannedPosition {
            symbol: record.symbol.clone(),
            price: record.price,
            market_cap: record.market_cap,
            shares: (position_size / record.price).floor() as u64,
        });
    }

    Ok(AllocationPlan {
        positions,
        position_size,
        budget,
    })
}
