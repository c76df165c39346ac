//! Quote provider seam and fetch error types.
//!
//! The [`QuoteProvider`] trait exists so the fetcher and pipeline can be
//! exercised against a scripted provider in tests. It is a seam, not a
//! multi-provider abstraction — the tool ships with exactly one
//! implementation ([`crate::iex::IexProvider`]).

use crate::quote::QuoteRecord;
use thiserror::Error;

/// Errors from a provider batch request. All are fatal for the run:
/// there is no retry and no partial-result fallback.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

/// Result of one provider batch request: the parsed per-symbol records plus
/// the raw response array, retained verbatim for the audit artifact.
#[derive(Debug, Clone)]
pub struct BatchQuotes {
    pub quotes: Vec<QuoteRecord>,
    pub raw: serde_json::Value,
}

/// A remote quote source that accepts one batch of symbols per request.
pub trait QuoteProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch quotes for every symbol in `symbols` with a single request.
    fn fetch_batch(&self, symbols: &[String]) -> Result<BatchQuotes, FetchError>;
}
