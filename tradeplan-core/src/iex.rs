//! IEX Cloud quote provider.
//!
//! One blocking GET per batch against the core-quote endpoint, symbols
//! comma-joined into the path, access token passed as a query parameter.
//! The token is an opaque externally-supplied secret: it is held in memory
//! for the life of the provider and never persisted or printed.

use crate::provider::{BatchQuotes, FetchError, QuoteProvider};
use crate::quote::QuoteRecord;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:100.0) Gecko/20100101 Firefox/100.0";

/// One element of the provider's response array.
#[derive(Debug, Deserialize)]
struct IexQuote {
    symbol: String,
    #[serde(rename = "latestPrice")]
    latest_price: f64,
    // marketCap is null for some instruments; recorded as 0.0 downstream.
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
}

/// IEX Cloud batch-quote client.
pub struct IexProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl IexProvider {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Batch endpoint URL: `{base}/{SYM1,SYM2,...}?token=...`
    fn batch_url(&self, symbols: &[String]) -> String {
        format!("{}/{}?token={}", self.base_url, symbols.join(","), self.token)
    }

    fn parse_payload(payload: serde_json::Value) -> Result<Vec<QuoteRecord>, FetchError> {
        let rows: Vec<IexQuote> = serde_json::from_value(payload)
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| QuoteRecord {
                symbol: row.symbol,
                price: row.latest_price,
                market_cap: row.market_cap.unwrap_or(0.0),
            })
            .collect())
    }
}

impl QuoteProvider for IexProvider {
    fn name(&self) -> &str {
        "iex_cloud"
    }

    fn fetch_batch(&self, symbols: &[String]) -> Result<BatchQuotes, FetchError> {
        let url = self.batch_url(symbols);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let raw: serde_json::Value = resp
            .json()
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let quotes = Self::parse_payload(raw.clone())?;
        Ok(BatchQuotes { quotes, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_url_joins_symbols_with_commas() {
        let provider =
            IexProvider::new("https://api.iex.cloud/v1/data/core/quote", "sk_test").unwrap();
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        assert_eq!(
            provider.batch_url(&symbols),
            "https://api.iex.cloud/v1/data/core/quote/AAPL,MSFT?token=sk_test"
        );
    }

    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let provider = IexProvider::new("https://example.com/quote/", "t").unwrap();
        assert_eq!(
            provider.batch_url(&["SPY".to_string()]),
            "https://example.com/quote/SPY?token=t"
        );
    }

    #[test]
    fn parses_response_rows() {
        let payload = json!([
            { "symbol": "AAPL", "latestPrice": 150.25, "marketCap": 2.4e12 },
            { "symbol": "MSFT", "latestPrice": 300.5, "marketCap": 2.2e12 }
        ]);
        let quotes = IexProvider::parse_payload(payload).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].symbol, "AAPL");
        assert_eq!(quotes[0].price, 150.25);
    }

    #[test]
    fn null_market_cap_becomes_zero() {
        let payload = json!([
            { "symbol": "XYZ", "latestPrice": 10.0, "marketCap": null }
        ]);
        let quotes = IexProvider::parse_payload(payload).unwrap();
        assert_eq!(quotes[0].market_cap, 0.0);
    }

    #[test]
    fn missing_price_is_a_parse_error() {
        let payload = json!([{ "symbol": "XYZ", "marketCap": 1.0 }]);
        assert!(matches!(
            IexProvider::parse_payload(payload),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn non_array_payload_is_a_parse_error() {
        let payload = json!({ "error": "unknown symbol" });
        assert!(matches!(
            IexProvider::parse_payload(payload),
            Err(FetchError::Parse(_))
        ));
    }
}
