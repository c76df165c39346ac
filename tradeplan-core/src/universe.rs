//! Symbol universe — the ordered ticker list the run operates on.
//!
//! Loaded once at startup from a CSV file with a `Ticker` column and
//! immutable for the run. Duplicate tickers are dropped (first occurrence
//! wins) so the downstream insert-once invariant holds.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read universe file {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse universe file {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Deserialize)]
struct TickerRow {
    #[serde(rename = "Ticker")]
    ticker: String,
}

/// Ordered, de-duplicated ticker list.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    tickers: Vec<String>,
}

impl Universe {
    /// Load a universe from a CSV file with a `Ticker` column.
    pub fn from_csv_file(path: &Path) -> Result<Self, UniverseError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| UniverseError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut tickers = Vec::new();
        let mut seen = HashSet::new();
        for row in reader.deserialize::<TickerRow>() {
            let row = row.map_err(|e| UniverseError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            if seen.insert(row.ticker.clone()) {
                tickers.push(row.ticker);
            }
        }
        Ok(Self { tickers })
    }

    /// Build a universe directly from a ticker list (tests, ad-hoc runs).
    pub fn from_tickers(tickers: impl IntoIterator<Item = String>) -> Self {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for ticker in tickers {
            if seen.insert(ticker.clone()) {
                out.push(ticker);
            }
        }
        Self { tickers: out }
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_universe(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_tickers_in_file_order() {
        let file = write_universe("Ticker\nMMM\nAOS\nABT\n");
        let universe = Universe::from_csv_file(file.path()).unwrap();
        assert_eq!(universe.tickers(), &["MMM", "AOS", "ABT"]);
    }

    #[test]
    fn ignores_extra_columns() {
        let file = write_universe("Ticker,Name\nAAPL,Apple Inc.\nMSFT,Microsoft\n");
        let universe = Universe::from_csv_file(file.path()).unwrap();
        assert_eq!(universe.tickers(), &["AAPL", "MSFT"]);
    }

    #[test]
    fn drops_duplicates_keeping_first() {
        let file = write_universe("Ticker\nAAPL\nMSFT\nAAPL\n");
        let universe = Universe::from_csv_file(file.path()).unwrap();
        assert_eq!(universe.tickers(), &["AAPL", "MSFT"]);
    }

    #[test]
    fn missing_ticker_column_is_a_parse_error() {
        let file = write_universe("Symbol\nAAPL\n");
        assert!(matches!(
            Universe::from_csv_file(file.path()),
            Err(UniverseError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Universe::from_csv_file(&dir.path().join("absent.csv")),
            Err(UniverseError::Io { .. })
        ));
    }

    #[test]
    fn empty_table_yields_empty_universe() {
        let file = write_universe("Ticker\n");
        let universe = Universe::from_csv_file(file.path()).unwrap();
        assert!(universe.is_empty());
    }

    #[test]
    fn from_tickers_dedups_in_order() {
        let universe = Universe::from_tickers(
            ["SPY", "QQQ", "SPY"].map(String::from),
        );
        assert_eq!(universe.tickers(), &["SPY", "QQQ"]);
    }
}
