//! Rate-limited sequential batch fetcher.
//!
//! Issues one provider request per symbol batch, strictly in order, pausing
//! for the rate-limit duration after every batch — including the final one.
//! The trailing pause matches the tool's long-standing provider quota
//! accounting; a fetch therefore always costs
//! `batch_count * rate_limit` of wall-clock delay.
//!
//! A failure in any batch aborts the whole fetch. No retry, no partial
//! result: callers treat a fetch as all-or-nothing per run.

use crate::provider::{FetchError, QuoteProvider};
use crate::quote::{QuoteRecord, QuoteSet};
use std::time::Duration;

/// Suspension seam for the rate-limit pause. The production implementation
/// blocks the thread; tests substitute a recorder.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// Pacer that parks the calling thread.
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Progress callbacks for a multi-batch fetch.
pub trait FetchProgress {
    /// Called before a batch request is issued.
    fn on_batch_start(&self, index: usize, total: usize, symbols: usize);

    /// Called after a batch response has been parsed and folded in.
    fn on_batch_complete(&self, index: usize, total: usize, quotes: usize);

    /// Called once the whole fetch has finished.
    fn on_fetch_complete(&self, total_quotes: usize);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_batch_start(&self, index: usize, total: usize, symbols: usize) {
        println!(
            "[{}/{}] Requesting {} symbol(s) from provider...",
            index + 1,
            total,
            symbols
        );
    }

    fn on_batch_complete(&self, index: usize, total: usize, quotes: usize) {
        println!("[{}/{}] Received {} quote(s)", index + 1, total, quotes);
    }

    fn on_fetch_complete(&self, total_quotes: usize) {
        println!("Fetch complete: {total_quotes} quote(s) collected");
    }
}

/// Progress reporter that prints nothing.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_batch_start(&self, _index: usize, _total: usize, _symbols: usize) {}
    fn on_batch_complete(&self, _index: usize, _total: usize, _quotes: usize) {}
    fn on_fetch_complete(&self, _total_quotes: usize) {}
}

/// Everything a successful fetch cycle produces: the assembled quote set and
/// the raw provider payloads (one array element per response row, in order).
#[derive(Debug)]
pub struct FetchOutcome {
    pub quotes: QuoteSet,
    pub raw_payload: Vec<serde_json::Value>,
}

/// Sequential fetcher holding the provider and the rate-limit duration.
pub struct RateLimitedFetcher<'a> {
    provider: &'a dyn QuoteProvider,
    rate_limit: Duration,
}

impl<'a> RateLimitedFetcher<'a> {
    pub fn new(provider: &'a dyn QuoteProvider, rate_limit: Duration) -> Self {
        Self {
            provider,
            rate_limit,
        }
    }

    /// Fetch every batch in order and assemble the quote set.
    ///
    /// Duplicate symbols across batches resolve last-write-wins (this should
    /// not occur with a unique universe, but the behavior is defined).
    pub fn fetch<'b>(
        &self,
        batches: impl ExactSizeIterator<Item = &'b [String]>,
        pacer: &mut dyn Pacer,
        progress: &dyn FetchProgress,
    ) -> Result<FetchOutcome, FetchError> {
        let total = batches.len();
        let mut records: Vec<QuoteRecord> = Vec::new();
        let mut raw_payload: Vec<serde_json::Value> = Vec::new();

        for (index, symbols) in batches.enumerate() {
            progress.on_batch_start(index, total, symbols.len());

            let batch = self.provider.fetch_batch(symbols)?;
            progress.on_batch_complete(index, total, batch.quotes.len());

            records.extend(batch.quotes);
            match batch.raw {
                serde_json::Value::Array(rows) => raw_payload.extend(rows),
                other => raw_payload.push(other),
            }

            // Pause after every batch, the final one included.
            pacer.pause(self.rate_limit);
        }

        let quotes = QuoteSet::from_records(records);
        progress.on_fetch_complete(quotes.len());

        Ok(FetchOutcome { quotes, raw_payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::BatchQuotes;
    use serde_json::json;
    use std::cell::RefCell;

    /// Scripted provider: serves canned quotes per batch, counts calls.
    struct ScriptedProvider {
        calls: RefCell<Vec<Vec<String>>>,
        fail_on_batch: Option<usize>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on_batch: None,
            }
        }

        fn failing_on(batch: usize) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on_batch: Some(batch),
            }
        }
    }

    impl QuoteProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn fetch_batch(&self, symbols: &[String]) -> Result<BatchQuotes, FetchError> {
            let call_index = self.calls.borrow().len();
            self.calls.borrow_mut().push(symbols.to_vec());

            if self.fail_on_batch == Some(call_index) {
                return Err(FetchError::HttpStatus { status: 500 });
            }

            let quotes = symbols
                .iter()
                .map(|s| QuoteRecord {
                    symbol: s.clone(),
                    price: 100.0,
                    market_cap: 1.0e9,
                })
                .collect();
            let raw = serde_json::Value::Array(
                symbols
                    .iter()
                    .map(|s| json!({ "symbol": s, "latestPrice": 100.0, "marketCap": 1.0e9 }))
                    .collect(),
            );
            Ok(BatchQuotes { quotes, raw })
        }
    }

    /// Pacer that records every pause instead of sleeping.
    struct RecordingPacer {
        pauses: Vec<Duration>,
    }

    impl RecordingPacer {
        fn new() -> Self {
            Self { pauses: Vec::new() }
        }
    }

    impl Pacer for RecordingPacer {
        fn pause(&mut self, duration: Duration) {
            self.pauses.push(duration);
        }
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assembles_quotes_across_batches_in_order() {
        let provider = ScriptedProvider::new();
        let fetcher = RateLimitedFetcher::new(&provider, Duration::from_secs(60));
        let universe = symbols(&["A", "B", "C"]);
        let batches = crate::batch::batch(&universe, 2).unwrap().collect::<Vec<_>>();
        let mut pacer = RecordingPacer::new();

        let outcome = fetcher
            .fetch(batches.into_iter(), &mut pacer, &SilentProgress)
            .unwrap();

        let seen: Vec<&str> = outcome.quotes.symbols().collect();
        assert_eq!(seen, vec!["A", "B", "C"]);
        assert_eq!(outcome.raw_payload.len(), 3);
        assert_eq!(provider.calls.borrow().len(), 2);
    }

    #[test]
    fn pauses_after_every_batch_including_last() {
        let provider = ScriptedProvider::new();
        let rate_limit = Duration::from_secs(60);
        let fetcher = RateLimitedFetcher::new(&provider, rate_limit);
        let universe = symbols(&["A", "B", "C", "D", "E"]);
        let batches = crate::batch::batch(&universe, 2).unwrap().collect::<Vec<_>>();
        let mut pacer = RecordingPacer::new();

        fetcher
            .fetch(batches.into_iter(), &mut pacer, &SilentProgress)
            .unwrap();

        // 3 batches → 3 pauses. The pause after the final batch is part of
        // the contract, not an accident.
        assert_eq!(pacer.pauses, vec![rate_limit; 3]);
    }

    #[test]
    fn batch_failure_aborts_with_no_partial_result() {
        let provider = ScriptedProvider::failing_on(1);
        let fetcher = RateLimitedFetcher::new(&provider, Duration::from_secs(60));
        let universe = symbols(&["A", "B", "C", "D"]);
        let batches = crate::batch::batch(&universe, 2).unwrap().collect::<Vec<_>>();
        let mut pacer = RecordingPacer::new();

        let result = fetcher.fetch(batches.into_iter(), &mut pacer, &SilentProgress);

        assert!(matches!(result, Err(FetchError::HttpStatus { status: 500 })));
        // The failing batch never completes, so only the first batch paused.
        assert_eq!(pacer.pauses.len(), 1);
    }

    #[test]
    fn duplicate_symbols_across_batches_resolve_last_write_wins() {
        struct DupProvider;
        impl QuoteProvider for DupProvider {
            fn name(&self) -> &str {
                "dup"
            }
            fn fetch_batch(&self, symbols: &[String]) -> Result<BatchQuotes, FetchError> {
                // Second batch re-reports AAPL at a different price.
                let price = if symbols.contains(&"MSFT".to_string()) {
                    200.0
                } else {
                    100.0
                };
                let mut quotes: Vec<QuoteRecord> = symbols
                    .iter()
                    .map(|s| QuoteRecord {
                        symbol: s.clone(),
                        price,
                        market_cap: 0.0,
                    })
                    .collect();
                if price == 200.0 {
                    quotes.push(QuoteRecord {
                        symbol: "AAPL".into(),
                        price: 111.0,
                        market_cap: 0.0,
                    });
                }
                Ok(BatchQuotes {
                    quotes,
                    raw: json!([]),
                })
            }
        }

        let provider = DupProvider;
        let fetcher = RateLimitedFetcher::new(&provider, Duration::ZERO);
        let universe = symbols(&["AAPL", "MSFT"]);
        let batches = crate::batch::batch(&universe, 1).unwrap().collect::<Vec<_>>();
        let mut pacer = RecordingPacer::new();

        let outcome = fetcher
            .fetch(batches.into_iter(), &mut pacer, &SilentProgress)
            .unwrap();

        assert_eq!(outcome.quotes.len(), 2);
        assert_eq!(outcome.quotes.get("AAPL").unwrap().price, 111.0);
        // Position is retained from the first sighting.
        let seen: Vec<&str> = outcome.quotes.symbols().collect();
        assert_eq!(seen, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn empty_batch_sequence_fetches_nothing() {
        let provider = ScriptedProvider::new();
        let fetcher = RateLimitedFetcher::new(&provider, Duration::from_secs(60));
        let universe: Vec<String> = Vec::new();
        let batches = crate::batch::batch(&universe, 10).unwrap().collect::<Vec<_>>();
        let mut pacer = RecordingPacer::new();

        let outcome = fetcher
            .fetch(batches.into_iter(), &mut pacer, &SilentProgress)
            .unwrap();

        assert!(outcome.quotes.is_empty());
        assert!(pacer.pauses.is_empty());
        assert_eq!(provider.calls.borrow().len(), 0);
    }
}
