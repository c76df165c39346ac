//! Acquisition pipeline — cache check, rotation, batched fetch, store.
//!
//! State machine per run: check the cache; a valid cache short-circuits the
//! network entirely, a stale one is rotated to the backup slot before the
//! fresh fetch overwrites the primary, an absent one fetches directly with
//! no rotation. Allocation and spreadsheet emission are driven by the
//! caller once a quote set is in hand.
//!
//! Failure anywhere aborts the run. Because rotation happens only after the
//! staleness check and store only after a successful fetch, a previously
//! valid cache is never disturbed by a failed run.

use crate::batch::{batch, BatchError};
use crate::cache::{CacheError, QuoteCache};
use crate::config::PlanConfig;
use crate::fetcher::{FetchProgress, Pacer, RateLimitedFetcher};
use crate::provider::{FetchError, QuoteProvider};
use crate::quote::QuoteSet;
use crate::universe::Universe;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("failed to write raw results {}: {message}", path.display())]
    AuditWrite { path: PathBuf, message: String },
}

/// Where this run's quotes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOrigin {
    /// Loaded from a still-valid cache; no network traffic.
    Cache,
    /// Fetched from the provider this run.
    Fresh,
}

/// A completed acquisition: the quote set plus its origin.
#[derive(Debug)]
pub struct Acquisition {
    pub quotes: QuoteSet,
    pub origin: QuoteOrigin,
}

/// Wires batcher, fetcher, and cache together for one run.
pub struct Pipeline<'a> {
    config: &'a PlanConfig,
    provider: &'a dyn QuoteProvider,
    cache: QuoteCache,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PlanConfig, provider: &'a dyn QuoteProvider) -> Self {
        let cache = QuoteCache::new(
            config.storage.cache_path(),
            config.storage.backup_path(),
        );
        Self {
            config,
            provider,
            cache,
        }
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Produce this run's quote set, from cache or from the provider.
    ///
    /// `force` treats a present cache as stale: it is rotated and refetched
    /// even when still inside the expiry window.
    pub fn acquire(
        &self,
        universe: &Universe,
        force: bool,
        pacer: &mut dyn Pacer,
        progress: &dyn FetchProgress,
    ) -> Result<Acquisition, PipelineError> {
        let valid = !force && self.cache.is_valid(self.config.storage.expiry())?;
        if valid {
            return Ok(Acquisition {
                quotes: self.cache.load()?,
                origin: QuoteOrigin::Cache,
            });
        }

        // Stale or forced: keep one generation of history before the fresh
        // fetch overwrites the primary. Rotation must precede store.
        if self.cache.exists() {
            self.cache.rotate()?;
        }

        let batches: Vec<&[String]> =
            batch(universe.tickers(), self.config.provider.batch_size)?.collect();
        let fetcher = RateLimitedFetcher::new(self.provider, self.config.provider.rate_limit());
        let outcome = fetcher.fetch(batches.into_iter(), pacer, progress)?;

        self.cache.store(&outcome.quotes)?;
        self.write_raw_results(outcome.raw_payload)?;

        Ok(Acquisition {
            quotes: outcome.quotes,
            origin: QuoteOrigin::Fresh,
        })
    }

    /// Persist the raw provider payload for audit. Written only on a fresh
    /// fetch, never read back by the pipeline.
    fn write_raw_results(&self, payload: Vec<serde_json::Value>) -> Result<(), PipelineError> {
        let path = self.config.storage.raw_results_path();
        let json = serde_json::to_string_pretty(&serde_json::Value::Array(payload)).map_err(
            |e| PipelineError::AuditWrite {
                path: path.clone(),
                message: e.to_string(),
            },
        )?;
        fs::write(&path, json).map_err(|e| PipelineError::AuditWrite {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}
