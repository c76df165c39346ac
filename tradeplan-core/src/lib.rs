//! TradePlan Core — batch quote acquisition, cache lifecycle, equal-weight
//! allocation.
//!
//! This crate contains the heart of the recommendation tool:
//! - Symbol batching with order-preserving fixed-size chunks
//! - Rate-limited sequential fetcher over a provider seam
//! - Primary/backup CSV cache with age-based expiry and single-generation
//!   rotation
//! - Equal-weight allocation engine (budget → whole shares)
//! - Pipeline orchestration (cache check → load or rotate+fetch+store)
//! - Run configuration and budget-input validation
//!
//! Execution is single-threaded and strictly sequential; the only
//! suspension point is the rate-limit pause inside the fetcher.

pub mod alloc;
pub mod batch;
pub mod budget;
pub mod cache;
pub mod config;
pub mod fetcher;
pub mod iex;
pub mod pipeline;
pub mod provider;
pub mod quote;
pub mod universe;

pub use alloc::{allocate, AllocError, AllocationPlan, PlannedPosition};
pub use batch::{batch, BatchError, Batches};
pub use budget::{parse_budget, BudgetError};
pub use cache::{CacheError, QuoteCache};
pub use config::{ConfigError, OutputSettings, PlanConfig, ProviderSettings, StorageSettings};
pub use fetcher::{
    FetchOutcome, FetchProgress, Pacer, RateLimitedFetcher, SilentProgress, StdoutProgress,
    ThreadPacer,
};
pub use iex::IexProvider;
pub use pipeline::{Acquisition, Pipeline, PipelineError, QuoteOrigin};
pub use provider::{BatchQuotes, FetchError, QuoteProvider};
pub use quote::{QuoteRecord, QuoteSet};
pub use universe::{Universe, UniverseError};
