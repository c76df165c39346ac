//! Quote cache — primary/backup CSV pair with age-based expiry.
//!
//! The cache is a single human-diffable CSV table
//! (`symbol,price,marketCap,sharesToBuy` columns). The primary file's
//! filesystem creation time is the sole freshness signal: a file whose age
//! is strictly less than the expiry window is valid; age equal to the
//! window is already expired. On invalidation the primary is moved to the
//! single backup slot (overwriting any prior backup) before a fresh fetch
//! replaces it.
//!
//! Writes are atomic (write to .tmp, rename into place).
//!
//! The cache/backup pair is not protected by any lock. Concurrent runs
//! against the same paths are unsafe: last writer wins, and a reader
//! overlapping a writer may observe a torn table.

use crate::quote::{QuoteRecord, QuoteSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("filesystem does not report a creation time for {}: {message}", path.display())]
    CreationTimeUnavailable { path: PathBuf, message: String },

    #[error("malformed cache table {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

/// One row of the cache table. The shares column is written empty by the
/// core; it exists so the table mirrors the output sheet's shape.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRow {
    symbol: String,
    price: f64,
    #[serde(rename = "marketCap")]
    market_cap: f64,
    #[serde(rename = "sharesToBuy")]
    shares_to_buy: Option<u64>,
}

/// Age-expiring quote cache over a primary/backup file pair.
pub struct QuoteCache {
    primary: PathBuf,
    backup: PathBuf,
}

impl QuoteCache {
    pub fn new(primary: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            backup: backup.into(),
        }
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    pub fn exists(&self) -> bool {
        self.primary.exists()
    }

    /// Creation timestamp of the primary file.
    ///
    /// A platform that cannot report creation time yields
    /// [`CacheError::CreationTimeUnavailable`]: fatal, never silently
    /// treated as "expired".
    pub fn created_at(&self) -> Result<SystemTime, CacheError> {
        let meta = fs::metadata(&self.primary).map_err(|e| CacheError::Io {
            path: self.primary.clone(),
            message: e.to_string(),
        })?;
        meta.created().map_err(|e| CacheError::CreationTimeUnavailable {
            path: self.primary.clone(),
            message: e.to_string(),
        })
    }

    /// Age of the primary file. A creation time in the future (clock skew)
    /// clamps to zero, so skew never invalidates a good cache.
    pub fn age(&self) -> Result<Duration, CacheError> {
        let created = self.created_at()?;
        Ok(SystemTime::now()
            .duration_since(created)
            .unwrap_or(Duration::ZERO))
    }

    /// True iff the primary file exists and is younger than `expiry`.
    pub fn is_valid(&self, expiry: Duration) -> Result<bool, CacheError> {
        if !self.exists() {
            return Ok(false);
        }
        Ok(is_fresh(self.age()?, expiry))
    }

    /// Move the primary to the backup slot, overwriting any prior backup.
    /// No-op when the primary is absent. Single-generation history: older
    /// backups are lost.
    pub fn rotate(&self) -> Result<(), CacheError> {
        if !self.exists() {
            return Ok(());
        }
        // fs::rename onto an existing file is not portable; clear the slot.
        if self.backup.exists() {
            fs::remove_file(&self.backup).map_err(|e| CacheError::Io {
                path: self.backup.clone(),
                message: e.to_string(),
            })?;
        }
        fs::rename(&self.primary, &self.backup).map_err(|e| CacheError::Io {
            path: self.backup.clone(),
            message: format!("rotate failed: {e}"),
        })
    }

    /// Load the cached table, preserving row order as the canonical symbol
    /// order for this run.
    pub fn load(&self) -> Result<QuoteSet, CacheError> {
        let mut reader = csv::Reader::from_path(&self.primary).map_err(|e| CacheError::Io {
            path: self.primary.clone(),
            message: e.to_string(),
        })?;

        let mut set = QuoteSet::new();
        for row in reader.deserialize::<CacheRow>() {
            let row = row.map_err(|e| CacheError::Malformed {
                path: self.primary.clone(),
                message: e.to_string(),
            })?;
            set.insert(QuoteRecord {
                symbol: row.symbol,
                price: row.price,
                market_cap: row.market_cap,
            });
        }
        Ok(set)
    }

    /// Serialize the full quote set, overwriting the primary file.
    pub fn store(&self, quotes: &QuoteSet) -> Result<(), CacheError> {
        if let Some(parent) = self.primary.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
        }

        let mut writer = csv::Writer::from_writer(vec![]);
        for record in quotes.iter() {
            writer
                .serialize(CacheRow {
                    symbol: record.symbol.clone(),
                    price: record.price,
                    market_cap: record.market_cap,
                    shares_to_buy: None,
                })
                .map_err(|e| CacheError::Io {
                    path: self.primary.clone(),
                    message: e.to_string(),
                })?;
        }
        let data = writer.into_inner().map_err(|e| CacheError::Io {
            path: self.primary.clone(),
            message: e.to_string(),
        })?;

        let tmp_path = self.primary.with_extension("csv.tmp");
        fs::write(&tmp_path, data).map_err(|e| CacheError::Io {
            path: tmp_path.clone(),
            message: e.to_string(),
        })?;
        fs::rename(&tmp_path, &self.primary).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            CacheError::Io {
                path: self.primary.clone(),
                message: format!("atomic rename failed: {e}"),
            }
        })
    }
}

/// Strict-`<` freshness test: age exactly equal to the window is expired.
fn is_fresh(age: Duration, expiry: Duration) -> bool {
    age < expiry
}
