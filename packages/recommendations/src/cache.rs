//! File-backed cache of generated recommendations.
//!
//! Entries are keyed by a hash of every county metric and filter setting
//! the prompt depends on, so any change produces a fresh request.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Utc};
use county_health_county_models::CountyRecord;
use county_health_filter::{FilterDimension, FilterSpec};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Recommendation, RecommendationError};

pub const DEFAULT_CACHE_TTL_DAYS: u32 = 7;
pub const DEFAULT_CACHE_FILE: &str = "ai_recommendations_cache.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    data: Vec<Recommendation>,
    timestamp: DateTime<Utc>,
}

/// SHA-256 hex digest of the inputs a recommendation depends on.
#[must_use]
pub fn cache_key(county: &CountyRecord, filter: &FilterSpec) -> String {
    let range = |dimension| {
        filter
            .range(dimension)
            .map_or_else(|| "-".to_string(), |r| format!("{}:{}", r.min, r.max))
    };
    let dependencies = format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        county.fips,
        county.healthcare_access,
        county.vulnerability_index,
        county.opportunity_score,
        county.population,
        county.poverty_rate,
        county.disability_rate,
        filter.region().unwrap_or("all"),
        range(FilterDimension::Healthcare),
        range(FilterDimension::Population),
    );
    hex::encode(Sha256::digest(dependencies.as_bytes()))
}

pub struct RecommendationCache {
    path: Option<PathBuf>,
    ttl: Duration,
    entries: BTreeMap<String, CacheEntry>,
}

impl RecommendationCache {
    /// A cache that is never written to disk.
    #[must_use]
    pub fn in_memory(ttl_days: u32) -> Self {
        Self {
            path: None,
            ttl: Duration::days(i64::from(ttl_days)),
            entries: BTreeMap::new(),
        }
    }

    /// Opens the cache file at `path`. A missing file starts empty; an
    /// unreadable one is discarded with a warning.
    #[must_use]
    pub fn open(path: &Path, ttl_days: u32) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable cache {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Could not read cache {}: {e}", path.display());
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            entries,
            ..Self::in_memory(ttl_days)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: &str) -> Option<Vec<Recommendation>> {
        self.get_at(key, Utc::now())
    }

    /// Looks up `key` as of `now`. Expired entries are dropped.
    pub fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Option<Vec<Recommendation>> {
        let entry = self.entries.get(key)?;
        if now - entry.timestamp > self.ttl {
            log::debug!("Cache entry {key} expired");
            self.entries.remove(key);
            return None;
        }
        Some(entry.data.clone())
    }

    pub fn insert(&mut self, key: String, data: Vec<Recommendation>) {
        self.insert_at(key, data, Utc::now());
    }

    /// Stores `data` under `key`, replacing any previous entry.
    pub fn insert_at(&mut self, key: String, data: Vec<Recommendation>, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                data,
                timestamp: now,
            },
        );
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes the cache back to its file. A no-op for in-memory caches.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<(), RecommendationError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}
