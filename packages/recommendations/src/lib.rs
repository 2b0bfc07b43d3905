#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Policy recommendations for a selected county.
//!
//! Recommendations come from an `OpenAI`-compatible chat completions
//! endpoint behind [`RecommendationProvider`], are cached on disk for a
//! week, and degrade to rule-based [`fallback_recommendations`] whenever
//! the provider is missing or misbehaves. Generation never fails outright:
//! the result is always a [`RecommendationOutcome`].

pub mod cache;
mod fallback;
pub mod prompt;
pub mod provider;

pub use cache::{RecommendationCache, cache_key};
pub use fallback::fallback_recommendations;
pub use provider::{ChatCompletionsProvider, RecommendationProvider, provider_from_env};

use county_health_county_models::{CountyRecord, Priority};
use county_health_filter::FilterSpec;
use serde::{Deserialize, Serialize};

/// Errors that can occur while requesting recommendations.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    /// HTTP request to the provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the cache file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The provider returned an error status.
    #[error("Provider error: {message}")]
    Provider { message: String },

    #[error("AI recommendations unavailable - API key not configured")]
    MissingApiKey,

    #[error("Empty AI response")]
    EmptyResponse,

    /// The response text did not contain a usable recommendation list.
    #[error("Invalid AI response format: {message}")]
    MalformedResponse { message: String },
}

/// One actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Recommendations {
        items: Vec<Recommendation>,
        /// Whether `items` came from the cache.
        cached: bool,
    },
    /// The provider could not be used; `fallback` holds rule-based
    /// recommendations instead.
    Unavailable {
        error: String,
        fallback: Vec<Recommendation>,
    },
}

impl RecommendationOutcome {
    fn unavailable(error: &RecommendationError, county: &CountyRecord) -> Self {
        Self::Unavailable {
            error: error.to_string(),
            fallback: fallback_recommendations(county),
        }
    }

    /// The recommendations to show, whichever variant this is.
    #[must_use]
    pub fn items(&self) -> &[Recommendation] {
        match self {
            Self::Recommendations { items, .. } => items,
            Self::Unavailable { fallback, .. } => fallback,
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Recommendations { .. })
    }
}

/// Produces recommendations for `county`.
///
/// `peers` are same-cluster counties ordered best first; the first three are
/// included in the prompt. `filter` only contributes to the cache key.
/// Successful responses are cached and the cache is saved; a failed save is
/// logged and otherwise ignored.
pub async fn generate_recommendations(
    provider: Option<&dyn RecommendationProvider>,
    cache: &mut RecommendationCache,
    county: &CountyRecord,
    peers: &[&CountyRecord],
    filter: &FilterSpec,
) -> RecommendationOutcome {
    let Some(provider) = provider else {
        return RecommendationOutcome::unavailable(&RecommendationError::MissingApiKey, county);
    };

    let key = cache_key(county, filter);
    if let Some(items) = cache.get(&key) {
        log::debug!("Using cached recommendations for {}", county.fips);
        return RecommendationOutcome::Recommendations {
            items,
            cached: true,
        };
    }

    let user_prompt = prompt::build_prompt(county, peers);
    let result = provider
        .complete(prompt::SYSTEM_PROMPT, &user_prompt)
        .await
        .and_then(|text| prompt::parse_recommendations(&text));

    match result {
        Ok(items) => {
            cache.insert(key, items.clone());
            if let Err(e) = cache.save() {
                log::warn!("Failed to save recommendation cache: {e}");
            }
            RecommendationOutcome::Recommendations {
                items,
                cached: false,
            }
        }
        Err(e) => {
            log::warn!("AI recommendations failed for {}: {e}", county.fips);
            RecommendationOutcome::unavailable(&e, county)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    struct MockProvider {
        response: Mutex<Option<Result<String, RecommendationError>>>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(response: Result<String, RecommendationError>) -> Self {
            Self {
                response: Mutex::new(Some(response)),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl RecommendationProvider for MockProvider {
        async fn complete(
            &self,
            system: &str,
            user_prompt: &str,
        ) -> Result<String, RecommendationError> {
            assert_eq!(system, prompt::SYSTEM_PROMPT);
            assert!(user_prompt.contains("Healthcare Access Score"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(RecommendationError::EmptyResponse))
        }
    }

    const RESPONSE: &str = r#"[{"priority": "Medium", "category": "Workforce",
        "title": "Recruit rural physicians", "actions": ["Loan forgiveness"]}]"#;

    fn county() -> CountyRecord {
        let mut county = CountyRecord::with_fips("01001");
        county.healthcare_access = 35.0;
        county
    }

    #[tokio::test]
    async fn provider_response_is_cached() {
        let provider = MockProvider::new(Ok(RESPONSE.to_string()));
        let mut cache = RecommendationCache::in_memory(7);
        let county = county();
        let filter = FilterSpec::default();

        let first =
            generate_recommendations(Some(&provider), &mut cache, &county, &[], &filter).await;
        assert!(matches!(first, RecommendationOutcome::Recommendations { cached: false, .. }));
        assert_eq!(first.items()[0].title, "Recruit rural physicians");

        let second =
            generate_recommendations(Some(&provider), &mut cache, &county, &[], &filter).await;
        assert!(matches!(second, RecommendationOutcome::Recommendations { cached: true, .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_provider_falls_back() {
        let mut cache = RecommendationCache::in_memory(7);
        let outcome =
            generate_recommendations(None, &mut cache, &county(), &[], &FilterSpec::default())
                .await;

        let RecommendationOutcome::Unavailable { error, fallback } = &outcome else {
            panic!("expected unavailable, got {outcome:?}");
        };
        assert!(error.contains("API key not configured"));
        assert_eq!(fallback[0].title, "Improve Healthcare Access");
        assert!(!outcome.is_available());
    }

    #[tokio::test]
    async fn provider_errors_fall_back_without_caching() {
        for response in [
            Err(RecommendationError::Provider {
                message: "HTTP 500".to_string(),
            }),
            Ok("I cannot help with that.".to_string()),
            Ok("[]".to_string()),
        ] {
            let provider = MockProvider::new(response);
            let mut cache = RecommendationCache::in_memory(7);
            let outcome = generate_recommendations(
                Some(&provider),
                &mut cache,
                &county(),
                &[],
                &FilterSpec::default(),
            )
            .await;

            assert!(!outcome.is_available());
            assert!(!outcome.items().is_empty(), "fallback recommendations present");
            assert!(cache.is_empty());
        }
    }
}
