#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory dataset for the county health map.
//!
//! [`Dataset`] holds every county, state, cluster, and precomputed record
//! loaded from a data directory. It is read-only after load; all
//! interaction goes through [`DashboardState::reduce`] and the pure view
//! functions in [`view`].

pub mod analysis;
pub mod config;
mod load;
pub mod models;
pub mod paths;
mod state;
pub mod view;

pub use config::{DashboardConfig, RecommendationSettings};
pub use state::{Action, AnalysisMode, DashboardState};

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use county_health_color::ColorScaleTable;
use county_health_county_models::{ClusterDefinition, CountyRecord, StateSummary};
use models::{CountyInsightsRecord, PolicyRecommendationRecord, PrecomputedInsight, ProjectionRecord};

/// Errors that can occur while loading dashboard data or configuration.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file was read but is not valid JSON for its record type.
    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Config TOML did not parse.
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Neither county file in the data directory produced any rows.
    #[error("No usable county data in {}", .dir.display())]
    NoCountyData { dir: PathBuf },
}

/// Every record the dashboard works from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    counties: Vec<CountyRecord>,
    by_fips: BTreeMap<String, usize>,
    clusters: Vec<ClusterDefinition>,
    states: Vec<StateSummary>,
    scales: ColorScaleTable,
    policy_recommendations: Vec<PolicyRecommendationRecord>,
    projections: Vec<ProjectionRecord>,
    insights: Vec<CountyInsightsRecord>,
}

impl Dataset {
    /// Loads a data directory. See [`paths`] for the expected file names.
    ///
    /// Only county data is required; every other file degrades to derived
    /// or empty data with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NoCountyData`] if neither county file yields
    /// any rows.
    pub fn load(data_dir: &Path) -> Result<Self, DatasetError> {
        load::load(data_dir)
    }

    /// Builds a dataset from county rows alone, deriving clusters and state
    /// summaries and using the built-in color scales.
    #[must_use]
    pub fn from_counties(counties: Vec<CountyRecord>) -> Self {
        let mut by_fips = BTreeMap::new();
        let mut unique = Vec::with_capacity(counties.len());
        for county in counties {
            if by_fips.contains_key(&county.fips) {
                log::warn!("Duplicate FIPS {}; keeping the first row", county.fips);
                continue;
            }
            by_fips.insert(county.fips.clone(), unique.len());
            unique.push(county);
        }

        Self {
            clusters: analysis::derive_clusters(&unique),
            states: analysis::derive_state_summaries(&unique),
            scales: ColorScaleTable::builtin(),
            counties: unique,
            by_fips,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn counties(&self) -> &[CountyRecord] {
        &self.counties
    }

    #[must_use]
    pub fn county(&self, fips: &str) -> Option<&CountyRecord> {
        self.by_fips.get(fips).map(|&i| &self.counties[i])
    }

    /// Cluster definitions sorted by id.
    #[must_use]
    pub fn clusters(&self) -> &[ClusterDefinition] {
        &self.clusters
    }

    #[must_use]
    pub fn cluster_ids(&self) -> Vec<u8> {
        self.clusters.iter().map(|c| c.id).collect()
    }

    #[must_use]
    pub fn states(&self) -> &[StateSummary] {
        &self.states
    }

    #[must_use]
    pub const fn scales(&self) -> &ColorScaleTable {
        &self.scales
    }

    /// Sorted distinct regions.
    #[must_use]
    pub fn regions(&self) -> Vec<String> {
        county_health_filter::distinct_regions(&self.counties)
    }

    #[must_use]
    pub fn policy_recommendations_for(&self, fips: &str) -> Vec<&PolicyRecommendationRecord> {
        self.policy_recommendations
            .iter()
            .filter(|r| r.fips == fips)
            .collect()
    }

    #[must_use]
    pub fn projection_for(&self, fips: &str) -> Option<&ProjectionRecord> {
        self.projections.iter().find(|p| p.fips == fips)
    }

    #[must_use]
    pub fn insights_for(&self, fips: &str) -> &[PrecomputedInsight] {
        self.insights
            .iter()
            .find(|i| i.fips == fips)
            .map_or(&[], |i| i.insights.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_fips_rows_are_dropped() {
        let mut a = CountyRecord::with_fips("01001");
        a.county = "Autauga County".to_string();
        a.cluster_7 = 2;
        let mut b = CountyRecord::with_fips("01001");
        b.county = "Duplicate".to_string();
        b.cluster_7 = 4;
        let dataset = Dataset::from_counties(vec![a, b, CountyRecord::with_fips("06037")]);

        let fips: Vec<&str> = dataset.counties().iter().map(|c| c.fips.as_str()).collect();
        assert_eq!(fips, vec!["01001", "06037"]);
        assert_eq!(
            dataset.cluster_ids(),
            vec![0, 2],
            "duplicate row does not add a cluster"
        );
        assert_eq!(dataset.county("01001").unwrap().county, "Autauga County");
        assert!(dataset.county("06037").is_some());
        assert!(dataset.county("99999").is_none());
    }

    #[test]
    fn derived_collections_are_populated() {
        let mut a = CountyRecord::with_fips("01001");
        a.cluster_7 = 3;
        let dataset = Dataset::from_counties(vec![a, CountyRecord::with_fips("06037")]);

        assert_eq!(dataset.cluster_ids(), vec![0, 3]);
        assert_eq!(dataset.states().len(), 2);
        assert!(dataset.scales().get("healthcare_access").is_some());
        assert!(dataset.insights_for("01001").is_empty());
        assert!(dataset.projection_for("01001").is_none());
    }
}
