#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! County record, cluster, and state summary types.
//!
//! [`CountyRecord`] is the fully populated form of one row of the county
//! dataset. Rows deserialize through [`RawCountyRecord`], which applies
//! every default exactly once at load time; filters, scales, and the radius
//! ladder only ever see concrete values.

pub mod fips;
mod raw;

pub use raw::RawCountyRecord;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Latitude used when a row carries no coordinates (geographic center of
/// the contiguous US).
pub const DEFAULT_LATITUDE: f64 = 39.0;

/// Longitude used when a row carries no coordinates.
pub const DEFAULT_LONGITUDE: f64 = -98.0;

/// Population used when a row has no usable population.
pub const DEFAULT_POPULATION: u64 = 50_000;

/// Value used for any absent 0-100 composite score.
pub const DEFAULT_SCORE: f64 = 50.0;

/// Cluster id used when a row has no `Cluster_7`.
pub const DEFAULT_CLUSTER: u8 = 0;

/// Number of clusters produced by the upstream k-means pass.
pub const CLUSTER_COUNT: u8 = 7;

/// One US county with every metric resolved.
///
/// Serializes with the dataset's own field names, so a normalized record
/// written back out can be read again by any consumer of the raw files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCountyRecord")]
pub struct CountyRecord {
    #[serde(rename = "FIPS")]
    pub fips: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Region")]
    pub region: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "Population")]
    pub population: u64,
    #[serde(rename = "Healthcare_Access")]
    pub healthcare_access: f64,
    #[serde(rename = "Opportunity_Score")]
    pub opportunity_score: f64,
    #[serde(rename = "Vulnerability_Index")]
    pub vulnerability_index: f64,
    #[serde(rename = "Resilience_Score")]
    pub resilience_score: f64,
    #[serde(
        rename = "Healthcare_Access_Percentile",
        skip_serializing_if = "Option::is_none"
    )]
    pub healthcare_access_percentile: Option<f64>,
    #[serde(
        rename = "Insurance_Rate_Percentile",
        skip_serializing_if = "Option::is_none"
    )]
    pub insurance_rate_percentile: Option<f64>,
    #[serde(
        rename = "Education_Rate_Percentile",
        skip_serializing_if = "Option::is_none"
    )]
    pub education_rate_percentile: Option<f64>,
    #[serde(rename = "Insurance_Rate")]
    pub insurance_rate: f64,
    #[serde(rename = "Poverty_Rate")]
    pub poverty_rate: f64,
    #[serde(rename = "Education_Rate")]
    pub education_rate: f64,
    #[serde(rename = "Disability_Rate")]
    pub disability_rate: f64,
    #[serde(rename = "No_Vehicle_Rate")]
    pub no_vehicle_rate: f64,
    #[serde(rename = "LEP_Rate")]
    pub lep_rate: f64,
    #[serde(rename = "Median_Income")]
    pub median_income: f64,
    /// Count-like, not a percentage: values reach the millions.
    #[serde(rename = "Broadband_Rate")]
    pub broadband_rate: f64,
    #[serde(rename = "Cluster_7")]
    pub cluster_7: u8,
    #[serde(
        rename = "Cluster_Name_Detailed",
        skip_serializing_if = "Option::is_none"
    )]
    pub cluster_name_detailed: Option<String>,
    #[serde(rename = "Cluster_Description", skip_serializing_if = "Option::is_none")]
    pub cluster_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_in_cluster: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_in_cluster: Option<u32>,
    /// Signed difference from the cluster average; the only field allowed
    /// to go negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_vs_cluster: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_avg_score: Option<f64>,
}

impl CountyRecord {
    /// Builds a record with every field defaulted, as if loaded from a row
    /// containing only `FIPS`.
    #[must_use]
    pub fn with_fips(fips: impl Into<String>) -> Self {
        RawCountyRecord {
            fips: Some(fips.into()),
            ..RawCountyRecord::default()
        }
        .into()
    }

    /// `"County, State"` as shown in headers and search results.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.county, self.state)
    }

    /// Population as a float for arithmetic against the other metrics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn population_f64(&self) -> f64 {
        self.population as f64
    }
}

/// What the map colors and sizes counties by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VisualMode {
    #[default]
    HealthcareAccess,
    Opportunity,
    Vulnerability,
    Population,
    Cluster,
}

impl VisualMode {
    /// Every mode in menu order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::HealthcareAccess,
            Self::Opportunity,
            Self::Vulnerability,
            Self::Population,
            Self::Cluster,
        ]
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HealthcareAccess => "Healthcare Access",
            Self::Opportunity => "Opportunity Score",
            Self::Vulnerability => "Vulnerability Index",
            Self::Population => "Population Size",
            Self::Cluster => "County Clusters",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::HealthcareAccess => "Composite score of insurance, providers, and facilities",
            Self::Opportunity => "Economic and educational opportunity",
            Self::Vulnerability => "Social vulnerability to health shocks",
            Self::Population => "Total county population",
            Self::Cluster => "Counties grouped by similar characteristics",
        }
    }

    /// Key into the color scale table, or `None` for modes colored by a
    /// categorical palette.
    #[must_use]
    pub const fn color_scale_key(self) -> Option<&'static str> {
        match self {
            Self::HealthcareAccess => Some("healthcare_access"),
            Self::Opportunity => Some("opportunity"),
            Self::Vulnerability => Some("vulnerability"),
            Self::Population => Some("population"),
            Self::Cluster => None,
        }
    }

    /// The metric this mode visualizes for `county`.
    #[must_use]
    pub fn metric(self, county: &CountyRecord) -> f64 {
        match self {
            Self::HealthcareAccess => county.healthcare_access,
            Self::Opportunity => county.opportunity_score,
            Self::Vulnerability => county.vulnerability_index,
            Self::Population => county.population_f64(),
            Self::Cluster => f64::from(county.cluster_7),
        }
    }
}

/// Urgency attached to insights and recommendations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Priority {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

/// A cluster id with its display metadata.
///
/// Derived from the loaded county records; never stored per county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDefinition {
    pub id: u8,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub county_count: usize,
}

impl ClusterDefinition {
    /// Name used when no county in the cluster carries one.
    #[must_use]
    pub fn default_name(id: u8) -> String {
        format!("Cluster {id}")
    }
}

/// Aggregate metrics for one state.
///
/// Every metric is optional because the precomputed state file only
/// carries a subset for some states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(
        rename = "Healthcare_Access_mean",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub healthcare_access_mean: Option<f64>,
    #[serde(
        rename = "Population_sum",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub population_sum: Option<f64>,
    #[serde(
        rename = "Opportunity_Score_mean",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub opportunity_score_mean: Option<f64>,
    #[serde(
        rename = "Vulnerability_Index_mean",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vulnerability_index_mean: Option<f64>,
    #[serde(
        rename = "Healthcare_Rank",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub healthcare_rank: Option<f64>,
    #[serde(
        rename = "Inequality_Score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub inequality_score: Option<f64>,
    #[serde(
        rename = "County_Count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub county_count: Option<u32>,
}

/// Column a state ranking table can be sorted by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StateSortKey {
    #[default]
    HealthcareAccessMean,
    PopulationSum,
    OpportunityScoreMean,
    VulnerabilityIndexMean,
    HealthcareRank,
    InequalityScore,
}

impl StateSortKey {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::HealthcareAccessMean,
            Self::PopulationSum,
            Self::OpportunityScoreMean,
            Self::VulnerabilityIndexMean,
            Self::HealthcareRank,
            Self::InequalityScore,
        ]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HealthcareAccessMean => "Healthcare Access",
            Self::PopulationSum => "Population",
            Self::OpportunityScoreMean => "Opportunity",
            Self::VulnerabilityIndexMean => "Vulnerability",
            Self::HealthcareRank => "Healthcare Rank",
            Self::InequalityScore => "Inequality",
        }
    }

    /// Sort value for `summary`; a missing metric sorts as `0`.
    #[must_use]
    pub fn value(self, summary: &StateSummary) -> f64 {
        match self {
            Self::HealthcareAccessMean => summary.healthcare_access_mean,
            Self::PopulationSum => summary.population_sum,
            Self::OpportunityScoreMean => summary.opportunity_score_mean,
            Self::VulnerabilityIndexMean => summary.vulnerability_index_mean,
            Self::HealthcareRank => summary.healthcare_rank,
            Self::InequalityScore => summary.inequality_score,
        }
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_row_gets_every_default() {
        let record: CountyRecord = serde_json::from_str(r#"{"FIPS": "06037"}"#).unwrap();

        assert_eq!(record.fips, "06037");
        assert!((record.lat - DEFAULT_LATITUDE).abs() < f64::EPSILON);
        assert!((record.lng - DEFAULT_LONGITUDE).abs() < f64::EPSILON);
        assert_eq!(record.population, DEFAULT_POPULATION);
        assert!((record.healthcare_access - DEFAULT_SCORE).abs() < f64::EPSILON);
        assert!((record.opportunity_score - DEFAULT_SCORE).abs() < f64::EPSILON);
        assert!((record.vulnerability_index - DEFAULT_SCORE).abs() < f64::EPSILON);
        assert!((record.resilience_score - DEFAULT_SCORE).abs() < f64::EPSILON);
        assert_eq!(record.cluster_7, DEFAULT_CLUSTER);
        assert!(record.median_income.abs() < f64::EPSILON);
        assert_eq!(record.healthcare_access_percentile, None);
        assert_eq!(record.state, "California", "state derived from FIPS prefix");
    }

    #[test]
    fn non_numeric_cells_fall_back_to_defaults() {
        let record: CountyRecord = serde_json::from_str(
            r#"{"FIPS": "01001", "Median_Income": "N/A", "Healthcare_Access": null,
                "Poverty_Rate": " 18.5 ", "Population": true, "Cluster_7": [3]}"#,
        )
        .unwrap();

        assert!(record.median_income.abs() < f64::EPSILON);
        assert!((record.healthcare_access - DEFAULT_SCORE).abs() < f64::EPSILON);
        assert!((record.poverty_rate - 18.5).abs() < f64::EPSILON);
        assert_eq!(record.population, DEFAULT_POPULATION);
        assert_eq!(record.cluster_7, DEFAULT_CLUSTER);
    }

    #[test]
    fn both_coordinate_spellings_are_accepted() {
        let record: CountyRecord = serde_json::from_str(
            r#"{"FIPS": "06037", "lat": 34.3, "latitude": 99.0, "lng": -118.2, "longitude": 0.0}"#,
        )
        .unwrap();
        assert!((record.lat - 34.3).abs() < f64::EPSILON);
        assert!((record.lng + 118.2).abs() < f64::EPSILON);

        let record: CountyRecord =
            serde_json::from_str(r#"{"FIPS": "06037", "latitude": 34.3, "longitude": -118.2}"#)
                .unwrap();
        assert!((record.lat - 34.3).abs() < f64::EPSILON);
        assert!((record.lng + 118.2).abs() < f64::EPSILON);
    }

    #[test]
    fn explicit_zero_is_kept() {
        let record: CountyRecord =
            serde_json::from_str(r#"{"FIPS": "01001", "Healthcare_Access": 0, "Poverty_Rate": 0.0}"#)
                .unwrap();

        assert!(record.healthcare_access.abs() < f64::EPSILON);
        assert!(record.poverty_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn null_is_treated_as_absent() {
        let record: CountyRecord =
            serde_json::from_str(r#"{"FIPS": "01001", "Opportunity_Score": null, "lat": null}"#)
                .unwrap();

        assert!((record.opportunity_score - DEFAULT_SCORE).abs() < f64::EPSILON);
        assert!((record.lat - DEFAULT_LATITUDE).abs() < f64::EPSILON);
    }

    #[test]
    fn numeric_fips_is_zero_padded() {
        let record: CountyRecord = serde_json::from_str(r#"{"FIPS": 1001}"#).unwrap();
        assert_eq!(record.fips, "01001");
        assert_eq!(record.state, "Alabama");
    }

    #[test]
    fn coordinate_aliases() {
        let record: CountyRecord =
            serde_json::from_str(r#"{"FIPS": "36061", "latitude": 40.78, "longitude": -73.97}"#)
                .unwrap();

        assert!((record.lat - 40.78).abs() < 1e-9);
        assert!((record.lng + 73.97).abs() < 1e-9);
    }

    #[test]
    fn negatives_clamped_except_performance() {
        let record: CountyRecord = serde_json::from_str(
            r#"{"FIPS": "01001", "Poverty_Rate": -3, "performance_vs_cluster": -12.5}"#,
        )
        .unwrap();

        assert!(record.poverty_rate.abs() < f64::EPSILON);
        assert_eq!(record.performance_vs_cluster, Some(-12.5));
    }

    #[test]
    fn float_population_and_cluster_are_rounded() {
        let record: CountyRecord =
            serde_json::from_str(r#"{"FIPS": "01001", "Population": 58805.0, "Cluster_7": 3.0}"#)
                .unwrap();

        assert_eq!(record.population, 58_805);
        assert_eq!(record.cluster_7, 3);
    }

    #[test]
    fn serializes_with_dataset_field_names() {
        let record = CountyRecord::with_fips("06037");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["FIPS"], "06037");
        assert_eq!(value["Population"], 50_000);
        assert!(value.get("Healthcare_Access_Percentile").is_none());

        let back: CountyRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn visual_mode_round_trips_through_strum() {
        for mode in VisualMode::all() {
            let parsed: VisualMode = mode.as_ref().parse().unwrap();
            assert_eq!(parsed, *mode);
        }
        assert_eq!(VisualMode::default(), VisualMode::HealthcareAccess);
        assert_eq!(VisualMode::Cluster.color_scale_key(), None);
    }

    #[test]
    fn state_sort_key_missing_is_zero() {
        let summary: StateSummary =
            serde_json::from_str(r#"{"State": "Texas", "Population_sum": 29000000}"#).unwrap();

        assert!(StateSortKey::HealthcareAccessMean.value(&summary).abs() < f64::EPSILON);
        assert!((StateSortKey::PopulationSum.value(&summary) - 29_000_000.0).abs() < f64::EPSILON);
    }
}
