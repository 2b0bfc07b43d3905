#![allow(clippy::module_name_repetitions)]
//! Canonical file names inside a dashboard data directory.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "COUNTY_HEALTH_DATA_DIR";

pub const COUNTY_DATA_FILE: &str = "comprehensive_county_data.json";
/// Minimal county file tried when the comprehensive one is unusable.
pub const FALLBACK_COUNTY_DATA_FILE: &str = "county_data.json";
pub const STATE_ANALYSIS_FILE: &str = "detailed_state_analysis.json";
pub const COLOR_SCALES_FILE: &str = "color_scales.json";
pub const POLICY_RECOMMENDATIONS_FILE: &str = "policy_recommendations.json";
pub const PROJECTION_SCENARIOS_FILE: &str = "projection_scenarios.json";
pub const COUNTY_INSIGHTS_FILE: &str = "county_insights.json";
pub const CLUSTER_DEFINITIONS_FILE: &str = "cluster_definitions.json";

/// Returns the data directory: `$COUNTY_HEALTH_DATA_DIR` if set, otherwise
/// `data/` under the working directory.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from("data"), PathBuf::from)
}

#[must_use]
pub fn county_data_path(data_dir: &Path) -> PathBuf {
    data_dir.join(COUNTY_DATA_FILE)
}

#[must_use]
pub fn fallback_county_data_path(data_dir: &Path) -> PathBuf {
    data_dir.join(FALLBACK_COUNTY_DATA_FILE)
}

#[must_use]
pub fn state_analysis_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATE_ANALYSIS_FILE)
}

#[must_use]
pub fn color_scales_path(data_dir: &Path) -> PathBuf {
    data_dir.join(COLOR_SCALES_FILE)
}

#[must_use]
pub fn policy_recommendations_path(data_dir: &Path) -> PathBuf {
    data_dir.join(POLICY_RECOMMENDATIONS_FILE)
}

#[must_use]
pub fn projection_scenarios_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PROJECTION_SCENARIOS_FILE)
}

#[must_use]
pub fn county_insights_path(data_dir: &Path) -> PathBuf {
    data_dir.join(COUNTY_INSIGHTS_FILE)
}

#[must_use]
pub fn cluster_definitions_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CLUSTER_DEFINITIONS_FILE)
}
