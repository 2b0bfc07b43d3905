//! Precomputed per-county records shipped alongside the county dataset.

use county_health_county_models::Priority;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One precomputed policy recommendation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecommendationRecord {
    #[serde(rename = "FIPS")]
    pub fips: String,
    pub policy: String,
    pub priority: Priority,
    #[serde(default)]
    pub rationale: String,
    /// Expected healthcare access gain in score points.
    #[serde(default)]
    pub impact_score: f64,
    /// Estimated annual cost in dollars.
    #[serde(default)]
    pub annual_cost: f64,
}

/// Named projection series in `projection_scenarios.json`.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum ProjectionScenario {
    StatusQuo,
    ModerateInvestment,
    AggressiveInvestment,
}

impl ProjectionScenario {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::StatusQuo,
            Self::ModerateInvestment,
            Self::AggressiveInvestment,
        ]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StatusQuo => "Status Quo",
            Self::ModerateInvestment => "Moderate Investment",
            Self::AggressiveInvestment => "Aggressive Investment",
        }
    }
}

/// Projected healthcare access over time under each scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    #[serde(rename = "FIPS")]
    pub fips: String,
    #[serde(default)]
    pub status_quo_projection: Vec<f64>,
    #[serde(default)]
    pub moderate_investment_projection: Vec<f64>,
    #[serde(default)]
    pub aggressive_investment_projection: Vec<f64>,
}

/// End state of one projection series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub scenario: ProjectionScenario,
    pub final_score: f64,
    /// Final value minus the first value.
    pub change: f64,
}

impl ProjectionRecord {
    #[must_use]
    pub fn series(&self, scenario: ProjectionScenario) -> &[f64] {
        match scenario {
            ProjectionScenario::StatusQuo => &self.status_quo_projection,
            ProjectionScenario::ModerateInvestment => &self.moderate_investment_projection,
            ProjectionScenario::AggressiveInvestment => &self.aggressive_investment_projection,
        }
    }

    /// Summary for `scenario`, or `None` if its series is empty.
    #[must_use]
    pub fn summary(&self, scenario: ProjectionScenario) -> Option<ProjectionSummary> {
        let series = self.series(scenario);
        let (first, last) = (series.first()?, series.last()?);
        Some(ProjectionSummary {
            scenario,
            final_score: *last,
            change: last - first,
        })
    }

    /// Summaries for every scenario that has data.
    #[must_use]
    pub fn summaries(&self) -> Vec<ProjectionSummary> {
        ProjectionScenario::all()
            .iter()
            .filter_map(|&s| self.summary(s))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecomputedInsight {
    pub text: String,
    #[serde(default)]
    pub importance: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyInsightsRecord {
    #[serde(rename = "FIPS")]
    pub fips: String,
    #[serde(default)]
    pub insights: Vec<PrecomputedInsight>,
}
