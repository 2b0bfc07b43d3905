#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Healthcare access what-if scoring.
//!
//! The score is a fixed linear combination of four policy levers plus a
//! constant baseline term standing in for every factor the levers don't
//! cover:
//!
//! ```text
//! score = insurance * 0.25
//!       + (100 - poverty) * 0.15
//!       + education * 0.15
//!       + (income / 150000 * 100) * 0.15
//!       + 80 * 0.30
//! ```
//!
//! The income term is not capped, so incomes above $150,000 can push the
//! total past 100. [`policy_score`] keeps that behavior; the single-lever
//! projections in [`simulation`] clamp their result to `[0, 100]`.

pub mod simulation;

pub use simulation::{Lever, LeverProjection, PolicyInputs, PolicySimulation, project_lever_change};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub const INSURANCE_WEIGHT: f64 = 0.25;
pub const POVERTY_WEIGHT: f64 = 0.15;
pub const EDUCATION_WEIGHT: f64 = 0.15;
pub const INCOME_WEIGHT: f64 = 0.15;
pub const BASELINE_WEIGHT: f64 = 0.30;

/// Constant stand-in for the factors outside the four levers.
pub const BASELINE_FACTOR: f64 = 80.0;

/// Baseline factor used when projecting a county's real rates forward.
pub const PROJECTION_BASELINE_FACTOR: f64 = 75.0;

/// Median income that maps to a full 100 on the income sub-scale.
pub const INCOME_REFERENCE: f64 = 150_000.0;

/// Each weighted term of the policy score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub insurance: f64,
    pub poverty: f64,
    pub education: f64,
    pub income: f64,
    pub baseline: f64,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn new(insurance: f64, poverty: f64, education: f64, income: f64) -> Self {
        Self {
            insurance: insurance * INSURANCE_WEIGHT,
            poverty: (100.0 - poverty) * POVERTY_WEIGHT,
            education: education * EDUCATION_WEIGHT,
            income: (income / INCOME_REFERENCE * 100.0) * INCOME_WEIGHT,
            baseline: BASELINE_FACTOR * BASELINE_WEIGHT,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.insurance + self.poverty + self.education + self.income + self.baseline
    }
}

/// Healthcare access score for the given policy inputs.
///
/// Never fails. Not clamped.
#[must_use]
pub fn policy_score(insurance: f64, poverty: f64, education: f64, income: f64) -> f64 {
    ScoreBreakdown::new(insurance, poverty, education, income).total()
}

/// Qualitative band for a 0-100 score.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreRating {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

/// Qualitative band for a 0-100 percentile.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PercentileBand {
    BelowAverage,
    Average,
    AboveAverage,
    TopTwentyPercent,
}

impl PercentileBand {
    #[must_use]
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile >= 80.0 {
            Self::TopTwentyPercent
        } else if percentile >= 60.0 {
            Self::AboveAverage
        } else if percentile >= 40.0 {
            Self::Average
        } else {
            Self::BelowAverage
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowAverage => "Below Average",
            Self::Average => "Average",
            Self::AboveAverage => "Above Average",
            Self::TopTwentyPercent => "Top 20%",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn reference_inputs() {
        let score = policy_score(70.0, 15.0, 35.0, 65_000.0);
        assert!((score - 66.0).abs() < EPSILON, "got {score}");
    }

    #[test]
    fn breakdown_sums_to_score() {
        let breakdown = ScoreBreakdown::new(70.0, 15.0, 35.0, 65_000.0);
        assert!((breakdown.insurance - 17.5).abs() < EPSILON);
        assert!((breakdown.poverty - 12.75).abs() < EPSILON);
        assert!((breakdown.education - 5.25).abs() < EPSILON);
        assert!((breakdown.income - 6.5).abs() < EPSILON);
        assert!((breakdown.baseline - 24.0).abs() < EPSILON);
        assert!((breakdown.total() - policy_score(70.0, 15.0, 35.0, 65_000.0)).abs() < EPSILON);
    }

    #[test]
    fn strictly_increasing_in_insurance() {
        let mut previous = policy_score(0.0, 15.0, 35.0, 65_000.0);
        for insurance in 1..=100 {
            let score = policy_score(f64::from(insurance), 15.0, 35.0, 65_000.0);
            assert!(score > previous, "not increasing at insurance={insurance}");
            previous = score;
        }
    }

    #[test]
    fn strictly_decreasing_in_poverty() {
        let mut previous = policy_score(70.0, 0.0, 35.0, 65_000.0);
        for poverty in 1..=50 {
            let score = policy_score(70.0, f64::from(poverty), 35.0, 65_000.0);
            assert!(score < previous, "not decreasing at poverty={poverty}");
            previous = score;
        }
    }

    #[test]
    fn income_term_is_not_clamped() {
        assert!(policy_score(100.0, 0.0, 100.0, 600_000.0) > 100.0);
    }

    #[test]
    fn rating_thresholds() {
        assert_eq!(ScoreRating::from_score(80.0), ScoreRating::Excellent);
        assert_eq!(ScoreRating::from_score(79.9), ScoreRating::Good);
        assert_eq!(ScoreRating::from_score(60.0), ScoreRating::Good);
        assert_eq!(ScoreRating::from_score(40.0), ScoreRating::Fair);
        assert_eq!(ScoreRating::from_score(39.9), ScoreRating::Poor);
    }

    #[test]
    fn percentile_bands() {
        assert_eq!(PercentileBand::from_percentile(95.0).label(), "Top 20%");
        assert_eq!(PercentileBand::from_percentile(60.0).label(), "Above Average");
        assert_eq!(PercentileBand::from_percentile(45.0).label(), "Average");
        assert_eq!(PercentileBand::from_percentile(10.0).label(), "Below Average");
    }
}
