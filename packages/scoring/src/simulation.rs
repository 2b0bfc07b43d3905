//! Policy lever state and single-lever projections.

use county_health_county_models::CountyRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{BASELINE_WEIGHT, PROJECTION_BASELINE_FACTOR, ScoreBreakdown, policy_score};

/// One of the four adjustable policy inputs.
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
pub enum Lever {
    Insurance,
    Poverty,
    Education,
    Income,
}

impl Lever {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Insurance, Self::Poverty, Self::Education, Self::Income]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Insurance => "Insurance Coverage (%)",
            Self::Poverty => "Poverty Rate (%)",
            Self::Education => "College Education (%)",
            Self::Income => "Median Income ($)",
        }
    }

    /// Inclusive slider range.
    #[must_use]
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::Insurance => (0.0, 100.0),
            Self::Poverty => (0.0, 50.0),
            Self::Education => (0.0, 80.0),
            Self::Income => (30_000.0, 150_000.0),
        }
    }

    /// Bounds applied when projecting a percentage change of a county's real
    /// value. Income has a floor but no ceiling.
    #[must_use]
    pub const fn projection_bounds(self) -> (f64, Option<f64>) {
        match self {
            Self::Insurance => (0.0, Some(100.0)),
            Self::Poverty => (0.0, Some(50.0)),
            Self::Education => (0.0, Some(80.0)),
            Self::Income => (20_000.0, None),
        }
    }

    /// Clamps `value` to [`Self::range`]. `NaN` becomes the lower bound.
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        let (lo, hi) = self.range();
        if value.is_nan() {
            lo
        } else {
            value.clamp(lo, hi)
        }
    }

    /// The county's real value for this lever.
    #[must_use]
    pub const fn county_value(self, county: &CountyRecord) -> f64 {
        match self {
            Self::Insurance => county.insurance_rate,
            Self::Poverty => county.poverty_rate,
            Self::Education => county.education_rate,
            Self::Income => county.median_income,
        }
    }
}

/// Values for all four levers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyInputs {
    pub insurance: f64,
    pub poverty: f64,
    pub education: f64,
    pub income: f64,
}

impl Default for PolicyInputs {
    fn default() -> Self {
        Self {
            insurance: 70.0,
            poverty: 15.0,
            education: 35.0,
            income: 65_000.0,
        }
    }
}

impl PolicyInputs {
    /// The county's real rates, rounded to integers and clamped to each
    /// lever's slider range.
    #[must_use]
    pub fn from_county(county: &CountyRecord) -> Self {
        let mut inputs = Self::default();
        for &lever in Lever::all() {
            inputs.set(lever, lever.county_value(county).round());
        }
        inputs
    }

    #[must_use]
    pub const fn get(&self, lever: Lever) -> f64 {
        match lever {
            Lever::Insurance => self.insurance,
            Lever::Poverty => self.poverty,
            Lever::Education => self.education,
            Lever::Income => self.income,
        }
    }

    /// Sets `lever`, clamped to its range.
    pub fn set(&mut self, lever: Lever, value: f64) {
        let value = lever.clamp(value);
        match lever {
            Lever::Insurance => self.insurance = value,
            Lever::Poverty => self.poverty = value,
            Lever::Education => self.education = value,
            Lever::Income => self.income = value,
        }
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        policy_score(self.insurance, self.poverty, self.education, self.income)
    }

    #[must_use]
    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown::new(self.insurance, self.poverty, self.education, self.income)
    }
}

/// Lever positions plus the snapshot they reset to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicySimulation {
    current: PolicyInputs,
    baseline: PolicyInputs,
}

impl Default for PolicySimulation {
    fn default() -> Self {
        Self::new(PolicyInputs::default())
    }
}

impl PolicySimulation {
    #[must_use]
    pub const fn new(baseline: PolicyInputs) -> Self {
        Self {
            current: baseline,
            baseline,
        }
    }

    /// A simulation whose baseline is the county's real rates.
    #[must_use]
    pub fn from_county(county: &CountyRecord) -> Self {
        Self::new(PolicyInputs::from_county(county))
    }

    /// Returns a copy with one lever moved (clamped to its range).
    #[must_use]
    pub fn with_lever(mut self, lever: Lever, value: f64) -> Self {
        self.current.set(lever, value);
        self
    }

    /// Returns a copy with every lever back at the baseline.
    #[must_use]
    pub const fn reset(self) -> Self {
        Self::new(self.baseline)
    }

    #[must_use]
    pub const fn inputs(&self) -> &PolicyInputs {
        &self.current
    }

    #[must_use]
    pub const fn baseline(&self) -> &PolicyInputs {
        &self.baseline
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.current.score()
    }

    #[must_use]
    pub fn baseline_score(&self) -> f64 {
        self.baseline.score()
    }

    /// Change in score relative to the baseline.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.score() - self.baseline_score()
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.current != self.baseline
    }
}

/// Outcome of scaling one of a county's real rates by a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeverProjection {
    pub lever: Lever,
    pub percent_change: f64,
    pub current_value: f64,
    pub projected_value: f64,
    pub current_score: f64,
    pub projected_score: f64,
}

impl LeverProjection {
    #[must_use]
    pub fn score_change(&self) -> f64 {
        self.projected_score - self.current_score
    }
}

/// Projects the score after changing one of `county`'s real rates by
/// `percent_change` percent.
///
/// The new rate is clamped to [`Lever::projection_bounds`]; both scores use
/// [`PROJECTION_BASELINE_FACTOR`] and are clamped to `[0, 100]`.
#[must_use]
pub fn project_lever_change(
    county: &CountyRecord,
    lever: Lever,
    percent_change: f64,
) -> LeverProjection {
    let actual = PolicyInputs {
        insurance: county.insurance_rate,
        poverty: county.poverty_rate,
        education: county.education_rate,
        income: county.median_income,
    };
    let current_value = actual.get(lever);

    let (floor, ceiling) = lever.projection_bounds();
    let scaled = current_value * (1.0 + percent_change / 100.0);
    let mut projected_value = scaled.max(floor);
    if let Some(ceiling) = ceiling {
        projected_value = projected_value.min(ceiling);
    }

    let mut projected = actual;
    match lever {
        Lever::Insurance => projected.insurance = projected_value,
        Lever::Poverty => projected.poverty = projected_value,
        Lever::Education => projected.education = projected_value,
        Lever::Income => projected.income = projected_value,
    }

    LeverProjection {
        lever,
        percent_change,
        current_value,
        projected_value,
        current_score: projection_score(&actual),
        projected_score: projection_score(&projected),
    }
}

fn projection_score(inputs: &PolicyInputs) -> f64 {
    let mut breakdown = inputs.breakdown();
    breakdown.baseline = PROJECTION_BASELINE_FACTOR * BASELINE_WEIGHT;
    breakdown.total().clamp(0.0, 100.0)
}
