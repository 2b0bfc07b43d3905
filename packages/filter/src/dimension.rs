//! Numeric filter dimensions and inclusive ranges.

use std::str::FromStr;

use county_health_county_models::CountyRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::FilterError;

/// An inclusive `[min, max]` range. Serializes as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    /// Builds a range, swapping the bounds if they arrive reversed.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether every value in `other` is also in `self`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.min <= other.min && self.max >= other.max
    }
}

impl From<[f64; 2]> for NumericRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self::new(min, max)
    }
}

impl From<NumericRange> for [f64; 2] {
    fn from(range: NumericRange) -> Self {
        [range.min, range.max]
    }
}

/// One of the eleven numeric county fields that can be range-filtered.
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
pub enum FilterDimension {
    Population,
    Healthcare,
    Income,
    Poverty,
    Disability,
    Education,
    Insurance,
    Vulnerability,
    Opportunity,
    Resilience,
    Broadband,
}

impl FilterDimension {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Population,
            Self::Healthcare,
            Self::Income,
            Self::Poverty,
            Self::Disability,
            Self::Education,
            Self::Insurance,
            Self::Vulnerability,
            Self::Opportunity,
            Self::Resilience,
            Self::Broadband,
        ]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Population => "Population",
            Self::Healthcare => "Healthcare Access",
            Self::Income => "Median Income",
            Self::Poverty => "Poverty Rate",
            Self::Disability => "Disability Rate",
            Self::Education => "Education Rate",
            Self::Insurance => "Insurance Rate",
            Self::Vulnerability => "Vulnerability Index",
            Self::Opportunity => "Opportunity Score",
            Self::Resilience => "Resilience Score",
            Self::Broadband => "Broadband Access",
        }
    }

    /// The county field this dimension constrains.
    #[must_use]
    pub fn value(self, county: &CountyRecord) -> f64 {
        match self {
            Self::Population => county.population_f64(),
            Self::Healthcare => county.healthcare_access,
            Self::Income => county.median_income,
            Self::Poverty => county.poverty_rate,
            Self::Disability => county.disability_rate,
            Self::Education => county.education_rate,
            Self::Insurance => county.insurance_rate,
            Self::Vulnerability => county.vulnerability_index,
            Self::Opportunity => county.opportunity_score,
            Self::Resilience => county.resilience_score,
            Self::Broadband => county.broadband_rate,
        }
    }

    /// Full extent of the slider for this dimension.
    ///
    /// These are UI bounds only. An unconfigured dimension does not filter
    /// at all, so counties beyond the slider extent (e.g. population above
    /// ten million) stay visible until a range is set explicitly.
    #[must_use]
    pub const fn slider_bounds(self) -> NumericRange {
        match self {
            Self::Population => NumericRange::new(0.0, 10_000_000.0),
            Self::Income => NumericRange::new(0.0, 200_000.0),
            Self::Broadband => NumericRange::new(0.0, 3_500_000.0),
            _ => NumericRange::new(0.0, 100.0),
        }
    }
}

/// Parses `dimension=min:max`, e.g. `healthcare=0:40`.
///
/// # Errors
///
/// Returns [`FilterError::InvalidRange`] if the text is not in that shape,
/// the dimension is unknown, or either bound is not a finite number.
pub fn parse_range_arg(text: &str) -> Result<(FilterDimension, NumericRange), FilterError> {
    let invalid = |reason: &str| FilterError::InvalidRange {
        input: text.to_string(),
        reason: reason.to_string(),
    };

    let (name, bounds) = text
        .split_once('=')
        .ok_or_else(|| invalid("expected <dimension>=<min>:<max>"))?;
    let dimension =
        FilterDimension::from_str(name.trim()).map_err(|_| invalid("unknown dimension"))?;
    let (min, max) = bounds
        .split_once(':')
        .ok_or_else(|| invalid("expected <min>:<max>"))?;

    let parse_bound = |s: &str| -> Result<f64, FilterError> {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid("bounds must be finite numbers"))
    };

    Ok((dimension, NumericRange::new(parse_bound(min)?, parse_bound(max)?)))
}
