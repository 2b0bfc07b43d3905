//! One-click filter presets.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{FilterDimension, FilterSpec, NumericRange};

/// A preset that clears every filter and then sets a single range.
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
pub enum QuickFilter {
    LowAccess,
    HighAccess,
    Rural,
    Metro,
    HighPoverty,
    HighOpportunity,
}

impl QuickFilter {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::LowAccess,
            Self::HighAccess,
            Self::Rural,
            Self::Metro,
            Self::HighPoverty,
            Self::HighOpportunity,
        ]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowAccess => "Low Access",
            Self::HighAccess => "High Access",
            Self::Rural => "Rural",
            Self::Metro => "Metro",
            Self::HighPoverty => "High Poverty",
            Self::HighOpportunity => "High Opportunity",
        }
    }

    #[must_use]
    pub const fn dimension(self) -> FilterDimension {
        match self {
            Self::LowAccess | Self::HighAccess => FilterDimension::Healthcare,
            Self::Rural | Self::Metro => FilterDimension::Population,
            Self::HighPoverty => FilterDimension::Poverty,
            Self::HighOpportunity => FilterDimension::Opportunity,
        }
    }

    #[must_use]
    pub const fn range(self) -> NumericRange {
        match self {
            Self::LowAccess => NumericRange::new(0.0, 40.0),
            Self::HighAccess => NumericRange::new(75.0, 100.0),
            Self::Rural => NumericRange::new(0.0, 50_000.0),
            Self::Metro => NumericRange::new(1_000_000.0, 10_000_000.0),
            Self::HighPoverty => NumericRange::new(30.0, 100.0),
            Self::HighOpportunity => NumericRange::new(60.0, 100.0),
        }
    }

    /// The complete filter this preset produces.
    #[must_use]
    pub fn spec(self) -> FilterSpec {
        FilterSpec::default().with_range(self.dimension(), self.range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_replaces_existing_filters() {
        let spec = QuickFilter::Metro.spec();
        assert_eq!(spec.active_predicate_count(), 1);
        assert_eq!(
            spec.range(FilterDimension::Population),
            Some(NumericRange::new(1e6, 1e7))
        );
        assert_eq!(spec.region(), None);
        assert!(spec.clusters().is_empty());
    }

    #[test]
    fn every_preset_sets_exactly_one_range() {
        for preset in QuickFilter::all() {
            let spec = preset.spec();
            assert_eq!(
                spec.active_predicate_count(),
                1,
                "{} should set one range",
                preset.label()
            );
            assert_eq!(spec.range(preset.dimension()), Some(preset.range()));
        }
    }
}
