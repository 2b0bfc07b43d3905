#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! County filter engine.
//!
//! A [`FilterSpec`] is a conjunction of independent predicates: an optional
//! region, an optional set of cluster ids, and up to eleven inclusive
//! numeric ranges. A county passes iff every configured predicate holds.
//! Unconfigured predicates never reject anything, so the default spec is
//! the identity filter.

mod dimension;
mod quick;
mod search;

pub use dimension::{FilterDimension, NumericRange, parse_range_arg};
pub use quick::QuickFilter;
pub use search::{SEARCH_LIMIT, distinct_regions, search_counties};

use std::collections::{BTreeMap, BTreeSet};

use county_health_county_models::CountyRecord;
use serde::{Deserialize, Serialize};

/// Region value meaning "no region filter".
pub const ALL_REGIONS: &str = "all";

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid range {input:?}: {reason}")]
    InvalidRange { input: String, reason: String },
}

/// The active set of filter predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    /// Empty means every cluster.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    clusters: BTreeSet<u8>,
    /// A dimension with no entry is unconstrained.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    ranges: BTreeMap<FilterDimension, NumericRange>,
}

impl FilterSpec {
    /// Whether `county` satisfies every configured predicate.
    #[must_use]
    pub fn passes(&self, county: &CountyRecord) -> bool {
        if let Some(region) = self.region()
            && county.region != region
        {
            return false;
        }

        if !self.clusters.is_empty() && !self.clusters.contains(&county.cluster_7) {
            return false;
        }

        self.ranges
            .iter()
            .all(|(dimension, range)| range.contains(dimension.value(county)))
    }

    /// The passing subset of `counties`, in input order.
    #[must_use]
    pub fn apply<'a>(&self, counties: &'a [CountyRecord]) -> Vec<&'a CountyRecord> {
        counties.iter().filter(|c| self.passes(c)).collect()
    }

    /// The region filter, or `None` when every region is shown.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region
            .as_deref()
            .filter(|r| !r.is_empty() && *r != ALL_REGIONS)
    }

    #[must_use]
    pub const fn clusters(&self) -> &BTreeSet<u8> {
        &self.clusters
    }

    #[must_use]
    pub fn range(&self, dimension: FilterDimension) -> Option<NumericRange> {
        self.ranges.get(&dimension).copied()
    }

    pub fn ranges(&self) -> impl Iterator<Item = (FilterDimension, NumericRange)> + '_ {
        self.ranges.iter().map(|(d, r)| (*d, *r))
    }

    /// Sets or clears the region. `"all"` and blank values clear it.
    #[must_use]
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region.filter(|r| !r.trim().is_empty() && r != ALL_REGIONS);
        self
    }

    #[must_use]
    pub fn with_range(mut self, dimension: FilterDimension, range: NumericRange) -> Self {
        self.ranges.insert(dimension, range);
        self
    }

    #[must_use]
    pub fn without_range(mut self, dimension: FilterDimension) -> Self {
        self.ranges.remove(&dimension);
        self
    }

    #[must_use]
    pub fn with_clusters(mut self, clusters: impl IntoIterator<Item = u8>) -> Self {
        self.clusters = clusters.into_iter().collect();
        self
    }

    /// Applies a cluster checkbox change.
    ///
    /// `all_ids` is every cluster present in the dataset. With no explicit
    /// selection (every cluster shown), checking one shows only that one and
    /// unchecking one shows all the others. A selection that ends up
    /// covering every cluster collapses back to the empty "all" set.
    #[must_use]
    pub fn toggle_cluster(mut self, id: u8, checked: bool, all_ids: &[u8]) -> Self {
        let showing_all = self.clusters.is_empty();

        if checked {
            if showing_all {
                self.clusters = std::iter::once(id).collect();
            } else {
                self.clusters.insert(id);
            }
        } else if showing_all {
            self.clusters = all_ids.iter().copied().filter(|c| *c != id).collect();
        } else {
            self.clusters.remove(&id);
        }

        let every: BTreeSet<u8> = all_ids.iter().copied().collect();
        if !every.is_empty() && self.clusters == every {
            self.clusters.clear();
        }
        self
    }

    /// Whether a cluster's checkbox shows as checked.
    #[must_use]
    pub fn cluster_visible(&self, id: u8) -> bool {
        self.clusters.is_empty() || self.clusters.contains(&id)
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.active_predicate_count() == 0
    }

    /// Number of predicates that can reject a county.
    #[must_use]
    pub fn active_predicate_count(&self) -> usize {
        usize::from(self.region().is_some())
            + usize::from(!self.clusters.is_empty())
            + self.ranges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn county(fips: &str, region: &str, population: u64, access: f64, cluster: u8) -> CountyRecord {
        let mut county = CountyRecord::with_fips(fips);
        county.region = region.to_string();
        county.population = population;
        county.healthcare_access = access;
        county.cluster_7 = cluster;
        county
    }

    fn sample() -> Vec<CountyRecord> {
        vec![
            county("06037", "West", 10_039_107, 72.5, 3),
            county("48201", "South", 4_713_325, 68.1, 3),
            county("01001", "South", 58_805, 38.0, 1),
            county("30001", "West", 9_000, 45.0, 5),
            county("17031", "Midwest", 5_150_233, 81.2, 2),
        ]
    }

    fn fips<'a>(counties: &[&'a CountyRecord]) -> Vec<&'a str> {
        counties.iter().map(|c| c.fips.as_str()).collect()
    }

    #[test]
    fn unrestricted_filter_is_identity() {
        let counties = sample();
        let spec = FilterSpec::default();
        assert!(spec.is_unrestricted());
        assert_eq!(
            fips(&spec.apply(&counties)),
            ["06037", "48201", "01001", "30001", "17031"]
        );
    }

    #[test]
    fn region_all_means_no_filter() {
        let counties = sample();
        let spec = FilterSpec::default().with_region(Some("all".to_string()));
        assert_eq!(spec.region(), None);
        assert_eq!(spec.apply(&counties).len(), counties.len());
    }

    #[test]
    fn region_filter() {
        let counties = sample();
        let spec = FilterSpec::default().with_region(Some("South".to_string()));
        assert_eq!(fips(&spec.apply(&counties)), ["48201", "01001"]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let counties = sample();
        let spec = FilterSpec::default()
            .with_range(FilterDimension::Healthcare, NumericRange::new(38.0, 72.5));
        assert_eq!(fips(&spec.apply(&counties)), ["06037", "48201", "01001", "30001"]);
    }

    #[test]
    fn cluster_set_filter() {
        let counties = sample();
        let spec = FilterSpec::default().with_clusters([3, 5]);
        assert_eq!(fips(&spec.apply(&counties)), ["06037", "48201", "30001"]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let counties = sample();
        let spec = FilterSpec::default()
            .with_region(Some("West".to_string()))
            .with_clusters([3, 5])
            .with_range(FilterDimension::Population, NumericRange::new(0.0, 50_000.0));
        assert_eq!(fips(&spec.apply(&counties)), ["30001"]);
        assert_eq!(spec.active_predicate_count(), 3);

        for county in &counties {
            let individually = spec.region().is_none_or(|r| county.region == r)
                && FilterSpec::default()
                    .with_clusters(spec.clusters().iter().copied())
                    .passes(county)
                && spec.ranges().all(|(d, r)| r.contains(d.value(county)));
            assert_eq!(spec.passes(county), individually, "county {}", county.fips);
        }
    }

    #[test]
    fn tightening_never_admits_more() {
        let counties = sample();
        let loose = FilterSpec::default()
            .with_range(FilterDimension::Healthcare, NumericRange::new(0.0, 100.0));
        let mut previous: Vec<&str> = fips(&loose.apply(&counties));

        for upper in (0..=100).rev().step_by(5) {
            let tight = FilterSpec::default().with_range(
                FilterDimension::Healthcare,
                NumericRange::new(0.0, f64::from(upper)),
            );
            let current = fips(&tight.apply(&counties));
            assert!(
                current.iter().all(|f| previous.contains(f)),
                "upper bound {upper} admitted a county the looser bound rejected"
            );
            previous = current;
        }
    }

    #[test]
    fn unconfigured_population_keeps_large_counties() {
        let counties = sample();
        let spec = FilterSpec::default()
            .with_range(FilterDimension::Healthcare, NumericRange::new(0.0, 100.0));
        assert!(spec.apply(&counties).iter().any(|c| c.population > 10_000_000));
    }

    #[test]
    fn checking_from_all_selects_only_that_cluster() {
        let all = [0, 1, 2, 3, 4, 5, 6];
        let spec = FilterSpec::default().toggle_cluster(3, true, &all);
        assert_eq!(spec.clusters().iter().copied().collect::<Vec<_>>(), [3]);
    }

    #[test]
    fn unchecking_from_all_selects_the_rest() {
        let all = [0, 1, 2, 3, 4, 5, 6];
        let spec = FilterSpec::default().toggle_cluster(3, false, &all);
        assert_eq!(
            spec.clusters().iter().copied().collect::<Vec<_>>(),
            [0, 1, 2, 4, 5, 6]
        );
        assert!(!spec.cluster_visible(3));
        assert!(spec.cluster_visible(4));
    }

    #[test]
    fn full_selection_collapses_to_all() {
        let all = [0, 1, 2];
        let spec = FilterSpec::default()
            .toggle_cluster(0, true, &all)
            .toggle_cluster(1, true, &all)
            .toggle_cluster(2, true, &all);
        assert!(spec.clusters().is_empty());
        assert!(spec.is_unrestricted());
    }

    #[test]
    fn without_range_clears_dimension() {
        let spec = FilterSpec::default()
            .with_range(FilterDimension::Income, NumericRange::new(0.0, 50_000.0))
            .without_range(FilterDimension::Income);
        assert!(spec.is_unrestricted());
    }

    #[test]
    fn serde_round_trip_uses_dimension_names() {
        let spec = FilterSpec::default()
            .with_region(Some("West".to_string()))
            .with_range(FilterDimension::Healthcare, NumericRange::new(0.0, 40.0));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["ranges"]["healthcare"], serde_json::json!([0.0, 40.0]));

        let back: FilterSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }
}
