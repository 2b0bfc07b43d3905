//! Marker radius from population and visualization mode.
//!
//! The base radius comes from a population ladder. Each mode then scales it
//! by the first matching rule in its table, the selected county gets a
//! fixed bonus, and the result is clamped to [`MIN_RADIUS`, `MAX_RADIUS`].

use county_health_county_models::{CountyRecord, VisualMode};

pub const MIN_RADIUS: f64 = 2.0;
pub const MAX_RADIUS: f64 = 20.0;
pub const SELECTED_RADIUS_BONUS: f64 = 4.0;

/// Radius for populations at or below the last ladder step.
pub const SMALLEST_RADIUS: f64 = 3.0;

/// `(population threshold, radius)`, largest first. A county gets the
/// radius of the first threshold its population strictly exceeds.
pub const POPULATION_LADDER: &[(u64, f64)] = &[
    (10_000_000, 16.0),
    (5_000_000, 14.0),
    (2_000_000, 12.0),
    (1_000_000, 10.0),
    (500_000, 8.0),
    (200_000, 7.0),
    (100_000, 6.0),
    (50_000, 5.0),
    (20_000, 4.0),
];

/// When a radius rule applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusCondition {
    Always,
    /// The mode's metric is strictly greater than the threshold.
    MetricAbove(f64),
    /// The mode's metric is strictly less than the threshold.
    MetricBelow(f64),
    ClusterIs(u8),
}

impl RadiusCondition {
    #[must_use]
    pub fn matches(self, county: &CountyRecord, metric: f64) -> bool {
        match self {
            Self::Always => true,
            Self::MetricAbove(threshold) => metric > threshold,
            Self::MetricBelow(threshold) => metric < threshold,
            Self::ClusterIs(id) => county.cluster_7 == id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusRule {
    pub when: RadiusCondition,
    pub multiplier: f64,
}

const fn rule(when: RadiusCondition, multiplier: f64) -> RadiusRule {
    RadiusRule { when, multiplier }
}

use RadiusCondition::{Always, ClusterIs, MetricAbove, MetricBelow};

const HEALTHCARE_RULES: &[RadiusRule] = &[
    rule(MetricBelow(30.0), 1.4),
    rule(MetricBelow(50.0), 1.15),
    rule(Always, 1.0),
];

const OPPORTUNITY_RULES: &[RadiusRule] = &[
    rule(MetricAbove(75.0), 1.3),
    rule(MetricAbove(60.0), 1.1),
    rule(Always, 0.9),
];

const VULNERABILITY_RULES: &[RadiusRule] = &[
    rule(MetricAbove(70.0), 1.3),
    rule(MetricAbove(50.0), 1.1),
    rule(Always, 0.9),
];

const POPULATION_RULES: &[RadiusRule] = &[rule(Always, 1.5)];

const CLUSTER_RULES: &[RadiusRule] = &[
    rule(ClusterIs(0), 1.0),
    rule(ClusterIs(1), 1.1),
    rule(ClusterIs(2), 0.9),
    rule(ClusterIs(3), 1.2),
    rule(ClusterIs(4), 1.0),
    rule(ClusterIs(5), 0.9),
    rule(ClusterIs(6), 1.1),
    rule(Always, 1.0),
];

/// The ordered rule table for `mode`. First match wins.
#[must_use]
pub const fn radius_rules(mode: VisualMode) -> &'static [RadiusRule] {
    match mode {
        VisualMode::HealthcareAccess => HEALTHCARE_RULES,
        VisualMode::Opportunity => OPPORTUNITY_RULES,
        VisualMode::Vulnerability => VULNERABILITY_RULES,
        VisualMode::Population => POPULATION_RULES,
        VisualMode::Cluster => CLUSTER_RULES,
    }
}

/// Radius from the population ladder alone.
#[must_use]
pub fn base_radius(population: u64) -> f64 {
    POPULATION_LADDER
        .iter()
        .find(|(threshold, _)| population > *threshold)
        .map_or(SMALLEST_RADIUS, |(_, radius)| *radius)
}

/// The multiplier `mode` applies to `county`.
#[must_use]
pub fn mode_multiplier(county: &CountyRecord, mode: VisualMode) -> f64 {
    let metric = mode.metric(county);
    radius_rules(mode)
        .iter()
        .find(|r| r.when.matches(county, metric))
        .map_or(1.0, |r| r.multiplier)
}

/// Final marker radius, always within `[MIN_RADIUS, MAX_RADIUS]`.
#[must_use]
pub fn radius(county: &CountyRecord, mode: VisualMode, selected: bool) -> f64 {
    let mut radius = base_radius(county.population) * mode_multiplier(county, mode);
    if selected {
        radius += SELECTED_RADIUS_BONUS;
    }
    radius.clamp(MIN_RADIUS, MAX_RADIUS)
}
