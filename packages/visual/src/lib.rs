#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Maps each county to the visual attributes a map renderer needs.
//!
//! Everything here is a stateless function of the county and the current
//! [`VisualContext`]; re-running it for the same inputs always produces the
//! same output.

pub mod format;
mod palette;
pub mod radius;
mod tooltip;

pub use palette::ClusterPalette;
pub use radius::{base_radius, radius};
pub use tooltip::{Tooltip, tooltip_for};

use county_health_color::{ColorScaleTable, LegendEntry, color_for};
use county_health_county_models::{ClusterDefinition, CountyRecord, VisualMode};
use serde::{Deserialize, Serialize};

/// Highlight color for the selected county in every mode.
pub const SELECTED_COLOR: &str = "#ff0080";

/// Population mode colors from the largest tier to the smallest.
pub const POPULATION_TIER_COLORS: [&str; 4] = ["#ff0000", "#ff7700", "#ffff00", "#00ff41"];

/// Everything besides the county itself that affects how it is drawn.
#[derive(Debug, Clone, Copy)]
pub struct VisualContext<'a> {
    pub mode: VisualMode,
    pub selected_fips: Option<&'a str>,
    pub scales: &'a ColorScaleTable,
    pub palette: &'a ClusterPalette,
}

impl VisualContext<'_> {
    #[must_use]
    pub fn is_selected(&self, county: &CountyRecord) -> bool {
        self.selected_fips == Some(county.fips.as_str())
    }
}

/// How one county marker is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualAttributes {
    pub color: String,
    pub radius: f64,
    pub stroke_weight: f64,
    pub fill_opacity: f64,
    pub selected: bool,
}

/// Color tier by order of magnitude: above one million, one hundred
/// thousand, ten thousand, and everything else.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_tier_color(population: u64) -> &'static str {
    let magnitude = (population as f64).log10();
    if magnitude > 6.0 {
        POPULATION_TIER_COLORS[0]
    } else if magnitude > 5.0 {
        POPULATION_TIER_COLORS[1]
    } else if magnitude > 4.0 {
        POPULATION_TIER_COLORS[2]
    } else {
        POPULATION_TIER_COLORS[3]
    }
}

/// The fill color for `county`.
#[must_use]
pub fn county_color(ctx: &VisualContext<'_>, county: &CountyRecord) -> String {
    if ctx.is_selected(county) {
        return SELECTED_COLOR.to_string();
    }

    match ctx.mode {
        VisualMode::Cluster => ctx.palette.color(county.cluster_7).to_string(),
        VisualMode::Population => population_tier_color(county.population).to_string(),
        mode => {
            let scale = mode.color_scale_key().and_then(|key| ctx.scales.get(key));
            color_for(scale, mode.metric(county))
        }
    }
}

/// Color, radius, and stroke for `county`.
#[must_use]
pub fn attributes(ctx: &VisualContext<'_>, county: &CountyRecord) -> VisualAttributes {
    let selected = ctx.is_selected(county);
    VisualAttributes {
        color: county_color(ctx, county),
        radius: radius(county, ctx.mode, selected),
        stroke_weight: if selected { 3.0 } else { 2.0 },
        fill_opacity: if selected { 0.9 } else { 0.7 },
        selected,
    }
}

/// Legend for `mode`: cluster swatches, population tiers, or the mode's
/// color scale. Empty if the mode's scale is missing.
#[must_use]
pub fn legend(
    mode: VisualMode,
    scales: &ColorScaleTable,
    palette: &ClusterPalette,
    clusters: &[ClusterDefinition],
) -> Vec<LegendEntry> {
    match mode {
        VisualMode::Cluster => palette.legend(clusters),
        VisualMode::Population => [
            ("1M+", 1_000_000.0),
            ("100K - 1M", 100_000.0),
            ("10K - 100K", 10_000.0),
            ("Under 10K", 0.0),
        ]
        .iter()
        .zip(POPULATION_TIER_COLORS)
        .map(|((label, value), color)| LegendEntry {
            label: (*label).to_string(),
            color: color.to_string(),
            value: Some(*value),
        })
        .collect(),
        mode => mode
            .color_scale_key()
            .and_then(|key| scales.get(key))
            .map(county_health_color::ColorScale::legend)
            .unwrap_or_default(),
    }
}
