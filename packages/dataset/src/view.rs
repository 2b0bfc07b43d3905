//! The filtered, recomputed view handed to a renderer.

use county_health_color::LegendEntry;
use county_health_county_models::CountyRecord;
use county_health_visual::{Tooltip, VisualContext, attributes, tooltip_for};
use serde::Serialize;

use crate::{DashboardState, Dataset};

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCounty {
    pub fips: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub color: String,
    pub radius: f64,
    pub stroke_weight: f64,
    pub fill_opacity: f64,
    pub selected: bool,
    pub tooltip: Tooltip,
}

/// Headline numbers for the currently visible counties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuickStats {
    pub county_count: usize,
    /// `0` when nothing is visible.
    pub average_healthcare_access: f64,
    pub total_population: u64,
}

impl QuickStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counties(counties: &[&CountyRecord]) -> Self {
        let county_count = counties.len();
        let average_healthcare_access = if county_count == 0 {
            0.0
        } else {
            counties.iter().map(|c| c.healthcare_access).sum::<f64>() / county_count as f64
        };
        Self {
            county_count,
            average_healthcare_access,
            total_population: counties.iter().map(|c| c.population).sum(),
        }
    }
}

/// Counties passing the state's filter, in dataset order.
#[must_use]
pub fn filtered<'a>(dataset: &'a Dataset, state: &DashboardState) -> Vec<&'a CountyRecord> {
    state.filter.apply(dataset.counties())
}

/// The selected county, if it still exists in the dataset.
#[must_use]
pub fn selected_county<'a>(dataset: &'a Dataset, state: &DashboardState) -> Option<&'a CountyRecord> {
    state.selected_fips.as_deref().and_then(|f| dataset.county(f))
}

/// Visual attributes and tooltip for every visible county.
#[must_use]
pub fn render(dataset: &Dataset, state: &DashboardState) -> Vec<RenderedCounty> {
    let ctx = VisualContext {
        mode: state.mode,
        selected_fips: state.selected_fips.as_deref(),
        scales: dataset.scales(),
        palette: &state.palette,
    };

    filtered(dataset, state)
        .into_iter()
        .map(|county| {
            let attrs = attributes(&ctx, county);
            RenderedCounty {
                fips: county.fips.clone(),
                name: county.display_name(),
                lat: county.lat,
                lng: county.lng,
                tooltip: tooltip_for(county, state.mode, attrs.selected),
                color: attrs.color,
                radius: attrs.radius,
                stroke_weight: attrs.stroke_weight,
                fill_opacity: attrs.fill_opacity,
                selected: attrs.selected,
            }
        })
        .collect()
}

/// Legend for the state's current mode.
#[must_use]
pub fn legend(dataset: &Dataset, state: &DashboardState) -> Vec<LegendEntry> {
    county_health_visual::legend(
        state.mode,
        dataset.scales(),
        &state.palette,
        dataset.clusters(),
    )
}
