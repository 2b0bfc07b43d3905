//! Hover card content for a county marker.

use county_health_county_models::{CountyRecord, VisualMode};
use serde::{Deserialize, Serialize};

use crate::format::group_thousands;

/// Everything a renderer needs to draw a county's tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    /// `"County, State"`.
    pub title: String,
    /// Name of the headline metric.
    pub label: String,
    /// Headline metric, already formatted.
    pub value: String,
    /// Mode-specific secondary lines as `(name, value)` pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<(String, String)>,
    pub population: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    /// Footer line: a click hint, or the selected marker.
    pub footer: String,
}

/// Builds the tooltip for `county` in `mode`.
#[must_use]
pub fn tooltip_for(county: &CountyRecord, mode: VisualMode, selected: bool) -> Tooltip {
    let population = group_thousands(county.population);
    let cluster_name = county.cluster_name_detailed.clone();

    let (label, value, details) = match mode {
        VisualMode::HealthcareAccess => (
            "Healthcare Access",
            format!("{:.1}", county.healthcare_access),
            vec![(
                "Percentile".to_string(),
                county
                    .healthcare_access_percentile
                    .map_or_else(|| "N/A".to_string(), |p| format!("{p:.0}th percentile")),
            )],
        ),
        VisualMode::Opportunity => (
            "Opportunity Score",
            format!("{:.1}", county.opportunity_score),
            vec![(
                "Context".to_string(),
                "Higher = More potential for improvement".to_string(),
            )],
        ),
        VisualMode::Vulnerability => (
            "Vulnerability Index",
            format!("{:.1}", county.vulnerability_index),
            vec![(
                "Resilience".to_string(),
                format!("{:.1}", county.resilience_score),
            )],
        ),
        VisualMode::Population => ("Population", population.clone(), Vec::new()),
        VisualMode::Cluster => (
            "Cluster Type",
            cluster_name
                .clone()
                .unwrap_or_else(|| format!("Cluster {}", county.cluster_7)),
            county
                .cluster_description
                .as_ref()
                .map(|d| vec![("Description".to_string(), d.clone())])
                .unwrap_or_default(),
        ),
    };

    Tooltip {
        title: county.display_name(),
        label: label.to_string(),
        value,
        details,
        population,
        cluster: cluster_name,
        footer: if selected {
            "Selected County".to_string()
        } else {
            "Click for detailed analysis".to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn county() -> CountyRecord {
        let mut county = CountyRecord::with_fips("06037");
        county.county = "Los Angeles County".to_string();
        county.population = 10_039_107;
        county.healthcare_access = 72.46;
        county.healthcare_access_percentile = Some(68.4);
        county.resilience_score = 61.3;
        county.vulnerability_index = 48.0;
        county.cluster_name_detailed = Some("Urban Metros".to_string());
        county
    }

    #[test]
    fn healthcare_tooltip() {
        let tooltip = tooltip_for(&county(), VisualMode::HealthcareAccess, false);
        assert_eq!(tooltip.title, "Los Angeles County, California");
        assert_eq!(tooltip.value, "72.5");
        assert_eq!(tooltip.details[0].1, "68th percentile");
        assert_eq!(tooltip.population, "10,039,107");
        assert_eq!(tooltip.footer, "Click for detailed analysis");
    }

    #[test]
    fn missing_percentile_shows_na() {
        let mut county = county();
        county.healthcare_access_percentile = None;
        let tooltip = tooltip_for(&county, VisualMode::HealthcareAccess, true);
        assert_eq!(tooltip.details[0].1, "N/A");
        assert_eq!(tooltip.footer, "Selected County");
    }

    #[test]
    fn vulnerability_includes_resilience() {
        let tooltip = tooltip_for(&county(), VisualMode::Vulnerability, false);
        assert_eq!(tooltip.label, "Vulnerability Index");
        assert_eq!(tooltip.details, vec![("Resilience".to_string(), "61.3".to_string())]);
    }

    #[test]
    fn cluster_tooltip_falls_back_to_id() {
        let mut county = county();
        county.cluster_name_detailed = None;
        county.cluster_7 = 4;
        let tooltip = tooltip_for(&county, VisualMode::Cluster, false);
        assert_eq!(tooltip.value, "Cluster 4");
        assert!(tooltip.details.is_empty());
    }
}
