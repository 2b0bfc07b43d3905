//! Categorical colors for cluster mode.

use std::collections::BTreeMap;

use county_health_color::{LegendEntry, NEUTRAL_GRAY};
use county_health_county_models::ClusterDefinition;

const DEFAULT_CLUSTER_COLORS: &[(u8, &str)] = &[
    (0, "#ff6b6b"),
    (1, "#4ecdc4"),
    (2, "#45b7d1"),
    (3, "#96ceb4"),
    (4, "#feca57"),
    (5, "#ff9ff3"),
    (6, "#54a0ff"),
];

/// Cluster id to color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterPalette {
    colors: BTreeMap<u8, String>,
}

impl Default for ClusterPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_CLUSTER_COLORS
                .iter()
                .map(|(id, color)| (*id, (*color).to_string()))
                .collect(),
        }
    }
}

impl ClusterPalette {
    /// Color for `id`, or [`NEUTRAL_GRAY`] for clusters with no entry.
    #[must_use]
    pub fn color(&self, id: u8) -> &str {
        self.colors.get(&id).map_or(NEUTRAL_GRAY, String::as_str)
    }

    pub fn set(&mut self, id: u8, color: impl Into<String>) {
        self.colors.insert(id, color.into());
    }

    #[must_use]
    pub fn with_color(mut self, id: u8, color: impl Into<String>) -> Self {
        self.set(id, color);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.colors.iter().map(|(id, c)| (*id, c.as_str()))
    }

    /// One swatch per cluster definition, in the order given.
    #[must_use]
    pub fn legend(&self, clusters: &[ClusterDefinition]) -> Vec<LegendEntry> {
        clusters
            .iter()
            .map(|cluster| LegendEntry {
                label: format!("{} ({})", cluster.name, cluster.county_count),
                color: self.color(cluster.id).to_string(),
                value: Some(f64::from(cluster.id)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_default_colors() {
        let palette = ClusterPalette::default();
        assert_eq!(palette.iter().count(), 7);
        assert_eq!(palette.color(0), "#ff6b6b");
        assert_eq!(palette.color(6), "#54a0ff");
    }

    #[test]
    fn unknown_cluster_is_gray() {
        assert_eq!(ClusterPalette::default().color(7), NEUTRAL_GRAY);
    }

    #[test]
    fn overrides_replace_single_entries() {
        let palette = ClusterPalette::default().with_color(2, "#123456");
        assert_eq!(palette.color(2), "#123456");
        assert_eq!(palette.color(3), "#96ceb4");
    }

    #[test]
    fn legend_uses_definitions() {
        let clusters = vec![ClusterDefinition {
            id: 4,
            name: "Rural Plains".to_string(),
            description: String::new(),
            county_count: 312,
        }];
        let legend = ClusterPalette::default().legend(&clusters);
        assert_eq!(legend[0].label, "Rural Plains (312)");
        assert_eq!(legend[0].color, "#feca57");
    }
}
