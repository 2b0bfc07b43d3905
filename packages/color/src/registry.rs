//! Color scales keyed by visualization mode name.
//!
//! Built-in scales are defined in TOML files under `scales/` and embedded at
//! compile time. A dataset may ship its own `color_scales.json`, which is
//! layered on top per key with [`ColorScaleTable::merge`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ColorScale;

#[derive(Debug, Deserialize)]
struct ScaleFile {
    key: String,
    #[serde(flatten)]
    scale: ColorScale,
}

const SCALE_TOMLS: &[(&str, &str)] = &[
    (
        "healthcare_access",
        include_str!("../scales/healthcare_access.toml"),
    ),
    ("opportunity", include_str!("../scales/opportunity.toml")),
    ("vulnerability", include_str!("../scales/vulnerability.toml")),
    ("population", include_str!("../scales/population.toml")),
];

#[cfg(test)]
const EXPECTED_SCALE_COUNT: usize = 4;

/// Mode name to [`ColorScale`]. The `cluster` mode intentionally has no
/// entry; it is colored from the cluster palette.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorScaleTable {
    scales: BTreeMap<String, ColorScale>,
}

impl ColorScaleTable {
    /// The scales compiled into the binary.
    ///
    /// # Panics
    ///
    /// Panics if any embedded TOML file is malformed (a build-time
    /// guarantee, since the files ship with the crate).
    #[must_use]
    pub fn builtin() -> Self {
        let scales = SCALE_TOMLS
            .iter()
            .map(|(name, toml_str)| {
                let file: ScaleFile = toml::de::from_str(toml_str)
                    .unwrap_or_else(|e| panic!("Failed to parse color scale '{name}': {e}"));
                (file.key, file.scale)
            })
            .collect();
        Self { scales }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ColorScale> {
        self.scales.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, scale: ColorScale) {
        self.scales.insert(key.into(), scale);
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scales.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Replaces scales key by key with those from `overrides`.
    ///
    /// Overrides that fail validation are still applied, since the
    /// interpolator tolerates them, but each one is logged.
    pub fn merge(&mut self, overrides: Self) {
        for (key, scale) in overrides.scales {
            if let Err(e) = scale.validate() {
                log::warn!("Color scale '{key}' is malformed ({e}); rendering will degrade");
            }
            log::debug!("Overriding color scale '{key}'");
            self.scales.insert(key, scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_builtin_scales() {
        assert_eq!(ColorScaleTable::builtin().len(), EXPECTED_SCALE_COUNT);
    }

    #[test]
    fn builtin_scales_are_well_formed() {
        let table = ColorScaleTable::builtin();
        for key in table.keys() {
            let scale = table.get(key).unwrap();
            assert!(scale.validate().is_ok(), "scale {key} failed validation");
            assert!(scale.name.is_some(), "scale {key} has no name");
        }
    }

    #[test]
    fn no_cluster_scale() {
        assert!(ColorScaleTable::builtin().get("cluster").is_none());
    }

    #[test]
    fn merge_replaces_per_key() {
        let mut table = ColorScaleTable::builtin();
        let mut overrides = ColorScaleTable::default();
        overrides.insert(
            "opportunity",
            ColorScale::new([0.0, 100.0], ["#000000", "#ffffff"]),
        );
        table.merge(overrides);

        assert_eq!(table.len(), EXPECTED_SCALE_COUNT);
        assert_eq!(table.get("opportunity").unwrap().colors.len(), 2);
        assert_eq!(table.get("healthcare_access").unwrap().colors.len(), 5);
    }

    #[test]
    fn deserializes_as_plain_map() {
        let json = r##"{"healthcare_access": {"domain": [0, 100], "colors": ["#000", "#fff"]}}"##;
        let table: ColorScaleTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), ["healthcare_access"]);
    }
}
