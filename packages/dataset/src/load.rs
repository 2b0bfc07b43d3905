//! Reads a data directory into a [`Dataset`].

use std::{collections::BTreeMap, path::Path};

use county_health_color::ColorScaleTable;
use county_health_county_models::{ClusterDefinition, CountyRecord, StateSummary};
use serde::de::DeserializeOwned;

use crate::{Dataset, DatasetError, analysis, paths};

pub fn load(data_dir: &Path) -> Result<Dataset, DatasetError> {
    log::info!("Loading county health data from {}", data_dir.display());

    let counties = load_counties(data_dir)?;
    let mut dataset = Dataset::from_counties(counties);

    if let Some(states) =
        read_optional::<Vec<StateSummary>>(&paths::state_analysis_path(data_dir))
    {
        dataset.states = states;
    } else {
        log::info!(
            "Derived {} state summaries from county rows",
            dataset.states.len()
        );
    }

    if let Some(overrides) = read_optional::<ColorScaleTable>(&paths::color_scales_path(data_dir))
    {
        dataset.scales.merge(overrides);
    }

    if let Some(declared) =
        read_optional::<Vec<ClusterDefinition>>(&paths::cluster_definitions_path(data_dir))
    {
        reconcile_clusters(&mut dataset.clusters, declared);
    }

    dataset.policy_recommendations =
        read_optional(&paths::policy_recommendations_path(data_dir)).unwrap_or_default();
    dataset.projections =
        read_optional(&paths::projection_scenarios_path(data_dir)).unwrap_or_default();
    dataset.insights = read_optional(&paths::county_insights_path(data_dir)).unwrap_or_default();

    log::info!(
        "Loaded {} counties, {} states, {} clusters, {} recommendations, {} projections, {} insight sets",
        dataset.counties.len(),
        dataset.states.len(),
        dataset.clusters.len(),
        dataset.policy_recommendations.len(),
        dataset.projections.len(),
        dataset.insights.len(),
    );

    Ok(dataset)
}

/// Tries the comprehensive county file, then the minimal one.
fn load_counties(data_dir: &Path) -> Result<Vec<CountyRecord>, DatasetError> {
    for path in [
        paths::county_data_path(data_dir),
        paths::fallback_county_data_path(data_dir),
    ] {
        if !path.is_file() {
            log::debug!("{} not found", path.display());
            continue;
        }
        let rows = read_json::<Vec<serde_json::Value>>(&path)
            .map(|rows| parse_county_rows(&path, rows));
        match rows {
            Ok(rows) if rows.is_empty() => {
                log::warn!("{} contains no counties", path.display());
            }
            Ok(rows) => {
                log::info!("Read {} counties from {}", rows.len(), path.display());
                return Ok(rows);
            }
            Err(e) => log::warn!("{e}"),
        }
    }

    Err(DatasetError::NoCountyData {
        dir: data_dir.to_path_buf(),
    })
}

/// Converts rows one at a time so a single malformed row is skipped rather
/// than rejecting the file.
fn parse_county_rows(path: &Path, rows: Vec<serde_json::Value>) -> Vec<CountyRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            serde_json::from_value::<CountyRecord>(row)
                .inspect_err(|e| {
                    log::warn!("Skipping row {index} of {}: {e}", path.display());
                })
                .ok()
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an optional file. Missing files are skipped quietly; unreadable or
/// malformed ones are skipped with a warning.
fn read_optional<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.is_file() {
        log::debug!("Optional file {} not present", path.display());
        return None;
    }
    read_json(path)
        .inspect_err(|e| log::warn!("Ignoring optional file: {e}"))
        .ok()
}

/// Fills names and descriptions of the derived clusters from a declared
/// cluster file. Ids and counts always come from the county rows.
fn reconcile_clusters(derived: &mut [ClusterDefinition], declared: Vec<ClusterDefinition>) {
    let mut declared: BTreeMap<u8, ClusterDefinition> =
        declared.into_iter().map(|c| (c.id, c)).collect();

    for cluster in derived.iter_mut() {
        let Some(file) = declared.remove(&cluster.id) else {
            log::warn!(
                "Cluster {} appears in county data but not in {}",
                cluster.id,
                paths::CLUSTER_DEFINITIONS_FILE
            );
            continue;
        };
        if cluster.name == ClusterDefinition::default_name(cluster.id) && !file.name.is_empty() {
            cluster.name = file.name;
        }
        if cluster.description.is_empty() {
            cluster.description = file.description;
        }
        if file.county_count != 0 && file.county_count != cluster.county_count {
            log::warn!(
                "Cluster {} declares {} counties but {} were loaded",
                cluster.id,
                file.county_count,
                cluster.county_count
            );
        }
    }

    for id in declared.keys() {
        log::warn!("Ignoring declared cluster {id} with no counties");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use county_health_county_models::StateSortKey;

    use super::*;

    struct Fixture(PathBuf);

    impl Fixture {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "county_health_dataset_{name}_{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, file: &str, contents: &str) -> &Self {
            std::fs::write(self.0.join(file), contents).unwrap();
            self
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    const COUNTIES: &str = r#"[
        {"FIPS": 1001, "County": "Autauga County", "State": "Alabama", "Region": "South",
         "Population": 58805, "Healthcare_Access": 42.1, "Cluster_7": 2,
         "Cluster_Name_Detailed": "Rural South"},
        {"FIPS": "06037", "County": "Los Angeles County", "Region": "West",
         "latitude": 34.3, "longitude": -118.2, "Population": 10039107, "Cluster_7": 5}
    ]"#;

    #[test]
    fn loads_counties_and_derives_the_rest() {
        let fixture = Fixture::new("derive");
        fixture.write(paths::COUNTY_DATA_FILE, COUNTIES);

        let dataset = Dataset::load(&fixture.0).unwrap();
        assert_eq!(dataset.counties().len(), 2);

        let autauga = dataset.county("01001").unwrap();
        assert_eq!(autauga.region, "South");
        let la = dataset.county("06037").unwrap();
        assert_eq!(la.state, "California");
        assert!((la.lat - 34.3).abs() < 1e-9);
        assert!((la.healthcare_access - 50.0).abs() < f64::EPSILON);

        assert_eq!(dataset.cluster_ids(), vec![2, 5]);
        assert_eq!(dataset.clusters()[0].name, "Rural South");
        assert_eq!(dataset.states().len(), 2);
        assert_eq!(dataset.regions(), vec!["South".to_string(), "West".to_string()]);
    }

    #[test]
    fn falls_back_to_minimal_county_file() {
        let fixture = Fixture::new("fallback");
        fixture
            .write(paths::COUNTY_DATA_FILE, "{ not json")
            .write(paths::FALLBACK_COUNTY_DATA_FILE, COUNTIES);

        let dataset = Dataset::load(&fixture.0).unwrap();
        assert_eq!(dataset.counties().len(), 2);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let fixture = Fixture::new("bad_rows");
        fixture.write(
            paths::COUNTY_DATA_FILE,
            r#"[
                {"FIPS": 1001, "County": "Autauga County", "Median_Income": "N/A"},
                {"FIPS": "06037", "County": ["not", "a", "name"]},
                "not a row",
                {"FIPS": "48201", "County": "Harris County", "Median_Income": 65000}
            ]"#,
        );

        let dataset = Dataset::load(&fixture.0).unwrap();
        assert_eq!(dataset.counties().len(), 2);
        assert!(dataset.county("01001").unwrap().median_income.abs() < f64::EPSILON);
        assert!(dataset.county("06037").is_none());
        assert!((dataset.county("48201").unwrap().median_income - 65000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_county_data_is_an_error() {
        let fixture = Fixture::new("empty");
        fixture.write(paths::COUNTY_DATA_FILE, "[]");
        assert!(matches!(
            Dataset::load(&fixture.0),
            Err(DatasetError::NoCountyData { .. })
        ));
    }

    #[test]
    fn optional_files_are_applied() {
        let fixture = Fixture::new("optional");
        fixture
            .write(paths::COUNTY_DATA_FILE, COUNTIES)
            .write(
                paths::STATE_ANALYSIS_FILE,
                r#"[{"State": "Alabama", "Healthcare_Access_mean": 47.2, "Healthcare_Rank": 31},
                    {"State": "Alaska", "Inequality_Score": 12.5}]"#,
            )
            .write(
                paths::COLOR_SCALES_FILE,
                r##"{"opportunity": {"domain": [0, 100], "colors": ["#000000", "#ffffff"]}}"##,
            )
            .write(
                paths::CLUSTER_DEFINITIONS_FILE,
                r#"[{"id": 5, "name": "Coastal Metros", "description": "Large coastal cities", "county_count": 40},
                    {"id": 6, "name": "Unused"}]"#,
            )
            .write(
                paths::POLICY_RECOMMENDATIONS_FILE,
                r#"[{"FIPS": "01001", "policy": "Mobile clinics", "priority": "High",
                     "rationale": "Low access", "impact_score": 3.5, "annual_cost": 800000}]"#,
            )
            .write(
                paths::PROJECTION_SCENARIOS_FILE,
                r#"[{"FIPS": "01001", "status_quo_projection": [42, 43]}]"#,
            )
            .write(
                paths::COUNTY_INSIGHTS_FILE,
                r#"[{"FIPS": "01001", "insights": [{"text": "Below state average", "importance": "high"}]}]"#,
            );

        let dataset = Dataset::load(&fixture.0).unwrap();

        assert_eq!(dataset.states().len(), 2);
        assert!(
            (StateSortKey::HealthcareRank.value(&dataset.states()[0]) - 31.0).abs() < f64::EPSILON
        );
        assert_eq!(
            dataset.scales().get("opportunity").unwrap().colors,
            vec!["#000000", "#ffffff"]
        );
        assert!(dataset.scales().get("healthcare_access").is_some());

        let clusters = dataset.clusters();
        assert_eq!(clusters.len(), 2, "declared-only cluster is ignored");
        assert_eq!(clusters[0].name, "Rural South");
        assert_eq!(clusters[1].name, "Coastal Metros");
        assert_eq!(clusters[1].description, "Large coastal cities");
        assert_eq!(clusters[1].county_count, 1);

        assert_eq!(dataset.policy_recommendations_for("01001").len(), 1);
        assert!(dataset.policy_recommendations_for("06037").is_empty());
        assert_eq!(dataset.projection_for("01001").unwrap().summaries().len(), 1);
        assert_eq!(dataset.insights_for("01001")[0].text, "Below state average");
    }

    #[test]
    fn malformed_optional_file_is_skipped() {
        let fixture = Fixture::new("malformed_optional");
        fixture
            .write(paths::COUNTY_DATA_FILE, COUNTIES)
            .write(paths::STATE_ANALYSIS_FILE, "{\"State\": 3}");

        let dataset = Dataset::load(&fixture.0).unwrap();
        assert_eq!(dataset.states().len(), 2, "falls back to derived summaries");
    }
}
