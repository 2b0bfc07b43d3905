//! Derived views over the county collection: clusters, peers, insights,
//! and state rankings.

use std::collections::BTreeMap;

use county_health_county_models::{
    ClusterDefinition, CountyRecord, Priority, StateSortKey, StateSummary,
};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Peers listed by [`similar_counties`].
pub const SIMILAR_COUNTY_LIMIT: usize = 5;

/// Peers considered by [`cluster_comparison`].
pub const CLUSTER_PEER_LIMIT: usize = 10;

/// Rows per page of the state ranking table.
pub const STATES_PER_PAGE: usize = 8;

/// Gap between a county and its peer average that produces an insight.
pub const PEER_GAP_THRESHOLD: f64 = 5.0;

/// Builds one definition per distinct `Cluster_7` value, sorted by id.
///
/// The name and description come from the first county in the cluster that
/// carries them.
#[must_use]
pub fn derive_clusters(counties: &[CountyRecord]) -> Vec<ClusterDefinition> {
    let mut clusters: BTreeMap<u8, ClusterDefinition> = BTreeMap::new();

    for county in counties {
        let entry = clusters
            .entry(county.cluster_7)
            .or_insert_with(|| ClusterDefinition {
                id: county.cluster_7,
                name: String::new(),
                description: String::new(),
                county_count: 0,
            });
        entry.county_count += 1;
        if entry.name.is_empty()
            && let Some(name) = county.cluster_name_detailed.as_deref()
        {
            entry.name = name.to_string();
        }
        if entry.description.is_empty()
            && let Some(description) = county.cluster_description.as_deref()
        {
            entry.description = description.to_string();
        }
    }

    clusters
        .into_values()
        .map(|mut def| {
            if def.name.is_empty() {
                def.name = ClusterDefinition::default_name(def.id);
            }
            def
        })
        .collect()
}

/// Counties in the same cluster as `selected` with a population within 50%
/// of it, closest `Healthcare_Access` first.
#[must_use]
pub fn similar_counties<'a>(
    counties: &'a [CountyRecord],
    selected: &CountyRecord,
) -> Vec<&'a CountyRecord> {
    let population = selected.population_f64();
    let (low, high) = (population * 0.5, population * 1.5);

    let mut peers: Vec<&CountyRecord> = counties
        .iter()
        .filter(|c| c.cluster_7 == selected.cluster_7 && c.fips != selected.fips)
        .filter(|c| (low..=high).contains(&c.population_f64()))
        .collect();
    peers.sort_by(|a, b| {
        let da = (a.healthcare_access - selected.healthcare_access).abs();
        let db = (b.healthcare_access - selected.healthcare_access).abs();
        da.total_cmp(&db)
    });
    peers.truncate(SIMILAR_COUNTY_LIMIT);
    peers
}

/// Same-cluster peers from `counties` (excluding `selected`), best
/// `Healthcare_Access` first, capped at `limit`.
#[must_use]
pub fn top_cluster_peers<'a>(
    counties: &[&'a CountyRecord],
    selected: &CountyRecord,
    limit: usize,
) -> Vec<&'a CountyRecord> {
    let mut peers: Vec<&CountyRecord> = counties
        .iter()
        .copied()
        .filter(|c| c.cluster_7 == selected.cluster_7 && c.fips != selected.fips)
        .collect();
    peers.sort_by(|a, b| b.healthcare_access.total_cmp(&a.healthcare_access));
    peers.truncate(limit);
    peers
}

/// How a county compares against the best performers in its cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterComparison<'a> {
    pub peers: Vec<&'a CountyRecord>,
    /// Mean `Healthcare_Access` of `peers`; `None` if there are none.
    pub peer_average: Option<f64>,
    /// Percentage of `peers` scoring strictly below the selected county.
    pub share_below: f64,
}

/// Compares `selected` against its top same-cluster peers within the
/// filtered set.
#[must_use]
pub fn cluster_comparison<'a>(
    filtered: &[&'a CountyRecord],
    selected: &CountyRecord,
) -> ClusterComparison<'a> {
    let peers = top_cluster_peers(filtered, selected, CLUSTER_PEER_LIMIT);
    let scores: Vec<f64> = peers.iter().map(|c| c.healthcare_access).collect();
    ClusterComparison {
        peer_average: mean(&scores),
        share_below: percentile_rank(selected.healthcare_access, &scores),
        peers,
    }
}

/// Percentage (0-100) of `values` strictly below `value`. An empty list
/// ranks as 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentile_rank(value: f64, values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let below = values.iter().filter(|&&v| v < value).count();
    below as f64 / values.len() as f64 * 100.0
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

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
pub enum InsightKind {
    Success,
    Warning,
    Opportunity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    pub priority: Priority,
}

/// Rule-based observations about `county`, optionally relative to `peers`.
#[must_use]
pub fn insights(county: &CountyRecord, peers: &[&CountyRecord]) -> Vec<Insight> {
    let mut out = Vec::new();

    if county.healthcare_access > 80.0 {
        out.push(Insight {
            kind: InsightKind::Success,
            message: format!(
                "{} demonstrates excellent healthcare access with a score of {:.1}.",
                county.county, county.healthcare_access
            ),
            priority: Priority::Medium,
        });
    } else if county.healthcare_access < 40.0 {
        out.push(Insight {
            kind: InsightKind::Warning,
            message: format!(
                "{} shows critical healthcare access gaps requiring immediate attention.",
                county.county
            ),
            priority: Priority::High,
        });
    }

    if county.opportunity_score > 75.0 {
        out.push(Insight {
            kind: InsightKind::Opportunity,
            message: format!(
                "High improvement potential identified. Strategic investments could significantly impact {} residents.",
                county_health_visual::format::group_thousands(county.population)
            ),
            priority: Priority::High,
        });
    }

    let peer_scores: Vec<f64> = peers.iter().map(|c| c.healthcare_access).collect();
    if let Some(average) = mean(&peer_scores) {
        let difference = county.healthcare_access - average;
        if difference.abs() > PEER_GAP_THRESHOLD {
            let (kind, direction) = if difference > 0.0 {
                (InsightKind::Success, "above")
            } else {
                (InsightKind::Warning, "below")
            };
            out.push(Insight {
                kind,
                message: format!(
                    "Performs {:.1} points {direction} similar counties.",
                    difference.abs()
                ),
                priority: Priority::Medium,
            });
        }
    }

    out
}

/// Aggregates county rows into one summary per state, sorted by state name.
///
/// `Healthcare_Rank` is the 1-based position by mean access (best first)
/// and `Inequality_Score` the standard deviation of access within the state.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn derive_state_summaries(counties: &[CountyRecord]) -> Vec<StateSummary> {
    let mut by_state: BTreeMap<&str, Vec<&CountyRecord>> = BTreeMap::new();
    for county in counties {
        by_state.entry(county.state.as_str()).or_default().push(county);
    }

    let mut summaries: Vec<StateSummary> = by_state
        .into_iter()
        .map(|(state, rows)| {
            let access: Vec<f64> = rows.iter().map(|c| c.healthcare_access).collect();
            let access_mean = mean(&access).unwrap_or_default();
            let variance = access
                .iter()
                .map(|v| (v - access_mean).powi(2))
                .sum::<f64>()
                / access.len() as f64;
            let opportunity: Vec<f64> = rows.iter().map(|c| c.opportunity_score).collect();
            let vulnerability: Vec<f64> = rows.iter().map(|c| c.vulnerability_index).collect();

            StateSummary {
                state: state.to_string(),
                healthcare_access_mean: Some(access_mean),
                population_sum: Some(rows.iter().map(|c| c.population_f64()).sum()),
                opportunity_score_mean: mean(&opportunity),
                vulnerability_index_mean: mean(&vulnerability),
                healthcare_rank: None,
                inequality_score: Some(variance.sqrt()),
                county_count: u32::try_from(rows.len()).ok(),
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..summaries.len()).collect();
    order.sort_by(|&a, &b| {
        StateSortKey::HealthcareAccessMean
            .value(&summaries[b])
            .total_cmp(&StateSortKey::HealthcareAccessMean.value(&summaries[a]))
    });
    for (rank, index) in order.into_iter().enumerate() {
        summaries[index].healthcare_rank = Some((rank + 1) as f64);
    }

    summaries
}

/// Sorts state summaries by `key`. Ties keep their input order.
#[must_use]
pub fn rank_states<'a>(
    states: &'a [StateSummary],
    key: StateSortKey,
    ascending: bool,
) -> Vec<&'a StateSummary> {
    let mut ranked: Vec<&StateSummary> = states.iter().collect();
    ranked.sort_by(|a, b| {
        let ord = key.value(a).total_cmp(&key.value(b));
        if ascending { ord } else { ord.reverse() }
    });
    ranked
}

/// One page of a ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Zero-based page index actually returned.
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

/// Returns page `page` (zero-based) of `items`, clamped to the last page.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let page_count = items.len().div_ceil(per_page).max(1);
    let page = page.min(page_count - 1);
    let start = (page * per_page).min(items.len());
    let end = (start + per_page).min(items.len());
    Page {
        items: &items[start..end],
        page,
        page_count,
        total: items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn county(fips: &str, cluster: u8, access: f64, population: u64) -> CountyRecord {
        let mut c = CountyRecord::with_fips(fips);
        c.county = format!("County {fips}");
        c.cluster_7 = cluster;
        c.healthcare_access = access;
        c.population = population;
        c
    }

    #[test]
    fn clusters_are_derived_from_records() {
        let mut a = county("01001", 2, 50.0, 1000);
        let mut b = county("01003", 0, 50.0, 1000);
        let c = county("01005", 2, 50.0, 1000);
        a.cluster_name_detailed = Some("Rural South".to_string());
        b.cluster_description = Some("Dense metros".to_string());

        let clusters = derive_clusters(&[c, a, b]);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].id, 0);
        assert_eq!(clusters[0].name, "Cluster 0");
        assert_eq!(clusters[0].description, "Dense metros");
        assert_eq!(clusters[1].name, "Rural South", "first named row wins");
        assert_eq!(clusters[1].county_count, 2);
    }

    #[test]
    fn similar_counties_respect_cluster_and_population_band() {
        let selected = county("01001", 1, 60.0, 100_000);
        let counties = vec![
            selected.clone(),
            county("01003", 1, 61.0, 140_000),
            county("01005", 1, 59.5, 40_000),
            county("01007", 2, 60.0, 100_000),
            county("01009", 1, 70.0, 50_000),
            county("01011", 1, 60.2, 150_000),
        ];

        let fips: Vec<&str> = similar_counties(&counties, &selected)
            .iter()
            .map(|c| c.fips.as_str())
            .collect();
        assert_eq!(fips, vec!["01011", "01003", "01009"]);
    }

    #[test]
    fn comparison_over_top_peers() {
        let selected = county("01001", 1, 60.0, 1000);
        let rows = [
            selected.clone(),
            county("01003", 1, 80.0, 1000),
            county("01005", 1, 50.0, 1000),
            county("01007", 1, 40.0, 1000),
            county("01009", 3, 10.0, 1000),
        ];
        let filtered: Vec<&CountyRecord> = rows.iter().collect();
        let comparison = cluster_comparison(&filtered, &selected);

        assert_eq!(comparison.peers.len(), 3);
        assert_eq!(comparison.peers[0].fips, "01003");
        assert!((comparison.peer_average.unwrap() - 56.666_666).abs() < 1e-3);
        assert!((comparison.share_below - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn comparison_without_peers() {
        let selected = county("01001", 1, 60.0, 1000);
        let comparison = cluster_comparison(&[&selected], &selected);
        assert!(comparison.peers.is_empty());
        assert_eq!(comparison.peer_average, None);
        assert!(comparison.share_below.abs() < f64::EPSILON);
    }

    #[test]
    fn percentile_rank_counts_strictly_below() {
        assert!((percentile_rank(50.0, &[10.0, 50.0, 60.0, 70.0]) - 25.0).abs() < 1e-9);
        assert!((percentile_rank(100.0, &[10.0, 20.0]) - 100.0).abs() < 1e-9);
        assert!(percentile_rank(5.0, &[]).abs() < f64::EPSILON);
    }

    #[test]
    fn insights_cover_each_rule() {
        let mut c = county("01001", 1, 85.0, 12_345);
        c.opportunity_score = 80.0;
        let peer = county("01003", 1, 70.0, 1000);
        let found = insights(&c, &[&peer]);

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].kind, InsightKind::Success);
        assert!(found[1].message.contains("12,345 residents"));
        assert_eq!(found[2].message, "Performs 15.0 points above similar counties.");

        let low = county("01005", 1, 30.0, 1000);
        let found = insights(&low, &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].priority, Priority::High);
    }

    #[test]
    fn small_peer_gap_is_not_reported() {
        let c = county("01001", 1, 60.0, 1000);
        let peer = county("01003", 1, 57.0, 1000);
        assert!(insights(&c, &[&peer]).is_empty());
    }

    #[test]
    fn state_summaries_from_counties() {
        let mut rows = vec![
            county("01001", 0, 40.0, 1000),
            county("01003", 0, 60.0, 3000),
            county("06037", 0, 90.0, 5000),
        ];
        rows[2].state = "California".to_string();

        let states = derive_state_summaries(&rows);
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].state, "Alabama");
        assert_eq!(states[0].healthcare_access_mean, Some(50.0));
        assert_eq!(states[0].population_sum, Some(4000.0));
        assert_eq!(states[0].inequality_score, Some(10.0));
        assert_eq!(states[0].healthcare_rank, Some(2.0));
        assert_eq!(states[1].healthcare_rank, Some(1.0));
        assert_eq!(states[1].county_count, Some(1));
    }

    #[test]
    fn ranking_treats_missing_as_zero() {
        let state = |name: &str, rank: Option<f64>| StateSummary {
            state: name.to_string(),
            healthcare_access_mean: None,
            population_sum: None,
            opportunity_score_mean: None,
            vulnerability_index_mean: None,
            healthcare_rank: rank,
            inequality_score: None,
            county_count: None,
        };
        let states = [state("A", Some(3.0)), state("B", None), state("C", Some(1.0))];

        let asc: Vec<&str> = rank_states(&states, StateSortKey::HealthcareRank, true)
            .iter()
            .map(|s| s.state.as_str())
            .collect();
        assert_eq!(asc, vec!["B", "C", "A"]);

        let desc: Vec<&str> = rank_states(&states, StateSortKey::HealthcareRank, false)
            .iter()
            .map(|s| s.state.as_str())
            .collect();
        assert_eq!(desc, vec!["A", "C", "B"]);
    }

    #[test]
    fn pagination_clamps_to_last_page() {
        let items: Vec<u32> = (0..19).collect();
        let page = paginate(&items, 0, STATES_PER_PAGE);
        assert_eq!(page.items.len(), 8);
        assert_eq!(page.page_count, 3);

        let last = paginate(&items, 9, STATES_PER_PAGE);
        assert_eq!(last.page, 2);
        assert_eq!(last.items, &[16, 17, 18]);

        let empty = paginate::<u32>(&[], 3, STATES_PER_PAGE);
        assert!(empty.items.is_empty());
        assert_eq!(empty.page_count, 1);
    }
}
