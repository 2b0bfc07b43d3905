//! County lookup helpers for pickers and search boxes.

use std::collections::BTreeSet;

use county_health_county_models::CountyRecord;

/// Number of matches returned by [`search_counties`].
pub const SEARCH_LIMIT: usize = 10;

/// Counties whose county or state name contains `query`
/// (case-insensitive), in dataset order, at most `limit` of them.
///
/// An empty or blank query matches nothing.
#[must_use]
pub fn search_counties<'a>(
    counties: &'a [CountyRecord],
    query: &str,
    limit: usize,
) -> Vec<&'a CountyRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    counties
        .iter()
        .filter(|c| {
            c.county.to_lowercase().contains(&needle) || c.state.to_lowercase().contains(&needle)
        })
        .take(limit)
        .collect()
}

/// Sorted, de-duplicated region names present in `counties`.
#[must_use]
pub fn distinct_regions(counties: &[CountyRecord]) -> Vec<String> {
    counties
        .iter()
        .map(|c| c.region.as_str())
        .filter(|r| !r.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn county(fips: &str, name: &str, state: &str, region: &str) -> CountyRecord {
        let mut county = CountyRecord::with_fips(fips);
        county.county = name.to_string();
        county.state = state.to_string();
        county.region = region.to_string();
        county
    }

    fn sample() -> Vec<CountyRecord> {
        vec![
            county("06037", "Los Angeles County", "California", "West"),
            county("48201", "Harris County", "Texas", "South"),
            county("17031", "Cook County", "Illinois", "Midwest"),
            county("06073", "San Diego County", "California", "West"),
        ]
    }

    #[test]
    fn matches_county_or_state_case_insensitively() {
        let counties = sample();
        let names: Vec<_> = search_counties(&counties, "CALIF", SEARCH_LIMIT)
            .iter()
            .map(|c| c.fips.as_str())
            .collect();
        assert_eq!(names, ["06037", "06073"]);

        let names: Vec<_> = search_counties(&counties, "cook", SEARCH_LIMIT)
            .iter()
            .map(|c| c.fips.as_str())
            .collect();
        assert_eq!(names, ["17031"]);
    }

    #[test]
    fn respects_limit() {
        let counties = sample();
        assert_eq!(search_counties(&counties, "county", 2).len(), 2);
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(search_counties(&sample(), "   ", SEARCH_LIMIT).is_empty());
    }

    #[test]
    fn regions_are_sorted_and_unique() {
        assert_eq!(distinct_regions(&sample()), ["Midwest", "South", "West"]);
    }
}
