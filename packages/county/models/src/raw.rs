//! Lenient on-disk form of a county row and its one-time normalization.

use serde::{Deserialize, Deserializer, de::IgnoredAny};

use crate::{
    CountyRecord, DEFAULT_CLUSTER, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_POPULATION,
    DEFAULT_SCORE, fips,
};

/// A county row exactly as it appears in the dataset JSON.
///
/// Every field is optional. Conversion into [`CountyRecord`] applies the
/// documented defaults so nothing downstream ever sees an absent value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCountyRecord {
    #[serde(rename = "FIPS", default, deserialize_with = "deserialize_fips")]
    pub fips: Option<String>,
    #[serde(rename = "County", default)]
    pub county: Option<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "Region", default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub longitude: Option<f64>,
    #[serde(rename = "Population", default, deserialize_with = "deserialize_number")]
    pub population: Option<f64>,
    #[serde(rename = "Healthcare_Access", default, deserialize_with = "deserialize_number")]
    pub healthcare_access: Option<f64>,
    #[serde(rename = "Opportunity_Score", default, deserialize_with = "deserialize_number")]
    pub opportunity_score: Option<f64>,
    #[serde(rename = "Vulnerability_Index", default, deserialize_with = "deserialize_number")]
    pub vulnerability_index: Option<f64>,
    #[serde(rename = "Resilience_Score", default, deserialize_with = "deserialize_number")]
    pub resilience_score: Option<f64>,
    #[serde(rename = "Healthcare_Access_Percentile", default, deserialize_with = "deserialize_number")]
    pub healthcare_access_percentile: Option<f64>,
    #[serde(rename = "Insurance_Rate_Percentile", default, deserialize_with = "deserialize_number")]
    pub insurance_rate_percentile: Option<f64>,
    #[serde(rename = "Education_Rate_Percentile", default, deserialize_with = "deserialize_number")]
    pub education_rate_percentile: Option<f64>,
    #[serde(rename = "Insurance_Rate", default, deserialize_with = "deserialize_number")]
    pub insurance_rate: Option<f64>,
    #[serde(rename = "Poverty_Rate", default, deserialize_with = "deserialize_number")]
    pub poverty_rate: Option<f64>,
    #[serde(rename = "Education_Rate", default, deserialize_with = "deserialize_number")]
    pub education_rate: Option<f64>,
    #[serde(rename = "Disability_Rate", default, deserialize_with = "deserialize_number")]
    pub disability_rate: Option<f64>,
    #[serde(rename = "No_Vehicle_Rate", default, deserialize_with = "deserialize_number")]
    pub no_vehicle_rate: Option<f64>,
    #[serde(rename = "LEP_Rate", default, deserialize_with = "deserialize_number")]
    pub lep_rate: Option<f64>,
    #[serde(rename = "Median_Income", default, deserialize_with = "deserialize_number")]
    pub median_income: Option<f64>,
    #[serde(rename = "Broadband_Rate", default, deserialize_with = "deserialize_number")]
    pub broadband_rate: Option<f64>,
    #[serde(rename = "Cluster_7", default, deserialize_with = "deserialize_number")]
    pub cluster_7: Option<f64>,
    #[serde(rename = "Cluster_Name_Detailed", default)]
    pub cluster_name_detailed: Option<String>,
    #[serde(rename = "Cluster_Description", default)]
    pub cluster_description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub rank_in_cluster: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub total_in_cluster: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub performance_vs_cluster: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub cluster_avg_score: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FipsValue {
    Text(String),
    Integer(u64),
    Float(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberValue {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Accepts numbers, numeric strings like `"42.5"`, and anything else as
/// missing, so one `"N/A"` cell does not reject the whole row.
fn deserialize_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        NumberValue::Number(n) => Some(n),
        NumberValue::Text(s) => s.trim().parse().ok(),
        NumberValue::Other(_) => None,
    }))
}

/// Accepts FIPS codes written either as strings or as bare numbers.
///
/// Numeric codes are zero-padded to five digits since spreadsheet exports
/// routinely strip the leading zero from codes like `01001`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn deserialize_fips<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<FipsValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        FipsValue::Text(s) => {
            let code = fips::normalize_county_fips(&s);
            (!code.is_empty()).then_some(code)
        }
        FipsValue::Integer(n) => Some(format!("{n:05}")),
        FipsValue::Float(f) if f.is_finite() && f >= 0.0 => {
            Some(format!("{:05}", f.round() as u64))
        }
        FipsValue::Float(_) => None,
    }))
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn score_or_default(value: Option<f64>) -> f64 {
    finite(value).map_or(DEFAULT_SCORE, |v| v.max(0.0))
}

fn rate_or_zero(value: Option<f64>) -> f64 {
    finite(value).map_or(0.0, |v| v.max(0.0))
}

fn optional_non_negative(value: Option<f64>) -> Option<f64> {
    finite(value).map(|v| v.max(0.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn population_or_default(value: Option<f64>) -> u64 {
    finite(value)
        .map(f64::round)
        .filter(|p| *p >= 1.0)
        .map_or(DEFAULT_POPULATION, |p| p as u64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cluster_or_default(value: Option<f64>) -> u8 {
    finite(value)
        .map(f64::round)
        .filter(|c| (0.0..=f64::from(u8::MAX)).contains(c))
        .map_or(DEFAULT_CLUSTER, |c| c as u8)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn optional_count(value: Option<f64>) -> Option<u32> {
    finite(value)
        .map(f64::round)
        .filter(|c| (0.0..=f64::from(u32::MAX)).contains(c))
        .map(|c| c as u32)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<RawCountyRecord> for CountyRecord {
    fn from(raw: RawCountyRecord) -> Self {
        let fips = raw.fips.unwrap_or_default();
        let state = non_empty(raw.state)
            .or_else(|| fips::state_for_county_fips(&fips).map(|s| s.name.to_string()))
            .unwrap_or_default();

        Self {
            county: raw.county.unwrap_or_default(),
            state,
            region: raw.region.unwrap_or_default(),
            lat: finite(raw.lat)
                .or_else(|| finite(raw.latitude))
                .unwrap_or(DEFAULT_LATITUDE),
            lng: finite(raw.lng)
                .or_else(|| finite(raw.longitude))
                .unwrap_or(DEFAULT_LONGITUDE),
            population: population_or_default(raw.population),
            healthcare_access: score_or_default(raw.healthcare_access),
            opportunity_score: score_or_default(raw.opportunity_score),
            vulnerability_index: score_or_default(raw.vulnerability_index),
            resilience_score: score_or_default(raw.resilience_score),
            healthcare_access_percentile: optional_non_negative(raw.healthcare_access_percentile),
            insurance_rate_percentile: optional_non_negative(raw.insurance_rate_percentile),
            education_rate_percentile: optional_non_negative(raw.education_rate_percentile),
            insurance_rate: rate_or_zero(raw.insurance_rate),
            poverty_rate: rate_or_zero(raw.poverty_rate),
            education_rate: rate_or_zero(raw.education_rate),
            disability_rate: rate_or_zero(raw.disability_rate),
            no_vehicle_rate: rate_or_zero(raw.no_vehicle_rate),
            lep_rate: rate_or_zero(raw.lep_rate),
            median_income: rate_or_zero(raw.median_income),
            broadband_rate: rate_or_zero(raw.broadband_rate),
            cluster_7: cluster_or_default(raw.cluster_7),
            cluster_name_detailed: non_empty(raw.cluster_name_detailed),
            cluster_description: non_empty(raw.cluster_description),
            rank_in_cluster: optional_count(raw.rank_in_cluster),
            total_in_cluster: optional_count(raw.total_in_cluster),
            performance_vs_cluster: finite(raw.performance_vs_cluster),
            cluster_avg_score: optional_non_negative(raw.cluster_avg_score),
            fips,
        }
    }
}
