//! Rule-based recommendations used when the provider is unavailable.

use county_health_county_models::{CountyRecord, Priority};

use crate::Recommendation;

pub const FALLBACK_LIMIT: usize = 3;

#[allow(clippy::too_many_arguments)]
fn recommendation(
    priority: Priority,
    category: &str,
    title: &str,
    description: String,
    actions: [&str; 3],
    impact: &str,
    cost: &str,
    timeline: &str,
) -> Recommendation {
    Recommendation {
        priority,
        category: category.to_string(),
        title: title.to_string(),
        description,
        actions: actions.iter().map(ToString::to_string).collect(),
        impact: impact.to_string(),
        cost: cost.to_string(),
        timeline: timeline.to_string(),
    }
}

/// Up to three recommendations derived from the county's scores: low
/// access (< 50), high vulnerability (> 60), and improvement opportunity
/// (> 50), in that order.
#[must_use]
pub fn fallback_recommendations(county: &CountyRecord) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if county.healthcare_access < 50.0 {
        out.push(recommendation(
            Priority::High,
            "Access",
            "Improve Healthcare Access",
            format!(
                "{} has a healthcare access score of {:.1}, indicating significant access barriers. \
                 Immediate intervention is needed to address healthcare gaps.",
                county.county, county.healthcare_access
            ),
            [
                "Establish mobile health clinics",
                "Expand telehealth services",
                "Improve transportation to medical facilities",
            ],
            "Could improve access for thousands of residents",
            "$2-5M annually",
            "12-18 months",
        ));
    }

    if county.vulnerability_index > 60.0 {
        out.push(recommendation(
            Priority::High,
            "Policy",
            "Address Social Determinants",
            format!(
                "High vulnerability index of {:.1} indicates social barriers to health. \
                 Comprehensive approach needed to address underlying issues.",
                county.vulnerability_index
            ),
            [
                "Expand community health worker programs",
                "Improve health insurance enrollment",
                "Address transportation barriers",
            ],
            "Reduce health disparities and improve outcomes",
            "$1-3M annually",
            "6-12 months",
        ));
    }

    if county.opportunity_score > 50.0 {
        out.push(recommendation(
            Priority::Medium,
            "Infrastructure",
            "Leverage Improvement Opportunity",
            format!(
                "Opportunity score of {:.1} suggests high potential for meaningful improvements. \
                 Strategic investments could yield significant returns.",
                county.opportunity_score
            ),
            [
                "Target specific improvement areas",
                "Implement evidence-based interventions",
                "Monitor progress with data-driven approaches",
            ],
            "Maximize return on healthcare investments",
            "$500K-2M",
            "3-6 months",
        ));
    }

    out.truncate(FALLBACK_LIMIT);
    out
}
