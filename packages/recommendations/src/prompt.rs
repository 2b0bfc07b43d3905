//! Prompt construction and response parsing.

use std::fmt::Write as _;

use county_health_county_models::CountyRecord;
use county_health_visual::format::group_thousands;

use crate::{Recommendation, RecommendationError};

pub const SYSTEM_PROMPT: &str =
    "You are a healthcare policy expert providing data-driven recommendations for US counties.";

/// Peers included in the prompt.
pub const PROMPT_PEER_LIMIT: usize = 3;

/// The user prompt for `county`, listing up to three `peers`.
#[must_use]
pub fn build_prompt(county: &CountyRecord, peers: &[&CountyRecord]) -> String {
    let mut prompt = String::from(
        "You are a healthcare policy analyst. Analyze this county's healthcare situation \
         and provide 3 specific, actionable recommendations.\n\n",
    );

    let _ = writeln!(prompt, "County: {}", county.display_name());
    if !county.region.is_empty() {
        let _ = writeln!(prompt, "Region: {}", county.region);
    }
    let _ = writeln!(prompt, "Population: {}", group_thousands(county.population));
    let _ = writeln!(
        prompt,
        "Healthcare Access Score: {:.1}/100",
        county.healthcare_access
    );
    let _ = writeln!(
        prompt,
        "Vulnerability Index: {:.1}/100",
        county.vulnerability_index
    );
    let _ = writeln!(prompt, "Opportunity Score: {:.1}/100", county.opportunity_score);
    let _ = writeln!(prompt, "Poverty Rate: {:.1}%", county.poverty_rate);
    let _ = writeln!(prompt, "Disability Rate: {:.1}%", county.disability_rate);
    let _ = writeln!(prompt, "Insurance Coverage: {:.1}%", county.insurance_rate);
    let _ = writeln!(
        prompt,
        "County Type: {}",
        county.cluster_name_detailed.as_deref().unwrap_or("Unknown")
    );

    prompt.push_str("\nTop Peer Counties (same cluster):\n");
    for peer in peers.iter().take(PROMPT_PEER_LIMIT) {
        let _ = writeln!(
            prompt,
            "- {}: {:.1} score, {} pop",
            peer.county,
            peer.healthcare_access,
            group_thousands(peer.population)
        );
    }

    prompt.push_str(
        r#"
Provide response as JSON array with 3 recommendations, each having:
{
  "priority": "High|Medium|Low",
  "category": "Infrastructure|Workforce|Access|Policy",
  "title": "Brief title",
  "description": "2-sentence problem description",
  "actions": ["action1", "action2", "action3"],
  "impact": "Expected outcome description",
  "cost": "Estimated cost range",
  "timeline": "Implementation timeframe"
}

Focus on specific, implementable solutions based on the county's actual needs and performance gaps."#,
    );
    prompt
}

/// Parses the JSON array in a model response.
///
/// Models often wrap the array in prose or a code fence, so the span from
/// the first `[` to the last `]` is parsed when present.
///
/// # Errors
///
/// Returns [`RecommendationError::MalformedResponse`] if no non-empty array
/// of recommendations can be parsed.
pub fn parse_recommendations(text: &str) -> Result<Vec<Recommendation>, RecommendationError> {
    let json = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };

    let items: Vec<Recommendation> =
        serde_json::from_str(json).map_err(|e| RecommendationError::MalformedResponse {
            message: e.to_string(),
        })?;

    if items.is_empty() {
        return Err(RecommendationError::MalformedResponse {
            message: "response contained no recommendations".to_string(),
        });
    }
    Ok(items)
}
