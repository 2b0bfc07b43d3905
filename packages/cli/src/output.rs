//! Plain-text tables and reports.

use county_health_county_models::{ClusterDefinition, CountyRecord, StateSummary};
use county_health_dataset::{
    Dataset,
    analysis::{ClusterComparison, Insight, Page},
    view::QuickStats,
};
use county_health_recommendations::{Recommendation, RecommendationOutcome};
use county_health_scoring::{LeverProjection, PercentileBand, ScoreBreakdown, ScoreRating};
use county_health_visual::format::{format_compact, format_currency, group_thousands};

fn rule() {
    println!("{}", "-".repeat(100));
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

pub fn print_county_table(counties: &[&CountyRecord]) {
    println!(
        "{:<7} {:<32} {:<16} {:<12} {:>12} {:>8} {:>8}",
        "FIPS", "County", "State", "Region", "Population", "Access", "Cluster"
    );
    rule();
    for county in counties {
        println!(
            "{:<7} {:<32} {:<16} {:<12} {:>12} {:>8.1} {:>8}",
            county.fips,
            county.county,
            county.state,
            county.region,
            group_thousands(county.population),
            county.healthcare_access,
            county.cluster_7,
        );
    }
    println!("\n{} counties", counties.len());
}

pub fn print_breakdown(breakdown: &ScoreBreakdown) {
    let total = breakdown.total();
    println!("{:<20} {:>8.2}", "Insurance", breakdown.insurance);
    println!("{:<20} {:>8.2}", "Poverty", breakdown.poverty);
    println!("{:<20} {:>8.2}", "Education", breakdown.education);
    println!("{:<20} {:>8.2}", "Income", breakdown.income);
    println!("{:<20} {:>8.2}", "Baseline", breakdown.baseline);
    println!("{}", "-".repeat(29));
    println!(
        "{:<20} {:>8.2}  ({})",
        "Score",
        total,
        ScoreRating::from_score(total).label()
    );
}

pub fn print_projection(county: &CountyRecord, projection: &LeverProjection) {
    println!("{} - {}", county.display_name(), projection.lever.label());
    println!(
        "  Value: {:.1} -> {:.1} ({:+.0}%)",
        projection.current_value, projection.projected_value, projection.percent_change
    );
    println!(
        "  Score: {:.1} -> {:.1} ({:+.1})",
        projection.current_score,
        projection.projected_score,
        projection.score_change()
    );
}

pub fn print_county_detail(dataset: &Dataset, county: &CountyRecord) {
    println!("{} ({})", county.display_name(), county.fips);
    rule();
    println!("Region:              {}", county.region);
    println!("Population:          {}", group_thousands(county.population));
    println!(
        "Healthcare Access:   {:.1}{}",
        county.healthcare_access,
        county
            .healthcare_access_percentile
            .map_or_else(String::new, |p| format!(
                " ({p:.0}th percentile, {})",
                PercentileBand::from_percentile(p).label()
            ))
    );
    println!("Opportunity Score:   {:.1}", county.opportunity_score);
    println!("Vulnerability Index: {:.1}", county.vulnerability_index);
    println!("Median Income:       {}", format_currency(county.median_income));
    println!(
        "Cluster:             {} {}",
        county.cluster_7,
        county.cluster_name_detailed.as_deref().unwrap_or_default()
    );
    if let (Some(rank), Some(total)) = (county.rank_in_cluster, county.total_in_cluster) {
        println!("Rank in cluster:     {rank} of {total}");
    }

    let insights = dataset.insights_for(&county.fips);
    if !insights.is_empty() {
        println!("\nInsights:");
        for insight in insights {
            match insight.importance {
                Some(priority) => println!("  [{priority}] {}", insight.text),
                None => println!("  {}", insight.text),
            }
        }
    }

    if let Some(projection) = dataset.projection_for(&county.fips) {
        println!("\nProjections:");
        for summary in projection.summaries() {
            println!(
                "  {:<24} {:>6.1} ({:+.1})",
                summary.scenario.label(),
                summary.final_score,
                summary.change
            );
        }
    }

    let policies = dataset.policy_recommendations_for(&county.fips);
    if !policies.is_empty() {
        println!("\nPolicy recommendations:");
        for policy in policies {
            println!(
                "  [{}] {} - impact {:.1}, {} per year",
                policy.priority,
                policy.policy,
                policy.impact_score,
                format_currency(policy.annual_cost)
            );
            if !policy.rationale.is_empty() {
                println!("      {}", policy.rationale);
            }
        }
    }
}

pub fn print_peers(
    county: &CountyRecord,
    similar: &[&CountyRecord],
    comparison: &ClusterComparison<'_>,
    insights: &[Insight],
) {
    println!("Similar counties to {}:", county.display_name());
    if similar.is_empty() {
        println!("  (none within 50% of its population)");
    }
    for peer in similar {
        println!(
            "  {:<7} {:<40} {:>8.1} {:>10}",
            peer.fips,
            peer.display_name(),
            peer.healthcare_access,
            format_compact(peer.population_f64(), 1)
        );
    }

    println!("\nTop cluster peers in the current filter:");
    for peer in &comparison.peers {
        println!(
            "  {:<7} {:<40} {:>8.1}",
            peer.fips,
            peer.display_name(),
            peer.healthcare_access
        );
    }
    println!("  Peer average: {}", optional(comparison.peer_average));
    println!(
        "  {:.0}% of these peers score below {}",
        comparison.share_below, county.county
    );

    if !insights.is_empty() {
        println!("\nInsights:");
        for insight in insights {
            println!("  [{}] {}", insight.priority, insight.message);
        }
    }
}

pub fn print_states(page: &Page<'_, &StateSummary>) {
    println!(
        "{:<22} {:>8} {:>14} {:>12} {:>14} {:>6} {:>11}",
        "State", "Access", "Population", "Opportunity", "Vulnerability", "Rank", "Inequality"
    );
    rule();
    for state in page.items {
        println!(
            "{:<22} {:>8} {:>14} {:>12} {:>14} {:>6} {:>11}",
            state.state,
            optional(state.healthcare_access_mean),
            state
                .population_sum
                .map_or_else(|| "-".to_string(), |p| format_compact(p, 1)),
            optional(state.opportunity_score_mean),
            optional(state.vulnerability_index_mean),
            state
                .healthcare_rank
                .map_or_else(|| "-".to_string(), |r| format!("{r:.0}")),
            optional(state.inequality_score),
        );
    }
    println!(
        "\nPage {} of {} ({} states)",
        page.page + 1,
        page.page_count,
        page.total
    );
}

pub fn print_clusters(clusters: &[ClusterDefinition]) {
    println!("{:<4} {:<32} {:>8}  Description", "ID", "Name", "Counties");
    rule();
    for cluster in clusters {
        println!(
            "{:<4} {:<32} {:>8}  {}",
            cluster.id, cluster.name, cluster.county_count, cluster.description
        );
    }
}

pub fn print_stats(stats: &QuickStats) {
    println!("Counties:                  {}", stats.county_count);
    println!(
        "Average healthcare access: {:.1}",
        stats.average_healthcare_access
    );
    println!(
        "Total population:          {}",
        group_thousands(stats.total_population)
    );
}

fn print_recommendation(index: usize, rec: &Recommendation) {
    println!("{}. [{}] {} ({})", index + 1, rec.priority, rec.title, rec.category);
    if !rec.description.is_empty() {
        println!("   {}", rec.description);
    }
    for action in &rec.actions {
        println!("   - {action}");
    }
    if !rec.impact.is_empty() {
        println!("   Impact:   {}", rec.impact);
    }
    if !rec.cost.is_empty() {
        println!("   Cost:     {}", rec.cost);
    }
    if !rec.timeline.is_empty() {
        println!("   Timeline: {}", rec.timeline);
    }
}

pub fn print_recommendations(county: &CountyRecord, outcome: &RecommendationOutcome) {
    println!("Recommendations for {}", county.display_name());
    rule();
    match outcome {
        RecommendationOutcome::Recommendations { cached: true, .. } => {
            println!("(cached)\n");
        }
        RecommendationOutcome::Recommendations { cached: false, .. } => {}
        RecommendationOutcome::Unavailable { error, .. } => {
            println!("{error}");
            println!("Showing rule-based recommendations instead.\n");
        }
    }
    for (i, rec) in outcome.items().iter().enumerate() {
        print_recommendation(i, rec);
    }
    if outcome.items().is_empty() {
        println!("No recommendations for this county.");
    }
}
