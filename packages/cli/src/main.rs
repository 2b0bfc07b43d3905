#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County health map CLI.
//!
//! Every subcommand loads the dataset, applies any filter flags through the
//! dashboard reducer, and prints a report. Running without a subcommand
//! opens the interactive menu.

mod interactive;
mod output;
mod session;

use std::{path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand};
use county_health_county_models::{StateSortKey, VisualMode};
use county_health_dataset::{
    Action,
    analysis::{
        STATES_PER_PAGE, cluster_comparison, insights, paginate, rank_states, similar_counties,
        top_cluster_peers,
    },
    view,
};
use county_health_filter::{SEARCH_LIMIT, search_counties};
use county_health_recommendations::{
    RecommendationProvider, cache_key, generate_recommendations, provider_from_env,
};
use county_health_scoring::{Lever, PolicyInputs, project_lever_change};

use crate::session::{FilterArgs, Session};

/// Peers passed to the recommendation prompt builder.
const RECOMMENDATION_PEER_LIMIT: usize = 5;

#[derive(Parser)]
#[command(
    name = "county_health",
    about = "Explore US county healthcare access, policy scores, and recommendations"
)]
struct Cli {
    /// Config file (defaults to $COUNTY_HEALTH_CONFIG, then ./county_health.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing the county data files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the counties that pass the filters
    Filter {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print map markers (position, color, radius, tooltip) as JSON
    Render {
        /// Visual mode: healthcare_access, opportunity, vulnerability, population, cluster
        #[arg(long, default_value = "healthcare_access", value_parser = parse_enum::<VisualMode>)]
        mode: VisualMode,

        /// County FIPS to highlight
        #[arg(long)]
        select: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Compute the policy score from lever values or a county's rates
    Score {
        /// Insurance coverage (%)
        #[arg(long, conflicts_with = "county")]
        insurance: Option<f64>,

        /// Poverty rate (%)
        #[arg(long, conflicts_with = "county")]
        poverty: Option<f64>,

        /// College education (%)
        #[arg(long, conflicts_with = "county")]
        education: Option<f64>,

        /// Median household income ($)
        #[arg(long, conflicts_with = "county")]
        income: Option<f64>,

        /// Use this county's real rates
        #[arg(long)]
        county: Option<String>,
    },

    /// Project the score after changing one of a county's rates
    Simulate {
        #[arg(long)]
        county: String,

        /// insurance, poverty, education, or income
        #[arg(long, value_parser = parse_enum::<Lever>)]
        lever: Lever,

        /// Percentage change, e.g. 10 or -25
        #[arg(long, allow_hyphen_values = true)]
        percent: f64,
    },

    /// Show similar counties and how a county compares to its cluster
    Peers {
        fips: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Rank states
    States {
        /// healthcare_access_mean, population_sum, opportunity_score_mean,
        /// vulnerability_index_mean, healthcare_rank, or inequality_score
        #[arg(long, default_value = "healthcare_access_mean", value_parser = parse_enum::<StateSortKey>)]
        sort_by: StateSortKey,

        #[arg(long)]
        ascending: bool,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// List the county clusters
    Clusters,

    /// Summary statistics for the filtered counties
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the legend for a visual mode
    Legend {
        #[arg(long, default_value = "healthcare_access", value_parser = parse_enum::<VisualMode>)]
        mode: VisualMode,
    },

    /// Find counties by county or state name
    Search { query: String },

    /// Show a county with its precomputed insights, projections, and policies
    Show { fips: String },

    /// Generate policy recommendations for a county
    Recommend {
        fips: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Ignore any cached recommendations
        #[arg(long)]
        refresh: bool,
    },
}

/// Parses a `snake_case` enum value for clap.
fn parse_enum<T: FromStr>(text: &str) -> Result<T, String> {
    T::from_str(text).map_err(|_| format!("unrecognized value '{text}'"))
}

fn exit_unknown_county(fips: &str) -> ! {
    eprintln!("County not found: {fips}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let mut session = Session::open(cli.config.as_deref(), cli.data_dir.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(session).await;
    };

    match command {
        Commands::Filter { filter, json } => {
            session.apply_filters(&filter);
            let counties = session.filtered();
            if json {
                println!("{}", serde_json::to_string_pretty(&counties)?);
            } else {
                output::print_county_table(&counties);
            }
        }
        Commands::Render {
            mode,
            select,
            filter,
        } => {
            session.apply_filters(&filter);
            session.dispatch(Action::SetMode(mode));
            if let Some(fips) = select
                && !session.select(&fips)
            {
                exit_unknown_county(&fips);
            }
            let markers = view::render(&session.dataset, &session.state);
            println!("{}", serde_json::to_string_pretty(&markers)?);
        }
        Commands::Score {
            insurance,
            poverty,
            education,
            income,
            county,
        } => {
            let inputs = if let Some(fips) = county {
                let Some(record) = session.county(&fips) else {
                    exit_unknown_county(&fips);
                };
                println!("{}\n", record.display_name());
                PolicyInputs::from_county(record)
            } else {
                let defaults = PolicyInputs::default();
                PolicyInputs {
                    insurance: insurance.unwrap_or(defaults.insurance),
                    poverty: poverty.unwrap_or(defaults.poverty),
                    education: education.unwrap_or(defaults.education),
                    income: income.unwrap_or(defaults.income),
                }
            };
            output::print_breakdown(&inputs.breakdown());
        }
        Commands::Simulate {
            county,
            lever,
            percent,
        } => {
            let Some(record) = session.county(&county) else {
                exit_unknown_county(&county);
            };
            let projection = project_lever_change(record, lever, percent);
            output::print_projection(record, &projection);
        }
        Commands::Peers { fips, filter } => {
            session.apply_filters(&filter);
            let Some(county) = session.county(&fips) else {
                exit_unknown_county(&fips);
            };
            let filtered = session.filtered();
            let similar = similar_counties(session.dataset.counties(), county);
            let comparison = cluster_comparison(&filtered, county);
            let found = insights(county, &comparison.peers);
            output::print_peers(county, &similar, &comparison, &found);
        }
        Commands::States {
            sort_by,
            ascending,
            page,
        } => {
            let ranked = rank_states(session.dataset.states(), sort_by, ascending);
            let page = paginate(&ranked, page.saturating_sub(1), STATES_PER_PAGE);
            output::print_states(&page);
        }
        Commands::Clusters => output::print_clusters(session.dataset.clusters()),
        Commands::Stats { filter } => {
            session.apply_filters(&filter);
            output::print_stats(&view::QuickStats::from_counties(&session.filtered()));
        }
        Commands::Legend { mode } => {
            session.dispatch(Action::SetMode(mode));
            println!("{}", mode.label());
            for entry in view::legend(&session.dataset, &session.state) {
                println!("  {:<10} {}", entry.color, entry.label);
            }
        }
        Commands::Search { query } => {
            let matches = search_counties(session.dataset.counties(), &query, SEARCH_LIMIT);
            output::print_county_table(&matches);
        }
        Commands::Show { fips } => {
            let Some(county) = session.county(&fips) else {
                exit_unknown_county(&fips);
            };
            output::print_county_detail(&session.dataset, county);
        }
        Commands::Recommend {
            fips,
            filter,
            refresh,
        } => {
            session.apply_filters(&filter);
            recommend(&session, &fips, refresh).await;
        }
    }

    Ok(())
}

/// Generates and prints recommendations for `fips` using the current filter.
async fn recommend(session: &Session, fips: &str, refresh: bool) {
    let Some(county) = session.county(fips) else {
        exit_unknown_county(fips);
    };

    let settings = &session.config.recommendations;
    let provider = provider_from_env(settings.base_url.as_deref(), settings.model.as_deref())
        .inspect_err(|e| log::info!("{e}"))
        .ok();

    let mut cache = session.recommendation_cache();
    if refresh && cache.remove(&cache_key(county, &session.state.filter)) {
        log::debug!("Dropped cached recommendations for {}", county.fips);
    }

    let filtered = session.filtered();
    let peers = top_cluster_peers(&filtered, county, RECOMMENDATION_PEER_LIMIT);
    let outcome = generate_recommendations(
        provider.as_ref().map(|p| p as &dyn RecommendationProvider),
        &mut cache,
        county,
        &peers,
        &session.state.filter,
    )
    .await;

    output::print_recommendations(county, &outcome);
}
