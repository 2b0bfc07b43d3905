//! Interactive dashboard session.
//!
//! Keeps one [`Session`] alive and lets the user change filters, select a
//! county, and open the same reports the subcommands print, all through
//! `dialoguer` menus.

use county_health_county_models::{StateSortKey, VisualMode};
use county_health_dataset::{
    Action, AnalysisMode,
    analysis::{
        STATES_PER_PAGE, cluster_comparison, insights, paginate, rank_states, similar_counties,
    },
    view,
};
use county_health_filter::{
    FilterDimension, NumericRange, QuickFilter, SEARCH_LIMIT, search_counties,
};
use county_health_scoring::{Lever, ScoreRating, project_lever_change};
use dialoguer::{Confirm, Input, Select};

use crate::{output, recommend, session::Session};

/// Percentage steps shown by the deep-dive lever table.
const DEEP_DIVE_STEPS: [f64; 4] = [-20.0, -10.0, 10.0, 20.0];

enum DashboardAction {
    Browse,
    SelectCounty,
    Analyze,
    Simulate,
    Filters,
    Mode,
    Legend,
    States,
    ClusterColor,
    Quit,
}

impl DashboardAction {
    const ALL: &[Self] = &[
        Self::Browse,
        Self::SelectCounty,
        Self::Analyze,
        Self::Simulate,
        Self::Filters,
        Self::Mode,
        Self::Legend,
        Self::States,
        Self::ClusterColor,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Browse => "Browse filtered counties",
            Self::SelectCounty => "Search and select a county",
            Self::Analyze => "Analyze selected county",
            Self::Simulate => "Policy simulator",
            Self::Filters => "Filters",
            Self::Mode => "Change visual mode",
            Self::Legend => "Show legend",
            Self::States => "State rankings",
            Self::ClusterColor => "Set a cluster color",
            Self::Quit => "Quit",
        }
    }
}

enum FilterAction {
    Quick,
    Region,
    Range,
    ClearRange,
    Cluster,
    Reset,
}

impl FilterAction {
    const ALL: &[Self] = &[
        Self::Quick,
        Self::Region,
        Self::Range,
        Self::ClearRange,
        Self::Cluster,
        Self::Reset,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Quick => "Apply a quick filter",
            Self::Region => "Set region",
            Self::Range => "Set a range",
            Self::ClearRange => "Clear a range",
            Self::Cluster => "Show or hide a cluster",
            Self::Reset => "Reset all filters",
        }
    }
}

/// Runs the interactive dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g. the terminal is closed).
pub async fn run(mut session: Session) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = DashboardAction::ALL
        .iter()
        .map(DashboardAction::label)
        .collect();

    loop {
        print_status(&session);

        let idx = Select::new()
            .with_prompt("County health dashboard")
            .items(&labels)
            .default(0)
            .interact()?;

        match DashboardAction::ALL[idx] {
            DashboardAction::Browse => output::print_county_table(&session.filtered()),
            DashboardAction::SelectCounty => handle_select(&mut session)?,
            DashboardAction::Analyze => handle_analyze(&mut session).await?,
            DashboardAction::Simulate => handle_simulate(&mut session)?,
            DashboardAction::Filters => handle_filters(&mut session)?,
            DashboardAction::Mode => handle_mode(&mut session)?,
            DashboardAction::Legend => handle_legend(&session),
            DashboardAction::States => handle_states(&session)?,
            DashboardAction::ClusterColor => handle_cluster_color(&mut session)?,
            DashboardAction::Quit => break,
        }
        println!();
    }

    Ok(())
}

fn print_status(session: &Session) {
    let stats = view::QuickStats::from_counties(&session.filtered());
    let selected = view::selected_county(&session.dataset, &session.state)
        .map_or_else(|| "none".to_string(), |c| c.display_name());
    println!(
        "{} counties | avg access {:.1} | {} filter(s) | mode: {} | selected: {selected}",
        stats.county_count,
        stats.average_healthcare_access,
        session.state.filter.active_predicate_count(),
        session.state.mode.label(),
    );
}

fn pick<T>(
    prompt: &str,
    items: &[T],
    label: impl Fn(&T) -> String,
) -> Result<usize, dialoguer::Error> {
    let labels: Vec<String> = items.iter().map(label).collect();
    Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Searches by name and selects one of the matches, or clears the selection
/// when the query is empty.
fn handle_select(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let query: String = Input::new()
        .with_prompt("County or state name (empty to clear selection)")
        .allow_empty(true)
        .interact_text()?;

    if query.trim().is_empty() {
        session.dispatch(Action::SelectCounty(None));
        println!("Selection cleared.");
        return Ok(());
    }

    let matches = search_counties(session.dataset.counties(), &query, SEARCH_LIMIT);
    if matches.is_empty() {
        println!("No counties match \"{query}\".");
        return Ok(());
    }

    let idx = pick("Select a county", &matches, |c| {
        format!("{} ({})", c.display_name(), c.fips)
    })?;
    let fips = matches[idx].fips.clone();
    session.select(&fips);
    Ok(())
}

async fn handle_analyze(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let Some(fips) = session.state.selected_fips.clone() else {
        println!("Select a county first.");
        return Ok(());
    };

    let modes = AnalysisMode::all();
    let default = modes
        .iter()
        .position(|m| *m == session.state.analysis_mode)
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Analysis")
        .items(&modes.iter().map(|m| m.label()).collect::<Vec<_>>())
        .default(default)
        .interact()?;
    session.dispatch(Action::SetAnalysisMode(modes[idx]));

    let Some(county) = session.county(&fips) else {
        return Ok(());
    };

    match session.state.analysis_mode {
        AnalysisMode::Overview | AnalysisMode::Projections => {
            output::print_county_detail(&session.dataset, county);
        }
        AnalysisMode::Comparison => {
            let filtered = session.filtered();
            let similar = similar_counties(session.dataset.counties(), county);
            let comparison = cluster_comparison(&filtered, county);
            let found = insights(county, &comparison.peers);
            output::print_peers(county, &similar, &comparison, &found);
        }
        AnalysisMode::Recommendations => {
            let refresh = Confirm::new()
                .with_prompt("Ignore cached recommendations?")
                .default(false)
                .interact()?;
            recommend(session, &fips, refresh).await;
        }
        AnalysisMode::DeepDive => {
            for &lever in Lever::all() {
                println!("{}", lever.label());
                for percent in DEEP_DIVE_STEPS {
                    let projection = project_lever_change(county, lever, percent);
                    println!(
                        "  {percent:+5.0}%  {:>10.1} -> score {:.1} ({:+.1})",
                        projection.projected_value,
                        projection.projected_score,
                        projection.score_change()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Moves policy levers for the selected county (or the default baseline)
/// and reports the score against the baseline.
fn handle_simulate(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let mut labels: Vec<&str> = Lever::all().iter().map(|l| l.label()).collect();
    labels.push("Reset levers");
    labels.push("Done");

    loop {
        let sim = session.state.simulation;
        let inputs = sim.inputs();
        println!(
            "Insurance {:.1}% | Poverty {:.1}% | Education {:.1}% | Income ${:.0}",
            inputs.insurance, inputs.poverty, inputs.education, inputs.income
        );
        println!(
            "Score {:.1} ({}) | baseline {:.1} | change {:+.1}",
            sim.score(),
            ScoreRating::from_score(sim.score()).label(),
            sim.baseline_score(),
            sim.delta()
        );

        let idx = Select::new()
            .with_prompt("Adjust")
            .items(&labels)
            .default(0)
            .interact()?;

        let Some(&lever) = Lever::all().get(idx) else {
            if idx == Lever::all().len() {
                session.dispatch(Action::ResetSimulation);
                continue;
            }
            return Ok(());
        };

        let (lo, hi) = lever.range();
        let value: f64 = Input::new()
            .with_prompt(format!("{} ({lo}-{hi})", lever.label()))
            .default(inputs.get(lever))
            .interact_text()?;
        session.dispatch(Action::SetLever { lever, value });
    }
}

fn handle_filters(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let idx = pick("Filters", FilterAction::ALL, |a| a.label().to_string())?;

    match FilterAction::ALL[idx] {
        FilterAction::Quick => {
            let presets = QuickFilter::all();
            let idx = pick("Quick filter", presets, |q| q.label().to_string())?;
            session.dispatch(Action::ApplyQuickFilter(presets[idx]));
        }
        FilterAction::Region => {
            let mut regions = vec!["All regions".to_string()];
            regions.extend(session.dataset.regions());
            let idx = pick("Region", &regions, Clone::clone)?;
            let region = (idx > 0).then(|| regions[idx].clone());
            session.dispatch(Action::SetRegion(region));
        }
        FilterAction::Range => {
            let dimensions = FilterDimension::all();
            let idx = pick("Dimension", dimensions, |d| d.label().to_string())?;
            let dimension = dimensions[idx];
            let bounds = session
                .state
                .filter
                .range(dimension)
                .unwrap_or_else(|| dimension.slider_bounds());
            let min: f64 = Input::new()
                .with_prompt("Minimum")
                .default(bounds.min)
                .interact_text()?;
            let max: f64 = Input::new()
                .with_prompt("Maximum")
                .default(bounds.max)
                .interact_text()?;
            session.dispatch(Action::SetRange {
                dimension,
                range: NumericRange::new(min, max),
            });
        }
        FilterAction::ClearRange => {
            let active: Vec<FilterDimension> =
                session.state.filter.ranges().map(|(d, _)| d).collect();
            if active.is_empty() {
                println!("No ranges are set.");
                return Ok(());
            }
            let idx = pick("Clear", &active, |d| d.label().to_string())?;
            session.dispatch(Action::ClearRange(active[idx]));
        }
        FilterAction::Cluster => {
            let clusters = session.dataset.clusters().to_vec();
            let idx = pick("Cluster", &clusters, |c| {
                let shown = if session.state.filter.cluster_visible(c.id) {
                    "shown"
                } else {
                    "hidden"
                };
                format!("{} - {} ({shown})", c.id, c.name)
            })?;
            let id = clusters[idx].id;
            let checked = !session.state.filter.cluster_visible(id)
                || session.state.filter.clusters().is_empty();
            session.dispatch(Action::ToggleCluster { id, checked });
        }
        FilterAction::Reset => session.dispatch(Action::ResetFilters),
    }

    Ok(())
}

fn handle_mode(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let modes = VisualMode::all();
    let idx = pick("Visual mode", modes, |m| {
        format!("{} - {}", m.label(), m.description())
    })?;
    session.dispatch(Action::SetMode(modes[idx]));
    Ok(())
}

fn handle_legend(session: &Session) {
    println!("{}", session.state.mode.label());
    for entry in view::legend(&session.dataset, &session.state) {
        println!("  {:<10} {}", entry.color, entry.label);
    }
}

fn handle_states(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let keys = StateSortKey::all();
    let idx = pick("Sort by", keys, |k| k.label().to_string())?;
    let ascending = Confirm::new()
        .with_prompt("Ascending?")
        .default(false)
        .interact()?;
    let ranked = rank_states(session.dataset.states(), keys[idx], ascending);

    let mut page = 0;
    loop {
        let shown = paginate(&ranked, page, STATES_PER_PAGE);
        output::print_states(&shown);
        if shown.page + 1 >= shown.page_count
            || !Confirm::new()
                .with_prompt("Next page?")
                .default(true)
                .interact()?
        {
            break;
        }
        page = shown.page + 1;
    }

    Ok(())
}

fn handle_cluster_color(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let clusters = session.dataset.clusters().to_vec();
    let idx = pick("Cluster", &clusters, |c| {
        format!("{} - {} ({})", c.id, c.name, session.state.palette.color(c.id))
    })?;
    let color: String = Input::new()
        .with_prompt("Hex color")
        .default(session.state.palette.color(clusters[idx].id).to_string())
        .interact_text()?;
    session.dispatch(Action::SetClusterColor {
        id: clusters[idx].id,
        color,
    });
    Ok(())
}
