//! Session UI state and the reducer that advances it.

use county_health_color::Rgb;
use county_health_county_models::VisualMode;
use county_health_filter::{FilterDimension, FilterSpec, NumericRange, QuickFilter};
use county_health_scoring::{Lever, PolicySimulation};
use county_health_visual::ClusterPalette;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::Dataset;

/// Which analysis panel is showing for the selected county.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum AnalysisMode {
    #[default]
    Overview,
    Comparison,
    Recommendations,
    Projections,
    DeepDive,
}

impl AnalysisMode {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Overview,
            Self::Comparison,
            Self::Recommendations,
            Self::Projections,
            Self::DeepDive,
        ]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Comparison => "Peer Comparison",
            Self::Recommendations => "AI Recommendations",
            Self::Projections => "Future Scenarios",
            Self::DeepDive => "Deep Dive",
        }
    }
}

/// Everything the user can change during a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub filter: FilterSpec,
    pub mode: VisualMode,
    pub selected_fips: Option<String>,
    pub selected_state: Option<String>,
    pub simulation: PolicySimulation,
    pub analysis_mode: AnalysisMode,
    pub show_state_comparison: bool,
    pub palette: ClusterPalette,
}

/// A single user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetMode(VisualMode),
    /// Selecting a county also selects its state and rebases the policy
    /// simulation on its rates. `None` clears the selection.
    SelectCounty(Option<String>),
    SelectState(Option<String>),
    SetRegion(Option<String>),
    SetRange {
        dimension: FilterDimension,
        range: NumericRange,
    },
    ClearRange(FilterDimension),
    ToggleCluster {
        id: u8,
        checked: bool,
    },
    ApplyQuickFilter(QuickFilter),
    ResetFilters,
    SetLever {
        lever: Lever,
        value: f64,
    },
    ResetSimulation,
    SetAnalysisMode(AnalysisMode),
    ToggleStateComparison,
    SetClusterColor {
        id: u8,
        color: String,
    },
}

impl DashboardState {
    /// Starts a session with `palette` (typically from the config file) and
    /// everything else at its default.
    #[must_use]
    pub fn with_palette(palette: ClusterPalette) -> Self {
        Self {
            palette,
            ..Self::default()
        }
    }

    /// Returns the state that results from applying `action`.
    ///
    /// Invalid actions (an unknown FIPS, an unparseable color) are logged
    /// and leave the state unchanged.
    #[must_use]
    pub fn reduce(&self, action: Action, dataset: &Dataset) -> Self {
        let mut next = self.clone();

        match action {
            Action::SetMode(mode) => next.mode = mode,
            Action::SelectCounty(None) => {
                next.selected_fips = None;
                next.simulation = PolicySimulation::default();
            }
            Action::SelectCounty(Some(fips)) => {
                let Some(county) = dataset.county(&fips) else {
                    log::warn!("Ignoring selection of unknown county {fips}");
                    return next;
                };
                next.selected_state = Some(county.state.clone());
                next.simulation = PolicySimulation::from_county(county);
                next.selected_fips = Some(fips);
            }
            Action::SelectState(state) => next.selected_state = state,
            Action::SetRegion(region) => next.filter = next.filter.with_region(region),
            Action::SetRange { dimension, range } => {
                next.filter = next.filter.with_range(dimension, range);
            }
            Action::ClearRange(dimension) => next.filter = next.filter.without_range(dimension),
            Action::ToggleCluster { id, checked } => {
                next.filter = next
                    .filter
                    .toggle_cluster(id, checked, &dataset.cluster_ids());
            }
            Action::ApplyQuickFilter(quick) => next.filter = quick.spec(),
            Action::ResetFilters => next.filter = FilterSpec::default(),
            Action::SetLever { lever, value } => {
                next.simulation = next.simulation.with_lever(lever, value);
            }
            Action::ResetSimulation => next.simulation = next.simulation.reset(),
            Action::SetAnalysisMode(mode) => next.analysis_mode = mode,
            Action::ToggleStateComparison => {
                next.show_state_comparison = !next.show_state_comparison;
            }
            Action::SetClusterColor { id, color } => match Rgb::from_hex(&color) {
                Ok(_) => next.palette.set(id, color),
                Err(e) => log::warn!("Ignoring color for cluster {id}: {e}"),
            },
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use county_health_county_models::CountyRecord;
    use county_health_scoring::PolicyInputs;

    use super::*;

    fn dataset() -> Dataset {
        let mut a = CountyRecord::with_fips("01001");
        a.insurance_rate = 88.4;
        a.poverty_rate = 12.6;
        a.education_rate = 27.2;
        a.median_income = 57_982.0;
        a.cluster_7 = 0;
        let mut b = CountyRecord::with_fips("06037");
        b.cluster_7 = 1;
        let mut c = CountyRecord::with_fips("48201");
        c.cluster_7 = 2;
        Dataset::from_counties(vec![a, b, c])
    }

    #[test]
    fn selecting_a_county_seeds_state_and_simulation() {
        let dataset = dataset();
        let state = DashboardState::default()
            .reduce(Action::SelectCounty(Some("01001".to_string())), &dataset);

        assert_eq!(state.selected_fips.as_deref(), Some("01001"));
        assert_eq!(state.selected_state.as_deref(), Some("Alabama"));
        let baseline = state.simulation.baseline();
        assert!((baseline.get(Lever::Insurance) - 88.0).abs() < f64::EPSILON);
        assert!((baseline.get(Lever::Income) - 57_982.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_county_is_ignored() {
        let dataset = dataset();
        let state = DashboardState::default();
        let next = state.reduce(Action::SelectCounty(Some("99999".to_string())), &dataset);
        assert_eq!(next, state);
    }

    #[test]
    fn lever_then_reset_restores_baseline() {
        let dataset = dataset();
        let state = DashboardState::default()
            .reduce(Action::SelectCounty(Some("01001".to_string())), &dataset)
            .reduce(
                Action::SetLever {
                    lever: Lever::Insurance,
                    value: 99.0,
                },
                &dataset,
            );
        assert!(state.simulation.is_modified());

        let reset = state.reduce(Action::ResetSimulation, &dataset);
        assert!(!reset.simulation.is_modified());
        assert_eq!(reset.simulation.inputs(), reset.simulation.baseline());
    }

    #[test]
    fn clearing_selection_restores_default_simulation() {
        let dataset = dataset();
        let state = DashboardState::default()
            .reduce(Action::SelectCounty(Some("01001".to_string())), &dataset)
            .reduce(Action::SelectCounty(None), &dataset);
        assert_eq!(state.selected_fips, None);
        assert_eq!(*state.simulation.baseline(), PolicyInputs::default());
        assert_eq!(state.selected_state.as_deref(), Some("Alabama"));
    }

    #[test]
    fn cluster_toggles_use_dataset_clusters() {
        let dataset = dataset();
        let state = DashboardState::default().reduce(
            Action::ToggleCluster {
                id: 1,
                checked: false,
            },
            &dataset,
        );
        assert_eq!(state.filter.clusters().iter().copied().collect::<Vec<_>>(), vec![0, 2]);

        let state = state.reduce(
            Action::ToggleCluster {
                id: 1,
                checked: true,
            },
            &dataset,
        );
        assert!(state.filter.clusters().is_empty(), "full selection collapses");
    }

    #[test]
    fn quick_filter_replaces_existing_filters() {
        let dataset = dataset();
        let state = DashboardState::default()
            .reduce(Action::SetRegion(Some("South".to_string())), &dataset)
            .reduce(Action::ApplyQuickFilter(QuickFilter::LowAccess), &dataset);
        assert_eq!(state.filter, QuickFilter::LowAccess.spec());
        assert_eq!(state.filter.region(), None);

        let state = state.reduce(Action::ResetFilters, &dataset);
        assert!(state.filter.is_unrestricted());
    }

    #[test]
    fn cluster_color_must_be_valid_hex() {
        let dataset = dataset();
        let state = DashboardState::default()
            .reduce(
                Action::SetClusterColor {
                    id: 2,
                    color: "#123".to_string(),
                },
                &dataset,
            )
            .reduce(
                Action::SetClusterColor {
                    id: 3,
                    color: "blue".to_string(),
                },
                &dataset,
            );
        assert_eq!(state.palette.color(2), "#123");
        assert_eq!(state.palette.color(3), ClusterPalette::default().color(3));
    }

    #[test]
    fn toggles_and_modes() {
        let dataset = dataset();
        let state = DashboardState::default()
            .reduce(Action::ToggleStateComparison, &dataset)
            .reduce(Action::SetMode(VisualMode::Cluster), &dataset)
            .reduce(Action::SetAnalysisMode(AnalysisMode::Projections), &dataset);
        assert!(state.show_state_comparison);
        assert_eq!(state.mode, VisualMode::Cluster);
        assert_eq!(state.analysis_mode, AnalysisMode::Projections);
    }
}
