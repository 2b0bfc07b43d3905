//! Loaded config, dataset, and dashboard state shared by every command.

use std::path::{Path, PathBuf};

use clap::Args;
use county_health_county_models::{CountyRecord, fips::normalize_county_fips};
use county_health_dataset::{Action, DashboardConfig, DashboardState, Dataset, view};
use county_health_filter::{FilterDimension, NumericRange, QuickFilter, parse_range_arg};
use county_health_recommendations::{
    RecommendationCache,
    cache::{DEFAULT_CACHE_FILE, DEFAULT_CACHE_TTL_DAYS},
};

use crate::parse_enum;

/// Filter flags shared by the commands that work on the filtered set.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Only include counties in this region
    #[arg(long)]
    pub region: Option<String>,

    /// Only include this cluster id (repeatable)
    #[arg(long = "cluster", value_name = "ID")]
    pub clusters: Vec<u8>,

    /// Restrict a dimension, e.g. `healthcare=0:40` (repeatable)
    #[arg(long = "range", value_name = "DIM=MIN:MAX", value_parser = parse_range_arg)]
    pub ranges: Vec<(FilterDimension, NumericRange)>,

    /// Start from a preset (low_access, high_access, rural, metro, high_poverty, high_opportunity)
    #[arg(long, value_parser = parse_enum::<QuickFilter>)]
    pub quick: Option<QuickFilter>,
}

pub struct Session {
    pub config: DashboardConfig,
    pub data_dir: PathBuf,
    pub dataset: Dataset,
    pub state: DashboardState,
}

impl Session {
    /// Resolves the config, loads the dataset, and starts from the default
    /// dashboard state with the configured cluster palette.
    ///
    /// # Errors
    ///
    /// * If the config file cannot be read or parsed
    /// * If no county data can be loaded
    pub fn open(
        config_path: Option<&Path>,
        data_dir: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = DashboardConfig::resolve(config_path)?;
        let data_dir = config.data_dir(data_dir);
        log::info!("Loading county data from {}", data_dir.display());

        let dataset = Dataset::load(&data_dir)?;
        let state = DashboardState::with_palette(config.palette());

        Ok(Self {
            config,
            data_dir,
            dataset,
            state,
        })
    }

    pub fn dispatch(&mut self, action: Action) {
        self.state = self.state.reduce(action, &self.dataset);
    }

    /// Applies the quick preset first (it replaces the whole filter), then
    /// the region, clusters, and ranges on top of it.
    pub fn apply_filters(&mut self, args: &FilterArgs) {
        if let Some(quick) = args.quick {
            self.dispatch(Action::ApplyQuickFilter(quick));
        }
        if let Some(region) = &args.region {
            self.dispatch(Action::SetRegion(Some(region.clone())));
        }
        for &id in &args.clusters {
            self.dispatch(Action::ToggleCluster { id, checked: true });
        }
        for &(dimension, range) in &args.ranges {
            self.dispatch(Action::SetRange { dimension, range });
        }
    }

    pub fn filtered(&self) -> Vec<&CountyRecord> {
        view::filtered(&self.dataset, &self.state)
    }

    /// Looks up a county, accepting four-digit codes without the leading zero.
    pub fn county(&self, fips: &str) -> Option<&CountyRecord> {
        self.dataset.county(&normalize_county_fips(fips))
    }

    /// Selects `fips`, returning `false` if it is not in the dataset.
    pub fn select(&mut self, fips: &str) -> bool {
        let fips = normalize_county_fips(fips);
        if self.dataset.county(&fips).is_none() {
            return false;
        }
        self.dispatch(Action::SelectCounty(Some(fips)));
        true
    }

    pub fn recommendation_cache(&self) -> RecommendationCache {
        let settings = &self.config.recommendations;
        let path = settings
            .cache_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_CACHE_FILE));
        let ttl_days = settings.cache_ttl_days.unwrap_or(DEFAULT_CACHE_TTL_DAYS);
        RecommendationCache::open(&path, ttl_days)
    }
}
