//! One forward pass: load, profile, clean, analyse, render.

use crate::charts::{RenderError, StaticChartRenderer, SurvivalDashboard};
use crate::config::EdaConfig;
use crate::data::{
    CleanTable, CleaningOptions, CleaningReport, DataCleaner, DataLoader, LoaderError,
    PassengerTable, SchemaError,
};
use crate::report;
use crate::stats::{ChiSquareTest, DataProfiler, DatasetProfile, ProfileError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Loading failed: {0}")]
    Load(#[from] LoaderError),
    #[error("Profiling failed: {0}")]
    Profile(#[from] ProfileError),
    #[error("Schema mismatch: {0}")]
    Schema(#[from] SchemaError),
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// Whether stages print the console report as they finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Console,
    Silent,
}

/// Everything produced by a run.
#[derive(Debug, Clone)]
pub struct EdaOutcome {
    pub source: String,
    pub profile: DatasetProfile,
    pub cleaning: CleaningReport,
    pub clean: CleanTable,
    pub dashboard: SurvivalDashboard,
    pub chart_path: PathBuf,
}

/// Serializable summary of a run, for `--json`.
#[derive(Debug, Serialize)]
pub struct EdaReport<'a> {
    pub source: &'a str,
    pub profile: &'a DatasetProfile,
    pub cleaning: &'a CleaningReport,
    pub survival: &'a SurvivalDashboard,
    pub independence_tests: Vec<IndependenceTest<'a>>,
    pub chart_path: &'a PathBuf,
}

#[derive(Debug, Serialize)]
pub struct IndependenceTest<'a> {
    pub variable: &'a str,
    pub result: Option<ChiSquareTest>,
}

impl EdaOutcome {
    pub fn report(&self) -> EdaReport<'_> {
        EdaReport {
            source: &self.source,
            profile: &self.profile,
            cleaning: &self.cleaning,
            survival: &self.dashboard,
            independence_tests: self
                .dashboard
                .crosstabs()
                .into_iter()
                .map(|tab| IndependenceTest {
                    variable: &tab.variable,
                    result: tab.chi_square(),
                })
                .collect(),
            chart_path: &self.chart_path,
        }
    }
}

pub struct EdaPipeline {
    config: EdaConfig,
    output: OutputMode,
}

impl EdaPipeline {
    pub fn new(config: EdaConfig, output: OutputMode) -> Self {
        Self { config, output }
    }

    /// Run every stage once, in order. Any stage error ends the run.
    pub fn run(&self) -> Result<EdaOutcome, PipelineError> {
        let console = self.output == OutputMode::Console;

        let loaded =
            DataLoader::new(&self.config.input_path, self.config.fallback.clone()).load()?;
        if console {
            report::print_load_summary(&loaded);
        }

        let profile = DataProfiler::profile(&loaded.frame, self.config.head_rows)?;
        if console {
            report::print_profile(&profile);
        }

        let table = PassengerTable::from_frame(&loaded.frame)?;
        let options = CleaningOptions {
            placeholder: self.config.placeholder.clone(),
        };
        let (clean, cleaning) = DataCleaner::clean(table, &options);
        if console {
            report::print_cleaning(&cleaning);
        }

        let dashboard = SurvivalDashboard::from_clean(&clean);
        if console {
            report::print_analysis(&dashboard);
        }

        let chart_path = self.config.chart_path();
        StaticChartRenderer::render(&dashboard, &chart_path, self.config.chart_size)?;
        if console {
            report::print_chart_location(&chart_path);
        }

        if self.config.open_chart {
            info!("Opening {}", chart_path.display());
            if let Err(e) = open::that(&chart_path) {
                warn!("Could not open chart viewer: {}", e);
            }
        }

        Ok(EdaOutcome {
            source: loaded.source.to_string(),
            profile,
            cleaning,
            clean,
            dashboard,
            chart_path,
        })
    }
}
