//! Titanic EDA - passenger data profiling, cleaning & survival charts
//!
//! A single forward pass over the Titanic passenger CSV:
//!
//! - **Loading**: Polars CSV reader with one fallback to the reference dataset
//! - **Profiling**: shape, dtypes, summary statistics, missing values,
//!   duplicates and unique text values
//! - **Cleaning**: (class, sex) median age imputation, embarked mode fill,
//!   cabin/deck placeholders, age/fare buckets and family size
//! - **Analysis**: row-normalized survival cross-tabs with chi-square tests
//! - **Charts**: a 2x2 overview figure rendered with plotters
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use titanic_eda::{EdaConfig, EdaPipeline, OutputMode};
//!
//! let config = EdaConfig::builder()
//!     .input_path("data/train.csv")
//!     .open_chart(false)
//!     .build()?;
//!
//! let outcome = EdaPipeline::new(config, OutputMode::Console).run()?;
//! println!("Survival rate: {}", outcome.dashboard.overall.rate_label());
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use charts::{StaticChartRenderer, SurvivalDashboard};
pub use config::{ConfigError, EdaConfig, EdaConfigBuilder};
pub use data::{
    AgeGroup, CleanTable, CleaningOptions, DataCleaner, DataLoader, FallbackSource, FareGroup,
    PassengerTable, Pclass,
};
pub use pipeline::{EdaOutcome, EdaPipeline, OutputMode, PipelineError};
pub use stats::{CrossTab, DataProfiler, StatsCalculator, SurvivalSummary};
