//! Stats module - profiling, descriptive statistics and survival cross-tabs

pub mod calculator;
pub mod crosstab;
pub mod profiler;

pub use calculator::{ChiSquareTest, DescriptiveStats, StatsCalculator, SIGNIFICANCE_THRESHOLD};
pub use crosstab::{CrossTab, CrossTabRow, SurvivalSummary};
pub use profiler::{DataProfiler, DatasetProfile, MissingEntry, ProfileError};
