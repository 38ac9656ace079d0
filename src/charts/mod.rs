//! Charts module - Survival overview rendering

mod dashboard;
mod renderer;

pub use dashboard::{SurvivalDashboard, DIED_COLOR, SURVIVED_COLOR};
pub use renderer::{RenderError, StaticChartRenderer, FIGURE_TITLE};
