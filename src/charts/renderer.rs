//! Static Chart Renderer
//! Generates the survival overview figure with plotters.
//!
//! Layout:
//! 1. Title: "Titanic Survival Analysis Overview" centered
//! 2. 2x2 grid of panels:
//!    - Top left: overall survival pie with percentages
//!    - Top right: survival rate by gender
//!    - Bottom left: survival rate by passenger class
//!    - Bottom right: survival rate by age group

use crate::charts::dashboard::{SurvivalDashboard, DIED_COLOR, SURVIVED_COLOR};
use crate::stats::{CrossTab, CrossTabRow, SurvivalSummary};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::TAU;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const FIGURE_TITLE: &str = "Titanic Survival Analysis Overview";

const FONT: &str = "sans-serif";
// Keeps category labels readable above the 100% line.
const Y_MAX: f64 = 1.1;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
    #[error("Failed to create output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid chart size {0}x{1}")]
    InvalidSize(u32, u32),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(e.to_string())
    }
}

/// X axis with one unit-wide slot per category. Ticks sit on slot centers.
struct CategoryAxis {
    slots: usize,
    linear: RangedCoordf64,
}

impl CategoryAxis {
    fn new(slots: usize) -> Self {
        let slots = slots.max(1);
        Self {
            slots,
            linear: RangedCoordf64::from(0.0..slots as f64),
        }
    }
}

impl Ranged for CategoryAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.linear.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.max_num_points() == 0 {
            return Vec::new();
        }
        (0..self.slots).map(|i| i as f64 + 0.5).collect()
    }

    fn range(&self) -> Range<f64> {
        self.linear.range()
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the overview figure to a PNG at `path`.
    pub fn render(
        dashboard: &SurvivalDashboard,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if size.0 == 0 || size.1 == 0 {
            return Err(RenderError::InvalidSize(size.0, size.1));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        Self::draw(&root, dashboard)?;
        root.present()?;

        info!("Saved survival overview chart to {}", path.display());
        Ok(())
    }

    /// Draw the whole figure onto any plotters backend.
    pub fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        dashboard: &SurvivalDashboard,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE)?;

        let (width, height) = root.dim_in_pixel();
        let title_h = (height / 16).max(30);
        let (title_area, body) = root.split_vertically(title_h);

        let title_font = (FONT, (title_h / 2) as f64)
            .into_font()
            .style(FontStyle::Bold);
        let title_style = TextStyle::from(title_font).pos(Pos::new(HPos::Center, VPos::Center));
        title_area.draw(&Text::new(
            FIGURE_TITLE,
            ((width / 2) as i32, (title_h / 2) as i32),
            title_style,
        ))?;

        let panels = body.split_evenly((2, 2));
        Self::draw_pie(&panels[0], &dashboard.overall)?;
        Self::draw_grouped_bars(
            &panels[1],
            "Survival Rate by Gender",
            "Gender",
            &dashboard.by_gender,
        )?;
        Self::draw_grouped_bars(
            &panels[2],
            "Survival Rate by Passenger Class",
            "Passenger Class",
            &dashboard.by_class,
        )?;
        Self::draw_grouped_bars(
            &panels[3],
            "Survival Rate by Age Group",
            "Age Group",
            &dashboard.by_age_group,
        )?;
        Ok(())
    }

    /// Pie of died vs survived, starting at 3 o'clock and going counter-clockwise.
    fn draw_pie<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        summary: &SurvivalSummary,
    ) -> Result<(), RenderError> {
        let (w, h) = area.dim_in_pixel();
        let centered = |size: u32| {
            TextStyle::from((FONT, size as f64).into_font())
                .pos(Pos::new(HPos::Center, VPos::Center))
        };

        let caption = format!("Overall Survival Rate: {}", summary.rate_label());
        area.draw(&Text::new(caption, ((w / 2) as i32, 24), centered(22)))?;

        if summary.total == 0 {
            return Ok(());
        }

        let center = ((w / 2) as i32, (h / 2) as i32 + 15);
        let radius = w.min(h) as f64 * 0.32;
        let point_at = |angle: f64, r: f64| {
            (
                center.0 + (r * angle.cos()).round() as i32,
                center.1 - (r * angle.sin()).round() as i32,
            )
        };

        let slices = [
            (summary.non_survivors, "Died", DIED_COLOR),
            (summary.survivors, "Survived", SURVIVED_COLOR),
        ];

        let mut start = 0.0;
        for (count, label, color) in slices {
            if count == 0 {
                continue;
            }
            let share = count as f64 / summary.total as f64;
            let sweep = share * TAU;
            let steps = (share * 180.0).ceil().max(2.0) as usize;

            let mut outline = Vec::with_capacity(steps + 2);
            outline.push(center);
            for s in 0..=steps {
                outline.push(point_at(start + sweep * s as f64 / steps as f64, radius));
            }
            area.draw(&Polygon::new(outline, color.filled()))?;

            let mid = start + sweep / 2.0;
            area.draw(&Text::new(label, point_at(mid, radius * 1.18), centered(18)))?;
            area.draw(&Text::new(
                format!("{:.1}%", share * 100.0),
                point_at(mid, radius * 0.6),
                centered(18),
            ))?;
            start += sweep;
        }
        Ok(())
    }

    /// Side-by-side Died/Survived bars for each category.
    fn draw_grouped_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        title: &str,
        x_desc: &str,
        tab: &CrossTab,
    ) -> Result<(), RenderError> {
        let n = tab.rows.len();
        let categories = tab.categories();

        let mut chart = ChartBuilder::on(area)
            .caption(title, (FONT, 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(CategoryAxis::new(n), 0f64..Y_MAX)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.max(1))
            .x_desc(x_desc)
            .y_desc("Survival Rate")
            .x_label_formatter(&|x| {
                categories
                    .get(x.floor() as usize)
                    .map(|c| c.to_string())
                    .unwrap_or_default()
            })
            .y_label_formatter(&|y| format!("{:.1}", y))
            .draw()?;

        let bar = |offset: f64, pick: fn(&CrossTabRow) -> f64, color: RGBColor| {
            tab.rows.iter().enumerate().map(move |(i, row)| {
                let x = i as f64 + offset;
                Rectangle::new([(x, 0.0), (x + 0.4, pick(row))], color.filled())
            })
        };

        chart
            .draw_series(bar(0.1, |r| r.died, DIED_COLOR))?
            .label("Died")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 6), (x + 14, y + 6)], DIED_COLOR.filled())
            });
        chart
            .draw_series(bar(0.5, |r| r.survived, SURVIVED_COLOR))?
            .label("Survived")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 6), (x + 14, y + 6)], SURVIVED_COLOR.filled())
            });

        let value_style =
            TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(tab.rows.iter().enumerate().flat_map(|(i, row)| {
            let x = i as f64;
            [
                Text::new(
                    format!("{:.0}%", row.died * 100.0),
                    (x + 0.3, row.died + 0.01),
                    value_style.clone(),
                ),
                Text::new(
                    format!("{:.0}%", row.survived * 100.0),
                    (x + 0.7, row.survived + 0.01),
                    value_style.clone(),
                ),
            ]
        }))?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}
