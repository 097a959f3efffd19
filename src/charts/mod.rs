//! Chart components: each takes a dataset snapshot, aggregates it into a
//! chart-ready series, derives scales/layout, and renders SVG while
//! rebuilding its pointer hit-map.
//!
//! All components share the same lifecycle: `initialize()` once, then
//! `update(data)` for every new snapshot. Updates are full re-renders; the
//! previous visual state is replaced entirely.

pub mod cloud_layout;
pub mod correlation;
pub mod map;
pub mod pie;
pub mod text;
pub mod wordcloud;

pub use correlation::CorrelationMatrix;
pub use map::WorldMap;
pub use pie::PieChart;
pub use wordcloud::WordCloud;

use crate::models::Record;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Placeholder shown whenever an update has nothing to draw.
pub const NO_DATA_MESSAGE: &str = "No data available. Check your filter conditions";

/// Shared component lifecycle.
pub trait ChartComponent {
    /// One-time setup (drawing surface, scales, external data).
    fn initialize(&mut self) -> Result<()>;

    /// Full re-render from a new dataset snapshot.
    fn update(&mut self, data: &[Record]) -> Result<()>;
}

/// Pixel margins around a chart's plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Centered placeholder message replacing the whole chart.
pub(crate) fn draw_no_data<DB>(
    area: &DrawingArea<DB, Shift>,
    width: u32,
    height: u32,
    message: &str,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let style = ("sans-serif", 16)
        .into_font()
        .color(&RGBColor(100, 100, 100))
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        message.to_string(),
        (width as i32 / 2, height as i32 / 2),
        style,
    ))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}
