//! errdash
//!
//! A lightweight Rust library for aggregating error/telemetry records and
//! rendering dashboard charts to SVG. Pairs with the `errdash` CLI.
//!
//! ### Features
//! - Five chart components: correlation heatmap, choropleth world map,
//!   pie chart, word cloud, and a filter panel
//! - Every component follows the same shape: aggregate raw records into a
//!   chart-ready series, derive scales/layout, bind to visual marks
//! - Pointer interaction model: hit-region index + shared tooltip overlay
//! - Degenerate inputs always render an explicit placeholder, never panic
//!
//! ### Example
//! ```no_run
//! use errdash::Dashboard;
//! use errdash::models::FilterField;
//!
//! let records = errdash::storage::load_records("errors.json")?;
//! let mut dashboard = Dashboard::new(std::path::Path::new("charts"));
//! dashboard.initialize(true)?;
//! dashboard.load(records)?;
//! dashboard.set_filter(FilterField::Country, "South Korea")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod agg;
pub mod charts;
pub mod dashboard;
pub mod filter;
pub mod geo;
pub mod interact;
pub mod models;
pub mod palette;
pub mod scale;
pub mod storage;

pub use charts::{ChartComponent, CorrelationMatrix, PieChart, WordCloud, WorldMap};
pub use dashboard::Dashboard;
pub use filter::FilterPanel;
pub use models::{FilterField, FilterState, Record};
