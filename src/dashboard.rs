//! Dashboard orchestration: owns the five components and the shared
//! tooltip, and fans dataset snapshots out to every chart.
//!
//! Control flow mirrors the embedding surface: load data → initialize each
//! chart → update every chart whenever the filter panel (or the initial
//! load) produces a new dataset. Each chart independently re-aggregates
//! and redraws from scratch.

use crate::charts::{ChartComponent, CorrelationMatrix, PieChart, WordCloud, WorldMap};
use crate::filter::FilterPanel;
use crate::interact::{SharedTooltip, shared_tooltip};
use crate::models::{FilterField, Record};
use anyhow::Result;
use log::debug;
use std::path::Path;

pub struct Dashboard {
    tooltip: SharedTooltip,
    filter_panel: FilterPanel,
    correlation: CorrelationMatrix,
    map: WorldMap,
    pie: PieChart,
    wordcloud: WordCloud,
}

impl Dashboard {
    /// Build a dashboard whose charts render into `out_dir` as
    /// `correlation.svg`, `map.svg`, `pie.svg`, and `wordcloud.svg`.
    pub fn new(out_dir: &Path) -> Self {
        let tooltip = shared_tooltip();
        Dashboard {
            filter_panel: FilterPanel::new(),
            correlation: CorrelationMatrix::new(
                out_dir.join("correlation.svg"),
                SharedTooltip::clone(&tooltip),
            ),
            map: WorldMap::new(out_dir.join("map.svg"), SharedTooltip::clone(&tooltip)),
            pie: PieChart::new(out_dir.join("pie.svg"), SharedTooltip::clone(&tooltip)),
            wordcloud: WordCloud::new(
                out_dir.join("wordcloud.svg"),
                SharedTooltip::clone(&tooltip),
            ),
            tooltip,
        }
    }

    pub fn with_geo_url(mut self, url: impl Into<String>) -> Self {
        self.map = self.map.with_geo_url(url);
        self
    }

    /// One-time setup of every component. `fetch_geography` gates the
    /// map's network fetch; when false the map stays in its "unavailable"
    /// placeholder.
    pub fn initialize(&mut self, fetch_geography: bool) -> Result<()> {
        self.filter_panel.initialize();
        self.correlation.initialize()?;
        self.pie.initialize()?;
        self.wordcloud.initialize()?;
        if fetch_geography {
            self.map.initialize()?;
        }
        self.wordcloud.on("click", |_event, word| {
            debug!("wordcloud: click on {:?} ({}ea)", word.text, word.count);
        });
        Ok(())
    }

    /// Replace the dataset and re-render every chart with the subset the
    /// filter panel considers active.
    pub fn load(&mut self, records: Vec<Record>) -> Result<()> {
        self.filter_panel.update_data(records);
        self.refresh()
    }

    /// Apply a dropdown selection (empty string clears one field) and
    /// re-render.
    pub fn set_filter(&mut self, field: FilterField, selection: &str) -> Result<()> {
        self.filter_panel.set_filter(field, selection);
        self.refresh()
    }

    /// Reset both filter fields and re-render with the full dataset.
    pub fn clear_filters(&mut self) -> Result<()> {
        self.filter_panel.clear_all_filters();
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        let data = self.filter_panel.active_data();
        debug!("dashboard: refresh with {} records", data.len());
        self.correlation.update(&data)?;
        self.map.update(&data)?;
        self.pie.update(&data)?;
        self.wordcloud.update(&data)?;
        Ok(())
    }

    pub fn tooltip(&self) -> SharedTooltip {
        SharedTooltip::clone(&self.tooltip)
    }

    pub fn filter_panel(&self) -> &FilterPanel {
        &self.filter_panel
    }

    pub fn filter_panel_mut(&mut self) -> &mut FilterPanel {
        &mut self.filter_panel
    }

    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut WorldMap {
        &mut self.map
    }

    pub fn pie(&self) -> &PieChart {
        &self.pie
    }

    pub fn wordcloud(&self) -> &WordCloud {
        &self.wordcloud
    }

    pub fn wordcloud_mut(&mut self) -> &mut WordCloud {
        &mut self.wordcloud
    }
}
