//! Word cloud of distinct error messages, sized by occurrence count.

use super::cloud_layout::{self, CloudWord, PlacedWord};
use super::{ChartComponent, NO_DATA_MESSAGE, draw_no_data};
use crate::agg::{self, dynamic_font_scale, word_font_size};
use crate::interact::{HitRegion, HitShape, Highlight, Hoverable, PointerEvent, SharedTooltip};
use crate::palette;
use ahash::AHashMap;
use anyhow::Result;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_svg::SVGBackend;
use std::path::PathBuf;

/// Handler invoked with the pointer event and the word it landed on.
pub type CloudEventHandler = Box<dyn FnMut(&PointerEvent, &PlacedWord)>;

pub struct WordCloud {
    out_path: PathBuf,
    width: u32,
    height: u32,
    hover: Hoverable,
    handlers: AHashMap<String, CloudEventHandler>,
    placed: Vec<PlacedWord>,
}

impl WordCloud {
    pub fn new(out_path: impl Into<PathBuf>, tooltip: SharedTooltip) -> Self {
        WordCloud {
            out_path: out_path.into(),
            width: 1000,
            height: 450,
            hover: Hoverable::new(tooltip),
            handlers: AHashMap::new(),
            placed: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Register a handler for `event_type`; the last registration per
    /// event wins. `"click"` is dispatched from [`WordCloud::click`].
    pub fn on<F>(&mut self, event_type: &str, handler: F)
    where
        F: FnMut(&PointerEvent, &PlacedWord) + 'static,
    {
        self.handlers.insert(event_type.to_string(), Box::new(handler));
    }

    /// Dispatch a click at page coordinates to the registered handler, if
    /// any word mark is under the pointer. Returns the hit word's text.
    pub fn click(&mut self, ev: PointerEvent) -> Option<String> {
        let idx = self.hover.hit_test(ev.x, ev.y)?;
        let word = self.placed.get(idx)?;
        let text = word.text.clone();
        if let Some(handler) = self.handlers.get_mut("click") {
            handler(&ev, word);
        }
        Some(text)
    }

    pub fn placed_words(&self) -> &[PlacedWord] {
        &self.placed
    }

    pub fn hover(&self) -> &Hoverable {
        &self.hover
    }

    pub fn hover_mut(&mut self) -> &mut Hoverable {
        &mut self.hover
    }

    fn draw(&self, root: &DrawingArea<SVGBackend, Shift>) -> Result<Vec<HitRegion>> {
        let cx = self.width as f64 / 2.0;
        let cy = self.height as f64 / 2.0;
        let max_size = self
            .placed
            .iter()
            .map(|w| w.size)
            .fold(f64::MIN, f64::max)
            .max(1.0);

        let mut regions = Vec::new();
        for word in &self.placed {
            // Remap into [0.1, 1.0] so the smallest word is never white.
            let t = word.size / max_size;
            let color = palette::reds(t * 0.9 + 0.1).to_plotters();
            let style = FontDesc::new(FontFamily::SansSerif, word.size, FontStyle::Bold)
                .color(&color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(
                word.text.clone(),
                ((cx + word.x) as i32, (cy + word.y) as i32),
                style,
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

            regions.push(HitRegion {
                key: word.text.clone(),
                tooltip: format!("{}\n{}(ea)", word.text, word.count),
                shape: HitShape::Rect {
                    x0: cx + word.x - word.width / 2.0,
                    y0: cy + word.y - word.height / 2.0,
                    x1: cx + word.x + word.width / 2.0,
                    y1: cy + word.y + word.height / 2.0,
                },
                highlight: Highlight {
                    opacity: 0.7,
                    stroke: None,
                },
            });
        }
        Ok(regions)
    }
}

impl ChartComponent for WordCloud {
    fn initialize(&mut self) -> Result<()> {
        debug!("wordcloud: initialize");
        Ok(())
    }

    fn update(&mut self, data: &[crate::models::Record]) -> Result<()> {
        debug!("wordcloud: update {} records", data.len());

        let entries = agg::message_counts(data);
        let path_string = self.out_path.to_string_lossy().into_owned();
        let root = SVGBackend::new(path_string.as_str(), (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

        if data.is_empty() || entries.is_empty() {
            self.placed.clear();
            draw_no_data(&root, self.width, self.height, NO_DATA_MESSAGE)?;
            root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
            self.hover.replace_regions(Vec::new());
            return Ok(());
        }

        let scale = dynamic_font_scale(entries.len());
        debug!("wordcloud: dynamic scale: {}ea -> {}", entries.len(), scale);

        let words: Vec<CloudWord> = entries
            .iter()
            .map(|e| CloudWord {
                text: e.text.clone(),
                count: e.count,
                size: word_font_size(e.count, scale),
            })
            .collect();
        self.placed = cloud_layout::layout(&words, self.width as f64, self.height as f64);

        let regions = self.draw(&root)?;
        root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        self.hover.replace_regions(regions);
        Ok(())
    }
}
