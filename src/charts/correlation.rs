//! Correlation heatmap: dense model × modem-version grid of error counts.

use super::text::{tick_label_limit, truncate_chars};
use super::{ChartComponent, Margins, NO_DATA_MESSAGE, draw_no_data};
use crate::agg::{self, CorrelationData};
use crate::interact::{HitRegion, HitShape, Highlight, Hoverable, SharedTooltip};
use crate::palette::{self, Rgb8};
use crate::scale::BandScale;
use anyhow::Result;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};
use plotters_svg::SVGBackend;
use std::path::PathBuf;

const MIN_CELL_SIZE: f64 = 25.0;
const CELL_PADDING_PCT: f64 = 1.0;
const BAND_PADDING: f64 = 0.05;

pub struct CorrelationMatrix {
    out_path: PathBuf,
    width: u32,
    height: u32,
    margin: Margins,
    hover: Hoverable,
}

impl CorrelationMatrix {
    pub fn new(out_path: impl Into<PathBuf>, tooltip: SharedTooltip) -> Self {
        CorrelationMatrix {
            out_path: out_path.into(),
            width: 500,
            height: 800,
            margin: Margins {
                top: 60,
                right: 100,
                bottom: 130,
                left: 150,
            },
            hover: Hoverable::new(tooltip),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn chart_width(&self) -> f64 {
        (self.width as i32 - self.margin.left - self.margin.right) as f64
    }

    fn chart_height(&self) -> f64 {
        (self.height as i32 - self.margin.top - self.margin.bottom) as f64
    }

    pub fn hover(&self) -> &Hoverable {
        &self.hover
    }

    pub fn hover_mut(&mut self) -> &mut Hoverable {
        &mut self.hover
    }

    fn draw(&self, root: &DrawingArea<SVGBackend, Shift>, data: &CorrelationData) -> Result<Vec<HitRegion>> {
        let left = self.margin.left as f64;
        let top = self.margin.top as f64;
        let chart_w = self.chart_width();
        let chart_h = self.chart_height();

        // How many columns/rows fit at the minimum cell size; ranked lists
        // are truncated, lower-frequency categories silently dropped.
        let max_models = (chart_w / MIN_CELL_SIZE).floor() as usize;
        let max_versions = (chart_h / MIN_CELL_SIZE).floor() as usize;
        let display_models: Vec<String> = data
            .top_models
            .iter()
            .take(max_models.max(1))
            .cloned()
            .collect();
        let display_versions: Vec<String> = data
            .top_versions
            .iter()
            .take(max_versions.max(1))
            .cloned()
            .collect();

        let x_scale = BandScale::new(display_models.clone(), (0.0, chart_w), BAND_PADDING);
        let y_scale = BandScale::new(display_versions.clone(), (0.0, chart_h), BAND_PADDING);

        self.draw_axes(root, &x_scale, &y_scale)?;

        let cell_w = x_scale.bandwidth() * (1.0 - CELL_PADDING_PCT / 100.0);
        let cell_h = y_scale.bandwidth() * (1.0 - CELL_PADDING_PCT / 100.0);

        let mut regions = Vec::new();
        for cell in &data.cells {
            // row/col index the full ranked lists; anything past the
            // display cut is not drawn.
            if cell.col >= display_models.len() || cell.row >= display_versions.len() {
                continue;
            }
            let x0 = left + x_scale.position_at(cell.col);
            let y0 = top + y_scale.position_at(cell.row);

            let t = if data.max_count > 0 {
                cell.count as f64 / data.max_count as f64
            } else {
                0.0
            };
            let fill = palette::blues(t).to_plotters();
            root.draw(&Rectangle::new(
                [(x0 as i32, y0 as i32), ((x0 + cell_w) as i32, (y0 + cell_h) as i32)],
                fill.filled(),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            root.draw(&Rectangle::new(
                [(x0 as i32, y0 as i32), ((x0 + cell_w) as i32, (y0 + cell_h) as i32)],
                WHITE.stroke_width(1),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

            let font_px = cell_label_font_px(cell.count, cell_w, cell_h);
            if font_px > 0.0 {
                let color = cell_label_color(cell.count, data.max_count);
                let fill_color = color.to_plotters();
                let style = FontDesc::new(FontFamily::SansSerif, font_px, FontStyle::Normal)
                    .color(&fill_color)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                root.draw(&Text::new(
                    cell.count.to_string(),
                    (
                        (x0 + x_scale.bandwidth() / 2.0) as i32,
                        (y0 + y_scale.bandwidth() / 2.0) as i32,
                    ),
                    style,
                ))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }

            regions.push(HitRegion {
                key: format!("{}/{}", cell.model, cell.version),
                tooltip: format!("{} [{}]\n{}(ea)", cell.model, cell.version, cell.count),
                shape: HitShape::Rect {
                    x0,
                    y0,
                    x1: x0 + cell_w,
                    y1: y0 + cell_h,
                },
                highlight: Highlight {
                    opacity: 0.7,
                    stroke: Some(Rgb8::new(0, 0, 0)),
                },
            });
        }

        self.draw_legend(root, data.max_count)?;
        Ok(regions)
    }

    fn draw_axes(
        &self,
        root: &DrawingArea<SVGBackend, Shift>,
        x_scale: &BandScale,
        y_scale: &BandScale,
    ) -> Result<()> {
        let left = self.margin.left as f64;
        let top = self.margin.top as f64;
        let axis_color = RGBColor(100, 100, 100);

        // X ticks under the chart, truncated to the band width, rotated to
        // fit narrow bands.
        let x_limit = tick_label_limit(x_scale.bandwidth(), 4.0);
        for (i, model) in x_scale.domain().iter().enumerate() {
            let cx = left + x_scale.position_at(i) + x_scale.bandwidth() / 2.0;
            let style = ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90)
                .color(&axis_color)
                .pos(Pos::new(HPos::Left, VPos::Center));
            root.draw(&Text::new(
                truncate_chars(model, x_limit),
                (cx as i32, (top + self.chart_height() + 6.0) as i32),
                style,
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }

        // Y ticks left of the chart.
        let y_limit = tick_label_limit(y_scale.bandwidth(), 3.0);
        for (i, version) in y_scale.domain().iter().enumerate() {
            let cy = top + y_scale.position_at(i) + y_scale.bandwidth() / 2.0;
            let style = ("sans-serif", 12)
                .into_font()
                .color(&axis_color)
                .pos(Pos::new(HPos::Right, VPos::Center));
            root.draw(&Text::new(
                truncate_chars(version, y_limit),
                ((left - 8.0) as i32, cy as i32),
                style,
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }

        // Axis captions.
        let caption_font = || FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Bold);
        root.draw(&Text::new(
            "Model",
            (self.width as i32 / 2, self.height as i32 - 50),
            caption_font()
                .color(&axis_color)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            "SW Version",
            (20, self.height as i32 / 2),
            caption_font()
                .transform(FontTransform::Rotate270)
                .color(&axis_color)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(())
    }

    fn draw_legend(&self, root: &DrawingArea<SVGBackend, Shift>, max_count: u64) -> Result<()> {
        let legend_w = 20.0;
        let legend_h = self.height as f64 * 0.5;
        let legend_x = self.width as f64 - legend_w - 40.0;
        let legend_y = (self.height as f64 - legend_h) / 2.0;

        // Vertical gradient, low at the bottom, sampled in strips.
        const STRIPS: usize = 64;
        let strip_h = legend_h / STRIPS as f64;
        for i in 0..STRIPS {
            let t = (i as f64 + 0.5) / STRIPS as f64;
            let y1 = legend_y + legend_h - i as f64 * strip_h;
            root.draw(&Rectangle::new(
                [
                    (legend_x as i32, (y1 - strip_h).floor() as i32),
                    ((legend_x + legend_w) as i32, y1.ceil() as i32),
                ],
                palette::blues(t).to_plotters().filled(),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
        root.draw(&Rectangle::new(
            [
                (legend_x as i32, legend_y as i32),
                ((legend_x + legend_w) as i32, (legend_y + legend_h) as i32),
            ],
            RGBColor(51, 51, 51).stroke_width(1),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let tick = ("sans-serif", 10)
            .into_font()
            .color(&RGBColor(51, 51, 51))
            .pos(Pos::new(HPos::Left, VPos::Center));
        root.draw(&Text::new(
            "0",
            ((legend_x + legend_w + 5.0) as i32, (legend_y + legend_h) as i32),
            tick.clone(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            max_count.to_string(),
            ((legend_x + legend_w + 5.0) as i32, legend_y as i32),
            tick,
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let caption = FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Bold)
            .transform(FontTransform::Rotate270)
            .color(&RGBColor(102, 102, 102))
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            "Error Count",
            ((legend_x - 10.0) as i32, (legend_y + legend_h / 2.0) as i32),
            caption,
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(())
    }
}

impl ChartComponent for CorrelationMatrix {
    fn initialize(&mut self) -> Result<()> {
        debug!("correlation: initialize");
        Ok(())
    }

    fn update(&mut self, data: &[crate::models::Record]) -> Result<()> {
        let aggregated = agg::correlation_matrix(data);
        debug!(
            "correlation: update {} records -> {}x{} grid, max {}",
            data.len(),
            aggregated.top_models.len(),
            aggregated.top_versions.len(),
            aggregated.max_count
        );

        let path_string = self.out_path.to_string_lossy().into_owned();
        let root = SVGBackend::new(path_string.as_str(), (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let regions = if aggregated.is_empty() {
            draw_no_data(&root, self.width, self.height, NO_DATA_MESSAGE)?;
            Vec::new()
        } else {
            self.draw(&root, &aggregated)?
        };
        root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        self.hover.replace_regions(regions);
        Ok(())
    }
}

/// Per-cell label size: scales with the cell, shrinks with the digit
/// count, and disappears entirely for zero cells in tiny footprints.
/// Returns 0.0 when the label is suppressed.
fn cell_label_font_px(count: u64, cell_w: f64, cell_h: f64) -> f64 {
    let max_font = cell_w.min(cell_h) * 0.6;
    let digits = count.to_string().len() as f64;
    let mut font = max_font / 1.0f64.max((digits * 0.8).sqrt());

    if cell_w < 25.0 || cell_h < 20.0 {
        font = font.min(10.0);
        if count == 0 && (cell_w < 15.0 || cell_h < 12.0) {
            return 0.0;
        }
    }
    font.max(8.0)
}

/// Light label above 40% of the maximum for contrast; muted gray on zero.
fn cell_label_color(count: u64, max_count: u64) -> Rgb8 {
    if count == 0 {
        Rgb8::new(0xAA, 0xAA, 0xAA)
    } else if count as f64 > max_count as f64 * 0.4 {
        Rgb8::new(0xFF, 0xFF, 0xFF)
    } else {
        Rgb8::new(0x33, 0x33, 0x33)
    }
}
