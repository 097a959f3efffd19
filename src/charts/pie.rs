//! Pie chart of error share per radio access technology.

use super::{ChartComponent, NO_DATA_MESSAGE, draw_no_data};
use crate::agg::{self, RatBreakdown};
use crate::interact::{HitRegion, HitShape, Highlight, Hoverable, SharedTooltip};
use crate::palette::set3_color;
use crate::scale::{PieAngle, pie_partition};
use anyhow::Result;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_svg::SVGBackend;
use std::path::PathBuf;

const INNER_RADIUS: f64 = 0.0;
const OUTER_RADIUS: f64 = 180.0;
const LABEL_RADIUS: f64 = 220.0;
/// Slice percentage labels below this value are dropped to avoid clutter.
const LABEL_MIN_PERCENTAGE: f64 = 3.0;

pub struct PieChart {
    out_path: PathBuf,
    width: u32,
    height: u32,
    hover: Hoverable,
}

impl PieChart {
    pub fn new(out_path: impl Into<PathBuf>, tooltip: SharedTooltip) -> Self {
        PieChart {
            out_path: out_path.into(),
            width: 500,
            height: 800,
            hover: Hoverable::new(tooltip),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn hover(&self) -> &Hoverable {
        &self.hover
    }

    pub fn hover_mut(&mut self) -> &mut Hoverable {
        &mut self.hover
    }

    fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    fn draw(
        &self,
        root: &DrawingArea<SVGBackend, Shift>,
        breakdown: &RatBreakdown,
    ) -> Result<Vec<HitRegion>> {
        let (cx, cy) = self.center();
        let counts: Vec<u64> = breakdown.slices.iter().map(|s| s.count).collect();
        let angles = pie_partition(&counts);
        let gray = RGBColor(100, 100, 100);

        let mut regions = Vec::new();
        for (i, (slice, angle)) in breakdown.slices.iter().zip(&angles).enumerate() {
            let color = set3_color(i).to_plotters();
            let points = wedge_points(cx, cy, OUTER_RADIUS, angle);
            root.draw(&Polygon::new(points.clone(), color.filled()))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            root.draw(&PathElement::new(points, WHITE.stroke_width(1)))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;

            regions.push(HitRegion {
                key: slice.rat.clone(),
                tooltip: format!(
                    "{}\n{}(ea), {:.1}%",
                    slice.rat, slice.count, slice.percentage
                ),
                shape: HitShape::Wedge {
                    cx,
                    cy,
                    r_inner: INNER_RADIUS,
                    r_outer: OUTER_RADIUS,
                    start: angle.start,
                    end: angle.end,
                },
                highlight: Highlight {
                    opacity: 0.8,
                    stroke: None,
                },
            });
        }

        // Percentage labels inside the slices, suppressed on thin ones.
        for (slice, angle) in breakdown.slices.iter().zip(&angles) {
            if slice.percentage <= LABEL_MIN_PERCENTAGE {
                continue;
            }
            let (dx, dy) = angle.centroid((INNER_RADIUS + OUTER_RADIUS) / 2.0);
            let style = ("sans-serif", 12)
                .into_font()
                .color(&gray)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(
                format!("{:.1}%", slice.percentage),
                ((cx + dx) as i32, (cy + dy) as i32),
                style,
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }

        // Leader lines from slice centroid to an outer category label.
        for (slice, angle) in breakdown.slices.iter().zip(&angles) {
            let (mx, my) = angle.centroid((INNER_RADIUS + OUTER_RADIUS) / 2.0);
            let (lx, ly) = angle.centroid(LABEL_RADIUS);
            root.draw(&PathElement::new(
                vec![
                    ((cx + mx) as i32, (cy + my) as i32),
                    ((cx + lx) as i32, (cy + ly) as i32),
                ],
                RGBColor(153, 153, 153).mix(0.5).stroke_width(1),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

            let anchor = if lx > 0.0 { HPos::Left } else { HPos::Right };
            let style = FontDesc::new(FontFamily::SansSerif, 11.0, FontStyle::Bold)
                .color(&gray)
                .pos(Pos::new(anchor, VPos::Center));
            root.draw(&Text::new(
                slice.rat.clone(),
                ((cx + lx) as i32, (cy + ly) as i32),
                style,
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }

        self.draw_legend(root, breakdown)?;

        // Total caption at the pie center.
        let total_style = FontDesc::new(FontFamily::SansSerif, 13.0, FontStyle::Bold)
            .color(&gray)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            format!("Total: {}", breakdown.total),
            (cx as i32, cy as i32),
            total_style,
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        Ok(regions)
    }

    fn draw_legend(
        &self,
        root: &DrawingArea<SVGBackend, Shift>,
        breakdown: &RatBreakdown,
    ) -> Result<()> {
        let x0 = self.width as i32 - 150;
        let y0 = 80;
        for (i, slice) in breakdown.slices.iter().enumerate() {
            let y = y0 + i as i32 * 20;
            let color = set3_color(i).to_plotters();
            root.draw(&Rectangle::new([(x0, y), (x0 + 15, y + 15)], color.filled()))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            root.draw(&Rectangle::new(
                [(x0, y), (x0 + 15, y + 15)],
                RGBColor(204, 204, 204).stroke_width(1),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

            let style = ("sans-serif", 11)
                .into_font()
                .color(&RGBColor(51, 51, 51))
                .pos(Pos::new(HPos::Left, VPos::Center));
            root.draw(&Text::new(
                format!("{} ({})", slice.rat, slice.count),
                (x0 + 20, y + 7),
                style,
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
        Ok(())
    }
}

impl ChartComponent for PieChart {
    fn initialize(&mut self) -> Result<()> {
        debug!("pie: initialize");
        Ok(())
    }

    fn update(&mut self, data: &[crate::models::Record]) -> Result<()> {
        let breakdown = agg::rat_breakdown(data);
        debug!(
            "pie: update {} records -> {} slices, total {}",
            data.len(),
            breakdown.slices.len(),
            breakdown.total
        );

        let path_string = self.out_path.to_string_lossy().into_owned();
        let root = SVGBackend::new(path_string.as_str(), (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let regions = if breakdown.is_empty() {
            draw_no_data(&root, self.width, self.height, NO_DATA_MESSAGE)?;
            Vec::new()
        } else {
            self.draw(&root, &breakdown)?
        };
        root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        self.hover.replace_regions(regions);
        Ok(())
    }
}

/// Closed outline of a wedge: the center plus the sampled outer arc.
fn wedge_points(cx: f64, cy: f64, r: f64, angle: &PieAngle) -> Vec<(i32, i32)> {
    let sweep = angle.end - angle.start;
    let steps = ((sweep / std::f64::consts::TAU * 128.0).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push((cx as i32, cy as i32));
    for s in 0..=steps {
        let a = angle.start + sweep * s as f64 / steps as f64;
        points.push(((cx + a.sin() * r) as i32, (cy - a.cos() * r) as i32));
    }
    points.push((cx as i32, cy as i32));
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::pie_partition;

    #[test]
    fn wedge_outline_is_closed_and_reaches_the_rim() {
        let angles = pie_partition(&[1, 1]);
        let points = wedge_points(100.0, 100.0, 50.0, &angles[0]);
        assert_eq!(points.first(), points.last());
        // Quarter-way through the right half: roughly 3 o'clock.
        assert!(points.iter().any(|(x, _)| *x >= 149));
    }
}
