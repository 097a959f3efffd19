//! Choropleth world map of error counts per PLMN country.
//!
//! `initialize` performs the one-time boundary-data fetch. If it fails the
//! map stays in a permanent "unavailable" placeholder for the session;
//! there is no retry path.

use super::{ChartComponent, NO_DATA_MESSAGE, draw_no_data};
use crate::agg::{self, CountryCounts};
use crate::geo::{DEFAULT_WORLD_GEOJSON_URL, GeoClient, Projection, WorldGeometry};
use crate::interact::{HitRegion, HitShape, Highlight, Hoverable, SharedTooltip};
use crate::palette::{self, Rgb8};
use crate::scale::CountScale;
use anyhow::Result;
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::path::PathBuf;

const GEO_UNAVAILABLE_MESSAGE: &str = "GEOJSON data is not available";

pub struct WorldMap {
    out_path: PathBuf,
    width: u32,
    height: u32,
    geo_url: String,
    geometry: Option<WorldGeometry>,
    projection: Option<Projection>,
    hover: Hoverable,
}

impl WorldMap {
    pub fn new(out_path: impl Into<PathBuf>, tooltip: SharedTooltip) -> Self {
        WorldMap {
            out_path: out_path.into(),
            width: 1000,
            height: 450,
            geo_url: DEFAULT_WORLD_GEOJSON_URL.to_string(),
            geometry: None,
            projection: None,
            hover: Hoverable::new(tooltip),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_geo_url(mut self, url: impl Into<String>) -> Self {
        self.geo_url = url.into();
        self
    }

    /// Inject already-parsed boundary data instead of fetching (offline
    /// hosts, tests).
    pub fn set_geometry(&mut self, geometry: WorldGeometry) {
        self.projection = Projection::fit_extent(&geometry, self.extent());
        self.geometry = Some(geometry);
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn hover(&self) -> &Hoverable {
        &self.hover
    }

    pub fn hover_mut(&mut self) -> &mut Hoverable {
        &mut self.hover
    }

    fn extent(&self) -> ((f64, f64), (f64, f64)) {
        (
            (10.0, 50.0),
            (self.width as f64 - 10.0, self.height as f64 - 10.0),
        )
    }

    fn draw(
        &self,
        root: &DrawingArea<SVGBackend, Shift>,
        geometry: &WorldGeometry,
        projection: &Projection,
        counts: &CountryCounts,
    ) -> Result<Vec<HitRegion>> {
        let scale = CountScale::for_counts(counts.min_positive, counts.max_count);
        debug!(
            "map: {} countries, counts {}..{}, log scale: {}",
            counts.counts.len(),
            counts.min_positive,
            counts.max_count,
            scale.is_log()
        );

        let mut regions = Vec::new();
        for feature in &geometry.features {
            let count = counts.get(&feature.name);
            let fill = if count > 0 {
                palette::lerp_hsl(palette::MAP_LOW, palette::MAP_HIGH, scale.normalized(count))
            } else {
                palette::NEUTRAL_FILL
            };
            let fill = fill.to_plotters();

            let mut hit_rings: Vec<Vec<(f64, f64)>> = Vec::new();
            for part in &feature.parts {
                let ring: Vec<(f64, f64)> = part
                    .exterior
                    .iter()
                    .map(|(lon, lat)| projection.project(*lon, *lat))
                    .collect();
                let ring_px: Vec<(i32, i32)> =
                    ring.iter().map(|(x, y)| (*x as i32, *y as i32)).collect();
                root.draw(&Polygon::new(ring_px.clone(), fill.filled()))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;

                let mut border = ring_px;
                if let Some(first) = border.first().copied() {
                    border.push(first);
                }
                root.draw(&PathElement::new(border, WHITE.stroke_width(1)))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;

                hit_rings.push(ring);
                for hole in &part.holes {
                    hit_rings.push(
                        hole.iter()
                            .map(|(lon, lat)| projection.project(*lon, *lat))
                            .collect(),
                    );
                }
            }

            regions.push(HitRegion {
                key: feature.name.clone(),
                tooltip: format!("{}\n{}(ea)", feature.name, count),
                shape: HitShape::Polygon(hit_rings),
                highlight: Highlight {
                    opacity: 0.7,
                    stroke: Some(Rgb8::new(0, 0, 0)),
                },
            });
        }
        Ok(regions)
    }
}

impl ChartComponent for WorldMap {
    /// One-time setup: fetch the boundary dataset. A failed fetch is
    /// caught here; it disables choropleth rendering but is not an error.
    fn initialize(&mut self) -> Result<()> {
        debug!("map: initialize");
        match GeoClient::default().fetch_world(&self.geo_url) {
            Ok(world) => {
                self.projection = Projection::fit_extent(&world, self.extent());
                self.geometry = Some(world);
            }
            Err(e) => {
                warn!("map: geographic data unavailable: {e:#}");
                self.geometry = None;
                self.projection = None;
            }
        }
        Ok(())
    }

    fn update(&mut self, data: &[crate::models::Record]) -> Result<()> {
        debug!("map: update {} records", data.len());

        let counts = agg::country_error_counts(data);
        let path_string = self.out_path.to_string_lossy().into_owned();
        let root = SVGBackend::new(path_string.as_str(), (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let regions = match (self.geometry.as_ref(), self.projection.as_ref()) {
            (Some(geometry), Some(projection)) if !data.is_empty() && !counts.is_empty() => {
                self.draw(&root, geometry, projection, &counts)?
            }
            (Some(_), Some(_)) => {
                draw_no_data(&root, self.width, self.height, NO_DATA_MESSAGE)?;
                Vec::new()
            }
            _ => {
                draw_no_data(&root, self.width, self.height, GEO_UNAVAILABLE_MESSAGE)?;
                Vec::new()
            }
        };
        root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        self.hover.replace_regions(regions);
        Ok(())
    }
}
