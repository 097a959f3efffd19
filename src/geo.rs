//! Geographic boundary data for the choropleth: a blocking HTTP client
//! fetching world-country GeoJSON, tolerant parsing into polygon rings,
//! and the Equal Earth projection used to place them on screen.
//!
//! The fetch happens once at map initialization. Failure is caught by the
//! caller and degrades the map to a permanent "unavailable" placeholder;
//! there is no retry path beyond the small transient-error backoff below.

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// Default world boundary dataset (GeoJSON FeatureCollection with a
/// `name` property per country).
pub const DEFAULT_WORLD_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/johan/world.geo.json/master/countries.geo.json";

/// One polygon part: an exterior ring plus optional holes, in
/// `(longitude, latitude)` degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRings {
    pub exterior: Vec<(f64, f64)>,
    pub holes: Vec<Vec<(f64, f64)>>,
}

/// One country outline.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    pub name: String,
    pub parts: Vec<PolygonRings>,
}

/// Parsed world boundary dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldGeometry {
    pub features: Vec<CountryFeature>,
}

impl WorldGeometry {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Blocking client for the one-time boundary-data fetch.
#[derive(Debug, Clone)]
pub struct GeoClient {
    http: HttpClient,
}

impl Default for GeoClient {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("errdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        GeoClient { http }
    }
}

impl GeoClient {
    /// Fetch and parse the world boundary dataset.
    pub fn fetch_world(&self, url: &str) -> Result<WorldGeometry> {
        let value = self
            .get_json(url)
            .with_context(|| format!("GET {url}"))?;
        parse_world_geojson(&value)
    }

    /// GET with a small retry for transient failures (5xx / network errors).
    fn get_json(&self, url: &str) -> Result<Value> {
        let mut last_err: Option<anyhow::Error> = None;
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    return r.json().context("decode json");
                }
                Ok(r) if r.status().is_server_error() => { /* retry */ }
                Ok(r) => bail!("request failed with HTTP {}", r.status()),
                Err(e) => last_err = Some(e.into()),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        bail!("network error: {:?}", last_err);
    }
}

/// Parse a GeoJSON FeatureCollection into country outlines.
///
/// Individual malformed features are skipped rather than failing the whole
/// dataset; only a structurally wrong top level is an error.
pub fn parse_world_geojson(value: &Value) -> Result<WorldGeometry> {
    let features = value
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow::anyhow!("unexpected response shape: no features array"))?;

    let mut out = Vec::with_capacity(features.len());
    let mut skipped = 0usize;
    for feature in features {
        match parse_feature(feature) {
            Some(f) => out.push(f),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("geo: skipped {skipped} malformed features");
    }
    Ok(WorldGeometry { features: out })
}

fn parse_feature(feature: &Value) -> Option<CountryFeature> {
    let name = feature
        .get("properties")?
        .get("name")?
        .as_str()?
        .to_string();
    let geometry = feature.get("geometry")?;
    let coords = geometry.get("coordinates")?;

    let parts = match geometry.get("type")?.as_str()? {
        "Polygon" => vec![parse_polygon(coords)?],
        "MultiPolygon" => coords
            .as_array()?
            .iter()
            .filter_map(parse_polygon)
            .collect(),
        _ => return None,
    };
    if parts.is_empty() {
        return None;
    }
    Some(CountryFeature { name, parts })
}

fn parse_polygon(coords: &Value) -> Option<PolygonRings> {
    let rings = coords.as_array()?;
    let mut parsed: Vec<Vec<(f64, f64)>> = rings.iter().filter_map(parse_ring).collect();
    if parsed.is_empty() {
        return None;
    }
    let exterior = parsed.remove(0);
    Some(PolygonRings {
        exterior,
        holes: parsed,
    })
}

fn parse_ring(ring: &Value) -> Option<Vec<(f64, f64)>> {
    let points = ring.as_array()?;
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        let pair = p.as_array()?;
        let lon = pair.first()?.as_f64()?;
        let lat = pair.get(1)?.as_f64()?;
        out.push((lon, lat));
    }
    if out.len() < 3 { None } else { Some(out) }
}

// Equal Earth projection coefficients (Šavrič, Patterson, Jenny 2018).
const A1: f64 = 1.340264;
const A2: f64 = -0.081106;
const A3: f64 = 0.000893;
const A4: f64 = 0.003796;

/// Raw Equal Earth projection of `(longitude, latitude)` in radians.
/// Returns math coordinates (y grows north).
fn equal_earth_raw(lon: f64, lat: f64) -> (f64, f64) {
    let m = (3.0f64).sqrt() / 2.0;
    let theta = (m * lat.sin()).asin();
    let t2 = theta * theta;
    let t6 = t2 * t2 * t2;
    let x = lon * theta.cos() / (m * (A1 + 3.0 * A2 * t2 + t6 * (7.0 * A3 + 9.0 * A4 * t2)));
    let y = theta * (A1 + A2 * t2 + t6 * (A3 + A4 * t2));
    (x, y)
}

/// Equal Earth projection fitted to a screen extent (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    k: f64,
    tx: f64,
    ty: f64,
}

impl Projection {
    /// Fit the projected geometry into `[(x0, y0), (x1, y1)]`, preserving
    /// aspect ratio and centering. Returns `None` for empty geometry.
    pub fn fit_extent(geometry: &WorldGeometry, extent: ((f64, f64), (f64, f64))) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        let mut visit = |ring: &[(f64, f64)]| {
            for (lon, lat) in ring {
                let (x, y) = equal_earth_raw(lon.to_radians(), lat.to_radians());
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        };
        for feature in &geometry.features {
            for part in &feature.parts {
                visit(&part.exterior);
                for hole in &part.holes {
                    visit(hole);
                }
            }
        }
        if !min_x.is_finite() || max_x <= min_x || max_y <= min_y {
            return None;
        }

        let ((ex0, ey0), (ex1, ey1)) = extent;
        let ew = ex1 - ex0;
        let eh = ey1 - ey0;
        let bw = max_x - min_x;
        let bh = max_y - min_y;
        let k = (ew / bw).min(eh / bh);

        // Center the fitted bounds; screen y is flipped.
        let tx = ex0 + (ew - k * bw) / 2.0 - k * min_x;
        let ty = ey0 + (eh - k * bh) / 2.0 + k * max_y;
        Some(Projection { k, tx, ty })
    }

    /// Project `(longitude, latitude)` in degrees to screen coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = equal_earth_raw(lon.to_radians(), lat.to_radians());
        (self.tx + self.k * x, self.ty - self.k * y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square_feature(name: &str, cx: f64, cy: f64) -> Value {
        let d = 5.0;
        json!({
            "type": "Feature",
            "properties": {"name": name},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [cx - d, cy - d], [cx + d, cy - d],
                    [cx + d, cy + d], [cx - d, cy + d], [cx - d, cy - d]
                ]]
            }
        })
    }

    #[test]
    fn parses_feature_collection_and_skips_malformed() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                square_feature("Alpha", 0.0, 0.0),
                {"type": "Feature", "properties": {}, "geometry": null},
                {"type": "Feature", "properties": {"name": "Point"},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            ]
        });
        let world = parse_world_geojson(&value).unwrap();
        assert_eq!(world.features.len(), 1);
        assert_eq!(world.features[0].name, "Alpha");
        assert_eq!(world.features[0].parts[0].exterior.len(), 5);
    }

    #[test]
    fn rejects_non_feature_collection() {
        assert!(parse_world_geojson(&json!({"hello": 1})).is_err());
        assert!(parse_world_geojson(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn multipolygon_keeps_all_parts() {
        let value = json!({
            "features": [{
                "type": "Feature",
                "properties": {"name": "Twin"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                        [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]]
                    ]
                }
            }]
        });
        let world = parse_world_geojson(&value).unwrap();
        assert_eq!(world.features[0].parts.len(), 2);
    }

    #[test]
    fn projection_fits_geometry_into_extent() {
        let value = json!({
            "features": [
                square_feature("West", -90.0, 0.0),
                square_feature("East", 90.0, 40.0),
            ]
        });
        let world = parse_world_geojson(&value).unwrap();
        let extent = ((10.0, 50.0), (990.0, 440.0));
        let proj = Projection::fit_extent(&world, extent).unwrap();

        for feature in &world.features {
            for part in &feature.parts {
                for (lon, lat) in &part.exterior {
                    let (x, y) = proj.project(*lon, *lat);
                    assert!((9.9..=990.1).contains(&x), "x = {x}");
                    assert!((49.9..=440.1).contains(&y), "y = {y}");
                }
            }
        }
    }

    #[test]
    fn projection_flips_latitude_to_screen_y() {
        let value = json!({
            "features": [square_feature("Alpha", 0.0, 0.0)]
        });
        let world = parse_world_geojson(&value).unwrap();
        let proj = Projection::fit_extent(&world, ((0.0, 0.0), (100.0, 100.0))).unwrap();
        let (_, y_north) = proj.project(0.0, 5.0);
        let (_, y_south) = proj.project(0.0, -5.0);
        assert!(y_north < y_south);
    }

    #[test]
    fn empty_geometry_has_no_projection() {
        assert!(Projection::fit_extent(&WorldGeometry::default(), ((0.0, 0.0), (1.0, 1.0))).is_none());
    }
}
