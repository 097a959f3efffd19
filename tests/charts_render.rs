use errdash::charts::{ChartComponent, CorrelationMatrix, PieChart, WordCloud, WorldMap};
use errdash::geo::parse_world_geojson;
use errdash::interact::{PointerEvent, shared_tooltip};
use errdash::models::{Context, ErrorInfo, Metadata, Plmn, Record};
use serde_json::json;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tempfile::tempdir;

fn record(
    model: &str,
    version: &str,
    country: &str,
    rat: &str,
    message: &str,
) -> Record {
    Record {
        metadata: Some(Metadata {
            model: Some(model.to_string()),
            modem_version: Some(version.to_string()),
        }),
        context: Some(Context {
            plmn: Some(Plmn {
                country: Some(country.to_string()),
            }),
            rat: Some(rat.to_string()),
        }),
        error: Some(ErrorInfo {
            error_message: Some(message.to_string()),
        }),
    }
}

fn sample_records() -> Vec<Record> {
    vec![
        record("X100", "1.0", "Alpha", "LTE", "RLC timeout"),
        record("X100", "1.0", "Alpha", "LTE", "RLC timeout"),
        record("X100", "2.0", "Beta", "5G", "MAC stall"),
        record("Y200", "1.0", "Beta", "LTE", "PDCP drop"),
        record("Y200", "2.0", "Alpha", "NR", "MAC stall"),
    ]
}

fn sample_world() -> errdash::geo::WorldGeometry {
    let value = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Alpha"},
                "geometry": {"type": "Polygon", "coordinates": [[
                    [-30.0, -20.0], [30.0, -20.0], [30.0, 20.0], [-30.0, 20.0], [-30.0, -20.0]
                ]]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Beta"},
                "geometry": {"type": "Polygon", "coordinates": [[
                    [60.0, 10.0], [100.0, 10.0], [100.0, 45.0], [60.0, 45.0], [60.0, 10.0]
                ]]}
            }
        ]
    });
    parse_world_geojson(&value).unwrap()
}

#[test]
fn correlation_renders_svg_with_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("correlation.svg");
    let mut chart = CorrelationMatrix::new(&path, shared_tooltip());
    chart.initialize().unwrap();
    chart.update(&sample_records()).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.len() > 0);
    assert!(svg.contains("X100"));
    assert!(!svg.contains("No data available"));
    assert!(!chart.hover().regions().is_empty());
}

#[test]
fn correlation_placeholder_on_empty_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("correlation.svg");
    let mut chart = CorrelationMatrix::new(&path, shared_tooltip());
    chart.initialize().unwrap();
    chart.update(&[]).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("No data available. Check your filter conditions"));
    assert!(chart.hover().regions().is_empty());
}

#[test]
fn correlation_rerender_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("correlation.svg");
    let mut chart = CorrelationMatrix::new(&path, shared_tooltip());
    chart.initialize().unwrap();
    let records = sample_records();
    chart.update(&records).unwrap();
    let first = fs::read(&path).unwrap();
    chart.update(&records).unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn correlation_hover_shows_tooltip() {
    let dir = tempdir().unwrap();
    let tooltip = shared_tooltip();
    let mut chart = CorrelationMatrix::new(dir.path().join("c.svg"), Rc::clone(&tooltip));
    chart.initialize().unwrap();
    chart.update(&sample_records()).unwrap();

    // Probe the center of the first cell's hit rectangle.
    let (cx, cy, expected) = {
        let region = &chart.hover().regions()[0];
        let errdash::interact::HitShape::Rect { x0, y0, x1, y1 } = &region.shape else {
            panic!("correlation regions are rectangles");
        };
        ((x0 + x1) / 2.0, (y0 + y1) / 2.0, region.tooltip.clone())
    };
    chart
        .hover_mut()
        .pointer_moved(PointerEvent { x: cx, y: cy })
        .unwrap();
    let t = tooltip.borrow();
    assert!(t.visible);
    assert_eq!(t.text, expected);
    assert!(t.text.contains("(ea)"));
}

#[test]
fn pie_renders_labels_and_legend() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pie.svg");
    let mut chart = PieChart::new(&path, shared_tooltip());
    chart.initialize().unwrap();
    chart.update(&sample_records()).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    // LTE has 2 of 5 records: 40.0%, above the 3% label threshold.
    assert!(svg.contains("40.0%"));
    assert!(svg.contains("LTE (2)"));
    assert!(svg.contains("Total: 5"));
}

#[test]
fn pie_placeholder_when_no_rat_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pie.svg");
    let mut chart = PieChart::new(&path, shared_tooltip());
    chart.initialize().unwrap();
    chart.update(&[Record::default()]).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("No data available"));
}

#[test]
fn map_without_geometry_shows_unavailable_placeholder() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("map.svg");
    // No initialize: geometry was never fetched.
    let mut chart = WorldMap::new(&path, shared_tooltip());
    chart.update(&sample_records()).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("GEOJSON data is not available"));
}

#[test]
fn map_with_injected_geometry_renders_choropleth() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("map.svg");
    let mut chart = WorldMap::new(&path, shared_tooltip());
    chart.set_geometry(sample_world());
    assert!(chart.has_geometry());
    chart.update(&sample_records()).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(!svg.contains("GEOJSON data is not available"));
    assert_eq!(chart.hover().regions().len(), 2);
    // Alpha has 3 errors, Beta 2.
    let alpha = chart
        .hover()
        .regions()
        .iter()
        .find(|r| r.key == "Alpha")
        .unwrap();
    assert_eq!(alpha.tooltip, "Alpha\n3(ea)");
}

#[test]
fn map_with_geometry_but_empty_data_shows_no_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("map.svg");
    let mut chart = WorldMap::new(&path, shared_tooltip());
    chart.set_geometry(sample_world());
    chart.update(&[]).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("No data available"));
}

#[test]
fn wordcloud_renders_and_dispatches_click() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wordcloud.svg");
    let mut chart = WordCloud::new(&path, shared_tooltip());
    chart.initialize().unwrap();

    let clicked: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicked);
    chart.on("click", move |_event, word| {
        sink.borrow_mut().push(word.text.clone());
    });

    chart.update(&sample_records()).unwrap();
    assert!(!chart.placed_words().is_empty());

    // The most frequent message is placed first, at the canvas center.
    let first = chart.placed_words()[0].clone();
    assert_eq!(first.text, "MAC stall");
    let hit = chart.click(PointerEvent {
        x: 500.0 + first.x,
        y: 225.0 + first.y,
    });
    assert_eq!(hit.as_deref(), Some("MAC stall"));
    assert_eq!(clicked.borrow().as_slice(), ["MAC stall".to_string()]);

    // A click on empty canvas dispatches nothing.
    let miss = chart.click(PointerEvent { x: 1.0, y: 1.0 });
    assert_eq!(miss, None);
    assert_eq!(clicked.borrow().len(), 1);
}

#[test]
fn wordcloud_excludes_noise_and_handles_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wordcloud.svg");
    let mut chart = WordCloud::new(&path, shared_tooltip());
    chart.initialize().unwrap();

    let noise: Vec<Record> = vec![
        Record {
            error: Some(ErrorInfo {
                error_message: Some("Assertion 0 failed at mac.c:42".into()),
            }),
            ..Record::default()
        };
        3
    ];
    chart.update(&noise).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("No data available"));
    assert!(chart.placed_words().is_empty());
}
