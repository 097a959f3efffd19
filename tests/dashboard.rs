use errdash::Dashboard;
use errdash::geo::parse_world_geojson;
use errdash::models::{Context, FilterField, Metadata, Plmn, Record};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn record(country: &str, model: &str, rat: &str, message: &str) -> Record {
    Record {
        metadata: Some(Metadata {
            model: Some(model.to_string()),
            modem_version: Some("1.0".to_string()),
        }),
        context: Some(Context {
            plmn: Some(Plmn {
                country: Some(country.to_string()),
            }),
            rat: Some(rat.to_string()),
        }),
        error: Some(errdash::models::ErrorInfo {
            error_message: Some(message.to_string()),
        }),
    }
}

fn fixture() -> Vec<Record> {
    vec![
        record("Alpha", "X100", "LTE", "RLC timeout"),
        record("Alpha", "X100", "LTE", "RLC timeout"),
        record("Beta", "Y200", "5G", "MAC stall"),
    ]
}

#[test]
fn load_renders_all_charts() {
    let dir = tempdir().unwrap();
    let mut dashboard = Dashboard::new(dir.path());
    dashboard.initialize(false).unwrap();
    dashboard.load(fixture()).unwrap();

    for name in ["correlation.svg", "map.svg", "pie.svg", "wordcloud.svg"] {
        let path = dir.path().join(name);
        assert!(path.exists(), "{name} missing");
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
    // No geography fetch happened: the map degrades to its placeholder.
    let map_svg = fs::read_to_string(dir.path().join("map.svg")).unwrap();
    assert!(map_svg.contains("GEOJSON data is not available"));
}

#[test]
fn filters_propagate_to_every_chart() {
    let dir = tempdir().unwrap();
    let mut dashboard = Dashboard::new(dir.path());
    dashboard.initialize(false).unwrap();

    let world = parse_world_geojson(&json!({
        "features": [{
            "type": "Feature",
            "properties": {"name": "Alpha"},
            "geometry": {"type": "Polygon", "coordinates": [[
                [-10.0, -10.0], [10.0, -10.0], [10.0, 10.0], [-10.0, 10.0], [-10.0, -10.0]
            ]]}
        }]
    }))
    .unwrap();
    dashboard.map_mut().set_geometry(world);

    dashboard.load(fixture()).unwrap();
    let pie_all = fs::read_to_string(dir.path().join("pie.svg")).unwrap();
    assert!(pie_all.contains("Total: 3"));

    dashboard.set_filter(FilterField::Country, "Alpha").unwrap();
    let pie_filtered = fs::read_to_string(dir.path().join("pie.svg")).unwrap();
    assert!(pie_filtered.contains("Total: 2"));
    let cloud = fs::read_to_string(dir.path().join("wordcloud.svg")).unwrap();
    assert!(cloud.contains("RLC timeout"));
    assert!(!cloud.contains("MAC stall"));

    let stats = dashboard.filter_panel().get_filter_stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.filtered, 2);

    dashboard.clear_filters().unwrap();
    let pie_cleared = fs::read_to_string(dir.path().join("pie.svg")).unwrap();
    assert!(pie_cleared.contains("Total: 3"));
}

#[test]
fn filtering_everything_out_renders_placeholders() {
    let dir = tempdir().unwrap();
    let mut dashboard = Dashboard::new(dir.path());
    dashboard.initialize(false).unwrap();
    dashboard.load(fixture()).unwrap();
    dashboard.set_filter(FilterField::Model, "X100").unwrap();
    dashboard.set_filter(FilterField::Country, "Beta").unwrap();

    // No record is both Beta and X100.
    for name in ["correlation.svg", "pie.svg", "wordcloud.svg"] {
        let svg = fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(
            svg.contains("No data available. Check your filter conditions"),
            "{name} should show the placeholder"
        );
    }
}
