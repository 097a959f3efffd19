use crate::models::Record;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Load records from a JSON array file.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let records: Vec<Record> =
        serde_json::from_reader(BufReader::new(file)).context("parse records json")?;
    Ok(records)
}

/// Save records as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save records as flattened CSV with header (one row per record, empty
/// cells for missing fields).
pub fn save_csv<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("model", "modem_version", "country", "rat", "error_message"))?;
    for r in records {
        wtr.serialize((
            r.model(),
            r.modem_version(),
            r.country(),
            r.rat(),
            r.error_message(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorInfo, Metadata, Record};
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json_then_reload() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let records = vec![Record {
            metadata: Some(Metadata {
                model: Some("X100".into()),
                modem_version: Some("1.0".into()),
            }),
            context: None,
            error: Some(ErrorInfo {
                error_message: Some("RLC timeout".into()),
            }),
        }];
        save_csv(&records, &csvp).unwrap();
        save_json(&records, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());

        let reloaded = load_records(&jsonp).unwrap();
        assert_eq!(reloaded, records);
    }

    #[test]
    fn load_tolerates_partial_records() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("partial.json");
        std::fs::write(
            &p,
            r#"[{"metadata":{"model":"A"}}, {}, {"context":{"rat":"LTE"}}]"#,
        )
        .unwrap();
        let records = load_records(&p).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].model(), Some("A"));
        assert_eq!(records[0].modem_version(), None);
        assert_eq!(records[2].rat(), Some("LTE"));
    }

    #[test]
    fn load_rejects_non_array() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("bad.json");
        std::fs::write(&p, r#"{"not":"an array"}"#).unwrap();
        assert!(load_records(&p).is_err());
    }
}
