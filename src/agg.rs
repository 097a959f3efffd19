//! Aggregation routines: turn raw records into chart-ready series.
//!
//! Each chart component recomputes its aggregate from scratch on every
//! update; nothing here carries state between calls. Keys are trimmed,
//! case-sensitive strings; records missing a required field are skipped.

use crate::models::Record;
use ahash::AHashMap;

/// One cell of the dense model × version matrix. Zero-count cells are
/// included: the matrix is a full cross-product, not a sparse set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixCell {
    pub model: String,
    pub version: String,
    pub count: u64,
    /// Index into `top_versions`.
    pub row: usize,
    /// Index into `top_models`.
    pub col: usize,
}

/// Result of the correlation aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationData {
    pub cells: Vec<MatrixCell>,
    /// Models ranked by total frequency, descending.
    pub top_models: Vec<String>,
    /// Versions ranked by total frequency, descending.
    pub top_versions: Vec<String>,
    pub max_count: u64,
}

impl CorrelationData {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Group records by `(model, modem_version)` and build the dense matrix.
/// Records missing either field are skipped.
pub fn correlation_matrix(records: &[Record]) -> CorrelationData {
    let mut pair_counts: AHashMap<(String, String), u64> = AHashMap::new();
    let mut model_counts: AHashMap<String, u64> = AHashMap::new();
    let mut version_counts: AHashMap<String, u64> = AHashMap::new();

    for r in records {
        if let (Some(model), Some(version)) = (r.model(), r.modem_version()) {
            let model = model.trim().to_string();
            let version = version.trim().to_string();
            *pair_counts.entry((model.clone(), version.clone())).or_default() += 1;
            *model_counts.entry(model).or_default() += 1;
            *version_counts.entry(version).or_default() += 1;
        }
    }

    if model_counts.is_empty() || version_counts.is_empty() {
        return CorrelationData::default();
    }

    let top_models = rank_by_count(model_counts);
    let top_versions = rank_by_count(version_counts);

    let mut cells = Vec::with_capacity(top_models.len() * top_versions.len());
    let mut max_count = 0u64;
    for (row, version) in top_versions.iter().enumerate() {
        for (col, model) in top_models.iter().enumerate() {
            let count = pair_counts
                .get(&(model.clone(), version.clone()))
                .copied()
                .unwrap_or(0);
            max_count = max_count.max(count);
            cells.push(MatrixCell {
                model: model.clone(),
                version: version.clone(),
                count,
                row,
                col,
            });
        }
    }

    CorrelationData {
        cells,
        top_models,
        top_versions,
        max_count,
    }
}

/// Sort keys by count descending; ties break alphabetically so ranking is
/// stable across runs.
fn rank_by_count(counts: AHashMap<String, u64>) -> Vec<String> {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().map(|(k, _)| k).collect()
}

/// Per-country error counts for the choropleth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCounts {
    pub counts: AHashMap<String, u64>,
    pub max_count: u64,
    /// Smallest count among countries with at least one error.
    pub min_positive: u64,
}

impl CountryCounts {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, country: &str) -> u64 {
        self.counts.get(country).copied().unwrap_or(0)
    }
}

/// Group records by PLMN country. Records without a country are skipped.
pub fn country_error_counts(records: &[Record]) -> CountryCounts {
    let mut counts: AHashMap<String, u64> = AHashMap::new();
    for r in records {
        if let Some(country) = r.country() {
            let country = country.trim();
            if !country.is_empty() {
                *counts.entry(country.to_string()).or_default() += 1;
            }
        }
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    let min_positive = counts
        .values()
        .copied()
        .filter(|c| *c > 0)
        .min()
        .unwrap_or(0);

    CountryCounts {
        counts,
        max_count,
        min_positive,
    }
}

/// One slice of the RAT breakdown. `percentage` is recomputed from the
/// current total on every aggregation, rounded to one decimal.
#[derive(Debug, Clone, PartialEq)]
pub struct RatSlice {
    pub rat: String,
    pub count: u64,
    pub percentage: f64,
}

/// Result of the RAT aggregation, slices sorted by count descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatBreakdown {
    pub slices: Vec<RatSlice>,
    pub total: u64,
}

impl RatBreakdown {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty() || self.total == 0
    }
}

/// Group records by radio-access-technology tag and derive percentages.
pub fn rat_breakdown(records: &[Record]) -> RatBreakdown {
    let mut counts: AHashMap<String, u64> = AHashMap::new();
    for r in records {
        if let Some(rat) = r.rat() {
            let rat = rat.trim();
            if !rat.is_empty() {
                *counts.entry(rat.to_string()).or_default() += 1;
            }
        }
    }

    let total: u64 = counts.values().sum();
    if total == 0 {
        return RatBreakdown::default();
    }

    let mut slices: Vec<RatSlice> = counts
        .into_iter()
        .map(|(rat, count)| RatSlice {
            rat,
            count,
            percentage: round1(100.0 * count as f64 / total as f64),
        })
        .collect();
    slices.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.rat.cmp(&b.rat)));

    RatBreakdown { slices, total }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Messages matching any of these literal prefixes are known noise
/// patterns, not errors, and are excluded from the word cloud.
pub const NOISE_PREFIXES: [&str; 4] = [
    "Assertion 0 failed",
    "Assertion (0) failed[",
    "Assertion 0 failed",
    "Assert[B_",
];

/// One word-cloud entry: a distinct trimmed message and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    pub count: u64,
}

/// Group records by exact trimmed message text, excluding the noise
/// prefixes. Entries come back sorted by count descending (ties
/// alphabetical) so downstream layout is deterministic.
pub fn message_counts(records: &[Record]) -> Vec<WordEntry> {
    let mut counts: AHashMap<String, u64> = AHashMap::new();
    for r in records {
        let Some(message) = r.error_message() else {
            continue;
        };
        let message = message.trim();
        if message.is_empty() {
            continue;
        }
        if NOISE_PREFIXES.iter().any(|p| message.starts_with(p)) {
            continue;
        }
        *counts.entry(message.to_string()).or_default() += 1;
    }

    let mut entries: Vec<WordEntry> = counts
        .into_iter()
        .map(|(text, count)| WordEntry { text, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    entries
}

/// Font scale heuristic for the word cloud: shrinks average glyph size as
/// vocabulary grows, keeping total ink roughly constant.
pub fn dynamic_font_scale(word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let base = if word_count > 1000 { 50.0 } else { 20.0 };
    base / (word_count as f64).sqrt()
}

/// Font size for one word: `sqrt(count) * scale`.
pub fn word_font_size(count: u64, scale: f64) -> f64 {
    (count as f64).sqrt() * scale
}
