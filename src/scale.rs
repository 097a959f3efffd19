//! Scale and layout derivation: discrete band scales, continuous count
//! scales with log→linear fallback, and the pie angle partition.

use thiserror::Error;

/// Raised when a scale cannot be constructed from its domain.
#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    /// Log scales need a strictly positive, non-collapsed domain.
    #[error("degenerate domain [{min}, {max}] for log scale")]
    DegenerateDomain { min: f64, max: f64 },
}

/// Discrete categories mapped to contiguous pixel bands with padding.
///
/// Uses the conventional band arithmetic: with `n` categories and padding
/// `p` applied both between and outside bands,
/// `step = span / (n + p)`, `bandwidth = step * (1 - p)`, and the first
/// band starts so that the whole block is centered in the range.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = domain.len();
        let span = range.1 - range.0;
        let (start, step, bandwidth) = if n == 0 {
            (range.0, 0.0, 0.0)
        } else {
            let step = span / (n as f64 + padding);
            let bandwidth = step * (1.0 - padding);
            let start = range.0 + (span - step * (n as f64 - padding)) / 2.0;
            (start, step, bandwidth)
        };
        BandScale {
            domain,
            start,
            step,
            bandwidth,
        }
    }

    /// Leading edge of the band for `key`, if it is in the domain.
    pub fn position(&self, key: &str) -> Option<f64> {
        let idx = self.domain.iter().position(|d| d == key)?;
        Some(self.start + self.step * idx as f64)
    }

    /// Leading edge of the band at `idx`.
    pub fn position_at(&self, idx: usize) -> f64 {
        self.start + self.step * idx as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }
}

/// Plain linear interpolation from a value domain onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    min: f64,
    max: f64,
}

impl LinearScale {
    pub fn new(min: f64, max: f64) -> Self {
        LinearScale { min, max }
    }

    /// Normalized position of `v` in the domain, clamped to `[0, 1]`.
    /// A collapsed domain maps everything to 1.0 (single-valued data is
    /// drawn at full intensity).
    pub fn normalized(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 1.0;
        }
        ((v - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Logarithmic normalization over a strictly positive domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    log_min: f64,
    log_max: f64,
}

impl LogScale {
    pub fn new(min: f64, max: f64) -> Result<Self, ScaleError> {
        if min <= 0.0 || max <= 0.0 || (max - min).abs() < f64::EPSILON || max < min {
            return Err(ScaleError::DegenerateDomain { min, max });
        }
        Ok(LogScale {
            log_min: min.ln(),
            log_max: max.ln(),
        })
    }

    /// Normalized position of `v` in log space, clamped to `[0, 1]`.
    pub fn normalized(&self, v: f64) -> f64 {
        if v <= 0.0 {
            return 0.0;
        }
        ((v.ln() - self.log_min) / (self.log_max - self.log_min)).clamp(0.0, 1.0)
    }
}

/// Count-to-intensity scale for the choropleth: logarithmic from the
/// smallest positive count to the maximum, falling back to linear when the
/// log scale cannot be constructed (all counts equal, or no positive
/// counts at all).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountScale {
    Log(LogScale),
    Linear(LinearScale),
}

impl CountScale {
    pub fn for_counts(min_positive: u64, max_count: u64) -> Self {
        let min = (min_positive.max(1)) as f64;
        let max = max_count as f64;
        match LogScale::new(min, max) {
            Ok(log) => CountScale::Log(log),
            Err(_) => CountScale::Linear(LinearScale::new(min_positive as f64, max)),
        }
    }

    pub fn normalized(&self, count: u64) -> f64 {
        match self {
            CountScale::Log(s) => s.normalized(count as f64),
            CountScale::Linear(s) => s.normalized(count as f64),
        }
    }

    pub fn is_log(&self) -> bool {
        matches!(self, CountScale::Log(_))
    }
}

/// One angular slice of a pie partition. Angles are measured clockwise
/// from twelve o'clock, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieAngle {
    pub start: f64,
    pub end: f64,
}

impl PieAngle {
    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Centroid of the wedge at radius `r`, relative to the pie center,
    /// in screen coordinates (y grows downward).
    pub fn centroid(&self, r: f64) -> (f64, f64) {
        let a = self.mid();
        (a.sin() * r, -a.cos() * r)
    }
}

/// Partition the full circle proportionally to `values`, in the given
/// order. Zero-valued entries receive zero-width slices.
pub fn pie_partition(values: &[u64]) -> Vec<PieAngle> {
    let total: u64 = values.iter().sum();
    if total == 0 {
        return values.iter().map(|_| PieAngle { start: 0.0, end: 0.0 }).collect();
    }
    let full = std::f64::consts::TAU;
    let mut angle = 0.0f64;
    values
        .iter()
        .map(|v| {
            let sweep = full * (*v as f64) / (total as f64);
            let slice = PieAngle {
                start: angle,
                end: angle + sweep,
            };
            angle += sweep;
            slice
        })
        .collect()
}
