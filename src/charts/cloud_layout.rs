//! Deterministic word-cloud packing.
//!
//! Words are placed in the given order along a fixed Archimedean spiral
//! from the center outward, taking the first position whose bounding box
//! neither overlaps an already-placed word nor leaves the canvas. Zero
//! padding, no rotation. Words that exhaust the spiral are dropped.

use super::text::estimate_text_width_px;

/// Input to the layout: a word with its occurrence count and font size.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudWord {
    pub text: String,
    pub count: u64,
    pub size: f64,
}

/// A placed word. `x`/`y` are the text anchor (box center) relative to
/// the canvas center.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub count: u64,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedWord {
    fn overlaps(&self, other: &Self) -> bool {
        (self.x - other.x).abs() * 2.0 < self.width + other.width
            && (self.y - other.y).abs() * 2.0 < self.height + other.height
    }
}

const SPIRAL_STEP: f64 = 0.35;
const SPIRAL_GROWTH: f64 = 1.4;
const MAX_STEPS: usize = 4000;

/// Pack `words` into a `width` × `height` canvas centered at the origin.
pub fn layout(words: &[CloudWord], width: f64, height: f64) -> Vec<PlacedWord> {
    let mut placed: Vec<PlacedWord> = Vec::with_capacity(words.len());
    // Spread the spiral horizontally on wide canvases.
    let aspect = if height > 0.0 { width / height } else { 1.0 };

    for word in words {
        if word.size <= 0.0 {
            continue;
        }
        let box_w = estimate_text_width_px(&word.text, word.size);
        let box_h = word.size;
        if box_w > width || box_h > height {
            continue;
        }

        let mut candidate = PlacedWord {
            text: word.text.clone(),
            count: word.count,
            size: word.size,
            x: 0.0,
            y: 0.0,
            width: box_w,
            height: box_h,
        };

        for step in 0..MAX_STEPS {
            let t = step as f64 * SPIRAL_STEP;
            let r = SPIRAL_GROWTH * t;
            candidate.x = r * t.cos() * aspect;
            candidate.y = r * t.sin();

            if !fits_canvas(&candidate, width, height) {
                continue;
            }
            if placed.iter().any(|p| candidate.overlaps(p)) {
                continue;
            }
            placed.push(candidate);
            break;
        }
    }
    placed
}

fn fits_canvas(word: &PlacedWord, width: f64, height: f64) -> bool {
    word.x - word.width / 2.0 >= -width / 2.0
        && word.x + word.width / 2.0 <= width / 2.0
        && word.y - word.height / 2.0 >= -height / 2.0
        && word.y + word.height / 2.0 <= height / 2.0
}
