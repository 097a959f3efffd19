//! Label measurement and truncation heuristics shared by the renderers.

/// Heuristic pixel width of a label (the SVG backend has no text measuring).
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px * 0.60
}

/// Maximum tick-label length for a band of the given pixel width: wider
/// bands earn longer labels, with a floor of 15 characters.
pub fn tick_label_limit(bandwidth: f64, divisor: f64) -> usize {
    15usize.max((bandwidth / divisor).floor() as usize)
}

/// Truncate to `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
