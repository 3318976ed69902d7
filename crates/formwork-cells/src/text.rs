use formwork_core::Size;
use unicode_segmentation::UnicodeSegmentation;

/// Average glyph advance as a fraction of the font size.
pub const ADVANCE_EM: f32 = 0.55;
pub const LINE_HEIGHT_EM: f32 = 1.2;
pub const ELLIPSIS: &str = "…";

/// Single-line size estimate: one advance per grapheme cluster.
pub fn measure_text(text: &str, font_px: f32) -> Size {
    if text.is_empty() {
        return Size::ZERO;
    }
    let graphemes = text.graphemes(true).count() as f32;
    Size::new(graphemes * font_px * ADVANCE_EM, font_px * LINE_HEIGHT_EM)
}

/// Shortens `text` to fit `max_width`, ending in an ellipsis when anything was cut.
///
/// Returns an empty string when not even the ellipsis fits.
pub fn truncate_to_width(text: &str, font_px: f32, max_width: f32) -> String {
    if measure_text(text, font_px).width <= max_width + 0.01 {
        return text.to_string();
    }
    let advance = font_px * ADVANCE_EM;
    if advance <= 0.0 || max_width < advance {
        return String::new();
    }
    // one advance is reserved for the ellipsis
    let keep = ((max_width / advance).floor() as usize).saturating_sub(1);
    let mut out: String = text.graphemes(true).take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
