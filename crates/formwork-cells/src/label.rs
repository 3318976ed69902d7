use formwork_core::{Color, Rect, Size};

use crate::constraints::Priority;
use crate::text::{measure_text, truncate_to_width};

/// One text slot of a cell (title or detail).
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSlot {
    pub text: Option<String>,
    /// `text` after truncation to `frame`; equals `text` when it fits.
    pub visible_text: Option<String>,
    pub color: Color,
    pub font_px: f32,
    pub frame: Rect,
    pub hugging: Priority,
    pub compression_resistance: Priority,
}

impl LabelSlot {
    /// Gives way first under compression.
    pub fn title() -> Self {
        Self::with_priorities(Priority::LOW, Priority(500))
    }

    pub fn detail() -> Self {
        Self::with_priorities(Priority(251), Priority::HIGH)
    }

    fn with_priorities(hugging: Priority, compression_resistance: Priority) -> Self {
        Self {
            text: None,
            visible_text: None,
            color: Color::TRANSPARENT,
            font_px: 0.0,
            frame: Rect::ZERO,
            hugging,
            compression_resistance,
        }
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.visible_text = None;
    }

    pub fn set_text(&mut self, text: Option<String>, color: Color) {
        self.visible_text = text.clone();
        self.text = text;
        self.color = color;
    }

    pub fn intrinsic_size(&self) -> Size {
        self.text
            .as_deref()
            .map(|t| measure_text(t, self.font_px))
            .unwrap_or(Size::ZERO)
    }

    /// Places the slot and re-derives `visible_text` for the new width.
    pub fn apply_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.visible_text = self
            .text
            .as_deref()
            .map(|t| truncate_to_width(t, self.font_px, frame.w));
    }

    pub fn is_truncated(&self) -> bool {
        self.text != self.visible_text
    }
}
