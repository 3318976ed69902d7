pub use crate::color::Color;
pub use crate::error::HierarchyError;
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::hierarchy::{Hierarchy, NodeId, ResponderTree};
pub use crate::locals::{
    ContentSizeCategory, TextScale, Theme, preferred_content_size, scaled_font_px,
    set_preferred_content_size, text_scale, theme, with_text_scale, with_theme,
};
pub use crate::notify::{Notification, Subscription, post, subscribe, subscriber_count};
