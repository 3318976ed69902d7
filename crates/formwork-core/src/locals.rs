//! # Theming and locals
//!
//! Formwork reads global UI parameters from thread‑local “locals”:
//!
//! - `Theme` — text colors used by cells (normal, muted, detail).
//! - `TextScale` — extra text scaling applied on top of the preferred content
//!   size, scoped to a closure.
//! - `ContentSizeCategory` — the user's preferred text size. Unlike the scoped
//!   locals this is a single per‑thread preference; changing it posts
//!   `Notification::ContentSizeCategoryChanged`.
//!
//! ```rust
//! use formwork_core::*;
//!
//! let light = Theme {
//!     text: Color::from_hex("#111111"),
//!     muted_text: Color::from_hex("#9E9E9E"),
//!     ..Theme::default()
//! };
//!
//! with_theme(light, || {
//!     assert_eq!(theme().text, Color::from_hex("#111111"));
//! });
//! ```

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::Color;
use crate::notify::{self, Notification};

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
    static PREFERRED_CONTENT_SIZE: Cell<ContentSizeCategory> = const { Cell::new(ContentSizeCategory::Large) };
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // pops on unwind too
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        } else {
            let mut m = HashMap::new();
            m.insert(t, v);
            st.borrow_mut().push(m);
        }
    });
}

fn local_or_default<T: Copy + Default + 'static>() -> T {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return *t;
            }
        }
        T::default()
    })
}

/// Colors read by cells when rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Title text of enabled rows.
    pub text: Color,
    /// Title text of disabled rows.
    pub muted_text: Color,
    /// Value text in the detail slot.
    pub detail_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::from_hex("#DDDDDD"),
            muted_text: Color::from_hex("#777777"),
            detail_text: Color::from_hex("#AAAAAA"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextScale(pub f32);
impl Default for TextScale {
    fn default() -> Self {
        Self(1.0)
    }
}

/// User preference for text size, from smallest to largest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentSizeCategory {
    ExtraSmall,
    Small,
    Medium,
    #[default]
    Large,
    ExtraLarge,
    ExtraExtraLarge,
    ExtraExtraExtraLarge,
}

impl ContentSizeCategory {
    /// Multiplier applied to base font sizes. `Large` is the reference size.
    pub fn scale(self) -> f32 {
        match self {
            ContentSizeCategory::ExtraSmall => 0.82,
            ContentSizeCategory::Small => 0.88,
            ContentSizeCategory::Medium => 0.94,
            ContentSizeCategory::Large => 1.0,
            ContentSizeCategory::ExtraLarge => 1.12,
            ContentSizeCategory::ExtraExtraLarge => 1.24,
            ContentSizeCategory::ExtraExtraExtraLarge => 1.35,
        }
    }
}

pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Theme>(), Box::new(theme));
        f()
    })
}

pub fn with_text_scale<R>(ts: TextScale, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<TextScale>(), Box::new(ts));
        f()
    })
}

pub fn theme() -> Theme {
    local_or_default::<Theme>()
}

pub fn text_scale() -> TextScale {
    local_or_default::<TextScale>()
}

pub fn preferred_content_size() -> ContentSizeCategory {
    PREFERRED_CONTENT_SIZE.with(|c| c.get())
}

/// Changes the preferred content size and notifies subscribers.
///
/// Setting the current value again is a no-op and posts nothing.
pub fn set_preferred_content_size(category: ContentSizeCategory) {
    let previous = PREFERRED_CONTENT_SIZE.with(|c| c.replace(category));
    if previous == category {
        return;
    }
    log::debug!("preferred content size {previous:?} -> {category:?}");
    notify::post(Notification::ContentSizeCategoryChanged);
}

/// Font size in px for a base size, after content size and text scale.
pub fn scaled_font_px(base_px: f32) -> f32 {
    base_px * preferred_content_size().scale() * text_scale().0
}
