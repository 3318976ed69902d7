//! `TypedCell<V>`: the binding between one `Row<V>` and its two label slots.

use std::any::type_name;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::{Rc, Weak};

use formwork_core::{
    Color, Hierarchy, Notification, Rect, Subscription, notify, scaled_font_px, theme,
};

use crate::cell::{CellCore, CellFlags, UntypedCell};
use crate::focus::{self, FocusLossHook};
use crate::constraints::{CellMetrics, Compression, Constraint, ConstraintManager, LayoutMode, SlotFrames};
use crate::error::LayoutError;
use crate::label::LabelSlot;
use crate::row::{BaseRow, Row, RowRef};

/// Pre-built slots for a cell instantiated from a layout template.
///
/// Frames are final: the cell never computes constraints for them.
#[derive(Clone, Debug)]
pub struct CellTemplate {
    pub title: LabelSlot,
    pub detail: LabelSlot,
    pub metrics: CellMetrics,
}

impl CellTemplate {
    pub fn new(title_frame: Rect, detail_frame: Rect) -> Self {
        let mut title = LabelSlot::title();
        title.frame = title_frame;
        let mut detail = LabelSlot::detail();
        detail.frame = detail_frame;
        Self {
            title,
            detail,
            metrics: CellMetrics::default(),
        }
    }
}

/// Plain copy of what a cell currently shows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotSnapshot {
    pub text: Option<String>,
    pub visible_text: Option<String>,
    pub color: Color,
    pub font_px: f32,
    pub frame: Rect,
}

impl From<&LabelSlot> for SlotSnapshot {
    fn from(slot: &LabelSlot) -> Self {
        Self {
            text: slot.text.clone(),
            visible_text: slot.visible_text.clone(),
            color: slot.color,
            font_px: slot.font_px,
            frame: slot.frame,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellSnapshot {
    pub title: SlotSnapshot,
    pub detail: SlotSnapshot,
    pub height: f32,
}

struct CellState<V: 'static> {
    row: Weak<RefCell<Row<V>>>,
    title: LabelSlot,
    detail: LabelSlot,
    constraints: ConstraintManager,
    metrics: CellMetrics,
}

impl<V: Display + 'static> CellState<V> {
    /// Clears both slots, then fills them from the row if it is still alive.
    fn render(&mut self) {
        self.title.clear();
        self.detail.clear();

        let font_px = scaled_font_px(self.metrics.font_px);
        self.title.font_px = font_px;
        self.detail.font_px = font_px;

        let Some(row) = self.row.upgrade() else {
            log::trace!("render with no row bound; slots left blank");
            return;
        };
        let row = row.borrow();
        let t = theme();
        let title_color = if row.disabled { t.muted_text } else { t.text };
        self.title.set_text(row.title.clone(), title_color);
        self.detail.set_text(Some(row.detail_text()), t.detail_text);
    }

    fn fit_height(&self) -> f32 {
        let title = self.title.intrinsic_size().height;
        let detail = self.detail.intrinsic_size().height;
        (title.max(detail) + 2.0 * self.metrics.vertical_gap).max(self.metrics.min_height)
    }
}

/// A cell rendering `Row<V>`: title on the leading edge, value on the trailing.
///
/// Created either programmatically ([`TypedCell::new`]) or from a template
/// ([`TypedCell::from_template`]). Only programmatic cells subscribe to
/// content size changes and compute their own constraints.
pub struct TypedCell<V: 'static> {
    shared: Rc<Shared<V>>,
}

struct Shared<V: 'static> {
    core: CellCore,
    state: Rc<RefCell<CellState<V>>>,
    focusable: std::cell::Cell<bool>,
    content_size: Option<Subscription>,
    /// Run by the last handle's drop while the cell holds focus.
    resign: fn(&TypedCell<V>) -> bool,
}

fn resign_cell<V: Display + 'static>(cell: &TypedCell<V>) -> bool {
    cell.resign_input_focus()
}

impl<V: Display + 'static> TypedCell<V> {
    pub fn new(tree: &Hierarchy) -> Self {
        let core = CellCore::new(tree, type_name::<V>(), CellFlags::NEEDS_LAYOUT);
        let state = Rc::new(RefCell::new(CellState {
            row: Weak::new(),
            title: LabelSlot::title(),
            detail: LabelSlot::detail(),
            constraints: ConstraintManager::new(LayoutMode::Programmatic),
            metrics: CellMetrics::default(),
        }));

        let content_size = {
            let state = Rc::downgrade(&state);
            let flags = core.flags_handle();
            notify::subscribe(Notification::ContentSizeCategoryChanged, move || {
                let Some(state) = state.upgrade() else {
                    return;
                };
                // skip if the change arrives while the cell is mid-update
                let Ok(mut state) = state.try_borrow_mut() else {
                    log::warn!("content size change during cell update; ignored");
                    return;
                };
                state.render();
                flags.set(flags.get() | CellFlags::NEEDS_LAYOUT);
            })
        };

        log::debug!("programmatic cell {:?} created", core.node());
        Self::from_shared(Shared {
            core,
            state,
            focusable: std::cell::Cell::new(false),
            content_size: Some(content_size),
            resign: resign_cell::<V>,
        })
    }

    pub fn from_template(tree: &Hierarchy, template: CellTemplate) -> Self {
        let core = CellCore::new(tree, type_name::<V>(), CellFlags::TEMPLATED);
        let state = Rc::new(RefCell::new(CellState {
            row: Weak::new(),
            title: template.title,
            detail: template.detail,
            constraints: ConstraintManager::new(LayoutMode::Templated),
            metrics: template.metrics,
        }));
        log::debug!("templated cell {:?} created", core.node());
        Self::from_shared(Shared {
            core,
            state,
            focusable: std::cell::Cell::new(false),
            content_size: None,
            resign: resign_cell::<V>,
        })
    }

    /// Wraps the parts and registers the hook that resigns this cell when
    /// another node takes focus from it.
    fn from_shared(shared: Shared<V>) -> Self {
        let shared = Rc::new(shared);
        let weak = Rc::downgrade(&shared);
        let hook = FocusLossHook::new(move || {
            if let Some(shared) = weak.upgrade() {
                TypedCell { shared }.resign_input_focus();
            }
        });
        let core = &shared.core;
        if let Err(e) = focus::install_focus_loss_hook(core.tree(), core.node(), hook) {
            log::warn!("cell {:?} has no focus-loss hook: {e}", core.node());
        }
        Self { shared }
    }

    /// Whether this cell takes text input (a field-style row).
    pub fn with_input_focus(self, focusable: bool) -> Self {
        self.shared.focusable.set(focusable);
        self
    }

    /// Points the cell at `row`. Does not render; call `update()` after.
    pub fn bind(&self, row: &RowRef<V>) {
        self.shared.state.borrow_mut().row = Rc::downgrade(row);
    }

    pub fn unbind(&self) {
        self.shared.state.borrow_mut().row = Weak::new();
    }

    pub fn row(&self) -> Option<RowRef<V>> {
        self.shared.state.borrow().row.upgrade()
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.shared.state.borrow().constraints.mode()
    }

    pub fn metrics(&self) -> CellMetrics {
        self.shared.state.borrow().metrics
    }

    pub fn set_metrics(&self, metrics: CellMetrics) {
        self.shared.state.borrow_mut().metrics = metrics;
        if !self.shared.core.is_templated() {
            self.shared.core.insert_flags(CellFlags::NEEDS_LAYOUT);
        }
    }

    pub fn needs_layout(&self) -> bool {
        self.shared.core.flags().contains(CellFlags::NEEDS_LAYOUT)
    }

    pub fn has_content_size_subscription(&self) -> bool {
        self.shared.content_size.is_some()
    }

    pub fn active_constraints(&self) -> Vec<Constraint> {
        self.shared.state.borrow().constraints.active().to_vec()
    }

    pub fn constraint_rebuilds(&self) -> u64 {
        self.shared.state.borrow().constraints.rebuild_count()
    }

    /// True when the active constraint set is empty or exactly the standard one.
    pub fn constraints_consistent(&self) -> bool {
        let state = self.shared.state.borrow();
        state.constraints.matches(&state.metrics)
    }

    /// Runs one layout pass for a cell `width` wide.
    ///
    /// Programmatic cells rebuild their constraint set from scratch and place
    /// both slots; templated cells keep their template frames.
    pub fn layout(&self, width: f32) -> Result<SlotFrames, LayoutError> {
        let height = self.height();
        let mut state = self.shared.state.borrow_mut();
        if state.constraints.mode() == LayoutMode::Templated {
            return Ok(SlotFrames {
                title: state.title.frame,
                detail: state.detail.frame,
            });
        }

        let metrics = state.metrics;
        state.constraints.update_constraints(&metrics);
        let frames = state.constraints.resolve(
            Rect::new(0.0, 0.0, width, height),
            state.title.intrinsic_size(),
            state.detail.intrinsic_size(),
            Compression {
                title: state.title.compression_resistance,
                detail: state.detail.compression_resistance,
            },
        )?;
        state.title.apply_frame(frames.title);
        state.detail.apply_frame(frames.detail);
        drop(state);

        self.shared.core.remove_flags(CellFlags::NEEDS_LAYOUT);
        Ok(frames)
    }

    pub fn title_slot(&self) -> LabelSlot {
        self.shared.state.borrow().title.clone()
    }

    pub fn detail_slot(&self) -> LabelSlot {
        self.shared.state.borrow().detail.clone()
    }

    pub fn snapshot(&self) -> CellSnapshot {
        let height = self.height();
        let state = self.shared.state.borrow();
        CellSnapshot {
            title: SlotSnapshot::from(&state.title),
            detail: SlotSnapshot::from(&state.detail),
            height,
        }
    }
}

impl<V: Display + 'static> UntypedCell for TypedCell<V> {
    fn core(&self) -> &CellCore {
        &self.shared.core
    }

    fn setup(&self) {
        if self.is_set_up() {
            return;
        }
        self.shared.core.insert_flags(CellFlags::SET_UP);
        log::trace!("cell {:?} set up", self.shared.core.node());
    }

    fn update(&self) {
        self.shared.state.borrow_mut().render();
        if !self.shared.core.is_templated() {
            self.shared.core.insert_flags(CellFlags::NEEDS_LAYOUT);
        }
    }

    /// Runs the row's selection hook, if any. The row is not borrowed while
    /// the hook runs, so it may mutate the row and call `update()`.
    fn did_select(&self) {
        let Some(row) = self.row() else {
            return;
        };
        let hook = row.borrow().selection_hook();
        if let Some(hook) = hook {
            hook(self, &row);
        }
    }

    fn can_become_input_focus(&self) -> bool {
        self.shared.focusable.get() && self.row().is_some_and(|r| !r.borrow().disabled)
    }

    fn base_row(&self) -> Option<Rc<dyn BaseRow>> {
        self.row().map(|r| r as Rc<dyn BaseRow>)
    }

    fn height(&self) -> f32 {
        self.shared
            .core
            .height_hint()
            .unwrap_or_else(|| self.shared.state.borrow().fit_height())
    }
}

impl<V: 'static> Drop for TypedCell<V> {
    fn drop(&mut self) {
        // last handle going away while focused: tell the controller first
        if Rc::strong_count(&self.shared) == 1 && self.shared.core.is_first_responder() {
            (self.shared.resign)(self);
        }
    }
}
