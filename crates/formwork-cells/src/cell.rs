//! The untyped cell interface.
//!
//! A list holds cells of many value types as `Box<dyn UntypedCell>` and drives
//! them only through this trait. Typed access goes through `&dyn Any`
//! downcasting (see [`crate::list::CellList::typed`]).

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bitflags::bitflags;
use formwork_core::{Hierarchy, NodeId};

use crate::controller::{ControllerLink, FormController};
use crate::focus::{self, AccessoryView};
use crate::row::BaseRow;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const SET_UP = 1 << 0;
        const TEMPLATED = 1 << 1;
        const NEEDS_LAYOUT = 1 << 2;
    }
}

/// Where focus is coming from when it moves between cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusDirection {
    Up,
    Down,
}

pub type HeightHint = Rc<dyn Fn() -> f32>;

/// State every cell carries regardless of its value type.
///
/// Owns the cell's node in the responder tree and removes it on drop.
pub struct CellCore {
    tree: Hierarchy,
    node: NodeId,
    flags: Rc<Cell<CellFlags>>,
    height: RefCell<Option<HeightHint>>,
    last_direction: Cell<Option<FocusDirection>>,
    accessory: RefCell<Option<AccessoryView>>,
}

impl CellCore {
    pub fn new(tree: &Hierarchy, name: &str, flags: CellFlags) -> Self {
        Self {
            tree: tree.clone(),
            node: tree.insert(name),
            flags: Rc::new(Cell::new(flags)),
            height: RefCell::new(None),
            last_direction: Cell::new(None),
            accessory: RefCell::new(None),
        }
    }

    pub fn tree(&self) -> &Hierarchy {
        &self.tree
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn flags(&self) -> CellFlags {
        self.flags.get()
    }

    pub fn insert_flags(&self, f: CellFlags) {
        self.flags.set(self.flags.get() | f);
    }

    pub fn remove_flags(&self, f: CellFlags) {
        self.flags.set(self.flags.get() - f);
    }

    /// Shared with callbacks that outlive a borrow of the cell.
    pub(crate) fn flags_handle(&self) -> Rc<Cell<CellFlags>> {
        self.flags.clone()
    }

    pub fn is_templated(&self) -> bool {
        self.flags().contains(CellFlags::TEMPLATED)
    }

    /// Walks from this cell's node up to the nearest controller.
    ///
    /// Detached cells, removed nodes and released controllers all yield `None`.
    pub fn form_controller(&self) -> Option<Rc<dyn FormController>> {
        self.tree
            .find_ancestor::<ControllerLink>(self.node)
            .and_then(|link| link.upgrade())
    }

    pub fn height_hint(&self) -> Option<f32> {
        let hint = self.height.borrow().clone();
        hint.map(|f| f())
    }

    pub fn set_height_hint(&self, hint: Option<HeightHint>) {
        *self.height.borrow_mut() = hint;
    }

    pub fn is_first_responder(&self) -> bool {
        self.tree.first_responder() == Some(self.node)
    }

    pub fn last_focus_direction(&self) -> Option<FocusDirection> {
        self.last_direction.get()
    }

    pub(crate) fn set_last_focus_direction(&self, d: Option<FocusDirection>) {
        self.last_direction.set(d);
    }

    /// Accessory resolved when this cell last gained focus; `None` while it
    /// does not hold focus.
    pub fn active_accessory(&self) -> Option<AccessoryView> {
        self.accessory.borrow().clone()
    }

    pub(crate) fn set_active_accessory(&self, view: Option<AccessoryView>) {
        *self.accessory.borrow_mut() = view;
    }
}

impl Drop for CellCore {
    fn drop(&mut self) {
        if self.tree.try_remove(self.node).is_none() {
            log::warn!("cell {:?} dropped while the tree was busy; node left behind", self.node);
        }
    }
}

pub trait AsUntypedCell {
    fn as_untyped(&self) -> &dyn UntypedCell;
}

impl<T: UntypedCell> AsUntypedCell for T {
    fn as_untyped(&self) -> &dyn UntypedCell {
        self
    }
}

pub trait UntypedCell: Any + AsUntypedCell {
    fn core(&self) -> &CellCore;

    /// One-time initialisation before first display. Repeated calls do nothing.
    fn setup(&self) {
        self.core().insert_flags(CellFlags::SET_UP);
    }

    /// Re-render from the bound row. Safe to call any number of times.
    fn update(&self);

    fn did_select(&self) {}

    fn can_become_input_focus(&self) -> bool {
        false
    }

    fn become_input_focus(&self, direction: Option<FocusDirection>) -> bool {
        focus::become_input_focus(self.as_untyped(), direction)
    }

    fn resign_input_focus(&self) -> bool {
        focus::resign_input_focus(self.as_untyped())
    }

    fn input_accessory_view(&self) -> AccessoryView {
        focus::resolve_accessory(self.as_untyped())
    }

    fn active_accessory(&self) -> Option<AccessoryView> {
        self.core().active_accessory()
    }

    fn base_row(&self) -> Option<Rc<dyn BaseRow>>;

    fn form_controller(&self) -> Option<Rc<dyn FormController>> {
        self.core().form_controller()
    }

    fn node(&self) -> NodeId {
        self.core().node()
    }

    fn is_set_up(&self) -> bool {
        self.core().flags().contains(CellFlags::SET_UP)
    }

    fn is_input_focus(&self) -> bool {
        self.core().is_first_responder()
    }

    fn height(&self) -> f32 {
        self.core().height_hint().unwrap_or(0.0)
    }

    /// `None` restores the automatic height.
    fn set_height(&self, hint: Option<HeightHint>) {
        self.core().set_height_hint(hint);
    }
}
