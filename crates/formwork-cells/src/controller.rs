use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use formwork_core::{Hierarchy, HierarchyError, NodeId};

use crate::cell::UntypedCell;
use crate::focus::AccessoryView;
use crate::row::BaseRow;

/// What a cell needs from the controller that owns its form.
pub trait FormController {
    fn begin_editing(&self, cell: &dyn UntypedCell);
    fn end_editing(&self, cell: &dyn UntypedCell);

    /// Row-specific accessory; `None` lets the cell use the standard one.
    fn input_accessory_view(&self, _row: &dyn BaseRow) -> Option<AccessoryView> {
        None
    }
}

/// Payload stored on a controller's node. Weak, so the tree never keeps a
/// controller alive.
pub type ControllerLink = Weak<dyn FormController>;

/// Marks `node` as hosting `controller`; cells below it will find it.
pub fn install_controller(
    tree: &Hierarchy,
    node: NodeId,
    controller: &Rc<dyn FormController>,
) -> Result<(), HierarchyError> {
    let link: ControllerLink = Rc::downgrade(controller);
    tree.set_payload(node, link)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditingEvent {
    Began(NodeId),
    Ended(NodeId),
}

/// Minimal controller: remembers which cell is editing and serves
/// accessory overrides by row tag.
#[derive(Default)]
pub struct EditingTracker {
    editing: RefCell<Option<NodeId>>,
    events: RefCell<Vec<EditingEvent>>,
    accessories: RefCell<HashMap<String, AccessoryView>>,
}

impl EditingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing(&self) -> Option<NodeId> {
        *self.editing.borrow()
    }

    pub fn events(&self) -> Vec<EditingEvent> {
        self.events.borrow().clone()
    }

    pub fn set_accessory(&self, tag: impl Into<String>, view: AccessoryView) {
        self.accessories.borrow_mut().insert(tag.into(), view);
    }
}

impl FormController for EditingTracker {
    fn begin_editing(&self, cell: &dyn UntypedCell) {
        let node = cell.node();
        log::debug!("editing began in {node:?}");
        *self.editing.borrow_mut() = Some(node);
        self.events.borrow_mut().push(EditingEvent::Began(node));
    }

    fn end_editing(&self, cell: &dyn UntypedCell) {
        let node = cell.node();
        log::debug!("editing ended in {node:?}");
        let mut editing = self.editing.borrow_mut();
        if *editing == Some(node) {
            *editing = None;
        }
        self.events.borrow_mut().push(EditingEvent::Ended(node));
    }

    fn input_accessory_view(&self, row: &dyn BaseRow) -> Option<AccessoryView> {
        let tag = row.tag()?;
        self.accessories.borrow().get(&tag).cloned()
    }
}
