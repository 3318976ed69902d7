//! Input-focus handoff between a cell and its controller.
//!
//! Focus itself lives in the responder tree; these functions move it and then
//! tell the controller found by walking up from the cell. A cell with no
//! controller above it still gains and loses focus, the notification is
//! simply not delivered.

use std::rc::Rc;

use formwork_core::{Hierarchy, HierarchyError, NodeId};

use crate::cell::{FocusDirection, UntypedCell};

/// Accessory shown above the input method while a cell has focus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AccessoryView {
    /// Previous / next / done bar.
    #[default]
    Standard,
    Custom(String),
}

/// Stored as the payload of a cell's node. Run when another node takes input
/// focus from that cell, so the cell resigns (and its controller hears about
/// it) before the new holder begins editing.
#[derive(Clone)]
pub struct FocusLossHook(Rc<dyn Fn()>);

impl FocusLossHook {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }
}

pub fn install_focus_loss_hook(
    tree: &Hierarchy,
    node: NodeId,
    hook: FocusLossHook,
) -> Result<(), HierarchyError> {
    tree.set_payload(node, hook)
}

pub fn become_input_focus(cell: &dyn UntypedCell, direction: Option<FocusDirection>) -> bool {
    let core = cell.core();
    if !cell.can_become_input_focus() {
        log::trace!("{:?} refused input focus", core.node());
        return false;
    }
    if core.is_first_responder() {
        return true;
    }

    let tree = core.tree();
    if let Some(holder) = tree.first_responder()
        && let Some(hook) = tree.payload::<FocusLossHook>(holder)
    {
        (hook.0)();
    }
    match tree.make_first_responder(core.node()) {
        Ok(Some(prev)) => log::debug!("{prev:?} lost focus without a resign hook"),
        Ok(None) => {}
        Err(e) => {
            log::warn!("focus request failed: {e}");
            return false;
        }
    }

    core.set_last_focus_direction(direction);
    core.set_active_accessory(Some(resolve_accessory(cell)));
    log::debug!("{:?} became input focus ({direction:?})", core.node());
    match cell.form_controller() {
        Some(controller) => controller.begin_editing(cell),
        None => log::trace!("no controller above {:?}; begin_editing dropped", core.node()),
    }
    true
}

/// Returns `false`, and notifies nobody, when the cell did not have focus.
pub fn resign_input_focus(cell: &dyn UntypedCell) -> bool {
    let core = cell.core();
    if !core.tree().resign_first_responder(core.node()) {
        return false;
    }
    core.set_active_accessory(None);
    log::debug!("{:?} resigned input focus", core.node());
    match cell.form_controller() {
        Some(controller) => controller.end_editing(cell),
        None => log::trace!("no controller above {:?}; end_editing dropped", core.node()),
    }
    true
}

/// The controller's accessory for the bound row, else the standard one.
pub fn resolve_accessory(cell: &dyn UntypedCell) -> AccessoryView {
    let controller = cell.form_controller();
    let row = cell.base_row();
    controller
        .zip(row)
        .and_then(|(c, r)| c.input_accessory_view(r.as_ref()))
        .unwrap_or_default()
}
