//! # Cells
//!
//! Binds typed form rows to cells inside a list.
//!
//! - [`row`] — `Row<V>` and the untyped [`row::BaseRow`] view of it.
//! - [`cell`] — the [`cell::UntypedCell`] trait a list drives uniformly.
//! - [`typed`] — [`typed::TypedCell<V>`], the concrete binding.
//! - [`constraints`] — the per-cell constraint set, rebuilt on every layout
//!   pass and resolved through taffy.
//! - [`focus`] / [`controller`] — input-focus handoff to the owning controller,
//!   found by walking up the responder tree.
//! - [`list`] — a heterogeneous list container.
//!
//! ```rust
//! use formwork_core::Hierarchy;
//! use formwork_cells::*;
//!
//! let tree = Hierarchy::new();
//! let name = Row::<String>::new("Name").into_ref();
//!
//! let cell = TypedCell::new(&tree);
//! cell.bind(&name);
//! cell.update();
//! assert_eq!(cell.detail_slot().text.as_deref(), Some(NO_VALUE_TEXT));
//!
//! name.borrow_mut().set_value(Some("Alice".into()));
//! cell.update();
//! assert_eq!(cell.detail_slot().text.as_deref(), Some("Alice"));
//! ```

pub mod cell;
pub mod constraints;
pub mod controller;
pub mod error;
pub mod focus;
pub mod label;
pub mod list;
pub mod row;
pub mod text;
pub mod typed;

pub use cell::{CellCore, CellFlags, FocusDirection, HeightHint, UntypedCell};
pub use constraints::{
    Attribute, CellMetrics, Constraint, ConstraintManager, Item, LayoutMode, Priority, Relation,
    SlotFrames,
};
pub use controller::{EditingEvent, EditingTracker, FormController, install_controller};
pub use error::LayoutError;
pub use focus::{AccessoryView, FocusLossHook, install_focus_loss_hook};
pub use label::LabelSlot;
pub use list::CellList;
pub use row::{BaseRow, NO_VALUE_TEXT, Row, RowRef};
pub use typed::{CellSnapshot, CellTemplate, SlotSnapshot, TypedCell};
