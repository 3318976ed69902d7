//! Rows: typed value holders owned by the form layer.
//!
//! The form keeps rows as [`RowRef`]s (`Rc<RefCell<Row<V>>>`). Cells only ever
//! keep a `Weak` to them, so a row can go away while a cell still exists; the
//! cell then renders blank slots.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use crate::typed::TypedCell;

/// Detail text shown for rows without a value or custom text.
pub const NO_VALUE_TEXT: &str = "Not set";

pub type RowRef<V> = Rc<RefCell<Row<V>>>;
pub type DisplayValueFn<V> = Rc<dyn Fn(Option<&V>) -> Option<String>>;
pub type SelectionHook<V> = Rc<dyn Fn(&TypedCell<V>, &RowRef<V>)>;

pub struct Row<V: 'static> {
    pub tag: Option<String>,
    pub title: Option<String>,
    pub value: Option<V>,
    pub disabled: bool,
    /// Overrides [`NO_VALUE_TEXT`] for this row.
    pub no_value_text: Option<String>,
    display_value: Option<DisplayValueFn<V>>,
    on_cell_selection: Option<SelectionHook<V>>,
}

impl<V: 'static> Default for Row<V> {
    fn default() -> Self {
        Self {
            tag: None,
            title: None,
            value: None,
            disabled: false,
            no_value_text: None,
            display_value: None,
            on_cell_selection: None,
        }
    }
}

impl<V: 'static> Row<V> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn no_value_text(mut self, text: impl Into<String>) -> Self {
        self.no_value_text = Some(text.into());
        self
    }

    /// Custom detail text. Receives `None` for empty rows; returning `None`
    /// falls back to the no-value text.
    pub fn display_value(mut self, f: impl Fn(Option<&V>) -> Option<String> + 'static) -> Self {
        self.display_value = Some(Rc::new(f));
        self
    }

    /// Runs when a cell bound to this row is selected.
    pub fn on_cell_selection(mut self, f: impl Fn(&TypedCell<V>, &RowRef<V>) + 'static) -> Self {
        self.on_cell_selection = Some(Rc::new(f));
        self
    }

    pub fn into_ref(self) -> RowRef<V> {
        Rc::new(RefCell::new(self))
    }

    pub fn set_value(&mut self, value: Option<V>) {
        self.value = value;
    }

    pub(crate) fn selection_hook(&self) -> Option<SelectionHook<V>> {
        self.on_cell_selection.clone()
    }
}

impl<V: Display + 'static> Row<V> {
    /// Custom text if provided, otherwise the value's `Display` output.
    pub fn display_text(&self) -> Option<String> {
        match &self.display_value {
            Some(f) => f(self.value.as_ref()),
            None => self.value.as_ref().map(ToString::to_string),
        }
    }

    /// What the detail slot shows: display text or the no-value placeholder.
    pub fn detail_text(&self) -> String {
        self.display_text().unwrap_or_else(|| {
            self.no_value_text
                .clone()
                .unwrap_or_else(|| NO_VALUE_TEXT.to_string())
        })
    }
}

/// Untyped view of a row, used where the value type is erased.
pub trait BaseRow {
    fn tag(&self) -> Option<String>;
    fn title(&self) -> Option<String>;
    fn is_disabled(&self) -> bool;
    fn has_value(&self) -> bool;
    fn detail_text(&self) -> String;
}

impl<V: Display + 'static> BaseRow for RefCell<Row<V>> {
    fn tag(&self) -> Option<String> {
        self.borrow().tag.clone()
    }
    fn title(&self) -> Option<String> {
        self.borrow().title.clone()
    }
    fn is_disabled(&self) -> bool {
        self.borrow().disabled
    }
    fn has_value(&self) -> bool {
        self.borrow().value.is_some()
    }
    fn detail_text(&self) -> String {
        self.borrow().detail_text()
    }
}
