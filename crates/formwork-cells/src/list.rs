use std::any::Any;
use std::fmt::Display;
use std::ops::Range;

use formwork_core::{Hierarchy, HierarchyError, NodeId};

use crate::cell::UntypedCell;
use crate::row::RowRef;
use crate::typed::TypedCell;

/// Heterogeneous list of cells driven through [`UntypedCell`].
///
/// Owns a node in the responder tree; pushed cells are attached under it, so a
/// controller installed above the list is visible to every cell.
pub struct CellList {
    tree: Hierarchy,
    node: NodeId,
    cells: Vec<Box<dyn UntypedCell>>,
}

impl CellList {
    pub fn new(tree: &Hierarchy, parent: Option<NodeId>) -> Result<Self, HierarchyError> {
        let node = match parent {
            Some(p) => tree.insert_child(p, "list")?,
            None => tree.insert("list"),
        };
        Ok(Self {
            tree: tree.clone(),
            node,
            cells: Vec::new(),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn push(&mut self, cell: Box<dyn UntypedCell>) -> Result<usize, HierarchyError> {
        self.tree.attach(cell.node(), self.node)?;
        self.cells.push(cell);
        Ok(self.cells.len() - 1)
    }

    /// Removes the cell at `index` and detaches it from the tree, keeping it
    /// alive for reuse. A focused cell resigns first.
    pub fn take(&mut self, index: usize) -> Option<Box<dyn UntypedCell>> {
        if index >= self.cells.len() {
            return None;
        }
        let cell = self.cells.remove(index);
        if cell.is_input_focus() {
            cell.resign_input_focus();
        }
        if let Err(e) = self.tree.detach(cell.node()) {
            log::warn!("detaching reused cell: {e}");
        }
        Some(cell)
    }

    pub fn get(&self, index: usize) -> Option<&dyn UntypedCell> {
        self.cells.get(index).map(|c| &**c)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn UntypedCell> {
        self.cells.iter().map(|c| &**c)
    }

    /// The cell at `index` if it renders `V`.
    pub fn typed<V: Display + 'static>(&self, index: usize) -> Option<&TypedCell<V>> {
        let cell: &dyn UntypedCell = &**self.cells.get(index)?;
        let any: &dyn Any = cell;
        any.downcast_ref::<TypedCell<V>>()
    }

    /// Reuse path: points the cell at a different row and re-renders it.
    pub fn rebind<V: Display + 'static>(&self, index: usize, row: &RowRef<V>) -> bool {
        let Some(cell) = self.typed::<V>(index) else {
            return false;
        };
        cell.bind(row);
        cell.update();
        true
    }

    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.cells.iter().position(|c| c.node() == node)
    }

    pub fn setup_all(&self) {
        for cell in &self.cells {
            cell.setup();
        }
    }

    pub fn update_all(&self) {
        for cell in &self.cells {
            cell.update();
        }
    }

    pub fn select(&self, index: usize) -> bool {
        match self.cells.get(index) {
            Some(cell) => {
                cell.did_select();
                true
            }
            None => false,
        }
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_input_focus())
    }

    /// Moves focus to the next cell in `direction` that accepts it.
    pub fn focus_next(&self, from: usize, direction: crate::cell::FocusDirection) -> Option<usize> {
        use crate::cell::FocusDirection;
        let candidates: Box<dyn Iterator<Item = usize>> = match direction {
            FocusDirection::Down => Box::new(from.saturating_add(1)..self.cells.len()),
            FocusDirection::Up => Box::new((0..from.min(self.cells.len())).rev()),
        };
        for i in candidates {
            let cell = &self.cells[i];
            if cell.can_become_input_focus() {
                if let Some(current) = self.cells.get(from) {
                    current.resign_input_focus();
                }
                if cell.become_input_focus(Some(direction)) {
                    return Some(i);
                }
            }
        }
        None
    }

    pub fn content_height(&self) -> f32 {
        self.cells.iter().map(|c| c.height()).sum()
    }

    /// Indices of cells intersecting the viewport `[offset, offset + viewport)`.
    pub fn visible_range(&self, offset: f32, viewport: f32) -> Range<usize> {
        let mut y = 0.0;
        let mut first = None;
        let mut last = 0;
        for (i, cell) in self.cells.iter().enumerate() {
            let h = cell.height();
            let top = y;
            y += h;
            if y > offset && top < offset + viewport {
                first.get_or_insert(i);
                last = i + 1;
            }
        }
        match first {
            Some(f) => f..last,
            None => 0..0,
        }
    }
}

impl Drop for CellList {
    fn drop(&mut self) {
        self.cells.clear();
        self.tree.try_remove(self.node);
    }
}
