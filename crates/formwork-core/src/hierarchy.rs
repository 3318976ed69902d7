//! Responder tree: explicit parent links between visual units.
//!
//! Every cell, list and controller host owns a node. Nodes may carry a typed
//! payload (a controller handle, for instance), and [`ResponderTree::find_ancestor`]
//! walks parent links from a node upwards looking for the first payload of a
//! requested type. The walk is never cached, so detaching and reattaching a
//! node is reflected by the next lookup.
//!
//! The tree also tracks the single first responder (input focus).

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::error::HierarchyError;

new_key_type! {
    pub struct NodeId;
}

struct Node {
    name: String,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    payload: Option<Rc<dyn Any>>,
}

#[derive(Default)]
pub struct ResponderTree {
    nodes: SlotMap<NodeId, Node>,
    first_responder: Option<NodeId>,
}

impl ResponderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node without a parent.
    pub fn insert(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.insert(Node {
            name: name.into(),
            parent: None,
            children: SmallVec::new(),
            payload: None,
        })
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, HierarchyError> {
        if !self.nodes.contains_key(parent) {
            return Err(HierarchyError::UnknownNode(parent));
        }
        let id = self.insert(name);
        self.link(id, parent);
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), HierarchyError> {
        if !self.nodes.contains_key(child) {
            return Err(HierarchyError::UnknownNode(child));
        }
        if !self.nodes.contains_key(parent) {
            return Err(HierarchyError::UnknownNode(parent));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(HierarchyError::Cycle { child, parent });
        }
        self.unlink(child);
        self.link(child, parent);
        Ok(())
    }

    pub fn detach(&mut self, id: NodeId) -> Result<(), HierarchyError> {
        if !self.nodes.contains_key(id) {
            return Err(HierarchyError::UnknownNode(id));
        }
        self.unlink(id);
        Ok(())
    }

    /// Removes `id` and its whole subtree. Returns how many nodes were removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if !self.nodes.contains_key(id) {
            return 0;
        }
        self.unlink(id);
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                if self.first_responder == Some(next) {
                    log::debug!("first responder {next:?} removed from tree");
                    self.first_responder = None;
                }
                removed += 1;
            }
        }
        removed
    }

    pub fn set_payload<T: 'static>(&mut self, id: NodeId, payload: T) -> Result<(), HierarchyError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(HierarchyError::UnknownNode(id))?;
        node.payload = Some(Rc::new(payload));
        Ok(())
    }

    pub fn clear_payload(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.payload = None;
        }
    }

    pub fn payload<T: Clone + 'static>(&self, id: NodeId) -> Option<T> {
        self.nodes
            .get(id)?
            .payload
            .as_ref()?
            .downcast_ref::<T>()
            .cloned()
    }

    /// `start` followed by its parent, grandparent, and so on.
    ///
    /// A node that is not in the tree yields nothing.
    pub fn ancestors(&self, start: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.contains_key(start).then_some(start),
        }
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count().saturating_sub(1)
    }

    /// First payload of type `T` found on `start` or one of its ancestors.
    pub fn find_ancestor<T: Clone + 'static>(&self, start: NodeId) -> Option<T> {
        self.ancestors(start).find_map(|id| self.payload::<T>(id))
    }

    pub fn first_responder(&self) -> Option<NodeId> {
        self.first_responder
    }

    /// Gives input focus to `id`, taking it from the previous holder.
    ///
    /// Returns the node that lost focus, if focus moved away from another node.
    pub fn make_first_responder(&mut self, id: NodeId) -> Result<Option<NodeId>, HierarchyError> {
        if !self.nodes.contains_key(id) {
            return Err(HierarchyError::UnknownNode(id));
        }
        match self.first_responder.replace(id) {
            Some(prev) if prev != id => {
                log::debug!("first responder {prev:?} -> {id:?}");
                Ok(Some(prev))
            }
            _ => Ok(None),
        }
    }

    /// Clears input focus if `id` holds it. Returns whether focus was released.
    pub fn resign_first_responder(&mut self, id: NodeId) -> bool {
        if self.first_responder == Some(id) {
            self.first_responder = None;
            true
        } else {
            false
        }
    }

    fn link(&mut self, child: NodeId, parent: NodeId) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|c| c.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a ResponderTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Shared handle to a [`ResponderTree`] for the UI thread.
#[derive(Clone, Default)]
pub struct Hierarchy(Rc<RefCell<ResponderTree>>);

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&ResponderTree) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut ResponderTree) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn insert(&self, name: impl Into<String>) -> NodeId {
        self.with_mut(|t| t.insert(name))
    }

    pub fn insert_child(
        &self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, HierarchyError> {
        self.with_mut(|t| t.insert_child(parent, name))
    }

    pub fn attach(&self, child: NodeId, parent: NodeId) -> Result<(), HierarchyError> {
        self.with_mut(|t| t.attach(child, parent))
    }

    pub fn detach(&self, id: NodeId) -> Result<(), HierarchyError> {
        self.with_mut(|t| t.detach(id))
    }

    pub fn remove(&self, id: NodeId) -> usize {
        self.with_mut(|t| t.remove(id))
    }

    /// Like [`Hierarchy::remove`], but returns `None` instead of panicking when
    /// the tree is already borrowed (a node owner dropped inside a tree callback).
    pub fn try_remove(&self, id: NodeId) -> Option<usize> {
        self.0.try_borrow_mut().ok().map(|mut t| t.remove(id))
    }

    pub fn set_payload<T: 'static>(&self, id: NodeId, payload: T) -> Result<(), HierarchyError> {
        self.with_mut(|t| t.set_payload(id, payload))
    }

    /// Payload of `id` itself; ancestors are not consulted.
    pub fn payload<T: Clone + 'static>(&self, id: NodeId) -> Option<T> {
        self.with(|t| t.payload::<T>(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.with(|t| t.parent(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.with(|t| t.contains(id))
    }

    /// The borrow is released before the payload is returned, so callers may
    /// mutate the tree while holding the result.
    pub fn find_ancestor<T: Clone + 'static>(&self, start: NodeId) -> Option<T> {
        self.with(|t| t.find_ancestor::<T>(start))
    }

    pub fn first_responder(&self) -> Option<NodeId> {
        self.with(|t| t.first_responder())
    }

    pub fn make_first_responder(&self, id: NodeId) -> Result<Option<NodeId>, HierarchyError> {
        self.with_mut(|t| t.make_first_responder(id))
    }

    pub fn resign_first_responder(&self, id: NodeId) -> bool {
        self.with_mut(|t| t.resign_first_responder(id))
    }
}
