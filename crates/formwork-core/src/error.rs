use thiserror::Error;

use crate::hierarchy::NodeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("node {0:?} is not in the responder tree")]
    UnknownNode(NodeId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}
