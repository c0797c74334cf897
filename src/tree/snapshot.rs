//! Owned snapshot views of a search tree for presenters and exporters.

use serde::Serialize;

use crate::identifiers::NodeHandle;

/// Serializable copy of a whole tree at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot<K, P> {
    pub root: Option<NodeHandle>,
    pub nodes: Vec<NodeSnapshot<K, P>>,
}

/// Serializable copy of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot<K, P> {
    pub handle: NodeHandle,
    pub kind: K,
    pub parent: Option<NodeHandle>,
    pub children: Vec<NodeHandle>,
    pub expanded: bool,
    pub payload: P,
}
