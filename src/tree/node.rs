//! A single node of the search tree.

use serde::Serialize;

use crate::identifiers::NodeHandle;

/// A node in a game or AND/OR search tree.
///
/// `kind` and `payload` are defined by the algorithm plugged into the
/// engine: alpha-beta stores the player tag and value/bound scalars, AO*
/// stores the connector tag and cost/flag scalars. The `expanded` flag
/// says whether the node's children are currently revealed to traversal;
/// undoing an expansion clears the flag but keeps the child nodes, so
/// handles recorded elsewhere never dangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchNode<K, P> {
    /// Algorithm-specific node tag (max/min, AND/OR, ...)
    pub kind: K,
    /// Back-reference to the creating node; `None` for the root
    pub parent: Option<NodeHandle>,
    /// Ordered child handles; empty until expanded
    pub children: Vec<NodeHandle>,
    /// Whether the children are revealed to traversal
    pub expanded: bool,
    /// Algorithm-specific scalar fields
    pub payload: P,
}

impl<K, P> SearchNode<K, P> {
    pub(crate) fn new(kind: K, parent: Option<NodeHandle>, payload: P) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            expanded: false,
            payload,
        }
    }

    /// Return true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
