//! Arena ownership and navigation for search-tree nodes.

use serde::Serialize;

use super::node::SearchNode;
use super::snapshot::{NodeSnapshot, TreeSnapshot};
use crate::{Result, error::Error, identifiers::NodeHandle};

/// Owns all nodes of one search tree and exposes handle-based navigation.
///
/// The arena is append-only: nodes are created by [`SearchTree::create_root`]
/// and [`SearchTree::add_child`] and never deleted, which keeps every handle
/// referenced by a recorded step action or a presenter valid across
/// forward and backward steps.
///
/// # Examples
///
/// ```
/// use retrace::tree::SearchTree;
///
/// let mut tree: SearchTree<char, i32> = SearchTree::new();
/// let root = tree.create_root('a', 0)?;
/// let child = tree.add_child(root, 'b', 1)?;
/// assert_eq!(tree.node(child)?.parent, Some(root));
/// assert_eq!(tree.node(root)?.children, vec![child]);
/// # Ok::<(), retrace::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTree<K, P> {
    nodes: Vec<SearchNode<K, P>>,
}

impl<K, P> SearchTree<K, P> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate the root node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootAlreadyExists`] if the tree already has one.
    pub fn create_root(&mut self, kind: K, payload: P) -> Result<NodeHandle> {
        if !self.nodes.is_empty() {
            return Err(Error::RootAlreadyExists);
        }
        self.nodes.push(SearchNode::new(kind, None, payload));
        Ok(NodeHandle::new(0))
    }

    /// Append a new child to `parent` and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if `parent` is out of range.
    pub fn add_child(&mut self, parent: NodeHandle, kind: K, payload: P) -> Result<NodeHandle> {
        self.node(parent)?;
        let handle = NodeHandle::new(self.nodes.len());
        self.nodes.push(SearchNode::new(kind, Some(parent), payload));
        self.nodes[parent.index()].children.push(handle);
        Ok(handle)
    }

    /// Bounds-checked shared access to a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if the handle is out of range.
    pub fn node(&self, handle: NodeHandle) -> Result<&SearchNode<K, P>> {
        self.nodes.get(handle.index()).ok_or(Error::InvalidHandle {
            index: handle.index(),
            len: self.nodes.len(),
        })
    }

    /// Bounds-checked mutable access to a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHandle`] if the handle is out of range.
    pub fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut SearchNode<K, P>> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(handle.index())
            .ok_or(Error::InvalidHandle {
                index: handle.index(),
                len,
            })
    }

    /// The root handle, or `None` for an empty tree.
    pub fn root(&self) -> Option<NodeHandle> {
        (!self.nodes.is_empty()).then(|| NodeHandle::new(0))
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all handles in creation order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        (0..self.nodes.len()).map(NodeHandle::new)
    }
}

impl<K: Clone, P: Clone> SearchTree<K, P> {
    /// Produce an owned, serializable snapshot of the whole tree.
    ///
    /// Presenters and exporters work from snapshots so the engine never
    /// has to share mutable state with a rendering layer.
    pub fn snapshot(&self) -> TreeSnapshot<K, P> {
        TreeSnapshot {
            root: self.root(),
            nodes: self
                .handles()
                .map(|handle| {
                    let node = &self.nodes[handle.index()];
                    NodeSnapshot {
                        handle,
                        kind: node.kind.clone(),
                        parent: node.parent,
                        children: node.children.clone(),
                        expanded: node.expanded,
                        payload: node.payload.clone(),
                    }
                })
                .collect(),
        }
    }
}

impl<K, P> Default for SearchTree<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_root_is_rejected() {
        let mut tree: SearchTree<(), ()> = SearchTree::new();
        tree.create_root((), ()).unwrap();
        assert!(matches!(
            tree.create_root((), ()),
            Err(Error::RootAlreadyExists)
        ));
    }

    #[test]
    fn out_of_range_handle_is_rejected() {
        let tree: SearchTree<(), ()> = SearchTree::new();
        let err = tree.node(NodeHandle::new(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidHandle { index: 3, len: 0 }));
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree: SearchTree<(), i32> = SearchTree::new();
        let root = tree.create_root((), 0).unwrap();
        let a = tree.add_child(root, (), 1).unwrap();
        let b = tree.add_child(root, (), 2).unwrap();
        assert_eq!(tree.node(root).unwrap().children, vec![a, b]);
        assert_eq!(tree.node(a).unwrap().payload, 1);
        assert_eq!(tree.node(b).unwrap().payload, 2);
        assert_eq!(tree.len(), 3);
    }
}
