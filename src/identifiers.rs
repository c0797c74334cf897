//! Domain identifier types for search-tree nodes.
//!
//! These types provide type-safe wrappers around the raw indices and labels
//! used throughout the stepping engine.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Opaque handle addressing a node inside a [`crate::tree::SearchTree`].
///
/// Handles are arena indices, not labels: two distinct nodes may carry the
/// same display name, but never the same handle. A handle stays valid for
/// the lifetime of the tree that issued it (nodes are never deleted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Create a handle from a raw arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NodeHandle {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

/// Display label for a node in an AND/OR graph.
///
/// Names come from the caller-supplied graph description and may repeat
/// across the unrolled search tree; identity is always the [`NodeHandle`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeName(String);

impl NodeName {
    /// Create a new node name.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the name into its inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for NodeName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for NodeName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for NodeName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<NodeName> for &str {
    fn eq(&self, other: &NodeName) -> bool {
        *self == other.as_str()
    }
}
