//! Expansion rules - the algorithm plug-ins behind the stepping engine.
//!
//! The engine in [`crate::stepper`] knows how to walk a tree forward and
//! backward one action at a time; everything algorithm-specific (what a
//! node's children are, how a finished child folds into its parent, when
//! traversal prunes or stops) lives behind the [`ExpansionRule`] trait.
//! Alpha-beta pruning and AO* are the two shipped implementations.

pub mod alpha_beta;
pub mod ao_star;

use std::fmt;

use crate::{Result, identifiers::NodeHandle, tree::SearchTree};

pub use alpha_beta::AlphaBeta;
pub use ao_star::AoStar;

/// A child to materialize during an expansion step.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSpec<K, P> {
    pub kind: K,
    pub payload: P,
}

/// The result of expanding a node: its resolved tag plus the children to
/// create. An empty child list on a non-goal node is a dead end, not an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion<K, P> {
    pub kind: K,
    pub children: Vec<ChildSpec<K, P>>,
}

/// Algorithm plug-in for the reversible stepper.
///
/// Implementations must be deterministic: `expand` is a pure function of
/// the node's identity and the current tree, and `select_child` must break
/// ties stably, so that replaying a rewound run reproduces the original
/// action log bit for bit.
pub trait ExpansionRule {
    /// Node tag (max/min for game trees, AND/OR/undetermined for AO*).
    type Kind: Copy + PartialEq + fmt::Debug;
    /// Node scalar fields. Cloned wholesale into step actions so that
    /// backward steps can restore the exact prior state, including "unset".
    type Payload: Clone + PartialEq + fmt::Debug;

    /// Establish the root's initial bounds or heuristic estimate.
    fn init_root(
        &self,
        tree: &mut SearchTree<Self::Kind, Self::Payload>,
        root: NodeHandle,
    ) -> Result<()>;

    /// Resolve a node's tag and list the children to materialize.
    fn expand(
        &self,
        tree: &SearchTree<Self::Kind, Self::Payload>,
        node: NodeHandle,
    ) -> Result<Expansion<Self::Kind, Self::Payload>>;

    /// Settle the freshly expanded node's own aggregates and flags.
    fn on_expanded(
        &self,
        _tree: &mut SearchTree<Self::Kind, Self::Payload>,
        _node: NodeHandle,
    ) -> Result<()> {
        Ok(())
    }

    /// Apply downward inheritance when focus moves into a child.
    fn descend_into(
        &self,
        _tree: &mut SearchTree<Self::Kind, Self::Payload>,
        _parent: NodeHandle,
        _child: NodeHandle,
    ) -> Result<()> {
        Ok(())
    }

    /// Fold a finished child's result into its parent.
    fn propagate_up(
        &self,
        tree: &mut SearchTree<Self::Kind, Self::Payload>,
        parent: NodeHandle,
        child: NodeHandle,
    ) -> Result<()>;

    /// Whether the node requires no further traversal (solved, dead end).
    fn is_complete(
        &self,
        tree: &SearchTree<Self::Kind, Self::Payload>,
        node: NodeHandle,
    ) -> Result<bool>;

    /// Whether traversal of the remaining children stops here. A positive
    /// answer records a cutoff annotation for the presenter.
    fn prune_check(
        &self,
        tree: &SearchTree<Self::Kind, Self::Payload>,
        node: NodeHandle,
    ) -> Result<bool>;

    /// Index of the next child to descend into, or `None` when the node's
    /// children are exhausted. `next_index` is the count of descents made
    /// through this node so far; sequential rules return it unchanged.
    fn select_child(
        &self,
        tree: &SearchTree<Self::Kind, Self::Payload>,
        node: NodeHandle,
        next_index: usize,
    ) -> Result<Option<usize>>;

    /// Whether propagation bubbles all the way to the root after every
    /// expansion (AO*), as opposed to one level at a time (alpha-beta).
    fn full_ascent(&self) -> bool {
        false
    }

    /// Cap on root-level descents for rules that grow the tree as they
    /// search. `None` for rules over static trees, whose runs terminate
    /// structurally.
    fn iteration_cap(&self) -> Option<usize> {
        None
    }
}
