//! The reversible step-action log.

use serde::Serialize;

use crate::identifiers::NodeHandle;

/// One atomic transition of a stepping run, recorded with enough prior
/// state to invert it exactly.
///
/// The log is a stack: `forward()` pushes, `backward()` pops and inverts
/// the top entry. It is never accessed out of LIFO order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StepAction<K, P> {
    /// Established the root's initial bounds/heuristic.
    Init { prior_root: P },
    /// Moved focus from a parent into a child.
    Descend {
        from: NodeHandle,
        to: NodeHandle,
        prior_child: P,
    },
    /// Revealed a node's children. `created` lists only the handles this
    /// step materialized; a re-expansion after an undo reuses the existing
    /// children and records an empty list.
    Expand {
        node: NodeHandle,
        created: Vec<NodeHandle>,
        prior_kind: K,
        prior_payload: P,
    },
    /// Propagated a finished child's result into its parent. `cutoff`
    /// records whether this step pushed a pruning annotation.
    Ascend {
        from: NodeHandle,
        to: NodeHandle,
        prior_parent: P,
        cutoff: bool,
    },
    /// Marked the whole run complete.
    Finish { cutoff: bool },
}

impl<K, P> StepAction<K, P> {
    /// Short label for trace exports and progress lines.
    pub fn label(&self) -> &'static str {
        match self {
            StepAction::Init { .. } => "init",
            StepAction::Descend { .. } => "descend",
            StepAction::Expand { .. } => "expand",
            StepAction::Ascend { .. } => "ascend",
            StepAction::Finish { .. } => "finish",
        }
    }
}

/// A pruning annotation: traversal at `node` stopped before visiting the
/// child at `child_index` (and everything after it). Purely presentational;
/// pushed by the step that triggers the prune and popped when that step is
/// undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cutoff {
    pub node: NodeHandle,
    pub child_index: usize,
}
