//! The generic forward/backward stepping engine.
//!
//! [`ReversibleStepper`] executes a tree-searching algorithm one atomic
//! step at a time, in either direction. Every forward step records a
//! [`StepAction`] carrying the prior values it overwrites; every backward
//! step pops the top action and applies its exact inverse. The algorithm
//! itself is supplied as an [`ExpansionRule`]; the engine owns the tree,
//! the cursor and the log, and notifies attached presenters after each
//! step.
//!
//! The run moves through `NotStarted -> Descending <-> Expanding <->
//! Ascending -> Finished`. The descending/ascending distinction is not
//! stored anywhere: it is derived from the top log entry plus the rule's
//! ascent policy, so backward steps restore it automatically.

use std::collections::HashMap;

use crate::{
    Result,
    error::Error,
    identifiers::NodeHandle,
    ports::{Presenter, StepView},
    rules::ExpansionRule,
    tree::SearchTree,
};

use super::action::{Cutoff, StepAction};

/// Drives a search algorithm forward and backward over a [`SearchTree`].
///
/// # Examples
///
/// ```
/// use retrace::rules::alpha_beta::{self, GameKind, TreeStructure};
///
/// let structure: TreeStructure = "2".parse()?;
/// let mut stepper = alpha_beta::simulator(&structure, &[3.0, 7.0], GameKind::Maximizing)?;
/// stepper.run_to_end()?;
/// let root = stepper.tree().root().expect("tree has a root");
/// assert_eq!(stepper.tree().node(root)?.payload.value, Some(7.0));
/// stepper.rewind_to_start()?;
/// assert_eq!(stepper.tree().node(root)?.payload.value, None);
/// # Ok::<(), retrace::Error>(())
/// ```
pub struct ReversibleStepper<R: ExpansionRule> {
    rule: R,
    tree: SearchTree<R::Kind, R::Payload>,
    root: NodeHandle,
    current: Option<NodeHandle>,
    path: Vec<NodeHandle>,
    finished: bool,
    next_child: HashMap<NodeHandle, usize>,
    log: Vec<StepAction<R::Kind, R::Payload>>,
    cutoffs: Vec<Cutoff>,
    root_descents: usize,
    presenters: Vec<Box<dyn Presenter<R::Kind, R::Payload>>>,
}

impl<R: ExpansionRule> ReversibleStepper<R> {
    /// Create a stepper over a tree that already holds its root node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRoot`] for an empty tree.
    pub fn new(rule: R, tree: SearchTree<R::Kind, R::Payload>) -> Result<Self> {
        let root = tree.root().ok_or(Error::MissingRoot)?;
        Ok(Self {
            rule,
            tree,
            root,
            current: None,
            path: Vec::new(),
            finished: false,
            next_child: HashMap::new(),
            log: Vec::new(),
            cutoffs: Vec::new(),
            root_descents: 0,
            presenters: Vec::new(),
        })
    }

    /// Attach a presenter; it will be notified after every subsequent step.
    pub fn attach(&mut self, presenter: Box<dyn Presenter<R::Kind, R::Payload>>) {
        self.presenters.push(presenter);
    }

    /// The tree in its current state.
    pub fn tree(&self) -> &SearchTree<R::Kind, R::Payload> {
        &self.tree
    }

    /// The algorithm rule driving this stepper.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// The cursor node, if the run is in progress.
    pub fn current(&self) -> Option<NodeHandle> {
        self.current
    }

    /// Whether the run has completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Pruning annotations currently in effect.
    pub fn cutoffs(&self) -> &[Cutoff] {
        &self.cutoffs
    }

    /// The action log, oldest first.
    pub fn actions(&self) -> &[StepAction<R::Kind, R::Payload>] {
        &self.log
    }

    /// Number of descents made from the root so far (the iteration count
    /// bounded by [`ExpansionRule::iteration_cap`]).
    pub fn iterations(&self) -> usize {
        self.root_descents
    }

    /// A view of the current state, as presenters receive it.
    pub fn view(&self) -> StepView<'_, R::Kind, R::Payload> {
        StepView {
            tree: &self.tree,
            current: self.current,
            cutoffs: &self.cutoffs,
            propagating_up: matches!(self.log.last(), Some(StepAction::Ascend { .. })),
            finished: self.finished,
        }
    }

    /// Execute one forward step. Returns `false` (and does nothing) once
    /// the run is finished.
    pub fn forward(&mut self) -> Result<bool> {
        let stepped = self.step_forward()?;
        if stepped {
            let propagating_up = matches!(self.log.last(), Some(StepAction::Ascend { .. }));
            self.notify(propagating_up)?;
        }
        Ok(stepped)
    }

    /// Undo one step. Returns `false` (and does nothing) when the log is
    /// empty.
    pub fn backward(&mut self) -> Result<bool> {
        let stepped = self.step_backward()?;
        if stepped {
            self.notify(false)?;
        }
        Ok(stepped)
    }

    /// Step forward until the run finishes, then notify presenters once.
    pub fn run_to_end(&mut self) -> Result<()> {
        while self.step_forward()? {}
        let propagating_up = matches!(self.log.last(), Some(StepAction::Ascend { .. }));
        self.notify(propagating_up)
    }

    /// Undo every step, then notify presenters once.
    pub fn rewind_to_start(&mut self) -> Result<()> {
        while self.step_backward()? {}
        self.notify(false)
    }

    fn step_forward(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let Some(node) = self.current else {
            self.apply_init()?;
            return Ok(true);
        };

        // Deep-ascent rules bubble propagation to the root before the
        // next descent resumes.
        if self.ascending() && node != self.root {
            self.apply_ascend(node, false)?;
            return Ok(true);
        }

        if !self.tree.node(node)?.expanded {
            self.apply_expand(node)?;
            return Ok(true);
        }

        let at_root = node == self.root;
        if at_root {
            if let Some(cap) = self.rule.iteration_cap() {
                if self.root_descents >= cap {
                    self.apply_finish(false)?;
                    return Ok(true);
                }
            }
        }

        if self.tree.node(node)?.children.is_empty() {
            return self.leave(node, false, at_root);
        }
        if self.rule.prune_check(&self.tree, node)? {
            let child_index = self.next_index(node);
            self.cutoffs.push(Cutoff { node, child_index });
            return self.leave(node, true, at_root);
        }
        if self.rule.is_complete(&self.tree, node)? {
            return self.leave(node, false, at_root);
        }
        match self.rule.select_child(&self.tree, node, self.next_index(node))? {
            Some(child_index) => {
                self.apply_descend(node, child_index)?;
                Ok(true)
            }
            None => self.leave(node, false, at_root),
        }
    }

    fn step_backward(&mut self) -> Result<bool> {
        let Some(action) = self.log.last().cloned() else {
            return Ok(false);
        };
        match action {
            StepAction::Init { prior_root } => {
                self.tree.node_mut(self.root)?.payload = prior_root;
                self.current = None;
                self.path.pop();
            }
            StepAction::Descend {
                from,
                to,
                prior_child,
            } => {
                self.tree.node_mut(to)?.payload = prior_child;
                if let Some(count) = self.next_child.get_mut(&from) {
                    *count -= 1;
                }
                if from == self.root {
                    self.root_descents -= 1;
                }
                self.path.pop();
                self.current = Some(from);
            }
            StepAction::Expand {
                node,
                prior_kind,
                prior_payload,
                ..
            } => {
                // Children stay in the arena so recorded handles remain
                // valid; clearing `expanded` hides them from traversal
                // until a re-expansion reveals them again.
                let entry = self.tree.node_mut(node)?;
                entry.kind = prior_kind;
                entry.payload = prior_payload;
                entry.expanded = false;
            }
            StepAction::Ascend {
                from,
                to,
                prior_parent,
                cutoff,
            } => {
                self.tree.node_mut(to)?.payload = prior_parent;
                self.current = Some(from);
                self.path.push(from);
                if cutoff {
                    self.cutoffs.pop();
                }
            }
            StepAction::Finish { cutoff } => {
                self.current = Some(self.root);
                self.path.push(self.root);
                self.finished = false;
                if cutoff {
                    self.cutoffs.pop();
                }
            }
        }
        self.log.pop();
        Ok(true)
    }

    /// Turn away from `node`: finish the run at the root, ascend elsewhere.
    fn leave(&mut self, node: NodeHandle, cutoff: bool, at_root: bool) -> Result<bool> {
        if at_root {
            self.apply_finish(cutoff)?;
        } else {
            self.apply_ascend(node, cutoff)?;
        }
        Ok(true)
    }

    fn apply_init(&mut self) -> Result<()> {
        let prior_root = self.tree.node(self.root)?.payload.clone();
        self.rule.init_root(&mut self.tree, self.root)?;
        self.current = Some(self.root);
        self.path.push(self.root);
        self.log.push(StepAction::Init { prior_root });
        Ok(())
    }

    fn apply_expand(&mut self, node: NodeHandle) -> Result<()> {
        let expansion = self.rule.expand(&self.tree, node)?;
        let (prior_kind, prior_payload) = {
            let entry = self.tree.node(node)?;
            (entry.kind, entry.payload.clone())
        };
        // A re-expansion after an undo reuses the children it finds; only
        // a first-time expansion materializes new nodes.
        let mut created = Vec::new();
        if self.tree.node(node)?.children.is_empty() {
            for child in expansion.children {
                created.push(self.tree.add_child(node, child.kind, child.payload)?);
            }
        }
        {
            let entry = self.tree.node_mut(node)?;
            entry.kind = expansion.kind;
            entry.expanded = true;
        }
        self.rule.on_expanded(&mut self.tree, node)?;
        self.log.push(StepAction::Expand {
            node,
            created,
            prior_kind,
            prior_payload,
        });
        Ok(())
    }

    fn apply_descend(&mut self, parent: NodeHandle, child_index: usize) -> Result<()> {
        let child = self
            .tree
            .node(parent)?
            .children
            .get(child_index)
            .copied()
            .expect("selected child index is in range");
        let prior_child = self.tree.node(child)?.payload.clone();
        *self.next_child.entry(parent).or_insert(0) += 1;
        if parent == self.root {
            self.root_descents += 1;
        }
        self.rule.descend_into(&mut self.tree, parent, child)?;
        self.current = Some(child);
        self.path.push(child);
        self.log.push(StepAction::Descend {
            from: parent,
            to: child,
            prior_child,
        });
        Ok(())
    }

    fn apply_ascend(&mut self, from: NodeHandle, cutoff: bool) -> Result<()> {
        let parent = self.path[self.path.len() - 2];
        let prior_parent = self.tree.node(parent)?.payload.clone();
        self.rule.propagate_up(&mut self.tree, parent, from)?;
        self.path.pop();
        self.current = Some(parent);
        self.log.push(StepAction::Ascend {
            from,
            to: parent,
            prior_parent,
            cutoff,
        });
        Ok(())
    }

    fn apply_finish(&mut self, cutoff: bool) -> Result<()> {
        self.path.pop();
        self.current = None;
        self.finished = true;
        self.log.push(StepAction::Finish { cutoff });
        Ok(())
    }

    fn ascending(&self) -> bool {
        self.rule.full_ascent()
            && matches!(
                self.log.last(),
                Some(StepAction::Ascend { .. } | StepAction::Expand { .. })
            )
    }

    fn next_index(&self, node: NodeHandle) -> usize {
        self.next_child.get(&node).copied().unwrap_or(0)
    }

    fn notify(&mut self, propagating_up: bool) -> Result<()> {
        if self.presenters.is_empty() {
            return Ok(());
        }
        let view = StepView {
            tree: &self.tree,
            current: self.current,
            cutoffs: &self.cutoffs,
            propagating_up,
            finished: self.finished,
        };
        for presenter in &mut self.presenters {
            presenter.on_step(&view)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::alpha_beta::{self, GameKind, TreeStructure};
    use crate::stepper::StepAction;

    #[test]
    fn forward_after_finish_is_a_noop() {
        let structure: TreeStructure = "2".parse().unwrap();
        let mut stepper =
            alpha_beta::simulator(&structure, &[3.0, 7.0], GameKind::Maximizing).unwrap();
        stepper.run_to_end().unwrap();
        assert!(stepper.is_finished());
        let log_len = stepper.actions().len();
        assert!(!stepper.forward().unwrap());
        assert_eq!(stepper.actions().len(), log_len);
    }

    #[test]
    fn backward_at_start_is_a_noop() {
        let structure: TreeStructure = "2".parse().unwrap();
        let mut stepper =
            alpha_beta::simulator(&structure, &[3.0, 7.0], GameKind::Maximizing).unwrap();
        assert!(!stepper.backward().unwrap());
        stepper.forward().unwrap();
        assert!(stepper.backward().unwrap());
        assert!(!stepper.backward().unwrap());
    }

    #[test]
    fn two_leaf_tree_steps_through_expected_actions() {
        let structure: TreeStructure = "2".parse().unwrap();
        let mut stepper =
            alpha_beta::simulator(&structure, &[3.0, 7.0], GameKind::Maximizing).unwrap();
        stepper.run_to_end().unwrap();
        let labels: Vec<&str> = stepper.actions().iter().map(StepAction::label).collect();
        // init, down/up per leaf, finish
        assert_eq!(
            labels,
            vec![
                "init", "descend", "ascend", "descend", "ascend", "finish"
            ]
        );
        let root = stepper.tree().root().unwrap();
        assert_eq!(stepper.tree().node(root).unwrap().payload.value, Some(7.0));
    }
}
