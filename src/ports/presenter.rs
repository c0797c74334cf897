//! Presenter port - abstraction for rendering step-by-step algorithm state.
//!
//! The engine notifies attached presenters after every successful step
//! (bulk operations suppress the intermediate notifications and emit
//! exactly one at the end). Presenters are expected to re-render
//! idempotently from the view they are handed; the engine makes no
//! assumption about rendering technology and never draws anything itself.

use crate::{
    Result,
    identifiers::NodeHandle,
    stepper::Cutoff,
    tree::SearchTree,
};

/// Read-only snapshot of a stepping run, borrowed for the duration of one
/// notification.
#[derive(Debug)]
pub struct StepView<'a, K, P> {
    /// The full tree at this instant.
    pub tree: &'a SearchTree<K, P>,
    /// The cursor node, or `None` before the first and after the last step.
    pub current: Option<NodeHandle>,
    /// Pruning annotations currently in effect, in the order they fired.
    pub cutoffs: &'a [Cutoff],
    /// Whether the step that produced this view propagated a result upward
    /// (presenters use this to show the bound-update equation form).
    pub propagating_up: bool,
    /// Whether the run has completed.
    pub finished: bool,
}

/// Presenter trait for consuming step-by-step state.
///
/// # Examples
///
/// ```
/// use retrace::ports::{Presenter, StepView};
///
/// struct StepCounter {
///     steps: usize,
/// }
///
/// impl<K, P> Presenter<K, P> for StepCounter {
///     fn on_step(&mut self, _view: &StepView<'_, K, P>) -> retrace::Result<()> {
///         self.steps += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Presenter<K, P> {
    /// Called once per successful step (or once per bulk operation).
    fn on_step(&mut self, view: &StepView<'_, K, P>) -> Result<()>;
}
