//! In-memory presenter for testing.
//!
//! Captures an owned copy of every notification so tests can assert on
//! the exact sequence of states a stepper published.

use std::sync::{Arc, Mutex};

use crate::{
    Result,
    identifiers::NodeHandle,
    ports::{Presenter, StepView},
    stepper::Cutoff,
    tree::TreeSnapshot,
};

/// One recorded notification.
#[derive(Debug, Clone)]
pub struct RecordedStep<K, P> {
    pub tree: TreeSnapshot<K, P>,
    pub current: Option<NodeHandle>,
    pub cutoffs: Vec<Cutoff>,
    pub propagating_up: bool,
    pub finished: bool,
}

/// Presenter that appends every view it receives to a shared buffer.
///
/// Clones share the same storage, so a test can attach one clone to a
/// stepper and keep the other for inspection.
///
/// # Examples
///
/// ```
/// use retrace::adapters::RecordingPresenter;
/// use retrace::rules::alpha_beta::{self, GameKind, TreeStructure};
///
/// let recorder = RecordingPresenter::new();
/// let structure: TreeStructure = "2".parse()?;
/// let mut stepper = alpha_beta::simulator(&structure, &[3.0, 7.0], GameKind::Maximizing)?;
/// stepper.attach(Box::new(recorder.clone()));
/// stepper.forward()?;
/// assert_eq!(recorder.len(), 1);
/// # Ok::<(), retrace::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RecordingPresenter<K, P> {
    steps: Arc<Mutex<Vec<RecordedStep<K, P>>>>,
}

impl<K, P> RecordingPresenter<K, P> {
    /// Create a presenter with an empty buffer.
    pub fn new() -> Self {
        Self {
            steps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of notifications recorded so far.
    pub fn len(&self) -> usize {
        self.steps.lock().unwrap().len()
    }

    /// Return true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the most recent notification, if any.
    pub fn last(&self) -> Option<RecordedStep<K, P>>
    where
        K: Clone,
        P: Clone,
    {
        self.steps.lock().unwrap().last().cloned()
    }

    /// Copy of every recorded notification, oldest first.
    pub fn steps(&self) -> Vec<RecordedStep<K, P>>
    where
        K: Clone,
        P: Clone,
    {
        self.steps.lock().unwrap().clone()
    }
}

impl<K, P> Default for RecordingPresenter<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, P: Clone> Presenter<K, P> for RecordingPresenter<K, P> {
    fn on_step(&mut self, view: &StepView<'_, K, P>) -> Result<()> {
        self.steps.lock().unwrap().push(RecordedStep {
            tree: view.tree.snapshot(),
            current: view.current,
            cutoffs: view.cutoffs.to_vec(),
            propagating_up: view.propagating_up,
            finished: view.finished,
        });
        Ok(())
    }
}
