//! Plain-text tree renderer for terminal traces.

use std::fmt;
use std::io::Write;

use crate::{
    Result,
    identifiers::NodeHandle,
    ports::{Presenter, StepView},
};

/// Renders each step as an indented tree with cursor and pruning marks.
///
/// The first column carries `>` for the cursor node and `x` for children
/// a cutoff skipped. Hidden (unexpanded) subtrees are not descended into,
/// mirroring what the traversal itself can see.
pub struct TextPresenter<W> {
    writer: W,
    step: usize,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, step: 0 }
    }

    /// Consume the presenter and hand back its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_node<K: fmt::Display, P: fmt::Display>(
        &mut self,
        view: &StepView<'_, K, P>,
        handle: NodeHandle,
        depth: usize,
        pruned: bool,
    ) -> Result<()> {
        let node = view.tree.node(handle)?;
        let marker = if view.current == Some(handle) {
            '>'
        } else if pruned {
            'x'
        } else {
            ' '
        };
        writeln!(
            self.writer,
            "{marker} {}{} {} {}",
            "  ".repeat(depth),
            handle,
            node.kind,
            node.payload
        )?;
        if !node.expanded {
            return Ok(());
        }
        let cut_from = view
            .cutoffs
            .iter()
            .filter(|cutoff| cutoff.node == handle)
            .map(|cutoff| cutoff.child_index)
            .min();
        for (index, child) in node.children.iter().enumerate() {
            let child_pruned = pruned || cut_from.is_some_and(|cut| index >= cut);
            self.write_node(view, *child, depth + 1, child_pruned)?;
        }
        Ok(())
    }
}

impl<W: Write, K: fmt::Display, P: fmt::Display> Presenter<K, P> for TextPresenter<W> {
    fn on_step(&mut self, view: &StepView<'_, K, P>) -> Result<()> {
        self.step += 1;
        let phase = if view.finished {
            " (finished)"
        } else if view.propagating_up {
            " (propagating up)"
        } else {
            ""
        };
        writeln!(self.writer, "--- step {}{phase} ---", self.step)?;
        if let Some(root) = view.tree.root() {
            self.write_node(view, root, 0, false)?;
        }
        Ok(())
    }
}
