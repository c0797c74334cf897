//! CSV export of a stepping run's action log.
//!
//! One row per action, oldest first. Handles are written in their `#n`
//! display form; the `created` column lists the handles an expansion
//! materialized, separated by `;`.

use std::{fs::File, io::BufWriter, path::Path};

use crate::{Result, error::Error, stepper::StepAction};

/// Write the action log to `path` as CSV.
pub fn write_trace_csv<K, P>(actions: &[StepAction<K, P>], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create {}", path.display()),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    writer.write_record(["step", "action", "from", "to", "created", "cutoff"])?;

    for (step, action) in actions.iter().enumerate() {
        let (from, to, created, cutoff) = match action {
            StepAction::Init { .. } => (String::new(), String::new(), String::new(), String::new()),
            StepAction::Descend { from, to, .. } => {
                (from.to_string(), to.to_string(), String::new(), String::new())
            }
            StepAction::Expand { node, created, .. } => (
                node.to_string(),
                String::new(),
                created
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(";"),
                String::new(),
            ),
            StepAction::Ascend {
                from, to, cutoff, ..
            } => (
                from.to_string(),
                to.to_string(),
                String::new(),
                cutoff.to_string(),
            ),
            StepAction::Finish { cutoff } => (
                String::new(),
                String::new(),
                String::new(),
                cutoff.to_string(),
            ),
        };
        writer.write_record([
            step.to_string(),
            action.label().to_string(),
            from,
            to,
            created,
            cutoff,
        ])?;
    }
    writer.flush()?;
    Ok(())
}
