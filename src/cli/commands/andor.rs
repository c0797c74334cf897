//! Andor command - solve an AND/OR graph with the AO* simulator

use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::TextPresenter,
    cli::output,
    export,
    identifiers::NodeName,
    rules::ao_star::{self, AndOrGraph, SolveOutcome},
    utils::display_number,
};

#[derive(Parser, Debug)]
#[command(about = "Solve an AND/OR graph with AO*")]
pub struct AndorArgs {
    /// JSON file with the graph, heuristics, goals and start node
    pub graph: PathBuf,

    /// Override the start node name
    #[arg(long)]
    pub start: Option<String>,

    /// Cap on top-level iterations before reporting "no solution"
    #[arg(long, default_value_t = ao_star::MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Print the tree after every step
    #[arg(long, default_value_t = false)]
    pub trace: bool,

    /// Write the step log as CSV
    #[arg(long)]
    pub export_trace: Option<PathBuf>,

    /// Write the final tree as JSON
    #[arg(long)]
    pub export_tree: Option<PathBuf>,
}

pub fn execute(args: AndorArgs) -> Result<()> {
    let file = File::open(&args.graph)
        .with_context(|| format!("open graph file {}", args.graph.display()))?;
    let mut graph: AndOrGraph = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse graph file {}", args.graph.display()))?;
    if let Some(start) = args.start {
        graph.start = NodeName::new(start);
    }

    let mut stepper = ao_star::solver_with_cap(graph, args.max_iterations)?;
    if args.trace {
        stepper.attach(Box::new(TextPresenter::new(std::io::stdout())));
        while stepper.forward()? {}
    } else {
        let spinner = output::create_spinner("searching");
        stepper.run_to_end()?;
        spinner.finish_and_clear();
    }

    output::print_section("AO* result");
    match ao_star::outcome(&stepper)? {
        SolveOutcome::Solved(solution) => {
            output::print_kv("Solution cost", &display_number(solution.cost));
            output::print_kv("Solution tree", &solution.path_string());
        }
        SolveOutcome::NoSolution { iterations } => {
            output::print_kv("Outcome", "no solution found");
            output::print_kv("Iterations", &iterations.to_string());
        }
    }
    output::print_kv("Steps", &stepper.actions().len().to_string());
    output::print_kv("Nodes explored", &stepper.tree().len().to_string());

    if let Some(path) = args.export_trace {
        export::write_trace_csv(stepper.actions(), &path)?;
        output::print_kv("Trace CSV", &path.display().to_string());
    }
    if let Some(path) = args.export_tree {
        export::write_tree_json(stepper.tree(), &path)?;
        output::print_kv("Tree JSON", &path.display().to_string());
    }
    Ok(())
}
