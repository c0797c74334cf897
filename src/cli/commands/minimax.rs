//! Minimax command - run the reversible alpha-beta pruning simulator

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    adapters::TextPresenter,
    cli::output,
    export,
    rules::alpha_beta::{self, GameKind, TreeStructure, parse_leaf_values},
    utils::display_number,
};

#[derive(Parser, Debug)]
#[command(about = "Run alpha-beta pruning step by step", allow_negative_numbers = true)]
pub struct MinimaxArgs {
    /// Tree structure: per-layer child counts, e.g. "2|2,2|2,2,2,2"
    #[arg(long, short = 's', conflicts_with = "random_depth")]
    pub structure: Option<String>,

    /// Comma-separated leaf values, e.g. "11,-20,12,-10,-12,-5,-6,2"
    #[arg(long, short = 'l', conflicts_with = "random_depth")]
    pub leaves: Option<String>,

    /// Generate a random tree of this depth instead of --structure/--leaves
    #[arg(long)]
    pub random_depth: Option<usize>,

    /// Maximum node degree for --random-depth
    #[arg(long, default_value_t = 3)]
    pub max_degree: usize,

    /// Seed for --random-depth (deterministic)
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Which player moves at the root (`max` or `min`)
    #[arg(long, default_value = "max")]
    pub root_player: String,

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

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<GameKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "max" | "maximizing" => Ok(GameKind::Maximizing),
        "min" | "minimizing" => Ok(GameKind::Minimizing),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'max' or 'min')"
        )),
    }
}

pub fn execute(args: MinimaxArgs) -> Result<()> {
    let root_kind = parse_player_token(&args.root_player, "--root-player")?;

    let (structure, leaves) = if let Some(depth) = args.random_depth {
        let structure = TreeStructure::random(depth, args.max_degree, args.seed);
        let leaves = structure.random_leaves(args.seed);
        (structure, leaves)
    } else {
        let structure_text = args
            .structure
            .ok_or_else(|| anyhow!("provide --structure and --leaves, or --random-depth"))?;
        let leaves_text = args
            .leaves
            .ok_or_else(|| anyhow!("--structure requires --leaves"))?;
        (
            structure_text.parse::<TreeStructure>()?,
            parse_leaf_values(&leaves_text)?,
        )
    };

    let mut stepper = alpha_beta::simulator(&structure, &leaves, root_kind)?;
    if args.trace {
        stepper.attach(Box::new(TextPresenter::new(std::io::stdout())));
        while stepper.forward()? {}
    } else {
        stepper.run_to_end()?;
    }

    output::print_section("Alpha-beta result");
    let root = stepper.tree().root().expect("built tree has a root");
    let value = stepper.tree().node(root)?.payload.value;
    output::print_kv(
        "Root value",
        &value.map_or_else(|| "?".to_string(), display_number),
    );
    output::print_kv("Leaves", &structure.leaf_count().to_string());
    output::print_kv("Steps", &stepper.actions().len().to_string());
    output::print_kv("Cutoffs", &stepper.cutoffs().len().to_string());
    for cutoff in stepper.cutoffs() {
        output::print_kv(
            "",
            &format!("node {} from child {}", cutoff.node, cutoff.child_index),
        );
    }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_tokens_parse_case_insensitively() {
        assert_eq!(
            parse_player_token("MAX", "--root-player").unwrap(),
            GameKind::Maximizing
        );
        assert_eq!(
            parse_player_token(" min ", "--root-player").unwrap(),
            GameKind::Minimizing
        );
        assert!(parse_player_token("left", "--root-player").is_err());
    }
}
