//! Replay-determinism tests: rewinding and re-running a simulation must
//! reproduce the identical action log and final result.

use std::collections::{BTreeMap, BTreeSet};

use retrace::identifiers::NodeName;
use retrace::rules::alpha_beta::{self, GameKind, TreeStructure};
use retrace::rules::ao_star::{self, AndOrGraph, SolveOutcome, Successors};

#[test]
fn alpha_beta_replay_reproduces_the_log() {
    let structure: TreeStructure = "2|2,2|2,2,2,2".parse().unwrap();
    let leaves = [11.0, -20.0, 12.0, -10.0, -12.0, -5.0, -6.0, 2.0];
    let mut stepper = alpha_beta::simulator(&structure, &leaves, GameKind::Maximizing).unwrap();
    stepper.run_to_end().unwrap();
    let root = stepper.tree().root().unwrap();
    let first_value = stepper.tree().node(root).unwrap().payload.value;

    stepper.rewind_to_start().unwrap();
    stepper.run_to_end().unwrap();
    let log_a = stepper.actions().to_vec();
    let cutoffs_a = stepper.cutoffs().to_vec();

    stepper.rewind_to_start().unwrap();
    stepper.run_to_end().unwrap();
    let log_b = stepper.actions().to_vec();

    assert_eq!(log_a, log_b);
    assert_eq!(cutoffs_a, stepper.cutoffs().to_vec());
    assert_eq!(first_value, stepper.tree().node(root).unwrap().payload.value);
}

#[test]
fn seeded_random_trees_replay_identically() {
    for seed in [3, 17, 2024] {
        let structure = TreeStructure::random(4, 3, seed);
        let leaves = structure.random_leaves(seed);
        let mut stepper =
            alpha_beta::simulator(&structure, &leaves, GameKind::Maximizing).unwrap();

        stepper.run_to_end().unwrap();
        let root = stepper.tree().root().unwrap();
        let value = stepper.tree().node(root).unwrap().payload.value;
        assert!(value.is_some(), "seed {seed}: run left the root unvalued");

        stepper.rewind_to_start().unwrap();
        stepper.run_to_end().unwrap();
        let log_a = stepper.actions().to_vec();

        stepper.rewind_to_start().unwrap();
        stepper.run_to_end().unwrap();

        assert_eq!(log_a, stepper.actions(), "seed {seed}: logs diverged");
        assert_eq!(
            value,
            stepper.tree().node(root).unwrap().payload.value,
            "seed {seed}: values diverged"
        );
    }
}

#[test]
fn ao_star_replay_reproduces_log_and_outcome() {
    let graph = AndOrGraph {
        graph: BTreeMap::from([
            (
                NodeName::new("S"),
                Successors::Or(vec![(NodeName::new("A"), 1.0), (NodeName::new("B"), 2.0)]),
            ),
            (
                NodeName::new("A"),
                Successors::And(vec![(NodeName::new("C"), 1.0), (NodeName::new("D"), 1.0)]),
            ),
            (
                NodeName::new("B"),
                Successors::Or(vec![(NodeName::new("E"), 1.0)]),
            ),
        ]),
        heuristics: BTreeMap::from([
            (NodeName::new("S"), 0.0),
            (NodeName::new("A"), 1.0),
            (NodeName::new("B"), 1.0),
            (NodeName::new("C"), 0.0),
            (NodeName::new("D"), 0.0),
            (NodeName::new("E"), 0.0),
        ]),
        goals: BTreeSet::from([NodeName::new("C"), NodeName::new("D"), NodeName::new("E")]),
        start: NodeName::new("S"),
    };

    let mut stepper = ao_star::solver(graph).unwrap();
    stepper.run_to_end().unwrap();
    let first = ao_star::outcome(&stepper).unwrap();
    assert!(matches!(first, SolveOutcome::Solved(_)));

    stepper.rewind_to_start().unwrap();
    stepper.run_to_end().unwrap();
    let log_a = stepper.actions().to_vec();
    let second = ao_star::outcome(&stepper).unwrap();

    stepper.rewind_to_start().unwrap();
    stepper.run_to_end().unwrap();

    assert_eq!(log_a, stepper.actions());
    assert_eq!(first, second);
    assert_eq!(second, ao_star::outcome(&stepper).unwrap());
}
