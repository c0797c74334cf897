//! Inverse-law and boundary-idempotence tests for the stepping engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use retrace::identifiers::{NodeHandle, NodeName};
use retrace::rules::ExpansionRule;
use retrace::rules::alpha_beta::{self, GameKind, TreeStructure};
use retrace::rules::ao_star::{self, AndOrGraph, Successors};
use retrace::stepper::{Cutoff, ReversibleStepper};
use retrace::tree::TreeSnapshot;

const STRUCTURE: &str = "2|2,2|2,2,2,2";
const LEAVES: [f64; 8] = [11.0, -20.0, 12.0, -10.0, -12.0, -5.0, -6.0, 2.0];

struct State<K, P> {
    tree: TreeSnapshot<K, P>,
    current: Option<NodeHandle>,
    cutoffs: Vec<Cutoff>,
    finished: bool,
}

fn capture<R: ExpansionRule>(stepper: &ReversibleStepper<R>) -> State<R::Kind, R::Payload> {
    State {
        tree: stepper.tree().snapshot(),
        current: stepper.current(),
        cutoffs: stepper.cutoffs().to_vec(),
        finished: stepper.is_finished(),
    }
}

/// Deep equality for every node that existed before the step, plus the
/// cursor and cutoff list. Nodes materialized by an expansion survive its
/// undo (handles must stay valid) but are hidden behind their parent's
/// cleared `expanded` flag, so the child handle lists are not compared.
fn assert_restored<K, P>(before: &State<K, P>, after: &State<K, P>)
where
    K: PartialEq + Debug,
    P: PartialEq + Debug,
{
    assert_eq!(before.current, after.current, "cursor not restored");
    assert_eq!(before.cutoffs, after.cutoffs, "cutoffs not restored");
    assert_eq!(before.finished, after.finished, "finished flag not restored");
    assert!(after.tree.nodes.len() >= before.tree.nodes.len());
    for (b, a) in before.tree.nodes.iter().zip(after.tree.nodes.iter()) {
        assert_eq!(b.kind, a.kind, "kind of {} not restored", b.handle);
        assert_eq!(
            b.expanded, a.expanded,
            "expanded flag of {} not restored",
            b.handle
        );
        assert_eq!(b.payload, a.payload, "payload of {} not restored", b.handle);
    }
}

/// For every reachable state: step forward, step backward, check that the
/// prior state is reproduced exactly, then step forward again.
fn check_inverse_law<R: ExpansionRule>(stepper: &mut ReversibleStepper<R>) {
    loop {
        let before = capture(stepper);
        if !stepper.forward().unwrap() {
            break;
        }
        assert!(stepper.backward().unwrap());
        assert_restored(&before, &capture(stepper));
        assert!(stepper.forward().unwrap());
    }
    assert!(stepper.is_finished());
}

fn layered_graph() -> AndOrGraph {
    AndOrGraph {
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
    }
}

#[test]
fn alpha_beta_forward_backward_restores_every_state() {
    let structure: TreeStructure = STRUCTURE.parse().unwrap();
    let mut stepper =
        alpha_beta::simulator(&structure, &LEAVES, GameKind::Maximizing).unwrap();
    check_inverse_law(&mut stepper);
}

#[test]
fn ao_star_forward_backward_restores_every_state() {
    let mut stepper = ao_star::solver(layered_graph()).unwrap();
    check_inverse_law(&mut stepper);
}

#[test]
fn rewind_restores_the_initial_state() {
    let structure: TreeStructure = STRUCTURE.parse().unwrap();
    let mut stepper =
        alpha_beta::simulator(&structure, &LEAVES, GameKind::Maximizing).unwrap();
    let initial = capture(&stepper);

    stepper.run_to_end().unwrap();
    assert!(stepper.is_finished());
    assert!(!stepper.cutoffs().is_empty());

    stepper.rewind_to_start().unwrap();
    assert_restored(&initial, &capture(&stepper));
    assert!(stepper.actions().is_empty());
    // Cutoff bookkeeping nets to zero across a full rewind.
    assert!(stepper.cutoffs().is_empty());
}

#[test]
fn ao_star_rewind_restores_the_initial_state() {
    let mut stepper = ao_star::solver(layered_graph()).unwrap();
    let initial = capture(&stepper);
    stepper.run_to_end().unwrap();
    stepper.rewind_to_start().unwrap();
    assert_restored(&initial, &capture(&stepper));
    assert!(stepper.cutoffs().is_empty());
}

#[test]
fn backward_at_the_start_boundary_is_idempotent() {
    let structure: TreeStructure = STRUCTURE.parse().unwrap();
    let mut stepper =
        alpha_beta::simulator(&structure, &LEAVES, GameKind::Maximizing).unwrap();
    for _ in 0..3 {
        assert!(!stepper.backward().unwrap());
    }
    let before = capture(&stepper);
    assert!(!stepper.backward().unwrap());
    assert_restored(&before, &capture(&stepper));
}

#[test]
fn forward_at_the_finish_boundary_is_idempotent() {
    let structure: TreeStructure = STRUCTURE.parse().unwrap();
    let mut stepper =
        alpha_beta::simulator(&structure, &LEAVES, GameKind::Maximizing).unwrap();
    stepper.run_to_end().unwrap();
    let finished = capture(&stepper);
    for _ in 0..3 {
        assert!(!stepper.forward().unwrap());
    }
    assert_restored(&finished, &capture(&stepper));
    assert_eq!(
        finished.cutoffs,
        stepper.cutoffs().to_vec(),
        "no-op forwards must not touch the cutoff list"
    );
}
