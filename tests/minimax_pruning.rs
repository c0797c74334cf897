//! Alpha-beta acceptance tests over the canonical 2|2,2|2,2,2,2 tree.

use retrace::identifiers::NodeHandle;
use retrace::rules::alpha_beta::{self, GameKind, TreeStructure};
use retrace::stepper::{Cutoff, StepAction};

const STRUCTURE: &str = "2|2,2|2,2,2,2";
const LEAVES: [f64; 8] = [11.0, -20.0, 12.0, -10.0, -12.0, -5.0, -6.0, 2.0];

fn value_of(stepper: &retrace::ReversibleStepper<alpha_beta::AlphaBeta>, index: usize) -> Option<f64> {
    stepper
        .tree()
        .node(NodeHandle::new(index))
        .unwrap()
        .payload
        .value
}

#[test]
fn maximizing_root_prunes_two_subtrees() {
    let structure: TreeStructure = STRUCTURE.parse().unwrap();
    let mut stepper = alpha_beta::simulator(&structure, &LEAVES, GameKind::Maximizing).unwrap();
    stepper.run_to_end().unwrap();

    // Layer handles: root #0; min #1 #2; max #3..#6; leaves #7..#14.
    assert_eq!(value_of(&stepper, 0), Some(11.0));
    assert_eq!(value_of(&stepper, 1), Some(11.0));
    assert_eq!(value_of(&stepper, 3), Some(11.0));
    // The second leaf under #4 (value -10) and the whole #6 subtree are
    // never visited.
    assert_eq!(
        stepper.cutoffs(),
        &[
            Cutoff {
                node: NodeHandle::new(4),
                child_index: 1
            },
            Cutoff {
                node: NodeHandle::new(2),
                child_index: 1
            },
        ]
    );
    assert_eq!(value_of(&stepper, 10), Some(-10.0)); // pruned leaf keeps its input value
    assert_eq!(value_of(&stepper, 6), None); // pruned subtree never computed
}

#[test]
fn minimizing_root_reaches_minus_ten() {
    let structure: TreeStructure = STRUCTURE.parse().unwrap();
    let mut stepper = alpha_beta::simulator(&structure, &LEAVES, GameKind::Minimizing).unwrap();
    stepper.run_to_end().unwrap();

    assert_eq!(value_of(&stepper, 0), Some(-10.0));
    // Every leaf is visited; the only annotation is the vacuous one at #2,
    // whose bound condition first holds after its last child returns.
    assert_eq!(
        stepper.cutoffs(),
        &[Cutoff {
            node: NodeHandle::new(2),
            child_index: 2
        }]
    );
    for leaf in 7..=14 {
        assert!(value_of(&stepper, leaf).is_some());
    }
}

#[test]
fn run_brackets_with_init_and_finish() {
    let structure: TreeStructure = STRUCTURE.parse().unwrap();
    let mut stepper = alpha_beta::simulator(&structure, &LEAVES, GameKind::Maximizing).unwrap();
    stepper.run_to_end().unwrap();

    let actions = stepper.actions();
    assert!(matches!(actions.first(), Some(StepAction::Init { .. })));
    assert!(matches!(
        actions.last(),
        Some(StepAction::Finish { cutoff: false })
    ));
    // A pre-built game tree is fully revealed: no expansion steps appear.
    assert!(
        actions
            .iter()
            .all(|action| !matches!(action, StepAction::Expand { .. }))
    );
}

#[test]
fn bounds_inherit_downward_and_tighten_upward() {
    let structure: TreeStructure = STRUCTURE.parse().unwrap();
    let mut stepper = alpha_beta::simulator(&structure, &LEAVES, GameKind::Maximizing).unwrap();
    stepper.run_to_end().unwrap();

    // #4 is the maximizing node whose first leaf (12) raised alpha past
    // the inherited beta of 11, triggering the first cutoff.
    let node = stepper.tree().node(NodeHandle::new(4)).unwrap();
    assert_eq!(node.payload.value, Some(12.0));
    assert_eq!(node.payload.alpha, Some(12.0));
    assert_eq!(node.payload.beta, Some(11.0));
}
