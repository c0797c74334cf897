//! AO* search over a caller-supplied AND/OR graph.
//!
//! The graph is a map from node name to an AND- or OR-connected successor
//! list with edge costs, plus a heuristic map and a set of goal names.
//! The search tree is unrolled lazily: each expansion step materializes
//! one node's successors, propagation bubbles the F estimates back to the
//! root, and the next descent re-chooses its path by the updated
//! estimates. A run that exhausts its iteration cap reports "no solution"
//! as an ordinary outcome.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ChildSpec, ExpansionRule, Expansion};
use crate::{
    Result,
    error::Error,
    identifiers::{NodeHandle, NodeName},
    stepper::ReversibleStepper,
    tree::SearchTree,
    utils::display_number,
};

/// Default cap on root-level descents, matching the classic formulation's
/// safety valve against malformed (e.g. cyclic) graphs.
pub const MAX_ITERATIONS: usize = 100;

/// Connector tag of an AND/OR node. `Undetermined` until expansion reads
/// the node's entry from the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AndOrKind {
    And,
    Or,
    Undetermined,
}

impl fmt::Display for AndOrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AndOrKind::And => write!(f, "AND"),
            AndOrKind::Or => write!(f, "OR"),
            AndOrKind::Undetermined => write!(f, "?"),
        }
    }
}

/// Per-node scalars for AO*.
///
/// `f` is the running total-cost estimate (edge cost into the node plus
/// the heuristic, replaced by the aggregated children estimate once the
/// node has children). A `dead_end` node has no successors and is not a
/// goal; its estimate is the +infinity sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndOrState {
    pub name: NodeName,
    pub h: f64,
    pub edge_cost: f64,
    pub f: f64,
    pub goal: bool,
    pub solved: bool,
    pub searched: bool,
    pub dead_end: bool,
}

impl fmt::Display for AndOrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} F={}", self.name, display_number(self.f))?;
        if self.solved {
            write!(f, " solved")?;
        }
        if self.dead_end {
            write!(f, " dead-end")?;
        }
        Ok(())
    }
}

/// Successor list of one graph node: the connector plus `(child, cost)`
/// edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Successors {
    #[serde(rename = "AND")]
    And(Vec<(NodeName, f64)>),
    #[serde(rename = "OR")]
    Or(Vec<(NodeName, f64)>),
}

impl Successors {
    pub fn kind(&self) -> AndOrKind {
        match self {
            Successors::And(_) => AndOrKind::And,
            Successors::Or(_) => AndOrKind::Or,
        }
    }

    pub fn edges(&self) -> &[(NodeName, f64)] {
        match self {
            Successors::And(edges) | Successors::Or(edges) => edges,
        }
    }
}

fn default_start() -> NodeName {
    NodeName::new("S")
}

/// Caller-supplied description of an AND/OR problem.
///
/// A name absent from `graph` (or mapped to an empty successor list) is a
/// dead end unless it appears in `goals`. Every referenced name must have
/// a heuristic value.
///
/// # Examples
///
/// ```
/// use retrace::rules::ao_star::AndOrGraph;
///
/// let graph: AndOrGraph = serde_json::from_str(
///     r#"{
///         "graph": { "S": { "OR": [["G", 1.0]] } },
///         "heuristics": { "S": 0.0, "G": 0.0 },
///         "goals": ["G"]
///     }"#,
/// )?;
/// graph.validate()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndOrGraph {
    pub graph: BTreeMap<NodeName, Successors>,
    pub heuristics: BTreeMap<NodeName, f64>,
    #[serde(default)]
    pub goals: BTreeSet<NodeName>,
    #[serde(default = "default_start")]
    pub start: NodeName,
}

impl AndOrGraph {
    /// Check the description for missing heuristics and malformed costs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeuristic`] or [`Error::InvalidEdgeCost`];
    /// no stepper is ever created over an invalid graph.
    pub fn validate(&self) -> Result<()> {
        if !self.heuristics.contains_key(self.start.as_str()) {
            return Err(Error::MissingHeuristic {
                name: self.start.to_string(),
            });
        }
        for successors in self.graph.values() {
            for (child, cost) in successors.edges() {
                if !cost.is_finite() || *cost < 0.0 {
                    return Err(Error::InvalidEdgeCost {
                        name: child.to_string(),
                        value: *cost,
                    });
                }
                if !self.heuristics.contains_key(child.as_str()) {
                    return Err(Error::MissingHeuristic {
                        name: child.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The AO* expansion rule: owns the problem description and unrolls it
/// into the search tree one expansion at a time.
#[derive(Debug, Clone)]
pub struct AoStar {
    graph: AndOrGraph,
    max_iterations: usize,
}

impl AoStar {
    /// Create the rule with the default iteration cap.
    ///
    /// # Errors
    ///
    /// Fails if the graph description does not validate.
    pub fn new(graph: AndOrGraph) -> Result<Self> {
        Self::with_iteration_cap(graph, MAX_ITERATIONS)
    }

    /// Create the rule with an explicit iteration cap.
    pub fn with_iteration_cap(graph: AndOrGraph, max_iterations: usize) -> Result<Self> {
        graph.validate()?;
        Ok(Self {
            graph,
            max_iterations,
        })
    }

    /// The problem description this rule searches.
    pub fn graph(&self) -> &AndOrGraph {
        &self.graph
    }

    /// A tree holding just the start node, ready for stepping.
    pub fn initial_tree(&self) -> Result<SearchTree<AndOrKind, AndOrState>> {
        let mut tree = SearchTree::new();
        tree.create_root(
            AndOrKind::Undetermined,
            self.node_state(&self.graph.start.clone(), 0.0)?,
        )?;
        Ok(tree)
    }

    fn node_state(&self, name: &NodeName, edge_cost: f64) -> Result<AndOrState> {
        let h = self
            .graph
            .heuristics
            .get(name.as_str())
            .copied()
            .ok_or_else(|| Error::MissingHeuristic {
                name: name.to_string(),
            })?;
        Ok(AndOrState {
            name: name.clone(),
            h,
            edge_cost,
            f: edge_cost + h,
            goal: self.graph.goals.contains(name.as_str()),
            solved: false,
            searched: false,
            dead_end: false,
        })
    }

    /// Recompute a node's aggregates from its children: `F = edge + sum`
    /// for AND, `F = edge + min` for OR; solved iff all/any children
    /// solved; searched iff all children expanded.
    fn refresh(
        &self,
        tree: &mut SearchTree<AndOrKind, AndOrState>,
        node: NodeHandle,
    ) -> Result<()> {
        let kind = tree.node(node)?.kind;
        let children = tree.node(node)?.children.clone();
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut all_solved = true;
        let mut any_solved = false;
        let mut all_expanded = true;
        for child in &children {
            let child_node = tree.node(*child)?;
            sum += child_node.payload.f;
            if child_node.payload.f < min {
                min = child_node.payload.f;
            }
            all_solved &= child_node.payload.solved;
            any_solved |= child_node.payload.solved;
            all_expanded &= child_node.expanded;
        }
        let entry = tree.node_mut(node)?;
        match kind {
            AndOrKind::And => {
                entry.payload.f = entry.payload.edge_cost + sum;
                entry.payload.solved = entry.payload.goal || all_solved;
            }
            AndOrKind::Or => {
                entry.payload.f = entry.payload.edge_cost + min;
                entry.payload.solved = entry.payload.goal || any_solved;
            }
            AndOrKind::Undetermined => {
                return Err(Error::UndeterminedNode { handle: node });
            }
        }
        entry.payload.searched = all_expanded;
        Ok(())
    }
}

impl ExpansionRule for AoStar {
    type Kind = AndOrKind;
    type Payload = AndOrState;

    fn init_root(
        &self,
        tree: &mut SearchTree<AndOrKind, AndOrState>,
        root: NodeHandle,
    ) -> Result<()> {
        let entry = tree.node_mut(root)?;
        entry.payload.f = entry.payload.edge_cost + entry.payload.h;
        Ok(())
    }

    fn expand(
        &self,
        tree: &SearchTree<AndOrKind, AndOrState>,
        node: NodeHandle,
    ) -> Result<Expansion<AndOrKind, AndOrState>> {
        let name = tree.node(node)?.payload.name.clone();
        let (kind, edges) = match self.graph.graph.get(name.as_str()) {
            Some(successors) => (successors.kind(), successors.edges()),
            // Absent entries behave like empty ones: a dead end unless the
            // node is a goal.
            None => (tree.node(node)?.kind, &[] as &[(NodeName, f64)]),
        };
        let mut children = Vec::with_capacity(edges.len());
        for (child_name, cost) in edges {
            children.push(ChildSpec {
                kind: AndOrKind::Undetermined,
                payload: self.node_state(child_name, *cost)?,
            });
        }
        Ok(Expansion { kind, children })
    }

    fn on_expanded(
        &self,
        tree: &mut SearchTree<AndOrKind, AndOrState>,
        node: NodeHandle,
    ) -> Result<()> {
        if tree.node(node)?.payload.goal {
            tree.node_mut(node)?.payload.solved = true;
        }
        if tree.node(node)?.children.is_empty() {
            if !tree.node(node)?.payload.goal {
                let entry = tree.node_mut(node)?;
                entry.payload.dead_end = true;
                entry.payload.f = f64::INFINITY;
            }
        } else {
            self.refresh(tree, node)?;
        }
        Ok(())
    }

    fn propagate_up(
        &self,
        tree: &mut SearchTree<AndOrKind, AndOrState>,
        parent: NodeHandle,
        _child: NodeHandle,
    ) -> Result<()> {
        self.refresh(tree, parent)
    }

    fn is_complete(
        &self,
        tree: &SearchTree<AndOrKind, AndOrState>,
        node: NodeHandle,
    ) -> Result<bool> {
        let payload = &tree.node(node)?.payload;
        Ok(payload.solved || payload.dead_end)
    }

    fn prune_check(
        &self,
        tree: &SearchTree<AndOrKind, AndOrState>,
        node: NodeHandle,
    ) -> Result<bool> {
        // A solved node with unexpanded children stopped exploring its
        // remaining alternatives; record that for the presenter.
        let entry = tree.node(node)?;
        if !entry.payload.solved {
            return Ok(false);
        }
        for child in &entry.children {
            if !tree.node(*child)?.expanded {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn select_child(
        &self,
        tree: &SearchTree<AndOrKind, AndOrState>,
        node: NodeHandle,
        _next_index: usize,
    ) -> Result<Option<usize>> {
        // Dead ends can never become solved, so traversal never re-enters
        // them; a node whose eligible children are exhausted is abandoned.
        let entry = tree.node(node)?;
        match entry.kind {
            AndOrKind::Or => {
                // Minimum-F unsolved child, first encountered on ties.
                let mut best: Option<(usize, f64)> = None;
                for (index, child) in entry.children.iter().enumerate() {
                    let payload = &tree.node(*child)?.payload;
                    if payload.solved || payload.dead_end {
                        continue;
                    }
                    if best.is_none_or(|(_, f)| payload.f < f) {
                        best = Some((index, payload.f));
                    }
                }
                Ok(best.map(|(index, _)| index))
            }
            AndOrKind::And => {
                for (index, child) in entry.children.iter().enumerate() {
                    let payload = &tree.node(*child)?.payload;
                    if !payload.searched && !payload.solved && !payload.dead_end {
                        return Ok(Some(index));
                    }
                }
                Ok(None)
            }
            AndOrKind::Undetermined => Err(Error::UndeterminedNode { handle: node }),
        }
    }

    fn full_ascent(&self) -> bool {
        true
    }

    fn iteration_cap(&self) -> Option<usize> {
        Some(self.max_iterations)
    }
}

/// The result of an AO* run: either a solution or a bounded "not found".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SolveOutcome {
    Solved(Solution),
    NoSolution { iterations: usize },
}

/// A solved AND/OR problem: total cost (the root's F) and the chosen
/// node names in preorder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub cost: f64,
    pub path: Vec<NodeName>,
}

impl Solution {
    /// The path as a space-separated string, e.g. `"S A C D"`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(NodeName::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build a stepper over `graph` with the default iteration cap.
pub fn solver(graph: AndOrGraph) -> Result<ReversibleStepper<AoStar>> {
    solver_with_cap(graph, MAX_ITERATIONS)
}

/// Build a stepper over `graph` with an explicit iteration cap.
pub fn solver_with_cap(
    graph: AndOrGraph,
    max_iterations: usize,
) -> Result<ReversibleStepper<AoStar>> {
    let rule = AoStar::with_iteration_cap(graph, max_iterations)?;
    let tree = rule.initial_tree()?;
    ReversibleStepper::new(rule, tree)
}

/// Run AO* to completion and report the outcome.
///
/// # Errors
///
/// Fails only on an invalid graph description; exhausting the iteration
/// cap is reported as [`SolveOutcome::NoSolution`], not as an error.
pub fn solve(graph: AndOrGraph) -> Result<SolveOutcome> {
    let mut stepper = solver(graph)?;
    stepper.run_to_end()?;
    outcome(&stepper)
}

/// Read the outcome off a finished (or abandoned) stepper.
pub fn outcome(stepper: &ReversibleStepper<AoStar>) -> Result<SolveOutcome> {
    let tree = stepper.tree();
    let root = tree.root().ok_or(Error::MissingRoot)?;
    let root_node = tree.node(root)?;
    if !root_node.payload.solved {
        return Ok(SolveOutcome::NoSolution {
            iterations: stepper.iterations(),
        });
    }

    let mut path = Vec::new();
    let mut stack = vec![root];
    while let Some(handle) = stack.pop() {
        let node = tree.node(handle)?;
        path.push(node.payload.name.clone());
        match node.kind {
            AndOrKind::And => {
                // All children participate in an AND solution; reversed so
                // the stack pops them in list order.
                for child in node.children.iter().rev() {
                    if tree.node(*child)?.payload.solved {
                        stack.push(*child);
                    }
                }
            }
            AndOrKind::Or => {
                // Only the chosen alternative: minimum-F solved child.
                let mut best: Option<(NodeHandle, f64)> = None;
                for child in &node.children {
                    let payload = &tree.node(*child)?.payload;
                    if payload.solved && best.is_none_or(|(_, f)| payload.f < f) {
                        best = Some((*child, payload.f));
                    }
                }
                if let Some((chosen, _)) = best {
                    stack.push(chosen);
                }
            }
            AndOrKind::Undetermined => {}
        }
    }
    Ok(SolveOutcome::Solved(Solution {
        cost: root_node.payload.f,
        path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_edge_graph() -> AndOrGraph {
        AndOrGraph {
            graph: BTreeMap::from([(
                NodeName::new("S"),
                Successors::Or(vec![(NodeName::new("G"), 1.0)]),
            )]),
            heuristics: BTreeMap::from([(NodeName::new("S"), 0.0), (NodeName::new("G"), 0.0)]),
            goals: BTreeSet::from([NodeName::new("G")]),
            start: NodeName::new("S"),
        }
    }

    #[test]
    fn validation_requires_heuristics_for_referenced_nodes() {
        let mut graph = single_edge_graph();
        graph.heuristics.remove("G");
        assert!(matches!(
            graph.validate(),
            Err(Error::MissingHeuristic { name }) if name == "G"
        ));
    }

    #[test]
    fn validation_rejects_negative_edge_costs() {
        let mut graph = single_edge_graph();
        graph.graph.insert(
            NodeName::new("S"),
            Successors::Or(vec![(NodeName::new("G"), -1.0)]),
        );
        assert!(matches!(
            graph.validate(),
            Err(Error::InvalidEdgeCost { .. })
        ));
    }

    #[test]
    fn single_edge_problem_solves_at_cost_one() {
        let outcome = solve(single_edge_graph()).unwrap();
        match outcome {
            SolveOutcome::Solved(solution) => {
                assert_eq!(solution.cost, 1.0);
                assert_eq!(solution.path_string(), "S G");
            }
            SolveOutcome::NoSolution { .. } => panic!("expected a solution"),
        }
    }

    #[test]
    fn start_node_without_successors_is_a_dead_end() {
        let graph = AndOrGraph {
            graph: BTreeMap::new(),
            heuristics: BTreeMap::from([(NodeName::new("S"), 5.0)]),
            goals: BTreeSet::new(),
            start: NodeName::new("S"),
        };
        let outcome = solve(graph).unwrap();
        assert!(matches!(outcome, SolveOutcome::NoSolution { .. }));
    }

    #[test]
    fn graph_description_deserializes_from_json() {
        let graph: AndOrGraph = serde_json::from_str(
            r#"{
                "graph": {
                    "S": { "OR": [["A", 1.0], ["B", 2.0]] },
                    "A": { "AND": [["C", 1.0], ["D", 1.0]] }
                },
                "heuristics": { "S": 0.0, "A": 1.0, "B": 1.0, "C": 0.0, "D": 0.0 },
                "goals": ["C", "D"]
            }"#,
        )
        .unwrap();
        assert_eq!(graph.start, "S");
        assert_eq!(graph.graph.len(), 2);
        graph.validate().unwrap();
    }
}
