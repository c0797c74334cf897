//! Alpha-beta pruning over a pre-built game tree.
//!
//! The game tree is supplied wholesale at construction - either parsed
//! from the `"n|m1,m2|..."` structure notation plus a leaf-value list, or
//! generated from a seed - and every node starts revealed, so a run
//! consists purely of descend/ascend steps. Kinds alternate by depth.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{ExpansionRule, Expansion};
use crate::{
    Result,
    error::Error,
    identifiers::NodeHandle,
    stepper::ReversibleStepper,
    tree::SearchTree,
    utils::display_number,
};

/// Which player moves at a node of the game tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    Maximizing,
    Minimizing,
}

impl GameKind {
    /// The kind of this node's children.
    pub fn opponent(self) -> Self {
        match self {
            GameKind::Maximizing => GameKind::Minimizing,
            GameKind::Minimizing => GameKind::Maximizing,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Maximizing => write!(f, "max"),
            GameKind::Minimizing => write!(f, "min"),
        }
    }
}

/// Per-node scalars for alpha-beta: the minimax value and the two bounds.
///
/// `None` means "not yet computed"; backward steps restore it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GameBounds {
    pub value: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
}

impl fmt::Display for GameBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| v.map_or_else(|| "?".to_string(), display_number);
        write!(
            f,
            "v={} \u{3b1}={} \u{3b2}={}",
            show(self.value),
            show(self.alpha),
            show(self.beta)
        )
    }
}

/// The alpha-beta expansion rule. Stateless: the whole game is in the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaBeta;

impl ExpansionRule for AlphaBeta {
    type Kind = GameKind;
    type Payload = GameBounds;

    fn init_root(
        &self,
        tree: &mut SearchTree<GameKind, GameBounds>,
        root: NodeHandle,
    ) -> Result<()> {
        let entry = tree.node_mut(root)?;
        entry.payload.alpha = Some(f64::NEG_INFINITY);
        entry.payload.beta = Some(f64::INFINITY);
        Ok(())
    }

    fn expand(
        &self,
        tree: &SearchTree<GameKind, GameBounds>,
        node: NodeHandle,
    ) -> Result<Expansion<GameKind, GameBounds>> {
        // Pre-built trees are fully revealed at construction; expansion
        // only re-reveals a node hidden by an undo.
        Ok(Expansion {
            kind: tree.node(node)?.kind,
            children: Vec::new(),
        })
    }

    fn descend_into(
        &self,
        tree: &mut SearchTree<GameKind, GameBounds>,
        parent: NodeHandle,
        child: NodeHandle,
    ) -> Result<()> {
        let (alpha, beta) = {
            let entry = tree.node(parent)?;
            (entry.payload.alpha, entry.payload.beta)
        };
        let entry = tree.node_mut(child)?;
        entry.payload.alpha = alpha;
        entry.payload.beta = beta;
        // A leaf's own bound collapses onto its value.
        if entry.children.is_empty() {
            match entry.kind {
                GameKind::Maximizing => entry.payload.alpha = entry.payload.value,
                GameKind::Minimizing => entry.payload.beta = entry.payload.value,
            }
        }
        Ok(())
    }

    fn propagate_up(
        &self,
        tree: &mut SearchTree<GameKind, GameBounds>,
        parent: NodeHandle,
        child: NodeHandle,
    ) -> Result<()> {
        let child_value = tree
            .node(child)?
            .payload
            .value
            .ok_or(Error::MissingValue { handle: child })?;
        let entry = tree.node_mut(parent)?;
        entry.payload.value = Some(match (entry.payload.value, entry.kind) {
            (Some(value), GameKind::Maximizing) => value.max(child_value),
            (Some(value), GameKind::Minimizing) => value.min(child_value),
            (None, _) => child_value,
        });
        match entry.kind {
            GameKind::Maximizing => {
                let alpha = entry
                    .payload
                    .alpha
                    .ok_or(Error::MissingValue { handle: parent })?;
                entry.payload.alpha = Some(alpha.max(child_value));
            }
            GameKind::Minimizing => {
                let beta = entry
                    .payload
                    .beta
                    .ok_or(Error::MissingValue { handle: parent })?;
                entry.payload.beta = Some(beta.min(child_value));
            }
        }
        Ok(())
    }

    fn is_complete(
        &self,
        _tree: &SearchTree<GameKind, GameBounds>,
        _node: NodeHandle,
    ) -> Result<bool> {
        Ok(false)
    }

    fn prune_check(
        &self,
        tree: &SearchTree<GameKind, GameBounds>,
        node: NodeHandle,
    ) -> Result<bool> {
        let payload = &tree.node(node)?.payload;
        match (payload.alpha, payload.beta) {
            (Some(alpha), Some(beta)) => Ok(alpha >= beta),
            _ => Ok(false),
        }
    }

    fn select_child(
        &self,
        tree: &SearchTree<GameKind, GameBounds>,
        node: NodeHandle,
        next_index: usize,
    ) -> Result<Option<usize>> {
        Ok((next_index < tree.node(node)?.children.len()).then_some(next_index))
    }
}

/// The per-layer branching description of a game tree.
///
/// Parsed from the `"n|m1,m2|..."` notation: each `|`-separated layer
/// lists the child count of every node produced by the layer above, so the
/// number of entries in a layer must equal the degree sum of the previous
/// one (and the first layer has exactly one entry, the root's degree).
///
/// # Examples
///
/// ```
/// use retrace::rules::alpha_beta::TreeStructure;
///
/// let structure: TreeStructure = "2|2,2|2,2,2,2".parse()?;
/// assert_eq!(structure.depth(), 3);
/// assert_eq!(structure.leaf_count(), 8);
/// # Ok::<(), retrace::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStructure {
    layers: Vec<Vec<usize>>,
}

impl TreeStructure {
    /// The per-layer degree lists, root layer first.
    pub fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    /// Number of layers below the root.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Number of leaves the structure implies (degree sum of the last
    /// layer).
    pub fn leaf_count(&self) -> usize {
        self.layers
            .last()
            .map_or(0, |degrees| degrees.iter().sum())
    }

    /// Generate a random structure with node degrees in `2..=max_degree`.
    /// Deterministic for a given seed.
    pub fn random(depth: usize, max_degree: usize, seed: u64) -> Self {
        let depth = depth.max(1);
        let max_degree = max_degree.max(2);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut layers = Vec::with_capacity(depth);
        let mut nodes = 1usize;
        for _ in 0..depth {
            let degrees: Vec<usize> = (0..nodes)
                .map(|_| rng.random_range(2..=max_degree))
                .collect();
            nodes = degrees.iter().sum();
            layers.push(degrees);
        }
        Self { layers }
    }

    /// Generate a matching leaf-value list with small integral values.
    /// Deterministic for a given seed.
    pub fn random_leaves(&self, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..self.leaf_count())
            .map(|_| rng.random_range(-20..=20) as f64)
            .collect()
    }
}

impl FromStr for TreeStructure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyStructure);
        }
        let mut layers = Vec::new();
        let mut expected = 1usize;
        for (layer, tokens) in trimmed.split('|').enumerate() {
            let tokens: Vec<&str> = tokens.split(',').collect();
            if tokens.len() != expected {
                return Err(Error::LayerShape {
                    layer,
                    expected,
                    got: tokens.len(),
                });
            }
            let mut degrees = Vec::with_capacity(tokens.len());
            let mut produced = 0usize;
            for token in tokens {
                let token = token.trim();
                let degree: usize = token.parse().map_err(|_| Error::InvalidDegree {
                    layer,
                    token: token.to_string(),
                })?;
                if degree == 0 {
                    return Err(Error::InvalidDegree {
                        layer,
                        token: token.to_string(),
                    });
                }
                produced += degree;
                degrees.push(degree);
            }
            expected = produced;
            layers.push(degrees);
        }
        Ok(Self { layers })
    }
}

/// Parse a comma-separated leaf-value list.
///
/// # Errors
///
/// Returns [`Error::InvalidLeafValue`] for any token that is not a number.
pub fn parse_leaf_values(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| Error::InvalidLeafValue {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Build the full game tree for a structure and leaf-value list, kinds
/// alternating from `root_kind` downward. Every node is created revealed.
///
/// # Errors
///
/// Returns [`Error::LeafCount`] if the leaf list does not match the
/// structure.
pub fn build_game_tree(
    structure: &TreeStructure,
    leaves: &[f64],
    root_kind: GameKind,
) -> Result<SearchTree<GameKind, GameBounds>> {
    let expected = structure.leaf_count();
    if leaves.len() != expected {
        return Err(Error::LeafCount {
            expected,
            got: leaves.len(),
        });
    }

    let mut tree = SearchTree::new();
    let root = tree.create_root(root_kind, GameBounds::default())?;
    tree.node_mut(root)?.expanded = true;

    let mut prev_layer = vec![root];
    for degrees in structure.layers() {
        let mut layer = Vec::new();
        for (parent, degree) in prev_layer.iter().copied().zip(degrees.iter().copied()) {
            let child_kind = tree.node(parent)?.kind.opponent();
            for _ in 0..degree {
                let child = tree.add_child(parent, child_kind, GameBounds::default())?;
                tree.node_mut(child)?.expanded = true;
                layer.push(child);
            }
        }
        prev_layer = layer;
    }

    for (leaf, value) in prev_layer.iter().copied().zip(leaves.iter().copied()) {
        tree.node_mut(leaf)?.payload.value = Some(value);
    }
    Ok(tree)
}

/// Convenience constructor: build the tree and wrap it in a stepper.
pub fn simulator(
    structure: &TreeStructure,
    leaves: &[f64],
    root_kind: GameKind,
) -> Result<ReversibleStepper<AlphaBeta>> {
    let tree = build_game_tree(structure, leaves, root_kind)?;
    ReversibleStepper::new(AlphaBeta, tree)
}
