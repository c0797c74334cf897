//! Reversible, steppable simulators for classic tree-search algorithms.
//!
//! This crate provides:
//! - A generic stepping engine that executes a search algorithm one
//!   atomic, invertible action at a time (forward and backward)
//! - Alpha-beta pruning and AO* as pluggable expansion rules
//! - A presenter port for rendering layers, with text and recording
//!   adapters
//! - CSV/JSON export of step traces and tree snapshots
//!
//! The engine owns the search tree and an append-only action log; every
//! forward step records the prior values it overwrites, so any number of
//! steps can be undone and replayed with bit-identical results.

pub mod adapters;
pub mod cli;
pub mod error;
pub mod export;
pub mod identifiers;
pub mod ports;
pub mod rules;
pub mod stepper;
pub mod tree;
pub mod utils;

pub use error::{Error, Result};
pub use identifiers::{NodeHandle, NodeName};
pub use ports::{Presenter, StepView};
pub use rules::{AlphaBeta, AoStar, ExpansionRule};
pub use stepper::{Cutoff, ReversibleStepper, StepAction};
pub use tree::{SearchNode, SearchTree};
