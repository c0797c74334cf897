//! The reversible stepping engine and its action log.

pub mod action;
pub mod engine;

pub use action::{Cutoff, StepAction};
pub use engine::ReversibleStepper;
