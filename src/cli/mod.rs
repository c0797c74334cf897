//! CLI infrastructure for the retrace toolkit
//!
//! This module provides the command-line interface for running and
//! exporting steppable simulations of the bundled search algorithms.

pub mod commands;
pub mod output;
