//! Export of stepping runs for analysis - CSV action traces and JSON
//! tree snapshots.

pub mod trace_csv;
pub mod tree_json;

pub use trace_csv::write_trace_csv;
pub use tree_json::write_tree_json;
