//! JSON export of a tree snapshot.

use std::{fs::File, io::BufWriter, path::Path};

use serde::Serialize;

use crate::{Result, error::Error, tree::SearchTree};

/// Write a pretty-printed JSON snapshot of the tree to `path`.
pub fn write_tree_json<K, P>(tree: &SearchTree<K, P>, path: &Path) -> Result<()>
where
    K: Clone + Serialize,
    P: Clone + Serialize,
{
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create {}", path.display()),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &tree.snapshot())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::alpha_beta::{self, GameKind, TreeStructure};

    #[test]
    fn snapshot_round_trips_through_json() {
        let structure: TreeStructure = "2".parse().unwrap();
        let mut stepper =
            alpha_beta::simulator(&structure, &[3.0, 7.0], GameKind::Maximizing).unwrap();
        stepper.run_to_end().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        write_tree_json(stepper.tree(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["nodes"][0]["payload"]["value"], 7.0);
    }
}
