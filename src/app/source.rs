use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use treescope::Tree;
use treescope::tree::{build_synthetic_tree, sample_tree, tree_from_reader};

/// Where the displayed tree comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeSource {
    Json(PathBuf),
    Synthetic { nodes: usize, seed: u64 },
    Sample,
}

impl TreeSource {
    pub fn load(&self) -> Result<Tree> {
        let tree = match self {
            Self::Json(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open tree file {}", path.display()))?;
                tree_from_reader(BufReader::new(file))
                    .with_context(|| format!("failed to read tree from {}", path.display()))?
            }
            Self::Synthetic { nodes, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                let root = build_synthetic_tree(*nodes, &mut rng).with_context(|| {
                    format!("failed to generate a synthetic tree of {nodes} nodes")
                })?;
                Tree::new(root).context("synthetic tree has duplicate ids")?
            }
            Self::Sample => Tree::new(sample_tree()).context("built-in sample tree is invalid")?,
        };

        info!(
            source = %self,
            nodes = tree.node_count(),
            max_depth = tree.max_depth(),
            "tree loaded"
        );
        Ok(tree)
    }
}

impl std::fmt::Display for TreeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(path) => write!(f, "{}", path.display()),
            Self::Synthetic { nodes, seed } => write!(f, "synthetic ({nodes} nodes, seed {seed})"),
            Self::Sample => f.write_str("sample"),
        }
    }
}
