mod json;
mod model;
mod synthetic;

pub use json::{sample_tree, tree_from_json_str, tree_from_reader};
pub use model::{NodeId, PreOrder, Tree, TreeNode};
pub use synthetic::{
    DEFAULT_VOCABULARY, MAX_NAME_ATTEMPTS, SyntheticConfig, build_synthetic_tree,
    build_synthetic_tree_with,
};
