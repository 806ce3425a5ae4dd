use std::collections::HashSet;
use std::ops::Range;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::model::{NodeId, TreeNode};
use crate::error::TreeError;

pub const DEFAULT_VOCABULARY: &[&str] = &[
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu", "Nu", "Xi", "Omicron", "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi", "Chi",
    "Psi", "Omega",
];

/// Label draws per node before the generator gives up.
pub const MAX_NAME_ATTEMPTS: usize = 64;

#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    pub vocabulary: Vec<String>,
    pub suffix_range: Range<u32>,
    pub max_name_attempts: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY
                .iter()
                .map(|word| (*word).to_owned())
                .collect(),
            suffix_range: 0..10_000,
            max_name_attempts: MAX_NAME_ATTEMPTS,
        }
    }
}

pub fn build_synthetic_tree<R: Rng + ?Sized>(
    target_node_count: usize,
    rng: &mut R,
) -> Result<TreeNode, TreeError> {
    build_synthetic_tree_with(target_node_count, &SyntheticConfig::default(), rng)
}

/// Builds a binary tree of exactly `target_node_count` nodes whose depth is
/// `ceil(log2(target_node_count))`. A target of zero yields a lone root.
///
/// One left spine always reaches the full depth; the remaining nodes are
/// split as evenly as the depth bound allows. Ids are minted in pre-order.
pub fn build_synthetic_tree_with<R: Rng + ?Sized>(
    target_node_count: usize,
    config: &SyntheticConfig,
    rng: &mut R,
) -> Result<TreeNode, TreeError> {
    let count = target_node_count.max(1);
    let mut issued = HashSet::with_capacity(count);
    let mut labels = Vec::with_capacity(count);

    for _ in 0..count {
        labels.push(mint_label(config, &mut issued, rng)?);
    }

    let depth = ceil_log2(count);
    let mut next_index = 0;
    let root = build_subtree(count, depth, &mut next_index, &mut labels.into_iter());

    debug!(count, depth, "generated synthetic tree");
    Ok(root)
}

fn ceil_log2(count: usize) -> usize {
    (usize::BITS - count.saturating_sub(1).leading_zeros()) as usize
}

/// Nodes a binary subtree of depth `depth` can hold.
fn capacity(depth: usize) -> usize {
    u32::try_from(depth + 1)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .map_or(usize::MAX, |full| full - 1)
}

/// `count` nodes reaching exactly `depth`. Requires
/// `depth + 1 <= count <= capacity(depth)`.
fn build_subtree(
    count: usize,
    depth: usize,
    next_index: &mut usize,
    labels: &mut impl Iterator<Item = String>,
) -> TreeNode {
    let index = *next_index;
    *next_index += 1;

    let id = NodeId::new(format!("n{index}"));
    let image_ref = format!("https://picsum.photos/seed/{id}/64");
    let label = labels.next().unwrap_or_default();

    let mut children = Vec::with_capacity(2);
    let rest = count - 1;
    if depth > 0 && rest > 0 {
        let left = rest.div_ceil(2).max(depth).min(capacity(depth - 1));
        let right = rest - left;

        children.push(build_subtree(left, depth - 1, next_index, labels));
        if right > 0 {
            let right_depth = ceil_log2(right + 1) - 1;
            children.push(build_subtree(right, right_depth, next_index, labels));
        }
    }

    TreeNode::new(id, label)
        .with_image(image_ref)
        .with_children(children)
}

fn mint_label<R: Rng + ?Sized>(
    config: &SyntheticConfig,
    issued: &mut HashSet<String>,
    rng: &mut R,
) -> Result<String, TreeError> {
    let attempts = config.max_name_attempts.max(1);

    for _ in 0..attempts {
        let word = config
            .vocabulary
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("Node");
        let suffix = if config.suffix_range.is_empty() {
            config.suffix_range.start
        } else {
            rng.gen_range(config.suffix_range.clone())
        };
        let label = format!("{word}-{suffix}");

        if issued.insert(label.clone()) {
            return Ok(label);
        }
    }

    Err(TreeError::GenerationExhausted {
        attempts,
        issued: issued.len(),
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::tree::Tree;

    #[test]
    fn eight_nodes_reach_depth_three() {
        let mut rng = StdRng::seed_from_u64(7);
        let tree = Tree::new(build_synthetic_tree(8, &mut rng).unwrap()).unwrap();

        assert_eq!(tree.node_count(), 8);
        assert_eq!(tree.max_depth(), 3);

        let labels = tree
            .pre_order()
            .map(|(_, node)| node.label.clone())
            .collect::<HashSet<_>>();
        assert_eq!(labels.len(), 8);
    }

    #[test]
    fn depth_is_ceil_log2_of_the_target() {
        let mut rng = StdRng::seed_from_u64(11);
        let cases = [
            (1usize, 0usize),
            (2, 1),
            (3, 2),
            (5, 3),
            (6, 3),
            (16, 4),
            (100, 7),
            (1000, 10),
        ];
        for (target, depth) in cases {
            let tree = Tree::new(build_synthetic_tree(target, &mut rng).unwrap()).unwrap();

            assert_eq!(tree.node_count(), target, "target {target}");
            assert_eq!(tree.max_depth(), depth, "target {target}");
        }
    }

    #[test]
    fn every_inner_node_has_at_most_two_children() {
        let mut rng = StdRng::seed_from_u64(5);
        let tree = Tree::new(build_synthetic_tree(300, &mut rng).unwrap()).unwrap();

        let leaves = tree.pre_order().filter(|(_, node)| node.is_leaf()).count();
        assert!(leaves > 0);
        assert!(tree.pre_order().all(|(_, node)| node.children.len() <= 2));
    }

    #[test]
    fn every_node_has_an_image_ref_derived_from_its_id() {
        let mut rng = StdRng::seed_from_u64(3);
        let tree = Tree::new(build_synthetic_tree(5, &mut rng).unwrap()).unwrap();

        for (_, node) in tree.pre_order() {
            let image_ref = node.image_ref.as_deref().unwrap();
            assert!(image_ref.contains(node.id.as_str()));
        }
    }

    #[test]
    fn same_seed_same_labels() {
        let first = build_synthetic_tree(64, &mut StdRng::seed_from_u64(99)).unwrap();
        let second = build_synthetic_tree(64, &mut StdRng::seed_from_u64(99)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn tiny_label_space_reports_exhaustion() {
        let config = SyntheticConfig {
            vocabulary: vec!["Solo".to_owned()],
            suffix_range: 0..2,
            max_name_attempts: 16,
        };
        let mut rng = StdRng::seed_from_u64(1);

        match build_synthetic_tree_with(4, &config, &mut rng) {
            Err(TreeError::GenerationExhausted { attempts, issued }) => {
                assert_eq!(attempts, 16);
                assert!(issued <= 2);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}
