use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// Stable identity of a node, minted when the node is created.
///
/// Reconciliation keys on this value only; labels are display data and may
/// repeat or change.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub label: String,
    pub image_ref: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            image_ref: None,
            children: Vec::new(),
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A validated, immutable hierarchy.
///
/// Cloning is cheap: the node storage is shared. Replacing the data means
/// building a new `Tree`; nodes are never edited in place.
#[derive(Clone, Debug)]
pub struct Tree {
    root: Arc<TreeNode>,
    node_count: usize,
    max_depth: usize,
}

impl Tree {
    /// Wraps `root`, rejecting hierarchies that reuse an id.
    pub fn new(root: TreeNode) -> Result<Self, TreeError> {
        let mut seen = HashSet::new();
        let mut max_depth = 0;

        for (depth, node) in PreOrder::new(&root) {
            if !seen.insert(node.id.as_str()) {
                return Err(TreeError::DuplicateNodeId(node.id.clone()));
            }
            max_depth = max_depth.max(depth);
        }

        let node_count = seen.len();
        Ok(Self {
            root: Arc::new(root),
            node_count,
            max_depth,
        })
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Pre-order, left-to-right traversal yielding `(depth, node)`.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder::new(&self.root)
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.pre_order()
            .map(|(_depth, node)| node)
            .find(|node| node.id.as_str() == id)
    }
}

/// Iterative pre-order walk, safe for arbitrarily deep chains.
#[derive(Debug)]
pub struct PreOrder<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> PreOrder<'a> {
    pub fn new(root: &'a TreeNode) -> Self {
        Self {
            stack: vec![(0, root)],
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> TreeNode {
        TreeNode::new("root", "Root").with_children([
            TreeNode::new("a", "Child 1")
                .with_children([TreeNode::new("a1", "Grandchild 1"), TreeNode::new("a2", "Grandchild 2")]),
            TreeNode::new("b", "Child 2"),
        ])
    }

    #[test]
    fn pre_order_visits_left_to_right_with_depths() {
        let tree = Tree::new(small_tree()).unwrap();
        let visited = tree
            .pre_order()
            .map(|(depth, node)| (depth, node.id.as_str()))
            .collect::<Vec<_>>();

        assert_eq!(
            visited,
            vec![(0, "root"), (1, "a"), (2, "a1"), (2, "a2"), (1, "b")]
        );
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let root = TreeNode::new("root", "Root")
            .with_children([TreeNode::new("x", "One"), TreeNode::new("x", "Two")]);

        match Tree::new(root) {
            Err(TreeError::DuplicateNodeId(id)) => assert_eq!(id.as_str(), "x"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn repeated_labels_are_fine() {
        let root = TreeNode::new("root", "Same")
            .with_children([TreeNode::new("x", "Same"), TreeNode::new("y", "Same")]);

        assert_eq!(Tree::new(root).unwrap().node_count(), 3);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut node = TreeNode::new("n1500", "leaf");
        for index in (0..1500).rev() {
            node = TreeNode::new(format!("n{index}"), "link").with_children([node]);
        }

        let tree = Tree::new(node).unwrap();
        assert_eq!(tree.max_depth(), 1500);
        assert!(tree.find("n1500").is_some());
    }
}
