use std::collections::HashSet;
use std::io::Read;

use serde::Deserialize;

use super::model::{NodeId, Tree, TreeNode};
use crate::error::TreeError;

/// The d3 hierarchy shape: `{ "name", "children"? }` plus optional id/image.
#[derive(Debug, Deserialize)]
struct RawNode {
    name: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "imageRef")]
    image: Option<String>,
    #[serde(default)]
    children: Vec<RawNode>,
}

pub fn tree_from_json_str(raw: &str) -> Result<Tree, TreeError> {
    let root: RawNode = serde_json::from_str(raw)?;
    Tree::new(convert(root))
}

pub fn tree_from_reader<R: Read>(reader: R) -> Result<Tree, TreeError> {
    let root: RawNode = serde_json::from_reader(reader)?;
    Tree::new(convert(root))
}

/// The Root / Child 1 / Child 2 hierarchy shown when no data source is given.
pub fn sample_tree() -> TreeNode {
    TreeNode::new("root", "Root").with_children([
        TreeNode::new("child-1", "Child 1").with_children([
            TreeNode::new("grandchild-1", "Grandchild 1"),
            TreeNode::new("grandchild-2", "Grandchild 2"),
        ]),
        TreeNode::new("child-2", "Child 2"),
    ])
}

/// Nodes without an explicit id get the next `j<n>` that no explicit id in
/// the document already uses, numbered in pre-order.
fn convert(root: RawNode) -> TreeNode {
    let mut minter = IdMinter {
        next: 0,
        taken: explicit_ids(&root),
    };
    convert_node(root, &mut minter)
}

fn explicit_ids(root: &RawNode) -> HashSet<String> {
    let mut taken = HashSet::new();
    let mut stack = vec![root];
    while let Some(raw) = stack.pop() {
        if let Some(id) = &raw.id {
            taken.insert(id.clone());
        }
        stack.extend(&raw.children);
    }
    taken
}

struct IdMinter {
    next: usize,
    taken: HashSet<String>,
}

impl IdMinter {
    fn mint(&mut self) -> NodeId {
        loop {
            let candidate = format!("j{}", self.next);
            self.next += 1;
            if !self.taken.contains(&candidate) {
                return NodeId::new(candidate);
            }
        }
    }
}

fn convert_node(raw: RawNode, minter: &mut IdMinter) -> TreeNode {
    let id = match raw.id {
        Some(id) => NodeId::from(id),
        None => minter.mint(),
    };
    let children = raw
        .children
        .into_iter()
        .map(|child| convert_node(child, minter))
        .collect::<Vec<_>>();

    TreeNode {
        id,
        label: raw.name,
        image_ref: raw.image,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_d3_shape_and_mints_missing_ids() {
        let tree = tree_from_json_str(
            r#"{
                "name": "Root",
                "children": [
                    { "name": "Child 1", "children": [{ "name": "Grandchild 1" }] },
                    { "name": "Child 2", "id": "explicit", "imageRef": "img://c2" }
                ]
            }"#,
        )
        .unwrap();

        let nodes = tree
            .pre_order()
            .map(|(_, node)| (node.id.as_str(), node.label.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            nodes,
            vec![
                ("j0", "Root"),
                ("j1", "Child 1"),
                ("j2", "Grandchild 1"),
                ("explicit", "Child 2"),
            ]
        );
        assert_eq!(
            tree.find("explicit").and_then(|node| node.image_ref.as_deref()),
            Some("img://c2")
        );
    }

    #[test]
    fn minted_ids_skip_explicit_ones() {
        let tree = tree_from_json_str(
            r#"{"name":"Root","children":[{"name":"A","id":"j2"},{"name":"B"}]}"#,
        )
        .unwrap();

        let ids = tree
            .pre_order()
            .map(|(_, node)| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["j0", "j2", "j1"]);

        let crowded = tree_from_json_str(
            r#"{"name":"Root","id":"j1","children":[{"name":"A","id":"j0"},{"name":"B"}]}"#,
        )
        .unwrap();
        assert_eq!(crowded.find("j2").map(|node| node.label.as_str()), Some("B"));
    }

    #[test]
    fn duplicate_explicit_ids_fail() {
        let result = tree_from_json_str(
            r#"{ "name": "Root", "id": "a", "children": [{ "name": "Again", "id": "a" }] }"#,
        );

        assert!(matches!(result, Err(TreeError::DuplicateNodeId(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            tree_from_json_str(r#"{ "children": [] }"#),
            Err(TreeError::InvalidJson(_))
        ));
    }

    #[test]
    fn sample_tree_is_valid() {
        let tree = Tree::new(sample_tree()).unwrap();
        assert_eq!(tree.node_count(), 5);
    }
}
