use eframe::egui::Pos2;

use crate::camera::CameraTransform;
use crate::layout::TreeLayout;
use crate::tree::NodeId;

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub node_id: NodeId,
    pub label: String,
    /// Screen position of the pointer that raised it.
    pub pointer: Pos2,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_node_id: Option<NodeId>,
}

/// Everything the detail panel shows about the selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
    pub id: NodeId,
    pub label: String,
    pub depth: usize,
    pub child_count: usize,
    pub image_ref: Option<String>,
    /// Root first, ending with this node.
    pub path: Vec<(NodeId, String)>,
}

/// Hover and selection state. Never touches the tree, the search or the
/// camera.
#[derive(Debug, Default)]
pub struct Interaction {
    tooltip: Option<Tooltip>,
    selection: SelectionState,
}

impl Interaction {
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        self.tooltip.as_ref().map(|tooltip| &tooltip.node_id)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selection.selected_node_id.as_ref()
    }

    /// Shows the tooltip for `hit`, or hides it when the pointer is over
    /// empty canvas.
    pub fn hover(&mut self, layout: &TreeLayout, hit: Option<&str>, pointer: Pos2) {
        self.tooltip = hit.and_then(|id| layout.node(id)).map(|node| Tooltip {
            node_id: node.id.clone(),
            label: node.label.clone(),
            pointer,
        });
    }

    pub fn pointer_left(&mut self) {
        self.tooltip = None;
    }

    /// Selects `hit`. A click on empty canvas keeps the current selection.
    pub fn click(&mut self, layout: &TreeLayout, hit: Option<&str>) {
        if let Some(node) = hit.and_then(|id| layout.node(id)) {
            self.selection.selected_node_id = Some(node.id.clone());
        }
    }

    pub fn close_details(&mut self) {
        self.selection.selected_node_id = None;
    }

    /// Drops hover and selection that point at nodes `layout` no longer has.
    pub fn retain_known(&mut self, layout: &TreeLayout) {
        if self
            .tooltip
            .as_ref()
            .is_some_and(|tooltip| layout.index_of(tooltip.node_id.as_str()).is_none())
        {
            self.tooltip = None;
        }
        if self
            .selection
            .selected_node_id
            .as_ref()
            .is_some_and(|id| layout.index_of(id.as_str()).is_none())
        {
            self.selection.selected_node_id = None;
        }
    }
}

/// Nearest node whose on-screen disc contains `pointer`.
pub fn hit_test<'a>(
    layout: &'a TreeLayout,
    transform: &CameraTransform,
    center: Pos2,
    pointer: Pos2,
    radius: f32,
) -> Option<&'a NodeId> {
    let screen_radius = radius * transform.scale;
    let mut best: Option<(&NodeId, f32)> = None;

    for node in &layout.nodes {
        let screen = transform.world_to_screen(center, node.position);
        let dist_sq = screen.distance_sq(pointer);
        if dist_sq > screen_radius * screen_radius {
            continue;
        }
        if best.is_none_or(|(_, best_dist)| dist_sq < best_dist) {
            best = Some((&node.id, dist_sq));
        }
    }

    best.map(|(id, _)| id)
}

pub fn node_details(layout: &TreeLayout, id: &str) -> Option<NodeDetails> {
    let index = layout.index_of(id)?;
    let node = &layout.nodes[index];
    let path = layout
        .ancestry(index)
        .into_iter()
        .map(|index| {
            let step = &layout.nodes[index];
            (step.id.clone(), step.label.clone())
        })
        .collect();

    Some(NodeDetails {
        id: node.id.clone(),
        label: node.label.clone(),
        depth: node.depth,
        child_count: node.child_count,
        image_ref: node.image_ref.clone(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::layout::{LayoutConfig, layout_tree};
    use crate::tree::{Tree, TreeNode};

    fn layout() -> TreeLayout {
        let tree = Tree::new(TreeNode::new("r", "Root").with_children([
            TreeNode::new("a", "Alpha").with_image("img://alpha"),
            TreeNode::new("b", "Beta").with_children([TreeNode::new("b1", "Bishop")]),
        ]))
        .unwrap();
        layout_tree(&tree, &LayoutConfig::default())
    }

    #[test]
    fn hit_test_finds_the_disc_under_the_pointer() {
        let layout = layout();
        let transform = CameraTransform {
            translate: vec2(10.0, -20.0),
            scale: 2.0,
        };
        let center = pos2(400.0, 300.0);
        let beta = layout.node("b").unwrap().position;

        let pointer = transform.world_to_screen(center, beta) + vec2(30.0, 0.0);
        assert_eq!(
            hit_test(&layout, &transform, center, pointer, 20.0).map(NodeId::as_str),
            Some("b")
        );

        let outside = transform.world_to_screen(center, beta) + vec2(41.0, 0.0);
        assert_eq!(hit_test(&layout, &transform, center, outside, 20.0), None);
    }

    #[test]
    fn hover_sets_and_clears_the_tooltip() {
        let layout = layout();
        let mut interaction = Interaction::default();

        interaction.hover(&layout, Some("a"), pos2(5.0, 6.0));
        let tooltip = interaction.tooltip().unwrap();
        assert_eq!(tooltip.label, "Alpha");
        assert_eq!(tooltip.pointer, pos2(5.0, 6.0));

        interaction.hover(&layout, None, pos2(0.0, 0.0));
        assert!(interaction.tooltip().is_none());

        interaction.hover(&layout, Some("b"), pos2(1.0, 1.0));
        interaction.pointer_left();
        assert!(interaction.hovered().is_none());
    }

    #[test]
    fn empty_click_keeps_selection_until_closed() {
        let layout = layout();
        let mut interaction = Interaction::default();

        interaction.click(&layout, Some("b1"));
        interaction.click(&layout, None);
        assert_eq!(interaction.selected().map(NodeId::as_str), Some("b1"));

        interaction.close_details();
        assert_eq!(interaction.selection(), &SelectionState::default());
    }

    #[test]
    fn details_carry_the_path_from_the_root() {
        let layout = layout();
        let details = node_details(&layout, "b1").unwrap();

        assert_eq!(details.depth, 2);
        assert_eq!(details.child_count, 0);
        let path = details
            .path
            .iter()
            .map(|(id, _)| id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(path, vec!["r", "b", "b1"]);

        let alpha = node_details(&layout, "a").unwrap();
        assert_eq!(alpha.image_ref.as_deref(), Some("img://alpha"));
        assert!(node_details(&layout, "missing").is_none());
    }

    #[test]
    fn retain_known_forgets_vanished_nodes() {
        let layout = layout();
        let mut interaction = Interaction::default();
        interaction.click(&layout, Some("b1"));
        interaction.hover(&layout, Some("b1"), pos2(0.0, 0.0));

        let smaller = layout_tree(
            &Tree::new(TreeNode::new("r", "Root")).unwrap(),
            &LayoutConfig::default(),
        );
        interaction.retain_known(&smaller);

        assert!(interaction.selected().is_none());
        assert!(interaction.tooltip().is_none());
    }
}
