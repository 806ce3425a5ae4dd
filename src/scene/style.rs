use std::collections::HashSet;

use super::{LinkTone, LinkVisual, NodeTone, NodeVisual, SceneElement};
use crate::layout::{LayoutNode, LinkEdge, TreeLayout};
use crate::tree::NodeId;

/// Everything besides geometry that decides how an element looks.
#[derive(Clone, Copy, Debug)]
pub struct StyleContext<'a> {
    pub matches: &'a HashSet<NodeId>,
    pub selected: Option<&'a NodeId>,
    pub hovered: Option<&'a NodeId>,
    pub node_radius: f32,
}

pub fn node_visual(node: &LayoutNode, context: &StyleContext<'_>) -> NodeVisual {
    let is_match = context.matches.contains(&node.id);
    let tone = if context.selected == Some(&node.id) {
        NodeTone::Selected
    } else if context.hovered == Some(&node.id) {
        NodeTone::Hovered
    } else if is_match {
        NodeTone::Matched
    } else {
        NodeTone::Base
    };

    NodeVisual {
        position: node.position,
        radius: context.node_radius,
        tone,
        label: node.label.clone(),
        has_image: node.image_ref.is_some(),
    }
}

/// `on_path` marks a link between the root and the selected node.
pub fn link_visual(edge: &LinkEdge, on_path: bool) -> LinkVisual {
    let tone = if on_path {
        LinkTone::Path
    } else {
        LinkTone::Base
    };

    LinkVisual {
        from: edge.source_pos,
        to: edge.target_pos,
        tone,
    }
}

/// The full element set for one frame: a link per non-root node, then a
/// node element per layout node.
pub fn scene_elements(layout: &TreeLayout, context: &StyleContext<'_>) -> Vec<SceneElement> {
    let selected_path = context
        .selected
        .and_then(|id| layout.index_of(id.as_str()))
        .map(|index| {
            layout
                .ancestry(index)
                .into_iter()
                .map(|index| &layout.nodes[index].id)
                .collect::<HashSet<_>>()
        })
        .unwrap_or_default();

    let mut elements = Vec::with_capacity(layout.links.len() + layout.nodes.len());
    for edge in &layout.links {
        let on_path =
            selected_path.contains(&edge.source_id) && selected_path.contains(&edge.target_id);
        elements.push(SceneElement::link(
            edge.source_id.clone(),
            edge.target_id.clone(),
            link_visual(edge, on_path),
        ));
    }
    for node in &layout.nodes {
        elements.push(SceneElement::node(node.id.clone(), node_visual(node, context)));
    }
    elements
}
