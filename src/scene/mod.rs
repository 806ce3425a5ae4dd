//! Keyed retained scene: one element per node and per link, diffed frame to
//! frame so a rendering backend only hears about what changed.

mod reconcile;
mod style;
mod surface;

use std::fmt;

use eframe::egui::Pos2;

use crate::tree::NodeId;

pub use reconcile::{Patch, PatchStats, Scene, SceneOp};
pub use style::{StyleContext, link_visual, node_visual, scene_elements};
pub use surface::{RecordedOp, RecordingSurface, RenderSurface};

/// Stable identity of a scene element. Derived from node ids only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneKey {
    Node(NodeId),
    Link { parent: NodeId, child: NodeId },
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node:{id}"),
            Self::Link { parent, child } => write!(f, "link:{parent}->{child}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeTone {
    #[default]
    Base,
    /// Label matches the active search.
    Matched,
    Selected,
    Hovered,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinkTone {
    #[default]
    Base,
    /// Part of the path from the root to the selected node.
    Path,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
    pub position: Pos2,
    pub radius: f32,
    pub tone: NodeTone,
    pub label: String,
    pub has_image: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkVisual {
    pub from: Pos2,
    pub to: Pos2,
    pub tone: LinkTone,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Node(NodeVisual),
    Link(LinkVisual),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneElement {
    pub key: SceneKey,
    pub visual: Visual,
}

impl SceneElement {
    pub fn node(id: NodeId, visual: NodeVisual) -> Self {
        Self {
            key: SceneKey::Node(id),
            visual: Visual::Node(visual),
        }
    }

    pub fn link(parent: NodeId, child: NodeId, visual: LinkVisual) -> Self {
        Self {
            key: SceneKey::Link { parent, child },
            visual: Visual::Link(visual),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_display_their_identity() {
        assert_eq!(SceneKey::Node(NodeId::from("n4")).to_string(), "node:n4");
        assert_eq!(
            SceneKey::Link {
                parent: NodeId::from("n0"),
                child: NodeId::from("n1"),
            }
            .to_string(),
            "link:n0->n1"
        );
    }
}
