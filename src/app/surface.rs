use std::collections::BTreeMap;

use eframe::egui::{Align2, Color32, FontId, Painter, Rect, vec2};
use treescope::scene::{LinkVisual, NodeVisual, Visual};
use treescope::{CameraTransform, RenderSurface, SceneKey};

use crate::util::truncate_label;

use super::render_utils::{
    circle_visible, label_visible, link_stroke, node_fill, node_outline, segment_visible,
};

const LABEL_CHARS: usize = 28;

/// Retained egui scene: keeps what the reconciler sent and repaints it
/// every frame under the current camera.
#[derive(Debug, Default)]
pub(in crate::app) struct EguiScene {
    nodes: BTreeMap<SceneKey, NodeVisual>,
    links: BTreeMap<SceneKey, LinkVisual>,
    visible_nodes: usize,
}

impl EguiScene {
    pub(in crate::app) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::app) fn link_count(&self) -> usize {
        self.links.len()
    }

    pub(in crate::app) fn visible_nodes(&self) -> usize {
        self.visible_nodes
    }

    fn store(&mut self, key: &SceneKey, visual: &Visual) {
        match visual {
            Visual::Node(node) => {
                self.nodes.insert(key.clone(), node.clone());
            }
            Visual::Link(link) => {
                self.links.insert(key.clone(), *link);
            }
        }
    }

    /// Links first, then discs, then labels on top.
    pub(in crate::app) fn paint(
        &mut self,
        painter: &Painter,
        rect: Rect,
        transform: &CameraTransform,
    ) {
        let center = rect.center();

        for link in self.links.values() {
            let start = transform.world_to_screen(center, link.from);
            let end = transform.world_to_screen(center, link.to);
            if !segment_visible(rect, start, end, 2.5) {
                continue;
            }
            painter.line_segment([start, end], link_stroke(link.tone, transform.scale));
        }

        let mut labels = Vec::new();
        self.visible_nodes = 0;
        for node in self.nodes.values() {
            let position = transform.world_to_screen(center, node.position);
            let radius = (node.radius * transform.scale).max(1.5);
            if !circle_visible(rect, position, radius) {
                continue;
            }
            self.visible_nodes += 1;

            painter.circle_filled(position, radius, node_fill(node.tone));
            painter.circle_stroke(position, radius, node_outline(node.tone));
            if node.has_image && radius > 8.0 {
                painter.circle_stroke(
                    position,
                    radius * 0.55,
                    (1.0, Color32::from_rgba_unmultiplied(240, 240, 240, 90)),
                );
            }
            if label_visible(node.tone, radius) {
                labels.push((position + vec2(radius + 5.0, 0.0), node.label.as_str()));
            }
        }

        for (position, label) in labels {
            painter.text(
                position,
                Align2::LEFT_CENTER,
                truncate_label(label, LABEL_CHARS),
                FontId::proportional(12.0),
                Color32::from_gray(238),
            );
        }
    }
}

impl RenderSurface for EguiScene {
    fn create_element(&mut self, key: &SceneKey, visual: &Visual) {
        self.store(key, visual);
    }

    fn update_element(&mut self, key: &SceneKey, visual: &Visual) {
        self.store(key, visual);
    }

    fn remove_element(&mut self, key: &SceneKey) {
        if matches!(key, SceneKey::Node(_)) {
            self.nodes.remove(key);
        } else {
            self.links.remove(key);
        }
    }
}
