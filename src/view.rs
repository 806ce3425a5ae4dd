use std::time::Instant;

use eframe::egui::{Pos2, Rect, Vec2};
use tracing::{debug, info};

use crate::camera::{Camera, CameraConfig, CameraPhase, CameraTransform};
use crate::error::ReconcileError;
use crate::interaction::{Interaction, NodeDetails, Tooltip, hit_test, node_details};
use crate::layout::{LayoutConfig, TreeLayout, layout_tree};
use crate::scene::{PatchStats, RenderSurface, Scene, StyleContext, scene_elements};
use crate::search::{MatchMode, SearchConfig, SearchController};
use crate::timer::Generation;
use crate::tree::{NodeId, Tree};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    pub layout: LayoutConfig,
    pub search: SearchConfig,
    pub camera: CameraConfig,
    /// Node disc radius in world units.
    pub node_radius: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            search: SearchConfig::default(),
            camera: CameraConfig::default(),
            node_radius: 20.0,
        }
    }
}

/// What one [`TreeView::frame`] did, and when the host should call again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub stats: PatchStats,
    /// The camera is mid-flight or the surface changed.
    pub needs_repaint: bool,
    /// When a debounced query becomes due.
    pub next_deadline: Option<Instant>,
}

/// Single owner of a displayed tree and all state derived from it.
#[derive(Debug)]
pub struct TreeView {
    config: ViewConfig,
    tree: Tree,
    layout: TreeLayout,
    generation: Generation,
    search: SearchController,
    camera: Camera,
    interaction: Interaction,
    scene: Scene,
    scene_dirty: bool,
}

impl TreeView {
    pub fn new(tree: Tree, config: ViewConfig) -> Self {
        let layout = layout_tree(&tree, &config.layout);
        info!(
            nodes = tree.node_count(),
            max_depth = tree.max_depth(),
            "tree view created"
        );

        Self {
            search: SearchController::new(config.search),
            camera: Camera::new(config.camera),
            config,
            tree,
            layout,
            generation: Generation::default(),
            interaction: Interaction::default(),
            scene: Scene::new(),
            scene_dirty: true,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Swaps in new data. A camera flight aimed at the old tree is dropped on
    /// its next tick. A query still being typed lands against the new tree.
    pub fn replace_tree(&mut self, tree: Tree) {
        self.generation = self.generation.next();
        self.layout = layout_tree(&tree, &self.config.layout);
        self.tree = tree;
        self.search.invalidate(&self.layout);
        self.camera.invalidate();
        self.interaction.retain_known(&self.layout);
        self.scene_dirty = true;

        info!(
            generation = self.generation.value(),
            nodes = self.tree.node_count(),
            max_depth = self.tree.max_depth(),
            "tree replaced"
        );
    }

    pub fn set_layout_config(&mut self, layout: LayoutConfig) {
        if self.config.layout == layout {
            return;
        }
        self.config.layout = layout;
        self.layout = layout_tree(&self.tree, &layout);
        self.camera.invalidate();
        self.scene_dirty = true;
        info!(?layout, "tree relaid out");
    }

    pub fn set_query(&mut self, raw: impl Into<String>, now: Instant) {
        self.search.set_query(raw, now);
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) {
        if self.search.match_mode() != mode {
            self.search.set_match_mode(mode, &self.layout);
            self.scene_dirty = true;
        }
    }

    pub fn transform(&self) -> CameraTransform {
        self.camera.transform()
    }

    pub fn camera_phase(&self) -> CameraPhase {
        self.camera.phase()
    }

    pub fn begin_drag(&mut self) {
        self.camera.begin_drag();
    }

    pub fn drag_by(&mut self, delta: Vec2) {
        self.camera.drag_by(delta);
    }

    pub fn end_drag(&mut self) {
        self.camera.end_drag();
    }

    /// Zooms by a raw scroll amount about `anchor`.
    pub fn scroll_zoom(&mut self, scroll: f32, anchor: Pos2, center: Pos2) {
        let factor = self.camera.scroll_factor(scroll);
        self.camera.zoom_at(factor, anchor, center);
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    pub fn fit_view(&mut self, viewport: Vec2) {
        let margin = Vec2::splat(self.config.node_radius);
        let bounds = Rect::from_min_max(
            self.layout.bounds.min - margin,
            self.layout.bounds.max + margin,
        );
        self.camera.fit(bounds, viewport);
    }

    pub fn node_at(&self, pointer: Pos2, center: Pos2) -> Option<&NodeId> {
        hit_test(
            &self.layout,
            &self.camera.transform(),
            center,
            pointer,
            self.config.node_radius,
        )
    }

    /// Updates the tooltip for a pointer at `pointer`.
    pub fn hover_at(&mut self, pointer: Pos2, center: Pos2) {
        let hit = self.node_at(pointer, center).cloned();
        let before = self.interaction.hovered().cloned();
        self.interaction
            .hover(&self.layout, hit.as_ref().map(NodeId::as_str), pointer);
        if self.interaction.hovered() != before.as_ref() {
            self.scene_dirty = true;
        }
    }

    pub fn pointer_left(&mut self) {
        if self.interaction.hovered().is_some() {
            self.scene_dirty = true;
        }
        self.interaction.pointer_left();
    }

    /// Selects the node under `pointer`, if any. Returns the selection.
    pub fn click_at(&mut self, pointer: Pos2, center: Pos2) -> Option<NodeId> {
        let hit = self.node_at(pointer, center).cloned();
        self.select(hit.as_ref().map(NodeId::as_str));
        self.interaction.selected().cloned()
    }

    /// Selects `id` directly, as a click on it would.
    pub fn select_node(&mut self, id: &str) -> bool {
        self.select(Some(id));
        self.interaction.selected().map(NodeId::as_str) == Some(id)
    }

    fn select(&mut self, hit: Option<&str>) {
        let before = self.interaction.selected().cloned();
        self.interaction.click(&self.layout, hit);
        if self.interaction.selected() != before.as_ref() {
            self.scene_dirty = true;
        }
    }

    pub fn close_details(&mut self) {
        if self.interaction.selected().is_some() {
            self.scene_dirty = true;
        }
        self.interaction.close_details();
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.interaction.tooltip()
    }

    pub fn selected_details(&self) -> Option<NodeDetails> {
        let id = self.interaction.selected()?;
        node_details(&self.layout, id.as_str())
    }

    /// Runs one frame: settles the search, moves the camera and pushes any
    /// scene changes to `surface`.
    pub fn frame<S: RenderSurface + ?Sized>(
        &mut self,
        now: Instant,
        surface: &mut S,
    ) -> Result<FrameReport, ReconcileError> {
        if self.search.poll(now, &self.layout).is_some() {
            self.scene_dirty = true;
            self.focus_first_match(now);
        }

        let animating = self.camera.tick(now);

        let mut stats = PatchStats::default();
        if self.scene_dirty {
            let elements = {
                let context = StyleContext {
                    matches: self.search.matched_ids(),
                    selected: self.interaction.selected(),
                    hovered: self.interaction.hovered(),
                    node_radius: self.config.node_radius,
                };
                scene_elements(&self.layout, &context)
            };
            let patch = self.scene.reconcile(elements)?;
            patch.apply(surface);
            stats = patch.stats;
            self.scene_dirty = false;
        }

        if !stats.is_empty() {
            debug!(
                entered = stats.entered,
                updated = stats.updated,
                exited = stats.exited,
                generation = self.generation.value(),
                "frame patched surface"
            );
        }

        Ok(FrameReport {
            stats,
            needs_repaint: animating || !stats.is_empty(),
            next_deadline: self.search.next_deadline(),
        })
    }

    /// Flies the camera to `id` at the focus scale. Returns `false` when the
    /// node is not in the current layout.
    pub fn focus_node(&mut self, id: &str, now: Instant) -> bool {
        let Some(target) = self.layout.node(id).map(|node| node.position) else {
            return false;
        };

        let camera = self.config.camera;
        self.camera
            .navigate_to(target, camera.focus_scale, camera.fly_duration, now);
        true
    }

    fn focus_first_match(&mut self, now: Instant) {
        if self.search.debounced_query().trim().is_empty() {
            return;
        }
        if let Some(first) = self.search.first_match().cloned() {
            self.focus_node(first.as_str(), now);
        }
    }
}
