use eframe::egui::{self, Rect, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_tree_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.view.scroll_zoom(scroll, pointer, rect.center());
    }

    pub(in crate::app) fn handle_tree_pan(&mut self, response: &egui::Response) {
        if response.drag_started() {
            self.view.begin_drag();
        }
        if response.dragged() {
            self.view.drag_by(response.drag_delta());
        }
        if response.drag_stopped() {
            self.view.end_drag();
        }
    }

    /// Hover and click. Returns whether the pointer is over a node.
    pub(in crate::app) fn handle_tree_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> bool {
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer));
        let Some(pointer) = pointer else {
            self.view.pointer_left();
            return false;
        };

        self.view.hover_at(pointer, rect.center());
        if response.clicked_by(egui::PointerButton::Primary) {
            self.view.click_at(pointer, rect.center());
        }
        self.view.tooltip().is_some()
    }
}
