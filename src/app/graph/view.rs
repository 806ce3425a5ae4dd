use std::time::Instant;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui, vec2};
use tracing::error;

use super::super::ViewModel;
use super::super::render_utils::draw_background;

impl ViewModel {
    pub(in crate::app) fn draw_tree(&mut self, ui: &mut Ui, now: Instant) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.viewport = rect.size();

        self.handle_tree_zoom(ui, rect, &response);
        self.handle_tree_pan(&response);
        let over_node = self.handle_tree_pointer(ui, rect, &response);
        if over_node {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        match self.view.frame(now, &mut self.surface) {
            Ok(report) => {
                if !report.stats.is_empty() {
                    self.last_report = report;
                }
                if report.needs_repaint || response.dragged() {
                    ui.ctx().request_repaint();
                } else if let Some(deadline) = report.next_deadline {
                    ui.ctx()
                        .request_repaint_after(deadline.saturating_duration_since(now));
                }
                self.frame_error = None;
            }
            Err(reconcile_error) => {
                if self.frame_error.is_none() {
                    error!(error = %reconcile_error, "scene reconciliation failed");
                }
                self.frame_error = Some(reconcile_error.to_string());
            }
        }

        let transform = self.view.transform();
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, &transform);
        self.surface.paint(&painter, rect, &transform);

        if let Some(message) = &self.frame_error {
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                message,
                FontId::proportional(13.0),
                Color32::from_rgb(240, 110, 100),
            );
        }

        if let Some(tooltip) = self.view.tooltip() {
            painter.text(
                tooltip.pointer + vec2(14.0, -14.0),
                Align2::LEFT_BOTTOM,
                format!("{}  |  {}", tooltip.label, tooltip.node_id),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        painter.text(
            rect.left_top() + vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            format!("zoom {:.2}x  |  {:?}", transform.scale, self.view.camera_phase()),
            FontId::proportional(12.0),
            Color32::from_gray(180),
        );
    }
}
