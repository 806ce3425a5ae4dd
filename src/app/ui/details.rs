use std::time::Instant;

use eframe::egui::{self, RichText, Ui};

use crate::util::elide_path;

use super::super::ViewModel;

const PATH_HEAD: usize = 6;
const PATH_TAIL: usize = 4;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui, now: Instant) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(details) = self.view.selected_details() else {
            ui.label("Click a node in the tree or a search match.");
            return;
        };

        ui.label(RichText::new(details.label.as_str()).strong());
        ui.small(details.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Depth: {}", details.depth));
        ui.label(format!("Children: {}", details.child_count));
        match &details.image_ref {
            Some(image_ref) => {
                ui.hyperlink_to("Image", image_ref);
            }
            None => {
                ui.label("No image");
            }
        }

        ui.separator();
        ui.label(RichText::new("Path from root").strong());
        ui.label(elide_path(
            details.path.iter().map(|(_, label)| label.as_str()),
            PATH_HEAD,
            PATH_TAIL,
        ));

        let mut jump_to = None;
        egui::ScrollArea::vertical()
            .id_salt("ancestor_scroll")
            .max_height(260.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (depth, (id, label)) in details.path.iter().enumerate() {
                    let is_current = id == &details.id;
                    let text = format!("{}{label}", "  ".repeat(depth));
                    if is_current {
                        ui.label(RichText::new(text).strong());
                    } else if ui.link(text).on_hover_text(id.as_str()).clicked() {
                        jump_to = Some(id.clone());
                    }
                }
            });

        if let Some(id) = jump_to {
            self.view.select_node(id.as_str());
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Focus").clicked() {
                self.view.focus_node(details.id.as_str(), now);
            }
            if ui.button("Close").clicked() {
                self.view.close_details();
            }
        });
    }
}
