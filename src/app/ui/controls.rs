use std::time::Instant;

use eframe::egui::{self, RichText, Ui};
use treescope::layout::DEFAULT_EXTENT;
use treescope::{LayoutConfig, LayoutMode, MatchMode, Orientation};

use crate::util::truncate_label;

use super::super::{ShellRequests, TreeSource, ViewModel};

const MAX_SYNTHETIC_NODES: usize = 50_000;

impl ViewModel {
    pub(in crate::app) fn draw_controls(
        &mut self,
        ui: &mut Ui,
        now: Instant,
        requests: &mut ShellRequests,
        is_loading: bool,
    ) {
        ui.heading("Tree Controls");
        ui.separator();
        ui.add_space(4.0);

        self.draw_search_controls(ui, now);
        ui.separator();
        self.draw_layout_controls(ui);
        ui.separator();
        self.draw_data_controls(ui, requests, is_loading);
        ui.separator();
        self.draw_match_list(ui, now);
    }

    fn draw_search_controls(&mut self, ui: &mut Ui, now: Instant) {
        ui.label("Search").on_hover_text(
            "Highlights nodes whose label contains the query and flies to the first one.",
        );
        let response = ui.text_edit_singleline(&mut self.query_input);
        if response.changed() {
            self.view.set_query(self.query_input.clone(), now);
            self.match_rows_visible = Self::INITIAL_MATCH_ROWS;
        }

        if ui
            .checkbox(&mut self.fuzzy, "Fuzzy match")
            .on_hover_text("Match labels as skim-style subsequences instead of substrings.")
            .changed()
        {
            let mode = if self.fuzzy {
                MatchMode::Fuzzy
            } else {
                MatchMode::Substring
            };
            self.view.set_match_mode(mode);
        }

        let search = self.view.search();
        let status = if search.next_deadline().is_some() {
            "typing...".to_owned()
        } else if search.debounced_query().trim().is_empty() {
            "no active search".to_owned()
        } else {
            format!(
                "{} match(es) for \"{}\"",
                search.matched_ids().len(),
                search.debounced_query().trim()
            )
        };
        ui.small(status);
    }

    fn draw_layout_controls(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Layout").strong());
        let mut layout = self.view.config().layout;

        ui.horizontal_wrapped(|ui| {
            let is_extent = matches!(layout.mode, LayoutMode::Extent { .. });
            if ui
                .selectable_label(!is_extent, "Node size")
                .on_hover_text("Fixed spacing per node; large trees grow without bound.")
                .clicked()
                && is_extent
            {
                layout.mode = LayoutConfig::default().mode;
            }
            if ui
                .selectable_label(is_extent, "Fit to extent")
                .on_hover_text("Scale the whole tree into a fixed box.")
                .clicked()
                && !is_extent
            {
                layout.mode = LayoutMode::extent(DEFAULT_EXTENT);
            }
        });

        ui.horizontal_wrapped(|ui| {
            ui.selectable_value(&mut layout.orientation, Orientation::TopDown, "Top-down");
            ui.selectable_value(&mut layout.orientation, Orientation::LeftRight, "Left-right");
        });

        match &mut layout.mode {
            LayoutMode::NodeSize { width, height } => {
                ui.add(egui::Slider::new(width, 8.0..=200.0).text("sibling spacing"));
                ui.add(egui::Slider::new(height, 20.0..=400.0).text("level spacing"));
            }
            LayoutMode::Extent { width, height } => {
                ui.add(egui::Slider::new(width, 200.0..=20_000.0).text("extent width"));
                ui.add(egui::Slider::new(height, 200.0..=20_000.0).text("extent height"));
            }
        }

        ui.add(
            egui::Slider::new(&mut layout.separation.cousins, 1.0..=4.0)
                .text("cousin separation"),
        );

        self.view.set_layout_config(layout);
    }

    fn draw_data_controls(&mut self, ui: &mut Ui, requests: &mut ShellRequests, is_loading: bool) {
        ui.label(RichText::new("Synthetic data").strong());
        ui.add(
            egui::Slider::new(&mut self.synthetic_nodes, 1..=MAX_SYNTHETIC_NODES)
                .logarithmic(true)
                .text("nodes"),
        );
        ui.horizontal(|ui| {
            ui.label("seed");
            ui.add(egui::DragValue::new(&mut self.synthetic_seed));
            if ui.button("Random").clicked() {
                self.synthetic_seed = rand::random();
            }
        });

        ui.horizontal_wrapped(|ui| {
            if ui
                .add_enabled(!is_loading, egui::Button::new("Generate"))
                .clicked()
            {
                requests.reload = Some(TreeSource::Synthetic {
                    nodes: self.synthetic_nodes,
                    seed: self.synthetic_seed,
                });
            }
            if ui
                .add_enabled(!is_loading, egui::Button::new("Load sample"))
                .clicked()
            {
                requests.reload = Some(TreeSource::Sample);
            }
        });
    }

    fn draw_match_list(&mut self, ui: &mut Ui, now: Instant) {
        ui.label(RichText::new("Matches").strong());

        let matches = self
            .view
            .layout()
            .nodes
            .iter()
            .filter(|node| self.view.search().is_match(node.id.as_str()))
            .map(|node| (node.id.clone(), node.label.clone(), node.depth))
            .collect::<Vec<_>>();
        if matches.is_empty() {
            ui.label("Nothing matches the current search.");
            return;
        }

        let row_count = matches.len().min(self.match_rows_visible);
        let mut should_load_more = false;
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .id_salt("match_list_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 20.0, row_count, |ui, row_range| {
                if row_range.end + Self::MATCH_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some((id, label, depth)) = matches.get(index) else {
                        continue;
                    };
                    let text = format!("{}  (depth {depth})", truncate_label(label, 36));
                    if ui.link(text).on_hover_text(id.as_str()).clicked() {
                        clicked = Some(id.clone());
                    }
                }
            });

        if should_load_more && row_count < matches.len() {
            self.match_rows_visible = (row_count + Self::MATCH_PAGE_ROWS).min(matches.len());
        }

        if let Some(id) = clicked {
            self.view.select_node(id.as_str());
            self.view.focus_node(id.as_str(), now);
        }
    }
}
