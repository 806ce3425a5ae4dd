use std::time::Instant;

use eframe::egui::{self, Align, Context, Layout, Vec2};
use treescope::{FrameReport, TreeView};

use super::super::surface::EguiScene;
use super::super::{ShellRequests, TreeSource, ViewModel};

impl ViewModel {
    pub(in crate::app) const INITIAL_MATCH_ROWS: usize = 40;
    pub(in crate::app) const MATCH_PAGE_ROWS: usize = 40;
    pub(in crate::app) const MATCH_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(view: TreeView, source: TreeSource) -> Self {
        let (synthetic_nodes, synthetic_seed) = match &source {
            TreeSource::Synthetic { nodes, seed } => (*nodes, *seed),
            TreeSource::Json(_) | TreeSource::Sample => (view.tree().node_count(), 0),
        };
        let fuzzy = view.search().match_mode() == treescope::MatchMode::Fuzzy;

        Self {
            view,
            surface: EguiScene::default(),
            source,
            query_input: String::new(),
            fuzzy,
            synthetic_nodes,
            synthetic_seed,
            match_rows_visible: Self::INITIAL_MATCH_ROWS,
            viewport: Vec2::new(800.0, 600.0),
            last_report: FrameReport::default(),
            frame_error: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        user: &str,
        requests: &mut ShellRequests,
        is_loading: bool,
    ) {
        let now = Instant::now();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("treescope");
                    ui.separator();
                    ui.label(format!("source: {}", self.source));
                    ui.label(format!("nodes: {}", self.view.tree().node_count()));
                    ui.label(format!("depth: {}", self.view.tree().max_depth()));
                    ui.label(format!("generation: {}", self.view.generation().value()));
                    if ui.button("Reset view").clicked() {
                        self.view.reset_camera();
                    }
                    if ui.button("Fit view").clicked() {
                        self.view.fit_view(self.viewport);
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        requests.reload = Some(self.source.clone());
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Sign out").clicked() {
                            requests.sign_out = true;
                        }
                        ui.label(format!("signed in as {user}"));
                        ui.separator();
                        ui.label(self.scene_stats_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui, now, requests, is_loading));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui, now));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_tree(ui, now));
    }

    fn scene_stats_text(&self) -> String {
        let stats = self.last_report.stats;
        format!(
            "visible {}/{}  links {}  |  last patch +{} ~{} -{}",
            self.surface.visible_nodes(),
            self.surface.node_count(),
            self.surface.link_count(),
            stats.entered,
            stats.updated,
            stats.exited,
        )
    }
}
