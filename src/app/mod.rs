use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context, Vec2};
use tracing::{error, warn};
use treescope::{FrameReport, Tree, TreeView, ViewConfig};

mod graph;
mod render_utils;
mod session;
mod source;
mod surface;
mod ui;

pub use session::{LocalSession, SessionGate};
pub use source::TreeSource;

use surface::EguiScene;

type LoadResult = Result<Tree, String>;

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct TreeScopeApp {
    source: TreeSource,
    config: ViewConfig,
    session: Box<dyn SessionGate>,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    SignedOut { user: String },
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

/// What the ready view asked the app shell to do this frame.
#[derive(Default)]
struct ShellRequests {
    reload: Option<TreeSource>,
    sign_out: bool,
}

struct ViewModel {
    view: TreeView,
    surface: EguiScene,
    source: TreeSource,
    query_input: String,
    fuzzy: bool,
    synthetic_nodes: usize,
    synthetic_seed: u64,
    match_rows_visible: usize,
    viewport: Vec2,
    last_report: FrameReport,
    frame_error: Option<String>,
}

impl TreeScopeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: TreeSource,
        config: ViewConfig,
        session: Box<dyn SessionGate>,
    ) -> Self {
        let state = if session.is_active() {
            Self::start_load(source.clone())
        } else {
            AppState::SignedOut {
                user: String::new(),
            }
        };

        Self {
            source,
            config,
            session,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: TreeSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            if tx.send(result).is_err() {
                warn!("tree loaded after the viewer stopped listening");
            }
        });

        rx
    }

    fn start_load(source: TreeSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn loaded(&self, result: LoadResult) -> AppState {
        match result {
            Ok(tree) => AppState::Ready(Box::new(ViewModel::new(
                TreeView::new(tree, self.config),
                self.source.clone(),
            ))),
            Err(message) => {
                error!(error = %message, "failed to load tree");
                AppState::Error(message)
            }
        }
    }
}

impl eframe::App for TreeScopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::SignedOut { user } => {
                let mut sign_in = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("treescope");
                        ui.add_space(8.0);
                        ui.label("Sign in to explore the tree.");
                        ui.add_space(8.0);
                        let response = ui.add(
                            egui::TextEdit::singleline(user)
                                .hint_text("user name")
                                .desired_width(200.0),
                        );
                        let submitted = response.lost_focus()
                            && ui.input(|input| input.key_pressed(egui::Key::Enter));
                        if ui.button("Sign in").clicked() || submitted {
                            sign_in = true;
                        }
                    });
                });

                if sign_in {
                    self.session.sign_in(user);
                    transition = Some(Self::start_load(self.source.clone()));
                }
            }
            AppState::Loading { rx } => {
                let finished = match rx.try_recv() {
                    Ok(result) => Some(result),
                    Err(TryRecvError::Empty) => {
                        ctx.request_repaint_after(LOAD_POLL_INTERVAL);
                        None
                    }
                    Err(TryRecvError::Disconnected) => {
                        Some(Err("Background load worker disconnected".to_owned()))
                    }
                };

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading tree...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });

                if let Some(result) = finished {
                    transition = Some(self.loaded(result));
                }
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the tree");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        retry = true;
                    }
                    if ui.button("Load sample instead").clicked() {
                        self.source = TreeSource::Sample;
                        retry = true;
                    }
                });
                if retry {
                    transition = Some(Self::start_load(self.source.clone()));
                }
            }
            AppState::Ready(model) => {
                let mut requests = ShellRequests::default();
                let is_reloading = self.reload_rx.is_some();
                let user = self.session.user().unwrap_or("local").to_owned();
                model.show(ctx, &user, &mut requests, is_reloading);

                if requests.sign_out {
                    self.session.sign_out();
                    self.reload_rx = None;
                    self.state = AppState::SignedOut { user };
                    return;
                }

                if let Some(source) = requests.reload
                    && self.reload_rx.is_none()
                {
                    self.source = source.clone();
                    model.source = source.clone();
                    self.reload_rx = Some(Self::spawn_load(source));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(tree)) => {
                            model.view.replace_tree(tree);
                            ctx.request_repaint();
                        }
                        Ok(Err(message)) => {
                            error!(error = %message, "failed to reload tree");
                            transition = Some(AppState::Error(message));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint_after(LOAD_POLL_INTERVAL);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
