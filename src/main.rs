mod app;
mod util;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use treescope::layout::{DEFAULT_EXTENT, DEFAULT_NODE_SIZE, layout_tree};
use treescope::search::DEFAULT_DEBOUNCE;
use treescope::{
    CameraConfig, LayoutConfig, LayoutMode, MatchMode, Orientation, SearchConfig, ViewConfig,
};

use app::{LocalSession, TreeScopeApp, TreeSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    /// Fixed spacing per node.
    Size,
    /// Scale the whole tree into a fixed box.
    Extent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OrientationArg {
    TopDown,
    LeftRight,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON hierarchy to load (`{ "name", "children" }` objects).
    #[arg(long, conflicts_with = "sample")]
    tree: Option<PathBuf>,
    /// Show the built-in sample tree.
    #[arg(long)]
    sample: bool,
    /// Target node count of the synthetic tree.
    #[arg(long, default_value_t = 1000)]
    nodes: usize,
    /// Seed for the synthetic tree; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = LayoutArg::Size)]
    layout: LayoutArg,
    #[arg(long, value_enum, default_value_t = OrientationArg::TopDown)]
    orientation: OrientationArg,
    #[arg(long, default_value_t = DEFAULT_NODE_SIZE.x)]
    node_width: f32,
    #[arg(long, default_value_t = DEFAULT_NODE_SIZE.y)]
    node_height: f32,
    #[arg(long, default_value_t = DEFAULT_EXTENT.x)]
    extent_width: f32,
    #[arg(long, default_value_t = DEFAULT_EXTENT.y)]
    extent_height: f32,
    /// Search debounce window in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    debounce_ms: u64,
    /// Match labels fuzzily instead of by substring.
    #[arg(long)]
    fuzzy: bool,
    /// Print the computed layout as JSON and exit.
    #[arg(long)]
    print_layout: bool,
    /// Start signed out.
    #[arg(long)]
    signed_out: bool,
}

impl Args {
    fn source(&self) -> TreeSource {
        if let Some(path) = &self.tree {
            TreeSource::Json(path.clone())
        } else if self.sample {
            TreeSource::Sample
        } else {
            TreeSource::Synthetic {
                nodes: self.nodes,
                seed: self.seed.unwrap_or_else(rand::random),
            }
        }
    }

    fn view_config(&self) -> ViewConfig {
        let mode = match self.layout {
            LayoutArg::Size => LayoutMode::NodeSize {
                width: self.node_width,
                height: self.node_height,
            },
            LayoutArg::Extent => LayoutMode::Extent {
                width: self.extent_width,
                height: self.extent_height,
            },
        };
        let orientation = match self.orientation {
            OrientationArg::TopDown => Orientation::TopDown,
            OrientationArg::LeftRight => Orientation::LeftRight,
        };
        let match_mode = if self.fuzzy {
            MatchMode::Fuzzy
        } else {
            MatchMode::Substring
        };

        ViewConfig {
            layout: LayoutConfig {
                mode,
                orientation,
                ..LayoutConfig::default()
            },
            search: SearchConfig {
                debounce: Duration::from_millis(self.debounce_ms),
                match_mode,
            },
            camera: CameraConfig::default(),
            ..ViewConfig::default()
        }
    }
}

#[derive(Serialize)]
struct LayoutDump<'a> {
    nodes: Vec<NodeDump<'a>>,
    links: Vec<[&'a str; 2]>,
}

#[derive(Serialize)]
struct NodeDump<'a> {
    id: &'a str,
    label: &'a str,
    x: f32,
    y: f32,
    depth: usize,
    parent: Option<&'a str>,
}

fn print_layout(source: &TreeSource, config: &ViewConfig) -> Result<()> {
    let tree = source.load()?;
    let layout = layout_tree(&tree, &config.layout);

    let dump = LayoutDump {
        nodes: layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.as_str(),
                label: node.label.as_str(),
                x: node.position.x,
                y: node.position.y,
                depth: node.depth,
                parent: node.parent.map(|parent| layout.nodes[parent].id.as_str()),
            })
            .collect(),
        links: layout
            .links
            .iter()
            .map(|link| [link.source_id.as_str(), link.target_id.as_str()])
            .collect(),
    };

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &dump).context("failed to write layout JSON")?;
    writeln!(stdout).context("failed to write layout JSON")?;
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("treescope=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let source = args.source();
    let config = args.view_config();

    if args.print_layout {
        return print_layout(&source, &config);
    }

    let session = if args.signed_out {
        LocalSession::default()
    } else {
        LocalSession::signed_in(std::env::var("USER").unwrap_or_else(|_| "local".to_owned()))
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "treescope",
        options,
        Box::new(move |cc| {
            Ok(Box::new(TreeScopeApp::new(
                cc,
                source,
                config,
                Box::new(session),
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the viewer: {error}"))
}
