//! Tree visualization engine: tidy-tree layout, keyed scene reconciliation,
//! debounced search and an animated pan/zoom camera.
//!
//! The engine is backend independent. A host feeds it input events and a
//! clock, calls [`TreeView::frame`] once per frame and receives the scene
//! changes through a [`RenderSurface`].

pub mod camera;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod scene;
pub mod search;
pub mod timer;
pub mod tree;
pub mod view;

pub use camera::{Camera, CameraConfig, CameraPhase, CameraTransform};
pub use error::{ReconcileError, TreeError};
pub use interaction::{Interaction, NodeDetails, SelectionState, Tooltip};
pub use layout::{LayoutConfig, LayoutMode, LinkEdge, Orientation, Separation, TreeLayout};
pub use scene::{Patch, PatchStats, RecordingSurface, RenderSurface, Scene, SceneKey, SceneOp};
pub use search::{MatchMode, SearchConfig, SearchController};
pub use timer::{Debounce, Generation};
pub use tree::{NodeId, Tree, TreeNode};
pub use view::{FrameReport, TreeView, ViewConfig};
