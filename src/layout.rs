use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2, pos2};
use tracing::debug;

use crate::tree::{NodeId, Tree, TreeNode};

/// Sibling and level spacing used when nothing else is configured.
pub const DEFAULT_NODE_SIZE: Vec2 = Vec2::new(48.0, 110.0);
/// Box the "fit to extent" mode starts from.
pub const DEFAULT_EXTENT: Vec2 = Vec2::new(1200.0, 800.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutMode {
    /// Fixed per-node footprint: siblings `width` apart, levels `height` apart.
    NodeSize { width: f32, height: f32 },
    /// The whole diagram is scaled into a `width` by `height` box.
    Extent { width: f32, height: f32 },
}

impl LayoutMode {
    pub fn node_size(size: Vec2) -> Self {
        Self::NodeSize {
            width: size.x,
            height: size.y,
        }
    }

    pub fn extent(size: Vec2) -> Self {
        Self::Extent {
            width: size.x,
            height: size.y,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    TopDown,
    LeftRight,
}

/// Gap between neighbouring nodes, in breadth units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Separation {
    pub siblings: f32,
    pub cousins: f32,
}

impl Default for Separation {
    fn default() -> Self {
        Self {
            siblings: 1.0,
            cousins: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub orientation: Orientation,
    pub separation: Separation,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::node_size(DEFAULT_NODE_SIZE),
            orientation: Orientation::TopDown,
            separation: Separation::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub label: String,
    pub image_ref: Option<String>,
    pub position: Pos2,
    /// Index of the parent in [`TreeLayout::nodes`].
    pub parent: Option<usize>,
    pub depth: usize,
    pub child_count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkEdge {
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub source_pos: Pos2,
    pub target_pos: Pos2,
}

/// One layout pass. Nodes are stored in pre-order, root first.
#[derive(Clone, Debug)]
pub struct TreeLayout {
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<LinkEdge>,
    pub bounds: Rect,
    index_by_id: HashMap<NodeId, usize>,
}

impl TreeLayout {
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices from the root down to `index`, inclusive.
    pub fn ancestry(&self, index: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cursor = Some(index).filter(|&index| index < self.nodes.len());
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.nodes[current].parent;
        }
        path.reverse();
        path
    }
}

/// Working state for one node during the tidy-tree walks.
#[derive(Debug)]
struct Walker {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Position among its siblings.
    number: usize,
    depth: usize,
    prelim: f32,
    modifier: f32,
    change: f32,
    shift: f32,
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor while apportioning this node's children.
    default_ancestor: Option<usize>,
}

/// Lays out `tree` with the Buchheim–Jünger–Leipert refinement of
/// Reingold–Tilford: sibling subtrees never overlap, depth maps to the
/// primary axis and parents sit centred over their children.
///
/// Runs in linear time without recursion. The result depends only on the
/// tree and `config`.
pub fn layout_tree(tree: &Tree, config: &LayoutConfig) -> TreeLayout {
    let mut walkers = build_walkers(tree.root());
    let separation = config.separation;

    for v in post_order(&walkers) {
        first_walk(&mut walkers, v, separation);
    }

    let breadth = second_walk(&mut walkers);
    let max_depth = walkers.iter().map(|walker| walker.depth).max().unwrap_or(0);

    let scaled = match config.mode {
        LayoutMode::NodeSize { width, height } => walkers
            .iter()
            .zip(&breadth)
            .map(|(walker, x)| (x * width, walker.depth as f32 * height))
            .collect::<Vec<_>>(),
        LayoutMode::Extent { width, height } => {
            fit_extent(&walkers, &breadth, max_depth, separation, width, height)
        }
    };

    let positions = scaled
        .into_iter()
        .map(|(along, depth)| match config.orientation {
            Orientation::TopDown => pos2(along, depth),
            Orientation::LeftRight => pos2(depth, along),
        })
        .collect::<Vec<_>>();

    let mut nodes = Vec::with_capacity(walkers.len());
    let mut index_by_id = HashMap::with_capacity(walkers.len());
    for (index, ((_depth, node), walker)) in tree.pre_order().zip(&walkers).enumerate() {
        index_by_id.insert(node.id.clone(), index);
        nodes.push(LayoutNode {
            id: node.id.clone(),
            label: node.label.clone(),
            image_ref: node.image_ref.clone(),
            position: positions[index],
            parent: walker.parent,
            depth: walker.depth,
            child_count: walker.children.len(),
        });
    }

    let links = nodes
        .iter()
        .filter_map(|node| {
            let parent = &nodes[node.parent?];
            Some(LinkEdge {
                source_id: parent.id.clone(),
                target_id: node.id.clone(),
                source_pos: parent.position,
                target_pos: node.position,
            })
        })
        .collect::<Vec<_>>();

    let bounds = Rect::from_points(&positions);

    debug!(
        nodes = nodes.len(),
        links = links.len(),
        max_depth,
        "tree layout computed"
    );

    TreeLayout {
        nodes,
        links,
        bounds,
        index_by_id,
    }
}

/// Flattens the hierarchy in pre-order; index 0 is the root.
fn build_walkers(root: &TreeNode) -> Vec<Walker> {
    let mut walkers: Vec<Walker> = Vec::new();
    let mut stack: Vec<(&TreeNode, Option<usize>, usize, usize)> = vec![(root, None, 0, 0)];

    while let Some((node, parent, depth, number)) = stack.pop() {
        let index = walkers.len();
        walkers.push(Walker {
            parent,
            children: Vec::with_capacity(node.children.len()),
            number,
            depth,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
            ancestor: index,
            default_ancestor: None,
        });
        if let Some(parent) = parent {
            walkers[parent].children.push(index);
        }

        for (number, child) in node.children.iter().enumerate().rev() {
            stack.push((child, Some(index), depth + 1, number));
        }
    }

    walkers
}

/// Left-to-right post-order: every child before its parent, left siblings
/// before right ones.
fn post_order(walkers: &[Walker]) -> Vec<usize> {
    let mut order = Vec::with_capacity(walkers.len());
    let mut stack = vec![0usize];
    while let Some(v) = stack.pop() {
        order.push(v);
        stack.extend(walkers[v].children.iter().copied());
    }
    order.reverse();
    order
}

fn separation_between(walkers: &[Walker], a: usize, b: usize, separation: Separation) -> f32 {
    if walkers[a].parent == walkers[b].parent {
        separation.siblings
    } else {
        separation.cousins
    }
}

fn left_sibling(walkers: &[Walker], v: usize) -> Option<usize> {
    let parent = walkers[v].parent?;
    let number = walkers[v].number;
    if number == 0 {
        return None;
    }
    walkers[parent].children.get(number - 1).copied()
}

fn next_left(walkers: &[Walker], v: usize) -> Option<usize> {
    walkers[v].children.first().copied().or(walkers[v].thread)
}

fn next_right(walkers: &[Walker], v: usize) -> Option<usize> {
    walkers[v].children.last().copied().or(walkers[v].thread)
}

fn first_walk(walkers: &mut [Walker], v: usize, separation: Separation) {
    let left = left_sibling(walkers, v);

    if let (Some(&first), Some(&last)) = (walkers[v].children.first(), walkers[v].children.last())
    {
        execute_shifts(walkers, v);
        let midpoint = (walkers[first].prelim + walkers[last].prelim) / 2.0;
        if let Some(w) = left {
            walkers[v].prelim = walkers[w].prelim + separation_between(walkers, v, w, separation);
            walkers[v].modifier = walkers[v].prelim - midpoint;
        } else {
            walkers[v].prelim = midpoint;
        }
    } else if let Some(w) = left {
        walkers[v].prelim = walkers[w].prelim + separation_between(walkers, v, w, separation);
    }

    if let Some(parent) = walkers[v].parent {
        let default_ancestor = walkers[parent]
            .default_ancestor
            .unwrap_or(walkers[parent].children[0]);
        let ancestor = apportion(walkers, v, left, default_ancestor, separation);
        walkers[parent].default_ancestor = Some(ancestor);
    }
}

/// Pushes the subtree of `v` right until it clears the contour of its left
/// siblings, spreading the shift across the siblings in between.
fn apportion(
    walkers: &mut [Walker],
    v: usize,
    left: Option<usize>,
    mut ancestor: usize,
    separation: Separation,
) -> usize {
    let Some(w) = left else {
        return ancestor;
    };
    let Some(parent) = walkers[v].parent else {
        return ancestor;
    };

    let mut vip = v;
    let mut vop = v;
    let mut vim = w;
    let mut vom = walkers[parent].children[0];
    let mut sip = walkers[vip].modifier;
    let mut sop = walkers[vop].modifier;
    let mut sim = walkers[vim].modifier;
    let mut som = walkers[vom].modifier;

    loop {
        match (next_right(walkers, vim), next_left(walkers, vip)) {
            (Some(inner_left), Some(inner_right)) => {
                vim = inner_left;
                vip = inner_right;
                vom = next_left(walkers, vom).unwrap_or(vom);
                vop = next_right(walkers, vop).unwrap_or(vop);
                walkers[vop].ancestor = v;

                let shift = walkers[vim].prelim + sim - walkers[vip].prelim - sip
                    + separation_between(walkers, vim, vip, separation);
                if shift > 0.0 {
                    let moved_from = next_ancestor(walkers, vim, v, ancestor);
                    move_subtree(walkers, moved_from, v, shift);
                    sip += shift;
                    sop += shift;
                }

                sim += walkers[vim].modifier;
                sip += walkers[vip].modifier;
                som += walkers[vom].modifier;
                sop += walkers[vop].modifier;
            }
            (inner_left, inner_right) => {
                if let Some(inner_left) = inner_left
                    && next_right(walkers, vop).is_none()
                {
                    walkers[vop].thread = Some(inner_left);
                    walkers[vop].modifier += sim - sop;
                }
                if let Some(inner_right) = inner_right
                    && next_left(walkers, vom).is_none()
                {
                    walkers[vom].thread = Some(inner_right);
                    walkers[vom].modifier += sip - som;
                    ancestor = v;
                }
                return ancestor;
            }
        }
    }
}

fn next_ancestor(walkers: &[Walker], vim: usize, v: usize, ancestor: usize) -> usize {
    let candidate = walkers[vim].ancestor;
    if walkers[candidate].parent == walkers[v].parent {
        candidate
    } else {
        ancestor
    }
}

fn move_subtree(walkers: &mut [Walker], wm: usize, wp: usize, shift: f32) {
    let subtrees = walkers[wp].number.saturating_sub(walkers[wm].number).max(1) as f32;
    let change = shift / subtrees;
    walkers[wp].change -= change;
    walkers[wp].shift += shift;
    walkers[wm].change += change;
    walkers[wp].prelim += shift;
    walkers[wp].modifier += shift;
}

fn execute_shifts(walkers: &mut [Walker], v: usize) {
    let mut shift = 0.0;
    let mut change = 0.0;
    for index in (0..walkers[v].children.len()).rev() {
        let w = walkers[v].children[index];
        walkers[w].prelim += shift;
        walkers[w].modifier += shift;
        change += walkers[w].change;
        shift += walkers[w].shift + change;
    }
}

/// Resolves final breadth coordinates in unit spacing. Walkers are stored
/// in pre-order, so every parent's modifier is final before its children.
fn second_walk(walkers: &mut [Walker]) -> Vec<f32> {
    let root_modifier = walkers.first().map(|root| -root.prelim).unwrap_or(0.0);
    let mut breadth = vec![0.0; walkers.len()];

    for v in 0..walkers.len() {
        let parent_modifier = match walkers[v].parent {
            Some(parent) => walkers[parent].modifier,
            None => root_modifier,
        };
        breadth[v] = walkers[v].prelim + parent_modifier;
        walkers[v].modifier += parent_modifier;
    }

    breadth
}

fn fit_extent(
    walkers: &[Walker],
    breadth: &[f32],
    max_depth: usize,
    separation: Separation,
    width: f32,
    height: f32,
) -> Vec<(f32, f32)> {
    let mut left = 0usize;
    let mut right = 0usize;
    for (index, x) in breadth.iter().enumerate() {
        if *x < breadth[left] {
            left = index;
        }
        if *x > breadth[right] {
            right = index;
        }
    }

    let margin = if left == right {
        1.0
    } else {
        separation_between(walkers, left, right, separation) / 2.0
    };
    let offset = margin - breadth[left];
    let span = breadth[right] + margin + offset;
    let kx = if span > 0.0 { width / span } else { 0.0 };
    let ky = height / max_depth.max(1) as f32;

    walkers
        .iter()
        .zip(breadth)
        .map(|(walker, x)| ((x + offset) * kx, walker.depth as f32 * ky))
        .collect()
}
