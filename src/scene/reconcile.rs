use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::debug;

use super::{RenderSurface, SceneElement, SceneKey, Visual};
use crate::error::ReconcileError;

#[derive(Clone, Debug, PartialEq)]
pub enum SceneOp {
    Exit(SceneKey),
    Enter(SceneKey, Visual),
    Update(SceneKey, Visual),
}

impl SceneOp {
    pub fn key(&self) -> &SceneKey {
        match self {
            Self::Exit(key) | Self::Enter(key, _) | Self::Update(key, _) => key,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatchStats {
    pub entered: usize,
    pub updated: usize,
    /// Present in both frames with an identical visual; nothing emitted.
    pub unchanged: usize,
    pub exited: usize,
}

impl PatchStats {
    pub fn is_empty(&self) -> bool {
        self.entered == 0 && self.updated == 0 && self.exited == 0
    }
}

/// Operations for one frame: every exit, then every enter, then every
/// update. Within each group, ops are ordered by key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    pub ops: Vec<SceneOp>,
    pub stats: PatchStats,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn apply<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        for op in &self.ops {
            match op {
                SceneOp::Exit(key) => surface.remove_element(key),
                SceneOp::Enter(key, visual) => surface.create_element(key, visual),
                SceneOp::Update(key, visual) => surface.update_element(key, visual),
            }
        }
    }
}

/// The element set the surface currently shows.
#[derive(Debug, Default)]
pub struct Scene {
    elements: BTreeMap<SceneKey, Visual>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, key: &SceneKey) -> Option<&Visual> {
        self.elements.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SceneKey> {
        self.elements.keys()
    }

    /// Diffs `next` against the current elements and adopts it.
    ///
    /// Fails on the first duplicated key, leaving the current elements as
    /// they were.
    pub fn reconcile(&mut self, next: Vec<SceneElement>) -> Result<Patch, ReconcileError> {
        let mut incoming = BTreeMap::new();
        for element in next {
            match incoming.entry(element.key) {
                Entry::Vacant(slot) => {
                    slot.insert(element.visual);
                }
                Entry::Occupied(slot) => {
                    return Err(ReconcileError::DuplicateKey(slot.key().clone()));
                }
            }
        }

        let mut stats = PatchStats::default();
        let mut exits = Vec::new();
        for key in self.elements.keys() {
            if !incoming.contains_key(key) {
                exits.push(SceneOp::Exit(key.clone()));
            }
        }
        stats.exited = exits.len();

        let mut enters = Vec::new();
        let mut updates = Vec::new();
        for (key, visual) in &incoming {
            match self.elements.get(key) {
                None => enters.push(SceneOp::Enter(key.clone(), visual.clone())),
                Some(previous) if previous != visual => {
                    updates.push(SceneOp::Update(key.clone(), visual.clone()));
                }
                Some(_) => stats.unchanged += 1,
            }
        }
        stats.entered = enters.len();
        stats.updated = updates.len();

        let mut ops = exits;
        ops.append(&mut enters);
        ops.append(&mut updates);
        self.elements = incoming;

        debug!(
            entered = stats.entered,
            updated = stats.updated,
            unchanged = stats.unchanged,
            exited = stats.exited,
            "scene reconciled"
        );

        Ok(Patch { ops, stats })
    }

    /// Drops every element, producing the exits a surface needs to match.
    pub fn clear(&mut self) -> Patch {
        let ops = std::mem::take(&mut self.elements)
            .into_keys()
            .map(SceneOp::Exit)
            .collect::<Vec<_>>();
        let stats = PatchStats {
            exited: ops.len(),
            ..PatchStats::default()
        };
        Patch { ops, stats }
    }
}
