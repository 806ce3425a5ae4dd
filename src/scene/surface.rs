use std::collections::BTreeMap;

use super::{SceneKey, Visual};

/// A rendering backend that mirrors the scene through keyed operations.
pub trait RenderSurface {
    fn create_element(&mut self, key: &SceneKey, visual: &Visual);
    fn update_element(&mut self, key: &SceneKey, visual: &Visual);
    fn remove_element(&mut self, key: &SceneKey);
}

#[derive(Clone, Debug, PartialEq)]
pub enum RecordedOp {
    Create(SceneKey),
    Update(SceneKey),
    Remove(SceneKey),
}

/// Keeps every operation it receives plus the element set they produce.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<RecordedOp>,
    elements: BTreeMap<SceneKey, Visual>,
}

impl RecordingSurface {
    pub fn ops(&self) -> &[RecordedOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<RecordedOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn get(&self, key: &SceneKey) -> Option<&Visual> {
        self.elements.get(key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = (&SceneKey, &Visual)> {
        self.elements.iter()
    }
}

impl RenderSurface for RecordingSurface {
    fn create_element(&mut self, key: &SceneKey, visual: &Visual) {
        self.ops.push(RecordedOp::Create(key.clone()));
        self.elements.insert(key.clone(), visual.clone());
    }

    fn update_element(&mut self, key: &SceneKey, visual: &Visual) {
        self.ops.push(RecordedOp::Update(key.clone()));
        self.elements.insert(key.clone(), visual.clone());
    }

    fn remove_element(&mut self, key: &SceneKey) {
        self.ops.push(RecordedOp::Remove(key.clone()));
        self.elements.remove(key);
    }
}
