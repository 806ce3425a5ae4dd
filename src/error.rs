use thiserror::Error;

use crate::scene::SceneKey;
use crate::tree::NodeId;

#[derive(Debug, Error)]
pub enum TreeError {
    /// The synthetic generator ran out of unique labels.
    #[error("could not mint a unique node label after {attempts} attempts ({issued} labels issued)")]
    GenerationExhausted { attempts: usize, issued: usize },
    #[error("node id `{0}` appears more than once in the tree")]
    DuplicateNodeId(NodeId),
    #[error("invalid tree JSON")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// Two elements of the same frame share a key; the tree ids are not unique.
    #[error("scene key {0} appears more than once in the next element set")]
    DuplicateKey(SceneKey),
}
