use thiserror::Error;

use crate::graph::{Cost, NodeId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("node {id} is out of range (graph has {node_count} nodes)")]
    OutOfRange { id: NodeId, node_count: usize },

    #[error("extract_min called on an empty heap")]
    EmptyHeap,

    #[error("edge {0} -> {0} is a self loop")]
    SelfLoop(NodeId),

    #[error("edge distance must be positive and finite, got {0}")]
    InvalidDistance(Cost),
}
