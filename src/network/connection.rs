use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// A directed, capacitated and costed channel between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: NodeId,
    pub to_node: NodeId,
    /// Upper bound on the flow
    pub capacity: u64,
    /// Cost per unit of flow
    #[serde(default)]
    pub cost: f64,
}

impl Connection {
    pub fn new(
        from_node: impl Into<NodeId>,
        to_node: impl Into<NodeId>,
        capacity: u64,
        cost: f64,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            to_node: to_node.into(),
            capacity,
            cost,
        }
    }

    /// Whether this channel links `from` to `to`, in that direction.
    pub fn joins(&self, from: &NodeId, to: &NodeId) -> bool {
        &self.from_node == from && &self.to_node == to
    }

    pub fn key(&self) -> (NodeId, NodeId) {
        (self.from_node.clone(), self.to_node.clone())
    }
}
