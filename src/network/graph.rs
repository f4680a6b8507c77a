use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::connection::Connection;
use super::node::{Node, NodeId, NodeRole};
use crate::error::ConfigurationError;

/// Candidate facilities, clients and the links between them
///
/// Nodes are kept ordered by id so every derived view iterates deterministically.
/// Parallel connections between the same ordered pair are independent channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default, deserialize_with = "unique_nodes")]
    nodes: BTreeMap<NodeId, Node>,
    #[serde(default)]
    connections: Vec<Connection>,
}

/// Reads the node table, failing on an id that appears twice.
///
/// Integer and string spellings of the same id count as the same id.
fn unique_nodes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<NodeId, Node>, D::Error> {
    struct NodeTable;

    impl<'de> de::Visitor<'de> for NodeTable {
        type Value = BTreeMap<NodeId, Node>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from node id to node")
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut nodes = BTreeMap::new();
            while let Some((id, node)) = map.next_entry::<NodeId, Node>()? {
                if nodes.contains_key(&id) {
                    return Err(de::Error::custom(format!("duplicate node id '{}'", id)));
                }
                nodes.insert(id, node);
            }
            Ok(nodes)
        }
    }

    deserializer.deserialize_map(NodeTable)
}

impl Network {
    pub fn new(nodes: BTreeMap<NodeId, Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Inserts a node, returning the one previously stored under `id`.
    pub fn add_node(&mut self, id: impl Into<NodeId>, node: Node) -> Option<Node> {
        self.nodes.insert(id.into(), node)
    }

    /// Removes a node; connections referencing it are left in place.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Removes every channel from `from` to `to` and returns them.
    pub fn remove_connection(&mut self, from: &NodeId, to: &NodeId) -> Vec<Connection> {
        let (removed, kept) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| c.joins(from, to));
        self.connections = kept;
        removed
    }

    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter().filter(move |(_, n)| n.role == role)
    }

    pub fn plant_nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes_with_role(NodeRole::Plant)
    }

    pub fn client_nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes_with_role(NodeRole::Client)
    }

    /// DCs and warehouses
    pub fn middle_nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter().filter(|(_, n)| n.role.is_intermediate())
    }

    /// Connections leaving `id`, with their index in [`Network::connections`].
    pub fn outgoing<'a>(
        &'a self,
        id: &'a NodeId,
    ) -> impl Iterator<Item = (usize, &'a Connection)> + 'a {
        self.connections
            .iter()
            .enumerate()
            .filter(move |(_, c)| &c.from_node == id)
    }

    /// Connections entering `id`, with their index in [`Network::connections`].
    pub fn incoming<'a>(
        &'a self,
        id: &'a NodeId,
    ) -> impl Iterator<Item = (usize, &'a Connection)> + 'a {
        self.connections
            .iter()
            .enumerate()
            .filter(move |(_, c)| &c.to_node == id)
    }

    pub fn total_demand(&self) -> u64 {
        self.client_nodes().map(|(_, n)| n.capacity).sum()
    }

    pub fn total_production(&self) -> u64 {
        self.plant_nodes().map(|(_, n)| n.capacity).sum()
    }

    /// Checks that every connection endpoint exists and every cost is finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (id, node) in &self.nodes {
            check_cost(node.cost, || format!("node '{}'", id))?;
        }
        for (index, conn) in self.connections.iter().enumerate() {
            for endpoint in [&conn.from_node, &conn.to_node] {
                if !self.nodes.contains_key(endpoint) {
                    return Err(ConfigurationError::UnknownNode {
                        index,
                        from: conn.from_node.clone(),
                        to: conn.to_node.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            check_cost(conn.cost, || {
                format!("connection #{} ({} -> {})", index, conn.from_node, conn.to_node)
            })?;
        }
        Ok(())
    }
}

fn check_cost(value: f64, subject: impl FnOnce() -> String) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidCost {
            subject: subject(),
            value,
        })
    }
}
