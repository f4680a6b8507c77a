use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a facility or client in a network
///
/// Definitions may spell identifiers as strings or integers; both become the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodeIdVisitor;

        impl de::Visitor<'_> for NodeIdVisitor {
            type Value = NodeId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a node identifier (string or integer)")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeId, E> {
                Ok(NodeId::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<NodeId, E> {
                Ok(NodeId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeId, E> {
                Ok(NodeId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeId, E> {
                Ok(NodeId(v.to_string()))
            }
        }

        deserializer.deserialize_any(NodeIdVisitor)
    }
}

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Role of a node; selects the constraint family applied to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeRole {
    /// Source with a production ceiling
    Plant,
    /// Distribution center, intermediate with a throughput ceiling
    #[serde(rename = "DC")]
    Dc,
    /// Warehouse, intermediate with a throughput ceiling
    Warehouse,
    /// Sink with a fixed demand
    Client,
}

impl NodeRole {
    pub const ALL: [NodeRole; 4] = [
        NodeRole::Plant,
        NodeRole::Dc,
        NodeRole::Warehouse,
        NodeRole::Client,
    ];

    /// DCs and warehouses: flow passes through them
    pub fn is_intermediate(self) -> bool {
        matches!(self, NodeRole::Dc | NodeRole::Warehouse)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Plant => "PLANT",
            NodeRole::Dc => "DC",
            NodeRole::Warehouse => "WAREHOUSE",
            NodeRole::Client => "CLIENT",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A facility or client
///
/// `capacity` is the production ceiling of a plant, the throughput ceiling of a DC or
/// warehouse, and the fixed demand of a client. `cost` is paid only when the node is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub role: NodeRole,
    pub capacity: u64,
    #[serde(default)]
    pub cost: f64,
}

impl Node {
    pub fn new(role: NodeRole, capacity: u64, cost: f64) -> Self {
        Self {
            role,
            capacity,
            cost,
        }
    }

    pub fn plant(capacity: u64, cost: f64) -> Self {
        Self::new(NodeRole::Plant, capacity, cost)
    }

    pub fn dc(capacity: u64, cost: f64) -> Self {
        Self::new(NodeRole::Dc, capacity, cost)
    }

    pub fn warehouse(capacity: u64, cost: f64) -> Self {
        Self::new(NodeRole::Warehouse, capacity, cost)
    }

    /// A client with the given demand; clients carry no opening cost by default.
    pub fn client(demand: u64) -> Self {
        Self::new(NodeRole::Client, demand, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization_uses_upper_case_names() {
        let node: Node = serde_json::from_str(r#"{"type": "DC", "capacity": 40}"#).unwrap();
        assert_eq!(node, Node::dc(40, 0.0));

        let json = serde_json::to_string(&Node::warehouse(5, 1.5)).unwrap();
        assert_eq!(json, r#"{"type":"WAREHOUSE","capacity":5,"cost":1.5}"#);
    }

    #[test]
    fn test_unknown_role_and_negative_capacity_are_rejected() {
        assert!(serde_json::from_str::<Node>(r#"{"type": "DEPOT", "capacity": 1}"#).is_err());
        assert!(serde_json::from_str::<Node>(r#"{"type": "PLANT", "capacity": -1}"#).is_err());
    }

    #[test]
    fn test_intermediate_roles() {
        let intermediate: Vec<_> = NodeRole::ALL
            .into_iter()
            .filter(|r| r.is_intermediate())
            .collect();
        assert_eq!(intermediate, vec![NodeRole::Dc, NodeRole::Warehouse]);
    }

    #[test]
    fn test_integer_identifiers_become_strings() {
        let ids: Vec<NodeId> = serde_json::from_str(r#"[1, "p1", -3]"#).unwrap();
        assert_eq!(ids, vec![NodeId::from("1"), NodeId::from("p1"), NodeId::from("-3")]);
    }

    #[test]
    fn test_node_id_ordering_is_lexicographic() {
        let mut ids = vec![NodeId::from("b"), NodeId::from("a2"), NodeId::from("a10")];
        ids.sort();
        let names: Vec<_> = ids.iter().map(NodeId::as_str).collect();
        assert_eq!(names, vec!["a10", "a2", "b"]);
    }
}
