use std::collections::BTreeMap;
use std::fmt;

use super::connection::Connection;
use super::node::{Node, NodeId, NodeRole};
use crate::domain::SolutionStatus;
use crate::error::ConfigurationError;

/// Tolerance used when comparing costs recomputed from the assignment.
pub const COST_TOLERANCE: f64 = 1e-6;

/// A constraint broken by a solution's open flags and flows
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// An open DC or warehouse whose inflow and outflow differ
    Conservation {
        node: NodeId,
        inflow: u64,
        outflow: u64,
    },
    /// Flow through a closed node on its constrained side
    ClosedNodeFlow { node: NodeId, flow: u64 },
    /// Flow through an open node above its capacity
    CapacityExceeded {
        node: NodeId,
        flow: u64,
        capacity: u64,
    },
    /// A client whose inflow differs from its demand
    Demand {
        node: NodeId,
        inflow: u64,
        demand: u64,
    },
    /// A connection carrying more than its capacity
    ConnectionOverloaded { index: usize, flow: u64, capacity: u64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Conservation {
                node,
                inflow,
                outflow,
            } => write!(f, "{}: inflow {} != outflow {}", node, inflow, outflow),
            Violation::ClosedNodeFlow { node, flow } => {
                write!(f, "{}: closed but carries {}", node, flow)
            }
            Violation::CapacityExceeded {
                node,
                flow,
                capacity,
            } => write!(f, "{}: flow {} exceeds capacity {}", node, flow, capacity),
            Violation::Demand {
                node,
                inflow,
                demand,
            } => write!(f, "{}: receives {} but demands {}", node, inflow, demand),
            Violation::ConnectionOverloaded {
                index,
                flow,
                capacity,
            } => write!(
                f,
                "connection #{}: flow {} exceeds capacity {}",
                index, flow, capacity
            ),
        }
    }
}

/// Read-only result of one solve
///
/// Owns copies of the nodes and connections the problem was built from, so later edits
/// of the originating network never show through.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    nodes: BTreeMap<NodeId, Node>,
    connections: Vec<Connection>,
    resulting_nodes: BTreeMap<NodeId, bool>,
    flows: Vec<u64>,
    total_costs: f64,
    status: SolutionStatus,
}

impl Solution {
    /// `flows[i]` is the flow on `connections[i]`.
    pub fn new(
        nodes: BTreeMap<NodeId, Node>,
        connections: Vec<Connection>,
        resulting_nodes: BTreeMap<NodeId, bool>,
        flows: Vec<u64>,
        total_costs: f64,
        status: SolutionStatus,
    ) -> Result<Self, ConfigurationError> {
        if let Some(id) = resulting_nodes.keys().find(|id| !nodes.contains_key(*id)) {
            return Err(ConfigurationError::InconsistentSolution(format!(
                "open flag for unknown node '{}'",
                id
            )));
        }
        if flows.len() != connections.len() {
            return Err(ConfigurationError::InconsistentSolution(format!(
                "{} flows for {} connections",
                flows.len(),
                connections.len()
            )));
        }
        Ok(Self {
            nodes,
            connections,
            resulting_nodes,
            flows,
            total_costs,
            status,
        })
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn resulting_nodes(&self) -> &BTreeMap<NodeId, bool> {
        &self.resulting_nodes
    }

    pub fn is_open(&self, id: &NodeId) -> bool {
        self.resulting_nodes.get(id).copied().unwrap_or(false)
    }

    pub fn open_nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.resulting_nodes
            .iter()
            .filter(|&(_, &open)| open)
            .map(|(id, _)| id)
    }

    /// Flow per connection, aligned with [`Solution::connections`]
    pub fn flows(&self) -> &[u64] {
        &self.flows
    }

    pub fn connection_flows(&self) -> impl Iterator<Item = (&Connection, u64)> {
        self.connections.iter().zip(self.flows.iter().copied())
    }

    /// Flow per ordered node pair; parallel channels are summed.
    pub fn resulting_connections(&self) -> BTreeMap<(NodeId, NodeId), u64> {
        let mut out = BTreeMap::new();
        for (conn, flow) in self.connection_flows() {
            *out.entry(conn.key()).or_insert(0) += flow;
        }
        out
    }

    pub fn total_costs(&self) -> f64 {
        self.total_costs
    }

    pub fn status(&self) -> SolutionStatus {
        self.status
    }

    pub fn inflow(&self, id: &NodeId) -> u64 {
        self.connection_flows()
            .filter(|(c, _)| &c.to_node == id)
            .map(|(_, f)| f)
            .sum()
    }

    pub fn outflow(&self, id: &NodeId) -> u64 {
        self.connection_flows()
            .filter(|(c, _)| &c.from_node == id)
            .map(|(_, f)| f)
            .sum()
    }

    /// Fixed costs of open nodes plus flow-weighted connection costs.
    pub fn recomputed_costs(&self) -> f64 {
        let fixed: f64 = self
            .nodes
            .iter()
            .filter(|(id, _)| self.is_open(id))
            .map(|(_, n)| n.cost)
            .sum();
        let variable: f64 = self
            .connection_flows()
            .map(|(c, f)| c.cost * f as f64)
            .sum();
        fixed + variable
    }

    pub fn is_cost_consistent(&self) -> bool {
        (self.recomputed_costs() - self.total_costs).abs() <= COST_TOLERANCE
    }

    /// Every conservation, capacity and demand rule broken by this solution.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (id, node) in &self.nodes {
            let open = self.is_open(id);
            let inflow = self.inflow(id);
            let constrained = match node.role {
                NodeRole::Plant => self.outflow(id),
                NodeRole::Dc | NodeRole::Warehouse | NodeRole::Client => inflow,
            };

            if !open && constrained > 0 {
                violations.push(Violation::ClosedNodeFlow {
                    node: id.clone(),
                    flow: constrained,
                });
            }

            match node.role {
                NodeRole::Plant | NodeRole::Dc | NodeRole::Warehouse => {
                    if open && constrained > node.capacity {
                        violations.push(Violation::CapacityExceeded {
                            node: id.clone(),
                            flow: constrained,
                            capacity: node.capacity,
                        });
                    }
                    if node.role.is_intermediate() {
                        let outflow = self.outflow(id);
                        if inflow != outflow {
                            violations.push(Violation::Conservation {
                                node: id.clone(),
                                inflow,
                                outflow,
                            });
                        }
                    }
                }
                NodeRole::Client => {
                    if inflow != node.capacity {
                        violations.push(Violation::Demand {
                            node: id.clone(),
                            inflow,
                            demand: node.capacity,
                        });
                    }
                }
            }
        }

        for (index, (conn, flow)) in self.connection_flows().enumerate() {
            if flow > conn.capacity {
                violations.push(Violation::ConnectionOverloaded {
                    index,
                    flow,
                    capacity: conn.capacity,
                });
            }
        }

        violations
    }
}
