// Mappers: convert between solutions and the structured report written to files
// The report keeps file formats independent from the in-memory Solution

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::SolutionStatus;
use crate::error::ConfigurationError;
use crate::network::{Connection, Node, NodeId, NodeRole, Solution};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    pub opened: bool,
    #[serde(rename = "type")]
    pub role: NodeRole,
    pub capacity: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub from_node: NodeId,
    pub to_node: NodeId,
    pub capacity: u64,
    pub cost: f64,
    pub traffic: u64,
}

/// Structured form of a [`Solution`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub total_costs: f64,
    #[serde(default = "default_status")]
    pub status: String,
    pub nodes: BTreeMap<NodeId, NodeReport>,
    pub connections: Vec<ConnectionReport>,
}

fn default_status() -> String {
    SolutionStatus::Optimal.to_string()
}

fn parse_status(status: &str) -> Result<SolutionStatus, ConfigurationError> {
    match status.to_ascii_lowercase().as_str() {
        "optimal" => Ok(SolutionStatus::Optimal),
        "feasible" => Ok(SolutionStatus::Feasible),
        other => Err(ConfigurationError::InconsistentSolution(format!(
            "a stored solution must be optimal or feasible, found '{}'",
            other
        ))),
    }
}

pub fn solution_to_report(solution: &Solution) -> SolutionReport {
    let nodes = solution
        .nodes()
        .iter()
        .map(|(id, node)| {
            let report = NodeReport {
                opened: solution.is_open(id),
                role: node.role,
                capacity: node.capacity,
                cost: node.cost,
            };
            (id.clone(), report)
        })
        .collect();

    let connections = solution
        .connection_flows()
        .map(|(c, traffic)| ConnectionReport {
            from_node: c.from_node.clone(),
            to_node: c.to_node.clone(),
            capacity: c.capacity,
            cost: c.cost,
            traffic,
        })
        .collect();

    SolutionReport {
        total_costs: solution.total_costs(),
        status: solution.status().to_string(),
        nodes,
        connections,
    }
}

pub fn report_to_solution(report: SolutionReport) -> Result<Solution, ConfigurationError> {
    let status = parse_status(&report.status)?;

    let mut nodes = BTreeMap::new();
    let mut resulting_nodes = BTreeMap::new();
    for (id, n) in report.nodes {
        nodes.insert(id.clone(), Node::new(n.role, n.capacity, n.cost));
        resulting_nodes.insert(id, n.opened);
    }

    let (connections, flows): (Vec<_>, Vec<_>) = report
        .connections
        .into_iter()
        .map(|c| {
            (
                Connection::new(c.from_node, c.to_node, c.capacity, c.cost),
                c.traffic,
            )
        })
        .unzip();

    if let Some(c) = connections
        .iter()
        .find(|c| !nodes.contains_key(&c.from_node) || !nodes.contains_key(&c.to_node))
    {
        return Err(ConfigurationError::InconsistentSolution(format!(
            "connection {} -> {} references an unknown node",
            c.from_node, c.to_node
        )));
    }

    Solution::new(
        nodes,
        connections,
        resulting_nodes,
        flows,
        report.total_costs,
        status,
    )
}
