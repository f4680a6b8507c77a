// Graph model: facilities, clients, links and the solutions computed for them

pub mod connection;
pub mod graph;
pub mod node;
pub mod solution;

pub use connection::Connection;
pub use graph::Network;
pub use node::{Node, NodeId, NodeRole};
pub use solution::{Solution, Violation, COST_TOLERANCE};
