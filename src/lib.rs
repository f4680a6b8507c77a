// Domain layer: engine-neutral optimization model and solver contract
pub mod domain;

// Network layer: nodes, connections and solved designs
pub mod network;

// Application layer: model building, extraction and orchestration
pub mod application;

// Infrastructure layer: External concerns (files, rendering, CLI)
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

pub mod error;

// Re-export commonly used types
pub use domain::{
    EngineSolution, OptimizationProblem, SolutionStatus, SolverBackend, SolverConfig, SolverError,
    SolverService,
};

pub use network::{Connection, Network, Node, NodeId, NodeRole, Solution, Violation};

pub use application::{solve, NetworkModel, NetworkPlanner};

pub use error::{ConfigurationError, NetworkError, Result};

pub use solver::SolverFactory;
