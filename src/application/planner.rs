// Planner: one network in, one solution out

use std::sync::Arc;

use super::extractor::extract;
use super::model_builder::NetworkModel;
use crate::domain::{SolverConfig, SolverService};
use crate::error::Result;
use crate::network::{Network, Solution};
use crate::solver::SolverFactory;

/// Orchestrates model building, the engine call and solution extraction
///
/// Every call to [`NetworkPlanner::solve`] builds a fresh problem, so a planner can be
/// shared between threads.
pub struct NetworkPlanner {
    solver: Arc<dyn SolverService>,
    config: SolverConfig,
}

impl NetworkPlanner {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self {
            solver,
            config: SolverConfig::default(),
        }
    }

    /// Planner on the backend selected by `config`.
    pub fn from_config(config: SolverConfig) -> Result<Self> {
        let solver = SolverFactory::create_from_backend(config.backend)?;
        Ok(Self { solver, config })
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn solve(&self, network: &Network) -> Result<Solution> {
        log::info!(
            "Solving network with {} nodes and {} connections using {}",
            network.nodes().len(),
            network.connections().len(),
            self.solver.name()
        );

        let model = NetworkModel::build(network, self.config.clone())?;
        let outcome = self.solver.solve(&model.problem)?;

        log::info!(
            "Status: {} in {:.1} ms",
            outcome.status,
            outcome.statistics.solve_time_ms
        );
        log::debug!(
            "Max constraint violation {:e}, max integrality violation {:e}",
            outcome.quality.max_constraint_violation,
            outcome.quality.max_integrality_violation
        );

        let solution = extract(network, &model, outcome)?;
        for violation in solution.violations() {
            log::warn!("Solution violates a network rule: {}", violation);
        }
        if !solution.is_cost_consistent() {
            log::warn!(
                "Reported cost {} differs from recomputed cost {}",
                solution.total_costs(),
                solution.recomputed_costs()
            );
        }
        Ok(solution)
    }
}

/// Solves `network` on the default backend.
pub fn solve(network: &Network) -> Result<Solution> {
    NetworkPlanner::from_config(SolverConfig::default())?.solve(network)
}
