// microlp adapter: pure Rust branch and bound, always available with the default feature set

use crate::domain::{
    models::{EngineSolution, OptimizationProblem, SolverStatistics},
    solver_service::{Result, SolverService},
};
use good_lp::{solvers::microlp::microlp, SolverModel};
use std::time::Instant;

use super::{good_lp_model, trivial_outcome};

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<EngineSolution> {
        self.validate(problem)?;

        if let Some(outcome) = trivial_outcome(problem) {
            return Ok(outcome);
        }

        let config = &problem.solver_config;
        if config.time_limit.is_some() || config.gap_tolerance.is_some() {
            log::warn!("microlp ignores time limit and gap tolerance settings");
        }

        let start_time = Instant::now();
        let built = good_lp_model::build(problem, microlp);
        let outcome = built.model.solve();
        let statistics =
            SolverStatistics::for_problem(problem, start_time.elapsed().as_secs_f64() * 1000.0);

        good_lp_model::interpret(problem, outcome, &built.columns, statistics, self.name())
    }

    fn name(&self) -> &str {
        "microlp"
    }
}
