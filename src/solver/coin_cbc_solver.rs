// COIN-OR CBC adapter through good_lp

use crate::domain::{
    models::{EngineSolution, OptimizationProblem, SolverStatistics},
    solver_service::{Result, SolverService},
};
use good_lp::{solvers::coin_cbc::coin_cbc, SolverModel};
use std::time::Instant;

use super::{good_lp_model, trivial_outcome};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<EngineSolution> {
        self.validate(problem)?;

        if let Some(outcome) = trivial_outcome(problem) {
            return Ok(outcome);
        }

        let start_time = Instant::now();
        let mut built = good_lp_model::build(problem, coin_cbc);

        let config = &problem.solver_config;
        if !config.verbose {
            built.model.set_parameter("log", "0");
        }
        if let Some(seconds) = config.time_limit {
            built.model.set_parameter("seconds", &seconds.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            built.model.set_parameter("ratioGap", &gap.to_string());
        }

        let outcome = built.model.solve();
        let statistics =
            SolverStatistics::for_problem(problem, start_time.elapsed().as_secs_f64() * 1000.0);

        good_lp_model::interpret(problem, outcome, &built.columns, statistics, self.name())
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
