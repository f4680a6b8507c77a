// Solver adapters: concrete engines behind the SolverService contract

#[cfg(feature = "coin_cbc")]
pub mod coin_cbc_solver;
pub mod factory;
#[cfg(any(feature = "microlp", feature = "coin_cbc"))]
mod good_lp_model;
#[cfg(feature = "highs")]
pub mod highs_solver;
#[cfg(feature = "microlp")]
pub mod microlp_solver;

#[cfg(feature = "coin_cbc")]
pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
#[cfg(feature = "highs")]
pub use highs_solver::HighsSolver;
#[cfg(feature = "microlp")]
pub use microlp_solver::MicroLpSolver;

use crate::domain::{EngineSolution, OptimizationProblem, SolutionStatus, SolverStatistics};

/// Tolerance used to accept an incumbent returned when an engine stops on a limit.
pub(crate) const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Outcome of problems that need no search at all.
///
/// Returns `Some` for an empty problem (optimum 0) or one with a violated constant constraint.
#[allow(dead_code)]
pub(crate) fn trivial_outcome(problem: &OptimizationProblem) -> Option<EngineSolution> {
    if let Some(constraint) = problem.violated_constant_constraint() {
        return Some(EngineSolution::new(
            SolutionStatus::Infeasible,
            format!(
                "Constraint '{}' has no variables and requires 0 {} {}",
                constraint.name, constraint.constraint_type, constraint.bound
            ),
        ));
    }
    if problem.variables.is_empty() {
        return Some(EngineSolution::optimal(problem, Vec::new()));
    }
    None
}

/// Outcome for an engine that stopped on a limit with `values` as its incumbent.
///
/// The incumbent is kept as `Feasible` only if it satisfies every constraint and integrality
/// requirement; otherwise the outcome is a `TimeLimit` without assignment.
#[allow(dead_code)]
pub(crate) fn limit_outcome(
    problem: &OptimizationProblem,
    values: Vec<f64>,
    statistics: SolverStatistics,
    engine: &str,
) -> EngineSolution {
    if values.len() == problem.num_variables()
        && problem.max_constraint_violation(&values) <= FEASIBILITY_TOLERANCE
        && problem.max_integrality_violation(&values) <= FEASIBILITY_TOLERANCE
    {
        EngineSolution::with_assignment(SolutionStatus::Feasible, problem, values)
            .with_statistics(statistics)
    } else {
        EngineSolution::new(
            SolutionStatus::TimeLimit,
            format!("{} stopped on a limit without a feasible assignment", engine),
        )
        .with_statistics(statistics)
    }
}
