// Engine interface for solving optimization problems
// Any backend adapter implements this contract; the network layer only sees the trait

use super::models::{EngineSolution, OptimizationProblem};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Combinatorial optimization engine
///
/// Implementations receive a fully declared problem, run one blocking search and
/// report the status together with the assignment when one exists.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<EngineSolution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        for (i, var) in problem.variables.iter().enumerate() {
            if var.lower_bound.is_nan() || var.upper_bound.is_nan() {
                errors.push(format!("Variable {} '{}' has a NaN bound", i, var.name));
            } else if var.lower_bound > var.upper_bound {
                errors.push(format!(
                    "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                    i, var.name, var.lower_bound, var.upper_bound
                ));
            }
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if !constraint.bound.is_finite() {
                errors.push(format!(
                    "Constraint {} '{}' has non-finite bound {}",
                    i, constraint.name, constraint.bound
                ));
            }
            for &(var, coeff) in constraint.expression.terms() {
                if var.index() >= num_vars {
                    errors.push(format!(
                        "Constraint {} '{}' references unknown variable {}",
                        i,
                        constraint.name,
                        var.index()
                    ));
                }
                if !coeff.is_finite() {
                    errors.push(format!(
                        "Constraint {} '{}' has non-finite coefficient {}",
                        i, constraint.name, coeff
                    ));
                }
            }
        }

        for &(var, coeff) in problem.objective.expression.terms() {
            if var.index() >= num_vars {
                errors.push(format!(
                    "Objective references unknown variable {}",
                    var.index()
                ));
            }
            if !coeff.is_finite() {
                errors.push(format!("Objective has non-finite coefficient {}", coeff));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}
