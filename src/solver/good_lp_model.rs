// Translation of a domain problem into a good_lp model, shared by the good_lp based adapters

use crate::domain::{
    models::{EngineSolution, LinearExpr, OptimizationProblem, SolverStatistics},
    solver_service::{Result, SolverError},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use good_lp::solvers::SolutionStatus as GoodLpStatus;
use good_lp::{
    variable, variables, Expression, ResolutionError, Solution as GoodLpSolution, Solver,
    SolverModel, Variable as GoodLpVariable,
};

use super::limit_outcome;

/// A good_lp model together with the columns created for each domain variable.
pub(crate) struct GoodLpModel<M> {
    pub model: M,
    pub columns: Vec<GoodLpVariable>,
}

fn expression(expr: &LinearExpr, columns: &[GoodLpVariable]) -> Expression {
    let mut out: Expression = 0.into();
    for &(var, coeff) in expr.terms() {
        if coeff != 0.0 {
            out += coeff * columns[var.index()];
        }
    }
    out
}

/// Declares variables, objective and every non-constant constraint on `solver`.
pub(crate) fn build<S: Solver>(problem: &OptimizationProblem, solver: S) -> GoodLpModel<S::Model> {
    let mut vars = variables!();
    let columns: Vec<GoodLpVariable> = problem
        .variables
        .iter()
        .map(|def| match def.variable_type {
            VariableType::Binary => vars.add(variable().binary().name(def.name.clone())),
            VariableType::Integer => vars.add(
                variable()
                    .integer()
                    .min(def.lower_bound)
                    .max(def.upper_bound)
                    .name(def.name.clone()),
            ),
        })
        .collect();

    let objective = expression(&problem.objective.expression, &columns);
    let unsolved = match problem.objective.optimization_type {
        OptimizationType::Minimize => vars.minimise(objective),
        OptimizationType::Maximize => vars.maximise(objective),
    };
    let mut model = unsolved.using(solver);

    for constraint in problem.active_constraints() {
        let lhs = expression(&constraint.expression, &columns);
        model = match constraint.constraint_type {
            ConstraintType::LessThanOrEqual => model.with(lhs.leq(constraint.bound)),
            ConstraintType::Equal => model.with(lhs.eq(constraint.bound)),
            ConstraintType::GreaterThanOrEqual => model.with(lhs.geq(constraint.bound)),
        };
    }

    GoodLpModel { model, columns }
}

/// Maps a good_lp resolution outcome onto an [`EngineSolution`].
///
/// Assignments returned after a time or gap limit go through [`limit_outcome`].
pub(crate) fn interpret<S: GoodLpSolution>(
    problem: &OptimizationProblem,
    outcome: std::result::Result<S, ResolutionError>,
    columns: &[GoodLpVariable],
    statistics: SolverStatistics,
    engine: &str,
) -> Result<EngineSolution> {
    match outcome {
        Ok(sol) => {
            let values = columns.iter().map(|&c| sol.value(c)).collect();
            match sol.status() {
                GoodLpStatus::Optimal => {
                    Ok(EngineSolution::optimal(problem, values).with_statistics(statistics))
                }
                stopped => {
                    log::debug!("{} stopped early: {:?}", engine, stopped);
                    Ok(limit_outcome(problem, values, statistics, engine))
                }
            }
        }
        // CBC reports an interrupted search without incumbent this way
        Err(ResolutionError::Other(reason)) if reason == "Stopped" => Ok(EngineSolution::new(
            SolutionStatus::TimeLimit,
            format!("{} stopped on a limit before finding a solution", engine),
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Infeasible) => Ok(EngineSolution::new(
            SolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Unbounded) => Ok(EngineSolution::new(
            SolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
        .with_statistics(statistics)),
        Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed assignment reported with a chosen good_lp status.
    struct Stopped {
        status: GoodLpStatus,
        values: Vec<f64>,
        columns: Vec<GoodLpVariable>,
    }

    impl GoodLpSolution for Stopped {
        fn status(&self) -> GoodLpStatus {
            self.status.clone()
        }

        fn value(&self, variable: GoodLpVariable) -> f64 {
            self.columns
                .iter()
                .position(|&c| c == variable)
                .map(|i| self.values[i])
                .unwrap_or(0.0)
        }
    }

    fn one_of_two() -> (OptimizationProblem, Vec<GoodLpVariable>) {
        let mut problem = OptimizationProblem::new("one of two");
        let x = problem.declare_boolean_variable("x");
        let y = problem.declare_boolean_variable("y");
        problem.add_linear_equality(LinearExpr::sum([x, y]), 1.0);

        let mut vars = variables!();
        let columns = vec![vars.add(variable().binary()), vars.add(variable().binary())];
        (problem, columns)
    }

    fn run(status: GoodLpStatus, values: Vec<f64>) -> EngineSolution {
        let (problem, columns) = one_of_two();
        let sol = Stopped {
            status,
            values,
            columns: columns.clone(),
        };
        interpret(&problem, Ok(sol), &columns, SolverStatistics::default(), "test").unwrap()
    }

    #[test]
    fn test_optimal_status_is_kept() {
        let outcome = run(GoodLpStatus::Optimal, vec![1.0, 0.0]);
        assert_eq!(outcome.status, SolutionStatus::Optimal);
        assert_eq!(outcome.variable_values, vec![1.0, 0.0]);
    }

    #[test]
    fn test_time_limit_with_valid_incumbent_is_feasible() {
        let outcome = run(GoodLpStatus::TimeLimit, vec![0.0, 1.0]);
        assert_eq!(outcome.status, SolutionStatus::Feasible);
        assert_eq!(outcome.objective_value, Some(0.0));
    }

    #[test]
    fn test_limit_with_violated_constraint_has_no_assignment() {
        let outcome = run(GoodLpStatus::TimeLimit, vec![0.0, 0.0]);
        assert_eq!(outcome.status, SolutionStatus::TimeLimit);
        assert!(!outcome.is_feasible());
        assert!(outcome.variable_values.is_empty());

        let outcome = run(GoodLpStatus::GapLimit, vec![1.0, 1.0]);
        assert_eq!(outcome.status, SolutionStatus::TimeLimit);
    }

    #[test]
    fn test_stopped_search_is_time_limit() {
        let (problem, columns) = one_of_two();
        let outcome = interpret::<Stopped>(
            &problem,
            Err(ResolutionError::Other("Stopped")),
            &columns,
            SolverStatistics::default(),
            "test",
        )
        .unwrap();
        assert_eq!(outcome.status, SolutionStatus::TimeLimit);
    }

    #[test]
    fn test_infeasible_resolution_is_reported() {
        let (problem, columns) = one_of_two();
        let outcome = interpret::<Stopped>(
            &problem,
            Err(ResolutionError::Infeasible),
            &columns,
            SolverStatistics::default(),
            "test",
        )
        .unwrap();
        assert_eq!(outcome.status, SolutionStatus::Infeasible);
    }
}
