// HiGHS Solver Adapter
// Translates the domain problem into a HiGHS row problem

use crate::domain::{
    models::{EngineSolution, OptimizationProblem, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

use super::{limit_outcome, trivial_outcome};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<EngineSolution> {
        self.validate(problem)?;

        if let Some(outcome) = trivial_outcome(problem) {
            return Ok(outcome);
        }

        let start_time = Instant::now();

        // Dense objective: HiGHS takes the cost of each column when it is created
        let mut costs = vec![0.0; problem.num_variables()];
        for &(var, coeff) in problem.objective.expression.terms() {
            costs[var.index()] += coeff;
        }

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.num_variables());
        for (var_def, &cost) in problem.variables.iter().zip(costs.iter()) {
            let col = match var_def.variable_type {
                VariableType::Binary => pb.add_integer_column(cost, 0.0..=1.0),
                VariableType::Integer => {
                    pb.add_integer_column(cost, var_def.lower_bound..=var_def.upper_bound)
                }
            };
            cols.push(col);
        }

        for constraint in problem.active_constraints() {
            let terms: Vec<_> = constraint
                .expression
                .terms()
                .iter()
                .filter(|&&(_, coeff)| coeff != 0.0)
                .map(|&(var, coeff)| (cols[var.index()], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Minimize => Sense::Minimise,
            OptimizationType::Maximize => Sense::Maximise,
        };

        let config = &problem.solver_config;
        let mut model = pb.optimise(sense);
        model.set_option("output_flag", config.verbose);
        if let Some(seconds) = config.time_limit {
            model.set_option("time_limit", seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.try_solve().map_err(|status| {
            SolverError::ExecutionFailed(format!("HiGHS failed to run: {:?}", status))
        })?;
        let statistics =
            SolverStatistics::for_problem(problem, start_time.elapsed().as_secs_f64() * 1000.0);

        match solved.status() {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                Ok(EngineSolution::optimal(problem, values).with_statistics(statistics))
            }
            HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit => {
                let values = solved.get_solution().columns().to_vec();
                Ok(limit_outcome(problem, values, statistics, "HiGHS"))
            }
            HighsModelStatus::Infeasible => Ok(EngineSolution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(EngineSolution::new(
                    SolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
                .with_statistics(statistics))
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
