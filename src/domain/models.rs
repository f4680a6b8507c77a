use super::value_objects::{
    ConstraintType, OptimizationType, SolutionStatus, SolverBackend, VariableType,
};

/// Handle to a variable declared on an [`OptimizationProblem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarRef(usize);

impl VarRef {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Decision variable in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub name: String,
}

impl Variable {
    pub fn integer(name: impl Into<String>, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound,
            upper_bound,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: 1.0,
            name: name.into(),
        }
    }
}

/// Sparse linear combination of variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarRef, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables, each with coefficient 1.
    pub fn sum(vars: impl IntoIterator<Item = VarRef>) -> Self {
        vars.into_iter().map(|v| (v, 1.0)).collect()
    }

    pub fn add_term(&mut self, var: VarRef, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn with_term(mut self, var: VarRef, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// Appends every term of `other` with its coefficient multiplied by `factor`.
    pub fn add_scaled(&mut self, other: &LinearExpr, factor: f64) {
        self.terms
            .extend(other.terms.iter().map(|&(v, c)| (v, c * factor)));
    }

    pub fn terms(&self) -> &[(VarRef, f64)] {
        &self.terms
    }

    /// True when no term carries a non-zero coefficient.
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(|&(_, c)| c == 0.0)
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

impl FromIterator<(VarRef, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarRef, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

/// Objective function to minimize or maximize
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub expression: LinearExpr,
}

/// Linear constraint `expression <op> bound`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub expression: LinearExpr,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, expression: LinearExpr, bound: f64) -> Self {
        Self {
            constraint_type,
            expression,
            bound,
            name: String::new(),
        }
    }

    /// Amount by which `values` violate this constraint (0 when satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.expression.evaluate(values);
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => (lhs - self.bound).max(0.0),
            ConstraintType::Equal => (lhs - self.bound).abs(),
            ConstraintType::GreaterThanOrEqual => (self.bound - lhs).max(0.0),
        }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock budget in seconds
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which the search may stop
    pub gap_tolerance: Option<f64>,
    pub verbose: bool,
}

/// Complete optimization problem, assembled through the declaration API
#[derive(Debug, Clone, Default)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn declare_boolean_variable(&mut self, name: impl Into<String>) -> VarRef {
        self.variables.push(Variable::binary(name));
        VarRef(self.variables.len() - 1)
    }

    pub fn declare_integer_variable(
        &mut self,
        name: impl Into<String>,
        lower_bound: f64,
        upper_bound: f64,
    ) -> VarRef {
        self.variables
            .push(Variable::integer(name, lower_bound, upper_bound));
        VarRef(self.variables.len() - 1)
    }

    pub fn add_linear_equality(&mut self, expression: LinearExpr, value: f64) -> &mut Constraint {
        self.push_constraint(Constraint::new(ConstraintType::Equal, expression, value))
    }

    /// `direction` must be `LessThanOrEqual` or `GreaterThanOrEqual`; `Equal` is accepted too.
    pub fn add_linear_inequality(
        &mut self,
        expression: LinearExpr,
        bound: f64,
        direction: ConstraintType,
    ) -> &mut Constraint {
        self.push_constraint(Constraint::new(direction, expression, bound))
    }

    pub fn set_objective(&mut self, expression: LinearExpr, direction: OptimizationType) {
        self.objective = ObjectiveFunction {
            optimization_type: direction,
            expression,
        };
    }

    fn push_constraint(&mut self, constraint: Constraint) -> &mut Constraint {
        self.constraints.push(constraint);
        let last = self.constraints.len() - 1;
        &mut self.constraints[last]
    }

    pub fn variable(&self, var: VarRef) -> Option<&Variable> {
        self.variables.get(var.index())
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.count_type(VariableType::Integer)
    }

    pub fn num_binary_variables(&self) -> usize {
        self.count_type(VariableType::Binary)
    }

    fn count_type(&self, variable_type: VariableType) -> usize {
        self.variables
            .iter()
            .filter(|v| v.variable_type == variable_type)
            .count()
    }

    /// Constraints that reference at least one variable with a non-zero coefficient.
    pub fn active_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(|c| !c.expression.is_constant())
    }

    /// A constraint with no variables whose constant comparison fails, if any.
    ///
    /// Such a problem is infeasible regardless of the backend.
    pub fn violated_constant_constraint(&self) -> Option<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.expression.is_constant())
            .find(|c| !c.constraint_type.holds(0.0, c.bound, 1e-9))
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.expression.evaluate(values)
    }

    pub fn max_constraint_violation(&self, values: &[f64]) -> f64 {
        self.constraints
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0, f64::max)
    }

    pub fn max_integrality_violation(&self, values: &[f64]) -> f64 {
        values.iter().map(|v| (v - v.round()).abs()).fold(0.0, f64::max)
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_integer_vars: problem.num_integer_variables() as u32,
            num_binary_vars: problem.num_binary_variables() as u32,
        }
    }
}

/// Quality metrics for the returned assignment
#[derive(Debug, Clone, Default)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

/// Result of one engine solve
#[derive(Debug, Clone)]
pub struct EngineSolution {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: SolutionQuality,
}

impl EngineSolution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    /// Optimal assignment; objective value and quality are derived from `problem`.
    pub fn optimal(problem: &OptimizationProblem, variable_values: Vec<f64>) -> Self {
        Self::with_assignment(SolutionStatus::Optimal, problem, variable_values)
    }

    pub fn with_assignment(
        status: SolutionStatus,
        problem: &OptimizationProblem,
        variable_values: Vec<f64>,
    ) -> Self {
        let quality = SolutionQuality {
            max_constraint_violation: problem.max_constraint_violation(&variable_values),
            max_integrality_violation: problem.max_integrality_violation(&variable_values),
        };
        Self {
            status,
            objective_value: Some(problem.objective_value(&variable_values)),
            variable_values,
            message: format!("{} solution found for '{}'", status, problem.name),
            statistics: SolverStatistics::default(),
            quality,
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn value_of(&self, var: VarRef) -> Option<f64> {
        self.variable_values.get(var.index()).copied()
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn is_feasible(&self) -> bool {
        self.status.has_assignment()
    }
}
