// Model builder: translates a network into a mixed-integer program

use std::collections::BTreeMap;

use crate::domain::{
    ConstraintType, LinearExpr, OptimizationProblem, OptimizationType, SolverConfig, VarRef,
};
use crate::error::Result;
use crate::network::{Network, Node, NodeId, NodeRole};

/// The problem built for one network, with the variables declared for it
///
/// `open` holds one boolean variable per node and `flow[i]` the integer flow variable of
/// connection `i`.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    pub problem: OptimizationProblem,
    pub open: BTreeMap<NodeId, VarRef>,
    pub flow: Vec<VarRef>,
}

impl NetworkModel {
    /// Validates `network` and declares its variables, constraints and objective.
    pub fn build(network: &Network, config: SolverConfig) -> Result<Self> {
        network.validate()?;

        let mut problem = OptimizationProblem::new("network design").with_config(config);

        let open = network
            .nodes()
            .keys()
            .map(|id| {
                let var = problem.declare_boolean_variable(format!("open[{}]", id));
                (id.clone(), var)
            })
            .collect();

        let flow = network
            .connections()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                problem.declare_integer_variable(
                    format!("flow[{}:{}->{}]", i, c.from_node, c.to_node),
                    0.0,
                    c.capacity as f64,
                )
            })
            .collect();

        let mut model = Self {
            problem,
            open,
            flow,
        };

        for (id, node) in network.nodes() {
            model.add_node_constraints(network, id, node);
        }
        model.set_cost_objective(network);

        log::debug!(
            "Built model with {} variables and {} constraints",
            model.problem.num_variables(),
            model.problem.constraints.len()
        );
        Ok(model)
    }

    fn inflow(&self, network: &Network, id: &NodeId) -> LinearExpr {
        LinearExpr::sum(network.incoming(id).map(|(i, _)| self.flow[i]))
    }

    fn outflow(&self, network: &Network, id: &NodeId) -> LinearExpr {
        LinearExpr::sum(network.outgoing(id).map(|(i, _)| self.flow[i]))
    }

    /// `flow - capacity * open`, the left-hand side of every capacity coupling.
    fn coupled(&self, flow: LinearExpr, id: &NodeId, node: &Node) -> LinearExpr {
        flow.with_term(self.open[id], -(node.capacity as f64))
    }

    fn add_node_constraints(&mut self, network: &Network, id: &NodeId, node: &Node) {
        let open = self.open[id];
        match node.role {
            NodeRole::Client => {
                self.problem
                    .add_linear_equality(LinearExpr::sum([open]), 1.0)
                    .name = format!("activation[{}]", id);

                let demand = self.coupled(self.inflow(network, id), id, node);
                self.problem.add_linear_equality(demand, 0.0).name = format!("demand[{}]", id);
            }
            NodeRole::Plant => {
                let production = self.coupled(self.outflow(network, id), id, node);
                self.problem
                    .add_linear_inequality(production, 0.0, ConstraintType::LessThanOrEqual)
                    .name = format!("production[{}]", id);
            }
            NodeRole::Dc | NodeRole::Warehouse => {
                let inflow = self.inflow(network, id);
                let outflow = self.outflow(network, id);

                let throughput = self.coupled(inflow.clone(), id, node);
                self.problem
                    .add_linear_inequality(throughput, 0.0, ConstraintType::LessThanOrEqual)
                    .name = format!("throughput[{}]", id);

                if !(inflow.terms().is_empty() && outflow.terms().is_empty()) {
                    let mut balance = inflow;
                    balance.add_scaled(&outflow, -1.0);
                    self.problem.add_linear_equality(balance, 0.0).name =
                        format!("conservation[{}]", id);
                }
            }
        }
    }

    fn set_cost_objective(&mut self, network: &Network) {
        let fixed = network
            .nodes()
            .iter()
            .map(|(id, node)| (self.open[id], node.cost));
        let variable = network
            .connections()
            .iter()
            .zip(self.flow.iter())
            .map(|(c, &var)| (var, c.cost));

        self.problem
            .set_objective(fixed.chain(variable).collect(), OptimizationType::Minimize);
    }
}
