// Solution extractor: reads an engine assignment back into network terms

use std::collections::BTreeMap;

use super::model_builder::NetworkModel;
use crate::domain::{EngineSolution, VarRef};
use crate::error::{NetworkError, Result};
use crate::network::{Network, Solution};

fn value(outcome: &EngineSolution, var: VarRef, name: &str) -> Result<f64> {
    match outcome.value_of(var) {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(NetworkError::NoSolution {
            status: outcome.status,
            message: format!("engine returned no value for '{}'", name),
        }),
    }
}

/// Builds the [`Solution`] for `network` from the engine result of its model.
///
/// Statuses without an assignment become [`NetworkError::NoSolution`]. Open flags are read
/// as `value > 0.5` and flows are rounded to the nearest non-negative integer.
pub fn extract(network: &Network, model: &NetworkModel, outcome: EngineSolution) -> Result<Solution> {
    if !outcome.is_feasible() {
        return Err(NetworkError::NoSolution {
            status: outcome.status,
            message: outcome.message,
        });
    }
    let total_costs = outcome.objective_value.ok_or_else(|| NetworkError::NoSolution {
        status: outcome.status,
        message: "engine reported no objective value".to_string(),
    })?;

    let mut resulting_nodes = BTreeMap::new();
    for (id, &var) in &model.open {
        let open = value(&outcome, var, &format!("open[{}]", id))? > 0.5;
        resulting_nodes.insert(id.clone(), open);
    }

    let flows = model
        .flow
        .iter()
        .enumerate()
        .map(|(i, &var)| {
            let v = value(&outcome, var, &format!("flow #{}", i))?;
            Ok(v.round().max(0.0) as u64)
        })
        .collect::<Result<Vec<u64>>>()?;

    let solution = Solution::new(
        network.nodes().clone(),
        network.connections().to_vec(),
        resulting_nodes,
        flows,
        total_costs,
        outcome.status,
    )?;
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::solution_to_report;
    use crate::domain::{SolutionStatus, SolverConfig};
    use crate::network::{Connection, Node, NodeId};

    fn model() -> (Network, NetworkModel) {
        let mut network = Network::default();
        network.add_node("p", Node::plant(10, 5.0));
        network.add_node("c", Node::client(4));
        network.add_connection(Connection::new("p", "c", 10, 2.0));
        let model = NetworkModel::build(&network, SolverConfig::default()).unwrap();
        (network, model)
    }

    #[test]
    fn test_infeasible_status_is_no_solution() {
        let (network, model) = model();
        let outcome = EngineSolution::new(SolutionStatus::Infeasible, "over-constrained");
        let err = extract(&network, &model, outcome).unwrap_err();
        assert!(err.is_no_solution());
        assert!(err.to_string().contains("over-constrained"));
    }

    #[test]
    fn test_assignment_is_rounded_and_copied() {
        let (mut network, model) = model();
        let mut values = vec![0.0; model.problem.num_variables()];
        values[model.open[&NodeId::from("p")].index()] = 0.9999;
        values[model.open[&NodeId::from("c")].index()] = 1.0;
        values[model.flow[0].index()] = 3.9999997;
        let outcome = EngineSolution::optimal(&model.problem, values);

        let solution = extract(&network, &model, outcome).unwrap();
        assert!(solution.is_open(&NodeId::from("p")));
        assert_eq!(solution.flows(), &[4]);
        assert!(solution.violations().is_empty());

        network.add_node("late", Node::dc(1, 0.0));
        assert_eq!(solution.nodes().len(), 2);
    }

    #[test]
    fn test_feasible_assignment_keeps_its_status() {
        let (network, model) = model();
        let mut values = vec![0.0; model.problem.num_variables()];
        values[model.open[&NodeId::from("p")].index()] = 1.0;
        values[model.open[&NodeId::from("c")].index()] = 1.0;
        values[model.flow[0].index()] = 4.0;
        let outcome =
            EngineSolution::with_assignment(SolutionStatus::Feasible, &model.problem, values);

        let solution = extract(&network, &model, outcome).unwrap();
        assert_eq!(solution.status(), SolutionStatus::Feasible);
        assert_eq!(solution.total_costs(), 13.0);
        assert_eq!(solution_to_report(&solution).status, "Feasible");
    }

    #[test]
    fn test_statuses_without_assignment_are_no_solution() {
        for status in [
            SolutionStatus::TimeLimit,
            SolutionStatus::Unbounded,
            SolutionStatus::Error,
        ] {
            let (network, model) = model();
            let outcome = EngineSolution::new(status, "stopped");
            match extract(&network, &model, outcome) {
                Err(NetworkError::NoSolution { status: reported, .. }) => {
                    assert_eq!(reported, status)
                }
                other => panic!("{} gave {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_missing_values_are_no_solution() {
        let (network, model) = model();
        let mut outcome = EngineSolution::optimal(&model.problem, Vec::new());
        outcome.objective_value = Some(0.0);
        let err = extract(&network, &model, outcome).unwrap_err();
        assert!(err.is_no_solution());
    }
}
