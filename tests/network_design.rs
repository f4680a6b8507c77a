#![cfg(any(feature = "microlp", feature = "coin_cbc", feature = "highs"))]

use std::path::PathBuf;

use approx::assert_relative_eq;
use proptest::prelude::*;

use lognet::{solve, Connection, Network, NetworkError, Node, NodeId, SolutionStatus, Solution};

/// Loads a network definition from the test resources.
fn instance(name: &str) -> Network {
    let location = PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/")
        .join(name);

    Network::from_file(location).expect("resource not found")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lognet-it-{}-{}", std::process::id(), name))
}

#[test]
fn two_plants_share_one_client() {
    let solution = solve(&instance("two_plants.yaml")).unwrap();

    assert_relative_eq!(solution.total_costs(), 120.0, epsilon = 1e-6);
    assert_eq!(solution.open_nodes().count(), 3);
    assert_eq!(solution.flows().iter().sum::<u64>(), 120);
    assert_eq!(solution.inflow(&NodeId::from("c")), 120);
    assert!(solution.violations().is_empty());
    assert!(solution.is_cost_consistent());
}

#[test]
fn demand_above_production_has_no_solution() {
    let mut network = Network::default();
    network.add_node("p", Node::plant(5, 0.0));
    network.add_node("c", Node::client(10));
    network.add_connection(Connection::new("p", "c", 10, 1.0));

    let err = solve(&network).unwrap_err();
    assert!(err.is_no_solution());
    assert!(matches!(
        err,
        NetworkError::NoSolution {
            status: SolutionStatus::Infeasible,
            ..
        }
    ));
}

#[test]
fn fixed_costs_pick_the_distribution_center() {
    let mut network = instance("multi_echelon.yaml");

    let solution = solve(&network).unwrap();
    assert!(solution.is_open(&NodeId::from("north")));
    assert!(!solution.is_open(&NodeId::from("south")));
    assert_eq!(solution.inflow(&NodeId::from("hub")), 40);
    assert_relative_eq!(solution.total_costs(), 195.0, epsilon = 1e-6);
    assert!(solution.violations().is_empty());

    // A dearer north makes the longer lanes through south worth it
    network.add_node("north", Node::dc(150, 80.0));
    let solution = solve(&network).unwrap();
    assert!(!solution.is_open(&NodeId::from("north")));
    assert!(solution.is_open(&NodeId::from("south")));
    assert_eq!(solution.outflow(&NodeId::from("south")), 40);
    assert_relative_eq!(solution.total_costs(), 215.0, epsilon = 1e-6);
}

#[test]
fn parallel_connections_are_kept_apart() {
    let mut network = Network::default();
    network.add_node("p", Node::plant(20, 0.0));
    network.add_node("c", Node::client(15));
    network.add_connection(Connection::new("p", "c", 10, 1.0));
    network.add_connection(Connection::new("p", "c", 10, 3.0));

    let solution = solve(&network).unwrap();
    assert_eq!(solution.flows(), &[10, 5]);
    assert_relative_eq!(solution.total_costs(), 25.0, epsilon = 1e-6);
    assert_eq!(
        solution.resulting_connections()[&(NodeId::from("p"), NodeId::from("c"))],
        15
    );
}

#[test]
fn solution_files_round_trip() {
    let solution = solve(&instance("multi_echelon.yaml")).unwrap();

    for name in ["solution.yaml", "solution.json"] {
        let path = temp_path(name);
        solution.to_file(&path).unwrap();
        let restored = Solution::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(restored.nodes(), solution.nodes());
        assert_eq!(restored.connections(), solution.connections());
        assert_eq!(restored.flows(), solution.flows());
        assert_eq!(restored.resulting_nodes(), solution.resulting_nodes());
        assert_relative_eq!(restored.total_costs(), solution.total_costs());
    }
}

/// Plants feeding clients directly and through up to two warehouses.
fn network_strategy() -> impl Strategy<Value = Network> {
    let node = || (0u64..=30, 0u64..=10);
    (
        prop::collection::vec(node(), 1..=2),
        prop::collection::vec(node(), 0..=2),
        prop::collection::vec(0u64..=15, 1..=2),
        prop::collection::vec((0u64..=30, 0u64..=5), 16),
    )
        .prop_map(|(plants, warehouses, clients, lanes)| {
            let mut network = Network::default();
            for (i, &(capacity, cost)) in plants.iter().enumerate() {
                network.add_node(format!("p{}", i), Node::plant(capacity, cost as f64));
            }
            for (i, &(capacity, cost)) in warehouses.iter().enumerate() {
                network.add_node(format!("w{}", i), Node::warehouse(capacity, cost as f64));
            }
            for (i, &demand) in clients.iter().enumerate() {
                network.add_node(format!("c{}", i), Node::client(demand));
            }

            let mut lanes = lanes.into_iter().cycle();
            let mut connect = |network: &mut Network, from: String, to: String| {
                if let Some((capacity, cost)) = lanes.next() {
                    network.add_connection(Connection::new(from, to, capacity, cost as f64));
                }
            };
            for p in 0..plants.len() {
                for c in 0..clients.len() {
                    connect(&mut network, format!("p{}", p), format!("c{}", c));
                }
                for w in 0..warehouses.len() {
                    connect(&mut network, format!("p{}", p), format!("w{}", w));
                }
            }
            for w in 0..warehouses.len() {
                for c in 0..clients.len() {
                    connect(&mut network, format!("w{}", w), format!("c{}", c));
                }
            }
            network
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn solved_networks_respect_the_rules(network in network_strategy()) {
        match solve(&network) {
            Ok(solution) => {
                prop_assert!(solution.violations().is_empty(), "{:?}", solution.violations());
                prop_assert!(solution.is_cost_consistent());
                for (id, node) in network.client_nodes() {
                    prop_assert_eq!(solution.inflow(id), node.capacity);
                }
                for (id, _) in network.middle_nodes() {
                    prop_assert_eq!(solution.inflow(id), solution.outflow(id));
                }
            }
            Err(err) => prop_assert!(err.is_no_solution(), "{}", err),
        }
    }

    #[test]
    fn short_production_is_never_solved(network in network_strategy()) {
        prop_assume!(network.total_demand() > network.total_production());
        prop_assert!(solve(&network).unwrap_err().is_no_solution());
    }
}
