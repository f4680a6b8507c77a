// Command line: load a definition, solve it, then write or print the result

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use super::persistence::DataFormat;
use super::render::{write_graph, RenderConfig};
use crate::application::{solution_to_report, NetworkPlanner};
use crate::domain::{SolverBackend, SolverConfig};
use crate::error::{ConfigurationError, Result};
use crate::network::Network;

/// Designs the cheapest distribution network for a YAML or JSON definition.
#[derive(Debug, Parser)]
#[command(name = "lognet", version, about)]
pub struct Args {
    /// Network definition (.yaml, .yml or .json)
    pub config: PathBuf,

    /// Where to store the solution; printed to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Where to draw the solution as a Graphviz file (.dot or .gv)
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Engine to use: auto, microlp, cbc or highs
    #[arg(long, default_value_t = SolverBackend::Auto)]
    pub solver: SolverBackend,

    /// Wall-clock budget for the engine, in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Relative optimality gap at which the engine may stop
    #[arg(long)]
    pub gap: Option<f64>,

    /// More output per occurrence (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            backend: self.solver,
            time_limit: self.time_limit,
            gap_tolerance: self.gap,
            verbose: self.verbose >= 3,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

pub fn run(args: &Args) -> Result<()> {
    let network = Network::from_file(&args.config)?;
    let planner = NetworkPlanner::from_config(args.solver_config())?;
    let solution = planner.solve(&network)?;

    log::info!(
        "Total costs {} with {} of {} nodes open",
        solution.total_costs(),
        solution.open_nodes().count(),
        solution.nodes().len()
    );

    match &args.output {
        Some(path) => {
            solution.to_file(path)?;
            log::info!("Solution written to {}", path.display());
        }
        None => {
            let text = DataFormat::Yaml
                .encode(&solution_to_report(&solution))
                .map_err(|message| ConfigurationError::Malformed {
                    path: PathBuf::from("<stdout>"),
                    message,
                })?;
            print!("{}", text);
        }
    }

    if let Some(path) = &args.graph {
        write_graph(&solution, path, &RenderConfig::default())?;
        log::info!("Graph written to {}", path.display());
    }

    Ok(())
}
