// Application layer: model building, solution extraction and solve orchestration

pub mod extractor;
pub mod mappers;
pub mod model_builder;
pub mod planner;

pub use extractor::extract;
pub use mappers::{report_to_solution, solution_to_report, SolutionReport};
pub use model_builder::NetworkModel;
pub use planner::{solve, NetworkPlanner};
