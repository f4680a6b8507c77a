// Infrastructure: files, drawings and the command line

pub mod cli;
pub mod persistence;
pub mod render;

pub use cli::{run, Args};
pub use persistence::DataFormat;
pub use render::{to_graphviz, write_graph, RenderConfig};
