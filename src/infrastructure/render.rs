// Rendering: Graphviz view of a solution
// Output is dot text, pinned to a column layout so `neato -n` or `fdp` keeps the echelons apart

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ConfigurationError, NetworkError, Result};
use crate::network::{NodeId, NodeRole, Solution};

/// Horizontal position of each role's column, before scaling.
fn column(role: NodeRole) -> f64 {
    match role {
        NodeRole::Plant => 0.0,
        NodeRole::Dc => 0.25,
        NodeRole::Warehouse => 0.5,
        NodeRole::Client => 0.75,
    }
}

/// Options for the generated diagram
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Inches per layout unit
    pub scale: f64,
    pub open_color: String,
    pub closed_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 10.0,
            open_color: "#85C1E9".to_string(),
            closed_color: "gray".to_string(),
        }
    }
}

/// Position of every node: one column per role, members in id order from the top.
pub fn column_layout(solution: &Solution) -> BTreeMap<NodeId, (f64, f64)> {
    let mut positions = BTreeMap::new();
    for role in NodeRole::ALL {
        let members: Vec<&NodeId> = solution
            .nodes()
            .iter()
            .filter(|(_, n)| n.role == role)
            .map(|(id, _)| id)
            .collect();
        let n = members.len() as f64;
        for (i, id) in members.into_iter().enumerate() {
            let y = (i as f64 + 1.0 - n) / n + (1.0 - 1.0 / n) * 0.5;
            // dot's y axis points up
            positions.insert(id.clone(), (column(role), -y));
        }
    }
    positions
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Dot source for `solution`.
pub fn to_graphviz(solution: &Solution, config: &RenderConfig) -> String {
    let positions = column_layout(solution);
    let mut out = String::new();

    out.push_str("digraph {\n\tsplines = true;\n\tnode [shape=circle, style=filled];\n\n");

    for (id, node) in solution.nodes() {
        let (x, y) = positions[id];
        let pos = format!("{:.3},{:.3}!", x * config.scale, y * config.scale);
        let name = escape(id.as_str());
        if solution.is_open(id) {
            out.push_str(&format!(
                "\t\"{name}\" [pos=\"{pos}\", color=\"{color}\", width=0.6, fontcolor=red, fontsize=7, label=\"{name}\\n{role} ({capacity})\"];\n",
                color = config.open_color,
                role = node.role,
                capacity = node.capacity,
            ));
        } else {
            out.push_str(&format!(
                "\t\"{name}\" [pos=\"{pos}\", color=\"{color}\", width=0.3, label=\"\", fillcolor=\"{color}80\"];\n",
                color = config.closed_color,
            ));
        }
    }
    out.push('\n');

    for (conn, flow) in solution.connection_flows() {
        let from = escape(conn.from_node.as_str());
        let to = escape(conn.to_node.as_str());
        if flow > 0 {
            out.push_str(&format!(
                "\t\"{from}\" -> \"{to}\" [color=black, label=\"{flow}\"];\n"
            ));
        } else {
            out.push_str(&format!(
                "\t\"{from}\" -> \"{to}\" [style=dashed, color=\"{color}\"];\n",
                color = config.closed_color,
            ));
        }
    }

    out.push_str("}\n");
    out
}

/// Writes the dot source of `solution` to a `.dot` or `.gv` file.
pub fn write_graph(solution: &Solution, path: impl AsRef<Path>, config: &RenderConfig) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if extension != "dot" && extension != "gv" {
        return Err(ConfigurationError::UnsupportedFormat(extension).into());
    }
    fs::write(path, to_graphviz(solution, config)).map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolutionStatus;
    use crate::network::{Connection, Node};
    use approx::assert_relative_eq;

    fn solution() -> Solution {
        let nodes = BTreeMap::from([
            (NodeId::from("p1"), Node::plant(10, 0.0)),
            (NodeId::from("p2"), Node::plant(10, 0.0)),
            (NodeId::from("w"), Node::warehouse(10, 0.0)),
            (NodeId::from("c"), Node::client(5)),
        ]);
        let connections = vec![
            Connection::new("p1", "c", 10, 1.0),
            Connection::new("p2", "w", 10, 1.0),
            Connection::new("w", "c", 10, 1.0),
        ];
        let open = BTreeMap::from([
            (NodeId::from("p1"), true),
            (NodeId::from("p2"), false),
            (NodeId::from("w"), false),
            (NodeId::from("c"), true),
        ]);
        Solution::new(
            nodes,
            connections,
            open,
            vec![5, 0, 0],
            5.0,
            SolutionStatus::Optimal,
        )
        .unwrap()
    }

    #[test]
    fn test_columns_follow_roles() {
        let layout = column_layout(&solution());
        let (x1, y1) = layout[&NodeId::from("p1")];
        let (x2, y2) = layout[&NodeId::from("p2")];
        assert_relative_eq!(x1, 0.0);
        assert_relative_eq!(x2, 0.0);
        assert_relative_eq!(y1, 0.25);
        assert_relative_eq!(y2, -0.25);
        assert_relative_eq!(layout[&NodeId::from("w")].0, 0.5);
        assert_relative_eq!(layout[&NodeId::from("c")].0, 0.75);
        assert_relative_eq!(layout[&NodeId::from("c")].1, 0.0);
    }

    #[test]
    fn test_open_and_used_elements_are_labeled() {
        let dot = to_graphviz(&solution(), &RenderConfig::default());
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("label=\"p1\\nPLANT (10)\""));
        assert!(dot.contains("\"p2\" [pos=\"0.000,-2.500!\""));
        assert!(dot.contains("\"p1\" -> \"c\" [color=black, label=\"5\"]"));
        assert!(dot.contains("\"p2\" -> \"w\" [style=dashed"));
    }

    #[test]
    fn test_only_dot_files_are_written() {
        let err = write_graph(&solution(), "graph.png", &RenderConfig::default()).unwrap_err();
        assert!(err.is_configuration());
    }
}
