// Persistence: network definitions and solution reports in YAML or JSON
// The format is chosen from the file suffix; unknown suffixes are configuration errors

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

use crate::application::mappers::{report_to_solution, solution_to_report, SolutionReport};
use crate::error::{ConfigurationError, NetworkError, Result};
use crate::network::{Network, Solution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Yaml,
    Json,
}

impl DataFormat {
    /// Format for `path`, from its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> std::result::Result<Self, ConfigurationError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Ok(DataFormat::Yaml),
            "json" => Ok(DataFormat::Json),
            _ => Err(ConfigurationError::UnsupportedFormat(extension)),
        }
    }

    pub fn encode<T: Serialize>(self, data: &T) -> std::result::Result<String, String> {
        match self {
            DataFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
            DataFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        }
    }

    pub fn decode<T: DeserializeOwned>(self, text: &str) -> std::result::Result<T, String> {
        match self {
            DataFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            DataFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> NetworkError {
    NetworkError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed(path: &Path, message: String) -> NetworkError {
    ConfigurationError::Malformed {
        path: path.to_path_buf(),
        message,
    }
    .into()
}

pub fn import_data<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DataFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    format.decode(&text).map_err(|m| malformed(path, m))
}

pub fn export_data<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let format = DataFormat::from_path(path)?;
    let text = format.encode(data).map_err(|m| malformed(path, m))?;
    fs::write(path, text).map_err(|e| io_error(path, e))
}

impl Network {
    /// Reads and validates a network definition.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let network: Network = import_data(path)?;
        network.validate()?;
        log::debug!(
            "Loaded {} nodes and {} connections from {}",
            network.nodes().len(),
            network.connections().len(),
            path.display()
        );
        Ok(network)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        export_data(path.as_ref(), self)
    }
}

impl Solution {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let report: SolutionReport = import_data(path.as_ref())?;
        Ok(report_to_solution(report)?)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        export_data(path.as_ref(), &solution_to_report(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Connection, Node, NodeId, NodeRole};
    use std::path::PathBuf;

    const DEFINITION: &str = r#"
nodes:
  plant:
    type: PLANT
    capacity: 100
    cost: 25
  1:
    type: CLIENT
    capacity: 40
connections:
  - from_node: plant
    to_node: 1
    capacity: 60
    cost: 2
"#;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lognet-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_format_from_suffix() {
        assert_eq!(DataFormat::from_path(Path::new("a.yml")), Ok(DataFormat::Yaml));
        assert_eq!(DataFormat::from_path(Path::new("a.YAML")), Ok(DataFormat::Yaml));
        assert_eq!(DataFormat::from_path(Path::new("dir/a.json")), Ok(DataFormat::Json));
        assert_eq!(
            DataFormat::from_path(Path::new("a.toml")),
            Err(ConfigurationError::UnsupportedFormat("toml".to_string()))
        );
        assert!(DataFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_yaml_definition_parses() {
        let network: Network = DataFormat::Yaml.decode(DEFINITION).unwrap();
        assert!(network.validate().is_ok());

        let client = network.node(&NodeId::from("1")).unwrap();
        assert_eq!(client.role, NodeRole::Client);
        assert_eq!(client.cost, 0.0);
        assert_eq!(network.node(&NodeId::from("plant")), Some(&Node::plant(100, 25.0)));
        assert_eq!(
            network.connections(),
            &[Connection::new("plant", "1", 60, 2.0)]
        );
    }

    #[test]
    fn test_network_file_round_trip_in_both_formats() {
        let network: Network = DataFormat::Yaml.decode(DEFINITION).unwrap();
        for name in ["network.yaml", "network.json"] {
            let path = temp_path(name);
            network.to_file(&path).unwrap();
            let restored = Network::from_file(&path).unwrap();
            fs::remove_file(&path).ok();
            assert_eq!(restored, network);
        }
    }

    #[test]
    fn test_unsupported_suffix_is_a_configuration_error() {
        let network = Network::default();
        let err = network.to_file(temp_path("network.csv")).unwrap_err();
        assert!(err.is_configuration());
        assert!(Network::from_file("network.xml").unwrap_err().is_configuration());
    }

    #[test]
    fn test_malformed_definition_is_reported_with_path() {
        let path = temp_path("broken.json");
        fs::write(&path, r#"{"nodes": {"p": {"type": "PLANT", "capacity": -5}}}"#).unwrap();
        let err = Network::from_file(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(
            err,
            NetworkError::Configuration(ConfigurationError::Malformed { .. })
        ));
    }

    #[test]
    fn test_repeated_node_id_is_malformed() {
        let path = temp_path("twice.yaml");
        let definition = "nodes:\n  7:\n    type: PLANT\n    capacity: 50\n  '7':\n    type: CLIENT\n    capacity: 10\n";
        fs::write(&path, definition).unwrap();
        let err = Network::from_file(&path).unwrap_err();
        fs::remove_file(&path).ok();
        match err {
            NetworkError::Configuration(ConfigurationError::Malformed { message, .. }) => {
                assert!(message.contains("duplicate node id '7'"), "{}", message)
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Network::from_file(temp_path("absent.yaml")).unwrap_err();
        assert!(matches!(err, NetworkError::Io { .. }));
    }
}
