//! Extraction configuration: which optional fields get materialized.
//!
//! Every toggle gates both the field and the I/O needed to produce it; a
//! disabled capability is never computed.

use serde::Deserialize;

use crate::error::{Result, WorkflowalizerError};

/// Immutable set of extraction capabilities. Build with [`ExtractionConfig::builder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionConfig {
    nodes: bool,
    connections: bool,
    unexpected_files: bool,
    node_configuration: bool,
    workflow_set_meta: bool,
    workflow_configuration: bool,
    openapi: bool,
}

impl ExtractionConfig {
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder::default()
    }

    /// Reads nothing optional.
    pub fn none() -> Self {
        ExtractionConfig::default()
    }

    /// Reads everything.
    pub fn all() -> Self {
        ExtractionConfig {
            nodes: true,
            connections: true,
            unexpected_files: true,
            node_configuration: true,
            workflow_set_meta: true,
            workflow_configuration: true,
            openapi: true,
        }
    }

    /// Parses a TOML document such as
    ///
    /// ```toml
    /// nodes = true
    /// connections = true
    /// ```
    ///
    /// `all = true` switches every capability on.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ExtractionConfigFile = toml::from_str(text)
            .map_err(|e| WorkflowalizerError::InvalidConfiguration(e.to_string()))?;
        file.into_builder().build()
    }

    pub fn read_nodes(&self) -> bool {
        self.nodes
    }

    pub fn read_connections(&self) -> bool {
        self.connections
    }

    pub fn read_unexpected_files(&self) -> bool {
        self.unexpected_files
    }

    /// Model parameters of native nodes and components.
    pub fn read_node_configuration(&self) -> bool {
        self.node_configuration
    }

    pub fn read_workflow_set_meta(&self) -> bool {
        self.workflow_set_meta
    }

    pub fn read_workflow_configuration(&self) -> bool {
        self.workflow_configuration
    }

    /// OpenAPI and hub-event contract artifacts.
    pub fn read_openapi(&self) -> bool {
        self.openapi
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn read_nodes(mut self) -> Self {
        self.config.nodes = true;
        self
    }

    pub fn read_connections(mut self) -> Self {
        self.config.connections = true;
        self
    }

    pub fn read_unexpected_files(mut self) -> Self {
        self.config.unexpected_files = true;
        self
    }

    /// Also turns on node reading.
    pub fn read_node_configuration(mut self) -> Self {
        self.config.nodes = true;
        self.config.node_configuration = true;
        self
    }

    pub fn read_workflow_set_meta(mut self) -> Self {
        self.config.workflow_set_meta = true;
        self
    }

    pub fn read_workflow_configuration(mut self) -> Self {
        self.config.workflow_configuration = true;
        self
    }

    pub fn read_openapi(mut self) -> Self {
        self.config.openapi = true;
        self
    }

    /// Validates capability dependencies and freezes the configuration.
    pub fn build(self) -> Result<ExtractionConfig> {
        let config = self.config;
        if config.connections && !config.nodes {
            return Err(WorkflowalizerError::InvalidConfiguration(
                "reading connections requires reading nodes".into(),
            ));
        }
        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
struct ExtractionConfigFile {
    all: bool,
    nodes: bool,
    connections: bool,
    unexpected_files: bool,
    node_configuration: bool,
    workflow_set_meta: bool,
    workflow_configuration: bool,
    openapi: bool,
}

impl ExtractionConfigFile {
    fn into_builder(self) -> ExtractionConfigBuilder {
        if self.all {
            return ExtractionConfigBuilder {
                config: ExtractionConfig::all(),
            };
        }
        ExtractionConfigBuilder {
            config: ExtractionConfig {
                nodes: self.nodes || self.node_configuration,
                connections: self.connections,
                unexpected_files: self.unexpected_files,
                node_configuration: self.node_configuration,
                workflow_set_meta: self.workflow_set_meta,
                workflow_configuration: self.workflow_configuration,
                openapi: self.openapi,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let none = ExtractionConfig::none();
        assert!(!none.read_nodes() && !none.read_connections() && !none.read_openapi());
        let all = ExtractionConfig::all();
        assert!(all.read_nodes() && all.read_connections() && all.read_unexpected_files());
        assert!(all.read_node_configuration() && all.read_workflow_set_meta());
        assert!(all.read_workflow_configuration() && all.read_openapi());
    }

    #[test]
    fn connections_require_nodes() {
        let err = ExtractionConfig::builder().read_connections().build().unwrap_err();
        assert_eq!(err.code(), "W001");

        let config = ExtractionConfig::builder()
            .read_nodes()
            .read_connections()
            .build()
            .unwrap();
        assert!(config.read_connections());
    }

    #[test]
    fn node_configuration_implies_nodes() {
        let config = ExtractionConfig::builder()
            .read_node_configuration()
            .build()
            .unwrap();
        assert!(config.read_nodes());
        assert!(config.read_node_configuration());

        let config = ExtractionConfig::from_toml_str("node_configuration = true").unwrap();
        assert!(config.read_nodes());
    }

    #[test]
    fn loads_from_toml() {
        let config = ExtractionConfig::from_toml_str("nodes = true\nunexpected_files = true\n").unwrap();
        assert!(config.read_nodes());
        assert!(config.read_unexpected_files());
        assert!(!config.read_connections());

        assert_eq!(ExtractionConfig::from_toml_str("all = true").unwrap(), ExtractionConfig::all());
    }

    #[test]
    fn toml_is_validated() {
        assert!(ExtractionConfig::from_toml_str("connections = true").is_err());
        assert!(ExtractionConfig::from_toml_str("nodez = true").is_err());
    }
}
