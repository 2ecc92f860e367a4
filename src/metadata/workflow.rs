//! Immutable workflow metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::connection::Connection;
use super::materialized::{FieldNotRead, Materialized};
use super::node::NodeMetadata;
use crate::version::FormatVersion;

/// Author reported when a workflow carries no author information.
pub const UNKNOWN_AUTHOR: &str = "<unknown>";

/// One workflow level: the top-level item or the content of a metanode or component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub(crate) version: String,
    pub(crate) created_by: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) annotations: Vec<String>,
    #[serde(skip_serializing_if = "Materialized::is_not_materialized")]
    pub(crate) nodes: Materialized<Vec<NodeMetadata>>,
    #[serde(skip_serializing_if = "Materialized::is_not_materialized")]
    pub(crate) connections: Materialized<Vec<Connection>>,
    #[serde(skip_serializing_if = "Materialized::is_not_materialized")]
    pub(crate) unexpected_files: Materialized<Vec<String>>,
}

impl Workflow {
    /// Raw version string of this level's descriptor.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Workflow annotation texts in declaration order.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Direct children of this level, in declaration order.
    pub fn nodes(&self) -> Result<&[NodeMetadata], FieldNotRead> {
        self.nodes.get("nodes").map(Vec::as_slice)
    }

    pub fn connections(&self) -> Result<&[Connection], FieldNotRead> {
        self.connections.get("connections").map(Vec::as_slice)
    }

    /// Files inside this level's directory that nothing declares.
    pub fn unexpected_files(&self) -> Result<&[String], FieldNotRead> {
        self.unexpected_files
            .get("unexpected_files")
            .map(Vec::as_slice)
    }

    /// Finds a direct child by fully-qualified id.
    pub fn node(&self, id: &str) -> Result<Option<&NodeMetadata>, FieldNotRead> {
        Ok(self.nodes()?.iter().find(|n| n.id() == id))
    }

    /// Resolved source node of a connection on this level.
    pub fn source_of(&self, connection: &Connection) -> Option<&NodeMetadata> {
        let nodes = self.nodes().ok()?;
        connection.source_node.and_then(|i| nodes.get(i))
    }

    /// Resolved destination node of a connection on this level.
    pub fn destination_of(&self, connection: &Connection) -> Option<&NodeMetadata> {
        let nodes = self.nodes().ok()?;
        connection.dest_node.and_then(|i| nodes.get(i))
    }

    /// Number of nodes on this level and every level below it.
    pub fn count_nodes_recursive(&self) -> usize {
        match &self.nodes {
            Materialized::Value(nodes) => nodes
                .iter()
                .map(|n| 1 + n.workflow().map_or(0, Workflow::count_nodes_recursive))
                .sum(),
            Materialized::NotMaterialized => 0,
        }
    }

    pub(crate) fn prefix_node_ids(&mut self, prefix: &str) {
        if let Some(nodes) = self.nodes.as_mut() {
            for node in nodes {
                node.prefix_id(prefix);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInformation {
    pub author: String,
    pub authored_when: DateTime<Utc>,
    pub last_edited_by: Option<String>,
    pub last_edited_when: Option<DateTime<Utc>>,
}

impl Default for AuthorInformation {
    /// The values reported for items written before author information existed.
    fn default() -> Self {
        AuthorInformation {
            author: UNKNOWN_AUTHOR.to_string(),
            authored_when: DateTime::<Utc>::default(),
            last_edited_by: None,
            last_edited_when: None,
        }
    }
}

/// Size of the rendered workflow diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SvgDimensions {
    pub width: u32,
    pub height: u32,
}

/// Free-text metadata from the workflow-set side file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WorkflowSetMeta {
    pub author: Option<String>,
    pub comments: Option<String>,
}

/// Generated workflow-configuration contract files.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfigurationArtifacts {
    pub configuration: Option<serde_json::Value>,
    pub representation: Option<serde_json::Value>,
}

/// Generated OpenAPI and hub-event contract files.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiArtifacts {
    pub input_parameters: Option<serde_json::Value>,
    pub input_resources: Option<serde_json::Value>,
    pub output_parameters: Option<serde_json::Value>,
    pub output_resources: Option<serde_json::Value>,
    pub hub_event_input_parameters: Option<serde_json::Value>,
}

/// Metadata of a top-level workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub(crate) format_version: FormatVersion,
    #[serde(flatten)]
    pub(crate) workflow: Workflow,
    pub(crate) author_information: AuthorInformation,
    pub(crate) svg: Option<SvgDimensions>,
    pub(crate) artifacts: Vec<String>,
    pub(crate) credentials: Vec<String>,
    pub(crate) variables: Vec<String>,
    #[serde(skip_serializing_if = "Materialized::is_not_materialized")]
    pub(crate) workflow_set_meta: Materialized<Option<WorkflowSetMeta>>,
    #[serde(skip_serializing_if = "Materialized::is_not_materialized")]
    pub(crate) workflow_configuration: Materialized<WorkflowConfigurationArtifacts>,
    #[serde(skip_serializing_if = "Materialized::is_not_materialized")]
    pub(crate) openapi: Materialized<OpenApiArtifacts>,
}

impl WorkflowMetadata {
    pub fn format_version(&self) -> FormatVersion {
        self.format_version
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn author_information(&self) -> &AuthorInformation {
        &self.author_information
    }

    pub fn svg(&self) -> Option<SvgDimensions> {
        self.svg
    }

    /// Files below the artifacts directory, relative to it.
    pub fn artifacts(&self) -> &[String] {
        &self.artifacts
    }

    pub fn credentials(&self) -> &[String] {
        &self.credentials
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn workflow_set_meta(&self) -> Result<Option<&WorkflowSetMeta>, FieldNotRead> {
        self.workflow_set_meta
            .get("workflow_set_meta")
            .map(Option::as_ref)
    }

    pub fn workflow_configuration(&self) -> Result<&WorkflowConfigurationArtifacts, FieldNotRead> {
        self.workflow_configuration.get("workflow_configuration")
    }

    pub fn openapi(&self) -> Result<&OpenApiArtifacts, FieldNotRead> {
        self.openapi.get("openapi")
    }

    // Shorthands for the common workflow fields.

    pub fn version(&self) -> &str {
        self.workflow.version()
    }

    pub fn name(&self) -> Option<&str> {
        self.workflow.name()
    }

    pub fn nodes(&self) -> Result<&[NodeMetadata], FieldNotRead> {
        self.workflow.nodes()
    }

    pub fn connections(&self) -> Result<&[Connection], FieldNotRead> {
        self.workflow.connections()
    }

    pub fn unexpected_files(&self) -> Result<&[String], FieldNotRead> {
        self.workflow.unexpected_files()
    }
}
