use super::{IncompleteMetadata, Staged};
use crate::config::ExtractionConfig;
use crate::metadata::{
    AuthorInformation, Connection, NodeMetadata, OpenApiArtifacts, SvgDimensions, Workflow,
    WorkflowConfigurationArtifacts, WorkflowMetadata, WorkflowSetMeta,
};
use crate::version::FormatVersion;

/// Stages one workflow level.
pub(crate) struct WorkflowBuilder<'c> {
    config: &'c ExtractionConfig,
    pub(crate) version: Staged<String>,
    pub(crate) created_by: Staged<String>,
    pub(crate) name: Staged<String>,
    pub(crate) description: Staged<String>,
    pub(crate) annotations: Staged<Vec<String>>,
    pub(crate) nodes: Staged<Vec<NodeMetadata>>,
    pub(crate) connections: Staged<Vec<Connection>>,
    pub(crate) unexpected_files: Staged<Vec<String>>,
}

impl<'c> WorkflowBuilder<'c> {
    const ENTITY: &'static str = "workflow";

    pub(crate) fn new(config: &'c ExtractionConfig) -> Self {
        WorkflowBuilder {
            config,
            version: Staged::Unset,
            created_by: Staged::Unset,
            name: Staged::Unset,
            description: Staged::Unset,
            annotations: Staged::Unset,
            nodes: Staged::Unset,
            connections: Staged::Unset,
            unexpected_files: Staged::Unset,
        }
    }

    pub(crate) fn build(self) -> Result<Workflow, IncompleteMetadata> {
        let e = Self::ENTITY;
        let config = self.config;
        Ok(Workflow {
            version: self.version.require(e, "version")?,
            created_by: self.created_by.optional(e, "created_by")?,
            name: self.name.optional(e, "name")?,
            description: self.description.optional(e, "description")?,
            annotations: self.annotations.optional(e, "annotations")?.unwrap_or_default(),
            nodes: self.nodes.materialize_value(config.read_nodes(), e, "nodes")?,
            connections: self
                .connections
                .materialize_value(config.read_connections(), e, "connections")?,
            unexpected_files: self.unexpected_files.materialize_value(
                config.read_unexpected_files(),
                e,
                "unexpected_files",
            )?,
        })
    }
}

/// Stages the facets that only exist on a top-level item.
pub(crate) struct WorkflowMetadataBuilder<'c> {
    config: &'c ExtractionConfig,
    pub(crate) format_version: Staged<FormatVersion>,
    pub(crate) workflow: Staged<Workflow>,
    pub(crate) author_information: Staged<AuthorInformation>,
    pub(crate) svg: Staged<SvgDimensions>,
    pub(crate) artifacts: Staged<Vec<String>>,
    pub(crate) credentials: Staged<Vec<String>>,
    pub(crate) variables: Staged<Vec<String>>,
    pub(crate) workflow_set_meta: Staged<WorkflowSetMeta>,
    pub(crate) workflow_configuration: Staged<WorkflowConfigurationArtifacts>,
    pub(crate) openapi: Staged<OpenApiArtifacts>,
}

impl<'c> WorkflowMetadataBuilder<'c> {
    const ENTITY: &'static str = "workflow metadata";

    pub(crate) fn new(config: &'c ExtractionConfig) -> Self {
        WorkflowMetadataBuilder {
            config,
            format_version: Staged::Unset,
            workflow: Staged::Unset,
            author_information: Staged::Unset,
            svg: Staged::Unset,
            artifacts: Staged::Unset,
            credentials: Staged::Unset,
            variables: Staged::Unset,
            workflow_set_meta: Staged::Unset,
            workflow_configuration: Staged::Unset,
            openapi: Staged::Unset,
        }
    }

    pub(crate) fn build(self) -> Result<WorkflowMetadata, IncompleteMetadata> {
        let e = Self::ENTITY;
        let config = self.config;
        Ok(WorkflowMetadata {
            format_version: self.format_version.require(e, "format_version")?,
            workflow: self.workflow.require(e, "workflow")?,
            author_information: self.author_information.require(e, "author_information")?,
            svg: self.svg.optional(e, "svg")?,
            artifacts: self.artifacts.optional(e, "artifacts")?.unwrap_or_default(),
            credentials: self.credentials.optional(e, "credentials")?.unwrap_or_default(),
            variables: self.variables.optional(e, "variables")?.unwrap_or_default(),
            workflow_set_meta: self.workflow_set_meta.materialize(
                config.read_workflow_set_meta(),
                e,
                "workflow_set_meta",
            )?,
            workflow_configuration: self.workflow_configuration.materialize_value(
                config.read_workflow_configuration(),
                e,
                "workflow_configuration",
            )?,
            openapi: self
                .openapi
                .materialize_value(config.read_openapi(), e, "openapi")?,
        })
    }
}
