//! Immutable extraction results.

pub mod connection;
pub mod graph;
pub mod materialized;
pub mod node;
pub mod template;
pub mod workflow;

pub use connection::{BOUNDARY_ID, Connection};
pub use graph::{NodeGraph, PortLabel};
pub use materialized::{FieldNotRead, Materialized};
pub use node::{
    ID_SEPARATOR, MetanodeMetadata, NativeNodeMetadata, NodeMetadata, NodeProvenance, NodeType,
    SubnodeMetadata,
};
pub use template::{
    ComponentMetadata, DialogField, DialogSection, PortDescriptor, TemplateInformation,
    TemplateMetadata, TemplateType,
};
pub use workflow::{
    AuthorInformation, OpenApiArtifacts, SvgDimensions, UNKNOWN_AUTHOR, Workflow,
    WorkflowConfigurationArtifacts, WorkflowMetadata, WorkflowSetMeta,
};
