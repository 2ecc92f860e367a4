//! Immutable template and component metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::materialized::FieldNotRead;
use super::workflow::WorkflowMetadata;
use super::{Connection, NodeMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateType {
    #[serde(rename = "MetaNode")]
    Metanode,
    #[serde(rename = "SubNode")]
    Component,
}

impl TemplateType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "MetaNode" => Some(TemplateType::Metanode),
            "SubNode" => Some(TemplateType::Component),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInformation {
    pub role: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// Percent-decoded when decoding succeeds, raw otherwise.
    pub source_uri: Option<String>,
    pub template_type: TemplateType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDescriptor {
    pub index: i32,
    pub port_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DialogField {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DialogSection {
    pub header: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<DialogField>,
}

/// The declared contract of a component template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub description: Option<String>,
    pub view_nodes: Vec<String>,
    pub in_ports: Vec<PortDescriptor>,
    pub out_ports: Vec<PortDescriptor>,
    pub dialog: Vec<DialogSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    #[serde(flatten)]
    pub(crate) workflow: WorkflowMetadata,
    pub(crate) template_information: TemplateInformation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) component: Option<ComponentMetadata>,
}

impl TemplateMetadata {
    pub fn workflow_metadata(&self) -> &WorkflowMetadata {
        &self.workflow
    }

    pub fn template_information(&self) -> &TemplateInformation {
        &self.template_information
    }

    pub fn template_type(&self) -> TemplateType {
        self.template_information.template_type
    }

    /// Present exactly for component templates.
    pub fn component(&self) -> Option<&ComponentMetadata> {
        self.component.as_ref()
    }

    pub fn nodes(&self) -> Result<&[NodeMetadata], FieldNotRead> {
        self.workflow.nodes()
    }

    pub fn connections(&self) -> Result<&[Connection], FieldNotRead> {
        self.workflow.connections()
    }
}
