//! Immutable node metadata.

use serde::Serialize;

use super::materialized::{FieldNotRead, Materialized};
use super::workflow::Workflow;
use crate::tree::ConfigTree;

/// Separator between the local ids of a fully-qualified node id.
pub const ID_SEPARATOR: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeType {
    NativeNode,
    MetaNode,
    SubNode,
}

impl NodeType {
    /// Maps the discriminator stored in a workflow descriptor.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NativeNode" => Some(NodeType::NativeNode),
            "MetaNode" => Some(NodeType::MetaNode),
            "SubNode" => Some(NodeType::SubNode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::NativeNode => "NativeNode",
            NodeType::MetaNode => "MetaNode",
            NodeType::SubNode => "SubNode",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bundle and feature a native node's implementation ships in. Every part is
/// independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProvenance {
    pub bundle_name: Option<String>,
    pub bundle_vendor: Option<String>,
    pub bundle_version: Option<String>,
    pub feature_name: Option<String>,
    pub feature_vendor: Option<String>,
    pub feature_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "nodeType")]
pub enum NodeMetadata {
    #[serde(rename = "NativeNode")]
    Native(NativeNodeMetadata),
    #[serde(rename = "MetaNode")]
    Metanode(MetanodeMetadata),
    #[serde(rename = "SubNode")]
    Subnode(SubnodeMetadata),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeNodeMetadata {
    pub(crate) id: String,
    pub(crate) annotation: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) factory: String,
    pub(crate) global_node_id: String,
    #[serde(flatten)]
    pub(crate) provenance: NodeProvenance,
    pub(crate) custom_description: Option<String>,
    #[serde(skip_serializing_if = "Materialized::is_not_materialized")]
    pub(crate) model_parameters: Materialized<Option<ConfigTree>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetanodeMetadata {
    pub(crate) id: String,
    pub(crate) annotation: Option<String>,
    pub(crate) template_link: Option<String>,
    pub(crate) workflow: Workflow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnodeMetadata {
    pub(crate) id: String,
    pub(crate) annotation: Option<String>,
    pub(crate) template_link: Option<String>,
    pub(crate) custom_description: Option<String>,
    #[serde(skip_serializing_if = "Materialized::is_not_materialized")]
    pub(crate) model_parameters: Materialized<Option<ConfigTree>>,
    pub(crate) workflow: Workflow,
}

impl NodeMetadata {
    /// Fully-qualified id, e.g. `"15:2"`.
    pub fn id(&self) -> &str {
        match self {
            NodeMetadata::Native(n) => &n.id,
            NodeMetadata::Metanode(n) => &n.id,
            NodeMetadata::Subnode(n) => &n.id,
        }
    }

    /// The last segment of [`NodeMetadata::id`].
    pub fn local_id(&self) -> &str {
        let id = self.id();
        id.rsplit(ID_SEPARATOR).next().unwrap_or(id)
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeMetadata::Native(_) => NodeType::NativeNode,
            NodeMetadata::Metanode(_) => NodeType::MetaNode,
            NodeMetadata::Subnode(_) => NodeType::SubNode,
        }
    }

    pub fn annotation(&self) -> Option<&str> {
        match self {
            NodeMetadata::Native(n) => n.annotation.as_deref(),
            NodeMetadata::Metanode(n) => n.annotation.as_deref(),
            NodeMetadata::Subnode(n) => n.annotation.as_deref(),
        }
    }

    /// The nested workflow of a metanode or component.
    pub fn workflow(&self) -> Option<&Workflow> {
        match self {
            NodeMetadata::Native(_) => None,
            NodeMetadata::Metanode(n) => Some(&n.workflow),
            NodeMetadata::Subnode(n) => Some(&n.workflow),
        }
    }

    pub(crate) fn workflow_mut(&mut self) -> Option<&mut Workflow> {
        match self {
            NodeMetadata::Native(_) => None,
            NodeMetadata::Metanode(n) => Some(&mut n.workflow),
            NodeMetadata::Subnode(n) => Some(&mut n.workflow),
        }
    }

    /// Factory class of a native node.
    pub fn factory(&self) -> Option<&str> {
        match self {
            NodeMetadata::Native(n) => Some(&n.factory),
            _ => None,
        }
    }

    pub fn as_native(&self) -> Option<&NativeNodeMetadata> {
        match self {
            NodeMetadata::Native(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_metanode(&self) -> Option<&MetanodeMetadata> {
        match self {
            NodeMetadata::Metanode(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_subnode(&self) -> Option<&SubnodeMetadata> {
        match self {
            NodeMetadata::Subnode(n) => Some(n),
            _ => None,
        }
    }

    /// Prepends `prefix` and the separator to this node's id and to the ids
    /// of every node nested below it.
    pub(crate) fn prefix_id(&mut self, prefix: &str) {
        let id = match self {
            NodeMetadata::Native(n) => &mut n.id,
            NodeMetadata::Metanode(n) => &mut n.id,
            NodeMetadata::Subnode(n) => &mut n.id,
        };
        *id = format!("{prefix}{ID_SEPARATOR}{id}");
        if let Some(workflow) = self.workflow_mut() {
            workflow.prefix_node_ids(prefix);
        }
    }
}

impl NativeNodeMetadata {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Display name of the node.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn factory(&self) -> &str {
        &self.factory
    }

    /// Stable identity of the node implementation: factory class plus a
    /// content hash of the factory settings.
    pub fn global_node_id(&self) -> &str {
        &self.global_node_id
    }

    pub fn provenance(&self) -> &NodeProvenance {
        &self.provenance
    }

    pub fn custom_description(&self) -> Option<&str> {
        self.custom_description.as_deref()
    }

    pub fn model_parameters(&self) -> Result<Option<&ConfigTree>, FieldNotRead> {
        self.model_parameters
            .get("model_parameters")
            .map(Option::as_ref)
    }
}

impl MetanodeMetadata {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Source URI of the template this metanode is linked to.
    pub fn template_link(&self) -> Option<&str> {
        self.template_link.as_deref()
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }
}

impl SubnodeMetadata {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    pub fn template_link(&self) -> Option<&str> {
        self.template_link.as_deref()
    }

    pub fn custom_description(&self) -> Option<&str> {
        self.custom_description.as_deref()
    }

    pub fn model_parameters(&self) -> Result<Option<&ConfigTree>, FieldNotRead> {
        self.model_parameters
            .get("model_parameters")
            .map(Option::as_ref)
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }
}
