use super::{IncompleteMetadata, Staged};
use crate::config::ExtractionConfig;
use crate::metadata::{
    MetanodeMetadata, NativeNodeMetadata, NodeMetadata, NodeProvenance, SubnodeMetadata, Workflow,
};
use crate::tree::ConfigTree;

/// Stable identity of a node implementation.
pub(crate) fn global_node_id(factory: &str, factory_settings: Option<&ConfigTree>) -> String {
    match factory_settings {
        Some(settings) => format!("{factory}#{}", settings.content_hash()),
        None => factory.to_string(),
    }
}

pub(crate) struct NativeNodeBuilder<'c> {
    config: &'c ExtractionConfig,
    pub(crate) id: Staged<String>,
    pub(crate) annotation: Staged<String>,
    pub(crate) name: Staged<String>,
    pub(crate) factory: Staged<String>,
    pub(crate) factory_settings: Staged<ConfigTree>,
    pub(crate) provenance: Staged<NodeProvenance>,
    pub(crate) custom_description: Staged<String>,
    pub(crate) model_parameters: Staged<ConfigTree>,
}

impl<'c> NativeNodeBuilder<'c> {
    const ENTITY: &'static str = "native node";

    pub(crate) fn new(config: &'c ExtractionConfig) -> Self {
        NativeNodeBuilder {
            config,
            id: Staged::Unset,
            annotation: Staged::Unset,
            name: Staged::Unset,
            factory: Staged::Unset,
            factory_settings: Staged::Unset,
            provenance: Staged::Unset,
            custom_description: Staged::Unset,
            model_parameters: Staged::Unset,
        }
    }

    pub(crate) fn build(self) -> Result<NodeMetadata, IncompleteMetadata> {
        let e = Self::ENTITY;
        let factory = self.factory.require(e, "factory")?;
        let factory_settings = self.factory_settings.optional(e, "factory_settings")?;
        Ok(NodeMetadata::Native(NativeNodeMetadata {
            id: self.id.require(e, "id")?,
            annotation: self.annotation.optional(e, "annotation")?,
            name: self.name.optional(e, "name")?,
            global_node_id: global_node_id(&factory, factory_settings.as_ref()),
            factory,
            provenance: self.provenance.require(e, "provenance")?,
            custom_description: self.custom_description.optional(e, "custom_description")?,
            model_parameters: self.model_parameters.materialize(
                self.config.read_node_configuration(),
                e,
                "model_parameters",
            )?,
        }))
    }
}

#[derive(Default)]
pub(crate) struct MetanodeBuilder {
    pub(crate) id: Staged<String>,
    pub(crate) annotation: Staged<String>,
    pub(crate) template_link: Staged<String>,
    pub(crate) workflow: Staged<Workflow>,
}

impl MetanodeBuilder {
    const ENTITY: &'static str = "metanode";

    pub(crate) fn build(self) -> Result<NodeMetadata, IncompleteMetadata> {
        let e = Self::ENTITY;
        Ok(NodeMetadata::Metanode(MetanodeMetadata {
            id: self.id.require(e, "id")?,
            annotation: self.annotation.optional(e, "annotation")?,
            template_link: self.template_link.optional(e, "template_link")?,
            workflow: self.workflow.require(e, "workflow")?,
        }))
    }
}

pub(crate) struct SubnodeBuilder<'c> {
    config: &'c ExtractionConfig,
    pub(crate) id: Staged<String>,
    pub(crate) annotation: Staged<String>,
    pub(crate) template_link: Staged<String>,
    pub(crate) custom_description: Staged<String>,
    pub(crate) model_parameters: Staged<ConfigTree>,
    pub(crate) workflow: Staged<Workflow>,
}

impl<'c> SubnodeBuilder<'c> {
    const ENTITY: &'static str = "component";

    pub(crate) fn new(config: &'c ExtractionConfig) -> Self {
        SubnodeBuilder {
            config,
            id: Staged::Unset,
            annotation: Staged::Unset,
            template_link: Staged::Unset,
            custom_description: Staged::Unset,
            model_parameters: Staged::Unset,
            workflow: Staged::Unset,
        }
    }

    pub(crate) fn build(self) -> Result<NodeMetadata, IncompleteMetadata> {
        let e = Self::ENTITY;
        Ok(NodeMetadata::Subnode(SubnodeMetadata {
            id: self.id.require(e, "id")?,
            annotation: self.annotation.optional(e, "annotation")?,
            template_link: self.template_link.optional(e, "template_link")?,
            custom_description: self.custom_description.optional(e, "custom_description")?,
            model_parameters: self.model_parameters.materialize(
                self.config.read_node_configuration(),
                e,
                "model_parameters",
            )?,
            workflow: self.workflow.require(e, "workflow")?,
        }))
    }
}
