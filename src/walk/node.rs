//! Per-node dispatch.

use std::path::Path;

use super::Walker;
use crate::builder::{MetanodeBuilder, NativeNodeBuilder, SubnodeBuilder};
use crate::error::{ParseResultExt, Result};
use crate::metadata::{NodeMetadata, NodeType, Workflow};
use crate::parse::{NODE_SETTINGS_FILE, WORKFLOW_FILE};
use crate::tree::{ConfigTree, load_tree};

impl Walker<'_> {
    /// Builds the node declared by `entry` in the descriptor at
    /// `descriptor_path`. Nested levels come back with their ids already
    /// qualified by this node's local id.
    pub(super) fn node(
        &self,
        dir: &Path,
        entry: &ConfigTree,
        descriptor_path: &Path,
    ) -> Result<NodeMetadata> {
        let p = self.parser;
        let local_id = p.node_id(entry).in_file(descriptor_path)?.to_string();
        let node_type = p.node_type(entry).in_file(descriptor_path)?;
        let settings_path = self.settings_path(dir, entry, descriptor_path)?;
        let node_dir = settings_path.parent().unwrap_or(dir);
        tracing::debug!("Reading {node_type} {local_id} from '{}'", settings_path.display());

        match node_type {
            NodeType::NativeNode => self.native_node(local_id, &settings_path),
            NodeType::MetaNode => self.metanode(local_id, entry, descriptor_path, node_dir),
            NodeType::SubNode => self.subnode(local_id, node_dir),
        }
    }

    fn native_node(&self, local_id: String, settings_path: &Path) -> Result<NodeMetadata> {
        let p = self.parser;
        let settings = load_tree(settings_path)?;
        let file = settings_path;

        let mut builder = NativeNodeBuilder::new(self.config);
        builder.id.set(local_id);
        builder
            .annotation
            .set_option(p.node_annotation(&settings).in_file(file)?);
        builder.name.set_option(p.node_name(&settings).in_file(file)?);
        builder.factory.set(p.factory_class(&settings).in_file(file)?);
        builder
            .factory_settings
            .set_option(p.factory_settings(&settings).in_file(file)?);
        builder.provenance.set(p.provenance(&settings).in_file(file)?);
        builder
            .custom_description
            .set_option(p.custom_node_description(&settings).in_file(file)?);
        if self.config.read_node_configuration() {
            builder
                .model_parameters
                .set_option(p.model_parameters(&settings).in_file(file)?);
        }
        Ok(builder.build()?)
    }

    fn metanode(
        &self,
        local_id: String,
        entry: &ConfigTree,
        descriptor_path: &Path,
        node_dir: &Path,
    ) -> Result<NodeMetadata> {
        let (workflow, template_link) = self.nested_workflow(&local_id, node_dir)?;

        let mut builder = MetanodeBuilder::default();
        builder.annotation.set_option(
            self.parser
                .metanode_annotation(entry)
                .in_file(descriptor_path)?,
        );
        builder.id.set(local_id);
        builder.template_link.set_option(template_link);
        builder.workflow.set(workflow);
        Ok(builder.build()?)
    }

    fn subnode(&self, local_id: String, node_dir: &Path) -> Result<NodeMetadata> {
        let p = self.parser;
        let settings_path = node_dir.join(NODE_SETTINGS_FILE);
        let settings = load_tree(&settings_path)?;
        let file = settings_path.as_path();
        let (workflow, template_link) = self.nested_workflow(&local_id, node_dir)?;

        let mut builder = SubnodeBuilder::new(self.config);
        builder.id.set(local_id);
        builder
            .annotation
            .set_option(p.node_annotation(&settings).in_file(file)?);
        builder
            .custom_description
            .set_option(p.custom_node_description(&settings).in_file(file)?);
        if self.config.read_node_configuration() {
            builder
                .model_parameters
                .set_option(p.model_parameters(&settings).in_file(file)?);
        }
        builder.template_link.set_option(template_link);
        builder.workflow.set(workflow);
        Ok(builder.build()?)
    }

    /// Recurses into a metanode or component directory and qualifies every
    /// node id it reports with `local_id`.
    fn nested_workflow(&self, local_id: &str, node_dir: &Path) -> Result<(Workflow, Option<String>)> {
        let descriptor_path = node_dir.join(WORKFLOW_FILE);
        let descriptor = load_tree(&descriptor_path)?;
        let mut workflow = self.workflow_level(node_dir, &descriptor, &descriptor_path)?;
        workflow.prefix_node_ids(local_id);
        Ok((workflow, self.parser.template_link(&descriptor)))
    }
}
