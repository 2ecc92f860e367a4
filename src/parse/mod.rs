//! Parser strategies: one per format era.
//!
//! A strategy maps already-loaded settings trees onto semantic fields. It
//! never touches the filesystem; the walker loads files and hands the trees
//! over. Behavior shared by every era lives in default methods and in
//! [`common`]; an era overrides only what its file shape changes.

pub(crate) mod common;
mod legacy;
mod v3_6;
mod v4_1;
mod v5_1;

use std::collections::HashMap;

use thiserror::Error;

use crate::metadata::{
    AuthorInformation, Connection, DialogSection, NodeProvenance, NodeType, PortDescriptor,
    TemplateInformation,
};
use crate::tree::{ConfigTree, SettingsError};
use crate::version::Era;

pub use legacy::LegacyParser;
pub use v3_6::V3_6Parser;
pub use v4_1::V4_1Parser;
pub use v5_1::V5_1Parser;

/// Root descriptor of every workflow level.
pub const WORKFLOW_FILE: &str = "workflow.knime";
/// Root descriptor marking a template directory.
pub const TEMPLATE_FILE: &str = "template.knime";
/// Settings file of native nodes and components.
pub const NODE_SETTINGS_FILE: &str = "settings.xml";
pub const WORKFLOW_SET_META_FILE: &str = "workflowset.meta";
pub const ARTIFACTS_DIRECTORY: &str = ".artifacts";
pub const SVG_FILE: &str = "workflow.svg";
/// Metadata side file introduced with format 5.1.
pub const WORKFLOW_METADATA_FILE: &str = "workflow-metadata.xml";

const WELL_KNOWN_FILES: &[&str] = &[
    WORKFLOW_FILE,
    TEMPLATE_FILE,
    NODE_SETTINGS_FILE,
    WORKFLOW_SET_META_FILE,
    ARTIFACTS_DIRECTORY,
    SVG_FILE,
];

/// Failure of a strategy read, before a file path is attached.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("node '{node_id}' has unknown node type '{node_type}'")]
    UnknownNodeType { node_id: String, node_type: String },

    #[error("unknown template type '{0}'")]
    UnknownTemplateType(String),

    #[error("connection {source_id}:{source_port} -> {dest_id}:{dest_port} references unknown node '{missing}'")]
    UnresolvedConnection {
        source_id: i32,
        source_port: i32,
        dest_id: i32,
        dest_port: i32,
        missing: i32,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;

pub trait WorkflowParser: Send + Sync {
    fn era(&self) -> Era;

    // -----------------------------------------------------------------------
    // Workflow level
    // -----------------------------------------------------------------------

    fn version(&self, workflow: &ConfigTree) -> ParseResult<String> {
        Ok(workflow.get_string("version")?.to_string())
    }

    fn created_by(&self, workflow: &ConfigTree) -> ParseResult<Option<String>> {
        common::optional_string(workflow, "created_by")
    }

    fn name(&self, workflow: &ConfigTree) -> ParseResult<Option<String>> {
        common::optional_string(workflow, "name")
    }

    /// Side file holding the workflow description, if this era relocated it.
    fn description_file(&self) -> Option<&'static str> {
        None
    }

    /// `metadata_file` is the loaded [`WorkflowParser::description_file`],
    /// `None` when the era has none or the file does not exist.
    fn custom_description(
        &self,
        workflow: &ConfigTree,
        _metadata_file: Option<&ConfigTree>,
    ) -> ParseResult<Option<String>> {
        common::optional_string(workflow, "customDescription")
    }

    fn annotations(&self, workflow: &ConfigTree) -> ParseResult<Vec<String>> {
        common::child_texts(workflow, "annotations", "text")
    }

    fn author_information(&self, workflow: &ConfigTree) -> ParseResult<AuthorInformation>;

    /// Connections of one level. `nodes` maps the local id of every direct
    /// child onto its position in the node list.
    fn connections(
        &self,
        workflow: &ConfigTree,
        nodes: &HashMap<i32, usize>,
    ) -> ParseResult<Vec<Connection>> {
        common::connections(workflow, nodes)
    }

    fn node_entries<'t>(&self, workflow: &'t ConfigTree) -> ParseResult<Vec<&'t ConfigTree>> {
        common::node_entries(workflow)
    }

    fn svg_file(&self) -> Option<&'static str> {
        Some(SVG_FILE)
    }

    fn artifacts_directory(&self) -> &'static str {
        ARTIFACTS_DIRECTORY
    }

    fn credential_names(&self, workflow: &ConfigTree) -> ParseResult<Vec<String>> {
        common::names(workflow, "workflow_credentials")
    }

    fn variable_names(&self, workflow: &ConfigTree) -> ParseResult<Vec<String>> {
        common::names(workflow, "workflow_variables")
    }

    /// Sibling files and directories a workflow directory may always contain.
    fn well_known_files(&self) -> Vec<&'static str> {
        WELL_KNOWN_FILES.to_vec()
    }

    // -----------------------------------------------------------------------
    // Node entries in the parent descriptor
    // -----------------------------------------------------------------------

    fn node_id(&self, entry: &ConfigTree) -> ParseResult<i32> {
        Ok(entry.get_int("id")?)
    }

    fn node_type(&self, entry: &ConfigTree) -> ParseResult<NodeType>;

    fn node_settings_file(&self, entry: &ConfigTree) -> ParseResult<String> {
        common::node_settings_file(entry)
    }

    /// Metanodes keep their annotation in the parent's node entry.
    fn metanode_annotation(&self, entry: &ConfigTree) -> ParseResult<Option<String>> {
        common::annotation_text(entry)
    }

    // -----------------------------------------------------------------------
    // A node's own settings file
    // -----------------------------------------------------------------------

    /// Detached copy of the `model` sub-tree.
    fn model_parameters(&self, settings: &ConfigTree) -> ParseResult<Option<ConfigTree>> {
        Ok(settings.get_optional_config("model")?.cloned())
    }

    fn custom_node_description(&self, settings: &ConfigTree) -> ParseResult<Option<String>> {
        common::optional_string(settings, "customDescription")
    }

    /// Annotation of native nodes and components.
    fn node_annotation(&self, settings: &ConfigTree) -> ParseResult<Option<String>> {
        common::annotation_text(settings)
    }

    fn node_name(&self, settings: &ConfigTree) -> ParseResult<Option<String>> {
        common::optional_string(settings, "name")
    }

    fn factory_class(&self, settings: &ConfigTree) -> ParseResult<String> {
        Ok(settings.get_string("factory")?.to_string())
    }

    fn factory_settings(&self, settings: &ConfigTree) -> ParseResult<Option<ConfigTree>> {
        Ok(settings.get_optional_config("factory_settings")?.cloned())
    }

    fn provenance(&self, settings: &ConfigTree) -> ParseResult<NodeProvenance> {
        Ok(NodeProvenance {
            bundle_name: common::optional_string(settings, "node-bundle-name")?,
            bundle_vendor: common::optional_string(settings, "node-bundle-vendor")?,
            bundle_version: common::optional_string(settings, "node-bundle-version")?,
            feature_name: common::optional_string(settings, "node-feature-name")?,
            feature_vendor: common::optional_string(settings, "node-feature-vendor")?,
            feature_version: common::optional_string(settings, "node-feature-version")?,
        })
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    fn template_information(&self, template: &ConfigTree) -> ParseResult<TemplateInformation> {
        common::template_information(template, None)
    }

    /// Source URI of the template a nested workflow is linked to.
    fn template_link(&self, workflow: &ConfigTree) -> Option<String> {
        common::template_link(workflow)
    }

    // -----------------------------------------------------------------------
    // Component contract
    // -----------------------------------------------------------------------

    fn component_description(&self, _settings: &ConfigTree) -> ParseResult<Option<String>> {
        Ok(None)
    }

    fn in_ports(&self, settings: &ConfigTree) -> ParseResult<Vec<PortDescriptor>> {
        common::ports(settings, "inports", None)
    }

    fn out_ports(&self, settings: &ConfigTree) -> ParseResult<Vec<PortDescriptor>> {
        common::ports(settings, "outports", None)
    }

    fn view_nodes(&self, _settings: &ConfigTree) -> ParseResult<Vec<String>> {
        Ok(vec![])
    }

    fn dialog_sections(&self, _settings: &ConfigTree) -> ParseResult<Vec<DialogSection>> {
        Ok(vec![])
    }
}

static LEGACY: LegacyParser = LegacyParser;
static V3_6: V3_6Parser = V3_6Parser;
static V4_1: V4_1Parser = V4_1Parser;
static V5_1: V5_1Parser = V5_1Parser;

/// The strategy for one era.
pub fn parser_for(era: Era) -> &'static dyn WorkflowParser {
    match era {
        Era::Legacy => &LEGACY,
        Era::V3_6 => &V3_6,
        Era::V4_1 => &V4_1,
        Era::V5_1 => &V5_1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ConfigValue;

    #[test]
    fn every_era_has_its_own_strategy() {
        for era in [Era::Legacy, Era::V3_6, Era::V4_1, Era::V5_1] {
            assert_eq!(parser_for(era).era(), era);
        }
    }

    #[test]
    fn shared_reads_work_for_every_era() {
        let settings = ConfigTree::new("settings.xml")
            .with("factory", ConfigValue::String(Some("org.example.Factory".into())))
            .with("node-bundle-name", ConfigValue::String(None))
            .with("node-feature-vendor", ConfigValue::String(Some("Example".into())))
            .with("model", ConfigValue::Config(ConfigTree::new("model").with("rows", ConfigValue::Int(10))));

        for era in [Era::Legacy, Era::V3_6, Era::V4_1, Era::V5_1] {
            let parser = parser_for(era);
            assert_eq!(parser.factory_class(&settings).unwrap(), "org.example.Factory");
            let provenance = parser.provenance(&settings).unwrap();
            assert_eq!(provenance.bundle_name, None);
            assert_eq!(provenance.feature_vendor.as_deref(), Some("Example"));
            let model = parser.model_parameters(&settings).unwrap().unwrap();
            assert_eq!(model.get_int("rows").unwrap(), 10);
            assert!(parser.factory_settings(&settings).unwrap().is_none());
        }
    }

    #[test]
    fn missing_factory_is_a_settings_error() {
        let settings = ConfigTree::new("settings.xml");
        let err = parser_for(Era::V4_1).factory_class(&settings).unwrap_err();
        assert!(matches!(err, ParseError::Settings(SettingsError::MissingKey { .. })));
    }
}
