//! Formats 5.1 and 5.2.

use super::{ParseResult, WORKFLOW_METADATA_FILE, WorkflowParser, common, v4_1};
use crate::metadata::{AuthorInformation, DialogSection, NodeType, PortDescriptor};
use crate::tree::ConfigTree;
use crate::version::Era;

/// Moves the workflow description out of the descriptor into
/// `workflow-metadata.xml`.
#[derive(Debug, Default)]
pub struct V5_1Parser;

impl WorkflowParser for V5_1Parser {
    fn era(&self) -> Era {
        Era::V5_1
    }

    fn description_file(&self) -> Option<&'static str> {
        Some(WORKFLOW_METADATA_FILE)
    }

    fn custom_description(
        &self,
        _workflow: &ConfigTree,
        metadata_file: Option<&ConfigTree>,
    ) -> ParseResult<Option<String>> {
        match metadata_file {
            Some(metadata) => common::optional_string(metadata, "description"),
            None => Ok(None),
        }
    }

    fn author_information(&self, workflow: &ConfigTree) -> ParseResult<AuthorInformation> {
        common::author_information(workflow)
    }

    fn well_known_files(&self) -> Vec<&'static str> {
        let mut files = super::WELL_KNOWN_FILES.to_vec();
        files.push(WORKFLOW_METADATA_FILE);
        files
    }

    fn node_type(&self, entry: &ConfigTree) -> ParseResult<NodeType> {
        common::required_node_type(entry)
    }

    fn component_description(&self, settings: &ConfigTree) -> ParseResult<Option<String>> {
        v4_1::component_description(settings)
    }

    fn in_ports(&self, settings: &ConfigTree) -> ParseResult<Vec<PortDescriptor>> {
        v4_1::described_ports(settings, "inports", "inPorts")
    }

    fn out_ports(&self, settings: &ConfigTree) -> ParseResult<Vec<PortDescriptor>> {
        v4_1::described_ports(settings, "outports", "outPorts")
    }

    fn view_nodes(&self, settings: &ConfigTree) -> ParseResult<Vec<String>> {
        v4_1::view_nodes(settings)
    }

    fn dialog_sections(&self, settings: &ConfigTree) -> ParseResult<Vec<DialogSection>> {
        v4_1::dialog_sections(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ConfigValue;

    #[test]
    fn description_comes_from_the_metadata_file() {
        let workflow = ConfigTree::new("workflow.knime")
            .with("customDescription", ConfigValue::String(Some("stale".into())));
        let metadata = ConfigTree::new("workflow-metadata.xml")
            .with("description", ConfigValue::String(Some("Monthly sales report".into())));

        let parser = V5_1Parser;
        assert_eq!(
            parser.custom_description(&workflow, Some(&metadata)).unwrap().as_deref(),
            Some("Monthly sales report")
        );
        assert_eq!(parser.custom_description(&workflow, None).unwrap(), None);
    }

    #[test]
    fn metadata_file_is_expected() {
        assert!(V5_1Parser.well_known_files().contains(&WORKFLOW_METADATA_FILE));
        assert_eq!(V5_1Parser.description_file(), Some(WORKFLOW_METADATA_FILE));
    }
}
