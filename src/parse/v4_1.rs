//! Format 4.1.

use super::{ParseResult, WorkflowParser, common};
use crate::metadata::{AuthorInformation, DialogSection, NodeType, PortDescriptor};
use crate::tree::ConfigTree;
use crate::version::Era;

/// Requires `node_type` on every node entry and adds the component
/// `metadata` block: description, port names, view nodes and dialog.
#[derive(Debug, Default)]
pub struct V4_1Parser;

impl WorkflowParser for V4_1Parser {
    fn era(&self) -> Era {
        Era::V4_1
    }

    fn author_information(&self, workflow: &ConfigTree) -> ParseResult<AuthorInformation> {
        common::author_information(workflow)
    }

    fn node_type(&self, entry: &ConfigTree) -> ParseResult<NodeType> {
        common::required_node_type(entry)
    }

    fn component_description(&self, settings: &ConfigTree) -> ParseResult<Option<String>> {
        component_description(settings)
    }

    fn in_ports(&self, settings: &ConfigTree) -> ParseResult<Vec<PortDescriptor>> {
        described_ports(settings, "inports", "inPorts")
    }

    fn out_ports(&self, settings: &ConfigTree) -> ParseResult<Vec<PortDescriptor>> {
        described_ports(settings, "outports", "outPorts")
    }

    fn view_nodes(&self, settings: &ConfigTree) -> ParseResult<Vec<String>> {
        view_nodes(settings)
    }

    fn dialog_sections(&self, settings: &ConfigTree) -> ParseResult<Vec<DialogSection>> {
        dialog_sections(settings)
    }
}

// Component contract reads, shared with later eras.

pub(super) fn component_description(settings: &ConfigTree) -> ParseResult<Option<String>> {
    match common::component_metadata(settings)? {
        Some(metadata) => common::optional_string(metadata, "description"),
        None => Ok(None),
    }
}

pub(super) fn described_ports(
    settings: &ConfigTree,
    ports_key: &str,
    described_key: &str,
) -> ParseResult<Vec<PortDescriptor>> {
    let described = match common::component_metadata(settings)? {
        Some(metadata) => metadata.get_optional_config(described_key)?,
        None => None,
    };
    common::ports(settings, ports_key, described)
}

pub(super) fn view_nodes(settings: &ConfigTree) -> ParseResult<Vec<String>> {
    match common::component_metadata(settings)? {
        Some(metadata) => common::view_nodes(metadata),
        None => Ok(vec![]),
    }
}

pub(super) fn dialog_sections(settings: &ConfigTree) -> ParseResult<Vec<DialogSection>> {
    match common::component_metadata(settings)? {
        Some(metadata) => common::dialog_sections(metadata),
        None => Ok(vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ParseError;
    use crate::tree::ConfigValue;

    fn s(v: &str) -> ConfigValue {
        ConfigValue::String(Some(v.to_string()))
    }

    fn config(tree: ConfigTree) -> ConfigValue {
        ConfigValue::Config(tree)
    }

    fn component_settings() -> ConfigTree {
        let inports = ConfigTree::new("inports").with(
            "inport_0",
            config(
                ConfigTree::new("inport_0")
                    .with("index", ConfigValue::Int(0))
                    .with(
                        "type",
                        config(ConfigTree::new("type").with("object_class", s("org.example.TablePort"))),
                    ),
            ),
        );
        let metadata = ConfigTree::new("metadata")
            .with("description", s("Cleans addresses"))
            .with(
                "inPorts",
                config(ConfigTree::new("inPorts").with(
                    "inPort_0",
                    config(
                        ConfigTree::new("inPort_0")
                            .with("name", s("Addresses"))
                            .with("description", s("Raw address table")),
                    ),
                )),
            )
            .with(
                "viewNodes",
                config(
                    ConfigTree::new("viewNodes")
                        .with("array-size", ConfigValue::Int(2))
                        .with("0", s("org.example.TableView"))
                        .with("1", ConfigValue::String(None)),
                ),
            )
            .with(
                "dialog",
                config(ConfigTree::new("dialog").with(
                    "section_0",
                    config(
                        ConfigTree::new("section_0")
                            .with("header", s("Options"))
                            .with(
                                "fields",
                                config(ConfigTree::new("fields").with(
                                    "field_0",
                                    config(ConfigTree::new("field_0").with("name", s("Country"))),
                                )),
                            ),
                    ),
                )),
            );
        ConfigTree::new("settings.xml")
            .with("inports", config(inports))
            .with("metadata", config(metadata))
    }

    #[test]
    fn reads_the_component_contract() {
        let settings = component_settings();
        assert_eq!(
            V4_1Parser.component_description(&settings).unwrap().as_deref(),
            Some("Cleans addresses")
        );

        let ports = V4_1Parser.in_ports(&settings).unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port_type.as_deref(), Some("org.example.TablePort"));
        assert_eq!(ports[0].name.as_deref(), Some("Addresses"));
        assert!(V4_1Parser.out_ports(&settings).unwrap().is_empty());

        assert_eq!(V4_1Parser.view_nodes(&settings).unwrap(), vec!["org.example.TableView"]);

        let dialog = V4_1Parser.dialog_sections(&settings).unwrap();
        assert_eq!(dialog[0].header.as_deref(), Some("Options"));
        assert_eq!(dialog[0].fields[0].name.as_deref(), Some("Country"));
        assert_eq!(dialog[0].fields[0].description, None);
    }

    #[test]
    fn node_type_is_required() {
        let entry = ConfigTree::new("node_1").with("node_is_meta", ConfigValue::Bool(true));
        assert!(matches!(
            V4_1Parser.node_type(&entry),
            Err(ParseError::Settings(_))
        ));
    }

    #[test]
    fn template_type_is_required() {
        let template = ConfigTree::new("template.knime").with(
            "workflow_template_information",
            config(ConfigTree::new("workflow_template_information").with("role", s("Template"))),
        );
        assert!(V4_1Parser.template_information(&template).is_err());

        let template = ConfigTree::new("template.knime").with(
            "workflow_template_information",
            config(
                ConfigTree::new("workflow_template_information")
                    .with("templateType", s("Workflow")),
            ),
        );
        assert_eq!(
            V4_1Parser.template_information(&template).unwrap_err(),
            ParseError::UnknownTemplateType("Workflow".into())
        );
    }
}
