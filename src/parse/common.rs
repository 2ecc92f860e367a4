//! Reads shared by several format eras.
//!
//! Era strategies call these from their trait implementations; nothing here
//! touches the filesystem.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::percent_decode_str;

use super::ParseError;
use crate::metadata::{
    AuthorInformation, Connection, DialogField, DialogSection, NodeType, PortDescriptor,
    TemplateInformation, TemplateType, UNKNOWN_AUTHOR,
};
use crate::tree::{ConfigTree, SettingsError};

pub(crate) const AUTHORED_WHEN_FORMAT: &str = "%Y/%m/%d %H:%M:%S %z";
pub(crate) const TEMPLATE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text entries of every child of `key`, e.g. workflow annotations.
pub(crate) fn child_texts(tree: &ConfigTree, key: &str, text_key: &str) -> Result<Vec<String>, ParseError> {
    let Some(parent) = tree.get_optional_config(key)? else {
        return Ok(vec![]);
    };
    let mut texts = Vec::new();
    for child in parent.children() {
        if let Some(text) = child.get_optional_string(text_key)? {
            texts.push(text.to_string());
        }
    }
    Ok(texts)
}

pub(crate) fn optional_string(tree: &ConfigTree, key: &str) -> Result<Option<String>, ParseError> {
    Ok(tree.get_optional_string(key)?.map(str::to_string))
}

/// `<config_key>/text` of a node entry or node settings file.
pub(crate) fn annotation_text(tree: &ConfigTree) -> Result<Option<String>, ParseError> {
    match tree.get_optional_config("nodeAnnotation")? {
        Some(annotation) => optional_string(annotation, "text"),
        None => Ok(None),
    }
}

/// Author block introduced with format 3.6.
pub(crate) fn author_information(workflow: &ConfigTree) -> Result<AuthorInformation, ParseError> {
    let Some(info) = workflow.get_optional_config("authorInformation")? else {
        return Ok(AuthorInformation::default());
    };
    let author = info
        .get_optional_string("authored-by")?
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();
    let authored_when = match info.get_optional_string("authored-when")? {
        Some(raw) => parse_author_date(raw).unwrap_or_else(|| {
            tracing::warn!("Unparseable authoring date '{raw}', falling back to the epoch");
            DateTime::<Utc>::default()
        }),
        None => DateTime::<Utc>::default(),
    };
    let last_edited_when = match info.get_optional_string("lastEdited-when")? {
        Some(raw) => {
            let parsed = parse_author_date(raw);
            if parsed.is_none() {
                tracing::warn!("Unparseable last-edited date '{raw}', ignoring it");
            }
            parsed
        }
        None => None,
    };
    Ok(AuthorInformation {
        author,
        authored_when,
        last_edited_by: optional_string(info, "lastEdited-by")?,
        last_edited_when,
    })
}

pub(crate) fn parse_author_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, AUTHORED_WHEN_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

/// Connections of one workflow level, resolved against the local id of every
/// direct child (value: position in the node list).
pub(crate) fn connections(
    workflow: &ConfigTree,
    nodes: &HashMap<i32, usize>,
) -> Result<Vec<Connection>, ParseError> {
    let Some(entries) = workflow.get_optional_config("connections")? else {
        return Ok(vec![]);
    };
    let mut connections = Vec::new();
    for entry in entries.children() {
        let source_id = entry.get_int("sourceID")?;
        let dest_id = entry.get_int("destID")?;
        let source_port = entry.get_int("sourcePort")?;
        let dest_port = entry.get_int("destPort")?;
        let resolve = |id: i32| -> Result<Option<usize>, ParseError> {
            if id == crate::metadata::BOUNDARY_ID {
                return Ok(None);
            }
            nodes
                .get(&id)
                .copied()
                .map(Some)
                .ok_or(ParseError::UnresolvedConnection {
                    source_id,
                    source_port,
                    dest_id,
                    dest_port,
                    missing: id,
                })
        };
        let source_node = resolve(source_id)?;
        let dest_node = resolve(dest_id)?;
        tracing::trace!("Connection {source_id}:{source_port} -> {dest_id}:{dest_port}");
        connections.push(Connection {
            source_id,
            dest_id,
            source_port,
            dest_port,
            source_node,
            dest_node,
        });
    }
    Ok(connections)
}

/// Declared child node entries, in declaration order.
pub(crate) fn node_entries(workflow: &ConfigTree) -> Result<Vec<&ConfigTree>, ParseError> {
    match workflow.get_optional_config("nodes")? {
        Some(nodes) => Ok(nodes.children().collect()),
        None => Ok(vec![]),
    }
}

pub(crate) fn names(workflow: &ConfigTree, key: &str) -> Result<Vec<String>, ParseError> {
    child_texts(workflow, key, "name")
}

/// The `node_type` discriminator, which must be present.
pub(crate) fn required_node_type(entry: &ConfigTree) -> Result<NodeType, ParseError> {
    let raw = entry.get_string("node_type")?;
    NodeType::from_tag(raw).ok_or_else(|| unknown_node_type(entry, raw))
}

/// `node_type` when written, else the older `node_is_meta` flag.
pub(crate) fn node_type_with_fallback(entry: &ConfigTree) -> Result<NodeType, ParseError> {
    if entry.contains_key("node_type") {
        return required_node_type(entry);
    }
    if entry.contains_key("node_is_meta") && entry.get_bool("node_is_meta")? {
        Ok(NodeType::MetaNode)
    } else {
        Ok(NodeType::NativeNode)
    }
}

fn unknown_node_type(entry: &ConfigTree, raw: &str) -> ParseError {
    let node_id = entry
        .get_int("id")
        .map(|id| id.to_string())
        .unwrap_or_else(|_| entry.key().to_string());
    ParseError::UnknownNodeType {
        node_id,
        node_type: raw.to_string(),
    }
}

/// Settings file path relative to the workflow directory, with `/` separators.
pub(crate) fn node_settings_file(entry: &ConfigTree) -> Result<String, ParseError> {
    Ok(entry.get_string("node_settings_file")?.replace('\\', "/"))
}

/// Percent-decodes a template source URI, keeping the raw value when the
/// decoded bytes are not UTF-8.
pub(crate) fn decode_uri(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            tracing::warn!("Could not decode template URI '{raw}': {e}");
            raw.to_string()
        }
    }
}

/// Reads `workflow_template_information`. `default_type` applies when the
/// block carries no template type.
pub(crate) fn template_information(
    template: &ConfigTree,
    default_type: Option<TemplateType>,
) -> Result<TemplateInformation, ParseError> {
    let info = template.get_config("workflow_template_information")?;
    let template_type = match (info.get_optional_string("templateType")?, default_type) {
        (Some(raw), _) => {
            TemplateType::from_tag(raw).ok_or_else(|| ParseError::UnknownTemplateType(raw.into()))?
        }
        (None, Some(fallback)) => fallback,
        (None, None) => {
            return Err(SettingsError::MissingKey {
                config: info.key().to_string(),
                key: "templateType".into(),
            }
            .into());
        }
    };
    let timestamp = match info.get_optional_string("timestamp")? {
        Some(raw) => {
            let parsed = parse_template_timestamp(raw);
            if parsed.is_none() {
                tracing::warn!("Unparseable template timestamp '{raw}'");
            }
            parsed
        }
        None => None,
    };
    Ok(TemplateInformation {
        role: info.get_optional_string("role")?.unwrap_or("None").to_string(),
        timestamp,
        source_uri: info.get_optional_string("sourceURI")?.map(decode_uri),
        template_type,
    })
}

pub(crate) fn parse_template_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TEMPLATE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|d| d.with_timezone(&Utc)))
        .ok()
}

/// Source URI of the template a nested workflow is linked to. Any problem
/// reading it means "not linked".
pub(crate) fn template_link(workflow: &ConfigTree) -> Option<String> {
    let info = workflow
        .get_optional_config("workflow_template_information")
        .ok()
        .flatten()?;
    let raw = info.get_optional_string("sourceURI").ok().flatten()?;
    Some(decode_uri(raw))
}

/// Ports declared in a component's `inports`/`outports` block. Names and
/// descriptions are taken from the matching entries of `described`.
pub(crate) fn ports(
    settings: &ConfigTree,
    ports_key: &str,
    described: Option<&ConfigTree>,
) -> Result<Vec<PortDescriptor>, ParseError> {
    let Some(declared) = settings.get_optional_config(ports_key)? else {
        return Ok(vec![]);
    };
    let descriptions: Vec<&ConfigTree> = described.map(|d| d.children().collect()).unwrap_or_default();
    let mut ports = Vec::new();
    for (position, port) in declared.children().enumerate() {
        let index = port.get_int("index")?;
        let port_type = match port.get_optional_config("type")? {
            Some(t) => optional_string(t, "object_class")?,
            None => None,
        };
        let (name, description) = match descriptions.get(position) {
            Some(d) => (optional_string(d, "name")?, optional_string(d, "description")?),
            None => (None, None),
        };
        ports.push(PortDescriptor {
            index,
            port_type,
            name,
            description,
        });
    }
    Ok(ports)
}

/// The component `metadata` block introduced with format 4.1.
pub(crate) fn component_metadata(settings: &ConfigTree) -> Result<Option<&ConfigTree>, ParseError> {
    Ok(settings.get_optional_config("metadata")?)
}

pub(crate) fn view_nodes(metadata: &ConfigTree) -> Result<Vec<String>, ParseError> {
    if !metadata.contains_key("viewNodes") {
        return Ok(vec![]);
    }
    Ok(metadata
        .get_string_array("viewNodes")?
        .into_iter()
        .flatten()
        .collect())
}

pub(crate) fn dialog_sections(metadata: &ConfigTree) -> Result<Vec<DialogSection>, ParseError> {
    let Some(dialog) = metadata.get_optional_config("dialog")? else {
        return Ok(vec![]);
    };
    let mut sections = Vec::new();
    for section in dialog.children() {
        let mut fields = Vec::new();
        if let Some(declared) = section.get_optional_config("fields")? {
            for field in declared.children() {
                fields.push(DialogField {
                    name: optional_string(field, "name")?,
                    description: optional_string(field, "description")?,
                });
            }
        }
        sections.push(DialogSection {
            header: optional_string(section, "header")?,
            description: optional_string(section, "description")?,
            fields,
        });
    }
    Ok(sections)
}
