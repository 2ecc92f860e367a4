#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

// =============================================================================
// Settings-tree XML builders
// =============================================================================

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn string(key: &str, value: &str) -> String {
    format!(
        r#"<entry key="{}" type="xstring" value="{}"/>"#,
        escape(key),
        escape(value)
    )
}

pub fn null_string(key: &str) -> String {
    format!(r#"<entry key="{}" type="xstring" isnull="true" value=""/>"#, escape(key))
}

pub fn int(key: &str, value: i32) -> String {
    format!(r#"<entry key="{}" type="xint" value="{value}"/>"#, escape(key))
}

pub fn boolean(key: &str, value: bool) -> String {
    format!(r#"<entry key="{}" type="xboolean" value="{value}"/>"#, escape(key))
}

pub fn config(key: &str, children: &[String]) -> String {
    format!(r#"<config key="{}">{}</config>"#, escape(key), children.concat())
}

pub fn string_array(key: &str, values: &[&str]) -> String {
    let mut children = vec![int("array-size", values.len() as i32)];
    children.extend(values.iter().enumerate().map(|(i, v)| string(&i.to_string(), v)));
    config(key, &children)
}

/// A complete settings document.
pub fn document(key: &str, children: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<config xmlns="http://www.knime.org/2008/09/XMLConfig" key="{}">{}</config>"#,
        escape(key),
        children.concat()
    )
}

// =============================================================================
// Workflow descriptor pieces
// =============================================================================

pub fn node_entry(id: i32, settings_file: &str, node_type: &str) -> String {
    config(
        &format!("node_{id}"),
        &[
            int("id", id),
            string("node_settings_file", settings_file),
            string("node_type", node_type),
        ],
    )
}

pub fn annotated_node_entry(id: i32, settings_file: &str, node_type: &str, annotation: &str) -> String {
    config(
        &format!("node_{id}"),
        &[
            int("id", id),
            string("node_settings_file", settings_file),
            string("node_type", node_type),
            config("nodeAnnotation", &[string("text", annotation)]),
        ],
    )
}

pub fn connection(index: usize, source: i32, source_port: i32, dest: i32, dest_port: i32) -> String {
    config(
        &format!("connection_{index}"),
        &[
            int("sourceID", source),
            int("destID", dest),
            int("sourcePort", source_port),
            int("destPort", dest_port),
        ],
    )
}

pub fn author_information(author: &str, when: &str) -> String {
    config(
        "authorInformation",
        &[
            string("authored-by", author),
            string("authored-when", when),
            null_string("lastEdited-by"),
            null_string("lastEdited-when"),
        ],
    )
}

/// `workflow.knime` with the given node entries and connections.
pub fn workflow_descriptor(
    version: &str,
    name: &str,
    nodes: &[String],
    connections: &[String],
    extra: &[String],
) -> String {
    let mut children = vec![
        string("version", version),
        string("created_by", "5.2.0.v202311290613"),
        string("name", name),
        config("nodes", nodes),
        config("connections", connections),
    ];
    children.extend_from_slice(extra);
    document("workflow.knime", &children)
}

pub fn native_settings(name: &str, factory: &str, extra: &[String]) -> String {
    let mut children = vec![
        string("name", name),
        string("factory", factory),
        string("node-bundle-name", "Example Base Nodes"),
        string("node-bundle-vendor", "Example AG"),
        string("node-bundle-version", "5.2.0"),
        null_string("node-feature-name"),
        config("model", &[int("rows", 100), boolean("header", true)]),
    ];
    children.extend_from_slice(extra);
    document("settings.xml", &children)
}

// =============================================================================
// Filesystem
// =============================================================================

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture directory");
    }
    fs::write(path, content).expect("write fixture file");
}

pub const READER_FACTORY: &str = "org.example.io.CsvReaderFactory";
pub const FILTER_FACTORY: &str = "org.example.base.RowFilterFactory";

/// Native node 7 and metanode 3 holding native node 1, with 7:0 -> 3:0 at
/// the top level and a boundary connection into node 1.
pub fn nested_workflow(version: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = dir.path();

    write(
        root,
        "workflow.knime",
        &workflow_descriptor(
            version,
            "Sales Report",
            &[
                node_entry(7, "CSV Reader (#7)/settings.xml", "NativeNode"),
                annotated_node_entry(3, "Preparation (#3)/workflow.knime", "MetaNode", "Clean up"),
            ],
            &[connection(0, 7, 0, 3, 0)],
            &[
                author_information("jdoe", "2023/11/02 14:05:00 +0100"),
                config("annotations", &[config("annotation_0", &[string("text", "Loads monthly sales")])]),
            ],
        ),
    );
    write(
        root,
        "CSV Reader (#7)/settings.xml",
        &native_settings(
            "CSV Reader",
            READER_FACTORY,
            &[config("nodeAnnotation", &[string("text", "Node 7")])],
        ),
    );
    write(
        root,
        "Preparation (#3)/workflow.knime",
        &workflow_descriptor(
            version,
            "Preparation",
            &[node_entry(1, "Row Filter (#1)/settings.xml", "NativeNode")],
            &[connection(0, -1, 0, 1, 0)],
            &[],
        ),
    );
    write(
        root,
        "Preparation (#3)/Row Filter (#1)/settings.xml",
        &native_settings("Row Filter", FILTER_FACTORY, &[]),
    );
    dir
}
