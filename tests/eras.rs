//! Integration tests for behaviour that differs between format eras.

mod helpers;

use chrono::{TimeZone, Utc};
use helpers::*;
use workflowalizer::{ExtractionConfig, FormatVersion, NodeType, SvgDimensions, extract_workflow};

fn nodes_only() -> ExtractionConfig {
    ExtractionConfig::builder().read_nodes().build().unwrap()
}

fn legacy_entry(id: i32, settings_file: &str, is_meta: bool) -> String {
    config(
        &format!("node_{id}"),
        &[
            int("id", id),
            string("node_settings_file", settings_file),
            boolean("node_is_meta", is_meta),
        ],
    )
}

#[test]
fn legacy_workflows_use_the_meta_flag_and_a_default_author() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "workflow.knime",
        &workflow_descriptor(
            "2.10.0",
            "Old",
            &[
                legacy_entry(1, "File Reader (#1)\\settings.xml", false),
                legacy_entry(2, "Meta (#2)\\workflow.knime", true),
            ],
            &[connection(0, 1, 1, 2, 0)],
            &[author_information("jdoe", "2019/05/08 11:21:09 +0200")],
        ),
    );
    write(root, "File Reader (#1)/settings.xml", &native_settings("File Reader", READER_FACTORY, &[]));
    write(root, "Meta (#2)/workflow.knime", &workflow_descriptor("2.10.0", "Meta", &[], &[], &[]));
    write(root, "workflow.svg", r#"<svg width="640" height="480"/>"#);

    let config = ExtractionConfig::builder()
        .read_nodes()
        .read_connections()
        .read_unexpected_files()
        .build()
        .unwrap();
    let metadata = extract_workflow(root, &config).unwrap();

    assert_eq!(metadata.format_version(), FormatVersion::V2_10);
    let nodes = metadata.nodes().unwrap();
    assert_eq!(nodes[0].node_type(), NodeType::NativeNode);
    assert_eq!(nodes[1].node_type(), NodeType::MetaNode);
    assert_eq!(metadata.connections().unwrap().len(), 1);

    let author = metadata.author_information();
    assert_eq!(author.author, "<unknown>");
    assert_eq!(author.authored_when, Utc.timestamp_opt(0, 0).unwrap());
    assert!(metadata.svg().is_none());
    assert!(metadata.unexpected_files().unwrap().is_empty());
}

#[test]
fn author_block_is_read_from_3_6_on() {
    let dir = nested_workflow("3.6.0");
    write(dir.path(), "workflow.svg", r#"<svg width="640px" height="480.4"/>"#);
    let metadata = extract_workflow(dir.path(), &ExtractionConfig::none()).unwrap();

    assert_eq!(metadata.format_version(), FormatVersion::V3_6);
    let author = metadata.author_information();
    assert_eq!(author.author, "jdoe");
    assert_eq!(author.authored_when, Utc.with_ymd_and_hms(2023, 11, 2, 13, 5, 0).unwrap());
    assert_eq!(author.last_edited_by, None);
    assert_eq!(author.last_edited_when, None);
    assert_eq!(metadata.svg(), Some(SvgDimensions { width: 640, height: 480 }));
}

#[test]
fn node_type_is_mandatory_from_4_1_on() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "workflow.knime",
        &workflow_descriptor(
            "4.1.0",
            "Strict",
            &[legacy_entry(1, "File Reader (#1)/settings.xml", false)],
            &[],
            &[],
        ),
    );
    write(root, "File Reader (#1)/settings.xml", &native_settings("File Reader", READER_FACTORY, &[]));

    let err = extract_workflow(root, &nodes_only()).unwrap_err();
    assert_eq!(err.code(), "W021");

    // Without node reading the entry is never looked at.
    assert!(extract_workflow(root, &ExtractionConfig::none()).is_ok());
}

#[test]
fn description_moves_to_the_metadata_file_in_5_1() {
    let description = document(
        "workflow-metadata.xml",
        &[string("description", "Monthly sales, cleaned and aggregated")],
    );
    let custom = string("customDescription", "From the descriptor");

    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "workflow.knime", &workflow_descriptor("5.1.0", "New", &[], &[], &[custom.clone()]));
    write(dir.path(), "workflow-metadata.xml", &description);
    let metadata = extract_workflow(dir.path(), &ExtractionConfig::none()).unwrap();
    assert_eq!(
        metadata.workflow().description(),
        Some("Monthly sales, cleaned and aggregated")
    );

    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "workflow.knime", &workflow_descriptor("5.1.0", "New", &[], &[], &[custom.clone()]));
    let metadata = extract_workflow(dir.path(), &ExtractionConfig::none()).unwrap();
    assert_eq!(metadata.workflow().description(), None);

    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "workflow.knime", &workflow_descriptor("4.1.0", "Older", &[], &[], &[custom]));
    write(dir.path(), "workflow-metadata.xml", &description);
    let metadata = extract_workflow(dir.path(), &ExtractionConfig::none()).unwrap();
    assert_eq!(metadata.workflow().description(), Some("From the descriptor"));
}

#[test]
fn nested_levels_keep_their_own_version_string() {
    let dir = nested_workflow("4.1.0");
    write(
        dir.path(),
        "Preparation (#3)/workflow.knime",
        &workflow_descriptor(
            "4.0.0",
            "Preparation",
            &[node_entry(1, "Row Filter (#1)/settings.xml", "NativeNode")],
            &[],
            &[],
        ),
    );
    let metadata = extract_workflow(dir.path(), &nodes_only()).unwrap();
    assert_eq!(metadata.version(), "4.1.0");
    let nested = metadata.nodes().unwrap()[1].workflow().unwrap();
    assert_eq!(nested.version(), "4.0.0");
}
