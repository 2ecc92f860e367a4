//! Readers for the optional files next to a top-level workflow descriptor.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, WorkflowalizerError};
use crate::metadata::{OpenApiArtifacts, SvgDimensions, WorkflowConfigurationArtifacts, WorkflowSetMeta};
use crate::tree::xml::{parse_document, read_file};

pub const WORKFLOW_CONFIGURATION_FILE: &str = "workflow-configuration.json";
pub const WORKFLOW_CONFIGURATION_REPRESENTATION_FILE: &str =
    "workflow-configuration-representation.json";
pub const OPENAPI_INPUT_PARAMETERS_FILE: &str = "openapi-input-parameters.json";
pub const OPENAPI_INPUT_RESOURCES_FILE: &str = "openapi-input-resources.json";
pub const OPENAPI_OUTPUT_PARAMETERS_FILE: &str = "openapi-output-parameters.json";
pub const OPENAPI_OUTPUT_RESOURCES_FILE: &str = "openapi-output-resources.json";
pub const HUB_EVENT_INPUT_PARAMETERS_FILE: &str = "hub-event-input-parameters.json";

/// Author and comments from a `workflowset.meta` file. A missing file yields
/// `None`.
pub fn read_workflow_set_meta(path: &Path) -> Result<Option<WorkflowSetMeta>> {
    if !path.is_file() {
        return Ok(None);
    }
    tracing::debug!("Reading workflow set meta '{}'", path.display());
    let text = read_file(path)?;
    let document = parse_document(&text, path)?;

    let mut meta = WorkflowSetMeta::default();
    for element in document
        .descendants()
        .filter(|n| n.has_tag_name("element"))
    {
        let value = element
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        match element.attribute("name") {
            Some("Author") => meta.author = value,
            Some("Comments") => meta.comments = value,
            _ => {}
        }
    }
    Ok(Some(meta))
}

/// Width and height of the rendered diagram.
///
/// Best effort: a missing or unreadable diagram is `None`. Unsafe XML is
/// still rejected.
pub fn read_svg_dimensions(path: &Path) -> Result<Option<SvgDimensions>> {
    if !path.is_file() {
        return Ok(None);
    }
    tracing::debug!("Reading diagram '{}'", path.display());
    let text = read_file(path)?;
    let document = match parse_document(&text, path) {
        Ok(document) => document,
        Err(e @ WorkflowalizerError::UnsafeXml(_)) => return Err(e),
        Err(e) => {
            tracing::warn!("Ignoring unreadable diagram: {e}");
            return Ok(None);
        }
    };
    let root = document.root_element();
    let dimensions = root
        .attribute("width")
        .and_then(parse_length)
        .zip(root.attribute("height").and_then(parse_length))
        .map(|(width, height)| SvgDimensions { width, height });
    if dimensions.is_none() {
        tracing::warn!("Diagram '{}' has no usable width/height", path.display());
    }
    Ok(dimensions)
}

/// `"640"`, `"640px"` and `"640.4"` all read as 640.
fn parse_length(raw: &str) -> Option<u32> {
    let numeric: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = numeric.parse().ok()?;
    (value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value.round() as u32)
}

/// Every file below the artifacts directory, relative to it, sorted.
pub fn list_artifacts(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut artifacts = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            WorkflowalizerError::io(&path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        artifacts.push(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        );
    }
    Ok(artifacts)
}

/// Parses an optional JSON artifact.
fn read_json(path: &Path) -> Result<Option<serde_json::Value>> {
    if !path.is_file() {
        return Ok(None);
    }
    tracing::debug!("Reading artifact '{}'", path.display());
    let text = read_file(path)?;
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| WorkflowalizerError::MalformedJson {
            file: path.to_path_buf(),
            source,
        })
}

pub fn read_workflow_configuration(artifacts_dir: &Path) -> Result<WorkflowConfigurationArtifacts> {
    Ok(WorkflowConfigurationArtifacts {
        configuration: read_json(&artifacts_dir.join(WORKFLOW_CONFIGURATION_FILE))?,
        representation: read_json(&artifacts_dir.join(WORKFLOW_CONFIGURATION_REPRESENTATION_FILE))?,
    })
}

pub fn read_openapi(artifacts_dir: &Path) -> Result<OpenApiArtifacts> {
    Ok(OpenApiArtifacts {
        input_parameters: read_json(&artifacts_dir.join(OPENAPI_INPUT_PARAMETERS_FILE))?,
        input_resources: read_json(&artifacts_dir.join(OPENAPI_INPUT_RESOURCES_FILE))?,
        output_parameters: read_json(&artifacts_dir.join(OPENAPI_OUTPUT_PARAMETERS_FILE))?,
        output_resources: read_json(&artifacts_dir.join(OPENAPI_OUTPUT_RESOURCES_FILE))?,
        hub_event_input_parameters: read_json(&artifacts_dir.join(HUB_EVENT_INPUT_PARAMETERS_FILE))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::error::ErrorKind;

    #[test]
    fn reads_author_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflowset.meta");
        fs::write(
            &path,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<KNIMEMetaInfo nrOfElements="2">
  <element form="text" read-only="false" name="Author">jdoe</element>
  <element form="multilinetext" read-only="false" name="Comments">  </element>
</KNIMEMetaInfo>"#,
        )
        .unwrap();

        let meta = read_workflow_set_meta(&path).unwrap().unwrap();
        assert_eq!(meta.author.as_deref(), Some("jdoe"));
        assert_eq!(meta.comments, None);
        assert!(read_workflow_set_meta(&dir.path().join("missing")).unwrap().is_none());
    }

    #[test]
    fn rejects_entity_declarations_in_side_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflowset.meta");
        fs::write(
            &path,
            r#"<?xml version="1.0"?>
<!DOCTYPE meta [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<KNIMEMetaInfo><element name="Author">&xxe;</element></KNIMEMetaInfo>"#,
        )
        .unwrap();
        let err = read_workflow_set_meta(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Security);

        let svg = dir.path().join("workflow.svg");
        fs::write(&svg, r#"<!DOCTYPE svg [<!ENTITY a "b">]><svg width="1" height="1"/>"#).unwrap();
        assert_eq!(read_svg_dimensions(&svg).unwrap_err().code(), "W030");
    }

    #[test]
    fn svg_dimensions_are_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.svg");
        fs::write(&path, r#"<svg xmlns="http://www.w3.org/2000/svg" width="640px" height="480.4"/>"#).unwrap();
        assert_eq!(
            read_svg_dimensions(&path).unwrap(),
            Some(SvgDimensions { width: 640, height: 480 })
        );

        fs::write(&path, "<svg width=").unwrap();
        assert_eq!(read_svg_dimensions(&path).unwrap(), None);
    }

    #[test]
    fn lists_nested_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = dir.path().join(".artifacts");
        fs::create_dir_all(artifacts.join("images")).unwrap();
        fs::write(artifacts.join("openapi-input-parameters.json"), r#"{"type":"object"}"#).unwrap();
        fs::write(artifacts.join("images/logo.png"), "").unwrap();

        assert_eq!(
            list_artifacts(&artifacts).unwrap(),
            vec!["images/logo.png", "openapi-input-parameters.json"]
        );

        let openapi = read_openapi(&artifacts).unwrap();
        assert_eq!(openapi.input_parameters, Some(serde_json::json!({"type": "object"})));
        assert_eq!(openapi.output_resources, None);
    }

    #[test]
    fn malformed_json_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(WORKFLOW_CONFIGURATION_FILE), "{not json").unwrap();
        let err = read_workflow_configuration(dir.path()).unwrap_err();
        assert_eq!(err.code(), "W023");
    }
}
