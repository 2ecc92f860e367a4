//! Recursive extraction of workflows and templates.
//!
//! The walker loads a level's descriptor, lets the era strategy map it onto
//! fields, recurses into every metanode and component directory and finally
//! qualifies the ids of everything the nested level reported. Every optional
//! read is skipped entirely when its capability is off.

mod node;
mod template;

pub use template::extract_template;

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use crate::archive;
use crate::audit;
use crate::builder::{WorkflowBuilder, WorkflowMetadataBuilder};
use crate::config::ExtractionConfig;
use crate::error::{ParseResultExt, Result, WorkflowalizerError};
use crate::metadata::{Workflow, WorkflowMetadata};
use crate::parse::{WORKFLOW_FILE, WORKFLOW_SET_META_FILE, WorkflowParser};
use crate::side_files;
use crate::tree::{ConfigTree, SettingsError, load_tree};
use crate::version::FormatVersion;

/// Extracts the metadata of the workflow at `path`.
///
/// `path` is a workflow directory, its `workflow.knime`, or a zip archive
/// holding exactly one workflow directory.
pub fn extract_workflow(path: &Path, config: &ExtractionConfig) -> Result<WorkflowMetadata> {
    tracing::info!("Extracting workflow '{}'", path.display());
    let metadata = if archive::is_archive(path) {
        let unpacked = archive::unpack(path, WORKFLOW_FILE)?;
        extract_workflow_dir(unpacked.root(), config)?
    } else {
        extract_workflow_dir(&item_directory(path, WORKFLOW_FILE), config)?
    };
    tracing::info!(
        "Extracted workflow '{}' (format {})",
        metadata.name().unwrap_or_default(),
        metadata.format_version()
    );
    Ok(metadata)
}

/// Accepts either an item directory or its descriptor file.
pub(crate) fn item_directory(path: &Path, descriptor: &str) -> PathBuf {
    if path.is_file() && path.file_name().is_some_and(|n| n == descriptor) {
        if let Some(parent) = path.parent() {
            return parent.to_path_buf();
        }
    }
    path.to_path_buf()
}

fn extract_workflow_dir(dir: &Path, config: &ExtractionConfig) -> Result<WorkflowMetadata> {
    let descriptor_path = dir.join(WORKFLOW_FILE);
    let descriptor = load_tree(&descriptor_path)?;
    let version = resolve_version(&descriptor, &descriptor_path)?;
    Walker::new(config, version).workflow_metadata(dir, &descriptor, &descriptor_path)
}

/// Resolves the format version named by a root descriptor.
pub(crate) fn resolve_version(descriptor: &ConfigTree, file: &Path) -> Result<FormatVersion> {
    let raw = descriptor
        .get_string("version")
        .map_err(|e| WorkflowalizerError::settings(file, e))?;
    FormatVersion::resolve(raw)
}

/// One extraction call: the configuration plus the strategy selected for the
/// top-level item. Nested levels are read with the same strategy.
pub(crate) struct Walker<'c> {
    config: &'c ExtractionConfig,
    version: FormatVersion,
    parser: &'static dyn WorkflowParser,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(config: &'c ExtractionConfig, version: FormatVersion) -> Self {
        tracing::debug!("Format version {version} ({:?} era)", version.era());
        Walker {
            config,
            version,
            parser: version.parser(),
        }
    }

    /// The top-level item: one workflow level plus the top-level-only facets.
    pub(crate) fn workflow_metadata(
        &self,
        dir: &Path,
        descriptor: &ConfigTree,
        descriptor_path: &Path,
    ) -> Result<WorkflowMetadata> {
        let p = self.parser;
        let mut builder = WorkflowMetadataBuilder::new(self.config);
        builder.format_version.set(self.version);
        builder
            .workflow
            .set(self.workflow_level(dir, descriptor, descriptor_path)?);

        builder
            .author_information
            .set(p.author_information(descriptor).in_file(descriptor_path)?);
        builder
            .credentials
            .set(p.credential_names(descriptor).in_file(descriptor_path)?);
        builder
            .variables
            .set(p.variable_names(descriptor).in_file(descriptor_path)?);

        let svg = match p.svg_file() {
            Some(name) => side_files::read_svg_dimensions(&dir.join(name))?,
            None => None,
        };
        builder.svg.set_option(svg);

        let artifacts_dir = dir.join(p.artifacts_directory());
        builder.artifacts.set(side_files::list_artifacts(&artifacts_dir)?);

        if self.config.read_workflow_set_meta() {
            builder
                .workflow_set_meta
                .set_option(side_files::read_workflow_set_meta(&dir.join(WORKFLOW_SET_META_FILE))?);
        }
        if self.config.read_workflow_configuration() {
            builder
                .workflow_configuration
                .set(side_files::read_workflow_configuration(&artifacts_dir)?);
        }
        if self.config.read_openapi() {
            builder.openapi.set(side_files::read_openapi(&artifacts_dir)?);
        }

        Ok(builder.build()?)
    }

    /// One workflow level and, recursively, every level below it.
    pub(crate) fn workflow_level(
        &self,
        dir: &Path,
        descriptor: &ConfigTree,
        descriptor_path: &Path,
    ) -> Result<Workflow> {
        let p = self.parser;
        let mut builder = WorkflowBuilder::new(self.config);

        builder.version.set(p.version(descriptor).in_file(descriptor_path)?);
        builder
            .created_by
            .set_option(p.created_by(descriptor).in_file(descriptor_path)?);
        builder.name.set_option(p.name(descriptor).in_file(descriptor_path)?);

        let metadata_file = match p.description_file() {
            Some(name) => {
                let path = dir.join(name);
                if path.is_file() {
                    Some((load_tree(&path)?, path))
                } else {
                    None
                }
            }
            None => None,
        };
        let description = match &metadata_file {
            Some((tree, path)) => p.custom_description(descriptor, Some(tree)).in_file(path)?,
            None => p.custom_description(descriptor, None).in_file(descriptor_path)?,
        };
        builder.description.set_option(description);
        builder
            .annotations
            .set(p.annotations(descriptor).in_file(descriptor_path)?);

        let entries = p.node_entries(descriptor).in_file(descriptor_path)?;

        if self.config.read_nodes() {
            let mut nodes = Vec::with_capacity(entries.len());
            let mut positions = HashMap::with_capacity(entries.len());
            for entry in &entries {
                let local_id = p.node_id(entry).in_file(descriptor_path)?;
                if positions.insert(local_id, nodes.len()).is_some() {
                    return Err(WorkflowalizerError::settings(
                        descriptor_path,
                        SettingsError::InvalidValue {
                            config: entry.key().to_string(),
                            key: "id".into(),
                            message: format!("node id {local_id} is declared more than once"),
                        },
                    ));
                }
                nodes.push(self.node(dir, entry, descriptor_path)?);
            }

            if self.config.read_connections() {
                builder
                    .connections
                    .set(p.connections(descriptor, &positions).in_file(descriptor_path)?);
            }
            builder.nodes.set(nodes);
        }

        if self.config.read_unexpected_files() {
            let mut expected: HashSet<String> = p
                .well_known_files()
                .into_iter()
                .map(str::to_string)
                .collect();
            for entry in &entries {
                let settings_file = p.node_settings_file(entry).in_file(descriptor_path)?;
                expected.insert(declared_entry(&settings_file));
            }
            builder
                .unexpected_files
                .set(audit::unexpected_files(dir, &expected)?);
        }

        Ok(builder.build()?)
    }

    /// Resolves a declared settings file below `dir`, refusing paths that
    /// would leave it.
    pub(crate) fn settings_path(
        &self,
        dir: &Path,
        entry: &ConfigTree,
        descriptor_path: &Path,
    ) -> Result<PathBuf> {
        let relative = self
            .parser
            .node_settings_file(entry)
            .in_file(descriptor_path)?;
        let escapes = Path::new(&relative)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.is_empty() {
            return Err(WorkflowalizerError::settings(
                descriptor_path,
                SettingsError::InvalidValue {
                    config: entry.key().to_string(),
                    key: "node_settings_file".into(),
                    message: format!("'{relative}' does not point below the workflow directory"),
                },
            ));
        }
        Ok(dir.join(relative))
    }
}

/// The audit entry covering a node's files: the settings file's directory,
/// or the file itself when it sits next to the descriptor.
fn declared_entry(settings_file: &str) -> String {
    let segments: Vec<&str> = settings_file
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    match segments.split_last() {
        Some((file, [])) => file.to_string(),
        Some((_, parent)) => parent.join("/"),
        None => String::new(),
    }
}
