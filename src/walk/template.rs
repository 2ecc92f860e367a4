//! Template and component-template extraction.

use std::path::Path;

use super::{Walker, item_directory, resolve_version};
use crate::archive;
use crate::builder::TemplateMetadataBuilder;
use crate::config::ExtractionConfig;
use crate::error::{ParseResultExt, Result};
use crate::metadata::{ComponentMetadata, TemplateMetadata, TemplateType};
use crate::parse::{NODE_SETTINGS_FILE, TEMPLATE_FILE, WORKFLOW_FILE};
use crate::tree::{ConfigTree, load_tree};

/// Extracts the metadata of the metanode or component template at `path`.
///
/// `path` is a template directory, its `template.knime`, or a zip archive
/// holding exactly one template directory.
pub fn extract_template(path: &Path, config: &ExtractionConfig) -> Result<TemplateMetadata> {
    tracing::info!("Extracting template '{}'", path.display());
    let metadata = if archive::is_archive(path) {
        let unpacked = archive::unpack(path, TEMPLATE_FILE)?;
        extract_template_dir(unpacked.root(), config)?
    } else {
        extract_template_dir(&item_directory(path, TEMPLATE_FILE), config)?
    };
    tracing::info!(
        "Extracted {:?} template '{}'",
        metadata.template_type(),
        metadata.workflow_metadata().name().unwrap_or_default()
    );
    Ok(metadata)
}

fn extract_template_dir(dir: &Path, config: &ExtractionConfig) -> Result<TemplateMetadata> {
    let template_path = dir.join(TEMPLATE_FILE);
    let template = load_tree(&template_path)?;
    let descriptor_path = dir.join(WORKFLOW_FILE);
    let descriptor = load_tree(&descriptor_path)?;

    // template.knime may pin a version of its own.
    let version = if template.contains_key("version") {
        resolve_version(&template, &template_path)?
    } else {
        resolve_version(&descriptor, &descriptor_path)?
    };
    let walker = Walker::new(config, version);

    let mut builder = TemplateMetadataBuilder::default();
    builder
        .workflow
        .set(walker.workflow_metadata(dir, &descriptor, &descriptor_path)?);
    let information = walker
        .parser
        .template_information(&template)
        .in_file(&template_path)?;
    if information.template_type == TemplateType::Component {
        builder.component.set(walker.component(dir)?);
    }
    builder.template_information.set(information);
    Ok(builder.build()?)
}

impl Walker<'_> {
    /// The declared contract of a component template.
    fn component(&self, dir: &Path) -> Result<ComponentMetadata> {
        let p = self.parser;
        let settings_path = dir.join(NODE_SETTINGS_FILE);
        let settings: ConfigTree = load_tree(&settings_path)?;
        let file = settings_path.as_path();
        Ok(ComponentMetadata {
            description: p.component_description(&settings).in_file(file)?,
            view_nodes: p.view_nodes(&settings).in_file(file)?,
            in_ports: p.in_ports(&settings).in_file(file)?,
            out_ports: p.out_ports(&settings).in_file(file)?,
            dialog: p.dialog_sections(&settings).in_file(file)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{Era, FormatVersion};

    #[test]
    fn template_descriptor_path_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(TEMPLATE_FILE);
        std::fs::write(&file, "<config key=\"template.knime\"/>").unwrap();
        assert_eq!(item_directory(&file, TEMPLATE_FILE), dir.path());
        assert_eq!(item_directory(dir.path(), TEMPLATE_FILE), dir.path());
    }

    #[test]
    fn walker_uses_the_resolved_era() {
        let config = ExtractionConfig::none();
        let walker = Walker::new(&config, FormatVersion::V2_7);
        assert_eq!(walker.parser.era(), Era::Legacy);
    }
}
