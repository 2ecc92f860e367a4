//! Formats written before 3.6.

use super::{ParseResult, WorkflowParser, common};
use crate::metadata::{AuthorInformation, NodeType, TemplateInformation, TemplateType};
use crate::tree::ConfigTree;
use crate::version::Era;

/// No author block, no rendered diagram, and node entries that may only
/// carry the `node_is_meta` flag.
#[derive(Debug, Default)]
pub struct LegacyParser;

impl WorkflowParser for LegacyParser {
    fn era(&self) -> Era {
        Era::Legacy
    }

    fn author_information(&self, _workflow: &ConfigTree) -> ParseResult<AuthorInformation> {
        Ok(AuthorInformation::default())
    }

    fn svg_file(&self) -> Option<&'static str> {
        None
    }

    fn node_type(&self, entry: &ConfigTree) -> ParseResult<NodeType> {
        common::node_type_with_fallback(entry)
    }

    fn template_information(&self, template: &ConfigTree) -> ParseResult<TemplateInformation> {
        common::template_information(template, Some(TemplateType::Metanode))
    }
}
