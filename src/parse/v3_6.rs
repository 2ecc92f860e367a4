//! Formats 3.6 through 4.0.

use super::{ParseResult, WorkflowParser, common};
use crate::metadata::{AuthorInformation, NodeType};
use crate::tree::ConfigTree;
use crate::version::Era;

/// Introduces the author block; node entries may still lack `node_type`.
#[derive(Debug, Default)]
pub struct V3_6Parser;

impl WorkflowParser for V3_6Parser {
    fn era(&self) -> Era {
        Era::V3_6
    }

    fn author_information(&self, workflow: &ConfigTree) -> ParseResult<AuthorInformation> {
        common::author_information(workflow)
    }

    fn node_type(&self, entry: &ConfigTree) -> ParseResult<NodeType> {
        common::node_type_with_fallback(entry)
    }
}
