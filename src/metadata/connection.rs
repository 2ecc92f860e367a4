use serde::Serialize;

/// Node id used by connections that cross the workflow boundary.
pub const BOUNDARY_ID: i32 = -1;

/// An edge between two sibling nodes of one workflow level.
///
/// Ids are local ids within the owning workflow. The resolved endpoints are
/// indices into that workflow's node list; use
/// [`Workflow::source_of`](crate::metadata::Workflow::source_of) and
/// [`Workflow::destination_of`](crate::metadata::Workflow::destination_of)
/// to reach the nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub(crate) source_id: i32,
    pub(crate) dest_id: i32,
    pub(crate) source_port: i32,
    pub(crate) dest_port: i32,
    #[serde(skip)]
    pub(crate) source_node: Option<usize>,
    #[serde(skip)]
    pub(crate) dest_node: Option<usize>,
}

impl Connection {
    pub fn source_id(&self) -> i32 {
        self.source_id
    }

    pub fn dest_id(&self) -> i32 {
        self.dest_id
    }

    pub fn source_port(&self) -> i32 {
        self.source_port
    }

    pub fn dest_port(&self) -> i32 {
        self.dest_port
    }

    pub fn is_from_boundary(&self) -> bool {
        self.source_id == BOUNDARY_ID
    }

    pub fn is_to_boundary(&self) -> bool {
        self.dest_id == BOUNDARY_ID
    }

    pub fn has_source_reference(&self) -> bool {
        self.source_node.is_some()
    }

    pub fn has_dest_reference(&self) -> bool {
        self.dest_node.is_some()
    }
}
