//! petgraph-based directed graph over one workflow level.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::materialized::FieldNotRead;
use super::{Connection, NodeMetadata, Workflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortLabel {
    pub source_port: i32,
    pub dest_port: i32,
}

/// Sibling nodes and the connections between them. Connections touching the
/// workflow boundary have no endpoint on this level and are left out.
pub struct NodeGraph<'a> {
    pub graph: DiGraph<&'a NodeMetadata, PortLabel>,
    pub node_indices: HashMap<&'a str, NodeIndex>,
}

impl<'a> NodeGraph<'a> {
    pub fn build(workflow: &'a Workflow) -> Result<Self, FieldNotRead> {
        let nodes = workflow.nodes()?;
        let connections = workflow.connections()?;

        let mut graph = DiGraph::new();
        let mut by_position = Vec::with_capacity(nodes.len());
        let mut node_indices = HashMap::new();

        for node in nodes {
            let idx = graph.add_node(node);
            by_position.push(idx);
            node_indices.insert(node.id(), idx);
        }

        for connection in connections {
            let endpoints = (connection.source_node, connection.dest_node);
            if let (Some(s), Some(t)) = endpoints {
                graph.add_edge(by_position[s], by_position[t], label(connection));
            }
        }

        Ok(NodeGraph { graph, node_indices })
    }

    pub fn successors(&self, node_id: &str) -> Vec<(&'a NodeMetadata, PortLabel)> {
        self.neighbors(node_id, Direction::Outgoing)
    }

    pub fn predecessors(&self, node_id: &str) -> Vec<(&'a NodeMetadata, PortLabel)> {
        self.neighbors(node_id, Direction::Incoming)
    }

    pub fn incoming_count(&self, node_id: &str) -> usize {
        self.predecessors(node_id).len()
    }

    pub fn outgoing_count(&self, node_id: &str) -> usize {
        self.successors(node_id).len()
    }

    fn neighbors(&self, node_id: &str, direction: Direction) -> Vec<(&'a NodeMetadata, PortLabel)> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        self.graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (self.graph[other], *edge.weight())
            })
            .collect()
    }
}

fn label(connection: &Connection) -> PortLabel {
    PortLabel {
        source_port: connection.source_port,
        dest_port: connection.dest_port,
    }
}
