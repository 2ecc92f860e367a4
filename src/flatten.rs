//! Flattened export view of a finished result.
//!
//! Flattening produces a new value whose top-level node list holds every node
//! of every nesting level in pre-order. Connections only make sense within a
//! single level, so the copy carries none. Metanodes and components stay in
//! the list but their nested workflows are reduced to their own fields.

use regex::Regex;

use crate::error::Result;
use crate::metadata::{
    Materialized, MetanodeMetadata, NodeMetadata, SubnodeMetadata, TemplateMetadata, Workflow,
    WorkflowMetadata,
};

impl WorkflowMetadata {
    /// A flattened copy; `self` is left untouched.
    pub fn flatten(&self) -> WorkflowMetadata {
        self.flatten_with(&[])
    }

    /// Like [`WorkflowMetadata::flatten`], dropping native nodes whose factory
    /// class matches any of `patterns`.
    pub fn flatten_excluding(&self, patterns: &[&str]) -> Result<WorkflowMetadata> {
        Ok(self.flatten_with(&compile(patterns)?))
    }

    fn flatten_with(&self, exclude: &[Regex]) -> WorkflowMetadata {
        WorkflowMetadata {
            format_version: self.format_version,
            workflow: flatten_workflow(&self.workflow, exclude),
            author_information: self.author_information.clone(),
            svg: self.svg,
            artifacts: self.artifacts.clone(),
            credentials: self.credentials.clone(),
            variables: self.variables.clone(),
            workflow_set_meta: self.workflow_set_meta.clone(),
            workflow_configuration: self.workflow_configuration.clone(),
            openapi: self.openapi.clone(),
        }
    }
}

impl TemplateMetadata {
    pub fn flatten(&self) -> TemplateMetadata {
        self.flatten_with(&[])
    }

    pub fn flatten_excluding(&self, patterns: &[&str]) -> Result<TemplateMetadata> {
        Ok(self.flatten_with(&compile(patterns)?))
    }

    fn flatten_with(&self, exclude: &[Regex]) -> TemplateMetadata {
        TemplateMetadata {
            workflow: self.workflow.flatten_with(exclude),
            template_information: self.template_information.clone(),
            component: self.component.clone(),
        }
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    Ok(patterns
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

fn flatten_workflow(workflow: &Workflow, exclude: &[Regex]) -> Workflow {
    let mut flat = shallow_workflow(workflow);
    if let Materialized::Value(nodes) = &workflow.nodes {
        let mut collected = Vec::with_capacity(workflow.count_nodes_recursive());
        collect(nodes, exclude, &mut collected);
        tracing::debug!("Flattened {} nodes", collected.len());
        flat.nodes = Materialized::Value(collected);
    }
    flat
}

/// Pre-order walk over every level below `nodes`.
fn collect(nodes: &[NodeMetadata], exclude: &[Regex], out: &mut Vec<NodeMetadata>) {
    for node in nodes {
        if !is_excluded(node, exclude) {
            out.push(shallow_node(node));
        }
        if let Some(Materialized::Value(children)) = node.workflow().map(|w| &w.nodes) {
            collect(children, exclude, out);
        }
    }
}

fn is_excluded(node: &NodeMetadata, exclude: &[Regex]) -> bool {
    node.factory()
        .is_some_and(|factory| exclude.iter().any(|re| re.is_match(factory)))
}

fn shallow_node(node: &NodeMetadata) -> NodeMetadata {
    match node {
        NodeMetadata::Native(native) => NodeMetadata::Native(native.clone()),
        NodeMetadata::Metanode(metanode) => NodeMetadata::Metanode(MetanodeMetadata {
            id: metanode.id.clone(),
            annotation: metanode.annotation.clone(),
            template_link: metanode.template_link.clone(),
            workflow: shallow_workflow(&metanode.workflow),
        }),
        NodeMetadata::Subnode(subnode) => NodeMetadata::Subnode(SubnodeMetadata {
            id: subnode.id.clone(),
            annotation: subnode.annotation.clone(),
            template_link: subnode.template_link.clone(),
            custom_description: subnode.custom_description.clone(),
            model_parameters: subnode.model_parameters.clone(),
            workflow: shallow_workflow(&subnode.workflow),
        }),
    }
}

/// The workflow's own fields without its nodes and connections.
fn shallow_workflow(workflow: &Workflow) -> Workflow {
    Workflow {
        version: workflow.version.clone(),
        created_by: workflow.created_by.clone(),
        name: workflow.name.clone(),
        description: workflow.description.clone(),
        annotations: workflow.annotations.clone(),
        nodes: Materialized::NotMaterialized,
        connections: Materialized::NotMaterialized,
        unexpected_files: workflow.unexpected_files.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{AuthorInformation, NativeNodeMetadata, NodeProvenance};
    use crate::version::FormatVersion;

    fn native(id: &str, factory: &str) -> NodeMetadata {
        NodeMetadata::Native(NativeNodeMetadata {
            id: id.into(),
            annotation: None,
            name: None,
            factory: factory.into(),
            global_node_id: factory.into(),
            provenance: NodeProvenance::default(),
            custom_description: None,
            model_parameters: Materialized::NotMaterialized,
        })
    }

    fn level(nodes: Vec<NodeMetadata>) -> Workflow {
        Workflow {
            version: "4.1.0".into(),
            created_by: None,
            name: None,
            description: None,
            annotations: vec![],
            nodes: Materialized::Value(nodes),
            connections: Materialized::Value(vec![]),
            unexpected_files: Materialized::NotMaterialized,
        }
    }

    fn sample() -> WorkflowMetadata {
        let metanode = NodeMetadata::Metanode(MetanodeMetadata {
            id: "3".into(),
            annotation: None,
            template_link: None,
            workflow: level(vec![
                native("3:1", "org.example.io.CsvReaderFactory"),
                native("3:2", "org.example.FilterFactory"),
            ]),
        });
        WorkflowMetadata {
            format_version: FormatVersion::V4_1,
            workflow: level(vec![native("7", "org.example.io.CsvWriterFactory"), metanode]),
            author_information: AuthorInformation::default(),
            svg: None,
            artifacts: vec![],
            credentials: vec![],
            variables: vec![],
            workflow_set_meta: Materialized::NotMaterialized,
            workflow_configuration: Materialized::NotMaterialized,
            openapi: Materialized::NotMaterialized,
        }
    }

    fn ids(metadata: &WorkflowMetadata) -> Vec<&str> {
        metadata.nodes().unwrap().iter().map(NodeMetadata::id).collect()
    }

    #[test]
    fn collects_every_level_in_pre_order() {
        let original = sample();
        let flat = original.flatten();
        assert_eq!(ids(&flat), vec!["7", "3", "3:1", "3:2"]);
        assert_eq!(flat.nodes().unwrap().len(), original.workflow().count_nodes_recursive());
        assert!(flat.connections().is_err());

        let container = flat.workflow().node("3").unwrap().unwrap();
        assert!(container.workflow().unwrap().nodes().is_err());

        assert_eq!(ids(&original), vec!["7", "3"]);
        assert!(original.connections().is_ok());
    }

    #[test]
    fn excludes_matching_factories() {
        let flat = sample().flatten_excluding(&[r"\.io\."]).unwrap();
        assert_eq!(ids(&flat), vec!["3", "3:2"]);
    }

    #[test]
    fn bad_patterns_are_reported() {
        let err = sample().flatten_excluding(&["("]).unwrap_err();
        assert_eq!(err.code(), "W002");
    }
}
