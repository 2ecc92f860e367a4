use super::{IncompleteMetadata, Staged};
use crate::metadata::{
    ComponentMetadata, TemplateInformation, TemplateMetadata, TemplateType, WorkflowMetadata,
};

#[derive(Default)]
pub(crate) struct TemplateMetadataBuilder {
    pub(crate) workflow: Staged<WorkflowMetadata>,
    pub(crate) template_information: Staged<TemplateInformation>,
    pub(crate) component: Staged<ComponentMetadata>,
}

impl TemplateMetadataBuilder {
    const ENTITY: &'static str = "template";

    pub(crate) fn build(self) -> Result<TemplateMetadata, IncompleteMetadata> {
        let e = Self::ENTITY;
        let template_information = self.template_information.require(e, "template_information")?;
        let component = match template_information.template_type {
            TemplateType::Component => Some(self.component.require(e, "component")?),
            TemplateType::Metanode if self.component.is_set() => {
                return Err(IncompleteMetadata::SetWhileDisabled {
                    entity: e,
                    field: "component",
                });
            }
            TemplateType::Metanode => None,
        };
        Ok(TemplateMetadata {
            workflow: self.workflow.require(e, "workflow")?,
            template_information,
            component,
        })
    }
}
