//! Staging builders.
//!
//! Every entity is accumulated in a mutable builder while the walker fills it
//! in, then validated and consumed into its immutable metadata type. Each
//! field is [`Staged`]: a field whose capability is enabled but which was
//! never set is a bug in the walker, reported as [`IncompleteMetadata`].

mod node;
mod template;
mod workflow;

pub(crate) use node::{MetanodeBuilder, NativeNodeBuilder, SubnodeBuilder};
pub(crate) use template::TemplateMetadataBuilder;
pub(crate) use workflow::{WorkflowBuilder, WorkflowMetadataBuilder};

use thiserror::Error;

use crate::metadata::Materialized;

/// A staging builder was finalized in an inconsistent state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IncompleteMetadata {
    #[error("{entity}.{field} is enabled but was never populated")]
    Unset {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}.{field} was populated although its capability is disabled")]
    SetWhileDisabled {
        entity: &'static str,
        field: &'static str,
    },
}

/// Staging state of one field.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum Staged<T> {
    /// Never populated.
    #[default]
    Unset,
    /// Populated, and the source has no value.
    Absent,
    Present(T),
}

impl<T> Staged<T> {
    pub(crate) fn set(&mut self, value: T) {
        *self = Staged::Present(value);
    }

    pub(crate) fn set_option(&mut self, value: Option<T>) {
        *self = match value {
            Some(v) => Staged::Present(v),
            None => Staged::Absent,
        };
    }

    pub(crate) fn is_set(&self) -> bool {
        !matches!(self, Staged::Unset)
    }

    /// Finalizes a field that must always carry a value.
    pub(crate) fn require(
        self,
        entity: &'static str,
        field: &'static str,
    ) -> Result<T, IncompleteMetadata> {
        match self {
            Staged::Present(v) => Ok(v),
            Staged::Unset | Staged::Absent => Err(IncompleteMetadata::Unset { entity, field }),
        }
    }

    /// Finalizes an always-read field whose value may be absent.
    pub(crate) fn optional(
        self,
        entity: &'static str,
        field: &'static str,
    ) -> Result<Option<T>, IncompleteMetadata> {
        match self {
            Staged::Present(v) => Ok(Some(v)),
            Staged::Absent => Ok(None),
            Staged::Unset => Err(IncompleteMetadata::Unset { entity, field }),
        }
    }

    /// Finalizes a gated field whose value may be absent.
    pub(crate) fn materialize(
        self,
        enabled: bool,
        entity: &'static str,
        field: &'static str,
    ) -> Result<Materialized<Option<T>>, IncompleteMetadata> {
        if !enabled {
            return self.disabled(entity, field);
        }
        self.optional(entity, field).map(Materialized::Value)
    }

    fn disabled<U>(
        self,
        entity: &'static str,
        field: &'static str,
    ) -> Result<Materialized<U>, IncompleteMetadata> {
        match self {
            Staged::Unset => Ok(Materialized::NotMaterialized),
            _ => Err(IncompleteMetadata::SetWhileDisabled { entity, field }),
        }
    }
}

impl<T: Default> Staged<T> {
    /// Finalizes a gated collection-like field; absent means empty.
    pub(crate) fn materialize_value(
        self,
        enabled: bool,
        entity: &'static str,
        field: &'static str,
    ) -> Result<Materialized<T>, IncompleteMetadata> {
        if !enabled {
            return self.disabled(entity, field);
        }
        match self {
            Staged::Present(v) => Ok(Materialized::Value(v)),
            Staged::Absent => Ok(Materialized::Value(T::default())),
            Staged::Unset => Err(IncompleteMetadata::Unset { entity, field }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_enabled_field_is_a_defect() {
        let staged: Staged<String> = Staged::Unset;
        assert_eq!(
            staged.materialize(true, "workflow", "name"),
            Err(IncompleteMetadata::Unset {
                entity: "workflow",
                field: "name"
            })
        );
    }

    #[test]
    fn disabled_fields_are_not_materialized() {
        let staged: Staged<Vec<String>> = Staged::Unset;
        assert_eq!(
            staged.materialize_value(false, "workflow", "nodes"),
            Ok(Materialized::NotMaterialized)
        );
    }

    #[test]
    fn populating_a_disabled_field_is_a_defect() {
        let mut staged = Staged::Unset;
        staged.set(vec![1]);
        assert!(matches!(
            staged.materialize_value(false, "workflow", "nodes"),
            Err(IncompleteMetadata::SetWhileDisabled { .. })
        ));
    }

    #[test]
    fn absent_values_stay_distinct_from_unread() {
        let mut staged: Staged<String> = Staged::Unset;
        staged.set_option(None);
        assert!(staged.is_set());
        assert_eq!(
            staged.materialize(true, "node", "annotation"),
            Ok(Materialized::Value(None))
        );

        let mut collection: Staged<Vec<u8>> = Staged::Unset;
        collection.set_option(None);
        assert_eq!(
            collection.materialize_value(true, "workflow", "nodes"),
            Ok(Materialized::Value(vec![]))
        );
    }

    #[test]
    fn required_fields_need_a_value() {
        let mut staged: Staged<String> = Staged::Unset;
        staged.set_option(None);
        assert!(staged.require("node", "id").is_err());
    }
}
