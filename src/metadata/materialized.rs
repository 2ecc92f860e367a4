//! Result-side view of an optional field.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Returned when a caller reads a field that was not requested.
///
/// Distinct from `None`: a workflow without annotations and a
/// workflow whose annotations were never read must not look alike.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("field '{field}' was not read; enable it in the extraction configuration")]
pub struct FieldNotRead {
    pub field: &'static str,
}

/// A field that was either requested and read, or never requested.
///
/// Requested-but-absent values are modelled by the payload itself, e.g.
/// `Materialized<Option<T>>::Value(None)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Materialized<T> {
    #[default]
    NotMaterialized,
    Value(T),
}

impl<T> Materialized<T> {
    pub fn is_materialized(&self) -> bool {
        matches!(self, Materialized::Value(_))
    }

    pub fn is_not_materialized(&self) -> bool {
        !self.is_materialized()
    }

    /// The value, or [`FieldNotRead`] naming `field`.
    pub fn get(&self, field: &'static str) -> Result<&T, FieldNotRead> {
        match self {
            Materialized::Value(v) => Ok(v),
            Materialized::NotMaterialized => Err(FieldNotRead { field }),
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Materialized::Value(v) => Some(v),
            Materialized::NotMaterialized => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Materialized<U> {
        match self {
            Materialized::Value(v) => Materialized::Value(f(v)),
            Materialized::NotMaterialized => Materialized::NotMaterialized,
        }
    }
}

/// Serializes the payload. Fields holding this type are expected to carry
/// `#[serde(skip_serializing_if = "Materialized::is_not_materialized")]` so
/// unrequested values never reach the output.
impl<T: Serialize> Serialize for Materialized<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Materialized::Value(v) => v.serialize(serializer),
            Materialized::NotMaterialized => serializer.serialize_none(),
        }
    }
}
