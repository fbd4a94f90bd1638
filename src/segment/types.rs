//! Core types for the sealed-segment load path

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldId, FieldType};
use crate::segment::index::AnyIndex;

/// Raw column values for one field, as produced by the load pipeline
///
/// Vector payloads are row-major: `data` holds `rows * dimensions`
/// elements for float vectors and `rows * dimensions / 8` bytes for
/// binary vectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValues {
    Bool(Vec<bool>),
    Int64(Vec<i64>),
    Double(Vec<f64>),
    Keyword(Vec<String>),
    FloatVector { dimensions: usize, data: Vec<f32> },
    BinaryVector { dimensions: usize, data: Vec<u8> },
}

impl FieldValues {
    /// Number of whole rows in the payload
    ///
    /// A zero-dimension vector payload reports zero rows; schema
    /// validation rejects such fields before any load reaches them.
    pub fn rows(&self) -> usize {
        match self {
            FieldValues::Bool(v) => v.len(),
            FieldValues::Int64(v) => v.len(),
            FieldValues::Double(v) => v.len(),
            FieldValues::Keyword(v) => v.len(),
            FieldValues::FloatVector { dimensions, data } => {
                if *dimensions == 0 {
                    0
                } else {
                    data.len() / dimensions
                }
            }
            FieldValues::BinaryVector { dimensions, data } => {
                let stride = dimensions / 8;
                if stride == 0 {
                    0
                } else {
                    data.len() / stride
                }
            }
        }
    }

    /// Check that the payload length is a whole number of rows
    pub fn is_whole_rows(&self) -> bool {
        match self {
            FieldValues::FloatVector { dimensions, data } => {
                *dimensions > 0 && data.len() % dimensions == 0
            }
            FieldValues::BinaryVector { dimensions, data } => {
                let stride = dimensions / 8;
                stride > 0 && data.len() % stride == 0
            }
            _ => true,
        }
    }

    /// Check that the payload kind and dimensionality match a descriptor
    pub fn matches(&self, field_type: &FieldType) -> bool {
        match (self, field_type) {
            (FieldValues::Bool(_), FieldType::Bool) => true,
            (FieldValues::Int64(_), FieldType::Int64) => true,
            (FieldValues::Double(_), FieldType::Double) => true,
            (FieldValues::Keyword(_), FieldType::Keyword) => true,
            (
                FieldValues::FloatVector { dimensions, .. },
                FieldType::FloatVector {
                    dimensions: declared,
                    ..
                },
            ) => dimensions == declared,
            (
                FieldValues::BinaryVector { dimensions, .. },
                FieldType::BinaryVector {
                    dimensions: declared,
                },
            ) => dimensions == declared,
            _ => false,
        }
    }

    /// Payload heap size in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            FieldValues::Bool(v) => v.len(),
            FieldValues::Int64(v) => v.len() * std::mem::size_of::<i64>(),
            FieldValues::Double(v) => v.len() * std::mem::size_of::<f64>(),
            FieldValues::Keyword(v) => v.iter().map(|s| s.len()).sum(),
            FieldValues::FloatVector { data, .. } => data.len() * std::mem::size_of::<f32>(),
            FieldValues::BinaryVector { data, .. } => data.len(),
        }
    }

    /// Get the payload kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValues::Bool(_) => "bool",
            FieldValues::Int64(_) => "int64",
            FieldValues::Double(_) => "double",
            FieldValues::Keyword(_) => "keyword",
            FieldValues::FloatVector { .. } => "float_vector",
            FieldValues::BinaryVector { .. } => "binary_vector",
        }
    }

    /// Typed view over an int64 payload
    pub fn int64s(&self) -> Option<&[i64]> {
        match self {
            FieldValues::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Typed view over a float-vector payload as `(dimensions, data)`
    pub fn float_vectors(&self) -> Option<(usize, &[f32])> {
        match self {
            FieldValues::FloatVector { dimensions, data } => Some((*dimensions, data)),
            _ => None,
        }
    }
}

/// Load descriptor for one field's raw values
///
/// Consumed by `SealedSegment::load_field_data`; produced by the external
/// load pipeline from already-deserialized storage reads.
#[derive(Clone, Debug)]
pub struct LoadFieldDataInfo {
    pub field_id: FieldId,
    pub values: FieldValues,
}

impl LoadFieldDataInfo {
    pub fn new(field_id: FieldId, values: FieldValues) -> Self {
        Self { field_id, values }
    }
}

/// Load descriptor for a prebuilt index artifact
#[derive(Clone)]
pub struct LoadIndexInfo {
    pub field_id: FieldId,
    /// Opaque handle to the prebuilt artifact
    pub index: Arc<dyn AnyIndex>,
    /// Row count declared by the build pipeline, when known
    pub row_count: Option<usize>,
    /// Build parameters carried along for diagnostics and accessors
    pub params: HashMap<String, String>,
}

impl LoadIndexInfo {
    pub fn new(field_id: FieldId, index: Arc<dyn AnyIndex>) -> Self {
        Self {
            field_id,
            index,
            row_count: None,
            params: HashMap::new(),
        }
    }

    /// Declare the artifact's row count
    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    /// Attach a build parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Debug for LoadIndexInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadIndexInfo")
            .field("field_id", &self.field_id)
            .field("row_count", &self.row_count)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Field-data load progress of a segment
///
/// Tracks raw field data only; indexes load independently and may lag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// No field has data yet
    Empty,
    /// Some but not all declared fields have data
    Partial,
    /// Every declared field has data (trivially true for an empty schema)
    Full,
}
