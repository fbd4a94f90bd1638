//! Field type definitions
//!
//! Defines the data kinds a segment can hold and how many bytes one row
//! of each kind occupies.

use serde::{Deserialize, Serialize};

/// Field data kind
///
/// Determines how a field's values are chunked, strided, and queried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Boolean scalar
    Bool,

    /// 64-bit signed integer scalar
    ///
    /// Supports scalar filtering and output projection.
    Int64,

    /// 64-bit floating point scalar
    Double,

    /// Exact-match string scalar
    ///
    /// The only variable-width kind; rows are whole strings.
    Keyword,

    /// Dense float vector for similarity search
    FloatVector {
        /// Number of dimensions per row
        dimensions: usize,
        /// Similarity metric used by indexes over this field
        #[serde(default)]
        metric: VectorMetric,
    },

    /// Packed binary vector, one bit per dimension
    ///
    /// Dimensions must be a multiple of 8 so a row is a whole number of
    /// bytes.
    BinaryVector {
        /// Number of dimensions per row (bits)
        dimensions: usize,
    },
}

/// Vector similarity metric
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorMetric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
}

impl FieldType {
    /// Create a float vector field with the default metric
    pub fn float_vector(dimensions: usize) -> Self {
        FieldType::FloatVector {
            dimensions,
            metric: VectorMetric::default(),
        }
    }

    /// Create a binary vector field
    pub fn binary_vector(dimensions: usize) -> Self {
        FieldType::BinaryVector { dimensions }
    }

    /// Check if this kind holds vectors
    pub fn is_vector(&self) -> bool {
        matches!(
            self,
            FieldType::FloatVector { .. } | FieldType::BinaryVector { .. }
        )
    }

    /// Check if this kind supports similarity search
    pub fn supports_similarity_search(&self) -> bool {
        self.is_vector()
    }

    /// Check if this kind supports scalar filtering
    pub fn supports_scalar_filter(&self) -> bool {
        matches!(
            self,
            FieldType::Bool | FieldType::Int64 | FieldType::Double | FieldType::Keyword
        )
    }

    /// Vector dimensionality, if this is a vector kind
    pub fn dimensions(&self) -> Option<usize> {
        match self {
            FieldType::FloatVector { dimensions, .. } => Some(*dimensions),
            FieldType::BinaryVector { dimensions } => Some(*dimensions),
            _ => None,
        }
    }

    /// Bytes one row occupies, for fixed-width kinds
    ///
    /// `Keyword` rows are variable-width and report `None`; every other
    /// kind has a stride shared by all chunks of the field.
    pub fn fixed_stride(&self) -> Option<usize> {
        match self {
            FieldType::Bool => Some(1),
            FieldType::Int64 => Some(std::mem::size_of::<i64>()),
            FieldType::Double => Some(std::mem::size_of::<f64>()),
            FieldType::Keyword => None,
            FieldType::FloatVector { dimensions, .. } => {
                Some(dimensions * std::mem::size_of::<f32>())
            }
            FieldType::BinaryVector { dimensions } => Some(dimensions / 8),
        }
    }

    /// Get the storage kind name
    pub fn storage_type(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int64 => "int64",
            FieldType::Double => "double",
            FieldType::Keyword => "keyword",
            FieldType::FloatVector { .. } => "float_vector",
            FieldType::BinaryVector { .. } => "binary_vector",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert!(FieldType::Int64.supports_scalar_filter());
        assert!(!FieldType::Int64.is_vector());
        assert_eq!(FieldType::Int64.fixed_stride(), Some(8));
        assert_eq!(FieldType::Bool.fixed_stride(), Some(1));
        assert_eq!(FieldType::Keyword.fixed_stride(), None);
        assert_eq!(FieldType::Int64.dimensions(), None);
    }

    #[test]
    fn test_vector_kinds() {
        let vec = FieldType::float_vector(128);
        assert!(vec.is_vector());
        assert!(vec.supports_similarity_search());
        assert!(!vec.supports_scalar_filter());
        assert_eq!(vec.dimensions(), Some(128));
        assert_eq!(vec.fixed_stride(), Some(512));

        let bin = FieldType::binary_vector(256);
        assert_eq!(bin.fixed_stride(), Some(32));
        assert_eq!(bin.storage_type(), "binary_vector");
    }

    #[test]
    fn test_serialization() {
        let field = FieldType::float_vector(384);
        let json = serde_json::to_string(&field).unwrap();
        assert!(json.contains("\"float_vector\""));
        assert!(json.contains("\"dimensions\":384"));

        let deserialized: FieldType = serde_json::from_str(&json).unwrap();
        assert_eq!(field, deserialized);
    }
}
