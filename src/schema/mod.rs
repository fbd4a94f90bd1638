//! Schema definitions for segment fields

mod descriptor;
mod field_type;

pub use descriptor::{FieldDescriptor, FieldId, Schema, SchemaBuilder};
pub use field_type::{FieldType, VectorMetric};
