pub mod config;
pub mod error;
pub mod fault;
pub mod schema;
pub mod segment;

pub use config::{SegmentConfig, DEFAULT_CHUNK_ROWS};
pub use error::{CuttleError, Result};
pub use fault::{FaultAction, FaultPolicy, Violation, ViolationLog};
pub use schema::{FieldDescriptor, FieldId, FieldType, Schema, SchemaBuilder, VectorMetric};
pub use segment::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
