//! Sealed-segment storage
//!
//! An immutable segment composes a chunked field store and an index
//! registry behind the read-only [`Segment`] interface. The two load
//! operations are the only write path and run during a bounded load
//! phase, before the segment is published to concurrent queries.
//!
//! # Architecture
//!
//! - `FieldChunk` / `ChunkedColumn`: fixed-capacity blocks of one field's
//!   values
//! - `ChunkedFieldStore`: field id → column, populated exactly once per
//!   field
//! - `IndexRegistry`: field id → at most one opaque index artifact
//! - `SealedSegment`: the concrete immutable variant and its load
//!   lifecycle

mod chunk;
mod index;
mod interface;
mod sealed;
mod store;
mod types;

pub use chunk::{ChunkedColumn, FieldChunk};
pub use index::{AnyIndex, IndexEntry, IndexRegistry};
pub use interface::Segment;
pub use sealed::{create_sealed_segment, SealedSegment};
pub use store::ChunkedFieldStore;
pub use types::{FieldValues, LoadFieldDataInfo, LoadIndexInfo, LoadState};
