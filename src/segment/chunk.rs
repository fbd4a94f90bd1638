//! Fixed-capacity chunks of column data
//!
//! A field's data is an ordered sequence of chunks, each holding up to the
//! segment's chunk capacity of rows. Chunking bounds per-allocation size
//! for large columnar loads, permits streamed loading, and lines up with
//! the batch access pattern of query execution.

use serde::{Deserialize, Serialize};

use crate::schema::FieldType;
use crate::segment::types::FieldValues;

/// A contiguous block of up to `capacity` rows of one field
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldChunk {
    capacity: usize,
    values: FieldValues,
}

impl FieldChunk {
    /// Allocate an empty chunk for the given field kind
    fn with_capacity(field_type: &FieldType, capacity: usize) -> Self {
        let values = match field_type {
            FieldType::Bool => FieldValues::Bool(Vec::with_capacity(capacity)),
            FieldType::Int64 => FieldValues::Int64(Vec::with_capacity(capacity)),
            FieldType::Double => FieldValues::Double(Vec::with_capacity(capacity)),
            FieldType::Keyword => FieldValues::Keyword(Vec::with_capacity(capacity)),
            FieldType::FloatVector { dimensions, .. } => FieldValues::FloatVector {
                dimensions: *dimensions,
                data: Vec::with_capacity(capacity * dimensions),
            },
            FieldType::BinaryVector { dimensions } => FieldValues::BinaryVector {
                dimensions: *dimensions,
                data: Vec::with_capacity(capacity * (dimensions / 8)),
            },
        };
        Self { capacity, values }
    }

    /// Rows currently held
    pub fn rows(&self) -> usize {
        self.values.rows()
    }

    /// Fixed row capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.rows() >= self.capacity
    }

    fn remaining(&self) -> usize {
        self.capacity - self.rows()
    }

    /// Typed view over the chunk's values
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn size_bytes(&self) -> usize {
        self.values.size_bytes()
    }

    /// Copy `rows` rows starting at `start_row` out of `src`
    ///
    /// The column validates the payload kind before any append reaches a
    /// chunk, so the kinds always line up here.
    fn append_from(&mut self, src: &FieldValues, start_row: usize, rows: usize) {
        match (&mut self.values, src) {
            (FieldValues::Bool(dst), FieldValues::Bool(src)) => {
                dst.extend_from_slice(&src[start_row..start_row + rows]);
            }
            (FieldValues::Int64(dst), FieldValues::Int64(src)) => {
                dst.extend_from_slice(&src[start_row..start_row + rows]);
            }
            (FieldValues::Double(dst), FieldValues::Double(src)) => {
                dst.extend_from_slice(&src[start_row..start_row + rows]);
            }
            (FieldValues::Keyword(dst), FieldValues::Keyword(src)) => {
                dst.extend_from_slice(&src[start_row..start_row + rows]);
            }
            (
                FieldValues::FloatVector { dimensions, data },
                FieldValues::FloatVector { data: src, .. },
            ) => {
                let stride = *dimensions;
                data.extend_from_slice(&src[start_row * stride..(start_row + rows) * stride]);
            }
            (
                FieldValues::BinaryVector { dimensions, data },
                FieldValues::BinaryVector { data: src, .. },
            ) => {
                let stride = *dimensions / 8;
                data.extend_from_slice(&src[start_row * stride..(start_row + rows) * stride]);
            }
            _ => unreachable!("column validated the payload kind"),
        }
    }
}

/// Ordered chunk sequence for one field, plus a running row count
///
/// Append-only: `append` is reached solely from `LoadFieldData`. Chunk
/// lookup by index is O(1).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkedColumn {
    field_type: FieldType,
    chunk_rows: usize,
    chunks: Vec<FieldChunk>,
    rows: usize,
}

impl ChunkedColumn {
    pub fn new(field_type: FieldType, chunk_rows: usize) -> Self {
        Self {
            field_type,
            chunk_rows,
            chunks: Vec::new(),
            rows: 0,
        }
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Total rows across all chunks
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, index: usize) -> Option<&FieldChunk> {
        self.chunks.get(index)
    }

    pub fn chunks(&self) -> &[FieldChunk] {
        &self.chunks
    }

    /// Locate a row as `(chunk index, offset within the chunk)`
    pub fn location_of(&self, row: usize) -> (usize, usize) {
        (row / self.chunk_rows, row % self.chunk_rows)
    }

    pub fn size_bytes(&self) -> usize {
        self.chunks.iter().map(FieldChunk::size_bytes).sum()
    }

    /// Append all rows of `values`, extending the last chunk to capacity
    /// before allocating the next
    pub fn append(&mut self, values: &FieldValues) {
        debug_assert!(values.matches(&self.field_type));
        let total = values.rows();
        let mut copied = 0;

        while copied < total {
            if self.chunks.last().map_or(true, FieldChunk::is_full) {
                self.chunks
                    .push(FieldChunk::with_capacity(&self.field_type, self.chunk_rows));
            }
            let chunk = self.chunks.last_mut().expect("chunk was just ensured");
            let take = chunk.remaining().min(total - copied);
            chunk.append_from(values, copied, take);
            copied += take;
        }

        self.rows += total;
    }
}
