//! Chunked field store
//!
//! Maps field ids to their chunked columns. Each field is populated
//! exactly once, during `LoadFieldData`, and read concurrently afterwards;
//! columns are handed out as `Arc` clones so readers hold no locks.

use std::collections::HashMap;
use std::sync::Arc;

use crate::fault::FaultPolicy;
use crate::schema::{FieldId, FieldType};
use crate::segment::chunk::ChunkedColumn;
use crate::segment::types::FieldValues;

/// In-memory chunked storage for a segment's field columns.
pub struct ChunkedFieldStore {
    chunk_rows: usize,
    fault: FaultPolicy,
    columns: HashMap<FieldId, Arc<ChunkedColumn>>,
}

impl ChunkedFieldStore {
    pub fn new(chunk_rows: usize, fault: FaultPolicy) -> Self {
        Self {
            chunk_rows,
            fault,
            columns: HashMap::new(),
        }
    }

    /// Chunk a payload into a fresh column for `field_id`
    ///
    /// Fails fast if the field already has data, if the payload kind does
    /// not match the descriptor, or if the payload is ragged or empty.
    pub fn insert(&mut self, field_id: FieldId, field_type: &FieldType, values: &FieldValues) {
        self.fault.assert_info(
            !self.columns.contains_key(&field_id),
            "field is not already loaded",
            format_args!("{field_id} already has field data"),
        );
        self.fault.assert_info(
            values.matches(field_type),
            "payload kind matches the field descriptor",
            format_args!(
                "{field_id} declares {} but the payload holds {}",
                field_type.storage_type(),
                values.kind_name()
            ),
        );
        self.fault.assert_info(
            values.is_whole_rows(),
            "payload length is a whole number of rows",
            format_args!("ragged payload for {field_id}"),
        );
        self.fault.assert_info(
            values.rows() > 0,
            "payload holds at least one row",
            format_args!("empty payload for {field_id}"),
        );

        let mut column = ChunkedColumn::new(field_type.clone(), self.chunk_rows);
        column.append(values);
        self.columns.insert(field_id, Arc::new(column));
    }

    /// Shared handle to a field's column, if loaded
    pub fn column(&self, field_id: FieldId) -> Option<Arc<ChunkedColumn>> {
        self.columns.get(&field_id).cloned()
    }

    pub fn is_loaded(&self, field_id: FieldId) -> bool {
        self.columns.contains_key(&field_id)
    }

    /// Number of fields with data
    pub fn loaded_fields(&self) -> usize {
        self.columns.len()
    }

    /// Total bytes across all loaded columns
    pub fn size_bytes(&self) -> usize {
        self.columns.values().map(|c| c.size_bytes()).sum()
    }
}
