//! Sealed segment
//!
//! The immutable, fully-loaded segment variant. Construction freezes the
//! schema and chunk capacity; `load_field_data` and `load_index` are the
//! only write paths, and the caller publishes the segment to queries only
//! after all loads complete. After publication the segment is logically
//! immutable: readers take short read locks and hold data as `Arc`
//! clones.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::SegmentConfig;
use crate::fault::FaultPolicy;
use crate::schema::{FieldId, Schema};
use crate::segment::chunk::ChunkedColumn;
use crate::segment::index::{IndexEntry, IndexRegistry};
use crate::segment::interface::Segment;
use crate::segment::store::ChunkedFieldStore;
use crate::segment::types::{LoadFieldDataInfo, LoadIndexInfo, LoadState};

/// Create an owned sealed segment over a shared schema
///
/// Ownership belongs to the caller until it shares the segment out to
/// queries (typically by wrapping it in an `Arc` once loading finishes).
pub fn create_sealed_segment(schema: Arc<Schema>, config: SegmentConfig) -> SealedSegment {
    SealedSegment::new(schema, config)
}

struct SealedInner {
    store: ChunkedFieldStore,
    indexes: IndexRegistry,
    /// Established by the first field-data load; all later loads must agree
    row_count: Option<usize>,
}

pub struct SealedSegment {
    schema: Arc<Schema>,
    chunk_rows: usize,
    fault: FaultPolicy,
    // One lock over store, registry and row count keeps each
    // row-count comparison atomic with the insertion it guards.
    inner: RwLock<SealedInner>,
}

impl SealedSegment {
    pub fn new(schema: Arc<Schema>, config: SegmentConfig) -> Self {
        let SegmentConfig { chunk_rows, fault } = config;
        fault.assert_info(
            chunk_rows >= 1,
            "chunk capacity is at least one row",
            format_args!("chunk_rows = {chunk_rows}"),
        );
        Self {
            schema,
            chunk_rows,
            inner: RwLock::new(SealedInner {
                store: ChunkedFieldStore::new(chunk_rows, fault.clone()),
                indexes: IndexRegistry::new(fault.clone()),
                row_count: None,
            }),
            fault,
        }
    }

    /// Schema this segment was constructed against
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Established row count; 0 before any field load
    pub fn row_count(&self) -> usize {
        self.inner.read().row_count.unwrap_or(0)
    }

    /// Chunk capacity in rows, fixed at construction
    pub fn chunk_rows(&self) -> usize {
        self.chunk_rows
    }

    /// Append chunked raw values for one field
    ///
    /// The first load for any field establishes the segment's row count;
    /// every later load must agree. Repeating a load for the same field
    /// is a precondition violation, never a silent overwrite.
    pub fn load_field_data(&self, info: LoadFieldDataInfo) {
        let LoadFieldDataInfo { field_id, values } = info;

        let field = match self.schema.field(field_id) {
            Some(field) => field,
            None => self.fault.panic_info(format_args!(
                "{field_id} is not declared in the segment schema"
            )),
        };
        // Kind validation before any row arithmetic.
        self.fault.assert_info(
            values.matches(&field.field_type),
            "payload kind matches the field descriptor",
            format_args!(
                "field '{}' declares {} but the payload holds {}",
                field.name,
                field.field_type.storage_type(),
                values.kind_name()
            ),
        );
        let rows = values.rows();

        let mut inner = self.inner.write();
        if let Some(established) = inner.row_count {
            self.fault.assert_info(
                rows == established,
                "row count matches previously loaded fields",
                format_args!("{field_id} carries {rows} rows, segment has {established}"),
            );
        }
        if let Some(declared) = inner.indexes.entry(field_id).and_then(|e| e.row_count()) {
            self.fault.assert_info(
                rows == declared,
                "row count matches the attached index",
                format_args!("{field_id} carries {rows} rows, its index declares {declared}"),
            );
        }

        inner.store.insert(field_id, &field.field_type, &values);
        inner.row_count = Some(rows);
        let chunks = inner.store.column(field_id).map_or(0, |c| c.num_chunks());
        drop(inner);

        tracing::debug!(field = %field_id, rows, chunks, "loaded field data");
    }

    /// Attach a prebuilt index artifact for one field
    ///
    /// Does not affect raw field-data availability; indexes may lag field
    /// data or precede it.
    pub fn load_index(&self, info: LoadIndexInfo) {
        let LoadIndexInfo {
            field_id,
            index,
            row_count,
            params,
        } = info;

        self.fault.assert_info(
            self.schema.contains(field_id),
            "indexed field is declared in the schema",
            format_args!("{field_id} is not declared in the segment schema"),
        );
        let entry = IndexEntry::new(index, row_count, params);

        let mut inner = self.inner.write();
        if let (Some(declared), Some(established)) = (entry.row_count(), inner.row_count) {
            self.fault.assert_info(
                declared == established,
                "index row count matches the segment",
                format_args!("index for {field_id} declares {declared} rows, segment has {established}"),
            );
        }
        inner.indexes.attach(field_id, entry);
        drop(inner);

        tracing::debug!(field = %field_id, "attached index artifact");
    }

    /// Check whether a field has raw data loaded
    pub fn has_field_data(&self, field_id: FieldId) -> bool {
        self.inner.read().store.is_loaded(field_id)
    }

    /// Check whether a field has an index attached
    pub fn has_index(&self, field_id: FieldId) -> bool {
        self.inner.read().indexes.has_index(field_id)
    }

    /// Shared handle to a loaded field's column
    ///
    /// Asking for a field without data is a caller error and fails fast.
    pub fn column(&self, field_id: FieldId) -> Arc<ChunkedColumn> {
        match self.inner.read().store.column(field_id) {
            Some(column) => column,
            None => self
                .fault
                .panic_info(format_args!("{field_id} has no loaded field data")),
        }
    }

    /// Shared handle to a field's attached index entry
    ///
    /// Asking for a field without an index is a caller error and fails
    /// fast.
    pub fn index(&self, field_id: FieldId) -> Arc<IndexEntry> {
        match self.inner.read().indexes.entry(field_id) {
            Some(entry) => entry,
            None => self
                .fault
                .panic_info(format_args!("{field_id} has no attached index")),
        }
    }

    /// Number of chunks backing a loaded field
    pub fn num_chunks(&self, field_id: FieldId) -> usize {
        self.column(field_id).num_chunks()
    }

    /// Field-data load progress
    pub fn load_state(&self) -> LoadState {
        let loaded = self.inner.read().store.loaded_fields();
        if loaded == self.schema.len() {
            LoadState::Full
        } else if loaded == 0 {
            LoadState::Empty
        } else {
            LoadState::Partial
        }
    }

    /// Bytes held by loaded columns
    pub fn size_bytes(&self) -> usize {
        self.inner.read().store.size_bytes()
    }
}

impl Segment for SealedSegment {
    fn schema(&self) -> &Schema {
        SealedSegment::schema(self)
    }

    fn row_count(&self) -> usize {
        SealedSegment::row_count(self)
    }

    fn as_sealed(&self) -> Option<&SealedSegment> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::ViolationLog;
    use crate::schema::FieldType;
    use crate::segment::index::AnyIndex;
    use crate::segment::types::FieldValues;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    struct StubIndex;

    impl AnyIndex for StubIndex {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn test_schema() -> Arc<Schema> {
        Arc::new(
            Schema::builder()
                .add_field(FieldId(100), "id", FieldType::Int64)
                .add_field(FieldId(101), "vec", FieldType::float_vector(4))
                .build()
                .unwrap(),
        )
    }

    fn capturing_segment(chunk_rows: usize) -> (SealedSegment, ViolationLog) {
        let (fault, log) = FaultPolicy::capturing();
        let config = SegmentConfig::new(chunk_rows).with_fault(fault);
        (create_sealed_segment(test_schema(), config), log)
    }

    fn int_load(rows: usize) -> LoadFieldDataInfo {
        LoadFieldDataInfo::new(FieldId(100), FieldValues::Int64((0..rows as i64).collect()))
    }

    fn vec_load(rows: usize) -> LoadFieldDataInfo {
        LoadFieldDataInfo::new(
            FieldId(101),
            FieldValues::FloatVector {
                dimensions: 4,
                data: vec![0.5; rows * 4],
            },
        )
    }

    #[test]
    fn test_row_count_is_established_once() {
        let (segment, log) = capturing_segment(4);
        assert_eq!(segment.row_count(), 0);
        assert_eq!(segment.load_state(), LoadState::Empty);

        segment.load_field_data(int_load(10));
        assert_eq!(segment.row_count(), 10);
        assert_eq!(segment.load_state(), LoadState::Partial);

        segment.load_field_data(vec_load(10));
        assert_eq!(segment.row_count(), 10);
        assert_eq!(segment.load_state(), LoadState::Full);
        assert!(log.is_empty());
    }

    #[test]
    fn test_row_count_mismatch_fails() {
        let (segment, log) = capturing_segment(4);
        segment.load_field_data(int_load(10));

        let result = catch_unwind(AssertUnwindSafe(|| segment.load_field_data(vec_load(9))));
        assert!(result.is_err());
        assert!(log.violations()[0].message.contains("9 rows"));

        // The failed load left no trace.
        assert!(!segment.has_field_data(FieldId(101)));
        assert_eq!(segment.row_count(), 10);
    }

    #[test]
    fn test_undeclared_field_fails() {
        let (segment, log) = capturing_segment(4);
        let result = catch_unwind(AssertUnwindSafe(|| {
            segment.load_field_data(LoadFieldDataInfo::new(
                FieldId(999),
                FieldValues::Int64(vec![1]),
            ))
        }));
        assert!(result.is_err());
        assert!(log.violations()[0].check.contains("not declared"));
    }

    #[test]
    fn test_payload_kind_mismatch_fails() {
        let (segment, log) = capturing_segment(4);
        let result = catch_unwind(AssertUnwindSafe(|| {
            segment.load_field_data(LoadFieldDataInfo::new(
                FieldId(100),
                FieldValues::Double(vec![1.0]),
            ))
        }));
        assert!(result.is_err());
        assert!(log.violations()[0].message.contains("declares int64"));
    }

    #[test]
    fn test_index_before_field_data_checks_later_load() {
        let (segment, log) = capturing_segment(4);
        segment.load_index(
            LoadIndexInfo::new(FieldId(101), Arc::new(StubIndex)).with_row_count(8),
        );
        assert!(segment.has_index(FieldId(101)));
        assert!(!segment.has_field_data(FieldId(101)));

        // Field data arriving later must agree with the declared count.
        let result = catch_unwind(AssertUnwindSafe(|| segment.load_field_data(vec_load(9))));
        assert!(result.is_err());
        assert!(log.violations()[0].message.contains("its index declares 8"));

        segment.load_field_data(vec_load(8));
        assert_eq!(segment.row_count(), 8);
    }

    #[test]
    fn test_index_row_count_mismatch_fails() {
        let (segment, log) = capturing_segment(4);
        segment.load_field_data(int_load(10));

        let result = catch_unwind(AssertUnwindSafe(|| {
            segment.load_index(
                LoadIndexInfo::new(FieldId(100), Arc::new(StubIndex)).with_row_count(11),
            )
        }));
        assert!(result.is_err());
        assert!(log.violations()[0].message.contains("declares 11"));
        assert!(!segment.has_index(FieldId(100)));
    }

    #[test]
    fn test_index_without_declared_rows_attaches() {
        let (segment, _log) = capturing_segment(4);
        segment.load_field_data(int_load(10));
        segment.load_index(LoadIndexInfo::new(FieldId(100), Arc::new(StubIndex)));

        let entry = segment.index(FieldId(100));
        assert_eq!(entry.row_count(), None);
        assert!(entry.typed::<StubIndex>().is_some());
    }

    #[test]
    fn test_accessors_fail_fast_on_missing_data() {
        let (segment, log) = capturing_segment(4);
        assert!(catch_unwind(AssertUnwindSafe(|| segment.column(FieldId(100)))).is_err());
        assert!(catch_unwind(AssertUnwindSafe(|| segment.index(FieldId(100)))).is_err());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_zero_chunk_capacity_fails_at_construction() {
        let (fault, log) = FaultPolicy::capturing();
        let config = SegmentConfig::new(0).with_fault(fault);
        let result = catch_unwind(AssertUnwindSafe(|| {
            create_sealed_segment(test_schema(), config)
        }));
        assert!(result.is_err());
        assert!(log.violations()[0].check.contains("at least one row"));
    }

    #[test]
    fn test_size_bytes_tracks_loads() {
        let (segment, _log) = capturing_segment(4);
        assert_eq!(segment.size_bytes(), 0);
        segment.load_field_data(int_load(10));
        assert_eq!(segment.size_bytes(), 80);
        segment.load_field_data(vec_load(10));
        assert_eq!(segment.size_bytes(), 80 + 10 * 4 * 4);
    }
}
