//! Index registry
//!
//! Owns at most one prebuilt index artifact per field. The artifact is
//! opaque to the segment: the registry stores it, validates ownership,
//! and hands out references; it never interprets the internals.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::fault::FaultPolicy;
use crate::schema::FieldId;

/// Type-erased handle to a prebuilt index artifact
///
/// Implemented by the index-build collaborator; consumers recover the
/// concrete type through [`IndexEntry::typed`].
pub trait AnyIndex: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    /// Row count the artifact knows about itself, if any
    fn row_count(&self) -> Option<usize> {
        None
    }
}

/// An attached artifact plus the metadata it was loaded with
#[derive(Clone)]
pub struct IndexEntry {
    index: Arc<dyn AnyIndex>,
    row_count: Option<usize>,
    params: HashMap<String, String>,
}

impl IndexEntry {
    /// Combine an artifact with its load descriptor metadata
    ///
    /// The declared row count wins over the artifact's own, when both are
    /// present.
    pub fn new(
        index: Arc<dyn AnyIndex>,
        declared_rows: Option<usize>,
        params: HashMap<String, String>,
    ) -> Self {
        let row_count = declared_rows.or_else(|| index.row_count());
        Self {
            index,
            row_count,
            params,
        }
    }

    /// The opaque artifact handle
    pub fn index(&self) -> &Arc<dyn AnyIndex> {
        &self.index
    }

    /// Row count known for this artifact, if any
    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    /// Build parameters carried by the load descriptor
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Typed accessor negotiated with the index-build collaborator
    pub fn typed<T: 'static>(&self) -> Option<&T> {
        self.index.as_any().downcast_ref::<T>()
    }
}

/// Mapping from field id to at most one index artifact
///
/// No replacement semantics: attaching a second index for a field is a
/// precondition violation, never an update. Callers needing replacement
/// build a new segment.
pub struct IndexRegistry {
    fault: FaultPolicy,
    entries: HashMap<FieldId, Arc<IndexEntry>>,
}

impl IndexRegistry {
    pub fn new(fault: FaultPolicy) -> Self {
        Self {
            fault,
            entries: HashMap::new(),
        }
    }

    /// Attach an artifact for `field_id`; fails fast if one is present
    pub fn attach(&mut self, field_id: FieldId, entry: IndexEntry) {
        self.fault.assert_info(
            !self.entries.contains_key(&field_id),
            "field is not already indexed",
            format_args!("{field_id} already has an attached index"),
        );
        self.entries.insert(field_id, Arc::new(entry));
    }

    /// Shared handle to a field's entry, if attached
    pub fn entry(&self, field_id: FieldId) -> Option<Arc<IndexEntry>> {
        self.entries.get(&field_id).cloned()
    }

    pub fn has_index(&self, field_id: FieldId) -> bool {
        self.entries.contains_key(&field_id)
    }

    /// Number of fields with an attached index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
