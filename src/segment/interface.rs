//! Segment interface
//!
//! The read-only capability set shared by every segment variant and
//! consumed by the query executor. Mutation belongs to concrete variants
//! and is reached through [`Segment::as_sealed`], an explicit capability
//! check at the load-pipeline boundary, never a blind downcast.

use crate::schema::Schema;
use crate::segment::sealed::SealedSegment;

pub trait Segment: Send + Sync {
    /// Schema this segment was constructed against
    fn schema(&self) -> &Schema;

    /// Established row count; 0 before any field load
    fn row_count(&self) -> usize;

    /// Capability check for the load pipeline
    ///
    /// Only the sealed variant answers; the query executor has no reason
    /// to call this.
    fn as_sealed(&self) -> Option<&SealedSegment> {
        None
    }
}
