use crate::fault::FaultPolicy;

/// Default chunk capacity in rows.
pub const DEFAULT_CHUNK_ROWS: usize = 32 * 1024;

/// Configuration for a sealed segment.
///
/// The chunk capacity is fixed at segment construction and never changes;
/// the fault policy decides how failed invariant checks terminate.
#[derive(Clone, Debug)]
pub struct SegmentConfig {
    /// Rows per chunk for every field of the segment
    pub chunk_rows: usize,
    /// Invariant-checking policy threaded into every component
    pub fault: FaultPolicy,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            chunk_rows: DEFAULT_CHUNK_ROWS,
            fault: FaultPolicy::default(),
        }
    }
}

impl SegmentConfig {
    /// Create a configuration with the given chunk capacity
    pub fn new(chunk_rows: usize) -> Self {
        Self {
            chunk_rows,
            ..Default::default()
        }
    }

    /// Set the chunk capacity in rows
    pub fn with_chunk_rows(mut self, chunk_rows: usize) -> Self {
        self.chunk_rows = chunk_rows;
        self
    }

    /// Set the invariant-checking policy
    pub fn with_fault(mut self, fault: FaultPolicy) -> Self {
        self.fault = fault;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SegmentConfig::default();
        assert_eq!(config.chunk_rows, 32 * 1024);
    }

    #[test]
    fn test_config_builder() {
        let (fault, _log) = FaultPolicy::capturing();
        let config = SegmentConfig::new(1024).with_fault(fault);
        assert_eq!(config.chunk_rows, 1024);

        let config = SegmentConfig::default().with_chunk_rows(64);
        assert_eq!(config.chunk_rows, 64);
    }
}
