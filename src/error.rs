use std::io;

/// Errors that can occur while reading a trace file or replaying it
/// against a heap under measurement.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Reading or writing the trace file failed.
    #[error("trace file I/O error: {0}")]
    Io(#[from] io::Error),

    /// The trace file's header or record stream does not conform to
    /// the documented layout (truncated file, unknown opcode, record
    /// count mismatch).
    #[error("malformed trace: {0}")]
    MalformedTrace(String),

    /// A heap's node allocator ran out of capacity. Indicates the
    /// trace's `max_live_nodes` header field understated the true
    /// peak live-node count.
    #[error("allocator exhausted: requested capacity {requested}, available {available}")]
    AllocatorExhausted {
        /// Capacity that would have been required to satisfy the request.
        requested: usize,
        /// Capacity actually available in the allocator.
        available: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReplayError>;
