//! Error types for the cache simulator.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Propagated I/O error opening/reading a trace or seed file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single trace line could not be parsed; the record is skipped, not fatal.
    #[error("parse error: {0}")]
    Parse(String),

    /// A line's rounded compressed size exceeds the set byte budget.
    #[error("capacity error: {0}")]
    Capacity(String),

    /// Eviction ran to completion but the set still lacks room; indicates a policy bug.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    /// CAMP history buffer insertion failed; logged and dropped, not fatal.
    #[error("CAMP history buffer error: {0}")]
    HistoryBufferFull(String),

    /// Bad runtime configuration (e.g. unreadable seed directory or malformed seed file).
    #[error("config error: {0}")]
    Config(String),
}
