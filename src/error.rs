//! Probe error taxonomy.
//!
//! Every step of the probe reports failure through [`ProbeError`]. The kind
//! tells which step failed; the message carries the driver's explanation.

/// Errors that can occur while probing a document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The endpoint was unreachable, credentials were rejected, or the
    /// handshake timed out.
    #[error("connection error: {0}")]
    Connection(String),

    /// The store rejected the write or the connection dropped mid-write.
    #[error("write error: {0}")]
    Write(String),

    /// A read or count could not be completed.
    #[error("query error: {0}")]
    Query(String),

    /// Anything the driver surfaces that is not tied to a transport step,
    /// such as a document that cannot be encoded or decoded.
    #[error("error: {0}")]
    Other(String),
}

pub type Result<T> = core::result::Result<T, ProbeError>;
