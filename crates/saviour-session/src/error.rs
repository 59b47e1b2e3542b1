//! Session error types.

use thiserror::Error;

/// Errors that can occur while driving a protocol engine.
///
/// Protocol-level trouble (bad checksums, unknown kinds) never surfaces
/// here; it is answered on the wire with `NACK`. Only the transport itself
/// can fail a send/receive attempt.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The underlying byte transport failed.
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
}
