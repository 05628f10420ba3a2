//! Unified error type for the Draftroom server.

use draftroom_core::DraftError;
use draftroom_protocol::ProtocolError;
use draftroom_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `draftroom` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid event).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A draft-level error (unknown room, unauthorized start).
    #[error(transparent)]
    Draft(#[from] DraftError),
}
