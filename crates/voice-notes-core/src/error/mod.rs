use crate::library::EntryId;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failure reported by a gateway implementation (audio device, key-value
/// store, share target).
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The gateway attempted the operation and it failed.
    #[error("Gateway operation failed: {reason} {location}")]
    Failed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The resource behind the gateway is not available (no device, no
    /// such handle, storage unreachable).
    #[error("Gateway resource unavailable: {reason} {location}")]
    Unavailable {
        /// Description of what is missing.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Conditions reported at the recording manager boundary.
///
/// Every gateway failure is converted into one of these before it reaches
/// the caller. None of them leave the manager in an inconsistent state.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Microphone permission was refused. State returns to Idle.
    #[error("Microphone permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture or playback could not be started or stopped.
    #[error("Audio device failure: {source} {location}")]
    DeviceFailure {
        /// The underlying gateway error.
        #[source]
        source: GatewayError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture stopped but no playable entry could be produced from it.
    /// The partial recording is discarded.
    #[error("Failed to finalize recording: {source} {location}")]
    FinalizationFailure {
        /// The underlying gateway error.
        #[source]
        source: GatewayError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading or writing the persisted library failed. In-memory state
    /// stays authoritative.
    #[error("Persistence failure: {source} {location}")]
    PersistenceFailure {
        /// The underlying gateway error.
        #[source]
        source: GatewayError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The library could not be encoded or decoded.
    #[error("Library serialization error: {reason} {location}")]
    Serialization {
        /// Description of the encoding error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A positional operation targeted an index outside the library.
    #[error("Index {index} out of range for library of length {len} {location}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Library length at the time of the request.
        len: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No entry with the given id exists in the library.
    #[error("Unknown recording {id} {location}")]
    UnknownEntry {
        /// Requested entry id.
        id: EntryId,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An entry with the same id is already in the library.
    #[error("Recording {id} already exists {location}")]
    DuplicateEntry {
        /// Conflicting entry id.
        id: EntryId,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`LibraryError`].
pub type Result<T> = std::result::Result<T, LibraryError>;
