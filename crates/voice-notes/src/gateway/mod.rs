mod json_file_store;
mod system_share;

pub(crate) use {json_file_store::JsonFileStore, system_share::SystemShare};

use std::panic::Location;

use error_location::ErrorLocation;
use voice_notes_core::GatewayError;

#[track_caller]
pub(crate) fn gateway_failure(reason: impl Into<String>) -> GatewayError {
    GatewayError::Failed {
        reason: reason.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
pub(crate) fn gateway_unavailable(reason: impl Into<String>) -> GatewayError {
    GatewayError::Unavailable {
        reason: reason.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}
