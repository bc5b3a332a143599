//! Error types for the service client, the favorites store and the audio resource.

use thiserror::Error;

/// Errors returned by the HTTP collaborators.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service reported the record already exists (HTTP 409).
    #[error("Already exists")]
    Conflict,

    /// The service reported the record does not exist (HTTP 404).
    #[error("Not found")]
    NotFound,

    /// Any other non-success response.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The configured base URL is unusable.
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}

/// Errors surfaced by favorites add/remove/refresh.
///
/// A failed call never changes the local mapping.
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Track {track_id} is already a favorite")]
    Conflict { track_id: String },

    #[error("Track {track_id} is not a favorite")]
    NotFound { track_id: String },

    #[error("Favorites request failed: {0}")]
    Network(#[source] ApiError),
}

impl FavoritesError {
    /// Map a collaborator failure for `track_id` into the store taxonomy.
    pub fn from_api(track_id: &str, err: ApiError) -> Self {
        match err {
            ApiError::Conflict => FavoritesError::Conflict {
                track_id: track_id.to_string(),
            },
            ApiError::NotFound => FavoritesError::NotFound {
                track_id: track_id.to_string(),
            },
            other => FavoritesError::Network(other),
        }
    }
}

/// Errors from the audio-rendering resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Autoplay was refused or the media could not be fetched or decoded.
    #[error("Audio resource unavailable: {0}")]
    Unavailable(String),

    /// The resource thread has exited.
    #[error("Audio resource disconnected")]
    Disconnected,
}
