//! Service collaborators: track browsing/search and per-user favorites.
//!
//! The traits are the seam the rest of the client depends on; `HttpApi` is
//! the production implementation talking JSON over HTTP.

mod client;

use async_trait::async_trait;

use crate::catalog::{Mood, TimeOfDayTracks, Track};
use crate::error::ApiError;

pub use client::{HttpApi, download_client};

/// Result type for collaborator calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Track lookup by mood, by time of day, and by free text.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn tracks_by_mood(&self, mood: Mood) -> Result<Vec<Track>>;

    async fn tracks_by_time_of_day(&self) -> Result<TimeOfDayTracks>;

    /// Free-text search; an empty result is not an error.
    async fn search(&self, query: &str) -> Result<Vec<Track>>;
}

/// Server-side favorites for one user.
#[async_trait]
pub trait FavoritesApi: Send + Sync {
    /// Newest first.
    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Track>>;

    /// Fails with [`ApiError::Conflict`] when the track is already stored.
    async fn add_favorite(&self, user_id: &str, track: &Track) -> Result<Track>;

    /// Fails with [`ApiError::NotFound`] when the track is not stored.
    async fn remove_favorite(&self, user_id: &str, track_id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests;
