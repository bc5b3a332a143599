use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::{Mood, TimeOfDayTracks, Track};
use crate::config::ApiSettings;
use crate::error::ApiError;

use super::{CatalogApi, FavoritesApi, Result};

/// JSON-over-HTTP client for the track service.
#[derive(Clone)]
pub struct HttpApi {
    http: Client,
    base_url: String,
}

#[derive(Serialize)]
struct MoodQuery<'a> {
    mood: &'a str,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct AddFavoriteBody<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    track: &'a Track,
}

#[derive(Serialize)]
struct RemoveFavoriteBody<'a> {
    user_id: &'a str,
    track_id: &'a str,
}

impl HttpApi {
    /// Build a client from settings; the base URL must be http(s).
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let url = settings.base_url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(ApiError::InvalidUrl("URL cannot be empty".into()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(format!("moodwave/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_tracks<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<Track>> {
        let url = self.url("tracks/");
        let response = self.http.post(&url).json(body).send().await?;
        decode(response, "tracks").await
    }
}

/// Client for audio downloads: same connect timeout and user agent as the
/// api client, but the whole-request limit is `download_timeout_secs`
/// (0 for none) so large files on slow links are not cut off.
pub fn download_client(settings: &ApiSettings, download_timeout_secs: u64) -> Result<Client> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .user_agent(format!("moodwave/{}", env!("CARGO_PKG_VERSION")));
    if download_timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(download_timeout_secs));
    }
    Ok(builder.build()?)
}

/// Decode a success body or map the status into an [`ApiError`].
async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse {what} response: {e}")));
    }
    Err(status_error(response).await)
}

async fn status_error(response: Response) -> ApiError {
    match response.status().as_u16() {
        409 => ApiError::Conflict,
        404 => ApiError::NotFound,
        status => ApiError::Server {
            status,
            message: response.text().await.unwrap_or_default(),
        },
    }
}

#[async_trait]
impl CatalogApi for HttpApi {
    async fn tracks_by_mood(&self, mood: Mood) -> Result<Vec<Track>> {
        debug!(mood = %mood, "Fetching tracks by mood");
        let tracks = self.post_tracks(&MoodQuery { mood: mood.as_str() }).await?;
        debug!(mood = %mood, count = tracks.len(), "Fetched tracks by mood");
        Ok(tracks)
    }

    async fn tracks_by_time_of_day(&self) -> Result<TimeOfDayTracks> {
        let url = self.url("tracks/mood/");
        debug!(url = %url, "Fetching time-of-day collection");
        let response = self.http.get(&url).send().await?;
        decode(response, "time-of-day").await
    }

    async fn search(&self, query: &str) -> Result<Vec<Track>> {
        debug!(query = %query, "Searching tracks");
        self.post_tracks(&SearchQuery { query }).await
    }
}

#[async_trait]
impl FavoritesApi for HttpApi {
    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Track>> {
        let url = self.url("favorites/");
        debug!(url = %url, user_id = %user_id, "Fetching favorites");
        let response = self
            .http
            .get(&url)
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        decode(response, "favorites").await
    }

    async fn add_favorite(&self, user_id: &str, track: &Track) -> Result<Track> {
        let url = self.url("favorites/");
        debug!(track_id = %track.track_id, "Adding favorite");
        let response = self
            .http
            .post(&url)
            .json(&AddFavoriteBody { user_id, track })
            .send()
            .await?;
        decode(response, "favorite").await
    }

    async fn remove_favorite(&self, user_id: &str, track_id: &str) -> Result<()> {
        let url = self.url("favorites/delete/");
        debug!(track_id = %track_id, "Removing favorite");
        let response = self
            .http
            .post(&url)
            .json(&RemoveFavoriteBody { user_id, track_id })
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }
}
