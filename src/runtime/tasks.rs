//! Network work spawned on the tokio runtime.
//!
//! Results come back to the event loop over a std channel so the app model
//! and controller are only touched from the UI thread.

use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use tokio::runtime::Handle;
use tracing::debug;

use crate::api::{CatalogApi, FavoritesApi, HttpApi};
use crate::catalog::{Mood, TimeOfDayTracks, Track};
use crate::error::{ApiError, FavoritesError};
use crate::favorites::FavoritesStore;

#[derive(Debug)]
pub enum TaskResult {
    Tracks {
        generation: u64,
        result: Result<Vec<Track>, ApiError>,
    },
    Search {
        generation: u64,
        result: Result<Vec<Track>, ApiError>,
    },
    TimeOfDay {
        generation: u64,
        result: Result<TimeOfDayTracks, ApiError>,
    },
    /// `generation` is set when the Favorites view asked for the list.
    FavoritesRefreshed {
        generation: Option<u64>,
        result: Result<Vec<Track>, FavoritesError>,
    },
    FavoriteAdded(Result<Track, FavoritesError>),
    FavoriteRemoved {
        track_id: String,
        result: Result<(), FavoritesError>,
    },
}

pub struct Tasks<C = HttpApi, F = HttpApi> {
    runtime: Handle,
    catalog: Arc<C>,
    favorites: Arc<FavoritesStore<F>>,
    tx: Sender<TaskResult>,
}

impl<C, F> Tasks<C, F>
where
    C: CatalogApi + 'static,
    F: FavoritesApi + 'static,
{
    pub fn new(
        runtime: Handle,
        catalog: Arc<C>,
        favorites: Arc<FavoritesStore<F>>,
        tx: Sender<TaskResult>,
    ) -> Self {
        Self {
            runtime,
            catalog,
            favorites,
            tx,
        }
    }

    pub fn favorites(&self) -> &FavoritesStore<F> {
        &self.favorites
    }

    fn spawn<Fut>(&self, fut: Fut)
    where
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            // The receiver is gone once the UI has quit.
            let _ = tx.send(fut.await);
        });
    }

    pub fn load_mood(&self, generation: u64, mood: Mood) {
        debug!(generation, mood = %mood, "Loading tracks by mood");
        let catalog = self.catalog.clone();
        self.spawn(async move {
            TaskResult::Tracks {
                generation,
                result: catalog.tracks_by_mood(mood).await,
            }
        });
    }

    pub fn load_time_of_day(&self, generation: u64) {
        debug!(generation, "Loading time-of-day collection");
        let catalog = self.catalog.clone();
        self.spawn(async move {
            TaskResult::TimeOfDay {
                generation,
                result: catalog.tracks_by_time_of_day().await,
            }
        });
    }

    pub fn search(&self, generation: u64, query: String) {
        debug!(generation, query = %query, "Searching");
        let catalog = self.catalog.clone();
        self.spawn(async move {
            TaskResult::Search {
                generation,
                result: catalog.search(&query).await,
            }
        });
    }

    pub fn refresh_favorites(&self, generation: Option<u64>) {
        let store = self.favorites.clone();
        self.spawn(async move {
            TaskResult::FavoritesRefreshed {
                generation,
                result: store.refresh().await,
            }
        });
    }

    pub fn add_favorite(&self, track: Track) {
        let store = self.favorites.clone();
        self.spawn(async move { TaskResult::FavoriteAdded(store.add(&track).await) });
    }

    pub fn remove_favorite(&self, track_id: String) {
        let store = self.favorites.clone();
        self.spawn(async move {
            let result = store.remove(&track_id).await;
            TaskResult::FavoriteRemoved { track_id, result }
        });
    }
}
