use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::api::FavoritesApi;
use crate::catalog::Track;
use crate::error::FavoritesError;

/// Favorited tracks keyed by `track_id`, most recent first.
///
/// Updates are applied only after the service confirms them. Each operation
/// takes an epoch when it starts; a completed add/remove is discarded if a
/// newer operation on the same id has already been applied, and a refresh
/// keeps the local view of ids touched by operations that started after it.
pub struct FavoritesStore<A> {
    api: A,
    user_id: String,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Track>,
    order: VecDeque<String>,
    epoch: u64,
    /// Epochs of operations still waiting on the service.
    pending: BTreeSet<u64>,
    touched: HashMap<String, u64>,
    refreshed: u64,
}

impl Inner {
    fn begin(&mut self) -> u64 {
        self.epoch += 1;
        self.pending.insert(self.epoch);
        self.epoch
    }

    /// Mark `epoch` done and forget touches no in-flight operation can observe.
    fn finish(&mut self, epoch: u64) {
        self.pending.remove(&epoch);
        let oldest = self.pending.first().copied().unwrap_or(u64::MAX);
        self.touched.retain(|_, e| *e >= oldest);
    }

    fn superseded(&self, track_id: &str, epoch: u64) -> bool {
        self.touched.get(track_id).is_some_and(|&e| e > epoch)
    }

    fn insert_front(&mut self, track: Track) {
        let id = track.track_id.clone();
        if self.entries.insert(id.clone(), track).is_some() {
            self.order.retain(|x| x != &id);
        }
        self.order.push_front(id);
    }

    fn remove(&mut self, track_id: &str) -> bool {
        if self.entries.remove(track_id).is_some() {
            self.order.retain(|x| x != track_id);
            true
        } else {
            false
        }
    }

    fn replace(&mut self, tracks: Vec<Track>, epoch: u64) {
        let mut entries: HashMap<String, Track> = HashMap::with_capacity(tracks.len());
        let mut order: VecDeque<String> = VecDeque::with_capacity(tracks.len());
        for t in tracks {
            if entries.contains_key(&t.track_id) {
                continue;
            }
            order.push_back(t.track_id.clone());
            entries.insert(t.track_id.clone(), t);
        }

        // Mutations that started after this refresh win over its snapshot.
        let newer: Vec<String> = self
            .touched
            .iter()
            .filter(|&(_, &e)| e > epoch)
            .map(|(id, _)| id.clone())
            .collect();
        for id in newer {
            match self.entries.get(&id) {
                Some(local) => {
                    if !entries.contains_key(&id) {
                        order.push_front(id.clone());
                    }
                    entries.insert(id, local.clone());
                }
                None => {
                    if entries.remove(&id).is_some() {
                        order.retain(|x| x != &id);
                    }
                }
            }
        }

        self.entries = entries;
        self.order = order;
        self.refreshed = epoch;
    }

    fn snapshot(&self) -> Vec<Track> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect()
    }
}

impl<A: FavoritesApi> FavoritesStore<A> {
    pub fn new(api: A, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// O(1) membership as of the most recently completed add/remove/refresh.
    pub fn is_favorite(&self, track_id: &str) -> bool {
        self.lock().entries.contains_key(track_id)
    }

    /// Ordered copy of the mapping, most recent first.
    pub fn snapshot(&self) -> Vec<Track> {
        self.lock().snapshot()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn tracked_ids(&self) -> usize {
        self.lock().touched.len()
    }

    /// Drop every entry (session teardown).
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
        inner.touched.clear();
    }

    /// Replace the mapping with the service's list. Safe to call repeatedly.
    pub async fn refresh(&self) -> Result<Vec<Track>, FavoritesError> {
        let epoch = self.lock().begin();

        let result = self.api.list_favorites(&self.user_id).await;

        let mut inner = self.lock();
        let tracks = match result {
            Ok(tracks) => tracks,
            Err(e) => {
                inner.finish(epoch);
                warn!(error = %e, "Failed to refresh favorites");
                return Err(FavoritesError::Network(e));
            }
        };
        if epoch < inner.refreshed {
            inner.finish(epoch);
            debug!(epoch, applied = inner.refreshed, "Discarding superseded favorites refresh");
            return Ok(inner.snapshot());
        }
        inner.replace(tracks, epoch);
        inner.finish(epoch);
        info!(user_id = %self.user_id, count = inner.entries.len(), "Favorites refreshed");
        Ok(inner.snapshot())
    }

    /// Store `track` as a favorite and return the service's record.
    ///
    /// Fails with `Conflict` if the track is already a favorite.
    pub async fn add(&self, track: &Track) -> Result<Track, FavoritesError> {
        let epoch = {
            let mut inner = self.lock();
            if inner.entries.contains_key(&track.track_id) {
                return Err(FavoritesError::Conflict {
                    track_id: track.track_id.clone(),
                });
            }
            inner.begin()
        };

        let result = self.api.add_favorite(&self.user_id, track).await;

        let mut inner = self.lock();
        let stored = match result {
            Ok(stored) => stored,
            Err(e) => {
                inner.finish(epoch);
                warn!(track_id = %track.track_id, error = %e, "Failed to add favorite");
                return Err(FavoritesError::from_api(&track.track_id, e));
            }
        };
        if inner.superseded(&track.track_id, epoch) {
            debug!(track_id = %track.track_id, epoch, "Discarding superseded favorite add");
        } else {
            inner.touched.insert(track.track_id.clone(), epoch);
            inner.insert_front(stored.clone());
            info!(track_id = %track.track_id, "Added favorite");
        }
        inner.finish(epoch);
        Ok(stored)
    }

    /// Remove `track_id` from the favorites.
    ///
    /// Fails with `NotFound` if it is not a favorite.
    pub async fn remove(&self, track_id: &str) -> Result<(), FavoritesError> {
        let epoch = {
            let mut inner = self.lock();
            if !inner.entries.contains_key(track_id) {
                return Err(FavoritesError::NotFound {
                    track_id: track_id.to_string(),
                });
            }
            inner.begin()
        };

        let result = self.api.remove_favorite(&self.user_id, track_id).await;

        let mut inner = self.lock();
        if let Err(e) = result {
            inner.finish(epoch);
            warn!(track_id = %track_id, error = %e, "Failed to remove favorite");
            return Err(FavoritesError::from_api(track_id, e));
        }
        if inner.superseded(track_id, epoch) {
            debug!(track_id = %track_id, epoch, "Discarding superseded favorite removal");
        } else {
            inner.touched.insert(track_id.to_string(), epoch);
            inner.remove(track_id);
            info!(track_id = %track_id, "Removed favorite");
        }
        inner.finish(epoch);
        Ok(())
    }
}
