//! Favorites store: the single owner of the user's favorited tracks.
//!
//! Every consumer shares one [`FavoritesStore`] and reads snapshots from it;
//! mutations go through `add`, `remove` and `refresh` only.

mod store;

pub use store::FavoritesStore;
