use crate::api::{CatalogApi, FavoritesApi};
use crate::app::{App, View};
use crate::runtime::tasks::Tasks;

/// Kick off the first fetches: favorites (for hearts) and the start view.
pub fn start<C, F>(app: &mut App, tasks: &Tasks<C, F>)
where
    C: CatalogApi + 'static,
    F: FavoritesApi + 'static,
{
    if app.view != View::Favorites {
        tasks.refresh_favorites(None);
    }
    reload_view(app, tasks);
}

/// Fetch the list for the current view, tagged with a fresh list generation.
pub fn reload_view<C, F>(app: &mut App, tasks: &Tasks<C, F>)
where
    C: CatalogApi + 'static,
    F: FavoritesApi + 'static,
{
    match app.view {
        View::Mood => {
            let generation = app.begin_load();
            tasks.load_mood(generation, app.mood);
        }
        View::TimeOfDay => {
            let generation = app.begin_load();
            tasks.load_time_of_day(generation);
        }
        View::Search => match app.last_search.clone() {
            Some(query) => {
                let generation = app.begin_load();
                tasks.search(generation, query);
            }
            None => app.set_notice("press / to search"),
        },
        View::Favorites => {
            let generation = app.begin_load();
            tasks.refresh_favorites(Some(generation));
        }
    }
}
