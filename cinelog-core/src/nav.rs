//! Screen routes and the movie-information lookup.

use crate::api::ApiClient;
use crate::types::{Movie, UserMovie};

/// A destination the client can navigate to.
///
/// `MovieInfo` carries the movie itself so the information screen renders
/// without a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Search,
    UserMovies(i64),
    Friends,
    Trending,
    MovieInfo(Movie),
}

impl Route {
    pub fn title(&self) -> &str {
        match self {
            Route::Search => "Search",
            Route::UserMovies(_) => "Movies",
            Route::Friends => "Friends",
            Route::Trending => "Trending",
            Route::MovieInfo(movie) => &movie.primary_title,
        }
    }
}

/// Back-navigable route history. Never empty.
#[derive(Debug, Clone)]
pub struct History {
    stack: Vec<Route>,
}

impl History {
    pub fn new(root: Route) -> Self {
        Self { stack: vec![root] }
    }

    /// The top-level screen the history started from.
    pub fn root(&self) -> &Route {
        &self.stack[0]
    }

    pub fn current(&self) -> &Route {
        // `stack` always holds at least the root.
        &self.stack[self.stack.len() - 1]
    }

    /// Pushes `route` unless it is already the current route.
    pub fn push(&mut self, route: Route) {
        if self.current() != &route {
            self.stack.push(route);
        }
    }

    /// Drops the current route. The root is never popped.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Replaces the whole history with `route`, for top-level screen switches.
    pub fn reset(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Fetches the catalog record for a rated item, falling back to what the item
/// itself knows when the lookup fails.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieLookup {
    pub movie_id: i64,
    pub fallback: Movie,
}

impl MovieLookup {
    pub fn for_item(item: &UserMovie) -> Self {
        Self { movie_id: item.movie_id, fallback: Movie::fallback_for(item) }
    }

    /// A lookup for a feed entry that only knows the id, title, and poster.
    pub fn titled(movie_id: i64, title: &str, poster_url: Option<String>) -> Self {
        Self::for_item(&UserMovie {
            movie_id,
            movie_title: title.to_owned(),
            rating: None,
            review: None,
            poster_url,
        })
    }

    /// Never fails: a failed lookup yields the fallback payload.
    pub async fn execute(self, api: &dyn ApiClient) -> Movie {
        match api.movie(self.movie_id).await {
            Ok(movie) => movie,
            Err(e) => {
                tracing::warn!(movie_id = self.movie_id, error = %e, "movie lookup failed; using list entry");
                self.fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_never_pops_the_root() {
        let mut history = History::new(Route::Search);
        history.push(Route::Friends);
        history.push(Route::Friends);
        assert_eq!(history.depth(), 2);
        assert!(history.back());
        assert!(!history.back());
        assert_eq!(history.current(), &Route::Search);
    }

    #[test]
    fn fallback_keeps_title_and_poster() {
        let item = UserMovie {
            movie_id: 9,
            movie_title: "Heat".into(),
            rating: Some(4.5),
            review: None,
            poster_url: Some("http://img/heat.jpg".into()),
        };
        let lookup = MovieLookup::for_item(&item);
        assert_eq!(lookup.fallback.id, 9);
        assert_eq!(lookup.fallback.primary_title, "Heat");
        assert_eq!(lookup.fallback.poster_url.as_deref(), Some("http://img/heat.jpg"));
    }
}
