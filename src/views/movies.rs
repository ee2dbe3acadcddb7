use std::sync::Arc;
use tracing::{debug, info};

use crate::client::{ApiResult, CatalogApi};
use crate::models::{DirectorDetails, GenreDetails, Movie, Synopsis};

/// The movie catalog page together with the user's favorites.
pub struct MovieListView {
    api: Arc<dyn CatalogApi>,
    movies: Vec<Movie>,
    favorites: Vec<String>,
}

/// Which mutation a toggle issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

impl FavoriteChange {
    pub fn label(&self) -> &'static str {
        match self {
            FavoriteChange::Added => "Added to",
            FavoriteChange::Removed => "Removed from",
        }
    }
}

impl MovieListView {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            movies: Vec::new(),
            favorites: Vec::new(),
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Fetch movies and favorites concurrently. Each list is stored as soon
    /// as its own request succeeds; the first failure is returned once both
    /// have settled.
    pub async fn load(&mut self) -> ApiResult<()> {
        let (movies, favorites) = tokio::join!(self.api.movies(), self.api.favorites());

        let mut first_error = None;
        match movies {
            Ok(movies) => {
                info!(count = movies.len(), "Loaded movies");
                self.movies = movies;
            }
            Err(e) => first_error = Some(e),
        }
        match favorites {
            Ok(favorites) => self.favorites = favorites,
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub async fn refresh_favorites(&mut self) -> ApiResult<()> {
        self.favorites = self.api.favorites().await?;
        debug!(count = self.favorites.len(), "Favorites refreshed");
        Ok(())
    }

    /// Exact, case-sensitive membership in the last fetched favorites.
    pub fn is_favorite(&self, movie_id: &str) -> bool {
        self.favorites.iter().any(|id| id == movie_id)
    }

    pub async fn add_favorite(&mut self, movie_id: &str) -> ApiResult<()> {
        self.api.add_favorite(movie_id).await?;
        self.refresh_favorites().await
    }

    pub async fn remove_favorite(&mut self, movie_id: &str) -> ApiResult<()> {
        self.api.remove_favorite(movie_id).await?;
        self.refresh_favorites().await
    }

    /// Add the movie if it is not a favorite, remove it otherwise, then
    /// refetch the favorites list.
    pub async fn toggle_favorite(&mut self, movie_id: &str) -> ApiResult<FavoriteChange> {
        if self.is_favorite(movie_id) {
            self.remove_favorite(movie_id).await?;
            Ok(FavoriteChange::Removed)
        } else {
            self.add_favorite(movie_id).await?;
            Ok(FavoriteChange::Added)
        }
    }

    pub fn find(&self, movie_id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == movie_id)
    }

    /// Loaded movies the user has marked as favorite, in catalog order
    pub fn favorite_movies(&self) -> impl Iterator<Item = &Movie> + '_ {
        self.movies.iter().filter(move |m| self.is_favorite(&m.id))
    }

    pub fn genre(&self, movie: &Movie) -> GenreDetails {
        movie.genre_details()
    }

    pub fn director(&self, movie: &Movie) -> DirectorDetails {
        movie.director_details()
    }

    pub fn synopsis(&self, movie: &Movie) -> Synopsis {
        movie.synopsis()
    }
}
