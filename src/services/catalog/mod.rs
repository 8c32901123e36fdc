/// Movie catalog abstraction
///
/// The catalog is the authoritative source of movie metadata. Recommendation
/// enrichment only needs `movie_details`; the listing operations back the
/// browse/search routes.
use crate::{
    error::AppResult,
    models::{CatalogId, DiscoverFilter, Genre, MovieList, MoviePage, MovieRecord, TimeWindow},
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Read-only movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Full record for one movie
    ///
    /// Returns `None` both when the catalog has no such movie and when the
    /// lookup fails in transit. Transport failures are logged, never returned.
    async fn movie_details(&self, id: &CatalogId) -> Option<MovieRecord>;

    /// Free-text title search
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage>;

    async fn trending(&self, window: TimeWindow, page: u32) -> AppResult<MoviePage>;

    /// One of the curated listings (popular, top rated, ...)
    async fn movie_list(&self, list: MovieList, page: u32) -> AppResult<MoviePage>;

    /// Filtered listing, sorted by popularity
    async fn discover(&self, filter: &DiscoverFilter, page: u32) -> AppResult<MoviePage>;

    async fn genres(&self) -> AppResult<Vec<Genre>>;
}
