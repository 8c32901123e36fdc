/// TMDB (The Movie Database) catalog client
///
/// Authenticates with the v3 `api_key` query parameter. Every call is a plain
/// GET against `{api_url}/{path}`.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogId, DiscoverFilter, Genre, MovieList, MoviePage, MovieRecord, TimeWindow},
    services::catalog::CatalogClient,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;

/// Extra sections requested alongside movie details
const DETAIL_APPENDS: &str = "videos,credits,images";

type QueryParams = Vec<(&'static str, String)>;

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    /// GETs a catalog endpoint and decodes the JSON body
    ///
    /// A 404 maps to `AppError::NotFound` so callers can tell a missing
    /// movie apart from an unavailable catalog. Transport errors are stripped
    /// of their URL, which carries the API key.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &QueryParams) -> AppResult<T> {
        let url = self.endpoint(path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", path)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await.map_err(|e| e.without_url())?)
    }

    async fn get_page(&self, path: &str, params: QueryParams) -> AppResult<MoviePage> {
        let page: MoviePage = self.get_json(path, &params).await?;

        tracing::info!(
            path = %path,
            page = page.page,
            results = page.results.len(),
            provider = "tmdb",
            "Catalog listing fetched"
        );

        Ok(page)
    }
}

fn check_page(page: u32) -> AppResult<()> {
    if page == 0 {
        return Err(AppError::InvalidInput(
            "Page numbers start at 1".to_string(),
        ));
    }
    Ok(())
}

fn details_path(id: &CatalogId) -> String {
    format!("movie/{}", id)
}

fn search_params(query: &str, page: u32) -> QueryParams {
    vec![
        ("query", query.to_string()),
        ("page", page.to_string()),
        ("include_adult", "false".to_string()),
    ]
}

fn discover_params(filter: &DiscoverFilter, page: u32) -> QueryParams {
    let mut params = vec![
        ("page", page.to_string()),
        ("sort_by", "popularity.desc".to_string()),
        ("include_adult", "false".to_string()),
    ];

    if let Some(genre) = filter.genre.as_deref().filter(|g| !g.is_empty()) {
        params.push(("with_genres", genre.to_string()));
    }
    if let Some(year) = filter.year {
        params.push(("primary_release_year", year.to_string()));
    }
    if let Some(rating) = filter.min_rating {
        params.push(("vote_average.gte", rating.to_string()));
    }

    params
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn movie_details(&self, id: &CatalogId) -> Option<MovieRecord> {
        let path = details_path(id);
        let params = vec![("append_to_response", DETAIL_APPENDS.to_string())];

        match self.get_json::<MovieRecord>(&path, &params).await {
            Ok(record) => {
                tracing::debug!(catalog_id = %id, provider = "tmdb", "Movie details fetched");
                Some(record)
            }
            Err(AppError::NotFound(_)) => {
                tracing::debug!(catalog_id = %id, provider = "tmdb", "Movie not found");
                None
            }
            Err(e) => {
                tracing::error!(
                    catalog_id = %id,
                    error = %e,
                    provider = "tmdb",
                    "Movie details lookup failed"
                );
                None
            }
        }
    }

    async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        check_page(page)?;

        self.get_page("search/movie", search_params(query.trim(), page))
            .await
    }

    async fn trending(&self, window: TimeWindow, page: u32) -> AppResult<MoviePage> {
        check_page(page)?;
        let path = format!("trending/movie/{}", window.as_str());
        self.get_page(&path, vec![("page", page.to_string())]).await
    }

    async fn movie_list(&self, list: MovieList, page: u32) -> AppResult<MoviePage> {
        check_page(page)?;
        self.get_page(list.path(), vec![("page", page.to_string())])
            .await
    }

    async fn discover(&self, filter: &DiscoverFilter, page: u32) -> AppResult<MoviePage> {
        check_page(page)?;
        self.get_page("discover/movie", discover_params(filter, page))
            .await
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        let response: GenreListResponse = self.get_json("genre/movie/list", &QueryParams::new()).await?;

        tracing::info!(
            genres = response.genres.len(),
            provider = "tmdb",
            "Genre list fetched"
        );

        Ok(response.genres)
    }
}
