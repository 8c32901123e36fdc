use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt::Display, str::FromStr, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{
        CatalogId, DiscoverFilter, Genre, MovieList, MoviePage, MovieRecord, SimilarMovies,
        TimeWindow,
    },
    routes::AppState,
};

fn first_page() -> u32 {
    1
}

/// Form-style query value: blank means "not set"
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
    #[serde(default = "first_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(default)]
    window: TimeWindow,
    #[serde(default = "first_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    genre: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    year: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    rating: Option<f32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    page: Option<u32>,
}

/// A listing page plus its pagination flags
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    #[serde(flatten)]
    page: MoviePage,
    has_previous: bool,
    has_next: bool,
}

impl From<MoviePage> for ListingResponse {
    fn from(page: MoviePage) -> Self {
        Self {
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    genres: Vec<Genre>,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailsResponse {
    movie: MovieRecord,
    trailer: Option<Value>,
}

/// Handler for title search
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<ListingResponse>> {
    let Query(params) = params?;
    let page = state.catalog.search_movies(&params.query, params.page).await?;
    Ok(Json(page.into()))
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    params: Result<Query<TrendingQuery>, QueryRejection>,
) -> AppResult<Json<ListingResponse>> {
    let Query(params) = params?;
    let page = state.catalog.trending(params.window, params.page).await?;
    Ok(Json(page.into()))
}

/// Handler for the curated listings (`popular`, `top_rated`, `now_playing`, `upcoming`)
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(list): Path<MovieList>,
    params: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<ListingResponse>> {
    let Query(params) = params?;
    let page = state.catalog.movie_list(list, params.page).await?;
    Ok(Json(page.into()))
}

pub async fn discover(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DiscoverQuery>, QueryRejection>,
) -> AppResult<Json<ListingResponse>> {
    let Query(params) = params?;
    let filter = DiscoverFilter {
        genre: params.genre,
        year: params.year,
        min_rating: params.rating,
    };
    let page = state
        .catalog
        .discover(&filter, params.page.unwrap_or_else(first_page))
        .await?;
    Ok(Json(page.into()))
}

pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<GenresResponse>> {
    let genres = state.catalog.genres().await?;
    Ok(Json(GenresResponse { genres }))
}

/// Handler for a single movie, with its official trailer when there is one
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<MovieDetailsResponse>> {
    let movie = state
        .catalog
        .movie_details(&CatalogId::from(id))
        .await
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))?;

    let trailer = movie.official_trailer().cloned();
    Ok(Json(MovieDetailsResponse { movie, trailer }))
}

/// Handler for movies similar to a catalog title
pub async fn similar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<SimilarMovies>> {
    let movie = state
        .catalog
        .movie_details(&CatalogId::from(id))
        .await
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))?;

    let title = movie
        .title()
        .ok_or_else(|| AppError::NotFound(format!("Movie {} has no title", id)))?;

    let similar = state.pipeline.similar_to(title).await?;
    Ok(Json(similar))
}
