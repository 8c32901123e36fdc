pub mod chat;
pub mod movie;
pub mod recommendation;

pub use chat::{ChatRole, ChatTurn};
pub use movie::{CatalogId, DiscoverFilter, Genre, MovieList, MoviePage, MovieRecord, TimeWindow};
pub use recommendation::{PipelineResult, RecommendationCandidate, SimilarMovies, SimilarSource};
