use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// Opaque catalog identifier (a TMDB movie id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    /// Reads an id out of a loosely typed JSON value.
    ///
    /// Accepts non-negative integers and all-digit strings; everything else
    /// (null, floats, booleans, free-form strings) counts as no id at all.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self::from),
            Value::String(s) => {
                let trimmed = s.trim();
                let numeric = !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit());
                numeric.then(|| Self(trimmed.to_string()))
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for CatalogId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full movie record as returned by the catalog.
///
/// Owned by the catalog's contract: the service never edits it, it only
/// forwards it to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieRecord(Value);

impl MovieRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// First official trailer among the appended videos, if any
    pub fn official_trailer(&self) -> Option<&Value> {
        self.0
            .get("videos")?
            .get("results")?
            .as_array()?
            .iter()
            .find(|video| {
                video.get("type").and_then(Value::as_str) == Some("Trailer")
                    && video.get("official").and_then(Value::as_bool) == Some(true)
            })
    }
}

/// One page of a catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub results: Vec<MovieRecord>,
}

fn first_page() -> u32 {
    1
}

impl MoviePage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Time window for the trending listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Curated catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieList {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl MovieList {
    /// Catalog endpoint path for this listing
    pub fn path(&self) -> &'static str {
        match self {
            MovieList::Popular => "movie/popular",
            MovieList::TopRated => "movie/top_rated",
            MovieList::NowPlaying => "movie/now_playing",
            MovieList::Upcoming => "movie/upcoming",
        }
    }
}

/// Filters for the discover listing; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilter {
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub min_rating: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_id_from_integer() {
        assert_eq!(
            CatalogId::from_json(&json!(438631)),
            Some(CatalogId::from(438631))
        );
    }

    #[test]
    fn test_catalog_id_from_string() {
        let id = CatalogId::from_json(&json!(" 27205 ")).unwrap();
        assert_eq!(id.as_str(), "27205");
    }

    #[test]
    fn test_catalog_id_rejects_unusable_values() {
        assert_eq!(CatalogId::from_json(&json!(null)), None);
        assert_eq!(CatalogId::from_json(&json!("")), None);
        assert_eq!(CatalogId::from_json(&json!(-5)), None);
        assert_eq!(CatalogId::from_json(&json!(12.5)), None);
        assert_eq!(CatalogId::from_json(&json!({"id": 1})), None);
        assert_eq!(CatalogId::from_json(&json!("../tv/1399")), None);
        assert_eq!(CatalogId::from_json(&json!("27205?append_to_response=x")), None);
        assert_eq!(CatalogId::from_json(&json!("tt1375666")), None);
    }

    #[test]
    fn test_movie_record_is_transparent() {
        let raw = json!({"id": 438631, "title": "Dune", "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"});
        let record: MovieRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.title(), Some("Dune"));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_official_trailer_picks_first_official() {
        let record = MovieRecord::new(json!({
            "title": "Dune",
            "videos": {"results": [
                {"key": "a", "type": "Teaser", "official": true},
                {"key": "b", "type": "Trailer", "official": false},
                {"key": "c", "type": "Trailer", "official": true},
                {"key": "d", "type": "Trailer", "official": true}
            ]}
        }));
        assert_eq!(record.official_trailer().unwrap()["key"], "c");
    }

    #[test]
    fn test_official_trailer_missing_videos() {
        let record = MovieRecord::new(json!({"title": "Dune"}));
        assert!(record.official_trailer().is_none());
    }

    #[test]
    fn test_movie_page_pagination() {
        let page: MoviePage =
            serde_json::from_str(r#"{"page":2,"total_pages":3,"total_results":55,"results":[]}"#)
                .unwrap();
        assert!(page.has_previous());
        assert!(page.has_next());

        let last: MoviePage = serde_json::from_str(r#"{"page":3,"total_pages":3}"#).unwrap();
        assert!(!last.has_next());

        let empty: MoviePage = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.page, 1);
        assert!(!empty.has_previous());
        assert!(!empty.has_next());
    }

    #[test]
    fn test_movie_list_paths() {
        assert_eq!(MovieList::TopRated.path(), "movie/top_rated");
        let list: MovieList = serde_json::from_str(r#""now_playing""#).unwrap();
        assert_eq!(list, MovieList::NowPlaying);
    }
}
