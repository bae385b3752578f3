use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MovieKind {
    Movie,
    TvShow,
}

impl MovieKind {
    pub const ALL: [MovieKind; 2] = [MovieKind::Movie, MovieKind::TvShow];

    pub fn as_str(self) -> &'static str {
        match self {
            MovieKind::Movie => "Movie",
            MovieKind::TvShow => "TvShow",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Movie" => Some(MovieKind::Movie),
            "TvShow" => Some(MovieKind::TvShow),
            _ => None,
        }
    }
}

impl fmt::Display for MovieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted movie as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MovieKind,
    pub director: String,
    pub budget: f64,
    pub location: String,
    pub duration: String,
    pub year: i32,
    pub created_at: jiff::Timestamp,
}

impl Movie {
    pub fn to_draft(&self) -> MovieDraft {
        MovieDraft {
            title: self.title.clone(),
            kind: self.kind,
            director: self.director.clone(),
            budget: self.budget,
            location: self.location.clone(),
            duration: self.duration.clone(),
            year: self.year,
        }
    }
}

/// Every user-supplied field of a movie, already validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MovieKind,
    pub director: String,
    pub budget: f64,
    pub location: String,
    pub duration: String,
    pub year: i32,
}

/// A validated subset of movie fields. `None` leaves the stored value as is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MovieKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.kind.is_none()
            && self.director.is_none()
            && self.budget.is_none()
            && self.location.is_none()
            && self.duration.is_none()
            && self.year.is_none()
    }
}

impl From<MovieDraft> for MoviePatch {
    fn from(draft: MovieDraft) -> Self {
        Self {
            title: Some(draft.title),
            kind: Some(draft.kind),
            director: Some(draft.director),
            budget: Some(draft.budget),
            location: Some(draft.location),
            duration: Some(draft.duration),
            year: Some(draft.year),
        }
    }
}

/// Envelope for single-record and message-only responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self { success: true, message: message.into(), data }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListResponse {
    pub success: bool,
    pub message: String,
    pub current_page: u64,
    pub total_movies: u64,
    pub total_pages: u64,
    pub data: Vec<Movie>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: jiff::Timestamp,
    pub environment: String,
}

#[derive(Clone, Debug)]
pub struct MoviePage {
    pub records: Vec<Movie>,
    pub total: u64,
}

/// 1-based page selection. Missing, unparsable or non-positive inputs fall back
/// to the defaults; the limit is capped at [`MAX_LIMIT`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).filter(|n| *n > 0).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_defaults_bad_input() {
        assert_eq!(PageRequest::from_params(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::from_params(Some("0"), Some("-3")),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::from_params(Some("abc"), Some("2.5")),
            PageRequest { page: 1, limit: 10 }
        );
    }

    #[test]
    fn page_request_parses_and_caps() {
        assert_eq!(
            PageRequest::from_params(Some(" 3 "), Some("25")),
            PageRequest { page: 3, limit: 25 }
        );
        assert_eq!(PageRequest::from_params(None, Some("5000")).limit, MAX_LIMIT);
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = PageRequest { page: 1, limit: 10 };
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(10), 1);
        assert_eq!(req.total_pages(11), 2);
        assert_eq!(PageRequest { page: 2, limit: 1 }.total_pages(3), 3);
    }

    #[test]
    fn movie_serializes_with_wire_names() {
        let movie = Movie {
            id: 7,
            title: "Arrival".to_string(),
            kind: MovieKind::Movie,
            director: "Denis Villeneuve".to_string(),
            budget: 47_000_000.0,
            location: "Montreal".to_string(),
            duration: "116 min".to_string(),
            year: 2016,
            created_at: jiff::Timestamp::from_millisecond(1_700_000_000_000).unwrap(),
        };
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["type"], "Movie");
        assert_eq!(value["createdAt"], "2023-11-14T22:13:20Z");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn envelope_decodes_with_and_without_data() {
        let bare: ApiResponse<Movie> =
            serde_json::from_str(r#"{"success":true,"message":"Movie successfully deleted"}"#)
                .unwrap();
        assert!(bare.data.is_none());

        let body = serde_json::json!({
            "success": true,
            "message": "Movie successfully inserted",
            "data": {
                "id": 3,
                "title": "Heat",
                "type": "Movie",
                "director": "Michael Mann",
                "budget": 60000000.0,
                "location": "Los Angeles",
                "duration": "170 min",
                "year": 1995,
                "createdAt": "2023-11-14T22:13:20Z"
            }
        });
        let full: ApiResponse<Movie> = serde_json::from_value(body).unwrap();
        assert_eq!(full.data.unwrap().title, "Heat");
    }

    #[test]
    fn patch_skips_absent_fields() {
        let patch = MoviePatch { budget: Some(10.0), ..Default::default() };
        assert_eq!(serde_json::to_value(&patch).unwrap(), serde_json::json!({ "budget": 10.0 }));
        assert!(MoviePatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}
