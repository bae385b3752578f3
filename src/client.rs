//! Typed HTTP client for the catalog's REST surface.

use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    models::{ApiResponse, HealthResponse, Movie, MovieDraft, MovieListResponse, MoviePatch},
    search,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response had no data")]
    MissingData,
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let resp = self.http.get(self.url("/health")).send().await?;
        decode(resp).await
    }

    pub async fn list(&self, page: u64, limit: u64) -> ClientResult<MovieListResponse> {
        let resp = self
            .http
            .get(self.url("/movies/all"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        decode(resp).await
    }

    /// Fetches one page and keeps the movies whose title contains `query`.
    pub async fn search(&self, query: &str, page: u64, limit: u64) -> ClientResult<Vec<Movie>> {
        let listed = self.list(page, limit).await?;
        Ok(search::filter_by_title(&listed.data, query).into_iter().cloned().collect())
    }

    pub async fn create(&self, draft: &MovieDraft) -> ClientResult<Movie> {
        let resp = self.http.post(self.url("/movies/create")).json(draft).send().await?;
        let body: ApiResponse<Movie> = decode(resp).await?;
        body.data.ok_or(ClientError::MissingData)
    }

    pub async fn update(&self, id: i32, patch: &MoviePatch) -> ClientResult<Movie> {
        let resp = self.http.put(self.url(&format!("/movies/update/{id}"))).json(patch).send().await?;
        let body: ApiResponse<Movie> = decode(resp).await?;
        body.data.ok_or(ClientError::MissingData)
    }

    pub async fn delete(&self, id: i32) -> ClientResult<()> {
        let resp = self.http.delete(self.url(&format!("/movies/delete/{id}"))).send().await?;
        let _: ApiResponse<serde_json::Value> = decode(resp).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text).map(|b| b.message).unwrap_or(text);
    Err(ClientError::Api { status: status.as_u16(), message })
}
