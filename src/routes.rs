use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{ApiResponse, HealthResponse, Movie, MovieListResponse, PageRequest},
    validator,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.limit.as_deref())
    }
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let draft = validator::validate_draft(&body)?;

    let movie = state
        .store
        .insert(draft)
        .await
        .map_err(|e| AppError::from_store(e, "Failed to insert movie", state.expose_errors()))?;

    tracing::info!(id = movie.id, title = %movie.title, "movie created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Movie successfully inserted", Some(movie))),
    )
        .into_response())
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<MovieListResponse>> {
    let req = q.page_request();

    let page = state
        .store
        .list(req.page, req.limit)
        .await
        .map_err(|e| AppError::from_store(e, "Failed to fetch movies", state.expose_errors()))?;

    Ok(Json(MovieListResponse {
        success: true,
        message: "Movies fetched successfully".to_string(),
        current_page: req.page,
        total_movies: page.total,
        total_pages: req.total_pages(page.total),
        data: page.records,
    }))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Movie>>> {
    let id = movie_id(id)?;
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let patch = validator::validate_patch(&body)?;

    let movie = state
        .store
        .update(id, patch)
        .await
        .map_err(|e| AppError::from_store(e, "Failed to update movie", state.expose_errors()))?;

    tracing::info!(id, "movie updated");
    Ok(Json(ApiResponse::ok("Movie successfully updated", Some(movie))))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = movie_id(id)?;

    state
        .store
        .delete(id)
        .await
        .map_err(|e| AppError::from_store(e, "Failed to delete movie", state.expose_errors()))?;

    tracing::info!(id, "movie deleted");
    Ok(Json(ApiResponse::ok("Movie successfully deleted", None)))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
        timestamp: jiff::Timestamp::now(),
        environment: state.config.environment.clone(),
    })
}

pub async fn route_not_found(method: Method, uri: Uri) -> Response {
    tracing::debug!(%method, path = uri.path(), "no route");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
        .into_response()
}

fn movie_id(id: Result<Path<i32>, PathRejection>) -> AppResult<i32> {
    id.map(|Path(id)| id).map_err(|_| AppError::BadRequest("Invalid movie id".to_string()))
}
