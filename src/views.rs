//! Server-rendered pages: list with search, shared add/edit form, delete confirmation.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    AppState,
    models::{Movie, PageRequest},
    search,
    store::StoreError,
    templates::{self, FormMode, ListView, MovieForm, Notice, NoticeLevel},
    validator::{self, ValidationErrors},
};

#[derive(Debug)]
pub struct PageError(StatusCode, String);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.0, Html(templates::error_page(&self.1))).into_response()
    }
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => {
                PageError(StatusCode::NOT_FOUND, format!("Movie {id} not found"))
            },
            StoreError::Db(err) => {
                tracing::error!(error = %err, "page storage error");
                PageError(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong".to_string())
            },
        }
    }
}

type PageResult<T> = Result<T, PageError>;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    q: Option<String>,
    page: Option<String>,
    limit: Option<String>,
    notice: Option<String>,
    level: Option<String>,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IndexQuery>,
) -> PageResult<Html<String>> {
    let req = PageRequest::from_params(q.page.as_deref(), q.limit.as_deref());
    let page = state.store.list(req.page, req.limit).await?;
    let query = q.q.as_deref().unwrap_or_default();

    let notice = q.notice.filter(|n| !n.trim().is_empty()).map(|message| Notice {
        level: NoticeLevel::from_param(q.level.as_deref()),
        message,
    });

    Ok(Html(templates::index_page(&ListView {
        movies: search::filter_by_title(&page.records, query),
        query,
        page: req,
        total: page.total,
        total_pages: req.total_pages(page.total),
        notice,
    })))
}

pub async fn new_form() -> Html<String> {
    let values = HashMap::new();
    Html(templates::form_page(&MovieForm { mode: FormMode::Add, values: &values, errors: None }, None))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let movie = find(&state, id).await?;
    let values = form_values(&movie);
    Ok(Html(templates::form_page(
        &MovieForm { mode: FormMode::Edit(id), values: &values, errors: None },
        None,
    )))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(values): Form<HashMap<String, String>>,
) -> PageResult<Response> {
    let draft = match validator::validate_draft(&form_json(&values)) {
        Ok(draft) => draft,
        Err(errors) => return Ok(invalid_form(FormMode::Add, &values, &errors)),
    };

    let movie = state.store.insert(draft).await?;
    tracing::info!(id = movie.id, title = %movie.title, "movie created from form");
    Ok(redirect_with_notice(NoticeLevel::Success, &format!("{} added successfully", movie.title)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(values): Form<HashMap<String, String>>,
) -> PageResult<Response> {
    let patch = match validator::validate_patch(&form_json(&values)) {
        Ok(patch) => patch,
        Err(errors) => return Ok(invalid_form(FormMode::Edit(id), &values, &errors)),
    };

    let movie = state.store.update(id, patch).await?;
    tracing::info!(id, "movie updated from form");
    Ok(redirect_with_notice(NoticeLevel::Success, &format!("{} updated successfully", movie.title)))
}

pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let movie = find(&state, id).await?;
    Ok(Html(templates::confirm_delete_page(&movie)))
}

pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> PageResult<Response> {
    match state.store.delete(id).await {
        Ok(()) => {
            tracing::info!(id, "movie deleted from form");
            Ok(redirect_with_notice(NoticeLevel::Success, "Movie deleted successfully"))
        },
        Err(StoreError::NotFound(_)) => {
            Ok(redirect_with_notice(NoticeLevel::Error, "Failed to delete movie"))
        },
        Err(err) => Err(err.into()),
    }
}

async fn find(state: &AppState, id: i32) -> PageResult<Movie> {
    state.store.get(id).await?.ok_or(PageError(StatusCode::NOT_FOUND, format!("Movie {id} not found")))
}

fn invalid_form(
    mode: FormMode,
    values: &HashMap<String, String>,
    errors: &ValidationErrors,
) -> Response {
    let notice = Notice { level: NoticeLevel::Error, message: "Please fix the highlighted fields".to_string() };
    let body = templates::form_page(&MovieForm { mode, values, errors: Some(errors) }, Some(&notice));
    (StatusCode::BAD_REQUEST, Html(body)).into_response()
}

fn redirect_with_notice(level: NoticeLevel, message: &str) -> Response {
    Redirect::to(&format!("/?notice={}&level={}", urlencoding::encode(message), level.as_param()))
        .into_response()
}

/// Form fields arrive as strings; the validator coerces the numeric ones.
fn form_json(values: &HashMap<String, String>) -> Value {
    let obj: Map<String, Value> =
        values.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect();
    Value::Object(obj)
}

fn form_values(movie: &Movie) -> HashMap<String, String> {
    [
        ("title", movie.title.clone()),
        ("type", movie.kind.as_str().to_string()),
        ("director", movie.director.clone()),
        ("budget", movie.budget.to_string()),
        ("location", movie.location.clone()),
        ("duration", movie.duration.clone()),
        ("year", movie.year.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}
