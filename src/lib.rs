pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod routes;
pub mod search;
pub mod store;
pub mod templates;
pub mod validator;
pub mod views;

use std::{any::Any, sync::Arc};

use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{config::Config, store::MovieStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
}

impl AppState {
    /// Storage error messages are passed through to clients outside production.
    pub fn expose_errors(&self) -> bool {
        !self.config.is_production()
    }
}

/// Routes plus the full middleware stack.
pub fn app(state: Arc<AppState>) -> Router {
    let config = state.config.clone();
    with_middleware(router(state), &config)
}

pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(routes::health))
        .route("/movies/create", post(routes::create_movie))
        .route("/movies/all", get(routes::list_movies))
        .route("/movies/update/{id}", put(routes::update_movie))
        .route("/movies/delete/{id}", delete(routes::delete_movie))
        .route("/", get(views::index))
        .route("/ui/movies", post(views::create))
        .route("/ui/movies/new", get(views::new_form))
        .route("/ui/movies/{id}", post(views::update))
        .route("/ui/movies/{id}/edit", get(views::edit_form))
        .route("/ui/movies/{id}/delete", get(views::confirm_delete).post(views::delete));

    if let Some(dir) = &state.config.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router.fallback(routes::route_not_found).with_state(state)
}

pub fn with_middleware(router: Router, config: &Config) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match config.client_url.as_deref() {
        Some(url) => match HeaderValue::from_str(url) {
            Ok(origin) => base.allow_origin(origin).allow_credentials(true),
            Err(_) => {
                tracing::warn!(client_url = url, "CLIENT_URL is not a valid origin; allowing any");
                base.allow_origin(AnyOrigin)
            },
        },
        None => base.allow_origin(AnyOrigin),
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Internal Server Error" })),
    )
        .into_response()
}
