use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::{store::StoreError, validator::ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("Movie {0} not found")]
    NotFound(i32),
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: sea_orm::DbErr,
        expose: bool,
    },
}

impl AppError {
    /// Wraps a store failure, naming the operation that failed.
    pub fn from_store(err: StoreError, context: &'static str, expose: bool) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(id),
            StoreError::Db(source) => AppError::Storage { context, source, expose },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": "Validation failed", "errors": errors }),
            ),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "success": false, "message": message }))
            },
            AppError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": format!("Movie {id} not found") }),
            ),
            AppError::Storage { context, source, expose } => {
                tracing::error!(error = %source, "{context}");
                let mut body = json!({ "success": false, "message": context });
                if expose {
                    body["error"] = Value::String(source.to_string());
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
