use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AthenaeumError {
    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("{0}")]
    MiniJinja(#[from] minijinja::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for AthenaeumError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AthenaeumError::MiniJinja(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
            AthenaeumError::IO(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
            AthenaeumError::Json(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
            AthenaeumError::NotFound(e) => (StatusCode::NOT_FOUND, e).into_response(),
        }
    }
}
