use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::news_api::NewsApiError;
use crate::render::RenderError;
use crate::search::InvalidPage;

/// Anything that can stop a page from being served. The client always sees
/// a plain 500; the cause only goes to the server log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidPage(#[from] InvalidPage),

    #[error(transparent)]
    Upstream(#[from] NewsApiError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidPage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected server error",
            )
                .into_response(),
            AppError::Upstream(_) | AppError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
