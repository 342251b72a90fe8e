use super::render;
use crate::error::PollError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        match self {
            PollError::NotFound => (StatusCode::NOT_FOUND, Html(render::not_found())).into_response(),
            PollError::Validation {
                question,
                choices,
                message,
            } => Html(render::detail(&question, &choices, Some(message))).into_response(),
            PollError::Database(err) => {
                error!(?err, "database failure while serving request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}
