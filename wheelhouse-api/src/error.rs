use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use wheelhouse_domain::BookingError;

/// Every failure leaving the API is rendered as the uniform envelope
/// `{"success": false, "message": ...}` with a matching status code.
/// Conflict races and storage failures are logged in full server-side and
/// kept generic on the wire; the rest carry their precise message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] BookingError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => match &err {
                BookingError::InvalidRange => (StatusCode::BAD_REQUEST, err.to_string()),
                BookingError::CarUnavailable => (StatusCode::CONFLICT, err.to_string()),
                BookingError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                BookingError::Unauthorized => (StatusCode::FORBIDDEN, err.to_string()),
                BookingError::InvalidTransition { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                BookingError::ConflictRace => {
                    tracing::error!("Commit lost availability race: {:?}", err);
                    (
                        StatusCode::CONFLICT,
                        "Car is no longer available".to_string(),
                    )
                }
                BookingError::Store(_) => {
                    tracing::error!("Storage failure: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
