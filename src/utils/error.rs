use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

/// Error taxonomy shared by services, middleware and handlers.
///
/// Every variant maps to exactly one HTTP status; the JSON body always
/// carries an `error` key so clients never see a stack trace or a bare
/// string body.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Missing/empty required field or unparseable timestamp -> 400
    Validation(String),
    /// Missing, malformed or expired credential -> 401
    Auth(String),
    /// No such record -> 404
    NotFound(String),
    /// Any failure from the document store -> 500
    Store(String),
    /// Outbound notification delivery failure. Callers decide whether to
    /// surface it; when it does reach HTTP it is a 500.
    Notify(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::Auth(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Store(msg) => write!(f, "Database error: {}", msg),
            AppError::Notify(msg) => write!(f, "Notification error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Notify(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
