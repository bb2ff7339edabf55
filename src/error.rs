use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("storage error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingField(_)
            | AppError::UnknownPaymentMethod(_)
            | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
