use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RequestError(#[from] RequestError),
    #[error(transparent)]
    SystemError(#[from] SystemError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// 呼叫端送來的資料有問題
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("weekNumber must be between 1 and 53, got {0}")]
    InvalidWeekNumber(u32),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid content: {0}")]
    InvalidContent(String),
}

#[derive(Error, Debug)]
pub enum SystemError {
    #[error("missing environment variable {0}")]
    EnvVarMissing(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::RequestError(RequestError::InvalidContent(rejection.body_text()))
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::RequestError(_) => StatusCode::BAD_REQUEST,
            AppError::SystemError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status_code, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_are_bad_request() {
        let err = AppError::from(RequestError::InvalidWeekNumber(54));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn system_errors_are_500() {
        let err = AppError::from(SystemError::EnvVarMissing("DATABASE_URL".to_string()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
