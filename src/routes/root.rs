use crate::errors::AppError;
use axum::{http::StatusCode, response::IntoResponse, Json};

pub async fn index() -> Result<Json<&'static str>, AppError> {
    Ok(Json("sales routes api server"))
}

pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "empty page")
}
