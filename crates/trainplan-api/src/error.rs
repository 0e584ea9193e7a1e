//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use trainplan_core::Error as CoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("encoding error: {0}")]
  Encode(#[from] serde_json::Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Core(e) => match e {
        CoreError::DuplicateAssignment { .. }
        | CoreError::OverlappingProgramAssignment { .. } => StatusCode::CONFLICT,
        CoreError::AssignmentNotFound { .. }
        | CoreError::WorkoutNotFound(_)
        | CoreError::ProgramNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::InvalidTargetDate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
        CoreError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CoreError::ConstraintViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
