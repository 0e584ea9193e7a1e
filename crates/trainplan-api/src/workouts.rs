//! Handlers for `/workouts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/workouts` | `?coach_id` required |
//! | `POST` | `/workouts` | Body: [`NewWorkout`]; returns 201 |
//! | `GET`  | `/workouts/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use trainplan_core::{
  Error as CoreError,
  store::{ScheduleStore, WorkoutCatalog as _},
  workout::{NewWorkout, WorkoutDefinition},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub coach_id: Uuid,
}

/// `GET /workouts?coach_id=<id>`
pub async fn list<S>(
  State(calendar): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<WorkoutDefinition>>, ApiError>
where
  S: ScheduleStore + 'static,
{
  Ok(Json(calendar.store().list_workouts(params.coach_id).await?))
}

/// `POST /workouts`
pub async fn create<S>(
  State(calendar): State<AppState<S>>,
  Json(body): Json<NewWorkout>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + 'static,
{
  let workout = calendar.create_workout(body).await?;
  Ok((StatusCode::CREATED, Json(workout)))
}

/// `GET /workouts/:id`
pub async fn get_one<S>(
  State(calendar): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<WorkoutDefinition>, ApiError>
where
  S: ScheduleStore + 'static,
{
  let workout = calendar
    .store()
    .get_workout(id)
    .await?
    .ok_or(CoreError::WorkoutNotFound(id))?;
  Ok(Json(workout))
}
