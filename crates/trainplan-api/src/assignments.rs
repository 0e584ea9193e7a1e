//! Handlers for an athlete's direct assignments.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/athletes/:athlete_id/assignments` | Body: `{"workout_id":..,"date":..}`; 201, 409 on duplicate |
//! | `POST`   | `/athletes/:athlete_id/assignments/new-workout` | Body: [`NewWorkoutBody`]; creates the template first |
//! | `PATCH`  | `/athletes/:athlete_id/assignments/:workout_id/:date` | Body: `{"to_date":..}` |
//! | `DELETE` | `/athletes/:athlete_id/assignments/:workout_id/:date` | |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trainplan_core::{
  assignment::DirectAssignment,
  schedule::{DeleteOutcome, MoveOutcome},
  store::ScheduleStore,
  workout::{NewWorkout, WorkoutDefinition},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub workout_id: Uuid,
  pub date:       NaiveDate,
}

/// `POST /athletes/:athlete_id/assignments`
pub async fn create<S>(
  State(calendar): State<AppState<S>>,
  Path(athlete_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + 'static,
{
  let assignment = calendar
    .create_direct_assignment(athlete_id, body.workout_id, body.date)
    .await?;
  Ok((StatusCode::CREATED, Json(assignment)))
}

#[derive(Debug, Deserialize)]
pub struct NewWorkoutBody {
  pub workout: NewWorkout,
  pub date:    NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct Created {
  pub workout:    WorkoutDefinition,
  pub assignment: DirectAssignment,
}

/// `POST /athletes/:athlete_id/assignments/new-workout`
pub async fn create_with_workout<S>(
  State(calendar): State<AppState<S>>,
  Path(athlete_id): Path<Uuid>,
  Json(body): Json<NewWorkoutBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + 'static,
{
  let (workout, assignment) = calendar
    .create_workout_and_assign(body.workout, athlete_id, body.date)
    .await?;
  Ok((StatusCode::CREATED, Json(Created { workout, assignment })))
}

// ─── Move / delete ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  pub to_date: NaiveDate,
}

/// `PATCH /athletes/:athlete_id/assignments/:workout_id/:date`
pub async fn move_one<S>(
  State(calendar): State<AppState<S>>,
  Path((athlete_id, workout_id, date)): Path<(Uuid, Uuid, NaiveDate)>,
  Json(body): Json<MoveBody>,
) -> Result<Json<MoveOutcome>, ApiError>
where
  S: ScheduleStore + 'static,
{
  let outcome = calendar
    .move_direct_assignment(athlete_id, workout_id, date, body.to_date)
    .await?;
  Ok(Json(outcome))
}

/// `DELETE /athletes/:athlete_id/assignments/:workout_id/:date`
pub async fn delete_one<S>(
  State(calendar): State<AppState<S>>,
  Path((athlete_id, workout_id, date)): Path<(Uuid, Uuid, NaiveDate)>,
) -> Result<Json<DeleteOutcome>, ApiError>
where
  S: ScheduleStore + 'static,
{
  let outcome = calendar
    .delete_direct_assignment(athlete_id, workout_id, date)
    .await?;
  Ok(Json(outcome))
}
