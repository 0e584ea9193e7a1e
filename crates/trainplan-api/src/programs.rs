//! Handlers for `/programs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/programs` | Body: [`NewProgram`]; returns 201 |
//! | `GET`    | `/programs/:id` | 404 if not found |
//! | `POST`   | `/programs/:id/workouts` | Body: `{"workout_id":..,"date":..}`; 422 outside the program |
//! | `PATCH`  | `/programs/:id/workouts/:workout_id/:date` | Body: `{"to_date":..}`; moves for every enrolled athlete |
//! | `DELETE` | `/programs/:id/workouts/:workout_id/:date` | Program-wide |
//! | `POST`   | `/programs/:id/assignments` | Body: [`AssignBody`]; 409 on overlapping window |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use trainplan_core::{
  Error as CoreError,
  program::{NewProgram, NewProgramAssignment, Program},
  schedule::{DeleteOutcome, MoveOutcome},
  store::{AssignmentStore as _, ScheduleStore},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Programs ────────────────────────────────────────────────────────────────

/// `POST /programs`
pub async fn create<S>(
  State(calendar): State<AppState<S>>,
  Json(body): Json<NewProgram>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + 'static,
{
  let program = calendar.create_program(body).await?;
  Ok((StatusCode::CREATED, Json(program)))
}

/// `GET /programs/:id`
pub async fn get_one<S>(
  State(calendar): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Program>, ApiError>
where
  S: ScheduleStore + 'static,
{
  let program = calendar
    .store()
    .get_program(id)
    .await?
    .ok_or(CoreError::ProgramNotFound(id))?;
  Ok(Json(program))
}

// ─── Program workouts ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddWorkoutBody {
  pub workout_id: Uuid,
  pub date:       NaiveDate,
}

/// `POST /programs/:id/workouts`
pub async fn add_workout<S>(
  State(calendar): State<AppState<S>>,
  Path(program_id): Path<Uuid>,
  Json(body): Json<AddWorkoutBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + 'static,
{
  let placed = calendar
    .add_program_workout(program_id, body.workout_id, body.date)
    .await?;
  Ok((StatusCode::CREATED, Json(placed)))
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  pub to_date: NaiveDate,
}

/// `PATCH /programs/:id/workouts/:workout_id/:date`
pub async fn move_workout<S>(
  State(calendar): State<AppState<S>>,
  Path((program_id, workout_id, date)): Path<(Uuid, Uuid, NaiveDate)>,
  Json(body): Json<MoveBody>,
) -> Result<Json<MoveOutcome>, ApiError>
where
  S: ScheduleStore + 'static,
{
  let outcome = calendar
    .move_program_workout(program_id, workout_id, date, body.to_date)
    .await?;
  Ok(Json(outcome))
}

/// `DELETE /programs/:id/workouts/:workout_id/:date`
pub async fn delete_workout<S>(
  State(calendar): State<AppState<S>>,
  Path((program_id, workout_id, date)): Path<(Uuid, Uuid, NaiveDate)>,
) -> Result<Json<DeleteOutcome>, ApiError>
where
  S: ScheduleStore + 'static,
{
  let outcome = calendar
    .delete_program_workout(program_id, workout_id, date)
    .await?;
  Ok(Json(outcome))
}

// ─── Enrolment ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub athlete_id: Uuid,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
}

/// `POST /programs/:id/assignments`
pub async fn assign<S>(
  State(calendar): State<AppState<S>>,
  Path(program_id): Path<Uuid>,
  Json(body): Json<AssignBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + 'static,
{
  let assignment = calendar
    .assign_program(NewProgramAssignment {
      program_id,
      athlete_id: body.athlete_id,
      start_date: body.start_date,
      end_date:   body.end_date,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(assignment)))
}
