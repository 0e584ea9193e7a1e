//! Handlers for an athlete's activity on one scheduled occurrence.

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::NaiveDate;
use trainplan_core::{
  activity::{ActivityRecord, ActivityUpdate},
  store::ScheduleStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `GET /athletes/:athlete_id/activity/:workout_id/:date`, `null` if the
/// occurrence has not been attempted.
pub async fn get_one<S>(
  State(calendar): State<AppState<S>>,
  Path((athlete_id, workout_id, date)): Path<(Uuid, Uuid, NaiveDate)>,
) -> Result<Json<Option<ActivityRecord>>, ApiError>
where
  S: ScheduleStore + 'static,
{
  Ok(Json(calendar.get_activity(athlete_id, workout_id, date).await?))
}

/// `PUT /athletes/:athlete_id/activity/:workout_id/:date`, body: [`ActivityUpdate`].
pub async fn record<S>(
  State(calendar): State<AppState<S>>,
  Path((athlete_id, workout_id, date)): Path<(Uuid, Uuid, NaiveDate)>,
  Json(update): Json<ActivityUpdate>,
) -> Result<Json<ActivityRecord>, ApiError>
where
  S: ScheduleStore + 'static,
{
  let record = calendar
    .record_activity(athlete_id, workout_id, date, update)
    .await?;
  Ok(Json(record))
}
