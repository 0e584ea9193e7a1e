//! Handlers for schedule reads and slot-addressed intents.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/athletes/:athlete_id/schedule` | `?start=&end=`; sets `ETag`, honours `If-None-Match` |
//! | `POST` | `/schedule/move` | Body: [`MoveBody`]; returns [`MoveOutcome`] |
//! | `POST` | `/schedule/delete` | Body: a [`ScheduleSlot`]; returns [`DeleteOutcome`] |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use trainplan_core::{
  schedule::{DeleteOutcome, MoveOutcome, ScheduleSlot},
  store::ScheduleStore,
};
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  etag::{matches_if_none_match, schedule_etag},
};

// ─── Resolve ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScheduleParams {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

/// `GET /athletes/:athlete_id/schedule?start=<date>&end=<date>`
pub async fn get_schedule<S>(
  State(calendar): State<AppState<S>>,
  Path(athlete_id): Path<Uuid>,
  Query(params): Query<ScheduleParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: ScheduleStore + 'static,
{
  let entries = calendar
    .resolve_schedule(athlete_id, params.start, params.end)
    .await?;
  let etag = schedule_etag(&entries)?;

  let fresh = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| matches_if_none_match(v, &etag));
  if fresh {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(([(header::ETAG, etag)], Json(entries)).into_response())
}

// ─── Intents ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  pub slot:    ScheduleSlot,
  pub to_date: NaiveDate,
}

/// `POST /schedule/move`, routed by the slot's provenance.
pub async fn move_slot<S>(
  State(calendar): State<AppState<S>>,
  Json(body): Json<MoveBody>,
) -> Result<Json<MoveOutcome>, ApiError>
where
  S: ScheduleStore + 'static,
{
  Ok(Json(calendar.move_entry(&body.slot, body.to_date).await?))
}

/// `POST /schedule/delete`
pub async fn delete_slot<S>(
  State(calendar): State<AppState<S>>,
  Json(slot): Json<ScheduleSlot>,
) -> Result<Json<DeleteOutcome>, ApiError>
where
  S: ScheduleStore + 'static,
{
  Ok(Json(calendar.delete_entry(&slot).await?))
}
