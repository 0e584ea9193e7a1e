//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use trainplan_store_sqlite::SqliteStore;
use uuid::Uuid;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
  headers: Vec<(header::HeaderName, &str)>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = match body {
    Some(json) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  app.clone().oneshot(req).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn create_workout(app: &Router, description: &str) -> Uuid {
  let resp = send(
    app,
    "POST",
    "/workouts",
    Some(json!({ "coach_id": Uuid::new_v4(), "description": description })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = json_body(resp).await;
  body["workout_id"].as_str().unwrap().parse().unwrap()
}

fn schedule_uri(athlete: Uuid, start: &str, end: &str) -> String {
  format!("/athletes/{athlete}/schedule?start={start}&end={end}")
}

// ── Direct assignments ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_duplicate_is_conflict() {
  let app = app().await;
  let athlete = Uuid::new_v4();
  let workout = create_workout(&app, "10k steady").await;
  let uri = format!("/athletes/{athlete}/assignments");
  let body = json!({ "workout_id": workout, "date": "2025-03-10" });

  let first = send(&app, "POST", &uri, Some(body.clone()), vec![]).await;
  assert_eq!(first.status(), StatusCode::CREATED);

  let second = send(&app, "POST", &uri, Some(body), vec![]).await;
  assert_eq!(second.status(), StatusCode::CONFLICT);
  assert!(json_body(second).await["error"].is_string());

  let resp = send(&app, "GET", &schedule_uri(athlete, "2025-03-01", "2025-03-31"), None, vec![])
    .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let entries = json_body(resp).await;
  assert_eq!(entries.as_array().unwrap().len(), 1);
  assert_eq!(entries[0]["provenance"]["kind"], "direct");
  assert_eq!(entries[0]["date"], "2025-03-10");
}

#[tokio::test]
async fn create_for_unknown_workout_is_not_found() {
  let app = app().await;
  let resp = send(
    &app,
    "POST",
    &format!("/athletes/{}/assignments", Uuid::new_v4()),
    Some(json!({ "workout_id": Uuid::new_v4(), "date": "2025-03-10" })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_with_new_workout_assigns_it() {
  let app = app().await;
  let athlete = Uuid::new_v4();
  let resp = send(
    &app,
    "POST",
    &format!("/athletes/{athlete}/assignments/new-workout"),
    Some(json!({
      "workout": { "coach_id": Uuid::new_v4(), "name": "Hill repeats", "description": "8x60s" },
      "date": "2025-03-12",
    })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert_eq!(created["workout"]["name"], "Hill repeats");
  assert_eq!(created["assignment"]["athlete_id"], athlete.to_string());
}

#[tokio::test]
async fn move_and_delete_direct_assignment() {
  let app = app().await;
  let athlete = Uuid::new_v4();
  let workout = create_workout(&app, "easy").await;
  send(
    &app,
    "POST",
    &format!("/athletes/{athlete}/assignments"),
    Some(json!({ "workout_id": workout, "date": "2025-03-10" })),
    vec![],
  )
  .await;

  let resp = send(
    &app,
    "PATCH",
    &format!("/athletes/{athlete}/assignments/{workout}/2025-03-10"),
    Some(json!({ "to_date": "2025-03-11" })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let outcome = json_body(resp).await;
  assert_eq!(outcome["to_date"], "2025-03-11");
  assert_eq!(outcome["affected_athletes"], json!([athlete]));

  let stale = send(
    &app,
    "DELETE",
    &format!("/athletes/{athlete}/assignments/{workout}/2025-03-10"),
    None,
    vec![],
  )
  .await;
  assert_eq!(stale.status(), StatusCode::NOT_FOUND);

  let resp = send(
    &app,
    "DELETE",
    &format!("/athletes/{athlete}/assignments/{workout}/2025-03-11"),
    None,
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ── Schedule reads ────────────────────────────────────────────────────────────

#[tokio::test]
async fn inverted_range_is_bad_request() {
  let app = app().await;
  let resp = send(
    &app,
    "GET",
    &schedule_uri(Uuid::new_v4(), "2025-03-31", "2025-03-01"),
    None,
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn etag_round_trip_and_invalidation() {
  let app = app().await;
  let athlete = Uuid::new_v4();
  let workout = create_workout(&app, "threshold").await;
  send(
    &app,
    "POST",
    &format!("/athletes/{athlete}/assignments"),
    Some(json!({ "workout_id": workout, "date": "2025-03-10" })),
    vec![],
  )
  .await;
  let uri = schedule_uri(athlete, "2025-03-01", "2025-03-31");

  let resp = send(&app, "GET", &uri, None, vec![]).await;
  let etag = resp.headers().get(header::ETAG).unwrap().to_str().unwrap().to_owned();

  let cached = send(&app, "GET", &uri, None, vec![(header::IF_NONE_MATCH, etag.as_str())]).await;
  assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);

  let resp = send(
    &app,
    "PUT",
    &format!("/athletes/{athlete}/activity/{workout}/2025-03-10"),
    Some(json!({ "is_completed": true })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let fresh = send(&app, "GET", &uri, None, vec![(header::IF_NONE_MATCH, etag.as_str())]).await;
  assert_eq!(fresh.status(), StatusCode::OK);
  assert_ne!(fresh.headers().get(header::ETAG).unwrap().to_str().unwrap(), etag);
  let entries = json_body(fresh).await;
  assert_eq!(entries[0]["activity"]["is_completed"], true);
}

#[tokio::test]
async fn absent_activity_is_null() {
  let app = app().await;
  let resp = send(
    &app,
    "GET",
    &format!("/athletes/{}/activity/{}/2025-03-10", Uuid::new_v4(), Uuid::new_v4()),
    None,
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, Value::Null);
}

#[tokio::test]
async fn recorded_completion_is_stamped_and_readable() {
  let app = app().await;
  let uri = format!("/athletes/{}/activity/{}/2025-03-10", Uuid::new_v4(), Uuid::new_v4());

  let put = send(&app, "PUT", &uri, Some(json!({ "is_completed": true })), vec![]).await;
  assert_eq!(put.status(), StatusCode::OK);
  let written = json_body(put).await;
  assert_eq!(written["is_completed"], true);
  assert!(written["completed_at"].is_string());

  let get = send(&app, "GET", &uri, None, vec![]).await;
  assert_eq!(get.status(), StatusCode::OK);
  let read = json_body(get).await;
  assert_eq!(read["is_completed"], true);
  assert_eq!(read["completed_at"], written["completed_at"]);
}

// ── Catalog and programs ──────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_workout_and_program_are_not_found() {
  let app = app().await;
  let resp = send(&app, "GET", &format!("/workouts/{}", Uuid::new_v4()), None, vec![]).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let resp = send(&app, "GET", &format!("/programs/{}", Uuid::new_v4()), None, vec![]).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_workouts_by_coach() {
  let app = app().await;
  let coach = Uuid::new_v4();
  for description in ["a", "b"] {
    send(
      &app,
      "POST",
      "/workouts",
      Some(json!({ "coach_id": coach, "description": description })),
      vec![],
    )
    .await;
  }
  let resp = send(&app, "GET", &format!("/workouts?coach_id={coach}"), None, vec![]).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await.as_array().unwrap().len(), 2);
}

/// Program p1 (2025-03-01..2025-03-28) with w2 on 03-05, shared by a1 and a2.
async fn shared_program(app: &Router) -> (Uuid, Uuid, Uuid, Uuid) {
  let (a1, a2) = (Uuid::new_v4(), Uuid::new_v4());
  let w2 = create_workout(app, "strides").await;

  let resp = send(
    app,
    "POST",
    "/programs",
    Some(json!({
      "coach_id": Uuid::new_v4(),
      "name": "Spring base",
      "start_date": "2025-03-01",
      "end_date": "2025-03-28",
    })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let program = json_body(resp).await;
  assert_eq!(program["status"], "draft");
  let p1: Uuid = program["program_id"].as_str().unwrap().parse().unwrap();

  let resp = send(
    app,
    "POST",
    &format!("/programs/{p1}/workouts"),
    Some(json!({ "workout_id": w2, "date": "2025-03-05" })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  for athlete in [a1, a2] {
    let resp = send(
      app,
      "POST",
      &format!("/programs/{p1}/assignments"),
      Some(json!({ "athlete_id": athlete, "start_date": "2025-03-01", "end_date": "2025-03-28" })),
      vec![],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  (p1, w2, a1, a2)
}

#[tokio::test]
async fn slot_move_of_program_entry_propagates() {
  let app = app().await;
  let (_, _, a1, a2) = shared_program(&app).await;

  let resp = send(&app, "GET", &schedule_uri(a1, "2025-03-01", "2025-03-31"), None, vec![])
    .await;
  let entries = json_body(resp).await;
  assert_eq!(entries[0]["provenance"]["kind"], "program");
  assert_eq!(entries[0]["provenance"]["program_name"], "Spring base");

  let slot = json!({
    "athlete_id": entries[0]["athlete_id"],
    "workout_id": entries[0]["workout_id"],
    "date": entries[0]["date"],
    "provenance": entries[0]["provenance"],
  });
  let resp = send(
    &app,
    "POST",
    "/schedule/move",
    Some(json!({ "slot": slot, "to_date": "2025-03-06" })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["affected_athletes"].as_array().unwrap().len(), 2);

  let resp = send(&app, "GET", &schedule_uri(a2, "2025-03-01", "2025-03-31"), None, vec![])
    .await;
  let entries = json_body(resp).await;
  assert_eq!(entries.as_array().unwrap().len(), 1);
  assert_eq!(entries[0]["date"], "2025-03-06");
}

#[tokio::test]
async fn program_move_outside_window_is_unprocessable() {
  let app = app().await;
  let (p1, w2, a1, _) = shared_program(&app).await;

  let resp = send(
    &app,
    "PATCH",
    &format!("/programs/{p1}/workouts/{w2}/2025-03-05"),
    Some(json!({ "to_date": "2025-04-02" })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

  let resp = send(&app, "GET", &schedule_uri(a1, "2025-03-01", "2025-03-31"), None, vec![])
    .await;
  assert_eq!(json_body(resp).await[0]["date"], "2025-03-05");
}

#[tokio::test]
async fn program_delete_and_overlapping_enrolment() {
  let app = app().await;
  let (p1, w2, a1, a2) = shared_program(&app).await;

  let resp = send(
    &app,
    "POST",
    &format!("/programs/{p1}/assignments"),
    Some(json!({ "athlete_id": a1, "start_date": "2025-03-10", "end_date": "2025-03-20" })),
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let resp = send(
    &app,
    "DELETE",
    &format!("/programs/{p1}/workouts/{w2}/2025-03-05"),
    None,
    vec![],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  for athlete in [a1, a2] {
    let resp = send(
      &app,
      "GET",
      &schedule_uri(athlete, "2025-03-01", "2025-03-31"),
      None,
      vec![],
    )
    .await;
    assert!(json_body(resp).await.as_array().unwrap().is_empty());
  }
}
