//! JSON REST API for Trainplan.
//!
//! Exposes an axum [`Router`] backed by any [`ScheduleStore`]. Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", trainplan_api::api_router(store.clone()))
//! ```

pub mod activity;
pub mod assignments;
pub mod error;
pub mod etag;
pub mod programs;
pub mod schedule;
pub mod workouts;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use trainplan_core::{Calendar, store::ScheduleStore};

pub use error::ApiError;

/// Handler state: the calendar facade over the shared store.
pub type AppState<S> = Arc<Calendar<S>>;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ScheduleStore + 'static,
{
  let state: AppState<S> = Arc::new(Calendar::new(store));

  Router::new()
    // Athlete calendar
    .route("/athletes/{athlete_id}/schedule", get(schedule::get_schedule::<S>))
    .route("/athletes/{athlete_id}/assignments", post(assignments::create::<S>))
    .route(
      "/athletes/{athlete_id}/assignments/new-workout",
      post(assignments::create_with_workout::<S>),
    )
    .route(
      "/athletes/{athlete_id}/assignments/{workout_id}/{date}",
      patch(assignments::move_one::<S>).delete(assignments::delete_one::<S>),
    )
    .route(
      "/athletes/{athlete_id}/activity/{workout_id}/{date}",
      get(activity::get_one::<S>).put(activity::record::<S>),
    )
    // Slot intents
    .route("/schedule/move", post(schedule::move_slot::<S>))
    .route("/schedule/delete", post(schedule::delete_slot::<S>))
    // Catalog
    .route("/workouts", get(workouts::list::<S>).post(workouts::create::<S>))
    .route("/workouts/{id}", get(workouts::get_one::<S>))
    // Programs
    .route("/programs", post(programs::create::<S>))
    .route("/programs/{id}", get(programs::get_one::<S>))
    .route("/programs/{id}/workouts", post(programs::add_workout::<S>))
    .route(
      "/programs/{id}/workouts/{workout_id}/{date}",
      patch(programs::move_workout::<S>).delete(programs::delete_workout::<S>),
    )
    .route("/programs/{id}/assignments", post(programs::assign::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
