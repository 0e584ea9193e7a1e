//! Error types for `trainplan-core`.
//!
//! Every failure a resolution or mutation can produce is a variant here.
//! Store adapters translate their own errors into [`Error::StoreUnavailable`]
//! or [`Error::ConstraintViolation`] before handing them back to the engine.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::date::DateRange;

#[derive(Debug, Error)]
pub enum Error {
  /// A binding for `(owner, workout, date)` already exists. The owner is the
  /// athlete for direct assignments and the program for program workouts.
  #[error("workout {workout_id} is already scheduled for {owner_id} on {date}")]
  DuplicateAssignment {
    owner_id:   Uuid,
    workout_id: Uuid,
    date:       NaiveDate,
  },

  /// No binding matched `(owner, workout, date)`; the caller's view is stale.
  #[error("no assignment of workout {workout_id} for {owner_id} on {date}")]
  AssignmentNotFound {
    owner_id:   Uuid,
    workout_id: Uuid,
    date:       NaiveDate,
  },

  #[error("target date {date} is outside {window}")]
  InvalidTargetDate { date: NaiveDate, window: DateRange },

  #[error("invalid date range: {start} is after {end}")]
  InvalidDateRange { start: NaiveDate, end: NaiveDate },

  #[error(
    "athlete {athlete_id} already has an overlapping window for program {program_id}"
  )]
  OverlappingProgramAssignment { athlete_id: Uuid, program_id: Uuid },

  #[error("workout not found: {0}")]
  WorkoutNotFound(Uuid),

  #[error("program not found: {0}")]
  ProgramNotFound(Uuid),

  /// Transport or infrastructure failure in the backing store.
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The backing store rejected an operation outright.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),
}

impl Error {
  /// Wrap any backend error as [`Error::StoreUnavailable`].
  pub fn unavailable(
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::StoreUnavailable(source.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
