//! Store traits and the query shapes they accept.
//!
//! Backends (`trainplan-store-sqlite`, [`MemoryStore`](crate::memory::MemoryStore))
//! implement these; the resolver and mutation engine depend only on the
//! traits. Every method is a single query or statement. Uniqueness rules are
//! the backend's job, business rules are not.
//!
//! Backends report their own failures as [`Error::StoreUnavailable`] or
//! [`Error::ConstraintViolation`](crate::Error::ConstraintViolation), and a
//! rejected uniqueness constraint on a binding as
//! [`Error::DuplicateAssignment`](crate::Error::DuplicateAssignment).
//!
//! [`Error::StoreUnavailable`]: crate::Error::StoreUnavailable

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Result,
  activity::ActivityRecord,
  assignment::{DirectAssignment, NewDirectAssignment},
  date::DateRange,
  program::{
    NewProgram, NewProgramAssignment, Program, ProgramAssignment, ProgramWorkout,
  },
  workout::{NewWorkout, WorkoutDefinition},
};

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// The coach's library of workout templates.
pub trait WorkoutCatalog: Send + Sync {
  fn get_workout(
    &self,
    workout_id: Uuid,
  ) -> impl Future<Output = Result<Option<WorkoutDefinition>>> + Send + '_;

  fn create_workout(
    &self,
    input: NewWorkout,
  ) -> impl Future<Output = Result<WorkoutDefinition>> + Send + '_;

  /// All templates owned by `coach_id`, oldest first.
  fn list_workouts(
    &self,
    coach_id: Uuid,
  ) -> impl Future<Output = Result<Vec<WorkoutDefinition>>> + Send + '_;

  /// Remove a template. Assignments that reference it are left alone.
  /// Returns `false` if it did not exist.
  fn delete_workout(
    &self,
    workout_id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;
}

// ─── Assignments ─────────────────────────────────────────────────────────────

/// Direct assignments, programs, program workouts and program assignments.
pub trait AssignmentStore: Send + Sync {
  // ── Direct assignments ────────────────────────────────────────────────

  fn find_direct_assignment(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<DirectAssignment>>> + Send + '_;

  /// Number of rows bound to `(athlete_id, workout_id, date)`. Used to
  /// re-check uniqueness after an insert.
  fn count_direct_assignments(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<usize>> + Send + '_;

  fn find_direct_assignments_in_range(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<DirectAssignment>>> + Send + '_;

  /// Insert a new binding. Fails with `DuplicateAssignment` if the backend's
  /// uniqueness constraint rejects it.
  fn insert_direct_assignment(
    &self,
    input: NewDirectAssignment,
  ) -> impl Future<Output = Result<DirectAssignment>> + Send + '_;

  /// Returns `false` if no row has `assignment_id`.
  fn update_direct_assignment_date(
    &self,
    assignment_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// Returns `false` if no row has `assignment_id`.
  fn delete_direct_assignment(
    &self,
    assignment_id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  // ── Programs ──────────────────────────────────────────────────────────

  fn get_program(
    &self,
    program_id: Uuid,
  ) -> impl Future<Output = Result<Option<Program>>> + Send + '_;

  fn insert_program(
    &self,
    input: NewProgram,
  ) -> impl Future<Output = Result<Program>> + Send + '_;

  // ── Program workouts ──────────────────────────────────────────────────

  fn find_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<ProgramWorkout>>> + Send + '_;

  fn find_program_workouts_in_range(
    &self,
    program_id: Uuid,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<ProgramWorkout>>> + Send + '_;

  /// Fails with `DuplicateAssignment` on a `(program, workout, date)` clash.
  fn insert_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<ProgramWorkout>> + Send + '_;

  fn update_program_workout_date(
    &self,
    program_workout_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  fn delete_program_workout(
    &self,
    program_workout_id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  // ── Program assignments ───────────────────────────────────────────────

  /// Assignments of `athlete_id` whose window overlaps `range`.
  fn find_active_program_assignments(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<ProgramAssignment>>> + Send + '_;

  /// Every assignment of `program_id`, regardless of window.
  fn list_program_assignments(
    &self,
    program_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ProgramAssignment>>> + Send + '_;

  fn insert_program_assignment(
    &self,
    input: NewProgramAssignment,
  ) -> impl Future<Output = Result<ProgramAssignment>> + Send + '_;
}

// ─── Activity ────────────────────────────────────────────────────────────────

pub trait ActivityStore: Send + Sync {
  fn find_activity_record(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<ActivityRecord>>> + Send + '_;

  /// All of `athlete_id`'s records scheduled within `range`.
  fn find_activity_in_range(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<ActivityRecord>>> + Send + '_;

  /// Insert or replace the record at its `(athlete, workout, date)` key.
  fn upsert_activity_record(
    &self,
    record: ActivityRecord,
  ) -> impl Future<Output = Result<ActivityRecord>> + Send + '_;
}

// ─── Union ───────────────────────────────────────────────────────────────────

/// A backend providing every store the calendar needs.
pub trait ScheduleStore: WorkoutCatalog + AssignmentStore + ActivityStore {}

impl<T> ScheduleStore for T where T: WorkoutCatalog + AssignmentStore + ActivityStore {}
