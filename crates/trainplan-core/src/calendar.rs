//! [`Calendar`]: the surface a calendar presenter talks to.
//!
//! Wires one injected store into the resolver, the activity overlay and the
//! mutation engine. Cloning is cheap; every clone shares the store.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Result,
  activity::{ActivityKey, ActivityRecord, ActivityUpdate},
  assignment::DirectAssignment,
  date::DateRange,
  mutation::MutationEngine,
  overlay::ActivityOverlay,
  program::{NewProgram, NewProgramAssignment, Program, ProgramAssignment, ProgramWorkout},
  resolver::Resolver,
  schedule::{DeleteOutcome, MoveOutcome, ResolvedScheduleEntry, ScheduleSlot},
  store::ScheduleStore,
  workout::{NewWorkout, WorkoutDefinition},
};

pub struct Calendar<S> {
  store:    Arc<S>,
  resolver: Resolver<S>,
  overlay:  ActivityOverlay<S>,
  engine:   MutationEngine<S>,
}

impl<S> Clone for Calendar<S> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      resolver: self.resolver.clone(),
      overlay:  self.overlay.clone(),
      engine:   self.engine.clone(),
    }
  }
}

impl<S: ScheduleStore> Calendar<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      resolver: Resolver::new(store.clone()),
      overlay: ActivityOverlay::new(store.clone()),
      engine: MutationEngine::new(store.clone()),
      store,
    }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Resolve and overlay `athlete_id`'s schedule for `[start, end]`.
  pub async fn resolve_schedule(
    &self,
    athlete_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<ResolvedScheduleEntry>> {
    let range = DateRange::new(start, end)?;
    let entries = self.resolver.resolve(athlete_id, range).await?;
    self.overlay.overlay(entries, athlete_id).await
  }

  pub async fn get_activity(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<Option<ActivityRecord>> {
    self
      .overlay
      .get_activity(ActivityKey { athlete_id, workout_id, scheduled_date: date })
      .await
  }

  // ── Direct assignments ────────────────────────────────────────────────

  pub async fn create_direct_assignment(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<DirectAssignment> {
    self.engine.create(athlete_id, workout_id, date).await
  }

  pub async fn create_workout_and_assign(
    &self,
    input: NewWorkout,
    athlete_id: Uuid,
    date: NaiveDate,
  ) -> Result<(WorkoutDefinition, DirectAssignment)> {
    self.engine.create_with_workout(input, athlete_id, date).await
  }

  pub async fn move_direct_assignment(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<MoveOutcome> {
    self.engine.move_direct(athlete_id, workout_id, from, to).await
  }

  pub async fn delete_direct_assignment(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<DeleteOutcome> {
    self.engine.delete_direct(athlete_id, workout_id, date).await
  }

  // ── Program workouts ──────────────────────────────────────────────────

  pub async fn move_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<MoveOutcome> {
    self
      .engine
      .move_program_workout(None, program_id, workout_id, from, to)
      .await
  }

  pub async fn delete_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<DeleteOutcome> {
    self
      .engine
      .delete_program_workout(None, program_id, workout_id, date)
      .await
  }

  // ── Intents against a resolved entry ──────────────────────────────────

  pub async fn move_entry(&self, slot: &ScheduleSlot, to: NaiveDate) -> Result<MoveOutcome> {
    self.engine.move_entry(slot, to).await
  }

  pub async fn delete_entry(&self, slot: &ScheduleSlot) -> Result<DeleteOutcome> {
    self.engine.delete_entry(slot).await
  }

  // ── Authoring ─────────────────────────────────────────────────────────

  pub async fn create_workout(&self, input: NewWorkout) -> Result<WorkoutDefinition> {
    self.store.create_workout(input).await
  }

  pub async fn create_program(&self, input: NewProgram) -> Result<Program> {
    self.engine.create_program(input).await
  }

  pub async fn add_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<ProgramWorkout> {
    self.engine.add_program_workout(program_id, workout_id, date).await
  }

  pub async fn assign_program(&self, input: NewProgramAssignment) -> Result<ProgramAssignment> {
    self.engine.assign_program(input).await
  }

  pub async fn record_activity(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
    update: ActivityUpdate,
  ) -> Result<ActivityRecord> {
    self
      .engine
      .record_activity(ActivityKey { athlete_id, workout_id, scheduled_date: date }, update)
      .await
  }
}
