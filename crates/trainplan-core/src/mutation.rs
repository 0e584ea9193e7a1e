//! The mutation engine: the only path by which calendar gestures change the
//! assignment tables.
//!
//! Every intent is validated in full before its single write, so a rejected
//! intent leaves the store untouched. Dispatch is an exhaustive match on
//! [`Provenance`]: direct entries touch one athlete's row, program entries
//! touch the shared [`ProgramWorkout`](crate::program::ProgramWorkout) row
//! and therefore every athlete enrolled over the affected dates.
//!
//! Activity records are never rewritten here. A move or delete leaves the
//! record at its old key and reports it in the outcome.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  activity::{ActivityKey, ActivityRecord, ActivityUpdate},
  assignment::{DirectAssignment, NewDirectAssignment},
  program::{NewProgram, NewProgramAssignment, Program, ProgramAssignment, ProgramWorkout},
  schedule::{DeleteOutcome, MoveOutcome, Provenance, ScheduleSlot},
  store::ScheduleStore,
  workout::{NewWorkout, WorkoutDefinition},
};

pub struct MutationEngine<S> {
  store: Arc<S>,
}

impl<S> Clone for MutationEngine<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: ScheduleStore> MutationEngine<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  // ─── Create ────────────────────────────────────────────────────────────────

  /// Assign `workout_id` to `athlete_id` on `date`. Always a direct
  /// assignment.
  ///
  /// The pre-check gives a clean error for the common case; the store's
  /// uniqueness constraint covers a concurrent insert; the post-insert count
  /// catches a backend that has no such constraint.
  pub async fn create(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<DirectAssignment> {
    let duplicate = || Error::DuplicateAssignment { owner_id: athlete_id, workout_id, date };

    self.require_workout(workout_id).await?;
    if self
      .store
      .find_direct_assignment(athlete_id, workout_id, date)
      .await?
      .is_some()
    {
      return Err(duplicate());
    }

    let assignment = self
      .store
      .insert_direct_assignment(NewDirectAssignment { athlete_id, workout_id, date })
      .await
      .inspect_err(log_constraint_violation)?;

    let bound = self
      .store
      .count_direct_assignments(athlete_id, workout_id, date)
      .await?;
    if bound > 1 {
      warn!(
        %athlete_id, %workout_id, %date,
        "concurrent duplicate direct assignment; rolling back"
      );
      self
        .store
        .delete_direct_assignment(assignment.assignment_id)
        .await?;
      return Err(duplicate());
    }

    info!(
      %athlete_id, %workout_id, %date,
      assignment_id = %assignment.assignment_id,
      "created direct assignment"
    );
    Ok(assignment)
  }

  /// Create a template inline from the calendar and assign it in one step.
  /// If the assignment is rejected the new template is removed again.
  pub async fn create_with_workout(
    &self,
    input: NewWorkout,
    athlete_id: Uuid,
    date: NaiveDate,
  ) -> Result<(WorkoutDefinition, DirectAssignment)> {
    let workout = self.store.create_workout(input).await?;
    match self.create(athlete_id, workout.workout_id, date).await {
      Ok(assignment) => Ok((workout, assignment)),
      Err(err) => {
        if let Err(cleanup) = self.store.delete_workout(workout.workout_id).await {
          warn!(
            workout_id = %workout.workout_id,
            error = %cleanup,
            "failed to remove template after rejected assignment"
          );
        }
        Err(err)
      }
    }
  }

  // ─── Move ──────────────────────────────────────────────────────────────────

  /// Move the entry addressed by `slot` from `slot.date` to `to`.
  pub async fn move_entry(&self, slot: &ScheduleSlot, to: NaiveDate) -> Result<MoveOutcome> {
    match &slot.provenance {
      Provenance::Direct { .. } => {
        self
          .move_direct(slot.athlete_id, slot.workout_id, slot.date, to)
          .await
      }
      Provenance::Program { program_id, .. } => {
        self
          .move_program_workout(
            Some(slot.athlete_id),
            *program_id,
            slot.workout_id,
            slot.date,
            to,
          )
          .await
      }
    }
  }

  /// Move one athlete's direct assignment. No window constraint applies.
  pub async fn move_direct(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<MoveOutcome> {
    let assignment = self
      .store
      .find_direct_assignment(athlete_id, workout_id, from)
      .await?
      .ok_or(Error::AssignmentNotFound { owner_id: athlete_id, workout_id, date: from })?;
    let provenance = Provenance::Direct { assignment_id: assignment.assignment_id };

    if from == to {
      return Ok(unchanged_move(workout_id, provenance, from));
    }
    if self
      .store
      .find_direct_assignment(athlete_id, workout_id, to)
      .await?
      .is_some()
    {
      return Err(Error::DuplicateAssignment { owner_id: athlete_id, workout_id, date: to });
    }
    let orphaned_activity = self
      .store
      .find_activity_record(athlete_id, workout_id, from)
      .await?;

    let updated = self
      .store
      .update_direct_assignment_date(assignment.assignment_id, to)
      .await
      .inspect_err(log_constraint_violation)?;
    if !updated {
      return Err(Error::AssignmentNotFound { owner_id: athlete_id, workout_id, date: from });
    }

    info!(%athlete_id, %workout_id, %from, %to, "moved direct assignment");
    Ok(MoveOutcome {
      workout_id,
      provenance,
      from_date: from,
      to_date: to,
      affected_athletes: vec![athlete_id],
      orphaned_activity,
    })
  }

  /// Move a program workout. This changes the calendar of every athlete
  /// enrolled over either date; there is no per-athlete variant.
  ///
  /// `initiator` is the athlete whose calendar the gesture came from, if
  /// any; only their orphaned activity is reported.
  pub async fn move_program_workout(
    &self,
    initiator: Option<Uuid>,
    program_id: Uuid,
    workout_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<MoveOutcome> {
    let program = self.require_program(program_id).await?;
    let placement = self
      .find_placement(&program, workout_id, from)
      .await?;
    let provenance = program_provenance(&program, &placement);

    let window = program.window();
    if !window.contains(to) {
      return Err(Error::InvalidTargetDate { date: to, window });
    }
    if from == to {
      return Ok(unchanged_move(workout_id, provenance, from));
    }
    if self
      .store
      .find_program_workout(program_id, workout_id, to)
      .await?
      .is_some()
    {
      return Err(Error::DuplicateAssignment { owner_id: program_id, workout_id, date: to });
    }

    let affected_athletes = self.athletes_covering(program_id, &[from, to]).await?;
    let orphaned_activity = self.initiator_activity(initiator, workout_id, from).await?;

    let updated = self
      .store
      .update_program_workout_date(placement.program_workout_id, to)
      .await
      .inspect_err(log_constraint_violation)?;
    if !updated {
      return Err(Error::AssignmentNotFound { owner_id: program_id, workout_id, date: from });
    }

    info!(
      %program_id, %workout_id, %from, %to,
      affected = affected_athletes.len(),
      "moved program workout for all enrolled athletes"
    );
    Ok(MoveOutcome {
      workout_id,
      provenance,
      from_date: from,
      to_date: to,
      affected_athletes,
      orphaned_activity,
    })
  }

  // ─── Delete ────────────────────────────────────────────────────────────────

  pub async fn delete_entry(&self, slot: &ScheduleSlot) -> Result<DeleteOutcome> {
    match &slot.provenance {
      Provenance::Direct { .. } => {
        self
          .delete_direct(slot.athlete_id, slot.workout_id, slot.date)
          .await
      }
      Provenance::Program { program_id, .. } => {
        self
          .delete_program_workout(
            Some(slot.athlete_id),
            *program_id,
            slot.workout_id,
            slot.date,
          )
          .await
      }
    }
  }

  /// Remove a direct assignment. Its activity record is left in place.
  pub async fn delete_direct(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<DeleteOutcome> {
    let not_found = || Error::AssignmentNotFound { owner_id: athlete_id, workout_id, date };

    let assignment = self
      .store
      .find_direct_assignment(athlete_id, workout_id, date)
      .await?
      .ok_or_else(not_found)?;
    let orphaned_activity = self
      .store
      .find_activity_record(athlete_id, workout_id, date)
      .await?;

    if !self
      .store
      .delete_direct_assignment(assignment.assignment_id)
      .await
      .inspect_err(log_constraint_violation)?
    {
      return Err(not_found());
    }

    info!(%athlete_id, %workout_id, %date, "deleted direct assignment");
    Ok(DeleteOutcome {
      workout_id,
      provenance: Provenance::Direct { assignment_id: assignment.assignment_id },
      date,
      affected_athletes: vec![athlete_id],
      orphaned_activity,
    })
  }

  /// Remove a program workout for every enrolled athlete.
  pub async fn delete_program_workout(
    &self,
    initiator: Option<Uuid>,
    program_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<DeleteOutcome> {
    let program = self.require_program(program_id).await?;
    let placement = self.find_placement(&program, workout_id, date).await?;
    let affected_athletes = self.athletes_covering(program_id, &[date]).await?;
    let orphaned_activity = self.initiator_activity(initiator, workout_id, date).await?;

    if !self
      .store
      .delete_program_workout(placement.program_workout_id)
      .await
      .inspect_err(log_constraint_violation)?
    {
      return Err(Error::AssignmentNotFound { owner_id: program_id, workout_id, date });
    }

    info!(
      %program_id, %workout_id, %date,
      affected = affected_athletes.len(),
      "deleted program workout for all enrolled athletes"
    );
    Ok(DeleteOutcome {
      workout_id,
      provenance: program_provenance(&program, &placement),
      date,
      affected_athletes,
      orphaned_activity,
    })
  }

  // ─── Program authoring ─────────────────────────────────────────────────────

  pub async fn create_program(&self, input: NewProgram) -> Result<Program> {
    input.window()?;
    let program = self.store.insert_program(input).await?;
    info!(program_id = %program.program_id, name = %program.name, "created program");
    Ok(program)
  }

  /// Place `workout_id` in the program on `date`, which must fall within
  /// the program's own range.
  pub async fn add_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<ProgramWorkout> {
    let program = self.require_program(program_id).await?;
    self.require_workout(workout_id).await?;

    let window = program.window();
    if !window.contains(date) {
      return Err(Error::InvalidTargetDate { date, window });
    }
    if self
      .store
      .find_program_workout(program_id, workout_id, date)
      .await?
      .is_some()
    {
      return Err(Error::DuplicateAssignment { owner_id: program_id, workout_id, date });
    }

    self
      .store
      .insert_program_workout(program_id, workout_id, date)
      .await
      .inspect_err(log_constraint_violation)
  }

  /// Enrol an athlete in a program for a window. An athlete may not hold
  /// two overlapping windows on the same program.
  pub async fn assign_program(
    &self,
    input: NewProgramAssignment,
  ) -> Result<ProgramAssignment> {
    let window = input.window()?;
    self.require_program(input.program_id).await?;

    let overlapping = self
      .store
      .list_program_assignments(input.program_id)
      .await?
      .iter()
      .any(|pa| pa.athlete_id == input.athlete_id && pa.window().overlaps(&window));
    if overlapping {
      return Err(Error::OverlappingProgramAssignment {
        athlete_id: input.athlete_id,
        program_id: input.program_id,
      });
    }

    let enrolment = self
      .store
      .insert_program_assignment(input)
      .await
      .inspect_err(log_constraint_violation)?;
    info!(
      program_id = %enrolment.program_id,
      athlete_id = %enrolment.athlete_id,
      %window,
      "assigned program"
    );
    Ok(enrolment)
  }

  // ─── Athlete activity ──────────────────────────────────────────────────────

  /// Apply an athlete's completion, scaling or notes update to the record
  /// at `key`, creating it if this is the first attempt.
  pub async fn record_activity(
    &self,
    key: ActivityKey,
    update: ActivityUpdate,
  ) -> Result<ActivityRecord> {
    let mut record = self
      .store
      .find_activity_record(key.athlete_id, key.workout_id, key.scheduled_date)
      .await?
      .unwrap_or_else(|| ActivityRecord::empty(key));
    update.apply(&mut record, Utc::now());
    self.store.upsert_activity_record(record).await
  }

  // ─── Helpers ───────────────────────────────────────────────────────────────

  async fn require_workout(&self, workout_id: Uuid) -> Result<WorkoutDefinition> {
    self
      .store
      .get_workout(workout_id)
      .await?
      .ok_or(Error::WorkoutNotFound(workout_id))
  }

  async fn require_program(&self, program_id: Uuid) -> Result<Program> {
    self
      .store
      .get_program(program_id)
      .await?
      .ok_or(Error::ProgramNotFound(program_id))
  }

  async fn find_placement(
    &self,
    program: &Program,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<ProgramWorkout> {
    self
      .store
      .find_program_workout(program.program_id, workout_id, date)
      .await?
      .ok_or(Error::AssignmentNotFound {
        owner_id: program.program_id,
        workout_id,
        date,
      })
  }

  /// Athletes enrolled in `program_id` over any of `days`, sorted.
  async fn athletes_covering(
    &self,
    program_id: Uuid,
    days: &[NaiveDate],
  ) -> Result<Vec<Uuid>> {
    let mut athletes: Vec<Uuid> = self
      .store
      .list_program_assignments(program_id)
      .await?
      .into_iter()
      .filter(|pa| days.iter().any(|day| pa.window().contains(*day)))
      .map(|pa| pa.athlete_id)
      .collect();
    athletes.sort();
    athletes.dedup();
    Ok(athletes)
  }

  async fn initiator_activity(
    &self,
    initiator: Option<Uuid>,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> Result<Option<ActivityRecord>> {
    match initiator {
      Some(athlete_id) => {
        self
          .store
          .find_activity_record(athlete_id, workout_id, date)
          .await
      }
      None => Ok(None),
    }
  }
}

fn program_provenance(program: &Program, placement: &ProgramWorkout) -> Provenance {
  Provenance::Program {
    program_id:         program.program_id,
    program_workout_id: placement.program_workout_id,
    program_name:       program.name.clone(),
  }
}

fn unchanged_move(workout_id: Uuid, provenance: Provenance, day: NaiveDate) -> MoveOutcome {
  MoveOutcome {
    workout_id,
    provenance,
    from_date: day,
    to_date: day,
    affected_athletes: vec![],
    orphaned_activity: None,
  }
}

fn log_constraint_violation(err: &Error) {
  if let Error::ConstraintViolation(message) = err {
    error!(%message, "store rejected mutation");
  }
}
