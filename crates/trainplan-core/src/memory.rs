//! In-memory implementation of the store traits.
//!
//! Holds every table in plain vectors behind one mutex. Uniqueness rules
//! match the SQLite schema, so engine behaviour is the same on either
//! backend. Intended for tests and for embedding without a database.

use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  activity::ActivityRecord,
  assignment::{DirectAssignment, NewDirectAssignment},
  date::DateRange,
  program::{
    NewProgram, NewProgramAssignment, Program, ProgramAssignment, ProgramWorkout,
  },
  store::{ActivityStore, AssignmentStore, WorkoutCatalog},
  workout::{NewWorkout, WorkoutDefinition},
};

#[derive(Default)]
struct Tables {
  workouts:            Vec<WorkoutDefinition>,
  direct_assignments:  Vec<DirectAssignment>,
  programs:            Vec<Program>,
  program_workouts:    Vec<ProgramWorkout>,
  program_assignments: Vec<ProgramAssignment>,
  activity:            Vec<ActivityRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
    self
      .tables
      .lock()
      .map_err(|e| Error::unavailable(format!("memory store poisoned: {e}")))
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

impl WorkoutCatalog for MemoryStore {
  async fn get_workout(&self, workout_id: Uuid) -> Result<Option<WorkoutDefinition>> {
    let t = self.tables()?;
    Ok(t.workouts.iter().find(|w| w.workout_id == workout_id).cloned())
  }

  async fn create_workout(&self, input: NewWorkout) -> Result<WorkoutDefinition> {
    let workout = input.into_definition(Uuid::new_v4(), Utc::now());
    self.tables()?.workouts.push(workout.clone());
    Ok(workout)
  }

  async fn list_workouts(&self, coach_id: Uuid) -> Result<Vec<WorkoutDefinition>> {
    let t = self.tables()?;
    Ok(t.workouts.iter().filter(|w| w.coach_id == coach_id).cloned().collect())
  }

  async fn delete_workout(&self, workout_id: Uuid) -> Result<bool> {
    let mut t = self.tables()?;
    let before = t.workouts.len();
    t.workouts.retain(|w| w.workout_id != workout_id);
    Ok(t.workouts.len() != before)
  }
}

// ─── Assignments ─────────────────────────────────────────────────────────────

impl AssignmentStore for MemoryStore {
  async fn find_direct_assignment(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date:       NaiveDate,
  ) -> Result<Option<DirectAssignment>> {
    let t = self.tables()?;
    Ok(
      t.direct_assignments
        .iter()
        .find(|a| {
          a.athlete_id == athlete_id && a.workout_id == workout_id && a.date == date
        })
        .cloned(),
    )
  }

  async fn count_direct_assignments(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date:       NaiveDate,
  ) -> Result<usize> {
    let t = self.tables()?;
    Ok(
      t.direct_assignments
        .iter()
        .filter(|a| {
          a.athlete_id == athlete_id && a.workout_id == workout_id && a.date == date
        })
        .count(),
    )
  }

  async fn find_direct_assignments_in_range(
    &self,
    athlete_id: Uuid,
    range:      DateRange,
  ) -> Result<Vec<DirectAssignment>> {
    let t = self.tables()?;
    Ok(
      t.direct_assignments
        .iter()
        .filter(|a| a.athlete_id == athlete_id && range.contains(a.date))
        .cloned()
        .collect(),
    )
  }

  async fn insert_direct_assignment(
    &self,
    input: NewDirectAssignment,
  ) -> Result<DirectAssignment> {
    let mut t = self.tables()?;
    let clash = t.direct_assignments.iter().any(|a| {
      a.athlete_id == input.athlete_id
        && a.workout_id == input.workout_id
        && a.date == input.date
    });
    if clash {
      return Err(Error::DuplicateAssignment {
        owner_id:   input.athlete_id,
        workout_id: input.workout_id,
        date:       input.date,
      });
    }
    let assignment = input.into_assignment(Uuid::new_v4(), Utc::now());
    t.direct_assignments.push(assignment.clone());
    Ok(assignment)
  }

  async fn update_direct_assignment_date(
    &self,
    assignment_id: Uuid,
    date:          NaiveDate,
  ) -> Result<bool> {
    let mut t = self.tables()?;
    let Some(idx) =
      t.direct_assignments.iter().position(|a| a.assignment_id == assignment_id)
    else {
      return Ok(false);
    };
    let (athlete_id, workout_id) = {
      let a = &t.direct_assignments[idx];
      (a.athlete_id, a.workout_id)
    };
    let clash = t.direct_assignments.iter().any(|a| {
      a.assignment_id != assignment_id
        && a.athlete_id == athlete_id
        && a.workout_id == workout_id
        && a.date == date
    });
    if clash {
      return Err(Error::DuplicateAssignment { owner_id: athlete_id, workout_id, date });
    }
    t.direct_assignments[idx].date = date;
    Ok(true)
  }

  async fn delete_direct_assignment(&self, assignment_id: Uuid) -> Result<bool> {
    let mut t = self.tables()?;
    let before = t.direct_assignments.len();
    t.direct_assignments.retain(|a| a.assignment_id != assignment_id);
    Ok(t.direct_assignments.len() != before)
  }

  async fn get_program(&self, program_id: Uuid) -> Result<Option<Program>> {
    let t = self.tables()?;
    Ok(t.programs.iter().find(|p| p.program_id == program_id).cloned())
  }

  async fn insert_program(&self, input: NewProgram) -> Result<Program> {
    let program = Program {
      program_id: Uuid::new_v4(),
      coach_id:   input.coach_id,
      name:       input.name,
      start_date: input.start_date,
      end_date:   input.end_date,
      status:     input.status,
      created_at: Utc::now(),
    };
    self.tables()?.programs.push(program.clone());
    Ok(program)
  }

  async fn find_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date:       NaiveDate,
  ) -> Result<Option<ProgramWorkout>> {
    let t = self.tables()?;
    Ok(
      t.program_workouts
        .iter()
        .find(|pw| {
          pw.program_id == program_id && pw.workout_id == workout_id && pw.date == date
        })
        .cloned(),
    )
  }

  async fn find_program_workouts_in_range(
    &self,
    program_id: Uuid,
    range:      DateRange,
  ) -> Result<Vec<ProgramWorkout>> {
    let t = self.tables()?;
    Ok(
      t.program_workouts
        .iter()
        .filter(|pw| pw.program_id == program_id && range.contains(pw.date))
        .cloned()
        .collect(),
    )
  }

  async fn insert_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date:       NaiveDate,
  ) -> Result<ProgramWorkout> {
    let mut t = self.tables()?;
    if !t.programs.iter().any(|p| p.program_id == program_id) {
      return Err(Error::ConstraintViolation(format!(
        "program_workouts.program_id references missing program {program_id}"
      )));
    }
    let clash = t.program_workouts.iter().any(|pw| {
      pw.program_id == program_id && pw.workout_id == workout_id && pw.date == date
    });
    if clash {
      return Err(Error::DuplicateAssignment { owner_id: program_id, workout_id, date });
    }
    let pw = ProgramWorkout {
      program_workout_id: Uuid::new_v4(),
      program_id,
      workout_id,
      date,
    };
    t.program_workouts.push(pw.clone());
    Ok(pw)
  }

  async fn update_program_workout_date(
    &self,
    program_workout_id: Uuid,
    date:               NaiveDate,
  ) -> Result<bool> {
    let mut t = self.tables()?;
    let Some(idx) = t
      .program_workouts
      .iter()
      .position(|pw| pw.program_workout_id == program_workout_id)
    else {
      return Ok(false);
    };
    let (program_id, workout_id) = {
      let pw = &t.program_workouts[idx];
      (pw.program_id, pw.workout_id)
    };
    let clash = t.program_workouts.iter().any(|pw| {
      pw.program_workout_id != program_workout_id
        && pw.program_id == program_id
        && pw.workout_id == workout_id
        && pw.date == date
    });
    if clash {
      return Err(Error::DuplicateAssignment { owner_id: program_id, workout_id, date });
    }
    t.program_workouts[idx].date = date;
    Ok(true)
  }

  async fn delete_program_workout(&self, program_workout_id: Uuid) -> Result<bool> {
    let mut t = self.tables()?;
    let before = t.program_workouts.len();
    t.program_workouts.retain(|pw| pw.program_workout_id != program_workout_id);
    Ok(t.program_workouts.len() != before)
  }

  async fn find_active_program_assignments(
    &self,
    athlete_id: Uuid,
    range:      DateRange,
  ) -> Result<Vec<ProgramAssignment>> {
    let t = self.tables()?;
    Ok(
      t.program_assignments
        .iter()
        .filter(|pa| pa.athlete_id == athlete_id && pa.window().overlaps(&range))
        .cloned()
        .collect(),
    )
  }

  async fn list_program_assignments(
    &self,
    program_id: Uuid,
  ) -> Result<Vec<ProgramAssignment>> {
    let t = self.tables()?;
    Ok(
      t.program_assignments
        .iter()
        .filter(|pa| pa.program_id == program_id)
        .cloned()
        .collect(),
    )
  }

  async fn insert_program_assignment(
    &self,
    input: NewProgramAssignment,
  ) -> Result<ProgramAssignment> {
    let mut t = self.tables()?;
    if !t.programs.iter().any(|p| p.program_id == input.program_id) {
      return Err(Error::ConstraintViolation(format!(
        "program_assignments.program_id references missing program {}",
        input.program_id
      )));
    }
    let pa = ProgramAssignment {
      program_assignment_id: Uuid::new_v4(),
      program_id:            input.program_id,
      athlete_id:            input.athlete_id,
      start_date:            input.start_date,
      end_date:              input.end_date,
    };
    t.program_assignments.push(pa.clone());
    Ok(pa)
  }
}

// ─── Activity ────────────────────────────────────────────────────────────────

impl ActivityStore for MemoryStore {
  async fn find_activity_record(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date:       NaiveDate,
  ) -> Result<Option<ActivityRecord>> {
    let t = self.tables()?;
    Ok(
      t.activity
        .iter()
        .find(|r| {
          r.athlete_id == athlete_id
            && r.workout_id == workout_id
            && r.scheduled_date == date
        })
        .cloned(),
    )
  }

  async fn find_activity_in_range(
    &self,
    athlete_id: Uuid,
    range:      DateRange,
  ) -> Result<Vec<ActivityRecord>> {
    let t = self.tables()?;
    Ok(
      t.activity
        .iter()
        .filter(|r| r.athlete_id == athlete_id && range.contains(r.scheduled_date))
        .cloned()
        .collect(),
    )
  }

  async fn upsert_activity_record(&self, record: ActivityRecord) -> Result<ActivityRecord> {
    let mut t = self.tables()?;
    let key = record.key();
    match t.activity.iter_mut().find(|r| r.key() == key) {
      Some(existing) => *existing = record.clone(),
      None => t.activity.push(record.clone()),
    }
    Ok(record)
  }
}
