//! Fixtures shared by the unit tests in this crate.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  assignment::{DirectAssignment, NewDirectAssignment},
  memory::MemoryStore,
  program::{NewProgram, NewProgramAssignment, Program, ProgramStatus, ProgramWorkout},
  store::{AssignmentStore as _, WorkoutCatalog as _},
  workout::{NewWorkout, WorkoutDefinition},
};

pub fn d(s: &str) -> NaiveDate { s.parse().expect("valid test date") }

pub fn store() -> Arc<MemoryStore> { Arc::new(MemoryStore::new()) }

pub async fn workout(s: &MemoryStore, name: &str) -> WorkoutDefinition {
  s.create_workout(NewWorkout::new(Uuid::new_v4(), "prescription").named(name))
    .await
    .unwrap()
}

pub async fn direct(
  s: &MemoryStore,
  athlete_id: Uuid,
  workout_id: Uuid,
  date: &str,
) -> DirectAssignment {
  s.insert_direct_assignment(NewDirectAssignment { athlete_id, workout_id, date: d(date) })
    .await
    .unwrap()
}

pub async fn program(s: &MemoryStore, name: &str, start: &str, end: &str) -> Program {
  s.insert_program(NewProgram {
    coach_id:   Uuid::new_v4(),
    name:       name.into(),
    start_date: d(start),
    end_date:   d(end),
    status:     ProgramStatus::Published,
  })
  .await
  .unwrap()
}

pub async fn placement(
  s: &MemoryStore,
  program_id: Uuid,
  workout_id: Uuid,
  date: &str,
) -> ProgramWorkout {
  s.insert_program_workout(program_id, workout_id, d(date)).await.unwrap()
}

pub async fn enrol(s: &MemoryStore, program_id: Uuid, athlete_id: Uuid, start: &str, end: &str) {
  s.insert_program_assignment(NewProgramAssignment {
    program_id,
    athlete_id,
    start_date: d(start),
    end_date: d(end),
  })
  .await
  .unwrap();
}
