//! Programs and the two tables hanging off them.
//!
//! A [`ProgramWorkout`] belongs to the program, not to any athlete. Every
//! athlete whose [`ProgramAssignment`] window covers its date sees it, so
//! changing its date reschedules all of them at once.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Result, date::DateRange};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProgramStatus {
  #[default]
  Draft,
  Published,
  Archived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
  pub program_id: Uuid,
  pub coach_id:   Uuid,
  pub name:       String,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
  pub status:     ProgramStatus,
  pub created_at: DateTime<Utc>,
}

impl Program {
  /// The span every [`ProgramWorkout`] of this program must fall within.
  pub fn window(&self) -> DateRange {
    DateRange { start: self.start_date, end: self.end_date }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgram {
  pub coach_id:   Uuid,
  pub name:       String,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
  #[serde(default)]
  pub status:     ProgramStatus,
}

impl NewProgram {
  pub fn window(&self) -> Result<DateRange> {
    DateRange::new(self.start_date, self.end_date)
  }
}

/// A dated placement of a workout inside a program, shared by all athletes
/// assigned to that program. Unique per `(program_id, workout_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramWorkout {
  pub program_workout_id: Uuid,
  pub program_id:         Uuid,
  pub workout_id:         Uuid,
  pub date:               NaiveDate,
}

/// The window during which one athlete follows one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramAssignment {
  pub program_assignment_id: Uuid,
  pub program_id:            Uuid,
  pub athlete_id:            Uuid,
  pub start_date:            NaiveDate,
  pub end_date:              NaiveDate,
}

impl ProgramAssignment {
  pub fn window(&self) -> DateRange {
    DateRange { start: self.start_date, end: self.end_date }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProgramAssignment {
  pub program_id: Uuid,
  pub athlete_id: Uuid,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
}

impl NewProgramAssignment {
  pub fn window(&self) -> Result<DateRange> {
    DateRange::new(self.start_date, self.end_date)
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  #[test]
  fn status_string_forms() {
    assert_eq!(ProgramStatus::Published.as_ref(), "published");
    assert_eq!(ProgramStatus::from_str("archived").unwrap(), ProgramStatus::Archived);
    assert!(ProgramStatus::from_str("deleted").is_err());
  }
}
