//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, and
//! UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use trainplan_core::{
  activity::ActivityRecord,
  assignment::DirectAssignment,
  program::{Program, ProgramAssignment, ProgramStatus, ProgramWorkout},
  workout::WorkoutDefinition,
};
use uuid::Uuid;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── ProgramStatus ───────────────────────────────────────────────────────────

pub fn encode_status(status: ProgramStatus) -> String { status.as_ref().to_owned() }

pub fn decode_status(s: &str) -> Result<ProgramStatus> {
  s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Raw strings read directly from a `workouts` row.
pub struct RawWorkout {
  pub workout_id:      String,
  pub coach_id:        String,
  pub name:            Option<String>,
  pub description:     String,
  pub notes:           Option<String>,
  pub color:           Option<String>,
  pub workout_type_id: Option<String>,
  pub created_at:      String,
}

impl RawWorkout {
  pub const COLUMNS: &'static str = "workout_id, coach_id, name, description, notes, color, \
                             workout_type_id, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      workout_id:      row.get(0)?,
      coach_id:        row.get(1)?,
      name:            row.get(2)?,
      description:     row.get(3)?,
      notes:           row.get(4)?,
      color:           row.get(5)?,
      workout_type_id: row.get(6)?,
      created_at:      row.get(7)?,
    })
  }

  pub fn into_workout(self) -> Result<WorkoutDefinition> {
    Ok(WorkoutDefinition {
      workout_id:      decode_uuid(&self.workout_id)?,
      coach_id:        decode_uuid(&self.coach_id)?,
      name:            self.name,
      description:     self.description,
      notes:           self.notes,
      color:           self.color,
      workout_type_id: self.workout_type_id.as_deref().map(decode_uuid).transpose()?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `direct_assignments` row.
pub struct RawDirectAssignment {
  pub assignment_id: String,
  pub athlete_id:    String,
  pub workout_id:    String,
  pub date:          String,
  pub created_at:    String,
}

impl RawDirectAssignment {
  pub const COLUMNS: &'static str = "assignment_id, athlete_id, workout_id, date, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assignment_id: row.get(0)?,
      athlete_id:    row.get(1)?,
      workout_id:    row.get(2)?,
      date:          row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_assignment(self) -> Result<DirectAssignment> {
    Ok(DirectAssignment {
      assignment_id: decode_uuid(&self.assignment_id)?,
      athlete_id:    decode_uuid(&self.athlete_id)?,
      workout_id:    decode_uuid(&self.workout_id)?,
      date:          decode_date(&self.date)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `programs` row.
pub struct RawProgram {
  pub program_id: String,
  pub coach_id:   String,
  pub name:       String,
  pub start_date: String,
  pub end_date:   String,
  pub status:     String,
  pub created_at: String,
}

impl RawProgram {
  pub const COLUMNS: &'static str =
    "program_id, coach_id, name, start_date, end_date, status, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      program_id: row.get(0)?,
      coach_id:   row.get(1)?,
      name:       row.get(2)?,
      start_date: row.get(3)?,
      end_date:   row.get(4)?,
      status:     row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_program(self) -> Result<Program> {
    Ok(Program {
      program_id: decode_uuid(&self.program_id)?,
      coach_id:   decode_uuid(&self.coach_id)?,
      name:       self.name,
      start_date: decode_date(&self.start_date)?,
      end_date:   decode_date(&self.end_date)?,
      status:     decode_status(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `program_workouts` row.
pub struct RawProgramWorkout {
  pub program_workout_id: String,
  pub program_id:         String,
  pub workout_id:         String,
  pub date:               String,
}

impl RawProgramWorkout {
  pub const COLUMNS: &'static str = "program_workout_id, program_id, workout_id, date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      program_workout_id: row.get(0)?,
      program_id:         row.get(1)?,
      workout_id:         row.get(2)?,
      date:               row.get(3)?,
    })
  }

  pub fn into_program_workout(self) -> Result<ProgramWorkout> {
    Ok(ProgramWorkout {
      program_workout_id: decode_uuid(&self.program_workout_id)?,
      program_id:         decode_uuid(&self.program_id)?,
      workout_id:         decode_uuid(&self.workout_id)?,
      date:               decode_date(&self.date)?,
    })
  }
}

/// Raw strings read directly from a `program_assignments` row.
pub struct RawProgramAssignment {
  pub program_assignment_id: String,
  pub program_id:            String,
  pub athlete_id:            String,
  pub start_date:            String,
  pub end_date:              String,
}

impl RawProgramAssignment {
  pub const COLUMNS: &'static str =
    "program_assignment_id, program_id, athlete_id, start_date, end_date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      program_assignment_id: row.get(0)?,
      program_id:            row.get(1)?,
      athlete_id:            row.get(2)?,
      start_date:            row.get(3)?,
      end_date:              row.get(4)?,
    })
  }

  pub fn into_program_assignment(self) -> Result<ProgramAssignment> {
    Ok(ProgramAssignment {
      program_assignment_id: decode_uuid(&self.program_assignment_id)?,
      program_id:            decode_uuid(&self.program_id)?,
      athlete_id:            decode_uuid(&self.athlete_id)?,
      start_date:            decode_date(&self.start_date)?,
      end_date:              decode_date(&self.end_date)?,
    })
  }
}

/// Raw values read directly from an `activity_records` row.
pub struct RawActivity {
  pub athlete_id:     String,
  pub workout_id:     String,
  pub scheduled_date: String,
  pub is_completed:   bool,
  pub is_unscaled:    bool,
  pub notes:          Option<String>,
  pub completed_at:   Option<String>,
}

impl RawActivity {
  pub const COLUMNS: &'static str = "athlete_id, workout_id, scheduled_date, is_completed, \
                             is_unscaled, notes, completed_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      athlete_id:     row.get(0)?,
      workout_id:     row.get(1)?,
      scheduled_date: row.get(2)?,
      is_completed:   row.get(3)?,
      is_unscaled:    row.get(4)?,
      notes:          row.get(5)?,
      completed_at:   row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<ActivityRecord> {
    Ok(ActivityRecord {
      athlete_id:     decode_uuid(&self.athlete_id)?,
      workout_id:     decode_uuid(&self.workout_id)?,
      scheduled_date: decode_date(&self.scheduled_date)?,
      is_completed:   self.is_completed,
      is_unscaled:    self.is_unscaled,
      notes:          self.notes,
      completed_at:   self.completed_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
