//! Resolved schedule entries: the per-athlete calendar read model.
//!
//! Entries are never stored. They are rebuilt from the assignment tables on
//! every resolution, mirroring how the two provenance sources actually differ.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  activity::{ActivityKey, ActivityRecord},
  workout::WorkoutDefinition,
};

// ─── Provenance ──────────────────────────────────────────────────────────────

/// Which assignment source produced an entry, carrying only what that source
/// needs to be located again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
  /// Backed by a single athlete's direct assignment.
  Direct { assignment_id: Uuid },
  /// Backed by a program workout shared with every athlete on the program.
  Program {
    program_id:         Uuid,
    program_workout_id: Uuid,
    program_name:       String,
  },
}

impl Provenance {
  /// Id of the underlying row: the assignment or the program workout.
  pub fn id(&self) -> Uuid {
    match self {
      Self::Direct { assignment_id } => *assignment_id,
      Self::Program { program_workout_id, .. } => *program_workout_id,
    }
  }

  pub fn is_program(&self) -> bool { matches!(self, Self::Program { .. }) }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// Identity of a calendar entry: enough to address a mutation intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
  pub athlete_id: Uuid,
  pub workout_id: Uuid,
  pub date:       NaiveDate,
  pub provenance: Provenance,
}

impl ScheduleSlot {
  pub fn activity_key(&self) -> ActivityKey {
    ActivityKey {
      athlete_id:     self.athlete_id,
      workout_id:     self.workout_id,
      scheduled_date: self.date,
    }
  }

  /// Ordering used for every resolved schedule: by date, then provenance id.
  pub fn sort_key(&self) -> (NaiveDate, Uuid) { (self.date, self.provenance.id()) }
}

/// One workout on one athlete's calendar for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedScheduleEntry {
  #[serde(flatten)]
  pub slot:     ScheduleSlot,
  /// Snapshot of the template at resolution time.
  pub workout:  WorkoutDefinition,
  /// The athlete's activity for this occurrence; `None` if not yet attempted.
  pub activity: Option<ActivityRecord>,
}

impl ResolvedScheduleEntry {
  pub fn date(&self) -> NaiveDate { self.slot.date }

  pub fn workout_id(&self) -> Uuid { self.slot.workout_id }

  pub fn provenance(&self) -> &Provenance { &self.slot.provenance }
}

// ─── Mutation outcomes ───────────────────────────────────────────────────────

/// Result of a successful move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
  pub workout_id:        Uuid,
  pub provenance:        Provenance,
  pub from_date:         NaiveDate,
  pub to_date:           NaiveDate,
  /// Athletes whose calendars changed. Only the initiator for a direct
  /// entry; every athlete whose window covers either date for a program
  /// entry. Empty when `from_date == to_date`.
  pub affected_athletes: Vec<Uuid>,
  /// The initiating athlete's activity still keyed to `from_date`. It is not
  /// migrated and no longer matches any visible entry.
  pub orphaned_activity: Option<ActivityRecord>,
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
  pub workout_id:        Uuid,
  pub provenance:        Provenance,
  pub date:              NaiveDate,
  pub affected_athletes: Vec<Uuid>,
  /// The initiating athlete's activity, left in place for the removed
  /// occurrence.
  pub orphaned_activity: Option<ActivityRecord>,
}
