//! Direct assignments: one workout, one athlete, one date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Binds a workout to a single athlete on a single day, independent of any
/// program. At most one exists per `(athlete_id, workout_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectAssignment {
  pub assignment_id: Uuid,
  pub athlete_id:    Uuid,
  pub workout_id:    Uuid,
  pub date:          NaiveDate,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDirectAssignment {
  pub athlete_id: Uuid,
  pub workout_id: Uuid,
  pub date:       NaiveDate,
}

impl NewDirectAssignment {
  pub fn into_assignment(
    self,
    assignment_id: Uuid,
    created_at: DateTime<Utc>,
  ) -> DirectAssignment {
    DirectAssignment {
      assignment_id,
      athlete_id: self.athlete_id,
      workout_id: self.workout_id,
      date: self.date,
      created_at,
    }
  }
}
