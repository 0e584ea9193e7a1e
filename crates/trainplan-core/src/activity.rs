//! Per-athlete activity: completion, scaling, and notes for one scheduled
//! occurrence of a workout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one scheduled occurrence from the athlete's point of view.
///
/// Activity is keyed by this triple rather than by assignment id: the same
/// workout can land on many dates and many athletes, and each occurrence has
/// its own completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityKey {
  pub athlete_id:     Uuid,
  pub workout_id:     Uuid,
  pub scheduled_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
  pub athlete_id:     Uuid,
  pub workout_id:     Uuid,
  pub scheduled_date: NaiveDate,
  pub is_completed:   bool,
  /// Performed as prescribed (RX) rather than scaled.
  pub is_unscaled:    bool,
  pub notes:          Option<String>,
  pub completed_at:   Option<DateTime<Utc>>,
}

impl ActivityRecord {
  /// A fresh, not-yet-attempted record for `key`.
  pub fn empty(key: ActivityKey) -> Self {
    Self {
      athlete_id:     key.athlete_id,
      workout_id:     key.workout_id,
      scheduled_date: key.scheduled_date,
      is_completed:   false,
      is_unscaled:    false,
      notes:          None,
      completed_at:   None,
    }
  }

  pub fn key(&self) -> ActivityKey {
    ActivityKey {
      athlete_id:     self.athlete_id,
      workout_id:     self.workout_id,
      scheduled_date: self.scheduled_date,
    }
  }
}

/// A partial update submitted by the athlete. `None` fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityUpdate {
  pub is_completed: Option<bool>,
  pub is_unscaled:  Option<bool>,
  /// `Some("")` clears the notes.
  pub notes:        Option<String>,
}

impl ActivityUpdate {
  /// Apply onto `record`. Completing stamps `completed_at` with `now` unless
  /// it was already completed; un-completing clears it.
  pub fn apply(self, record: &mut ActivityRecord, now: DateTime<Utc>) {
    if let Some(done) = self.is_completed {
      if done && !record.is_completed {
        record.completed_at = Some(now);
      } else if !done {
        record.completed_at = None;
      }
      record.is_completed = done;
    }
    if let Some(unscaled) = self.is_unscaled {
      record.is_unscaled = unscaled;
    }
    if let Some(notes) = self.notes {
      let notes = notes.trim();
      record.notes = (!notes.is_empty()).then(|| notes.to_owned());
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  fn record() -> ActivityRecord {
    ActivityRecord::empty(ActivityKey {
      athlete_id:     Uuid::new_v4(),
      workout_id:     Uuid::new_v4(),
      scheduled_date: "2025-03-10".parse().unwrap(),
    })
  }

  #[test]
  fn completing_stamps_time_once() {
    let mut r = record();
    let first = Utc.timestamp_opt(1_000, 0).unwrap();
    let later = Utc.timestamp_opt(2_000, 0).unwrap();

    ActivityUpdate { is_completed: Some(true), ..Default::default() }.apply(&mut r, first);
    ActivityUpdate { is_completed: Some(true), ..Default::default() }.apply(&mut r, later);

    assert!(r.is_completed);
    assert_eq!(r.completed_at, Some(first));
  }

  #[test]
  fn uncompleting_clears_time() {
    let mut r = record();
    let now = Utc::now();
    ActivityUpdate { is_completed: Some(true), ..Default::default() }.apply(&mut r, now);
    ActivityUpdate { is_completed: Some(false), ..Default::default() }.apply(&mut r, now);
    assert!(!r.is_completed);
    assert!(r.completed_at.is_none());
  }

  #[test]
  fn blank_notes_clear_existing_notes() {
    let mut r = record();
    let now = Utc::now();
    ActivityUpdate { notes: Some("felt heavy".into()), ..Default::default() }.apply(&mut r, now);
    assert_eq!(r.notes.as_deref(), Some("felt heavy"));
    ActivityUpdate { notes: Some("  ".into()), ..Default::default() }.apply(&mut r, now);
    assert!(r.notes.is_none());
    assert!(!r.is_completed);
  }
}
