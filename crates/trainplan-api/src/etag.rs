//! ETag computation for resolved schedules.
//!
//! The tag is a SHA-256 hash over the serialised entries. Resolution output
//! is already deterministically ordered, so identical schedules hash equal
//! and any change to a slot, its workout snapshot, or its activity changes
//! the tag.

use sha2::{Digest, Sha256};
use trainplan_core::schedule::ResolvedScheduleEntry;

/// Compute a strong, quoted ETag for `entries`.
pub fn schedule_etag(entries: &[ResolvedScheduleEntry]) -> serde_json::Result<String> {
  let mut hasher = Sha256::new();
  for entry in entries {
    hasher.update(serde_json::to_vec(entry)?);
    hasher.update(b"\n");
  }
  Ok(format!("\"{}\"", hex::encode(hasher.finalize())))
}

/// True if an `If-None-Match` header value names `etag` (or is `*`).
pub fn matches_if_none_match(header: &str, etag: &str) -> bool {
  header.split(',').map(str::trim).any(|candidate| {
    candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
  })
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};
  use trainplan_core::{
    activity::{ActivityKey, ActivityRecord},
    schedule::{Provenance, ScheduleSlot},
    workout::NewWorkout,
  };
  use uuid::Uuid;

  use super::*;

  fn entry(assignment_id: Uuid, day: u32) -> ResolvedScheduleEntry {
    let athlete_id = Uuid::nil();
    let created = Utc.timestamp_opt(0, 0).unwrap();
    let workout = NewWorkout::new(Uuid::nil(), "tempo").into_definition(Uuid::nil(), created);
    ResolvedScheduleEntry {
      slot:     ScheduleSlot {
        athlete_id,
        workout_id: workout.workout_id,
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        provenance: Provenance::Direct { assignment_id },
      },
      workout,
      activity: None,
    }
  }

  #[test]
  fn identical_schedules_share_a_tag() {
    let id = Uuid::new_v4();
    let a = schedule_etag(&[entry(id, 5)]).unwrap();
    let b = schedule_etag(&[entry(id, 5)]).unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with('"') && a.ends_with('"'));
  }

  #[test]
  fn moving_or_completing_changes_tag() {
    let id = Uuid::new_v4();
    let base = schedule_etag(&[entry(id, 5)]).unwrap();
    assert_ne!(base, schedule_etag(&[entry(id, 6)]).unwrap());

    let mut done = entry(id, 5);
    let mut record = ActivityRecord::empty(ActivityKey {
      athlete_id:     done.slot.athlete_id,
      workout_id:     done.slot.workout_id,
      scheduled_date: done.slot.date,
    });
    record.is_completed = true;
    done.activity = Some(record);
    assert_ne!(base, schedule_etag(&[done]).unwrap());
  }

  #[test]
  fn if_none_match_parsing() {
    assert!(matches_if_none_match("\"abc\"", "\"abc\""));
    assert!(matches_if_none_match("\"x\", W/\"abc\"", "\"abc\""));
    assert!(matches_if_none_match("*", "\"abc\""));
    assert!(!matches_if_none_match("\"abd\"", "\"abc\""));
  }
}
