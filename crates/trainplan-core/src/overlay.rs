//! Joins an athlete's activity records onto resolved entries.

use std::{collections::HashMap, sync::Arc};

use tracing::debug;
use uuid::Uuid;

use crate::{
  Result,
  activity::{ActivityKey, ActivityRecord},
  date::DateRange,
  schedule::ResolvedScheduleEntry,
  store::ActivityStore,
};

/// Read-only: never writes to the activity store.
pub struct ActivityOverlay<S> {
  store: Arc<S>,
}

impl<S> Clone for ActivityOverlay<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: ActivityStore> ActivityOverlay<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Attach the record keyed by `(athlete_id, workout, date)` to each entry.
  ///
  /// An entry with no record gets `activity: None`. Only the exact key is
  /// matched, so a record left behind at an old date by a move is never
  /// attached to the moved entry.
  pub async fn overlay(
    &self,
    mut entries: Vec<ResolvedScheduleEntry>,
    athlete_id: Uuid,
  ) -> Result<Vec<ResolvedScheduleEntry>> {
    let Some(span) = DateRange::spanning(entries.iter().map(|e| e.date())) else {
      return Ok(entries);
    };

    let records: HashMap<ActivityKey, ActivityRecord> = self
      .store
      .find_activity_in_range(athlete_id, span)
      .await?
      .into_iter()
      .map(|r| (r.key(), r))
      .collect();

    for entry in &mut entries {
      entry.activity = records.get(&entry.slot.activity_key()).cloned();
    }

    debug!(%athlete_id, records = records.len(), "overlaid activity");
    Ok(entries)
  }

  pub async fn get_activity(&self, key: ActivityKey) -> Result<Option<ActivityRecord>> {
    self
      .store
      .find_activity_record(key.athlete_id, key.workout_id, key.scheduled_date)
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{resolver::Resolver, testing::*};

  #[tokio::test]
  async fn attaches_matching_record_and_leaves_others_empty() {
    let s = store();
    let a1 = Uuid::new_v4();
    let done = workout(&s, "done").await;
    let todo = workout(&s, "todo").await;
    direct(&s, a1, done.workout_id, "2025-03-03").await;
    direct(&s, a1, todo.workout_id, "2025-03-04").await;

    let mut record = ActivityRecord::empty(ActivityKey {
      athlete_id:     a1,
      workout_id:     done.workout_id,
      scheduled_date: d("2025-03-03"),
    });
    record.is_completed = true;
    s.upsert_activity_record(record.clone()).await.unwrap();

    let range = DateRange::new(d("2025-03-01"), d("2025-03-31")).unwrap();
    let entries = Resolver::new(s.clone()).resolve(a1, range).await.unwrap();
    let entries = ActivityOverlay::new(s.clone()).overlay(entries, a1).await.unwrap();

    assert_eq!(entries[0].activity.as_ref(), Some(&record));
    assert!(entries[1].activity.is_none());
  }

  #[tokio::test]
  async fn record_for_other_date_is_not_attached() {
    let s = store();
    let a1 = Uuid::new_v4();
    let w = workout(&s, "w").await;
    direct(&s, a1, w.workout_id, "2025-03-06").await;
    s.upsert_activity_record(ActivityRecord::empty(ActivityKey {
      athlete_id:     a1,
      workout_id:     w.workout_id,
      scheduled_date: d("2025-03-05"),
    }))
    .await
    .unwrap();

    let range = DateRange::new(d("2025-03-01"), d("2025-03-31")).unwrap();
    let entries = Resolver::new(s.clone()).resolve(a1, range).await.unwrap();
    let entries = ActivityOverlay::new(s.clone()).overlay(entries, a1).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert!(entries[0].activity.is_none());
  }

  #[tokio::test]
  async fn empty_input_is_returned_untouched() {
    let s = store();
    let out = ActivityOverlay::new(s).overlay(vec![], Uuid::new_v4()).await.unwrap();
    assert!(out.is_empty());
  }
}
