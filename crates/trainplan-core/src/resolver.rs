//! Merges the two assignment sources into one per-athlete schedule.
//!
//! Direct assignments come straight from the athlete's rows. Program entries
//! come from every program the athlete is enrolled in, clipped to the
//! intersection of the enrolment window and the requested range.

use std::{
  collections::{HashMap, HashSet},
  sync::Arc,
};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Result,
  date::DateRange,
  program::Program,
  schedule::{Provenance, ResolvedScheduleEntry, ScheduleSlot},
  store::{AssignmentStore, WorkoutCatalog},
  workout::WorkoutDefinition,
};

pub struct Resolver<S> {
  store: Arc<S>,
}

impl<S> Clone for Resolver<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S> Resolver<S>
where
  S: AssignmentStore + WorkoutCatalog,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Resolve `athlete_id`'s schedule within `range`.
  ///
  /// Entries are ordered by date and then provenance id. Activity is not
  /// attached; see [`ActivityOverlay`](crate::overlay::ActivityOverlay).
  pub async fn resolve(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> Result<Vec<ResolvedScheduleEntry>> {
    let mut slots = self.direct_slots(athlete_id, range).await?;
    slots.extend(self.program_slots(athlete_id, range).await?);

    slots.retain(|s| range.contains(s.date));
    slots.sort_by_key(ScheduleSlot::sort_key);

    let entries = self.attach_workouts(slots).await?;
    debug!(%athlete_id, %range, entries = entries.len(), "resolved schedule");
    Ok(entries)
  }

  async fn direct_slots(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> Result<Vec<ScheduleSlot>> {
    let assignments = self
      .store
      .find_direct_assignments_in_range(athlete_id, range)
      .await?;

    Ok(
      assignments
        .into_iter()
        .map(|a| ScheduleSlot {
          athlete_id,
          workout_id: a.workout_id,
          date:       a.date,
          provenance: Provenance::Direct { assignment_id: a.assignment_id },
        })
        .collect(),
    )
  }

  async fn program_slots(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> Result<Vec<ScheduleSlot>> {
    let enrolments = self
      .store
      .find_active_program_assignments(athlete_id, range)
      .await?;

    let mut programs: HashMap<Uuid, Option<Program>> = HashMap::new();
    // Overlapping enrolments in one program must not emit a placement twice.
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut slots = Vec::new();

    for enrolment in enrolments {
      let Some(window) = enrolment.window().intersect(&range) else {
        continue;
      };

      if !programs.contains_key(&enrolment.program_id) {
        let program = self.store.get_program(enrolment.program_id).await?;
        programs.insert(enrolment.program_id, program);
      }
      let Some(program) = programs.get(&enrolment.program_id).and_then(Option::as_ref)
      else {
        warn!(
          %athlete_id,
          program_id = %enrolment.program_id,
          "program assignment references a missing program; skipping"
        );
        continue;
      };

      let placements = self
        .store
        .find_program_workouts_in_range(program.program_id, window)
        .await?;

      for pw in placements {
        if !seen.insert(pw.program_workout_id) {
          continue;
        }
        slots.push(ScheduleSlot {
          athlete_id,
          workout_id: pw.workout_id,
          date:       pw.date,
          provenance: Provenance::Program {
            program_id:         program.program_id,
            program_workout_id: pw.program_workout_id,
            program_name:       program.name.clone(),
          },
        });
      }
    }

    Ok(slots)
  }

  /// Pair each slot with its template, dropping slots whose template has
  /// been removed from the catalog.
  async fn attach_workouts(
    &self,
    slots: Vec<ScheduleSlot>,
  ) -> Result<Vec<ResolvedScheduleEntry>> {
    let mut workouts: HashMap<Uuid, Option<WorkoutDefinition>> = HashMap::new();
    let mut entries = Vec::with_capacity(slots.len());

    for slot in slots {
      if !workouts.contains_key(&slot.workout_id) {
        let workout = self.store.get_workout(slot.workout_id).await?;
        workouts.insert(slot.workout_id, workout);
      }
      match workouts.get(&slot.workout_id).and_then(Option::as_ref) {
        Some(workout) => entries.push(ResolvedScheduleEntry {
          workout: workout.clone(),
          slot,
          activity: None,
        }),
        None => warn!(
          athlete_id = %slot.athlete_id,
          workout_id = %slot.workout_id,
          date = %slot.date,
          provenance_id = %slot.provenance.id(),
          "scheduled workout missing from catalog; dropping entry"
        ),
      }
    }

    Ok(entries)
  }
}
