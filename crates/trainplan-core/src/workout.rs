//! Workout templates: the coach-owned catalog that every assignment points
//! into.
//!
//! Assignments reference a [`WorkoutDefinition`] by id and never copy it, so
//! edits to a template show up wherever it is scheduled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback label for a template with neither a name nor a description.
pub const UNTITLED_WORKOUT: &str = "Untitled workout";

/// A reusable workout template in a coach's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDefinition {
  pub workout_id:      Uuid,
  pub coach_id:        Uuid,
  pub name:            Option<String>,
  /// Free-text prescription, e.g. "5 rounds: 400m run, 15 thrusters".
  pub description:     String,
  pub notes:           Option<String>,
  /// Calendar tint, typically a CSS hex colour.
  pub color:           Option<String>,
  pub workout_type_id: Option<Uuid>,
  pub created_at:      DateTime<Utc>,
}

impl WorkoutDefinition {
  /// The label shown on a calendar tile.
  ///
  /// Uses the explicit name when present, otherwise the first non-empty line
  /// of the description.
  pub fn display_name(&self) -> &str {
    self
      .name
      .as_deref()
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .or_else(|| {
        self.description.lines().map(str::trim).find(|l| !l.is_empty())
      })
      .unwrap_or(UNTITLED_WORKOUT)
  }
}

/// Input for creating a template; the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
  pub coach_id:        Uuid,
  pub name:            Option<String>,
  #[serde(default)]
  pub description:     String,
  pub notes:           Option<String>,
  pub color:           Option<String>,
  pub workout_type_id: Option<Uuid>,
}

impl NewWorkout {
  pub fn new(coach_id: Uuid, description: impl Into<String>) -> Self {
    Self {
      coach_id,
      name: None,
      description: description.into(),
      notes: None,
      color: None,
      workout_type_id: None,
    }
  }

  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn into_definition(self, workout_id: Uuid, created_at: DateTime<Utc>) -> WorkoutDefinition {
    WorkoutDefinition {
      workout_id,
      coach_id: self.coach_id,
      name: self.name,
      description: self.description,
      notes: self.notes,
      color: self.color,
      workout_type_id: self.workout_type_id,
      created_at,
    }
  }
}
