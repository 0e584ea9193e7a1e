//! [`SqliteStore`], the SQLite implementation of the Trainplan store traits.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use trainplan_core::{
  Error as CoreError, Result as CoreResult,
  activity::ActivityRecord,
  assignment::{DirectAssignment, NewDirectAssignment},
  date::DateRange,
  program::{
    NewProgram, NewProgramAssignment, Program, ProgramAssignment, ProgramWorkout,
  },
  store::{ActivityStore, AssignmentStore, WorkoutCatalog},
  workout::{NewWorkout, WorkoutDefinition},
};

use crate::{
  Result,
  encode::{
    RawActivity, RawDirectAssignment, RawProgram, RawProgramAssignment,
    RawProgramWorkout, RawWorkout, encode_date, encode_dt, encode_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Trainplan store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  async fn call<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut rusqlite::Connection) -> Result<T, tokio_rusqlite::Error>
      + Send
      + 'static,
    T: Send + 'static,
  {
    Ok(self.conn.call(f).await?)
  }

  async fn direct_assignment_by_id(
    &self,
    assignment_id: Uuid,
  ) -> Result<Option<DirectAssignment>> {
    let id_str = encode_uuid(assignment_id);
    let sql = format!(
      "SELECT {} FROM direct_assignments WHERE assignment_id = ?1",
      RawDirectAssignment::COLUMNS
    );

    let raw = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawDirectAssignment::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDirectAssignment::into_assignment).transpose()
  }

  async fn program_workout_by_id(
    &self,
    program_workout_id: Uuid,
  ) -> Result<Option<ProgramWorkout>> {
    let id_str = encode_uuid(program_workout_id);
    let sql = format!(
      "SELECT {} FROM program_workouts WHERE program_workout_id = ?1",
      RawProgramWorkout::COLUMNS
    );

    let raw = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawProgramWorkout::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProgramWorkout::into_program_workout).transpose()
  }
}

// ─── WorkoutCatalog impl ─────────────────────────────────────────────────────

impl WorkoutCatalog for SqliteStore {
  async fn get_workout(&self, workout_id: Uuid) -> CoreResult<Option<WorkoutDefinition>> {
    let id_str = encode_uuid(workout_id);
    let sql = format!(
      "SELECT {} FROM workouts WHERE workout_id = ?1",
      RawWorkout::COLUMNS
    );

    let raw = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawWorkout::from_row)
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawWorkout::into_workout).transpose()?)
  }

  async fn create_workout(&self, input: NewWorkout) -> CoreResult<WorkoutDefinition> {
    let workout = input.into_definition(Uuid::new_v4(), Utc::now());

    let id_str      = encode_uuid(workout.workout_id);
    let coach_str   = encode_uuid(workout.coach_id);
    let name        = workout.name.clone();
    let description = workout.description.clone();
    let notes       = workout.notes.clone();
    let color       = workout.color.clone();
    let type_str    = workout.workout_type_id.map(encode_uuid);
    let at_str      = encode_dt(workout.created_at);

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO workouts (
             workout_id, coach_id, name, description, notes, color,
             workout_type_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, coach_str, name, description, notes, color, type_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(workout)
  }

  async fn list_workouts(&self, coach_id: Uuid) -> CoreResult<Vec<WorkoutDefinition>> {
    let coach_str = encode_uuid(coach_id);
    let sql = format!(
      "SELECT {} FROM workouts WHERE coach_id = ?1 ORDER BY created_at, workout_id",
      RawWorkout::COLUMNS
    );

    let raws = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![coach_str], RawWorkout::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawWorkout::into_workout).collect::<Result<_>>()?)
  }

  async fn delete_workout(&self, workout_id: Uuid) -> CoreResult<bool> {
    let id_str = encode_uuid(workout_id);
    let deleted = self
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM workouts WHERE workout_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }
}

// ─── AssignmentStore impl ────────────────────────────────────────────────────

impl AssignmentStore for SqliteStore {
  // ── Direct assignments ────────────────────────────────────────────────────

  async fn find_direct_assignment(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> CoreResult<Option<DirectAssignment>> {
    let athlete_str = encode_uuid(athlete_id);
    let workout_str = encode_uuid(workout_id);
    let date_str    = encode_date(date);
    let sql = format!(
      "SELECT {} FROM direct_assignments
       WHERE athlete_id = ?1 AND workout_id = ?2 AND date = ?3",
      RawDirectAssignment::COLUMNS
    );

    let raw = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![athlete_str, workout_str, date_str],
              RawDirectAssignment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawDirectAssignment::into_assignment).transpose()?)
  }

  async fn count_direct_assignments(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> CoreResult<usize> {
    let athlete_str = encode_uuid(athlete_id);
    let workout_str = encode_uuid(workout_id);
    let date_str    = encode_date(date);

    let count: i64 = self
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM direct_assignments
           WHERE athlete_id = ?1 AND workout_id = ?2 AND date = ?3",
          rusqlite::params![athlete_str, workout_str, date_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(usize::try_from(count).unwrap_or_default())
  }

  async fn find_direct_assignments_in_range(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> CoreResult<Vec<DirectAssignment>> {
    let athlete_str = encode_uuid(athlete_id);
    let start_str   = encode_date(range.start);
    let end_str     = encode_date(range.end);
    let sql = format!(
      "SELECT {} FROM direct_assignments
       WHERE athlete_id = ?1 AND date BETWEEN ?2 AND ?3
       ORDER BY date, assignment_id",
      RawDirectAssignment::COLUMNS
    );

    let raws = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![athlete_str, start_str, end_str],
            RawDirectAssignment::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawDirectAssignment::into_assignment)
        .collect::<Result<_>>()?,
    )
  }

  async fn insert_direct_assignment(
    &self,
    input: NewDirectAssignment,
  ) -> CoreResult<DirectAssignment> {
    let assignment = input.into_assignment(Uuid::new_v4(), Utc::now());

    let id_str      = encode_uuid(assignment.assignment_id);
    let athlete_str = encode_uuid(assignment.athlete_id);
    let workout_str = encode_uuid(assignment.workout_id);
    let date_str    = encode_date(assignment.date);
    let at_str      = encode_dt(assignment.created_at);

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO direct_assignments
             (assignment_id, athlete_id, workout_id, date, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, athlete_str, workout_str, date_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        e.or_duplicate(CoreError::DuplicateAssignment {
          owner_id:   input.athlete_id,
          workout_id: input.workout_id,
          date:       input.date,
        })
      })?;

    Ok(assignment)
  }

  async fn update_direct_assignment_date(
    &self,
    assignment_id: Uuid,
    date: NaiveDate,
  ) -> CoreResult<bool> {
    let id_str   = encode_uuid(assignment_id);
    let date_str = encode_date(date);

    let result = self
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE direct_assignments SET date = ?2 WHERE assignment_id = ?1",
          rusqlite::params![id_str, date_str],
        )?;
        Ok(n > 0)
      })
      .await;

    match result {
      Ok(changed) => Ok(changed),
      Err(e) if e.is_unique_violation() => {
        match self.direct_assignment_by_id(assignment_id).await? {
          Some(a) => Err(CoreError::DuplicateAssignment {
            owner_id:   a.athlete_id,
            workout_id: a.workout_id,
            date,
          }),
          None => Err(e.into()),
        }
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn delete_direct_assignment(&self, assignment_id: Uuid) -> CoreResult<bool> {
    let id_str = encode_uuid(assignment_id);

    Ok(
      self
        .call(move |conn| {
          let n = conn.execute(
            "DELETE FROM direct_assignments WHERE assignment_id = ?1",
            rusqlite::params![id_str],
          )?;
          Ok(n > 0)
        })
        .await?,
    )
  }

  // ── Programs ──────────────────────────────────────────────────────────────

  async fn get_program(&self, program_id: Uuid) -> CoreResult<Option<Program>> {
    let id_str = encode_uuid(program_id);
    let sql = format!(
      "SELECT {} FROM programs WHERE program_id = ?1",
      RawProgram::COLUMNS
    );

    let raw = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawProgram::from_row)
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawProgram::into_program).transpose()?)
  }

  async fn insert_program(&self, input: NewProgram) -> CoreResult<Program> {
    let program = Program {
      program_id: Uuid::new_v4(),
      coach_id:   input.coach_id,
      name:       input.name,
      start_date: input.start_date,
      end_date:   input.end_date,
      status:     input.status,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(program.program_id);
    let coach_str  = encode_uuid(program.coach_id);
    let name       = program.name.clone();
    let start_str  = encode_date(program.start_date);
    let end_str    = encode_date(program.end_date);
    let status_str = encode_status(program.status);
    let at_str     = encode_dt(program.created_at);

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO programs
             (program_id, coach_id, name, start_date, end_date, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, coach_str, name, start_str, end_str, status_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(program)
  }

  // ── Program workouts ──────────────────────────────────────────────────────

  async fn find_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> CoreResult<Option<ProgramWorkout>> {
    let program_str = encode_uuid(program_id);
    let workout_str = encode_uuid(workout_id);
    let date_str    = encode_date(date);
    let sql = format!(
      "SELECT {} FROM program_workouts
       WHERE program_id = ?1 AND workout_id = ?2 AND date = ?3",
      RawProgramWorkout::COLUMNS
    );

    let raw = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![program_str, workout_str, date_str],
              RawProgramWorkout::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawProgramWorkout::into_program_workout).transpose()?)
  }

  async fn find_program_workouts_in_range(
    &self,
    program_id: Uuid,
    range: DateRange,
  ) -> CoreResult<Vec<ProgramWorkout>> {
    let program_str = encode_uuid(program_id);
    let start_str   = encode_date(range.start);
    let end_str     = encode_date(range.end);
    let sql = format!(
      "SELECT {} FROM program_workouts
       WHERE program_id = ?1 AND date BETWEEN ?2 AND ?3
       ORDER BY date, program_workout_id",
      RawProgramWorkout::COLUMNS
    );

    let raws = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![program_str, start_str, end_str],
            RawProgramWorkout::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawProgramWorkout::into_program_workout)
        .collect::<Result<_>>()?,
    )
  }

  async fn insert_program_workout(
    &self,
    program_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> CoreResult<ProgramWorkout> {
    let pw = ProgramWorkout {
      program_workout_id: Uuid::new_v4(),
      program_id,
      workout_id,
      date,
    };

    let id_str      = encode_uuid(pw.program_workout_id);
    let program_str = encode_uuid(program_id);
    let workout_str = encode_uuid(workout_id);
    let date_str    = encode_date(date);

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO program_workouts (program_workout_id, program_id, workout_id, date)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, program_str, workout_str, date_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        e.or_duplicate(CoreError::DuplicateAssignment {
          owner_id: program_id,
          workout_id,
          date,
        })
      })?;

    Ok(pw)
  }

  async fn update_program_workout_date(
    &self,
    program_workout_id: Uuid,
    date: NaiveDate,
  ) -> CoreResult<bool> {
    let id_str   = encode_uuid(program_workout_id);
    let date_str = encode_date(date);

    let result = self
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE program_workouts SET date = ?2 WHERE program_workout_id = ?1",
          rusqlite::params![id_str, date_str],
        )?;
        Ok(n > 0)
      })
      .await;

    match result {
      Ok(changed) => Ok(changed),
      Err(e) if e.is_unique_violation() => {
        match self.program_workout_by_id(program_workout_id).await? {
          Some(pw) => Err(CoreError::DuplicateAssignment {
            owner_id:   pw.program_id,
            workout_id: pw.workout_id,
            date,
          }),
          None => Err(e.into()),
        }
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn delete_program_workout(&self, program_workout_id: Uuid) -> CoreResult<bool> {
    let id_str = encode_uuid(program_workout_id);

    Ok(
      self
        .call(move |conn| {
          let n = conn.execute(
            "DELETE FROM program_workouts WHERE program_workout_id = ?1",
            rusqlite::params![id_str],
          )?;
          Ok(n > 0)
        })
        .await?,
    )
  }

  // ── Program assignments ───────────────────────────────────────────────────

  async fn find_active_program_assignments(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> CoreResult<Vec<ProgramAssignment>> {
    let athlete_str = encode_uuid(athlete_id);
    let start_str   = encode_date(range.start);
    let end_str     = encode_date(range.end);
    let sql = format!(
      "SELECT {} FROM program_assignments
       WHERE athlete_id = ?1 AND start_date <= ?3 AND end_date >= ?2
       ORDER BY start_date, program_assignment_id",
      RawProgramAssignment::COLUMNS
    );

    let raws = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![athlete_str, start_str, end_str],
            RawProgramAssignment::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawProgramAssignment::into_program_assignment)
        .collect::<Result<_>>()?,
    )
  }

  async fn list_program_assignments(
    &self,
    program_id: Uuid,
  ) -> CoreResult<Vec<ProgramAssignment>> {
    let program_str = encode_uuid(program_id);
    let sql = format!(
      "SELECT {} FROM program_assignments
       WHERE program_id = ?1
       ORDER BY start_date, program_assignment_id",
      RawProgramAssignment::COLUMNS
    );

    let raws = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![program_str], RawProgramAssignment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawProgramAssignment::into_program_assignment)
        .collect::<Result<_>>()?,
    )
  }

  async fn insert_program_assignment(
    &self,
    input: NewProgramAssignment,
  ) -> CoreResult<ProgramAssignment> {
    let pa = ProgramAssignment {
      program_assignment_id: Uuid::new_v4(),
      program_id:            input.program_id,
      athlete_id:            input.athlete_id,
      start_date:            input.start_date,
      end_date:              input.end_date,
    };

    let id_str      = encode_uuid(pa.program_assignment_id);
    let program_str = encode_uuid(pa.program_id);
    let athlete_str = encode_uuid(pa.athlete_id);
    let start_str   = encode_date(pa.start_date);
    let end_str     = encode_date(pa.end_date);

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO program_assignments
             (program_assignment_id, program_id, athlete_id, start_date, end_date)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, program_str, athlete_str, start_str, end_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(pa)
  }
}

// ─── ActivityStore impl ──────────────────────────────────────────────────────

impl ActivityStore for SqliteStore {
  async fn find_activity_record(
    &self,
    athlete_id: Uuid,
    workout_id: Uuid,
    date: NaiveDate,
  ) -> CoreResult<Option<ActivityRecord>> {
    let athlete_str = encode_uuid(athlete_id);
    let workout_str = encode_uuid(workout_id);
    let date_str    = encode_date(date);
    let sql = format!(
      "SELECT {} FROM activity_records
       WHERE athlete_id = ?1 AND workout_id = ?2 AND scheduled_date = ?3",
      RawActivity::COLUMNS
    );

    let raw = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![athlete_str, workout_str, date_str],
              RawActivity::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawActivity::into_record).transpose()?)
  }

  async fn find_activity_in_range(
    &self,
    athlete_id: Uuid,
    range: DateRange,
  ) -> CoreResult<Vec<ActivityRecord>> {
    let athlete_str = encode_uuid(athlete_id);
    let start_str   = encode_date(range.start);
    let end_str     = encode_date(range.end);
    let sql = format!(
      "SELECT {} FROM activity_records
       WHERE athlete_id = ?1 AND scheduled_date BETWEEN ?2 AND ?3
       ORDER BY scheduled_date, workout_id",
      RawActivity::COLUMNS
    );

    let raws = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![athlete_str, start_str, end_str],
            RawActivity::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawActivity::into_record).collect::<Result<_>>()?)
  }

  async fn upsert_activity_record(&self, record: ActivityRecord) -> CoreResult<ActivityRecord> {
    let athlete_str  = encode_uuid(record.athlete_id);
    let workout_str  = encode_uuid(record.workout_id);
    let date_str     = encode_date(record.scheduled_date);
    let is_completed = record.is_completed;
    let is_unscaled  = record.is_unscaled;
    let notes        = record.notes.clone();
    let done_str     = record.completed_at.map(encode_dt);

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activity_records (
             athlete_id, workout_id, scheduled_date,
             is_completed, is_unscaled, notes, completed_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (athlete_id, workout_id, scheduled_date) DO UPDATE SET
             is_completed = excluded.is_completed,
             is_unscaled  = excluded.is_unscaled,
             notes        = excluded.notes,
             completed_at = excluded.completed_at",
          rusqlite::params![
            athlete_str, workout_str, date_str, is_completed, is_unscaled, notes, done_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }
}
