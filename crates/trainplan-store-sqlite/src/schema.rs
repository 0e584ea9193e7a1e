//! SQL schema for the Trainplan SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Calendar dates are ISO `YYYY-MM-DD` text, so `BETWEEN` and `<=` compare
/// them correctly as strings.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS workouts (
    workout_id      TEXT PRIMARY KEY,
    coach_id        TEXT NOT NULL,
    name            TEXT,
    description     TEXT NOT NULL DEFAULT '',
    notes           TEXT,
    color           TEXT,
    workout_type_id TEXT,
    created_at      TEXT NOT NULL
);

-- No foreign key on workout_id: templates may leave the catalog after
-- they have been scheduled.
CREATE TABLE IF NOT EXISTS direct_assignments (
    assignment_id TEXT PRIMARY KEY,
    athlete_id    TEXT NOT NULL,
    workout_id    TEXT NOT NULL,
    date          TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    UNIQUE (athlete_id, workout_id, date)
);

CREATE TABLE IF NOT EXISTS programs (
    program_id  TEXT PRIMARY KEY,
    coach_id    TEXT NOT NULL,
    name        TEXT NOT NULL,
    start_date  TEXT NOT NULL,
    end_date    TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'draft',  -- 'draft' | 'published' | 'archived'
    created_at  TEXT NOT NULL,
    CHECK (start_date <= end_date)
);

-- Shared by every athlete enrolled in the program.
CREATE TABLE IF NOT EXISTS program_workouts (
    program_workout_id TEXT PRIMARY KEY,
    program_id         TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
    workout_id         TEXT NOT NULL,
    date               TEXT NOT NULL,
    UNIQUE (program_id, workout_id, date)
);

CREATE TABLE IF NOT EXISTS program_assignments (
    program_assignment_id TEXT PRIMARY KEY,
    program_id            TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
    athlete_id            TEXT NOT NULL,
    start_date            TEXT NOT NULL,
    end_date              TEXT NOT NULL,
    CHECK (start_date <= end_date)
);

-- Keyed by occurrence, not by assignment; never touched by schedule moves.
CREATE TABLE IF NOT EXISTS activity_records (
    athlete_id     TEXT NOT NULL,
    workout_id     TEXT NOT NULL,
    scheduled_date TEXT NOT NULL,
    is_completed   INTEGER NOT NULL DEFAULT 0,
    is_unscaled    INTEGER NOT NULL DEFAULT 0,
    notes          TEXT,
    completed_at   TEXT,
    PRIMARY KEY (athlete_id, workout_id, scheduled_date)
);

CREATE INDEX IF NOT EXISTS workouts_coach_idx            ON workouts(coach_id);
CREATE INDEX IF NOT EXISTS direct_assignments_athlete_idx ON direct_assignments(athlete_id, date);
CREATE INDEX IF NOT EXISTS program_workouts_program_idx  ON program_workouts(program_id, date);
CREATE INDEX IF NOT EXISTS program_assignments_athlete_idx ON program_assignments(athlete_id);
CREATE INDEX IF NOT EXISTS program_assignments_program_idx ON program_assignments(program_id);

PRAGMA user_version = 1;
";
