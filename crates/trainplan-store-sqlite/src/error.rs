//! Error type for `trainplan-store-sqlite`, and its translation into the
//! core taxonomy.

use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown program status: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  fn sqlite_failure(&self) -> Option<(&ffi::Error, Option<&String>)> {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(failure, message),
      )) => Some((failure, message.as_ref())),
      _ => None,
    }
  }

  /// True when a UNIQUE or PRIMARY KEY constraint rejected the statement.
  pub fn is_unique_violation(&self) -> bool {
    self.sqlite_failure().is_some_and(|(f, _)| {
      f.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        || f.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    })
  }

  /// Translate, reporting a uniqueness clash as `duplicate` instead.
  pub(crate) fn or_duplicate(self, duplicate: trainplan_core::Error) -> trainplan_core::Error {
    if self.is_unique_violation() {
      duplicate
    } else {
      self.into()
    }
  }
}

impl From<Error> for trainplan_core::Error {
  fn from(err: Error) -> Self {
    match err.sqlite_failure() {
      Some((failure, message)) if failure.code == ErrorCode::ConstraintViolation => {
        trainplan_core::Error::ConstraintViolation(
          message.cloned().unwrap_or_else(|| failure.to_string()),
        )
      }
      _ => trainplan_core::Error::unavailable(err),
    }
  }
}
