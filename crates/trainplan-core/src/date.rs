//! Inclusive calendar-date ranges.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An inclusive `[start, end]` span of calendar days.
///
/// Always non-empty: [`DateRange::new`] rejects `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateRange {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if start > end {
      return Err(Error::InvalidDateRange { start, end });
    }
    Ok(Self { start, end })
  }

  /// A range covering exactly one day.
  pub fn single(day: NaiveDate) -> Self { Self { start: day, end: day } }

  pub fn contains(&self, day: NaiveDate) -> bool {
    self.start <= day && day <= self.end
  }

  pub fn overlaps(&self, other: &DateRange) -> bool {
    self.start <= other.end && other.start <= self.end
  }

  /// The days common to both ranges, or `None` if they are disjoint.
  pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
    let start = self.start.max(other.start);
    let end = self.end.min(other.end);
    (start <= end).then_some(DateRange { start, end })
  }

  /// Smallest range covering every day in `days`.
  pub fn spanning(days: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
    days.into_iter().fold(None, |acc, day| match acc {
      None => Some(Self::single(day)),
      Some(r) => Some(Self { start: r.start.min(day), end: r.end.max(day) }),
    })
  }
}

impl fmt::Display for DateRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..={}", self.start, self.end)
  }
}
