//! Core types and scheduling logic for Trainplan.
//!
//! A coach schedules workouts two ways: directly onto one athlete's day, or
//! into a program whose placements are shared by every enrolled athlete.
//! [`Resolver`](resolver::Resolver) merges both into one calendar,
//! [`ActivityOverlay`](overlay::ActivityOverlay) adds the athlete's own
//! progress, and [`MutationEngine`](mutation::MutationEngine) routes calendar
//! gestures back to the right table.
//!
//! This crate is free of HTTP and database dependencies. Storage is reached
//! through the traits in [`store`].

// Store impls use native `async fn`; the traits declare `Send` futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod assignment;
pub mod calendar;
pub mod date;
pub mod error;
pub mod memory;
pub mod mutation;
pub mod overlay;
pub mod program;
pub mod resolver;
pub mod schedule;
pub mod store;
pub mod workout;

pub use calendar::Calendar;
pub use error::{Error, Result};

#[cfg(test)]
mod testing;
